// SPDX-License-Identifier: BSD-3-Clause
use std::fmt::Display;
use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;

use tracing_flame::FlameLayer;
use tracing_subscriber::{fmt, prelude::*};

use absint::{
    layers::{SpanStats, SpanStatsLayer},
    Lattice, NonRelationalValueDomain, Parity, ProgramPoint, Sign, SignParity, SymbolicExpression,
    Type, ValueEnvironment,
};

mod cli;

fn setup_global_subscriber() -> Result<(impl Drop, SpanStats)> {
    let filter_layer = tracing::level_filters::LevelFilter::TRACE;
    let fmt_layer = fmt::Layer::default().with_writer(io::stderr);
    let (flame_layer, guard) =
        FlameLayer::with_file("./tracing.folded").context("Couldn't create ./tracing.folded")?;
    let (stats_layer, stats) = SpanStatsLayer::new();
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(flame_layer)
        .with(stats_layer)
        .init();
    Ok((guard, stats))
}

fn run<D>(exprs: &[SymbolicExpression], quiet: bool) -> Result<()>
where
    D: NonRelationalValueDomain + Display,
{
    let env = ValueEnvironment::<D>::top();
    let mut stdout = io::stdout().lock();
    for (i, expr) in exprs.iter().enumerate() {
        let pp = ProgramPoint::new(format!("input:{}", i));
        let value = env
            .eval(expr, &pp)
            .with_context(|| format!("Couldn't evaluate {}", expr))?;
        let sat = if expr.types.contains(Type::Boolean) {
            Some(
                env.satisfies(expr, &pp)
                    .with_context(|| format!("Couldn't check {}", expr))?,
            )
        } else {
            None
        };
        if quiet {
            continue;
        }
        match sat {
            Some(sat) => writeln!(stdout, "{} --> {} [{}]", expr, value, sat)?,
            None => writeln!(stdout, "{} --> {}", expr, value)?,
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = cli::Args::parse();

    let tracing = if args.tracing {
        Some(setup_global_subscriber()?)
    } else {
        None
    };

    let input = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Couldn't read {}", args.input.display()))?;
    let exprs: Vec<SymbolicExpression> =
        serde_json::from_str(&input).context("Couldn't deserialize symbolic expressions")?;

    match args.domain {
        cli::Domain::Sign => run::<Sign>(&exprs, args.quiet)?,
        cli::Domain::Parity => run::<Parity>(&exprs, args.quiet)?,
        cli::Domain::SignParity => run::<SignParity>(&exprs, args.quiet)?,
    }

    if let Some((_guard, stats)) = tracing {
        stats.report(&mut io::stderr().lock())?;
    }

    Ok(())
}

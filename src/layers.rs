// SPDX-License-Identifier: BSD-3-Clause
//! `tracing` layer tallying how often, and for how long, each span ran.

use std::{
    hash::BuildHasherDefault,
    io::{self, Write},
    sync::Arc,
    time::Instant,
};

use dashmap::DashMap;
use rustc_hash::FxHasher;
use tracing::{Id, Subscriber};
use tracing_subscriber::{layer::Context, registry::LookupSpan, Layer};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SpanStat {
    pub count: u64,
    pub nanos: u128,
}

/// Handle on the numbers collected by a [`SpanStatsLayer`]. Stays readable
/// after the layer has been moved into a subscriber.
#[derive(Clone, Debug, Default)]
pub struct SpanStats(Arc<DashMap<&'static str, SpanStat, BuildHasherDefault<FxHasher>>>);

impl SpanStats {
    /// Per-span totals, sorted by span name.
    pub fn snapshot(&self) -> Vec<(&'static str, SpanStat)> {
        let mut v: Vec<_> = self.0.iter().map(|e| (*e.key(), *e.value())).collect();
        v.sort_by_key(|(name, _)| *name);
        v
    }

    pub fn report<W: Write>(&self, w: &mut W) -> io::Result<()> {
        for (name, stat) in self.snapshot() {
            writeln!(w, "{}: {} ({} ns)", name, stat.count, stat.nanos)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct SpanStatsLayer {
    stats: SpanStats,
}

impl SpanStatsLayer {
    pub fn new() -> (Self, SpanStats) {
        let stats = SpanStats::default();
        (
            SpanStatsLayer {
                stats: stats.clone(),
            },
            stats,
        )
    }
}

impl<S> Layer<S> for SpanStatsLayer
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_enter(&self, id: &Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            span.extensions_mut().replace(Instant::now());
        }
    }

    fn on_exit(&self, id: &Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            let nanos = span
                .extensions()
                .get::<Instant>()
                .map_or(0, |t| t.elapsed().as_nanos());
            let mut stat = self.stats.0.entry(span.name()).or_default();
            stat.count += 1;
            stat.nanos += nanos;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::prelude::*;

    #[test]
    fn counts_spans() {
        let (layer, stats) = SpanStatsLayer::new();
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            for _ in 0..3 {
                let _span = tracing::trace_span!("eval").entered();
            }
            let _span = tracing::trace_span!("satisfies").entered();
        });
        let snapshot = stats.snapshot();
        assert_eq!(2, snapshot.len());
        assert_eq!(("eval", 3), (snapshot[0].0, snapshot[0].1.count));
        assert_eq!(("satisfies", 1), (snapshot[1].0, snapshot[1].1.count));
        let mut out = Vec::new();
        stats.report(&mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("eval: 3 ("));
    }
}

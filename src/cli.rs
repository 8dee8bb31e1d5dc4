// SPDX-License-Identifier: BSD-3-Clause
use std::fmt;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum Domain {
    Sign,
    Parity,
    SignParity,
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Sign => write!(f, "sign"),
            Domain::Parity => write!(f, "parity"),
            Domain::SignParity => write!(f, "sign-parity"),
        }
    }
}

/// Evaluate symbolic expressions in an abstract domain
#[derive(Debug, clap::Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Abstract domain
    #[arg(short, long, default_value_t = Domain::SignParity)]
    pub domain: Domain,

    /// JSON array of symbolic expressions
    #[arg()]
    pub input: PathBuf,

    /// Quiet
    #[arg(long)]
    pub quiet: bool,

    /// Tracing
    #[arg(long)]
    pub tracing: bool,
}

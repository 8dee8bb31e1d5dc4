// SPDX-License-Identifier: BSD-3-Clause
//! Invariant violations surfaced by lattice operations.
//!
//! Type mismatches and precision loss are *not* errors: they are encoded as
//! bottom and top respectively. Everything here is a contract breach in a
//! domain implementation or in the caller, and is never recovered from.

use crate::heap::SiteKey;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SemanticError {
    /// A reduction returned a component strictly less precise than its input.
    #[error("Reduction produced an inconsistent pair: {pair}")]
    InconsistentReduction { pair: String },

    /// A site was promoted without ever having been resolved by the table.
    #[error("Unknown allocation site: {0}")]
    UnknownSite(SiteKey),
}

pub type Result<T> = std::result::Result<T, SemanticError>;

// SPDX-License-Identifier: BSD-3-Clause
//! The symbolic expression algebra domains are evaluated over.
//!
//! Expressions are built by the front-end (out of this crate) and only read
//! here. Every node carries the set of runtime types it may have, which the
//! evaluator consults to reject ill-typed operands.

pub mod expression;
pub mod operator;
pub mod types;

pub use expression::*;
pub use operator::*;
pub use types::*;

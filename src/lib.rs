// SPDX-License-Identifier: BSD-3-Clause
//! Composable abstract domains for static analysis: a lattice contract, a
//! non-relational evaluator for symbolic expressions, sign and parity
//! domains, a reduced-product combinator, and an allocation-site heap model.

pub mod domains;
pub mod environment;
pub mod error;
pub mod heap;
pub mod lattice;
pub mod layers;
pub mod nonrelational;
pub mod symbolic;

pub use domains::{NoReduction, Parity, ReducedProduct, Reduction, Sign, SignParity};
pub use environment::ValueEnvironment;
pub use error::{Result, SemanticError};
pub use heap::{AllocationSite, HeapMemory, LocationId, PointsToSet, SiteKey, SiteTable, Strength};
pub use lattice::{Lattice, Satisfiability};
pub use nonrelational::NonRelationalValueDomain;
pub use symbolic::{Identifier, ProgramPoint, RuntimeTypes, SymbolicExpression, Type};

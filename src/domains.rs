// SPDX-License-Identifier: BSD-3-Clause
//! Value domains shipped with the kernel

pub mod parity;
pub mod product;
pub mod sign;

pub use parity::Parity;
pub use product::{NoReduction, ReducedProduct, Reduction, SignParity, SignParityReduction};
pub use sign::Sign;

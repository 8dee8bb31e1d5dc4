// SPDX-License-Identifier: BSD-3-Clause
//! Allocation-site heap abstraction
//!
//! Every runtime object is named by the program location that allocated it
//! (optionally qualified by a field). A [`SiteTable`] decides whether each
//! name stands for a single object (strong) or a summary of many (weak);
//! [`PointsToSet`] and [`HeapMemory`] are the domains built on top.

pub mod memory;
pub mod points_to;
pub mod site;
pub mod table;

pub use memory::HeapMemory;
pub use points_to::PointsToSet;
pub use site::{AllocationSite, LocationId, SiteKey, Strength};
pub use table::SiteTable;

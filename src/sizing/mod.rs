//! Executor sizing module
//!
//! Parses memory quantities, rounds them to schedulable megabyte values,
//! and derives executor allocations from cluster topology.

mod memory;
mod planner;
mod profile;

pub use memory::*;
pub use planner::*;
pub use profile::*;

//! Derived-financial aggregation logic.
//!
//! Every function here is a pure pass over entity slices the caller has
//! already loaded: ticket profit rollups, fuel spend splits and mileage
//! derivation, salary formulas and per-account outstanding dues. Nothing
//! in this crate touches the database.

pub mod error;
pub mod fuel;
pub mod payments;
pub mod salary;
pub mod tickets;

pub use error::{ComputeError, Result};

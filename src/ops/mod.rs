//! # Operations
//!
//! Producers that report into the registry. Real file I/O is out of scope
//! here; [`simulated`] paces fake work so the panel has something to show.

pub mod simulated;

pub use simulated::{SimulatedOp, spawn_simulated};

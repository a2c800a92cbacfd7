//! Population simulation library
//!
//! Re-exports modules for use by the binary and by external front ends.

pub mod curve;
pub mod error;
pub mod simulation;

pub use error::{SimError, SimResult};

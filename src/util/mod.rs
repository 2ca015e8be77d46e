//! Utility types and functions for the OPDx reader.
//!
//! - [`Error`] / [`Result`] - Error handling
//! - Math helpers used by profile leveling

mod error;
mod math;

pub use error::*;
pub use math::*;

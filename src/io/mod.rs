//! Input/output helpers.
//!
//! - model spec JSON read/write (`model`)

pub mod model;

pub use model::*;

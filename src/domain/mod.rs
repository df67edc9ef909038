//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - parameters, clamp notices, and worker messages (`types`)
//! - display formats for parameter values (`format`)
//! - `YYYY:DOY` date parsing for time masks (`time`)

pub mod format;
pub mod time;
pub mod types;

pub use format::*;
pub use time::*;
pub use types::*;

//! Parameter state and its presentation.
//!
//! - `store`: the authoritative registry with change notifications
//! - `slider`: value <-> 0..=100 slider position mapping
//! - `panel`: per-row text buffers and slider positions kept in sync with the store

pub mod panel;
pub mod slider;
pub mod store;

pub use panel::*;
pub use slider::*;
pub use store::*;

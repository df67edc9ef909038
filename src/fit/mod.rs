//! Asynchronous fit supervision.
//!
//! - `worker`: the worker boundary plus an in-process thread worker
//! - `process`: a worker that runs an external fitter over JSON lines
//! - `session`: polls a running worker and applies its results to the store

pub mod process;
pub mod session;
pub mod worker;

pub use process::*;
pub use session::*;
pub use worker::*;

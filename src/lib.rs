//! `fitdeck` library crate.
//!
//! The binary (`fitdeck`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without a terminal or a real fitter
//! - the parameter store and fit session can be driven by other front-ends

pub mod app;
pub mod cli;
pub mod command;
pub mod config;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod logging;
pub mod mask;
pub mod params;
pub mod report;
pub mod tui;

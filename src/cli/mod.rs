//! Command-line parsing for the interactive model fitter.
//!
//! Argument parsing and command dispatch stay separate from the parameter and
//! fit machinery.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_FIT_METHOD, FitOptions};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "fitdeck", version, about = "Interactive parameter tuning and fit monitoring")]
pub struct Cli {
    /// Silence all logging.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive terminal UI (default).
    Tui(TuiArgs),
    /// Apply commands, run a fit headlessly, print the parameters and save.
    Fit(FitArgs),
    /// Apply commands and save, without fitting.
    Apply(ApplyArgs),
}

/// Options shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct ModelArgs {
    /// Model spec JSON file.
    #[arg(value_name = "MODEL")]
    pub model: PathBuf,

    /// Copy val/min/max/frozen/fmt for matching parameters from another model file.
    #[arg(long, value_name = "JSON")]
    pub inherit_from: Option<PathBuf>,

    /// Write logs to this file.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Stop time of the fit interval (default: the model's datestop).
    #[arg(long, value_name = "DATE")]
    pub stop: Option<String>,

    /// Length of the fit interval in days; only used with --stop.
    #[arg(long, value_name = "DAYS", default_value_t = 15.0)]
    pub days: f64,

    /// Set a component's data value as `<comp_name>=<value>` (repeatable).
    #[arg(long = "set-data", value_name = "EXPR")]
    pub set_data: Vec<String>,
}

/// Optimizer settings handed to the worker.
#[derive(Debug, Args, Clone)]
pub struct FitMethodArgs {
    /// Fit method, e.g. simplex, moncar or levmar.
    #[arg(long, value_name = "NAME", default_value = DEFAULT_FIT_METHOD)]
    pub fit_method: String,

    /// Number of worker processes (0 lets the worker decide).
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub nproc: usize,
}

impl FitMethodArgs {
    pub fn to_options(&self) -> FitOptions {
        FitOptions {
            method: self.fit_method.clone(),
            nproc: self.nproc,
            ..FitOptions::default()
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub method: FitMethodArgs,

    /// External fitter command (overrides FITDECK_WORKER).
    #[arg(long, value_name = "CMD")]
    pub worker: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Command to apply before fitting (repeatable), e.g. `-c "freeze solarheat*"`.
    #[arg(short = 'c', long = "command", value_name = "CMD")]
    pub commands: Vec<String>,

    /// Output file (defaults to overwriting MODEL).
    #[arg(long, value_name = "JSON")]
    pub out: Option<PathBuf>,

    #[command(flatten)]
    pub method: FitMethodArgs,

    /// External fitter command (overrides FITDECK_WORKER).
    #[arg(long, value_name = "CMD")]
    pub worker: Option<String>,

    /// Print a progress line on every poll tick.
    #[arg(long)]
    pub progress: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Command to apply (repeatable).
    #[arg(short = 'c', long = "command", value_name = "CMD", required = true)]
    pub commands: Vec<String>,

    /// Output file (defaults to overwriting MODEL).
    #[arg(long, value_name = "JSON")]
    pub out: Option<PathBuf>,
}

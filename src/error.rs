//! Error types.
//!
//! Core components report typed errors (`thiserror` enums) so callers can match
//! on them. The binary converts everything into [`AppError`], which carries the
//! process exit code.

use thiserror::Error;

/// Exit code for bad input: unreadable files, invalid model specs, bad flags.
pub const EXIT_INPUT: u8 = 2;
/// Exit code for fit/worker failures.
pub const EXIT_FIT: u8 = 3;
/// Exit code for terminal (TUI) failures.
pub const EXIT_TERMINAL: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Parameter store and slider errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),
    #[error("parameter vector has {got} values, model has {expected} parameters")]
    ShapeMismatch { expected: usize, got: usize },
    #[error("degenerate slider range: min={min}, max={max}")]
    DegenerateRange { min: f64, max: f64 },
}

/// Command line validation errors. No state is mutated when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("bad command: {0}")]
    BadCommand(String),
    #[error("invalid input for ignore: {input} ({reason})")]
    BadRange { input: String, reason: String },
}

/// Failures raised by worker implementations.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("failed to spawn worker '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("worker i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode fit problem: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("worker thread panicked")]
    Panicked,
    #[error("worker already launched")]
    AlreadyLaunched,
}

/// Fit session lifecycle errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("fit already running")]
    AlreadyRunning,
    #[error("fit session already ended ({0}); start a new session")]
    SessionEnded(&'static str),
    #[error(transparent)]
    Worker(#[from] WorkerError),
}

impl From<ParamError> for AppError {
    fn from(value: ParamError) -> Self {
        AppError::new(EXIT_INPUT, value.to_string())
    }
}

impl From<CommandError> for AppError {
    fn from(value: CommandError) -> Self {
        AppError::new(EXIT_INPUT, value.to_string())
    }
}

impl From<SessionError> for AppError {
    fn from(value: SessionError) -> Self {
        AppError::new(EXIT_FIT, value.to_string())
    }
}

impl From<WorkerError> for AppError {
    fn from(value: WorkerError) -> Self {
        AppError::new(EXIT_FIT, value.to_string())
    }
}

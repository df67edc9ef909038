//! Runtime configuration.
//!
//! Layering, lowest to highest precedence:
//! built-in defaults -> `.env` -> process environment -> CLI flags.

use std::path::PathBuf;

use crate::error::{AppError, EXIT_INPUT};
use crate::fit::ProcessWorker;

pub const ENV_WORKER: &str = "FITDECK_WORKER";
pub const ENV_LOG: &str = "FITDECK_LOG";

const DEFAULT_LOG_FILTER: &str = "info";

/// An external fitter command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl WorkerCommand {
    /// Split on whitespace; the first token is the program.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let mut tokens = raw.split_whitespace().map(str::to_string);
        let program = tokens
            .next()
            .ok_or_else(|| AppError::new(EXIT_INPUT, "Worker command is empty."))?;
        Ok(Self {
            program,
            args: tokens.collect(),
        })
    }

    pub fn to_worker(&self) -> ProcessWorker {
        ProcessWorker::new(self.program.clone(), self.args.clone())
    }
}

/// Values supplied on the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub worker: Option<String>,
    pub log_file: Option<PathBuf>,
    pub quiet: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub worker: Option<WorkerCommand>,
    /// `EnvFilter` directive string.
    pub log_filter: String,
    pub log_file: Option<PathBuf>,
    pub quiet: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            worker: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_file: None,
            quiet: false,
        }
    }
}

impl AppConfig {
    /// Load `.env` (if any), then resolve against the process environment.
    pub fn load(overrides: ConfigOverrides) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::resolve(|key| std::env::var(key).ok(), overrides)
    }

    /// Resolve from an arbitrary variable lookup.
    pub fn resolve(
        lookup: impl Fn(&str) -> Option<String>,
        overrides: ConfigOverrides,
    ) -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Some(v) = lookup(ENV_LOG).filter(|v| !v.trim().is_empty()) {
            config.log_filter = v;
        } else if let Some(v) = lookup("RUST_LOG").filter(|v| !v.trim().is_empty()) {
            config.log_filter = v;
        }
        if let Some(v) = lookup(ENV_WORKER).filter(|v| !v.trim().is_empty()) {
            config.worker = Some(WorkerCommand::parse(&v)?);
        }

        if let Some(v) = overrides.worker {
            config.worker = Some(WorkerCommand::parse(&v)?);
        }
        if overrides.log_file.is_some() {
            config.log_file = overrides.log_file;
        }
        if overrides.quiet {
            config.quiet = true;
            config.log_filter = "off".to_string();
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = AppConfig::resolve(env(&[]), ConfigOverrides::default()).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn environment_sets_worker_and_filter() {
        let config = AppConfig::resolve(
            env(&[(ENV_WORKER, "python fit.py --fast"), (ENV_LOG, "debug")]),
            ConfigOverrides::default(),
        )
        .unwrap();
        let worker = config.worker.unwrap();
        assert_eq!(worker.program, "python");
        assert_eq!(worker.args, vec!["fit.py", "--fast"]);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn fitdeck_log_wins_over_rust_log() {
        let config = AppConfig::resolve(
            env(&[("RUST_LOG", "trace"), (ENV_LOG, "warn")]),
            ConfigOverrides::default(),
        )
        .unwrap();
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn cli_overrides_environment() {
        let overrides = ConfigOverrides {
            worker: Some("./fitter".to_string()),
            log_file: Some(PathBuf::from("fit.log")),
            quiet: true,
        };
        let config = AppConfig::resolve(env(&[(ENV_WORKER, "python fit.py")]), overrides).unwrap();
        assert_eq!(config.worker.unwrap().program, "./fitter");
        assert_eq!(config.log_file, Some(PathBuf::from("fit.log")));
        assert_eq!(config.log_filter, "off");
    }

    #[test]
    fn blank_worker_flag_is_an_input_error() {
        let overrides = ConfigOverrides {
            worker: Some("   ".to_string()),
            ..Default::default()
        };
        let err = AppConfig::resolve(env(&[]), overrides).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INPUT);
    }
}

//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - held in the parameter store during an interactive session
//! - shipped to fit workers (thread or child process)
//! - written back to the model spec file

use chrono::{NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::format::DEFAULT_FORMAT;

/// A named, bounded, continuously-valued model parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Hierarchical name, unique across the model (e.g. `solarheat__tank__P_60`).
    pub full_name: String,
    pub val: f64,
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub frozen: bool,
    /// Display format, e.g. `{:.4g}`.
    #[serde(default = "default_fmt")]
    pub fmt: String,
}

fn default_fmt() -> String {
    DEFAULT_FORMAT.to_string()
}

impl Parameter {
    pub fn new(full_name: impl Into<String>, val: f64, min: f64, max: f64) -> Self {
        Self {
            full_name: full_name.into(),
            val,
            min,
            max,
            frozen: false,
            fmt: default_fmt(),
        }
    }

    pub fn frozen(mut self, frozen: bool) -> Self {
        self.frozen = frozen;
        self
    }

    pub fn with_fmt(mut self, fmt: impl Into<String>) -> Self {
        self.fmt = fmt.into();
        self
    }

    pub fn bound(&self, which: Bound) -> f64 {
        match which {
            Bound::Min => self.min,
            Bound::Max => self.max,
        }
    }
}

/// Which bound of a parameter an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Min,
    Max,
}

impl Bound {
    pub fn label(self) -> &'static str {
        match self {
            Bound::Min => "min",
            Bound::Max => "max",
        }
    }
}

/// Informational notice emitted when `set_value` had to correct the input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClampNotice {
    /// Requested value was below `min`; `val` was set to `min`.
    ToMin { requested: f64, min: f64 },
    /// Requested value was above `max`; `val` was set to `max`.
    ToMax { requested: f64, max: f64 },
}

impl std::fmt::Display for ClampNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClampNotice::ToMin { requested, min } => write!(
                f,
                "attempted to set value {requested} below minimum; set to min value {min}"
            ),
            ClampNotice::ToMax { requested, max } => write!(
                f,
                "attempted to set value {requested} above maximum; set to max value {max}"
            ),
        }
    }
}

/// Progress status reported by a fit worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitStatus {
    Running,
    Finished,
    Terminated,
}

impl FitStatus {
    /// `finished` and `terminated` end a fit; the worker is expected to exit.
    pub fn is_terminal(self) -> bool {
        matches!(self, FitStatus::Finished | FitStatus::Terminated)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FitStatus::Running => "running",
            FitStatus::Finished => "finished",
            FitStatus::Terminated => "terminated",
        }
    }
}

/// A message as it arrives on the worker channel.
///
/// Every field is optional so that incomplete messages can be detected and
/// skipped instead of failing the session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFitMessage {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub parvals: Option<Vec<f64>>,
}

impl RawFitMessage {
    pub fn new(status: FitStatus, parvals: Vec<f64>) -> Self {
        Self {
            status: Some(status.as_str().to_string()),
            parvals: Some(parvals),
        }
    }
}

/// A validated worker message.
#[derive(Debug, Clone, PartialEq)]
pub struct FitMessage {
    pub status: FitStatus,
    pub parvals: Vec<f64>,
}

impl FitMessage {
    /// Validate a raw message against the expected parameter count.
    pub fn from_raw(raw: RawFitMessage, expected_len: usize) -> Result<Self, String> {
        let status = match raw.status.as_deref() {
            Some("running") => FitStatus::Running,
            Some("finished") => FitStatus::Finished,
            Some("terminated") => FitStatus::Terminated,
            Some(other) => return Err(format!("unknown status '{other}'")),
            None => return Err("missing status".to_string()),
        };
        let Some(parvals) = raw.parvals else {
            return Err("missing parvals".to_string());
        };
        if parvals.len() != expected_len {
            return Err(format!(
                "parvals has {} values, expected {expected_len}",
                parvals.len()
            ));
        }
        Ok(Self { status, parvals })
    }
}

/// Snapshot of the store handed to a fit worker at launch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitProblem {
    pub parnames: Vec<String>,
    pub parvals: Vec<f64>,
    pub mins: Vec<f64>,
    pub maxs: Vec<f64>,
    pub frozen: Vec<bool>,
    #[serde(flatten)]
    pub options: FitOptions,
}

/// How the worker should fit, passed through alongside the parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitOptions {
    /// Optimizer name, e.g. `simplex`, `moncar` or `levmar`.
    pub method: String,
    /// Worker processes; 0 lets the worker decide.
    pub nproc: usize,
    /// Fixed data values keyed by component name.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub set_data: Map<String, Value>,
}

pub const DEFAULT_FIT_METHOD: &str = "simplex";

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            method: DEFAULT_FIT_METHOD.to_string(),
            nproc: 0,
            set_data: Map::new(),
        }
    }
}

impl FitProblem {
    pub fn len(&self) -> usize {
        self.parvals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parvals.is_empty()
    }
}

/// The model's overall time span; `*` in `ignore` resolves to these endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSpan {
    pub start: NaiveDateTime,
    pub stop: NaiveDateTime,
}

impl ModelSpan {
    /// The span of `days` ending at `stop`. The start is truncated to midnight.
    pub fn ending_at(stop: NaiveDateTime, days: f64) -> Result<Self, String> {
        if !days.is_finite() || days < 0.0 {
            return Err(format!("days must be a non-negative number, got {days}"));
        }
        let start = TimeDelta::try_milliseconds((days * 86_400_000.0).round() as i64)
            .and_then(|len| stop.checked_sub_signed(len))
            .ok_or_else(|| format!("{days} days before the stop time is out of range"))?;
        Ok(Self {
            start: start.date().and_time(NaiveTime::MIN),
            stop,
        })
    }
}

/// One excluded time interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskInterval {
    /// Canonical date strings (`YYYY:DOY:HH:MM:SS.sss`).
    pub start_date: String,
    pub stop_date: String,
    pub start: NaiveDateTime,
    pub stop: NaiveDateTime,
}

impl MaskInterval {
    pub fn new(start: NaiveDateTime, stop: NaiveDateTime) -> Self {
        Self {
            start_date: crate::domain::time::format_date(start),
            stop_date: crate::domain::time::format_date(stop),
            start,
            stop,
        }
    }

    pub fn contains(&self, t: NaiveDateTime) -> bool {
        self.start <= t && t <= self.stop
    }
}

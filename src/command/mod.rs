//! Line-oriented command interpreter.
//!
//! ```text
//! freeze <glob>...     exclude matching parameters from the fit
//! thaw <glob>...       include matching parameters in the fit
//! ignore <start>-<stop>  mask a time interval (`*` = model start/stop)
//! notice               remove every mask interval
//! ```
//!
//! Commands are validated completely before anything is mutated, so a
//! rejected line leaves the store and the mask untouched.

use tracing::{info, warn};

use crate::domain::{MaskInterval, ModelSpan, parse_date};
use crate::error::CommandError;
use crate::mask::MaskManager;
use crate::params::ParameterStore;

pub mod glob;

pub use glob::GlobPattern;

/// A parsed command line.
#[derive(Debug, Clone)]
pub enum Command {
    Freeze(Vec<GlobPattern>),
    Thaw(Vec<GlobPattern>),
    /// Raw `<start>-<stop>` argument; resolved against the model span on execution.
    Ignore(String),
    Notice,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&cmd, args)) = tokens.split_first() else {
            return Err(CommandError::BadCommand("empty command".to_string()));
        };

        let bad = || CommandError::BadCommand(line.trim().to_string());
        match cmd {
            "freeze" | "thaw" => {
                if args.is_empty() {
                    return Err(bad());
                }
                let patterns = args
                    .iter()
                    .map(|g| GlobPattern::new(g))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|_| bad())?;
                Ok(if cmd == "freeze" {
                    Command::Freeze(patterns)
                } else {
                    Command::Thaw(patterns)
                })
            }
            "ignore" => match args {
                [range] => Ok(Command::Ignore((*range).to_string())),
                _ => Err(bad()),
            },
            "notice" => {
                if args.is_empty() {
                    Ok(Command::Notice)
                } else {
                    Err(bad())
                }
            }
            _ => Err(bad()),
        }
    }
}

/// What a successful command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Frozen { matched: usize },
    Thawed { matched: usize },
    Masked(MaskInterval),
    Noticed { cleared: usize },
}

impl CommandOutcome {
    /// Mask changes alter what the plots show.
    pub fn needs_redraw(&self) -> bool {
        matches!(self, CommandOutcome::Masked(_) | CommandOutcome::Noticed { .. })
    }

    pub fn summary(&self) -> String {
        match self {
            CommandOutcome::Frozen { matched } => format!("froze {matched} parameter(s)"),
            CommandOutcome::Thawed { matched } => format!("thawed {matched} parameter(s)"),
            CommandOutcome::Masked(i) => format!("ignoring {} to {}", i.start_date, i.stop_date),
            CommandOutcome::Noticed { cleared } => format!("cleared {cleared} mask interval(s)"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CommandInterpreter {
    span: ModelSpan,
}

impl CommandInterpreter {
    pub fn new(span: ModelSpan) -> Self {
        Self { span }
    }

    /// Parse and run one command line.
    pub fn execute(
        &self,
        line: &str,
        store: &mut ParameterStore,
        masks: &mut MaskManager,
    ) -> Result<CommandOutcome, CommandError> {
        let result = Command::parse(line).and_then(|cmd| self.run(cmd, store, masks));
        match &result {
            Ok(outcome) => info!(command = line.trim(), "{}", outcome.summary()),
            Err(err) => warn!("{err}"),
        }
        result
    }

    pub fn run(
        &self,
        command: Command,
        store: &mut ParameterStore,
        masks: &mut MaskManager,
    ) -> Result<CommandOutcome, CommandError> {
        match command {
            Command::Freeze(patterns) => {
                let matched = set_frozen_matching(store, &patterns, true);
                Ok(CommandOutcome::Frozen { matched })
            }
            Command::Thaw(patterns) => {
                let matched = set_frozen_matching(store, &patterns, false);
                Ok(CommandOutcome::Thawed { matched })
            }
            Command::Ignore(range) => {
                let interval = resolve_range(&range, self.span)?;
                masks.add(interval.clone());
                Ok(CommandOutcome::Masked(interval))
            }
            Command::Notice => Ok(CommandOutcome::Noticed {
                cleared: masks.reset(),
            }),
        }
    }
}

/// Set `frozen` on every parameter matching any pattern; each match is
/// updated once.
fn set_frozen_matching(store: &mut ParameterStore, patterns: &[GlobPattern], frozen: bool) -> usize {
    let matched: Vec<usize> = store
        .names()
        .enumerate()
        .filter(|(_, name)| patterns.iter().any(|p| p.matches(name)))
        .map(|(i, _)| i)
        .collect();
    for &i in &matched {
        store.set_frozen_at(i, frozen);
    }
    matched.len()
}

/// Resolve `<start>-<stop>` into a mask interval.
pub fn resolve_range(raw: &str, span: ModelSpan) -> Result<MaskInterval, CommandError> {
    let bad = |reason: String| CommandError::BadRange {
        input: raw.to_string(),
        reason,
    };

    let (start, stop) = match raw.split('-').collect::<Vec<_>>().as_slice() {
        [start, stop] => (*start, *stop),
        _ => return Err(bad("expected <start>-<stop>".to_string())),
    };

    let start = match start {
        "*" => span.start,
        s => parse_date(s).map_err(bad)?,
    };
    let stop = match stop {
        "*" => span.stop,
        s => parse_date(s).map_err(bad)?,
    };
    if start > stop {
        return Err(bad("start is after stop".to_string()));
    }
    Ok(MaskInterval::new(start, stop))
}

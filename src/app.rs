//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and resolves configuration
//! - installs the log subscriber
//! - loads the model and dispatches to the TUI or a headless command

use clap::Parser;
use tracing::info;

use crate::cli::{ApplyArgs, Cli, Command, FitArgs, TuiArgs};
use crate::config::{AppConfig, ConfigOverrides};
use crate::error::{AppError, EXIT_FIT};
use crate::fit::SessionState;
use crate::logging::{self, LogTarget};

pub mod workspace;

pub use workspace::Workspace;

/// Entry point for the `fitdeck` binary.
pub fn run() -> Result<(), AppError> {
    // `fitdeck model.json` behaves like `fitdeck tui model.json`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);
    let quiet = cli.quiet;

    match cli.command {
        Command::Tui(args) => handle_tui(args, quiet),
        Command::Fit(args) => handle_fit(args, quiet),
        Command::Apply(args) => handle_apply(args, quiet),
    }
}

fn handle_tui(args: TuiArgs, quiet: bool) -> Result<(), AppError> {
    let config = AppConfig::load(ConfigOverrides {
        worker: args.worker.clone(),
        log_file: args.model.log_file.clone(),
        quiet,
    })?;
    logging::init(&config, LogTarget::Tui)?;

    let mut workspace = Workspace::open(&args.model)?;
    workspace.fit_options = args.method.to_options();
    crate::tui::run(workspace, config)
}

fn handle_fit(args: FitArgs, quiet: bool) -> Result<(), AppError> {
    let config = AppConfig::load(ConfigOverrides {
        worker: args.worker.clone(),
        log_file: args.model.log_file.clone(),
        quiet,
    })?;
    logging::init(&config, LogTarget::Stderr)?;

    let worker = config.worker.as_ref().ok_or_else(|| {
        AppError::new(
            EXIT_FIT,
            format!(
                "No fit worker configured; pass --worker or set {}.",
                crate::config::ENV_WORKER
            ),
        )
    })?;

    let mut workspace = Workspace::open(&args.model)?;
    workspace.fit_options = args.method.to_options();
    workspace.execute_all(&args.commands)?;

    let mut session = workspace.start_fit(Box::new(worker.to_worker()))?;
    info!(worker = %worker.program, method = %workspace.fit_options.method, "running fit");
    let progress = args.progress;
    let state = session.run_to_completion(&mut workspace.store, |report, store| {
        if progress {
            println!("{}", crate::report::format_tick(report, store.params()));
        }
    });

    println!("{}", crate::report::format_outcome(state));
    print!("{}", crate::report::format_param_table(workspace.store.params()));
    print!("{}", crate::report::format_masks(&workspace.masks));

    let saved = workspace.save(args.out.as_deref())?;
    println!("Saved {}", saved.display());

    if state == SessionState::Terminated {
        return Err(AppError::new(EXIT_FIT, "Fit was terminated before finishing."));
    }
    Ok(())
}

fn handle_apply(args: ApplyArgs, quiet: bool) -> Result<(), AppError> {
    let config = AppConfig::load(ConfigOverrides {
        log_file: args.model.log_file.clone(),
        quiet,
        ..Default::default()
    })?;
    logging::init(&config, LogTarget::Stderr)?;

    let mut workspace = Workspace::open(&args.model)?;
    for outcome in workspace.execute_all(&args.commands)? {
        println!("{}", outcome.summary());
    }
    print!("{}", crate::report::format_param_table(workspace.store.params()));
    print!("{}", crate::report::format_masks(&workspace.masks));

    let saved = workspace.save(args.out.as_deref())?;
    println!("Saved {}", saved.display());
    Ok(())
}

/// Rewrite argv so `fitdeck` defaults to `fitdeck tui`.
///
/// Rules:
/// - `fitdeck model.json ...`            -> `fitdeck tui model.json ...`
/// - `fitdeck --worker x model.json`     -> `fitdeck tui --worker x model.json`
/// - `fitdeck --help/--version/-h`       -> unchanged (show top-level help/version)
/// - `fitdeck` (no args)                 -> unchanged (clap reports the missing subcommand)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "fit" | "apply");
    if is_subcommand {
        return argv;
    }

    argv.insert(1, "tui".to_string());
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_model_path_defaults_to_tui() {
        assert_eq!(
            rewrite_args(argv(&["fitdeck", "model.json"])),
            argv(&["fitdeck", "tui", "model.json"])
        );
        assert_eq!(
            rewrite_args(argv(&["fitdeck", "--worker", "./fit", "m.json"])),
            argv(&["fitdeck", "tui", "--worker", "./fit", "m.json"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        for args in [
            &["fitdeck", "fit", "m.json"][..],
            &["fitdeck", "apply", "m.json", "-c", "notice"][..],
            &["fitdeck", "--help"][..],
            &["fitdeck"][..],
        ] {
            assert_eq!(rewrite_args(argv(args)), argv(args));
        }
    }
}

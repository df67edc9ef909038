//! A loaded model and everything the front-ends mutate.
//!
//! Both the headless commands and the TUI go through this type so the
//! load -> inherit -> command -> fit -> save workflow exists once.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::cli::ModelArgs;
use crate::command::{CommandInterpreter, CommandOutcome};
use crate::domain::{FitOptions, ModelSpan, format_date, parse_date};
use crate::error::{AppError, EXIT_INPUT};
use crate::fit::{FitSession, FitWorker};
use crate::io::{ModelFile, parse_set_data, read_inherited_params, read_model, write_model};
use crate::mask::MaskManager;
use crate::params::ParameterStore;

pub struct Workspace {
    pub path: PathBuf,
    pub model: ModelFile,
    pub store: ParameterStore,
    pub masks: MaskManager,
    pub interpreter: CommandInterpreter,
    /// Optimizer settings for every fit started from here.
    pub fit_options: FitOptions,
}

impl Workspace {
    pub fn open(args: &ModelArgs) -> Result<Self, AppError> {
        let mut model = read_model(&args.model)?;
        if let Some(stop) = &args.stop {
            let stop = parse_date(stop).map_err(|e| AppError::new(EXIT_INPUT, format!("Invalid --stop: {e}")))?;
            let span = ModelSpan::ending_at(stop, args.days)
                .map_err(|e| AppError::new(EXIT_INPUT, format!("Invalid --days: {e}")))?;
            info!(start = %format_date(span.start), stop = %format_date(span.stop), "fit interval overridden");
            model.set_span(span);
        }
        for expr in &args.set_data {
            let (comp, value) = parse_set_data(expr)?;
            model.gui_config.set_data_vals.insert(comp, value);
        }

        let mut workspace = Self::from_model(args.model.clone(), model)?;
        if let Some(other) = &args.inherit_from {
            let source = read_inherited_params(other)?;
            let inherited = workspace.store.inherit_from(&source);
            info!(
                from = %other.display(),
                count = inherited.len(),
                "inherited parameters"
            );
        }
        Ok(workspace)
    }

    pub fn from_model(path: PathBuf, model: ModelFile) -> Result<Self, AppError> {
        let span = model.span()?;
        let masks = model.masks()?;
        let store = ParameterStore::new(model.params());
        info!(
            model = %model.name,
            params = store.len(),
            masks = masks.len(),
            "model loaded"
        );
        Ok(Self {
            path,
            model,
            store,
            masks,
            interpreter: CommandInterpreter::new(span),
            fit_options: FitOptions::default(),
        })
    }

    /// Run one command line against the store and mask.
    pub fn execute(&mut self, line: &str) -> Result<CommandOutcome, AppError> {
        Ok(self
            .interpreter
            .execute(line, &mut self.store, &mut self.masks)?)
    }

    /// Run command lines in order, stopping at the first failure.
    pub fn execute_all(&mut self, lines: &[String]) -> Result<Vec<CommandOutcome>, AppError> {
        lines.iter().map(|line| self.execute(line)).collect()
    }

    /// Launch a fit from the current parameters.
    pub fn start_fit(&self, worker: Box<dyn FitWorker>) -> Result<FitSession, AppError> {
        let options = FitOptions {
            set_data: self.model.gui_config.set_data_vals.clone(),
            ..self.fit_options.clone()
        };
        let mut session = FitSession::new(worker).with_options(options);
        session.start(&self.store)?;
        Ok(session)
    }

    /// Write the current state to `out`, or back to the source file.
    pub fn save(&mut self, out: Option<&Path>) -> Result<PathBuf, AppError> {
        let target = out.unwrap_or(&self.path).to_path_buf();
        self.model.update(self.store.params(), &self.masks);
        self.model.gui_config.filename = Some(
            std::path::absolute(&target)
                .unwrap_or_else(|_| target.clone())
                .display()
                .to_string(),
        );
        write_model(&target, &self.model)?;
        info!(path = %target.display(), "model saved");
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::SessionState;
    use crate::fit::worker::{Fitter, Progress, ThreadWorker};
    use crate::domain::FitProblem;

    const MODEL: &str = r#"{
  "name": "demo",
  "datestart": "2020:001",
  "datestop": "2020:031",
  "pars": [
    {"full_name": "foo.bar", "val": 1.0, "min": 0.0, "max": 2.0},
    {"full_name": "foo.baz", "val": 1.0, "min": 0.0, "max": 2.0},
    {"full_name": "qux.bar", "val": 1.0, "min": 0.0, "max": 2.0}
  ]
}"#;

    fn workspace() -> Workspace {
        let model: ModelFile = serde_json::from_str(MODEL).unwrap();
        Workspace::from_model(PathBuf::from("demo.json"), model).unwrap()
    }

    struct Constant(f64);

    impl Fitter for Constant {
        fn fit(&mut self, problem: &FitProblem, _progress: &mut Progress<'_>) -> Vec<f64> {
            problem
                .parvals
                .iter()
                .zip(&problem.frozen)
                .map(|(&v, &frozen)| if frozen { v } else { self.0 })
                .collect()
        }
    }

    #[test]
    fn commands_then_fit_then_save() {
        let mut ws = workspace();
        ws.execute_all(&["freeze foo*".to_string(), "ignore *-2020:010".to_string()])
            .unwrap();
        assert_eq!(ws.masks.len(), 1);

        let mut session = ws
            .start_fit(Box::new(ThreadWorker::new(Box::new(Constant(0.25)))))
            .unwrap();
        let state = session.run_to_completion(&mut ws.store, |_, _| {});
        assert_eq!(state, SessionState::Finished);
        assert_eq!(ws.store.values(), vec![1.0, 1.0, 0.25]);

        let out = std::env::temp_dir().join(format!("fitdeck-ws-{}.json", std::process::id()));
        ws.save(Some(&out)).unwrap();
        let saved = read_model(&out).unwrap();
        std::fs::remove_file(&out).ok();
        assert_eq!(saved.params(), ws.store.params());
        assert_eq!(saved.mask_times.len(), 1);
        assert!(saved.gui_config.filename.is_some());
    }

    /// Reports `dp_pitch` and `nproc` as the first two values.
    struct OptionEcho;

    impl Fitter for OptionEcho {
        fn fit(&mut self, problem: &FitProblem, _progress: &mut Progress<'_>) -> Vec<f64> {
            let pitch = problem.options.set_data.get("dp_pitch").and_then(|v| v.as_f64());
            vec![pitch.unwrap_or(-1.0), problem.options.nproc as f64, 0.0]
        }
    }

    #[test]
    fn open_applies_interval_and_data_overrides() {
        let path = std::env::temp_dir().join(format!("fitdeck-ws-open-{}.json", std::process::id()));
        std::fs::write(&path, MODEL).unwrap();
        let args = ModelArgs {
            model: path.clone(),
            inherit_from: None,
            log_file: None,
            stop: Some("2020:020:12:00".to_string()),
            days: 5.0,
            set_data: vec!["dp_pitch = 150".to_string()],
        };
        let mut ws = Workspace::open(&args).unwrap();
        ws.fit_options.nproc = 2;

        // `*` now resolves against the overridden interval.
        ws.execute("ignore *-*").unwrap();
        let mask = &ws.masks.intervals()[0];
        assert_eq!(mask.start_date, "2020:015:00:00:00.000");
        assert_eq!(mask.stop_date, "2020:020:12:00:00.000");

        let mut session = ws.start_fit(Box::new(ThreadWorker::new(Box::new(OptionEcho)))).unwrap();
        assert_eq!(session.run_to_completion(&mut ws.store, |_, _| {}), SessionState::Finished);
        assert_eq!(ws.store.values(), vec![150.0, 2.0, 0.0]);

        ws.save(None).unwrap();
        let saved = read_model(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(saved.datestart, "2020:015:00:00:00.000");
        assert_eq!(saved.gui_config.set_data_vals["dp_pitch"], 150);
    }

    #[test]
    fn bad_overrides_are_input_errors() {
        let path = std::env::temp_dir().join(format!("fitdeck-ws-bad-{}.json", std::process::id()));
        std::fs::write(&path, MODEL).unwrap();
        let base = ModelArgs {
            model: path.clone(),
            inherit_from: None,
            log_file: None,
            stop: None,
            days: 15.0,
            set_data: Vec::new(),
        };
        let bad_stop = ModelArgs { stop: Some("yesterday".to_string()), ..base.clone() };
        let bad_days = ModelArgs { stop: Some("2020:020".to_string()), days: -1.0, ..base.clone() };
        let bad_data = ModelArgs { set_data: vec!["dp_pitch".to_string()], ..base.clone() };
        let errors: Vec<u8> = [bad_stop, bad_days, bad_data]
            .iter()
            .map(|args| Workspace::open(args).map(|_| ()).unwrap_err().exit_code())
            .collect();
        let unchanged = Workspace::open(&base).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(errors, vec![EXIT_INPUT; 3]);
        assert_eq!(unchanged.model.datestart, "2020:001");
    }

    #[test]
    fn failing_command_stops_the_batch() {
        let mut ws = workspace();
        let err = ws
            .execute_all(&["freeze qux*".to_string(), "bogus".to_string(), "freeze foo*".to_string()])
            .unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INPUT);
        assert_eq!(ws.store.thawed_count(), 2);
    }
}

//! Fit worker boundary.
//!
//! A worker runs the optimization concurrently with the host and reports
//! progress as [`RawFitMessage`]s over an `mpsc` channel. The session only
//! ever talks to it through [`FitWorker`]: launch, best-effort cancel, join.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::domain::{FitProblem, FitStatus, RawFitMessage};
use crate::error::WorkerError;

pub trait FitWorker {
    /// Start the fit for `problem`; every message goes to `tx`.
    fn launch(&mut self, problem: FitProblem, tx: Sender<RawFitMessage>) -> Result<(), WorkerError>;

    /// Ask the worker to stop. The terminal message arrives on the channel later.
    fn cancel(&mut self);

    /// Whether [`cancel`](Self::cancel) has any effect for this worker.
    fn is_stoppable(&self) -> bool;

    /// Block until the worker has fully exited.
    fn join(&mut self) -> Result<(), WorkerError>;
}

/// An optimization algorithm run by [`ThreadWorker`].
pub trait Fitter: Send + 'static {
    /// Whether the fitter polls [`Progress::is_cancelled`].
    fn supports_cancel(&self) -> bool {
        true
    }

    /// Run the fit and return the final parameter vector (same length and
    /// order as `problem.parvals`).
    fn fit(&mut self, problem: &FitProblem, progress: &mut Progress<'_>) -> Vec<f64>;
}

/// Progress sink handed to a [`Fitter`].
pub struct Progress<'a> {
    tx: &'a Sender<RawFitMessage>,
    cancel: &'a AtomicBool,
    reported: usize,
}

impl Progress<'_> {
    /// Report an intermediate parameter vector.
    pub fn report(&mut self, parvals: &[f64]) {
        self.reported += 1;
        // A closed channel means the session is gone; keep fitting quietly.
        let _ = self
            .tx
            .send(RawFitMessage::new(FitStatus::Running, parvals.to_vec()));
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    pub fn reported(&self) -> usize {
        self.reported
    }
}

/// Runs a [`Fitter`] on a background thread.
pub struct ThreadWorker {
    fitter: Option<Box<dyn Fitter>>,
    stoppable: bool,
    cancel: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ThreadWorker {
    pub fn new(fitter: Box<dyn Fitter>) -> Self {
        Self {
            stoppable: fitter.supports_cancel(),
            fitter: Some(fitter),
            cancel: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }
}

impl FitWorker for ThreadWorker {
    fn launch(&mut self, problem: FitProblem, tx: Sender<RawFitMessage>) -> Result<(), WorkerError> {
        let mut fitter = self.fitter.take().ok_or(WorkerError::AlreadyLaunched)?;
        let cancel = Arc::clone(&self.cancel);

        let handle = thread::Builder::new()
            .name("fit-worker".to_string())
            .spawn(move || {
                let mut progress = Progress {
                    tx: &tx,
                    cancel: &cancel,
                    reported: 0,
                };
                let parvals = fitter.fit(&problem, &mut progress);
                let status = if cancel.load(Ordering::SeqCst) {
                    FitStatus::Terminated
                } else {
                    FitStatus::Finished
                };
                debug!(reports = progress.reported(), status = status.as_str(), "fit thread done");
                let _ = tx.send(RawFitMessage::new(status, parvals));
            })?;

        self.handle = Some(handle);
        Ok(())
    }

    fn cancel(&mut self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    fn is_stoppable(&self) -> bool {
        self.stoppable
    }

    fn join(&mut self) -> Result<(), WorkerError> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| WorkerError::Panicked),
            None => Ok(()),
        }
    }
}

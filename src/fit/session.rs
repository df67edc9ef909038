//! Fit session: supervises one worker run and feeds its progress into the
//! parameter store.
//!
//! The session is driven by the host's event loop. After `start` it arms a
//! 200 ms timer; whenever the timer is due the host calls [`FitSession::tick`],
//! which drains the channel without blocking and applies the newest parameter
//! vector. There is never more than one outstanding timer.
//!
//! ```text
//! idle --start--> running --terminal message--> finished | terminated
//! ```

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::domain::{FitMessage, FitOptions, FitProblem, FitStatus, RawFitMessage};
use crate::error::SessionError;
use crate::fit::worker::FitWorker;
use crate::params::ParameterStore;

/// Poll cadence while a fit is running.
pub const POLL_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Finished,
    Terminated,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Finished | SessionState::Terminated)
    }

    pub fn label(self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Running => "running",
            SessionState::Finished => "finished",
            SessionState::Terminated => "terminated",
        }
    }
}

/// What one tick did.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Messages taken off the channel (including malformed ones).
    pub consumed: usize,
    pub malformed: usize,
    /// Status of the message whose vector was applied, if any.
    pub applied: Option<FitStatus>,
    pub state: SessionState,
}

pub struct FitSession {
    worker: Box<dyn FitWorker>,
    options: FitOptions,
    rx: Option<Receiver<RawFitMessage>>,
    state: SessionState,
    expected_len: usize,
    last_status: Option<FitStatus>,
    last_parvals: Option<Vec<f64>>,
    next_tick: Option<Instant>,
}

impl std::fmt::Debug for FitSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FitSession")
            .field("state", &self.state)
            .field("last_status", &self.last_status)
            .field("next_tick", &self.next_tick)
            .finish()
    }
}

impl FitSession {
    pub fn new(worker: Box<dyn FitWorker>) -> Self {
        Self {
            worker,
            options: FitOptions::default(),
            rx: None,
            state: SessionState::Idle,
            expected_len: 0,
            last_status: None,
            last_parvals: None,
            next_tick: None,
        }
    }

    /// Options sent to the worker along with the parameters.
    pub fn with_options(mut self, options: FitOptions) -> Self {
        self.options = options;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn last_status(&self) -> Option<FitStatus> {
        self.last_status
    }

    pub fn last_parvals(&self) -> Option<&[f64]> {
        self.last_parvals.as_deref()
    }

    pub fn is_stoppable(&self) -> bool {
        self.worker.is_stoppable()
    }

    /// Launch the worker with the store's current parameters and arm the timer.
    pub fn start(&mut self, store: &ParameterStore) -> Result<(), SessionError> {
        match self.state {
            SessionState::Running => return Err(SessionError::AlreadyRunning),
            SessionState::Finished | SessionState::Terminated => {
                return Err(SessionError::SessionEnded(self.state.label()));
            }
            SessionState::Idle => {}
        }

        let problem = FitProblem {
            options: self.options.clone(),
            ..store.problem()
        };
        let (tx, rx) = mpsc::channel();
        self.expected_len = problem.len();
        self.worker.launch(problem, tx)?;

        self.rx = Some(rx);
        self.state = SessionState::Running;
        self.next_tick = Some(Instant::now() + POLL_INTERVAL);
        info!(
            params = store.len(),
            thawed = store.thawed_count(),
            method = %self.options.method,
            "fit started"
        );
        Ok(())
    }

    /// Request cancellation. The session stays `running` until the resulting
    /// terminal message is drained by a later tick. Returns whether a cancel
    /// request was actually sent.
    pub fn stop(&mut self) -> bool {
        if self.state != SessionState::Running {
            return false;
        }
        if !self.worker.is_stoppable() {
            warn!("fit worker cannot be stopped");
            return false;
        }
        info!("fit stop requested");
        self.worker.cancel();
        true
    }

    /// Whether the poll timer has expired.
    pub fn due(&self, now: Instant) -> bool {
        self.next_tick.is_some_and(|t| now >= t)
    }

    /// Time left until the next tick, `None` when no timer is armed.
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.next_tick.map(|t| t.saturating_duration_since(now))
    }

    /// Tick if the timer is due.
    pub fn poll(&mut self, store: &mut ParameterStore, now: Instant) -> Option<TickReport> {
        if self.due(now) {
            Some(self.tick(store))
        } else {
            None
        }
    }

    /// Drain the channel and apply the newest parameter vector.
    pub fn tick(&mut self, store: &mut ParameterStore) -> TickReport {
        let mut report = TickReport {
            consumed: 0,
            malformed: 0,
            applied: None,
            state: self.state,
        };
        let Some(rx) = self.rx.as_ref().filter(|_| self.state == SessionState::Running) else {
            return report;
        };

        let mut latest: Option<FitMessage> = None;
        let mut disconnected = false;
        loop {
            match rx.try_recv() {
                Ok(raw) => {
                    report.consumed += 1;
                    match FitMessage::from_raw(raw, self.expected_len) {
                        Ok(msg) => {
                            let terminal = msg.status.is_terminal();
                            latest = Some(msg);
                            if terminal {
                                break;
                            }
                        }
                        Err(reason) => {
                            report.malformed += 1;
                            warn!("skipping malformed fit message: {reason}");
                        }
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }

        let mut terminal = None;
        if let Some(msg) = latest {
            match store.bulk_update(&msg.parvals) {
                Ok(()) => {
                    report.applied = Some(msg.status);
                    if msg.status.is_terminal() {
                        terminal = Some(msg.status);
                    }
                    self.last_status = Some(msg.status);
                    self.last_parvals = Some(msg.parvals);
                }
                Err(err) => warn!("skipping fit message: {err}"),
            }
        }

        match terminal {
            Some(status) => self.finish(status),
            None if disconnected => {
                error!("fit worker exited without a terminal message");
                self.finish(FitStatus::Terminated);
            }
            None => {
                debug!(consumed = report.consumed, "fit still running");
                self.next_tick = Some(Instant::now() + POLL_INTERVAL);
            }
        }

        report.state = self.state;
        report
    }

    /// Tick on the poll cadence until the session ends. `on_tick` sees every
    /// report together with the updated store.
    pub fn run_to_completion(
        &mut self,
        store: &mut ParameterStore,
        mut on_tick: impl FnMut(&TickReport, &ParameterStore),
    ) -> SessionState {
        while self.state == SessionState::Running {
            if let Some(wait) = self.time_until_tick(Instant::now()) {
                thread::sleep(wait);
            }
            let report = self.tick(store);
            on_tick(&report, store);
        }
        self.state
    }

    fn finish(&mut self, status: FitStatus) {
        // Bounded wait: the worker has already reported its final state.
        if let Err(err) = self.worker.join() {
            error!("fit worker join failed: {err}");
        }
        self.state = match status {
            FitStatus::Finished => SessionState::Finished,
            _ => SessionState::Terminated,
        };
        self.rx = None;
        self.next_tick = None;
        info!(status = status.as_str(), "fit {}", status.as_str());
    }
}

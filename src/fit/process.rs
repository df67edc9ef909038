//! External-process fit worker.
//!
//! Protocol:
//! - the fit problem is written to the child's stdin as one JSON document,
//!   then stdin is closed
//! - the child writes one JSON object per line to stdout:
//!   `{"status": "running" | "finished" | "terminated", "parvals": [...]}`
//! - any stdout line that is not JSON is treated as log output
//!
//! Cancelling kills the child; the reader then emits a `terminated` message
//! carrying the last vector the child reported.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use crate::domain::{FitProblem, FitStatus, RawFitMessage};
use crate::error::WorkerError;
use crate::fit::worker::FitWorker;

pub struct ProcessWorker {
    program: String,
    args: Vec<String>,
    child: Option<Child>,
    threads: Vec<JoinHandle<()>>,
    killed: Arc<AtomicBool>,
}

impl ProcessWorker {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            child: None,
            threads: Vec::new(),
            killed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl FitWorker for ProcessWorker {
    fn launch(&mut self, problem: FitProblem, tx: Sender<RawFitMessage>) -> Result<(), WorkerError> {
        if self.child.is_some() {
            return Err(WorkerError::AlreadyLaunched);
        }

        let payload = serde_json::to_vec(&problem)?;
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| WorkerError::Spawn {
                command: self.command_line(),
                source,
            })?;
        info!(pid = child.id(), command = %self.command_line(), "fit worker spawned");
        let (stdin, stdout, stderr) = (child.stdin.take(), child.stdout.take(), child.stderr.take());
        // Stored before any thread is spawned so a failure below can still be cancelled.
        self.child = Some(child);

        // Readers first, so a chatty child never blocks while we feed stdin.
        if let Some(stdout) = stdout {
            let killed = Arc::clone(&self.killed);
            let initial = problem.parvals.clone();
            self.threads.push(
                thread::Builder::new()
                    .name("fit-worker-stdout".to_string())
                    .spawn(move || read_messages(stdout, tx, killed, initial))?,
            );
        }
        if let Some(stderr) = stderr {
            self.threads.push(
                thread::Builder::new()
                    .name("fit-worker-stderr".to_string())
                    .spawn(move || forward_stderr(stderr))?,
            );
        }
        // The problem can exceed the pipe buffer; a slow reader must not stall the host.
        if let Some(stdin) = stdin {
            self.threads.push(
                thread::Builder::new()
                    .name("fit-worker-stdin".to_string())
                    .spawn(move || write_problem(stdin, &payload))?,
            );
        }
        Ok(())
    }

    fn cancel(&mut self) {
        let Some(child) = self.child.as_mut() else {
            return;
        };
        self.killed.store(true, Ordering::SeqCst);
        if let Err(err) = child.kill() {
            debug!("kill failed (worker probably already exited): {err}");
        }
    }

    fn is_stoppable(&self) -> bool {
        true
    }

    fn join(&mut self) -> Result<(), WorkerError> {
        if let Some(mut child) = self.child.take() {
            let status = child.wait()?;
            info!(%status, "fit worker exited");
        }
        let mut result = Ok(());
        for handle in self.threads.drain(..) {
            if handle.join().is_err() {
                result = Err(WorkerError::Panicked);
            }
        }
        result
    }
}

fn read_messages(
    stdout: ChildStdout,
    tx: Sender<RawFitMessage>,
    killed: Arc<AtomicBool>,
    initial: Vec<f64>,
) {
    let mut last = initial;
    let mut saw_terminal = false;

    for line in BufReader::new(stdout).lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!("failed to read worker output: {err}");
                break;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match serde_json::from_str::<RawFitMessage>(trimmed) {
            Ok(msg) => {
                if let Some(parvals) = &msg.parvals {
                    last = parvals.clone();
                }
                if matches!(msg.status.as_deref(), Some("finished" | "terminated")) {
                    saw_terminal = true;
                }
                if tx.send(msg).is_err() {
                    return;
                }
            }
            Err(_) => debug!(target: "fitdeck::worker", "{trimmed}"),
        }
    }

    if !saw_terminal && killed.load(Ordering::SeqCst) {
        let _ = tx.send(RawFitMessage::new(FitStatus::Terminated, last));
    }
}

fn write_problem(mut stdin: ChildStdin, payload: &[u8]) {
    let written = stdin.write_all(payload).and_then(|_| stdin.write_all(b"\n"));
    if let Err(err) = written {
        // The child may exit or be killed without reading; its output still decides the outcome.
        debug!("failed to send fit problem to worker: {err}");
    }
}

fn forward_stderr(stderr: ChildStderr) {
    for line in BufReader::new(stderr).lines().map_while(Result::ok) {
        debug!(target: "fitdeck::worker", "stderr: {line}");
    }
}

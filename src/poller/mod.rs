//! Task poller - drives one generation cycle from submission to a terminal state.
//!
//! # Cycle
//! 1. `start` validates the request, bumps the generation and enters `Submitting`
//! 2. A spawned loop submits the request and enters `Polling`
//! 3. The loop fetches the task status, waits a fixed interval, and repeats
//!    until the task completes, fails, or a call errors (`Settled`)
//!
//! # Supersession and teardown
//! Only the cycle whose generation matches the current one may emit. A newer
//! `start` makes older loops drop whatever they receive and exit on their own;
//! nothing is cancelled on the backend. `cancel` tears the session down: loops
//! are aborted (which also clears any pending interval timer) and no further
//! phase is ever emitted.
//!
//! Every emission goes through `Cycle::emit`, which checks generation and
//! teardown under the same lock that writes the phase.

mod error;
mod state;

pub use error::{CallStage, GenerationError, StartError};
pub use state::{Outcome, Phase, PollerView};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::client::TaskApiRef;
use crate::config::Config;
use crate::task::GenerationRequest;
use state::Step;

/// Owns the generation lifecycle for one session.
///
/// Dropping the poller tears it down.
pub struct TaskPoller {
    api: TaskApiRef,
    poll_interval: Duration,
    state: Arc<watch::Sender<PollerView>>,
    shutdown: CancellationToken,
    loops: Mutex<Vec<JoinHandle<()>>>,
}

impl TaskPoller {
    pub fn new(api: TaskApiRef, poll_interval: Duration) -> Self {
        let (state, _) = watch::channel(PollerView::default());
        Self {
            api,
            poll_interval,
            state: Arc::new(state),
            shutdown: CancellationToken::new(),
            loops: Mutex::new(Vec::new()),
        }
    }

    pub fn from_config(api: TaskApiRef, config: &Config) -> Self {
        Self::new(api, config.poll_interval)
    }

    /// Current read model.
    pub fn view(&self) -> PollerView {
        self.state.borrow().clone()
    }

    /// Receiver notified on every emitted phase.
    pub fn subscribe(&self) -> watch::Receiver<PollerView> {
        self.state.subscribe()
    }

    pub fn is_cancelled(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Begin a new generation cycle, superseding any running one.
    ///
    /// Must be called inside a Tokio runtime. Returns the new generation.
    /// Invalid requests and torn-down pollers are rejected before any
    /// network call and leave the view untouched.
    pub fn start(&self, request: GenerationRequest) -> Result<u64, StartError> {
        request.validate()?;
        if self.shutdown.is_cancelled() {
            return Err(StartError::Closed);
        }

        let mut generation = 0;
        self.state.send_modify(|view| {
            view.generation += 1;
            view.phase = Phase::Submitting;
            generation = view.generation;
        });

        tracing::info!(
            generation,
            theme = request.theme(),
            audiences = request.audiences().len(),
            "Starting generation cycle"
        );

        let cycle = Cycle {
            api: Arc::clone(&self.api),
            state: Arc::clone(&self.state),
            shutdown: self.shutdown.clone(),
            poll_interval: self.poll_interval,
            generation,
        };
        let handle = tokio::spawn(cycle.run(request));

        let mut loops = self.lock_loops();
        loops.retain(|h| !h.is_finished());
        if self.shutdown.is_cancelled() {
            // Torn down while spawning.
            handle.abort();
        } else {
            loops.push(handle);
        }

        Ok(generation)
    }

    /// Wait until the current cycle settles.
    ///
    /// Returns `None` if the poller is torn down first.
    pub async fn settled(&self) -> Option<PollerView> {
        let mut rx = self.state.subscribe();
        tokio::select! {
            view = rx.wait_for(PollerView::is_settled) => view.ok().map(|v| (*v).clone()),
            _ = self.shutdown.cancelled() => None,
        }
    }

    /// Tear the session down.
    ///
    /// Aborts every running loop, dropping pending timers, and keeps the
    /// view as it is. Calling it again is a no-op.
    pub fn cancel(&self) {
        if self.shutdown.is_cancelled() {
            return;
        }
        self.shutdown.cancel();

        let mut loops = self.lock_loops();
        for handle in loops.drain(..) {
            handle.abort();
        }

        tracing::debug!(
            generation = self.state.borrow().generation,
            "Task poller torn down"
        );
    }

    fn lock_loops(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.loops.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for TaskPoller {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// One generation cycle, bound to the generation it was started under.
struct Cycle {
    api: TaskApiRef,
    state: Arc<watch::Sender<PollerView>>,
    shutdown: CancellationToken,
    poll_interval: Duration,
    generation: u64,
}

impl Cycle {
    fn is_current(&self) -> bool {
        !self.shutdown.is_cancelled() && self.state.borrow().generation == self.generation
    }

    /// Publish `phase` if this cycle is still current.
    ///
    /// Returns false once superseded or torn down; the caller must stop.
    fn emit(&self, phase: Phase) -> bool {
        self.emit_with(phase, false)
    }

    fn emit_with(&self, phase: Phase, advance_generation: bool) -> bool {
        self.state.send_if_modified(|view| {
            if self.shutdown.is_cancelled() || view.generation != self.generation {
                return false;
            }
            view.phase = phase;
            if advance_generation {
                view.generation += 1;
            }
            true
        })
    }

    async fn run(self, request: GenerationRequest) {
        let submitted = self.api.submit(&request).await;
        drop(request);

        let task_id = match state::after_submit(submitted) {
            Phase::Polling { task_id, status } => {
                let phase = Phase::Polling {
                    task_id: task_id.clone(),
                    status,
                };
                if !self.emit(phase) {
                    tracing::debug!(
                        generation = self.generation,
                        task_id = %task_id,
                        "Cycle superseded during submission"
                    );
                    return;
                }
                task_id
            }
            failed => {
                // A failed submission also retires its generation.
                if self.emit_with(failed, true) {
                    tracing::warn!(generation = self.generation, "Submission failed");
                }
                return;
            }
        };
        tracing::info!(generation = self.generation, task_id = %task_id, "Polling task");

        loop {
            let fetched = self.api.fetch_status(&task_id).await;

            match state::after_poll(fetched) {
                Step::Continue(status) => {
                    let phase = Phase::Polling {
                        task_id: task_id.clone(),
                        status,
                    };
                    if !self.emit(phase) {
                        tracing::debug!(
                            generation = self.generation,
                            task_id = %task_id,
                            "Discarding status of superseded task"
                        );
                        return;
                    }
                    tracing::debug!(task_id = %task_id, status = %status, "Task still running");

                    tokio::time::sleep(self.poll_interval).await;
                    if !self.is_current() {
                        return;
                    }
                }
                Step::Settle(outcome) => {
                    let failure = match &outcome {
                        Outcome::Success(_) => None,
                        Outcome::Failure(err) => Some(err.to_string()),
                    };
                    if !self.emit(Phase::Settled(outcome)) {
                        tracing::debug!(
                            generation = self.generation,
                            task_id = %task_id,
                            "Discarding outcome of superseded task"
                        );
                        return;
                    }
                    match failure {
                        None => tracing::info!(task_id = %task_id, "Task completed"),
                        Some(error) => {
                            tracing::warn!(task_id = %task_id, error = %error, "Task failed")
                        }
                    }
                    return;
                }
            }
        }
    }
}

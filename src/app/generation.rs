// StableBuddy - app/generation.rs
//
// Generation lifecycle management. Runs the blocking `ImageGenerator` call
// on a background thread and hands the result back to the UI thread via an
// mpsc channel.
//
// Architecture:
//   - `GenerationManager` lives on the UI thread; `run_generation` runs on a
//     background thread.
//   - At most one request is in flight: `start` refuses while a receiver is
//     still pending.
//   - No cancellation. Once started, a request runs to completion and its
//     outcome is always delivered.

use crate::core::generator::ImageGenerator;
use crate::core::model::GenerationOutcome;
use crate::util::error::GenerationError;
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

/// Owns the model handle and the channel of the request in flight, if any.
pub struct GenerationManager {
    generator: Arc<dyn ImageGenerator>,

    /// Receiver for the in-flight request. `None` when idle.
    outcome_rx: Option<mpsc::Receiver<GenerationOutcome>>,
}

impl GenerationManager {
    pub fn new(generator: Arc<dyn ImageGenerator>) -> Self {
        Self {
            generator,
            outcome_rx: None,
        }
    }

    /// True while a request is in flight.
    pub fn is_busy(&self) -> bool {
        self.outcome_rx.is_some()
    }

    /// Start generating `prompt` on a background thread.
    ///
    /// Returns `false` without doing anything if a request is already running.
    pub fn start(&mut self, prompt: String) -> bool {
        if self.is_busy() {
            tracing::warn!("Generation already in flight; request refused");
            return false;
        }

        let (tx, rx) = mpsc::channel();
        self.outcome_rx = Some(rx);

        let generator = Arc::clone(&self.generator);
        std::thread::spawn(move || {
            run_generation(generator.as_ref(), &prompt, tx);
        });

        tracing::debug!("Generation worker spawned");
        true
    }

    /// Poll for the outcome without blocking.
    pub fn poll(&mut self) -> Option<GenerationOutcome> {
        let result = self.outcome_rx.as_ref()?.try_recv();
        match result {
            Ok(outcome) => {
                self.outcome_rx = None;
                Some(outcome)
            }
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                self.outcome_rx = None;
                Some(worker_lost())
            }
        }
    }

    /// Block for up to `timeout` waiting for the outcome.
    pub fn wait(&mut self, timeout: Duration) -> Option<GenerationOutcome> {
        let result = self.outcome_rx.as_ref()?.recv_timeout(timeout);
        match result {
            Ok(outcome) => {
                self.outcome_rx = None;
                Some(outcome)
            }
            Err(mpsc::RecvTimeoutError::Timeout) => None,
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                self.outcome_rx = None;
                Some(worker_lost())
            }
        }
    }
}

/// Outcome reported when the worker thread dies without sending (panic).
fn worker_lost() -> GenerationOutcome {
    tracing::error!("Generation worker exited without a result");
    GenerationOutcome::Failed {
        error: GenerationError::Backend {
            message: "generation worker exited unexpectedly".to_string(),
        },
    }
}

/// Run one generation and send the outcome. Runs on a background thread.
fn run_generation(
    generator: &dyn ImageGenerator,
    prompt: &str,
    tx: mpsc::Sender<GenerationOutcome>,
) {
    let started = Instant::now();
    let outcome = match generator.generate(prompt) {
        Ok(generation) => GenerationOutcome::Finished {
            generation,
            elapsed: started.elapsed(),
        },
        Err(error) => GenerationOutcome::Failed { error },
    };

    if tx.send(outcome).is_err() {
        // Receiver dropped (UI closed); nothing left to notify.
        tracing::debug!("Generation finished after UI shut down");
    }
}

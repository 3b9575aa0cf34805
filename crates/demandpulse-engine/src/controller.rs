//! Run lifecycle state machine.

use std::sync::{Mutex, PoisonError};

use uuid::Uuid;

use demandpulse_core::ProductResult;
use demandpulse_sentiment::SentenceScorer;
use demandpulse_source::PostSource;

use crate::error::EngineError;
use crate::run::{run_query, RunRequest, RunState};

/// Lifecycle phase of the controller.
///
/// `Idle → Running` on a start request (clears log and results);
/// `Running → Idle` on normal completion;
/// `Running → Interrupted → Idle` on an interruption request, observed
/// cooperatively at the next batch boundary. A start request while already
/// running is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Running,
    Interrupted,
}

impl Default for RunPhase {
    fn default() -> Self {
        RunPhase::Idle
    }
}

/// Owns the run state and the last run's results.
///
/// The presentation layer sends start/interrupt requests in and reads the log
/// snapshot and results out; it never touches the pipeline directly.
#[derive(Debug, Default)]
pub struct RunController {
    phase: Mutex<RunPhase>,
    state: RunState,
    results: Mutex<Vec<ProductResult>>,
}

impl RunController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> RunPhase {
        *self.lock_phase()
    }

    /// Handle to the shared run state (cancel token + log buffer).
    #[must_use]
    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Rendered progress log for display.
    #[must_use]
    pub fn log_snapshot(&self) -> String {
        self.state.log.snapshot()
    }

    /// The last run's results (possibly partial). Replaced wholesale per run.
    #[must_use]
    pub fn results(&self) -> Vec<ProductResult> {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Moves `Idle → Running`, clearing the log, the results, and the
    /// cancellation flag. Returns `false` (no-op) if a run is already active.
    pub fn try_start(&self) -> bool {
        let mut phase = self.lock_phase();
        if *phase != RunPhase::Idle {
            return false;
        }
        *phase = RunPhase::Running;
        self.state.cancel.reset();
        self.state.log.clear();
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        true
    }

    /// Requests interruption of the active run. Returns `false` if nothing is
    /// running. The flag flip is observed at the next batch boundary, so the
    /// transition to `Idle` happens only after the in-flight batch finishes.
    pub fn interrupt(&self) -> bool {
        let mut phase = self.lock_phase();
        if *phase != RunPhase::Running {
            return false;
        }
        *phase = RunPhase::Interrupted;
        self.state.cancel.cancel();
        self.state.log.push("--- Interrupted ---");
        true
    }

    /// Runs the full pipeline under this controller.
    ///
    /// Returns `Ok(None)` without doing anything when a run is already active
    /// (a start request while running is ignored, not queued). Otherwise the
    /// results are stored for later reads and also returned.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] from the underlying run; the
    /// controller still returns to `Idle`.
    pub async fn execute(
        &self,
        request: &RunRequest,
        source: &dyn PostSource,
        scorer: &dyn SentenceScorer,
    ) -> Result<Option<Vec<ProductResult>>, EngineError> {
        if !self.try_start() {
            tracing::debug!("start requested while a run is active — ignoring");
            return Ok(None);
        }

        let run_id = Uuid::new_v4();
        tracing::info!(
            %run_id,
            products = request.products.len(),
            location = request.location.as_str(),
            country = request.country.as_str(),
            "run started"
        );

        let outcome = run_query(request, source, scorer, &self.state).await;
        let result = match outcome {
            Ok(results) => {
                *self
                    .results
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner) = results.clone();
                tracing::info!(%run_id, products = results.len(), "run finished");
                Ok(Some(results))
            }
            Err(e) => {
                tracing::warn!(%run_id, error = %e, "run aborted");
                Err(e)
            }
        };

        *self.lock_phase() = RunPhase::Idle;
        result
    }

    fn lock_phase(&self) -> std::sync::MutexGuard<'_, RunPhase> {
        self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

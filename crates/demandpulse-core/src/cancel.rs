use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation token shared between the run trigger and the
/// fetch loop.
///
/// One writer (the interrupt request) and one reader (the per-batch check);
/// atomic semantics are sufficient, no lock is taken. Cancellation takes
/// effect only at batch boundaries, never mid-batch.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Rearms the token for a fresh run.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

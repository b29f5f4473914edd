//! Cooperative cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{VqeError, VqeResult};

/// Shared flag that stops an in-flight estimation.
///
/// Clones share the flag. The estimator checks it before every term and
/// every shot batch, so cancellation takes effect within one batch.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    pub(crate) fn check(&self) -> VqeResult<()> {
        if self.is_cancelled() {
            Err(VqeError::Cancelled)
        } else {
            Ok(())
        }
    }
}

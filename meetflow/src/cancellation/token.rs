//! Per-job cancellation flag.

use std::sync::OnceLock;

/// Cooperative cancellation for one job.
///
/// The first reason given wins. Nothing is interrupted mid-call; the
/// orchestrator looks at the token before starting each stage.
#[derive(Debug, Default)]
pub struct CancellationToken {
    reason: OnceLock<String>,
}

impl CancellationToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels the job. Returns false if it was already cancelled.
    pub fn cancel(&self, reason: impl Into<String>) -> bool {
        self.reason.set(reason.into()).is_ok()
    }

    /// Whether the job was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.reason.get().is_some()
    }

    /// Why the job was cancelled.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.get().map(String::as_str)
    }
}

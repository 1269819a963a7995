//! Task state and stage name enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a submitted job.
///
/// Transitions only move forward: `Pending -> Processing -> {Completed | Failed}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Job accepted, worker not started yet.
    #[default]
    Pending,
    /// Worker is running the stage sequence.
    Processing,
    /// Pipeline produced a canonical record.
    Completed,
    /// Pipeline aborted; the job carries an error description.
    Failed,
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl TaskState {
    /// Returns true if no further transition is allowed.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns true if moving from `self` to `next` is a legal transition.
    #[must_use]
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing)
                | (Self::Processing, Self::Completed)
                | (Self::Processing, Self::Failed)
        )
    }
}

/// The fixed stages of the meeting pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageName {
    /// Speech to text.
    Transcribe,
    /// Topic and decision analysis of the transcript.
    Analyze,
    /// Executive summary.
    Summarize,
    /// Structured metadata and action item extraction.
    Extract,
    /// Normalization into the canonical record plus validation.
    Structure,
    /// Publishing action items to the destination.
    Sync,
}

impl StageName {
    /// All stages in execution order.
    pub const ORDER: [Self; 6] = [
        Self::Transcribe,
        Self::Analyze,
        Self::Summarize,
        Self::Extract,
        Self::Structure,
        Self::Sync,
    ];

    /// Returns the stable string name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transcribe => "transcribe",
            Self::Analyze => "analyze",
            Self::Summarize => "summarize",
            Self::Extract => "extract",
            Self::Structure => "structure",
            Self::Sync => "sync",
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

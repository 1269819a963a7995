//! Job records held by the registry.

use crate::core::{JobId, JobInput, TaskState};
use crate::pipeline::CanonicalOutput;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One submitted job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Job id.
    pub id: JobId,
    /// What the job runs on.
    pub input: JobInput,
    /// Current state.
    pub state: TaskState,
    /// Output, set on completion.
    pub result: Option<CanonicalOutput>,
    /// Error description, set on failure.
    pub error: Option<String>,
    /// Submission time.
    pub created_at: DateTime<Utc>,
    /// Time of the last state change.
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub(crate) fn new(id: JobId, input: JobInput) -> Self {
        let now = Utc::now();
        Self {
            id,
            input,
            state: TaskState::Pending,
            result: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }
}

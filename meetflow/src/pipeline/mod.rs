//! Meeting pipeline orchestration.

mod orchestrator;

pub use orchestrator::MeetingPipeline;

use crate::record::MeetingResult;
use crate::sync::SyncOutcome;
use serde::{Deserialize, Serialize};

/// The result of a completed job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalOutput {
    /// The validated meeting record.
    pub record: MeetingResult,
    /// What happened when publishing it.
    pub sync: SyncOutcome,
}

impl CanonicalOutput {
    /// Renders the output as indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

//! Stage trait and the meeting pipeline stages.
//!
//! Each stage consumes a typed input and produces a typed output, or fails
//! with a [`StageError`]. Stages hold no per-job state, so one instance can
//! serve many concurrent jobs.

mod analyze;
mod extract;
pub mod prompts;
mod structure;
mod sync;
mod transcribe;

pub use analyze::{AnalysisStage, SummarizationStage};
pub use extract::ExtractionStage;
pub use structure::{StructureInput, StructuringStage};
pub use sync::SyncStage;
pub use transcribe::TranscriptionStage;

use crate::core::StageName;
use crate::errors::StageError;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

/// Trait for pipeline stages.
#[async_trait]
pub trait Stage: Send + Sync + Debug {
    /// What the stage consumes.
    type Input: Send;
    /// What the stage produces.
    type Output: Send;

    /// Returns the name of the stage.
    fn name(&self) -> StageName;

    /// Executes the stage.
    ///
    /// # Arguments
    ///
    /// * `input` - The stage input
    ///
    /// # Returns
    ///
    /// The stage output, or a stage-scoped error that aborts the job.
    async fn execute(&self, input: Self::Input) -> Result<Self::Output, StageError>;
}

/// Read-only context shared by the stages after analysis.
///
/// Summarization and extraction both see the original transcript together
/// with the analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingContext {
    /// The transcript.
    pub transcript: Arc<str>,
    /// The analysis of the transcript.
    pub analysis: Arc<str>,
}

impl MeetingContext {
    /// Creates a new context.
    #[must_use]
    pub fn new(transcript: impl Into<Arc<str>>, analysis: impl Into<Arc<str>>) -> Self {
        Self {
            transcript: transcript.into(),
            analysis: analysis.into(),
        }
    }
}

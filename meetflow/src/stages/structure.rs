//! Normalization and validation gate.

use super::Stage;
use crate::core::StageName;
use crate::errors::StageError;
use crate::record::{normalize, validate, ExtractedData, MeetingResult};
use async_trait::async_trait;
use tracing::info;

/// Input of the structuring stage.
#[derive(Debug, Clone)]
pub struct StructureInput {
    /// The summary text.
    pub summary: String,
    /// The extraction result.
    pub extracted: ExtractedData,
}

/// Builds the canonical record and rejects it if it is not safe to persist.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuringStage;

#[async_trait]
impl Stage for StructuringStage {
    type Input = StructureInput;
    type Output = MeetingResult;

    fn name(&self) -> StageName {
        StageName::Structure
    }

    async fn execute(&self, input: StructureInput) -> Result<MeetingResult, StageError> {
        let record = normalize(&input.summary, input.extracted);
        validate(&record)?;
        info!(todos = record.todos.len(), "Canonical record validated");
        Ok(record)
    }
}

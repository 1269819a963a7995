//! Metadata and action item extraction stage.

use super::{prompts, MeetingContext, Stage};
use crate::core::StageName;
use crate::errors::StageError;
use crate::providers::{CompletionClient, CompletionRequest};
use crate::record::ExtractedData;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Asks the completion service for structured JSON.
///
/// A response that is not a JSON object is replaced by an empty
/// [`ExtractedData`]; only transport failures fail the stage.
pub struct ExtractionStage {
    client: Arc<dyn CompletionClient>,
}

impl ExtractionStage {
    /// Creates the stage.
    #[must_use]
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }
}

impl std::fmt::Debug for ExtractionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionStage")
            .field("client", &self.client.name())
            .finish()
    }
}

#[async_trait]
impl Stage for ExtractionStage {
    type Input = MeetingContext;
    type Output = ExtractedData;

    fn name(&self) -> StageName {
        StageName::Extract
    }

    async fn execute(&self, ctx: MeetingContext) -> Result<ExtractedData, StageError> {
        info!("Extracting action items and meeting details");
        let request = CompletionRequest::json(
            prompts::EXTRACTION_SYSTEM,
            prompts::extraction_request(&ctx.transcript, &ctx.analysis),
        );
        let response = self.client.complete(request).await?;

        match ExtractedData::from_json_str(&response) {
            Ok(data) => Ok(data),
            Err(e) => {
                warn!(error = %e, "Extraction response is not valid JSON, using empty result");
                Ok(ExtractedData::default())
            }
        }
    }
}

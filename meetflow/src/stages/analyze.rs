//! Analysis and summarization stages.

use super::{prompts, MeetingContext, Stage};
use crate::core::StageName;
use crate::errors::StageError;
use crate::providers::{CompletionClient, CompletionRequest};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Produces a narrative analysis of the transcript.
pub struct AnalysisStage {
    client: Arc<dyn CompletionClient>,
}

impl AnalysisStage {
    /// Creates the stage.
    #[must_use]
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }
}

impl std::fmt::Debug for AnalysisStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisStage")
            .field("client", &self.client.name())
            .finish()
    }
}

#[async_trait]
impl Stage for AnalysisStage {
    type Input = Arc<str>;
    type Output = Arc<str>;

    fn name(&self) -> StageName {
        StageName::Analyze
    }

    async fn execute(&self, transcript: Arc<str>) -> Result<Arc<str>, StageError> {
        info!("Analyzing meeting context and flow");
        let request = CompletionRequest::text(prompts::ANALYSIS_SYSTEM, &*transcript);
        let analysis = self.client.complete(request).await?;
        Ok(analysis.into())
    }
}

/// Produces the executive summary.
pub struct SummarizationStage {
    client: Arc<dyn CompletionClient>,
}

impl SummarizationStage {
    /// Creates the stage.
    #[must_use]
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }
}

impl std::fmt::Debug for SummarizationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummarizationStage")
            .field("client", &self.client.name())
            .finish()
    }
}

#[async_trait]
impl Stage for SummarizationStage {
    type Input = MeetingContext;
    type Output = String;

    fn name(&self) -> StageName {
        StageName::Summarize
    }

    async fn execute(&self, ctx: MeetingContext) -> Result<String, StageError> {
        info!("Generating executive summary");
        let request = CompletionRequest::text(
            prompts::SUMMARY_SYSTEM,
            prompts::summary_request(&ctx.transcript, &ctx.analysis),
        );
        Ok(self.client.complete(request).await?)
    }
}

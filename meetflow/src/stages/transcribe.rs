//! Speech-to-text stage.

use super::Stage;
use crate::core::{JobInput, StageName};
use crate::errors::{ResourceNotFound, StageError};
use crate::providers::Transcriber;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Turns the job's audio into a transcript.
pub struct TranscriptionStage {
    transcriber: Arc<dyn Transcriber>,
}

impl TranscriptionStage {
    /// Creates the stage.
    #[must_use]
    pub fn new(transcriber: Arc<dyn Transcriber>) -> Self {
        Self { transcriber }
    }
}

impl std::fmt::Debug for TranscriptionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranscriptionStage")
            .field("transcriber", &self.transcriber.name())
            .finish()
    }
}

#[async_trait]
impl Stage for TranscriptionStage {
    type Input = JobInput;
    type Output = Arc<str>;

    fn name(&self) -> StageName {
        StageName::Transcribe
    }

    async fn execute(&self, input: JobInput) -> Result<Arc<str>, StageError> {
        if let Some(transcript) = input.transcript {
            info!("Using supplied transcript, skipping speech-to-text");
            return Ok(transcript.into());
        }

        if !tokio::fs::try_exists(&input.audio).await.unwrap_or(false) {
            return Err(ResourceNotFound::audio(input.audio).into());
        }

        info!(audio = ?input.audio, provider = self.transcriber.name(), "Transcribing audio");
        let text = self.transcriber.transcribe(&input.audio).await?;
        info!(chars = text.len(), "Transcription complete");
        Ok(text.into())
    }
}

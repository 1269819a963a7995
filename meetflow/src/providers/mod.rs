//! Contracts for the upstream AI services.
//!
//! The pipeline only ever talks to these traits, so a scripted stand-in can
//! replace the real services in tests.

use crate::errors::UpstreamError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Speech-to-text service.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Returns the provider name used in logs.
    fn name(&self) -> &str;

    /// Transcribes the audio file at `audio`.
    async fn transcribe(&self, audio: &Path) -> Result<String, UpstreamError>;
}

/// A single chat-completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Instructions for the model.
    pub system_prompt: String,
    /// The content to operate on.
    pub user_content: String,
    /// Whether the response must be a JSON object.
    #[serde(default)]
    pub json_mode: bool,
}

impl CompletionRequest {
    /// Creates a free-text request.
    #[must_use]
    pub fn text(system_prompt: impl Into<String>, user_content: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_content: user_content.into(),
            json_mode: false,
        }
    }

    /// Creates a request that asks for a JSON object response.
    #[must_use]
    pub fn json(system_prompt: impl Into<String>, user_content: impl Into<String>) -> Self {
        Self {
            json_mode: true,
            ..Self::text(system_prompt, user_content)
        }
    }
}

/// Language-model completion service.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Returns the provider name used in logs.
    fn name(&self) -> &str;

    /// Runs one completion and returns the response text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, UpstreamError>;
}

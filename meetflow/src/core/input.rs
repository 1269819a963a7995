//! Job input reference.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What a job runs on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobInput {
    /// Path to the recorded audio.
    pub audio: PathBuf,
    /// Transcript supplied up front; when set, speech-to-text is not called.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
}

impl JobInput {
    /// Creates an input for an audio file.
    #[must_use]
    pub fn audio(path: impl Into<PathBuf>) -> Self {
        Self {
            audio: path.into(),
            transcript: None,
        }
    }

    /// Creates an input whose transcript is already known.
    #[must_use]
    pub fn with_transcript(path: impl Into<PathBuf>, transcript: impl Into<String>) -> Self {
        Self {
            audio: path.into(),
            transcript: Some(transcript.into()),
        }
    }
}

//! Scripted stand-ins for the external collaborators.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::destination::{Destination, FieldCatalog, PropertyValue, RecordHandle, RecordPayload};
use crate::errors::{DestinationError, UpstreamError};
use crate::providers::{CompletionClient, CompletionRequest, Transcriber};

/// A transcriber that returns a fixed transcript.
#[derive(Debug)]
pub struct ScriptedTranscriber {
    reply: Result<String, UpstreamError>,
    calls: Mutex<Vec<PathBuf>>,
}

impl ScriptedTranscriber {
    /// Creates a transcriber that always returns `text`.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Creates a transcriber that always fails.
    #[must_use]
    pub fn failing(error: UpstreamError) -> Self {
        Self {
            reply: Err(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Returns the number of transcriptions requested.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Returns the audio paths transcribed so far.
    #[must_use]
    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl Transcriber for ScriptedTranscriber {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn transcribe(&self, audio: &Path) -> Result<String, UpstreamError> {
        self.calls.lock().push(audio.to_path_buf());
        self.reply.clone()
    }
}

/// A completion client that answers by prompt substring.
///
/// Rules are checked in insertion order against the system prompt first and
/// the user content second. A request nothing matches fails with a transport
/// error so a missing script shows up as a failed job.
#[derive(Debug, Default)]
pub struct ScriptedCompletion {
    rules: Vec<(String, Result<String, UpstreamError>)>,
    fallback: Option<UpstreamError>,
    delay: Option<Duration>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletion {
    /// Creates a client with no scripted responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a client that fails every request.
    #[must_use]
    pub fn failing(error: UpstreamError) -> Self {
        Self {
            fallback: Some(error),
            ..Self::default()
        }
    }

    /// Answers requests whose prompt contains `needle` with `response`.
    #[must_use]
    pub fn respond_to(mut self, needle: impl Into<String>, response: impl Into<String>) -> Self {
        self.rules.push((needle.into(), Ok(response.into())));
        self
    }

    /// Fails requests whose prompt contains `needle`.
    #[must_use]
    pub fn fail_on(mut self, needle: impl Into<String>, error: UpstreamError) -> Self {
        self.rules.push((needle.into(), Err(error)));
        self
    }

    /// Sleeps before answering each request.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Returns every request received, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }

    fn reply_for(&self, request: &CompletionRequest) -> Result<String, UpstreamError> {
        if let Some(error) = &self.fallback {
            return Err(error.clone());
        }
        let matched = self
            .rules
            .iter()
            .find(|(needle, _)| request.system_prompt.contains(needle.as_str()))
            .or_else(|| {
                self.rules
                    .iter()
                    .find(|(needle, _)| request.user_content.contains(needle.as_str()))
            });
        match matched {
            Some((_, reply)) => reply.clone(),
            None => Err(UpstreamError::transport(
                "scripted",
                "no scripted response for request",
            )),
        }
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, UpstreamError> {
        self.requests.lock().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply_for(&request)
    }
}

/// An in-memory destination that records every created payload.
#[derive(Debug, Default)]
pub struct InMemoryDestination {
    catalog: FieldCatalog,
    unavailable: Option<DestinationError>,
    rejected_actions: HashMap<String, DestinationError>,
    failing_writes: HashMap<usize, DestinationError>,
    write_delay: Option<Duration>,
    schema_calls: Mutex<usize>,
    attempts: Mutex<usize>,
    records: Mutex<Vec<RecordPayload>>,
}

impl InMemoryDestination {
    /// Creates a destination exposing `catalog`.
    #[must_use]
    pub fn new(catalog: FieldCatalog) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    /// Creates a destination that cannot be reached at all.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            unavailable: Some(DestinationError::Unavailable(reason.into())),
            ..Self::default()
        }
    }

    /// Rejects writes whose title equals `action`.
    #[must_use]
    pub fn reject_action(mut self, action: impl Into<String>, message: impl Into<String>) -> Self {
        self.rejected_actions
            .insert(action.into(), DestinationError::Rejected(message.into()));
        self
    }

    /// Fails the write attempt at zero-based position `index`.
    #[must_use]
    pub fn fail_write(mut self, index: usize, error: DestinationError) -> Self {
        self.failing_writes.insert(index, error);
        self
    }

    /// Makes every write take `delay` before it resolves.
    #[must_use]
    pub fn with_write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = Some(delay);
        self
    }

    /// Returns the payloads written so far.
    #[must_use]
    pub fn records(&self) -> Vec<RecordPayload> {
        self.records.lock().clone()
    }

    /// Returns how many writes were attempted.
    #[must_use]
    pub fn write_attempts(&self) -> usize {
        *self.attempts.lock()
    }

    /// Returns how often the schema was requested.
    #[must_use]
    pub fn schema_calls(&self) -> usize {
        *self.schema_calls.lock()
    }
}

fn title_of(payload: &RecordPayload) -> Option<&str> {
    payload.properties.values().find_map(|value| match value {
        PropertyValue::Title(text) => Some(text.as_str()),
        _ => None,
    })
}

#[async_trait]
impl Destination for InMemoryDestination {
    async fn describe_schema(&self) -> Result<FieldCatalog, DestinationError> {
        *self.schema_calls.lock() += 1;
        match &self.unavailable {
            Some(error) => Err(error.clone()),
            None => Ok(self.catalog.clone()),
        }
    }

    async fn create_record(&self, payload: RecordPayload) -> Result<RecordHandle, DestinationError> {
        let attempt = {
            let mut attempts = self.attempts.lock();
            *attempts += 1;
            *attempts - 1
        };
        if let Some(delay) = self.write_delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = &self.unavailable {
            return Err(error.clone());
        }
        if let Some(error) = self.failing_writes.get(&attempt) {
            return Err(error.clone());
        }
        if let Some(error) = title_of(&payload).and_then(|title| self.rejected_actions.get(title)) {
            return Err(error.clone());
        }

        let mut records = self.records.lock();
        records.push(payload);
        Ok(RecordHandle {
            id: format!("record-{}", records.len()),
            url: None,
        })
    }
}

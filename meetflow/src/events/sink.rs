//! Event sink trait and implementations.

use super::PipelineEvent;
use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, info, Level};

/// Receives pipeline progress events.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Handles one event. Must not fail.
    async fn emit(&self, event: &PipelineEvent);
}

/// A sink that discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: &PipelineEvent) {}
}

/// Writes events to the `tracing` log.
#[derive(Debug, Clone)]
pub struct LoggingEventSink {
    level: Level,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingEventSink {
    /// Logs at `level`; anything other than `DEBUG` logs at info.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Logs at debug level.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }
}

#[async_trait]
impl EventSink for LoggingEventSink {
    async fn emit(&self, event: &PipelineEvent) {
        let stage = event.stage().map(|s| s.as_str());
        if self.level == Level::DEBUG {
            debug!(event = event.event_type(), stage, detail = ?event, "Pipeline event");
        } else {
            info!(event = event.event_type(), stage, "Pipeline event");
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: Mutex<Vec<PipelineEvent>>,
}

impl CollectingEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All events so far, in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.lock().clone()
    }

    /// Dotted names of all events so far.
    #[must_use]
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(PipelineEvent::event_type).collect()
    }

    /// Events whose dotted name starts with `prefix`.
    #[must_use]
    pub fn events_of_type(&self, prefix: &str) -> Vec<PipelineEvent> {
        self.events
            .lock()
            .iter()
            .filter(|event| event.event_type().starts_with(prefix))
            .cloned()
            .collect()
    }

    /// Number of events received.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// True if nothing was received.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

#[async_trait]
impl EventSink for CollectingEventSink {
    async fn emit(&self, event: &PipelineEvent) {
        self.events.lock().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StageName;

    #[tokio::test]
    async fn test_logging_sink_accepts_every_event() {
        let started = PipelineEvent::StageStarted {
            stage: StageName::Extract,
        };
        LoggingEventSink::debug().emit(&started).await;
        LoggingEventSink::default().emit(&started).await;
        NoOpEventSink.emit(&started).await;
    }

    #[tokio::test]
    async fn test_collecting_sink_filters_by_prefix() {
        let sink = CollectingEventSink::new();
        assert!(sink.is_empty());

        sink.emit(&PipelineEvent::PipelineStarted { audio: "a.mp3".into() }).await;
        sink.emit(&PipelineEvent::StageStarted { stage: StageName::Transcribe }).await;
        sink.emit(&PipelineEvent::StageCompleted {
            stage: StageName::Transcribe,
            duration_ms: 1.0,
        })
        .await;

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.events_of_type("stage.").len(), 2);
        assert_eq!(
            sink.event_types(),
            vec!["pipeline.started", "stage.started", "stage.completed"]
        );
    }
}

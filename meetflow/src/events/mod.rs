//! Pipeline progress events.
//!
//! The orchestrator reports every stage transition as a [`PipelineEvent`] to
//! an [`EventSink`]. Events are observational only; a sink can never affect a
//! job's outcome.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

use crate::core::StageName;
use crate::errors::PipelineError;
use crate::sync::SyncStatus;
use serde::Serialize;

/// Something that happened while a job ran.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// A job began running.
    PipelineStarted {
        /// The input audio path.
        audio: String,
    },
    /// A stage began.
    StageStarted {
        /// The stage.
        stage: StageName,
    },
    /// A stage produced its output.
    StageCompleted {
        /// The stage.
        stage: StageName,
        /// Wall time spent in the stage.
        duration_ms: f64,
    },
    /// A stage failed and the job is aborting.
    StageFailed {
        /// The stage.
        stage: StageName,
        /// Machine-readable error code.
        code: String,
        /// Human-readable cause.
        message: String,
        /// Wall time spent in the stage.
        duration_ms: f64,
    },
    /// The job stopped because its token was cancelled.
    PipelineCancelled {
        /// The stage that was about to start.
        stage: StageName,
        /// The cancellation reason.
        reason: String,
    },
    /// Every stage finished.
    PipelineCompleted {
        /// Number of action items in the record.
        todos: usize,
        /// Sync status, absent when sync was skipped.
        sync: Option<SyncStatus>,
    },
    /// The job failed.
    PipelineFailed {
        /// The failing stage.
        stage: StageName,
        /// Machine-readable error code.
        code: String,
        /// Human-readable cause.
        message: String,
    },
}

impl PipelineEvent {
    /// Builds a stage failure event from the error that caused it.
    #[must_use]
    pub fn stage_failed(err: &PipelineError, duration_ms: f64) -> Self {
        Self::StageFailed {
            stage: err.stage,
            code: err.cause.code().to_string(),
            message: err.cause.to_string(),
            duration_ms,
        }
    }

    /// Builds a job failure event.
    #[must_use]
    pub fn pipeline_failed(err: &PipelineError) -> Self {
        Self::PipelineFailed {
            stage: err.stage,
            code: err.cause.code().to_string(),
            message: err.cause.to_string(),
        }
    }

    /// Dotted event name, e.g. `stage.started`.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::PipelineStarted { .. } => "pipeline.started",
            Self::StageStarted { .. } => "stage.started",
            Self::StageCompleted { .. } => "stage.completed",
            Self::StageFailed { .. } => "stage.failed",
            Self::PipelineCancelled { .. } => "pipeline.cancelled",
            Self::PipelineCompleted { .. } => "pipeline.completed",
            Self::PipelineFailed { .. } => "pipeline.failed",
        }
    }

    /// The stage the event is about, if any.
    #[must_use]
    pub fn stage(&self) -> Option<StageName> {
        match self {
            Self::StageStarted { stage }
            | Self::StageCompleted { stage, .. }
            | Self::StageFailed { stage, .. }
            | Self::PipelineCancelled { stage, .. }
            | Self::PipelineFailed { stage, .. } => Some(*stage),
            Self::PipelineStarted { .. } | Self::PipelineCompleted { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::UpstreamError;

    #[test]
    fn test_stage_failed_from_error() {
        let err = PipelineError::new(
            StageName::Analyze,
            UpstreamError::transport("completion", "connection reset"),
        );

        let event = PipelineEvent::stage_failed(&err, 12.5);

        assert_eq!(event.event_type(), "stage.failed");
        assert_eq!(event.stage(), Some(StageName::Analyze));
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            serde_json::json!({
                "type": "stage_failed",
                "stage": "analyze",
                "code": "UPSTREAM_SERVICE_ERROR",
                "message": "completion: connection reset",
                "duration_ms": 12.5,
            })
        );
    }

    #[test]
    fn test_pipeline_events_have_no_stage() {
        let event = PipelineEvent::PipelineCompleted {
            todos: 2,
            sync: Some(SyncStatus::Partial),
        };
        assert_eq!(event.stage(), None);
        assert_eq!(event.event_type(), "pipeline.completed");
    }
}

//! Error types for meetflow.
//!
//! Errors are grouped by how far they propagate: stage-scoped errors abort a
//! single job, destination errors only affect synchronization, and registry
//! errors signal misuse of the task state machine.

use crate::core::{JobId, StageName, TaskState};
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for meetflow operations.
#[derive(Debug, Error)]
pub enum MeetflowError {
    /// A referenced resource does not exist.
    #[error("{0}")]
    NotFound(#[from] ResourceNotFound),

    /// An upstream AI service failed.
    #[error("{0}")]
    Upstream(#[from] UpstreamError),

    /// A canonical record failed validation.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The destination system could not be used.
    #[error("{0}")]
    Destination(#[from] DestinationError),

    /// A task state transition was rejected.
    #[error("{0}")]
    InvalidTransition(#[from] InvalidTransitionError),

    /// A pipeline stage failed.
    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error raised when an audio file or a job cannot be found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceNotFound {
    /// The input audio file does not exist.
    #[error("Audio file not found: {}", path.display())]
    Audio {
        /// The missing path.
        path: PathBuf,
    },

    /// No job with this identifier was ever submitted.
    #[error("Job not found: {id}")]
    Job {
        /// The unknown job id.
        id: JobId,
    },
}

impl ResourceNotFound {
    /// Creates a missing-audio error.
    #[must_use]
    pub fn audio(path: impl Into<PathBuf>) -> Self {
        Self::Audio { path: path.into() }
    }

    /// Creates an unknown-job error.
    #[must_use]
    pub fn job(id: JobId) -> Self {
        Self::Job { id }
    }
}

/// Failure reported by the transcription or completion collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// The collaborator could not find the resource it was asked about.
    #[error("{service}: resource not found: {resource}")]
    NotFound {
        /// Service name.
        service: String,
        /// The missing resource.
        resource: String,
    },

    /// Transport or service-side failure.
    #[error("{service}: {message}")]
    Transport {
        /// Service name.
        service: String,
        /// Failure description.
        message: String,
    },
}

impl UpstreamError {
    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(service: impl Into<String>, resource: impl Into<String>) -> Self {
        Self::NotFound {
            service: service.into(),
            resource: resource.into(),
        }
    }

    /// Creates a transport error.
    #[must_use]
    pub fn transport(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            service: service.into(),
            message: message.into(),
        }
    }
}

/// Error raised when a canonical record violates its invariants.
///
/// All violations found are collected, not just the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation failed: {}", violations.join("; "))]
pub struct ValidationError {
    /// One human-readable entry per violated invariant.
    pub violations: Vec<String>,
}

impl ValidationError {
    /// Creates a validation error from a list of violations.
    #[must_use]
    pub fn new(violations: Vec<String>) -> Self {
        Self { violations }
    }
}

/// Errors returned by the destination record store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DestinationError {
    /// No connection could be established.
    #[error("Destination unavailable: {0}")]
    Unavailable(String),

    /// The destination rejected the credentials.
    #[error("Destination unauthorized: {0}")]
    Unauthorized(String),

    /// A single write was rejected.
    #[error("Destination rejected write: {0}")]
    Rejected(String),
}

impl DestinationError {
    /// Returns true if the error means nothing can be written at all.
    #[must_use]
    pub fn is_connection_level(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Unauthorized(_))
    }
}

/// Error raised when a job is asked to move to a state it cannot reach.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid transition for job {job_id}: {from} -> {to}")]
pub struct InvalidTransitionError {
    /// The job.
    pub job_id: JobId,
    /// The state the job is in.
    pub from: TaskState,
    /// The requested state.
    pub to: TaskState,
}

/// A stage-scoped failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageError {
    /// The stage input does not exist.
    #[error("{0}")]
    NotFound(#[from] ResourceNotFound),

    /// The stage's upstream call failed.
    #[error("{0}")]
    Upstream(#[from] UpstreamError),

    /// The stage output failed validation.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The job was cancelled before the stage started.
    #[error("Cancelled: {0}")]
    Cancelled(String),
}

impl StageError {
    /// Returns a stable machine-readable code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "RESOURCE_NOT_FOUND",
            Self::Upstream(_) => "UPSTREAM_SERVICE_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Cancelled(_) => "CANCELLED",
        }
    }
}

/// A stage failure tagged with the stage that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Stage '{stage}' failed: {cause}")]
pub struct PipelineError {
    /// The failing stage.
    pub stage: StageName,
    /// What went wrong.
    pub cause: StageError,
}

impl PipelineError {
    /// Creates a new pipeline error.
    #[must_use]
    pub fn new(stage: StageName, cause: impl Into<StageError>) -> Self {
        Self {
            stage,
            cause: cause.into(),
        }
    }
}

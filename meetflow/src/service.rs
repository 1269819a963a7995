//! Job submission and status boundary.
//!
//! `submit` returns immediately and runs the pipeline on a spawned tokio
//! task. Callers learn the outcome only by polling `status`.

use crate::cancellation::CancellationToken;
use crate::core::{JobId, JobInput, TaskState};
use crate::errors::ResourceNotFound;
use crate::pipeline::{CanonicalOutput, MeetingPipeline};
use crate::registry::TaskRegistry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinError;
use tracing::{error, info, info_span, warn, Instrument};

/// What a status query returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatusView {
    /// Current state.
    pub status: TaskState,
    /// Output of a completed job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<CanonicalOutput>,
    /// Error of a failed job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Submits jobs and reports on them.
#[derive(Debug, Clone)]
pub struct JobService {
    registry: Arc<TaskRegistry>,
    pipeline: Arc<MeetingPipeline>,
    tokens: Arc<DashMap<JobId, Arc<CancellationToken>>>,
}

impl JobService {
    /// Creates a service backed by `registry`.
    #[must_use]
    pub fn new(registry: Arc<TaskRegistry>, pipeline: Arc<MeetingPipeline>) -> Self {
        Self {
            registry,
            pipeline,
            tokens: Arc::new(DashMap::new()),
        }
    }

    /// The registry jobs are tracked in.
    #[must_use]
    pub fn registry(&self) -> &Arc<TaskRegistry> {
        &self.registry
    }

    /// Registers a job and starts processing it in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, input: JobInput) -> JobId {
        let id = self.registry.submit(input.clone());
        let token = Arc::new(CancellationToken::new());
        self.tokens.insert(id, token.clone());
        info!(job_id = %id, audio = ?input.audio, "Job accepted");

        let registry = self.registry.clone();
        let pipeline = self.pipeline.clone();
        let tokens = self.tokens.clone();
        tokio::spawn(
            async move {
                process(&registry, pipeline, id, input, token).await;
                tokens.remove(&id);
            }
            .instrument(info_span!("job", job_id = %id)),
        );
        id
    }

    /// Returns the current status of a job.
    pub fn status(&self, id: JobId) -> Result<JobStatusView, ResourceNotFound> {
        let job = self.registry.get(id)?;
        Ok(JobStatusView {
            status: job.state,
            result: job.result,
            error: job.error,
        })
    }

    /// Requests cancellation of a running job.
    ///
    /// Returns true when the request was recorded. Cancellation is checked
    /// before each stage, so a job already inside its last stage still
    /// completes. Returns false if the job already finished or was already
    /// cancelled.
    pub fn cancel(&self, id: JobId, reason: impl Into<String>) -> Result<bool, ResourceNotFound> {
        if self.registry.get(id)?.state.is_terminal() {
            return Ok(false);
        }
        Ok(self
            .tokens
            .get(&id)
            .is_some_and(|token| token.cancel(reason)))
    }
}

async fn process(
    registry: &TaskRegistry,
    pipeline: Arc<MeetingPipeline>,
    id: JobId,
    input: JobInput,
    token: Arc<CancellationToken>,
) {
    if let Err(e) = registry.mark_processing(id) {
        warn!(error = %e, "Job could not start");
        return;
    }

    let run = tokio::spawn(async move { pipeline.run(input, &token).await }.in_current_span());
    let outcome = match run.await {
        Ok(Ok(output)) => registry.mark_completed(id, output),
        Ok(Err(e)) => {
            warn!(error = %e, "Job failed");
            registry.mark_failed(id, e.to_string())
        }
        Err(e) => {
            let message = worker_failure(e);
            error!(error = %message, "Job worker stopped unexpectedly");
            registry.mark_failed(id, message)
        }
    };
    if let Err(e) = outcome {
        warn!(error = %e, "Job result could not be recorded");
    }
}

fn worker_failure(error: JoinError) -> String {
    if !error.is_panic() {
        return "worker aborted".to_string();
    }
    let payload = error.into_panic();
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("worker panicked: {detail}")
}

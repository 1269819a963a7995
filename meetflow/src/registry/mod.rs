//! In-memory task registry.
//!
//! The registry is the only state shared between concurrently running jobs.
//! It is sharded by job id, so mutating one job never blocks another, and no
//! lock is held across an `.await`.

mod job;

pub use job::Job;

use crate::core::{JobId, JobInput, TaskState};
use crate::errors::{InvalidTransitionError, MeetflowError, ResourceNotFound};
use crate::pipeline::CanonicalOutput;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Tracks every submitted job through its state machine.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    jobs: DashMap<JobId, Job>,
}

impl TaskRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new pending job and returns its id.
    pub fn submit(&self, input: JobInput) -> JobId {
        loop {
            let id = JobId::new();
            match self.jobs.entry(id) {
                Entry::Occupied(_) => continue,
                Entry::Vacant(slot) => {
                    slot.insert(Job::new(id, input));
                    debug!(job_id = %id, "Job submitted");
                    return id;
                }
            }
        }
    }

    /// Moves a pending job to processing.
    pub fn mark_processing(&self, id: JobId) -> Result<(), MeetflowError> {
        self.transition(id, TaskState::Processing, |_| {})
    }

    /// Moves a processing job to completed with its output.
    pub fn mark_completed(&self, id: JobId, output: CanonicalOutput) -> Result<(), MeetflowError> {
        self.transition(id, TaskState::Completed, |job| job.result = Some(output))
    }

    /// Moves a processing job to failed with an error description.
    ///
    /// A blank description is replaced so failed jobs always explain themselves.
    pub fn mark_failed(&self, id: JobId, error: impl Into<String>) -> Result<(), MeetflowError> {
        let mut error = error.into();
        if error.trim().is_empty() {
            error = "unknown error".to_string();
        }
        self.transition(id, TaskState::Failed, |job| job.error = Some(error))
    }

    /// Returns a point-in-time copy of a job.
    pub fn get(&self, id: JobId) -> Result<Job, ResourceNotFound> {
        self.jobs
            .get(&id)
            .map(|job| job.clone())
            .ok_or_else(|| ResourceNotFound::job(id))
    }

    /// Returns the number of jobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Returns true if no job was ever submitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Counts jobs per state.
    #[must_use]
    pub fn count_by_state(&self) -> HashMap<TaskState, usize> {
        let mut counts = HashMap::new();
        for job in &self.jobs {
            *counts.entry(job.state).or_insert(0) += 1;
        }
        counts
    }

    fn transition(
        &self,
        id: JobId,
        to: TaskState,
        apply: impl FnOnce(&mut Job),
    ) -> Result<(), MeetflowError> {
        let mut job = self.jobs.get_mut(&id).ok_or_else(|| ResourceNotFound::job(id))?;
        let from = job.state;
        if !from.can_transition_to(to) {
            warn!(job_id = %id, %from, %to, "Rejected task state transition");
            return Err(InvalidTransitionError { job_id: id, from, to }.into());
        }

        job.state = to;
        job.updated_at = Utc::now();
        apply(&mut *job);
        debug!(job_id = %id, %from, %to, "Task state changed");
        Ok(())
    }
}

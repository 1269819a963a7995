//! Destination publishing stage.

use super::Stage;
use crate::core::StageName;
use crate::errors::StageError;
use crate::record::MeetingResult;
use crate::sync::{SyncEngine, SyncOutcome};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// Publishes a validated record.
///
/// Never fails the job: an unusable destination turns into
/// [`SyncOutcome::Skipped`].
#[derive(Debug, Clone)]
pub struct SyncStage {
    engine: Result<Arc<SyncEngine>, String>,
}

impl SyncStage {
    /// Creates a stage that writes through `engine`.
    #[must_use]
    pub fn new(engine: Arc<SyncEngine>) -> Self {
        Self { engine: Ok(engine) }
    }

    /// Creates a stage that always skips, e.g. when no destination is configured.
    #[must_use]
    pub fn disabled(reason: impl Into<String>) -> Self {
        Self {
            engine: Err(reason.into()),
        }
    }
}

#[async_trait]
impl Stage for SyncStage {
    type Input = MeetingResult;
    type Output = (MeetingResult, SyncOutcome);

    fn name(&self) -> StageName {
        StageName::Sync
    }

    async fn execute(
        &self,
        record: MeetingResult,
    ) -> Result<(MeetingResult, SyncOutcome), StageError> {
        let outcome = match &self.engine {
            Err(reason) => {
                warn!(reason = %reason, "Skipping destination sync");
                SyncOutcome::Skipped {
                    reason: reason.clone(),
                }
            }
            Ok(engine) => match engine.sync(&record).await {
                Ok(report) => SyncOutcome::Attempted(report),
                Err(e) => {
                    warn!(error = %e, "Destination sync could not start");
                    SyncOutcome::Skipped {
                        reason: e.to_string(),
                    }
                }
            },
        };
        Ok((record, outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_stage_skips() {
        let stage = SyncStage::disabled("destination not configured");

        let (record, outcome) = stage.execute(MeetingResult::default()).await.unwrap();

        assert_eq!(record, MeetingResult::default());
        assert_eq!(
            outcome,
            SyncOutcome::Skipped {
                reason: "destination not configured".into()
            }
        );
    }
}

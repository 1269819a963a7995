//! Runs the stage sequence for one job.

use super::CanonicalOutput;
use crate::cancellation::CancellationToken;
use crate::config::FieldNames;
use crate::core::JobInput;
use crate::destination::Destination;
use crate::errors::{PipelineError, StageError};
use crate::events::{EventSink, NoOpEventSink, PipelineEvent};
use crate::observability::StageTimer;
use crate::providers::{CompletionClient, Transcriber};
use crate::stages::{
    AnalysisStage, ExtractionStage, MeetingContext, Stage, StructureInput, StructuringStage,
    SummarizationStage, SyncStage, TranscriptionStage,
};
use crate::sync::SyncEngine;
use std::sync::Arc;
use tracing::{error, info, warn};

/// The fixed meeting pipeline.
///
/// Stages run strictly in order: transcribe, analyze, summarize, extract,
/// structure, sync. The first failing stage aborts the run. Cancellation is
/// checked before each stage starts.
pub struct MeetingPipeline {
    transcribe: TranscriptionStage,
    analyze: AnalysisStage,
    summarize: SummarizationStage,
    extract: ExtractionStage,
    structure: StructuringStage,
    sync: SyncStage,
    events: Arc<dyn EventSink>,
}

impl std::fmt::Debug for MeetingPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeetingPipeline")
            .field("transcribe", &self.transcribe)
            .field("analyze", &self.analyze)
            .field("sync", &self.sync)
            .finish_non_exhaustive()
    }
}

impl MeetingPipeline {
    /// Creates a pipeline with sync disabled and events discarded.
    #[must_use]
    pub fn new(transcriber: Arc<dyn Transcriber>, completion: Arc<dyn CompletionClient>) -> Self {
        Self {
            transcribe: TranscriptionStage::new(transcriber),
            analyze: AnalysisStage::new(completion.clone()),
            summarize: SummarizationStage::new(completion.clone()),
            extract: ExtractionStage::new(completion),
            structure: StructuringStage,
            sync: SyncStage::disabled("no destination configured"),
            events: Arc::new(NoOpEventSink),
        }
    }

    /// Publishes records through `engine`.
    #[must_use]
    pub fn with_sync_engine(self, engine: Arc<SyncEngine>) -> Self {
        self.with_sync(SyncStage::new(engine))
    }

    /// Replaces the sync stage.
    #[must_use]
    pub fn with_sync(mut self, sync: SyncStage) -> Self {
        self.sync = sync;
        self
    }

    /// Sends progress events to `events`.
    #[must_use]
    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Discovers the destination schema and enables sync.
    ///
    /// An unreachable destination does not fail: every job then completes
    /// with a skipped sync.
    pub async fn connect_destination(
        self,
        destination: Arc<dyn Destination>,
        names: &FieldNames,
    ) -> Self {
        match SyncEngine::connect(destination, names).await {
            Ok(engine) => self.with_sync_engine(Arc::new(engine)),
            Err(e) => {
                warn!(error = %e, "Destination unavailable, sync disabled");
                self.with_sync(SyncStage::disabled(e.to_string()))
            }
        }
    }

    /// Runs every stage for one job.
    pub async fn run(
        &self,
        input: JobInput,
        cancel: &CancellationToken,
    ) -> Result<CanonicalOutput, PipelineError> {
        self.events
            .emit(&PipelineEvent::PipelineStarted {
                audio: input.audio.display().to_string(),
            })
            .await;

        let result = self.run_stages(input, cancel).await;

        let event = match &result {
            Ok(output) => {
                info!(todos = output.record.todos.len(), "Pipeline completed");
                PipelineEvent::PipelineCompleted {
                    todos: output.record.todos.len(),
                    sync: output.sync.report().map(|r| r.status),
                }
            }
            Err(e) => PipelineEvent::pipeline_failed(e),
        };
        self.events.emit(&event).await;
        result
    }

    async fn run_stages(
        &self,
        input: JobInput,
        cancel: &CancellationToken,
    ) -> Result<CanonicalOutput, PipelineError> {
        let transcript = self.run_stage(&self.transcribe, input, cancel).await?;
        let analysis = self
            .run_stage(&self.analyze, transcript.clone(), cancel)
            .await?;

        let ctx = MeetingContext::new(transcript, analysis);
        let summary = self.run_stage(&self.summarize, ctx.clone(), cancel).await?;
        let extracted = self.run_stage(&self.extract, ctx, cancel).await?;

        let record = self
            .run_stage(&self.structure, StructureInput { summary, extracted }, cancel)
            .await?;
        let (record, sync) = self.run_stage(&self.sync, record, cancel).await?;

        Ok(CanonicalOutput { record, sync })
    }

    async fn run_stage<S: Stage>(
        &self,
        stage: &S,
        input: S::Input,
        cancel: &CancellationToken,
    ) -> Result<S::Output, PipelineError> {
        let name = stage.name();

        if let Some(reason) = cancel.reason() {
            info!(stage = %name, reason = %reason, "Pipeline cancelled");
            self.events
                .emit(&PipelineEvent::PipelineCancelled {
                    stage: name,
                    reason: reason.to_string(),
                })
                .await;
            return Err(PipelineError::new(
                name,
                StageError::Cancelled(reason.to_string()),
            ));
        }

        self.events
            .emit(&PipelineEvent::StageStarted { stage: name })
            .await;
        let timer = StageTimer::start(name);

        match stage.execute(input).await {
            Ok(output) => {
                self.events
                    .emit(&PipelineEvent::StageCompleted {
                        stage: name,
                        duration_ms: timer.elapsed_ms(),
                    })
                    .await;
                Ok(output)
            }
            Err(cause) => {
                let err = PipelineError::new(name, cause);
                error!(stage = %name, error = %err, "Stage failed");
                self.events
                    .emit(&PipelineEvent::stage_failed(&err, timer.elapsed_ms()))
                    .await;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StageName;
    use crate::errors::{ResourceNotFound, UpstreamError};
    use crate::events::CollectingEventSink;
    use crate::stages::prompts;
    use crate::sync::{SyncOutcome, SyncStatus};
    use crate::testing::{
        default_catalog, meeting_assistant, InMemoryDestination, ScriptedCompletion,
        ScriptedTranscriber, SAMPLE_SUMMARY, SAMPLE_TRANSCRIPT,
    };
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn pipeline(completion: ScriptedCompletion) -> MeetingPipeline {
        MeetingPipeline::new(
            Arc::new(ScriptedTranscriber::new(SAMPLE_TRANSCRIPT)),
            Arc::new(completion),
        )
    }

    fn sample_input() -> JobInput {
        JobInput::with_transcript("meeting.mp3", SAMPLE_TRANSCRIPT)
    }

    #[tokio::test]
    async fn test_runs_all_stages_in_order() {
        let events = Arc::new(CollectingEventSink::new());
        let pipeline = pipeline(meeting_assistant()).with_event_sink(events.clone());

        let output = pipeline
            .run(sample_input(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(output.record.summary, SAMPLE_SUMMARY);
        assert_eq!(output.record.todos.len(), 3);
        assert_eq!(
            output.sync,
            SyncOutcome::Skipped {
                reason: "no destination configured".into()
            }
        );

        let started: Vec<StageName> = events
            .events_of_type("stage.started")
            .iter()
            .filter_map(PipelineEvent::stage)
            .collect();
        assert_eq!(started, StageName::ORDER.to_vec());
        assert_eq!(events.events_of_type("stage.completed").len(), 6);
        assert_eq!(events.events_of_type("pipeline.completed").len(), 1);
    }

    #[tokio::test]
    async fn test_summary_and_extraction_see_transcript_and_analysis() {
        let completion = Arc::new(meeting_assistant());
        let pipeline = MeetingPipeline::new(
            Arc::new(ScriptedTranscriber::new("unused")),
            completion.clone(),
        );

        pipeline
            .run(sample_input(), &CancellationToken::new())
            .await
            .unwrap();

        let requests = completion.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].system_prompt, prompts::ANALYSIS_SYSTEM);
        for request in &requests[1..] {
            assert!(request.user_content.contains(SAMPLE_TRANSCRIPT));
            assert!(request.user_content.contains("로그인 버그 수정(담당: Sarah)"));
        }
    }

    #[tokio::test]
    async fn test_missing_audio_fails_transcribe_stage() {
        let events = Arc::new(CollectingEventSink::new());
        let pipeline = pipeline(meeting_assistant()).with_event_sink(events.clone());

        let err = pipeline
            .run(JobInput::audio("/no/such/file.mp3"), &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.stage, StageName::Transcribe);
        assert_eq!(
            err.cause,
            StageError::NotFound(ResourceNotFound::audio("/no/such/file.mp3"))
        );
        let failed = events.events_of_type("stage.failed");
        assert_eq!(failed.len(), 1);
        assert!(matches!(
            &failed[0],
            PipelineEvent::StageFailed { stage: StageName::Transcribe, code, .. }
                if code == "RESOURCE_NOT_FOUND"
        ));
        assert!(events.events_of_type("stage.completed").is_empty());
    }

    #[tokio::test]
    async fn test_upstream_failure_stops_later_stages() {
        let completion = Arc::new(
            ScriptedCompletion::new()
                .respond_to(prompts::ANALYSIS_SYSTEM, "analysis")
                .fail_on(
                    prompts::SUMMARY_SYSTEM,
                    UpstreamError::transport("completion", "rate limited"),
                ),
        );
        let pipeline =
            MeetingPipeline::new(Arc::new(ScriptedTranscriber::new("x")), completion.clone());

        let err = pipeline
            .run(sample_input(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.stage, StageName::Summarize);
        assert_eq!(
            err.to_string(),
            "Stage 'summarize' failed: completion: rate limited"
        );
        assert_eq!(completion.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_summary_fails_validation() {
        let completion = ScriptedCompletion::new()
            .respond_to(prompts::ANALYSIS_SYSTEM, "analysis")
            .respond_to(prompts::SUMMARY_SYSTEM, "   ")
            .respond_to(prompts::EXTRACTION_SYSTEM, "{}");

        let err = pipeline(completion)
            .run(sample_input(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.stage, StageName::Structure);
        assert_eq!(err.cause.code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_cancelled_token_stops_before_first_stage() {
        let transcriber = Arc::new(ScriptedTranscriber::new("x"));
        let completion = Arc::new(meeting_assistant());
        let pipeline = MeetingPipeline::new(transcriber, completion.clone());
        let token = CancellationToken::new();
        token.cancel("user request");

        let err = pipeline.run(sample_input(), &token).await.unwrap_err();

        assert_eq!(err.stage, StageName::Transcribe);
        assert_eq!(err.cause, StageError::Cancelled("user request".into()));
        assert!(completion.requests().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_between_stages_skips_the_rest() {
        let events = Arc::new(CollectingEventSink::new());
        let token = Arc::new(CancellationToken::new());
        let completion = Arc::new(meeting_assistant().with_delay(Duration::from_millis(50)));
        let pipeline = MeetingPipeline::new(Arc::new(ScriptedTranscriber::new("x")), completion.clone())
            .with_event_sink(events.clone());

        let canceller = {
            let token = token.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                token.cancel("shutdown")
            })
        };
        let err = pipeline.run(sample_input(), &token).await.unwrap_err();
        assert!(canceller.await.unwrap());

        assert_eq!(err.stage, StageName::Summarize);
        assert_eq!(completion.requests().len(), 1);
        assert_eq!(
            events.events_of_type("pipeline.cancelled"),
            vec![PipelineEvent::PipelineCancelled {
                stage: StageName::Summarize,
                reason: "shutdown".into(),
            }]
        );
    }

    #[tokio::test]
    async fn test_connect_destination_enables_sync() {
        let destination = Arc::new(InMemoryDestination::new(default_catalog()));
        let pipeline = pipeline(meeting_assistant())
            .connect_destination(destination.clone(), &FieldNames::default())
            .await;

        let output = pipeline
            .run(sample_input(), &CancellationToken::new())
            .await
            .unwrap();

        let report = output.sync.report().unwrap();
        assert_eq!(report.status, SyncStatus::Complete);
        assert_eq!(report.succeeded, 3);
        assert_eq!(destination.records().len(), 3);
        assert_eq!(destination.schema_calls(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_destination_skips_sync() {
        let destination = Arc::new(InMemoryDestination::unavailable("connection refused"));
        let pipeline = pipeline(meeting_assistant())
            .connect_destination(destination, &FieldNames::default())
            .await;

        let output = pipeline
            .run(sample_input(), &CancellationToken::new())
            .await
            .unwrap();

        assert!(matches!(output.sync, SyncOutcome::Skipped { .. }));
        assert_eq!(output.record.todos.len(), 3);
    }
}

//! Canned meeting data for tests and demos.

use std::time::Duration;

use crate::core::JobId;
use crate::destination::{FieldCatalog, FieldType};
use crate::registry::Job;
use crate::service::JobService;
use crate::stages::prompts;

use super::ScriptedCompletion;

/// A short English stand-up transcript.
pub const SAMPLE_TRANSCRIPT: &str = "John: Good morning. Let's go through this week's items. \
Sarah, the login bug on the staging server is still open. \
Sarah: I'll have it fixed by tomorrow. \
John: Mike, how is the quarterly report going? \
Mike: I'll send the draft by Friday. \
John: Good. Sarah, please also find a slot for the client meeting next week. \
Sarah: Will do.";

/// Canned analysis response.
pub const SAMPLE_ANALYSIS: &str = "회의는 로그인 버그 수정(담당: Sarah)과 분기 보고서(담당: Mike)에 집중되었습니다. \
다음 주 클라이언트 미팅 일정도 논의되었습니다.";

/// Canned summary response.
pub const SAMPLE_SUMMARY: &str = "스테이징 서버의 로그인 버그 수정과 분기 보고서 마감 일정이 결정되었습니다. \
Sarah는 내일까지 버그를 수정하고 Mike는 금요일까지 보고서 초안을 제출합니다. \
다음 주 클라이언트 미팅 일정도 조율하기로 했습니다.";

/// Canned extraction response with three action items.
pub const SAMPLE_EXTRACTION: &str = r#"{
  "meeting_title": "주간 업무 회의",
  "meeting_date": "2026-01-24",
  "participants": ["John", "Sarah", "Mike"],
  "todos": [
    {"action": "로그인 버그 수정", "description": "스테이징 서버 로그인 버그 수정", "owner": "Sarah", "due": "2026-01-25"},
    {"action": "분기 보고서 작성", "description": "분기 보고서 초안 작성 및 제출", "owner": "Mike", "due": "2026-01-30"},
    {"action": "클라이언트 미팅 조율", "description": "클라이언트 가능 시간 확인 및 초대장 발송", "owner": "Sarah", "due": null}
  ]
}"#;

/// A completion client scripted with the sample meeting.
#[must_use]
pub fn meeting_assistant() -> ScriptedCompletion {
    ScriptedCompletion::new()
        .respond_to(prompts::ANALYSIS_SYSTEM, SAMPLE_ANALYSIS)
        .respond_to(prompts::SUMMARY_SYSTEM, SAMPLE_SUMMARY)
        .respond_to(prompts::EXTRACTION_SYSTEM, SAMPLE_EXTRACTION)
}

/// A transcript with exactly two commitments.
pub const TWO_COMMITMENT_TRANSCRIPT: &str = "John: Sarah will fix the login bug by tomorrow. \
Mike will send the report by Friday.";

/// Canned extraction for [`TWO_COMMITMENT_TRANSCRIPT`].
pub const TWO_COMMITMENT_EXTRACTION: &str = r#"{
  "meeting_title": "버그 및 보고서 점검",
  "meeting_date": "2026-01-24",
  "participants": ["John", "Sarah", "Mike"],
  "todos": [
    {"action": "로그인 버그 수정", "description": "내일까지 로그인 버그 수정", "owner": "Sarah", "due": "2026-01-25"},
    {"action": "보고서 발송", "description": "금요일까지 보고서 발송", "owner": "Mike", "due": "2026-01-30"}
  ]
}"#;

/// A completion client scripted with the two-commitment meeting.
#[must_use]
pub fn two_commitment_assistant() -> ScriptedCompletion {
    ScriptedCompletion::new()
        .respond_to(prompts::ANALYSIS_SYSTEM, "Sarah는 로그인 버그를, Mike는 보고서를 맡았습니다.")
        .respond_to(prompts::SUMMARY_SYSTEM, "Sarah는 내일까지 로그인 버그를 수정하고 Mike는 금요일까지 보고서를 보냅니다.")
        .respond_to(prompts::EXTRACTION_SYSTEM, TWO_COMMITMENT_EXTRACTION)
}

/// A catalog matching the default field names.
#[must_use]
pub fn default_catalog() -> FieldCatalog {
    [
        ("Name", FieldType::Title),
        ("Meeting Title", FieldType::RichText),
        ("Description", FieldType::RichText),
        ("Participants", FieldType::RichText),
        ("Assignee", FieldType::RichText),
        ("Meeting Date", FieldType::Date),
        ("Due Date", FieldType::Date),
    ]
    .into_iter()
    .map(|(name, field_type)| (name.to_string(), field_type))
    .collect()
}

/// Polls until the job reaches a terminal state.
///
/// # Panics
///
/// Panics if the job is unknown or still running after five seconds.
pub async fn wait_for_terminal(service: &JobService, id: JobId) -> Job {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let job = service
            .registry()
            .get(id)
            .unwrap_or_else(|e| panic!("{e}"));
        if job.state.is_terminal() {
            return job;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "job {id} did not finish in time"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

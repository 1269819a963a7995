//! Prompts sent to the completion service.

/// System prompt for the analysis stage.
pub const ANALYSIS_SYSTEM: &str = "You are a senior business analyst reviewing a meeting transcript. \
Identify the main topics, the decisions that were made and how the discussion progressed. \
Answer with a concise analysis written in Korean.";

/// System prompt for the summarization stage.
pub const SUMMARY_SYSTEM: &str = "You are an executive assistant writing a meeting report. \
Using the transcript and its analysis, write a professional summary of three to five sentences. \
The summary must be written in Korean.";

/// System prompt for the extraction stage.
pub const EXTRACTION_SYSTEM: &str = "You extract action items from meetings. \
Respond with one valid JSON object and nothing else. Text values must be in Korean.";

/// Output contract appended to the extraction request.
pub const EXTRACTION_FORMAT: &str = r#"Extract the meeting metadata and every actionable task.

Respond with this JSON shape:
{
  "meeting_title": "short inferred title",
  "meeting_date": "YYYY-MM-DD or null",
  "participants": ["name", "..."],
  "todos": [
    {
      "action": "short task title",
      "description": "task details",
      "owner": "assignee name or null",
      "due": "YYYY-MM-DD or null"
    }
  ]
}

Rules:
1. "action" is a short title; "description" carries the context.
2. List everyone who spoke or was mentioned as a participant.
3. Dates must be exactly YYYY-MM-DD. Use null for vague dates such as "next week"."#;

/// Builds the summarization request body.
#[must_use]
pub fn summary_request(transcript: &str, analysis: &str) -> String {
    format!("Context analysis: {analysis}\n\nTranscript: {transcript}")
}

/// Builds the extraction request body.
#[must_use]
pub fn extraction_request(transcript: &str, analysis: &str) -> String {
    format!("{EXTRACTION_FORMAT}\n\nContext: {analysis}\nTranscript: {transcript}")
}

//! Normalization and validation of meeting records.

use super::{ExtractedData, MeetingInfo, MeetingResult, RawTodo, TodoItem};
use crate::errors::ValidationError;

/// Title used when extraction produced none.
pub const UNTITLED_MEETING: &str = "Untitled Meeting";

/// Converts a summary and loose extraction output into a canonical record.
///
/// Never fails: every missing field has a fallback. Blank optional strings are
/// treated as absent.
#[must_use]
pub fn normalize(summary: &str, extracted: ExtractedData) -> MeetingResult {
    let title = non_blank(extracted.meeting_title).unwrap_or_else(|| UNTITLED_MEETING.to_string());

    let participants = extracted
        .participants
        .unwrap_or_default()
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();

    let todos = extracted
        .todos
        .unwrap_or_default()
        .into_iter()
        .map(normalize_todo)
        .collect();

    MeetingResult {
        summary: summary.trim().to_string(),
        meeting_info: MeetingInfo {
            title: Some(title),
            date: non_blank(extracted.meeting_date),
            participants,
        },
        todos,
    }
}

fn normalize_todo(raw: RawTodo) -> TodoItem {
    TodoItem {
        action: raw.action.map(|a| a.trim().to_string()).unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        owner: non_blank(raw.owner),
        due: non_blank(raw.due),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Checks the canonical record invariants.
///
/// Reports every violation, not only the first.
pub fn validate(record: &MeetingResult) -> Result<(), ValidationError> {
    let mut violations = Vec::new();

    if record.summary.trim().is_empty() {
        violations.push("summary is empty".to_string());
    }

    for (index, todo) in record.todos.iter().enumerate() {
        if todo.action.trim().is_empty() {
            violations.push(format!("todos[{index}].action is empty"));
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(violations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw(action: Option<&str>) -> RawTodo {
        RawTodo {
            action: action.map(str::to_string),
            ..RawTodo::default()
        }
    }

    #[test]
    fn test_normalize_empty_extraction() {
        let record = normalize("Short summary.", ExtractedData::default());

        assert_eq!(record.meeting_info.title.as_deref(), Some(UNTITLED_MEETING));
        assert_eq!(record.meeting_info.date, None);
        assert!(record.meeting_info.participants.is_empty());
        assert!(record.todos.is_empty());
    }

    #[test]
    fn test_normalize_fills_todo_defaults() {
        let extracted = ExtractedData {
            todos: Some(vec![RawTodo {
                action: Some("  Send report ".into()),
                description: None,
                owner: Some("   ".into()),
                due: Some("2026-01-30".into()),
            }]),
            ..ExtractedData::default()
        };

        let record = normalize("s", extracted);
        assert_eq!(
            record.todos,
            vec![TodoItem {
                action: "Send report".into(),
                description: String::new(),
                owner: None,
                due: Some("2026-01-30".into()),
            }]
        );
    }

    #[test]
    fn test_normalize_blank_title_uses_sentinel() {
        let extracted = ExtractedData {
            meeting_title: Some("  ".into()),
            participants: Some(vec!["Ann".into(), " ".into(), " Bo ".into()]),
            ..ExtractedData::default()
        };

        let record = normalize("s", extracted);
        assert_eq!(record.meeting_info.title.as_deref(), Some(UNTITLED_MEETING));
        assert_eq!(record.meeting_info.participants, vec!["Ann", "Bo"]);
    }

    #[test]
    fn test_normalized_record_validates() {
        let extracted = ExtractedData {
            todos: Some(vec![raw(Some("Fix bug"))]),
            ..ExtractedData::default()
        };

        let record = normalize("The team agreed on a fix.", extracted);
        assert!(validate(&record).is_ok());
    }

    #[test]
    fn test_validate_collects_all_violations() {
        let extracted = ExtractedData {
            todos: Some(vec![raw(Some("ok")), raw(None), raw(Some("  "))]),
            ..ExtractedData::default()
        };

        let record = normalize("   ", extracted);
        let err = validate(&record).unwrap_err();

        assert_eq!(
            err.violations,
            vec![
                "summary is empty".to_string(),
                "todos[1].action is empty".to_string(),
                "todos[2].action is empty".to_string(),
            ]
        );
    }

    #[test]
    fn test_validate_accepts_no_todos() {
        let record = normalize("Nothing to do.", ExtractedData::default());
        assert!(validate(&record).is_ok());
    }
}

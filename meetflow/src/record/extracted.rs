//! Lenient parsing of the extraction stage's JSON response.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Loosely-typed extraction output.
///
/// Every field is optional. Parsing never fails on a missing or mistyped
/// field; it only fails when the text is not a JSON object at all.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtractedData {
    /// Inferred meeting title.
    pub meeting_title: Option<String>,
    /// Meeting date, ideally `YYYY-MM-DD`.
    pub meeting_date: Option<String>,
    /// Participant names.
    pub participants: Option<Vec<String>>,
    /// Raw action items.
    pub todos: Option<Vec<RawTodo>>,
}

/// A loosely-typed action item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawTodo {
    /// Task title.
    pub action: Option<String>,
    /// Task description.
    pub description: Option<String>,
    /// Assignee.
    pub owner: Option<String>,
    /// Due date.
    pub due: Option<String>,
}

impl ExtractedData {
    /// Parses an upstream response.
    ///
    /// Unknown keys are ignored, `null` is treated like a missing key, numbers
    /// in string slots are stringified, and list entries of the wrong shape are
    /// dropped.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(text)?;
        let Value::Object(obj) = value else {
            return Err(serde::de::Error::custom("expected a JSON object"));
        };
        Ok(Self::from_object(&obj))
    }

    fn from_object(obj: &Map<String, Value>) -> Self {
        let participants = obj.get("participants").and_then(Value::as_array).map(|items| {
            items.iter().filter_map(Value::as_str).map(str::to_string).collect()
        });

        let todos = obj.get("todos").and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(Value::as_object)
                .map(|todo| RawTodo {
                    action: scalar(todo, "action"),
                    description: scalar(todo, "description"),
                    owner: scalar(todo, "owner"),
                    due: scalar(todo, "due"),
                })
                .collect()
        });

        Self {
            meeting_title: scalar(obj, "meeting_title"),
            meeting_date: scalar(obj, "meeting_date"),
            participants,
            todos,
        }
    }
}

fn scalar(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_full_response() {
        let data = ExtractedData::from_json_str(
            r#"{
                "meeting_title": "Weekly sync",
                "meeting_date": "2026-01-24",
                "participants": ["John", "Sarah"],
                "todos": [
                    {"action": "Fix login bug", "description": "staging", "owner": "Sarah", "due": "2026-01-25"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(data.meeting_title.as_deref(), Some("Weekly sync"));
        assert_eq!(data.participants, Some(vec!["John".to_string(), "Sarah".to_string()]));
        assert_eq!(
            data.todos.unwrap()[0],
            RawTodo {
                action: Some("Fix login bug".into()),
                description: Some("staging".into()),
                owner: Some("Sarah".into()),
                due: Some("2026-01-25".into()),
            }
        );
    }

    #[test]
    fn test_parse_empty_object() {
        let data = ExtractedData::from_json_str("{}").unwrap();
        assert_eq!(data, ExtractedData::default());
    }

    #[test]
    fn test_parse_tolerates_wrong_shapes() {
        let data = ExtractedData::from_json_str(
            r#"{
                "meeting_title": null,
                "meeting_date": 20260124,
                "participants": ["Ann", 3, null, "Bo"],
                "todos": ["not an object", {"action": "Ship", "owner": null, "extra": 1}],
                "unexpected": true
            }"#,
        )
        .unwrap();

        assert_eq!(data.meeting_title, None);
        assert_eq!(data.meeting_date.as_deref(), Some("20260124"));
        assert_eq!(data.participants, Some(vec!["Ann".to_string(), "Bo".to_string()]));
        let todos = data.todos.unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].action.as_deref(), Some("Ship"));
        assert_eq!(todos[0].owner, None);
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(ExtractedData::from_json_str("not json").is_err());
        assert!(ExtractedData::from_json_str("[1, 2]").is_err());
        assert!(ExtractedData::from_json_str("\"text\"").is_err());
    }
}

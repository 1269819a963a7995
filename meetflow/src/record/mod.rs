//! Meeting record types.
//!
//! Upstream model output enters as loosely-typed [`ExtractedData`]. The
//! [`normalize`] function turns anything into a typed [`MeetingResult`], and
//! [`validate`] decides whether that result is safe to persist.

mod extracted;
mod normalize;

pub use extracted::{ExtractedData, RawTodo};
pub use normalize::{normalize, validate, UNTITLED_MEETING};

use serde::{Deserialize, Serialize};

/// A single canonical action item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TodoItem {
    /// Short task title.
    pub action: String,
    /// Longer context, empty when unknown.
    #[serde(default)]
    pub description: String,
    /// Assignee name.
    #[serde(default)]
    pub owner: Option<String>,
    /// Due date as produced upstream; not guaranteed to be `YYYY-MM-DD`.
    #[serde(default)]
    pub due: Option<String>,
}

/// Canonical meeting metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MeetingInfo {
    /// Meeting title.
    pub title: Option<String>,
    /// Meeting date as produced upstream.
    pub date: Option<String>,
    /// Participants in order of appearance.
    #[serde(default)]
    pub participants: Vec<String>,
}

/// The canonical meeting record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MeetingResult {
    /// Executive summary.
    pub summary: String,
    /// Meeting metadata.
    pub meeting_info: MeetingInfo,
    /// Action items.
    #[serde(default)]
    pub todos: Vec<TodoItem>,
}

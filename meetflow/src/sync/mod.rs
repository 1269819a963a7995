//! Publishing canonical records to the destination.
//!
//! Each action item becomes one destination record. Items are written one by
//! one and a failing item never stops the rest of the batch.

mod dates;

pub use dates::is_iso_date;

use crate::config::FieldNames;
use crate::destination::{Destination, PropertyValue, RecordHandle, RecordPayload};
use crate::errors::DestinationError;
use crate::record::{MeetingInfo, MeetingResult, TodoItem};
use crate::schema::{FieldRole, SchemaAdapter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Assignee text written when a todo has no owner.
pub const UNASSIGNED: &str = "Unassigned";

/// Overall result of one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// Every item was written (including an empty batch).
    Complete,
    /// Some items were written.
    Partial,
    /// No item of a non-empty batch was written.
    Failed,
}

/// A single item that could not be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSyncError {
    /// Position of the todo in the record.
    pub index: usize,
    /// The todo's action, for display.
    pub action: String,
    /// Why the write failed.
    pub message: String,
}

/// Per-batch synchronization report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Number of items a write was attempted for.
    pub attempted: usize,
    /// Number of items written.
    pub succeeded: usize,
    /// One entry per failed item.
    pub per_item_errors: Vec<ItemSyncError>,
    /// Records created, in item order.
    pub created: Vec<RecordHandle>,
    /// Summary status.
    pub status: SyncStatus,
}

impl SyncReport {
    fn finish(attempted: usize, created: Vec<RecordHandle>, per_item_errors: Vec<ItemSyncError>) -> Self {
        let succeeded = created.len();
        let status = if succeeded == attempted {
            SyncStatus::Complete
        } else if succeeded == 0 {
            SyncStatus::Failed
        } else {
            SyncStatus::Partial
        };
        Self {
            attempted,
            succeeded,
            per_item_errors,
            created,
            status,
        }
    }
}

/// What happened to synchronization for a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Synchronization did not run.
    Skipped {
        /// Why it was skipped.
        reason: String,
    },
    /// Synchronization ran; see the report for per-item results.
    Attempted(SyncReport),
}

impl SyncOutcome {
    /// Returns the report if synchronization ran.
    #[must_use]
    pub fn report(&self) -> Option<&SyncReport> {
        match self {
            Self::Attempted(report) => Some(report),
            Self::Skipped { .. } => None,
        }
    }
}

/// Writes canonical records through a discovered schema.
pub struct SyncEngine {
    destination: Arc<dyn Destination>,
    schema: Arc<SchemaAdapter>,
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl SyncEngine {
    /// Creates an engine from an already discovered schema.
    #[must_use]
    pub fn new(destination: Arc<dyn Destination>, schema: SchemaAdapter) -> Self {
        Self {
            destination,
            schema: Arc::new(schema),
        }
    }

    /// Discovers the destination schema and creates an engine.
    pub async fn connect(
        destination: Arc<dyn Destination>,
        names: &FieldNames,
    ) -> Result<Self, DestinationError> {
        let schema = SchemaAdapter::discover(destination.as_ref(), names).await?;
        Ok(Self::new(destination, schema))
    }

    /// Returns the schema used for writes.
    #[must_use]
    pub fn schema(&self) -> &SchemaAdapter {
        &self.schema
    }

    /// Writes every todo of `record` as one destination record.
    ///
    /// Per-item failures are collected in the report. An error is returned
    /// only when the very first write fails at the connection level, which
    /// means the batch could not start at all.
    pub async fn sync(&self, record: &MeetingResult) -> Result<SyncReport, DestinationError> {
        let info = &record.meeting_info;
        let meeting_date = info.date.as_deref().filter(|date| {
            let valid = is_iso_date(date);
            if !valid {
                warn!(date = %date, "Invalid meeting date format, skipping date field");
            }
            valid
        });

        if let Some(date) = meeting_date {
            if self.schema.resolve(FieldRole::MeetingDate).is_none() {
                warn!(date = %date, "No meeting date field, meeting date is not written");
            }
        }

        info!(items = record.todos.len(), "Syncing action items to destination");

        let mut created = Vec::new();
        let mut errors = Vec::new();

        for (index, todo) in record.todos.iter().enumerate() {
            let payload = self.build_payload(info, meeting_date, todo);
            info!(index, action = %todo.action, "Creating record");

            match self.destination.create_record(payload).await {
                Ok(handle) => {
                    info!(index, url = ?handle.url, "Record created");
                    created.push(handle);
                }
                Err(e) if index == 0 && e.is_connection_level() => {
                    warn!(error = %e, "Destination unreachable, aborting sync");
                    return Err(e);
                }
                Err(e) => {
                    warn!(index, action = %todo.action, error = %e, "Record insert failed");
                    errors.push(ItemSyncError {
                        index,
                        action: todo.action.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        let report = SyncReport::finish(record.todos.len(), created, errors);
        info!(
            succeeded = report.succeeded,
            attempted = report.attempted,
            "Synced {}/{} action items",
            report.succeeded,
            report.attempted
        );
        if report.status == SyncStatus::Failed {
            warn!(
                missing = ?self.schema.missing_fields(),
                "No action items were synced; check the destination field names"
            );
        }
        Ok(report)
    }

    /// Builds the payload for one todo using only resolved roles.
    ///
    /// `meeting_date` must already be validated.
    #[must_use]
    pub fn build_payload(
        &self,
        info: &MeetingInfo,
        meeting_date: Option<&str>,
        todo: &TodoItem,
    ) -> RecordPayload {
        let mut payload = RecordPayload::new();
        let mut set = |role: FieldRole, value: PropertyValue| {
            if let Some(field) = self.schema.resolve(role) {
                payload.insert(field, value);
            }
        };

        let mut description = todo.description.clone();
        match todo.due.as_deref() {
            Some(due) if is_iso_date(due) && self.schema.resolve(FieldRole::DueDate).is_some() => {
                set(FieldRole::DueDate, PropertyValue::Date(due.to_string()));
            }
            Some(due) if is_iso_date(due) => {
                warn!(due = %due, "No due date field, appending due date to description");
                description = annotate_due(&description, due);
            }
            Some(due) => {
                warn!(due = %due, "Invalid due date format, appending to description");
                if self.schema.resolve(FieldRole::Description).is_none() {
                    warn!(due = %due, "No description field, due date text is dropped");
                }
                description = annotate_due(&description, due);
            }
            None => {}
        }

        set(FieldRole::Title, PropertyValue::Title(todo.action.clone()));
        set(
            FieldRole::MeetingTitle,
            PropertyValue::RichText(info.title.clone().unwrap_or_default()),
        );
        set(FieldRole::Description, PropertyValue::RichText(description));
        set(
            FieldRole::Participants,
            PropertyValue::RichText(info.participants.join(", ")),
        );
        set(
            FieldRole::Assignee,
            PropertyValue::RichText(todo.owner.clone().unwrap_or_else(|| UNASSIGNED.to_string())),
        );
        if let Some(date) = meeting_date {
            set(FieldRole::MeetingDate, PropertyValue::Date(date.to_string()));
        }

        payload
    }
}

fn annotate_due(description: &str, due: &str) -> String {
    if description.is_empty() {
        format!("(기한: {due})")
    } else {
        format!("{description} (기한: {due})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destination::{FieldCatalog, FieldType, MockDestination};
    use pretty_assertions::assert_eq;

    fn full_schema() -> SchemaAdapter {
        let catalog: FieldCatalog = [
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
        .collect();
        SchemaAdapter::from_catalog(catalog, &FieldNames::default())
    }

    fn todo(action: &str, due: Option<&str>) -> TodoItem {
        TodoItem {
            action: action.to_string(),
            description: "details".to_string(),
            owner: None,
            due: due.map(str::to_string),
        }
    }

    fn record(todos: Vec<TodoItem>) -> MeetingResult {
        MeetingResult {
            summary: "summary".to_string(),
            meeting_info: MeetingInfo {
                title: Some("Weekly".to_string()),
                date: Some("2026-01-24".to_string()),
                participants: vec!["John".to_string(), "Sarah".to_string()],
            },
            todos,
        }
    }

    fn ok_handle(id: &str) -> RecordHandle {
        RecordHandle {
            id: id.to_string(),
            url: None,
        }
    }

    fn engine(destination: MockDestination) -> SyncEngine {
        SyncEngine::new(Arc::new(destination), full_schema())
    }

    #[test]
    fn test_valid_due_date_written_to_date_field() {
        let engine = engine(MockDestination::new());
        let info = record(vec![]).meeting_info;

        let payload = engine.build_payload(&info, Some("2026-01-24"), &todo("Report", Some("2026-01-30")));

        assert_eq!(payload.get("Due Date"), Some(&PropertyValue::Date("2026-01-30".into())));
        assert_eq!(payload.get("Description"), Some(&PropertyValue::RichText("details".into())));
        assert_eq!(payload.get("Meeting Date"), Some(&PropertyValue::Date("2026-01-24".into())));
        assert_eq!(payload.get("Participants"), Some(&PropertyValue::RichText("John, Sarah".into())));
        assert_eq!(payload.get("Assignee"), Some(&PropertyValue::RichText(UNASSIGNED.into())));
        assert_eq!(payload.get("Name"), Some(&PropertyValue::Title("Report".into())));
    }

    #[test]
    fn test_invalid_due_date_appended_to_description() {
        let engine = engine(MockDestination::new());
        let info = record(vec![]).meeting_info;

        let payload = engine.build_payload(&info, None, &todo("Report", Some("next week")));

        assert!(!payload.contains("Due Date"));
        assert!(!payload.contains("Meeting Date"));
        assert_eq!(
            payload.get("Description"),
            Some(&PropertyValue::RichText("details (기한: next week)".into()))
        );
    }

    #[test]
    fn test_valid_due_date_kept_without_due_date_field() {
        let catalog: FieldCatalog = [
            ("Name", FieldType::Title),
            ("Meeting Title", FieldType::RichText),
            ("Description", FieldType::RichText),
            ("Participants", FieldType::RichText),
            ("Assignee", FieldType::RichText),
            ("Meeting Date", FieldType::Date),
        ]
        .into_iter()
        .map(|(name, field_type)| (name.to_string(), field_type))
        .collect();
        let schema = SchemaAdapter::from_catalog(catalog, &FieldNames::default());
        let engine = SyncEngine::new(Arc::new(MockDestination::new()), schema);

        let payload = engine.build_payload(
            &record(vec![]).meeting_info,
            Some("2026-01-24"),
            &todo("Report", Some("2026-01-30")),
        );

        assert!(!payload.contains("Due Date"));
        assert_eq!(
            payload.get("Description"),
            Some(&PropertyValue::RichText("details (기한: 2026-01-30)".into()))
        );
        assert_eq!(payload.get("Meeting Date"), Some(&PropertyValue::Date("2026-01-24".into())));
    }

    #[test]
    fn test_annotation_without_description() {
        assert_eq!(annotate_due("", "Friday"), "(기한: Friday)");
    }

    #[test]
    fn test_unresolved_roles_are_omitted() {
        let catalog: FieldCatalog = [("Task", FieldType::Title), ("Notes", FieldType::RichText)]
            .into_iter()
            .map(|(name, field_type)| (name.to_string(), field_type))
            .collect();
        let schema = SchemaAdapter::from_catalog(catalog, &FieldNames::default());
        let engine = SyncEngine::new(Arc::new(MockDestination::new()), schema);

        let payload = engine.build_payload(
            &record(vec![]).meeting_info,
            Some("2026-01-24"),
            &todo("Report", Some("2026-01-30")),
        );

        assert_eq!(payload.properties.len(), 1);
        assert_eq!(payload.get("Task"), Some(&PropertyValue::Title("Report".into())));
    }

    #[tokio::test]
    async fn test_partial_failure_is_isolated() {
        let mut destination = MockDestination::new();
        destination.expect_create_record().times(3).returning(|payload| {
            let action = payload.get("Name").map(PropertyValue::as_str);
            match action {
                Some("second") => Err(DestinationError::Rejected("validation_error".into())),
                Some(action) => Ok(ok_handle(action)),
                None => Err(DestinationError::Rejected("no title".into())),
            }
        });

        let report = engine(destination)
            .sync(&record(vec![todo("first", None), todo("second", None), todo("third", None)]))
            .await
            .unwrap();

        assert_eq!(report.attempted, 3);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.status, SyncStatus::Partial);
        assert_eq!(
            report.per_item_errors,
            vec![ItemSyncError {
                index: 1,
                action: "second".into(),
                message: "Destination rejected write: validation_error".into(),
            }]
        );
        assert_eq!(report.created, vec![ok_handle("first"), ok_handle("third")]);
    }

    #[tokio::test]
    async fn test_zero_synced_is_failed_status() {
        let mut destination = MockDestination::new();
        destination
            .expect_create_record()
            .returning(|_| Err(DestinationError::Rejected("bad property".into())));

        let report = engine(destination)
            .sync(&record(vec![todo("a", None), todo("b", None)]))
            .await
            .unwrap();

        assert_eq!(report.succeeded, 0);
        assert_eq!(report.per_item_errors.len(), 2);
        assert_eq!(report.status, SyncStatus::Failed);
    }

    #[tokio::test]
    async fn test_empty_batch_is_complete() {
        let mut destination = MockDestination::new();
        destination.expect_create_record().never();

        let report = engine(destination).sync(&record(vec![])).await.unwrap();

        assert_eq!(report.attempted, 0);
        assert_eq!(report.status, SyncStatus::Complete);
    }

    #[tokio::test]
    async fn test_unreachable_destination_aborts_batch() {
        let mut destination = MockDestination::new();
        destination
            .expect_create_record()
            .times(1)
            .returning(|_| Err(DestinationError::Unavailable("connection refused".into())));

        let err = engine(destination)
            .sync(&record(vec![todo("a", None), todo("b", None)]))
            .await
            .unwrap_err();

        assert_eq!(err, DestinationError::Unavailable("connection refused".into()));
    }

    #[tokio::test]
    async fn test_connection_error_after_first_item_is_per_item() {
        let mut destination = MockDestination::new();
        destination.expect_create_record().times(2).returning(|payload| {
            if payload.get("Name") == Some(&PropertyValue::Title("a".into())) {
                Ok(ok_handle("a"))
            } else {
                Err(DestinationError::Unavailable("timeout".into()))
            }
        });

        let report = engine(destination)
            .sync(&record(vec![todo("a", None), todo("b", None)]))
            .await
            .unwrap();

        assert_eq!(report.succeeded, 1);
        assert_eq!(report.per_item_errors[0].index, 1);
    }

    #[test]
    fn test_sync_outcome_serialization() {
        let skipped = SyncOutcome::Skipped {
            reason: "Destination unavailable: dns".into(),
        };
        let json = serde_json::to_value(&skipped).unwrap();
        assert_eq!(json["outcome"], "skipped");
        assert!(skipped.report().is_none());
    }
}

//! Destination schema discovery and field role resolution.
//!
//! The destination is asked for its field catalog exactly once. Configured
//! names are checked against it; when the configured title field is missing,
//! the single title-typed field in the catalog is used instead. Anything still
//! missing is logged and later skipped at write time.

use crate::config::FieldNames;
use crate::destination::{Destination, FieldCatalog, FieldType};
use crate::errors::DestinationError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{info, warn};

/// Logical purpose of a destination field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    /// The record title (the action).
    Title,
    /// The meeting title.
    MeetingTitle,
    /// The task description.
    Description,
    /// The meeting participants.
    Participants,
    /// The task owner.
    Assignee,
    /// The meeting date.
    MeetingDate,
    /// The task due date.
    DueDate,
}

impl FieldRole {
    /// All roles.
    pub const ALL: [Self; 7] = [
        Self::Title,
        Self::MeetingTitle,
        Self::Description,
        Self::Participants,
        Self::Assignee,
        Self::MeetingDate,
        Self::DueDate,
    ];

    /// Roles whose absence is reported at discovery time.
    pub const REQUIRED: [Self; 5] = [
        Self::Title,
        Self::MeetingTitle,
        Self::Description,
        Self::Participants,
        Self::Assignee,
    ];

    /// Returns the stable string name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::MeetingTitle => "meeting_title",
            Self::Description => "description",
            Self::Participants => "participants",
            Self::Assignee => "assignee",
            Self::MeetingDate => "meeting_date",
            Self::DueDate => "due_date",
        }
    }

    /// Maps an environment variable suffix such as `DUE_DATE` to a role.
    #[must_use]
    pub fn from_env_suffix(suffix: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(suffix))
    }
}

impl fmt::Display for FieldRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role bound to an existing destination field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedField {
    /// Field name in the destination.
    pub name: String,
    /// Declared type.
    pub field_type: FieldType,
}

/// Field catalog plus role resolution, fixed after discovery.
#[derive(Debug, Clone)]
pub struct SchemaAdapter {
    catalog: FieldCatalog,
    resolved: HashMap<FieldRole, ResolvedField>,
    missing: Vec<String>,
    optional_missing: Vec<String>,
}

impl SchemaAdapter {
    /// Queries the destination once and resolves every role.
    pub async fn discover(
        destination: &dyn Destination,
        names: &FieldNames,
    ) -> Result<Self, DestinationError> {
        let catalog = destination.describe_schema().await?;
        info!(fields = catalog.len(), "Discovered destination schema");
        for (name, field_type) in &catalog {
            info!("  - {name}: {field_type}");
        }
        Ok(Self::from_catalog(catalog, names))
    }

    /// Resolves roles against an already fetched catalog.
    #[must_use]
    pub fn from_catalog(catalog: FieldCatalog, names: &FieldNames) -> Self {
        let mut resolved = HashMap::new();
        for role in FieldRole::ALL {
            let name = names.name_for(role);
            if let Some(&field_type) = catalog.get(name) {
                resolved.insert(
                    role,
                    ResolvedField {
                        name: name.to_string(),
                        field_type,
                    },
                );
            }
        }

        let mut missing: Vec<String> = FieldRole::REQUIRED
            .into_iter()
            .filter(|role| !resolved.contains_key(role))
            .map(|role| names.name_for(role).to_string())
            .collect();

        if !resolved.contains_key(&FieldRole::Title) {
            let configured = names.name_for(FieldRole::Title);
            match unique_title_field(&catalog) {
                Some(fallback) => {
                    info!(
                        configured = %configured,
                        fallback = %fallback,
                        "Title field not found, using the catalog's title-typed field"
                    );
                    missing.retain(|name| name != configured);
                    resolved.insert(
                        FieldRole::Title,
                        ResolvedField {
                            name: fallback.to_string(),
                            field_type: FieldType::Title,
                        },
                    );
                }
                None => warn!(
                    configured = %configured,
                    "Title field not found and no unique title-typed field to fall back to"
                ),
            }
        }

        let optional_missing: Vec<String> = FieldRole::ALL
            .into_iter()
            .filter(|role| !FieldRole::REQUIRED.contains(role) && !resolved.contains_key(role))
            .map(|role| names.name_for(role).to_string())
            .collect();

        if missing.is_empty() {
            info!("Destination schema validated");
        } else {
            warn!(missing = ?missing, "Destination is missing fields; they will be skipped");
        }
        if !optional_missing.is_empty() {
            warn!(
                missing = ?optional_missing,
                "Destination has no date fields with these names; dates will not be written as dates"
            );
        }

        Self {
            catalog,
            resolved,
            missing,
            optional_missing,
        }
    }

    /// Returns the destination field name for a role, if it exists.
    #[must_use]
    pub fn resolve(&self, role: FieldRole) -> Option<&str> {
        self.resolved.get(&role).map(|field| field.name.as_str())
    }

    /// Returns the full resolution for a role.
    #[must_use]
    pub fn resolved_field(&self, role: FieldRole) -> Option<&ResolvedField> {
        self.resolved.get(&role)
    }

    /// Configured names of required fields that could not be resolved.
    #[must_use]
    pub fn missing_fields(&self) -> &[String] {
        &self.missing
    }

    /// Configured names of optional date fields that could not be resolved.
    #[must_use]
    pub fn optional_missing_fields(&self) -> &[String] {
        &self.optional_missing
    }

    /// The cached catalog.
    #[must_use]
    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }
}

fn unique_title_field(catalog: &FieldCatalog) -> Option<&str> {
    let mut titles = catalog
        .iter()
        .filter(|(_, field_type)| **field_type == FieldType::Title)
        .map(|(name, _)| name.as_str());
    let first = titles.next()?;
    if titles.next().is_some() {
        return None;
    }
    Some(first)
}

//! Configuration loading.
//!
//! Settings come from an optional TOML file, then `MEETFLOW_*` environment
//! variables override individual values. Blank overrides are ignored.

use crate::errors::MeetflowError;
use crate::schema::FieldRole;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeetflowConfig {
    /// Destination field names per role.
    pub fields: FieldNames,
    /// Log output settings.
    pub logging: LoggingConfig,
}

/// Configured destination field name for each role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldNames {
    /// Title-typed field holding the action.
    pub title: String,
    /// Meeting title text field.
    pub meeting_title: String,
    /// Task description text field.
    pub description: String,
    /// Comma-joined participants text field.
    pub participants: String,
    /// Assignee text field.
    pub assignee: String,
    /// Meeting date field.
    pub meeting_date: String,
    /// Due date field.
    pub due_date: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            title: "Name".to_string(),
            meeting_title: "Meeting Title".to_string(),
            description: "Description".to_string(),
            participants: "Participants".to_string(),
            assignee: "Assignee".to_string(),
            meeting_date: "Meeting Date".to_string(),
            due_date: "Due Date".to_string(),
        }
    }
}

impl FieldNames {
    /// Returns the configured field name for a role.
    #[must_use]
    pub fn name_for(&self, role: FieldRole) -> &str {
        match role {
            FieldRole::Title => &self.title,
            FieldRole::MeetingTitle => &self.meeting_title,
            FieldRole::Description => &self.description,
            FieldRole::Participants => &self.participants,
            FieldRole::Assignee => &self.assignee,
            FieldRole::MeetingDate => &self.meeting_date,
            FieldRole::DueDate => &self.due_date,
        }
    }

    fn slot_mut(&mut self, role: FieldRole) -> &mut String {
        match role {
            FieldRole::Title => &mut self.title,
            FieldRole::MeetingTitle => &mut self.meeting_title,
            FieldRole::Description => &mut self.description,
            FieldRole::Participants => &mut self.participants,
            FieldRole::Assignee => &mut self.assignee,
            FieldRole::MeetingDate => &mut self.meeting_date,
            FieldRole::DueDate => &mut self.due_date,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `meetflow=debug`.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl MeetflowConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, MeetflowError> {
        toml::from_str(content)
            .map_err(|e| MeetflowError::Config(format!("failed to parse config: {e}")))
    }

    /// Loads a TOML file, falling back to defaults when it does not exist,
    /// then applies environment overrides.
    pub fn load(path: &Path) -> Result<Self, MeetflowError> {
        Self::load_from(path, std::env::vars())
    }

    /// Like [`load`](Self::load), with overrides taken from `vars`.
    pub fn load_from<I, K, V>(path: &Path, vars: I) -> Result<Self, MeetflowError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config = Self::from_toml_str(&content)?;
            info!("Loaded config from {:?}", path);
            config
        } else {
            info!("Config file {:?} not found, using defaults", path);
            Self::default()
        };
        config.apply_overrides(vars);
        Ok(config)
    }

    /// Applies `MEETFLOW_*` overrides from the given variables.
    pub fn apply_overrides<I, K, V>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }

            let key = key.as_ref();
            if let Some(role) = key.strip_prefix("MEETFLOW_FIELD_").and_then(FieldRole::from_env_suffix) {
                *self.fields.slot_mut(role) = value.to_string();
                continue;
            }

            match key {
                "MEETFLOW_LOG" => self.logging.level = value.to_string(),
                "MEETFLOW_LOG_JSON" => {
                    self.logging.json = matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
                }
                _ => {}
            }
        }
    }
}

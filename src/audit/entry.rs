//! Audit entry data structures
//!
//! A [`LogEntry`] records one action taken against a user. Entries are only
//! ever appended; nothing in the service layer rewrites or deletes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Entity, LogEntryId, UserId};

/// Conventional action tags written by the directory
///
/// The stored `action` is a plain string, so callers may log tags outside
/// this set through `UserDirectory::log_user_action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Created,
    Updated,
    Deleted,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Created => "Created",
            Action::Updated => "Updated",
            Action::Deleted => "Deleted",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        action.as_str().to_string()
    }
}

/// A single audit log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Identity assigned by the store
    #[serde(default)]
    pub id: LogEntryId,

    /// Subject of the action; may point at a user that no longer exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,

    /// Short action tag ("Created", "Updated", "Deleted", ...)
    pub action: String,

    /// Free-text description, e.g. the rendered diff
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    /// When the action happened (UTC)
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    /// Create an entry stamped with the current time
    pub fn new(user_id: Option<UserId>, action: impl Into<String>, details: Option<String>) -> Self {
        Self::at(Utc::now(), user_id, action, details)
    }

    /// Create an entry with a caller-supplied timestamp
    pub fn at(
        timestamp: DateTime<Utc>,
        user_id: Option<UserId>,
        action: impl Into<String>,
        details: Option<String>,
    ) -> Self {
        Self {
            id: LogEntryId::UNASSIGNED,
            user_id,
            action: action.into(),
            details,
            timestamp,
        }
    }

    /// Whether this entry carries one of the conventional tags
    pub fn is_action(&self, action: Action) -> bool {
        self.action == action.as_str()
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] #{} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.id,
            self.action
        );

        if let Some(user_id) = self.user_id {
            output.push_str(&format!(" user {}", user_id));
        }

        if let Some(details) = &self.details {
            output.push_str(&format!("\n  {}", details));
        }

        output
    }
}

impl Entity for LogEntry {
    type Id = LogEntryId;

    const KIND: &'static str = "LogEntry";

    fn id(&self) -> LogEntryId {
        self.id
    }

    fn set_id(&mut self, id: LogEntryId) {
        self.id = id;
    }
}

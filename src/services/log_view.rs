//! Read-only projection of the audit trail for listing screens
//!
//! Each entry is joined with the current name of its subject. Entries whose
//! subject was deleted (or never had one) are kept, just without a name.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::DirectoryResult;
use crate::models::{LogEntryId, User, UserId};

use super::user::UserDirectory;

/// A log entry with its subject's display name, if the subject still exists
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntryView {
    pub log_id: LogEntryId,
    pub action: String,
    pub user_id: Option<UserId>,
    pub forename: Option<String>,
    pub surname: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl LogEntryView {
    /// "Forename Surname", or `None` for a missing subject
    pub fn display_name(&self) -> Option<String> {
        match (&self.forename, &self.surname) {
            (Some(f), Some(s)) => Some(format!("{} {}", f, s)),
            _ => None,
        }
    }

    fn matches(&self, needle: &str) -> bool {
        let contains = |field: &Option<String>| {
            field
                .as_deref()
                .is_some_and(|value| value.to_lowercase().contains(needle))
        };
        contains(&self.forename) || contains(&self.surname)
    }
}

impl<'a> UserDirectory<'a> {
    /// Every audit entry, newest first, joined with its subject's name
    ///
    /// A non-blank `search` keeps only entries whose subject's forename or
    /// surname contains it as given, ignoring case. Surrounding whitespace is
    /// part of the match.
    pub fn all_log_entries(&self, search: Option<&str>) -> DirectoryResult<Vec<LogEntryView>> {
        let storage = self.storage();
        let users: HashMap<UserId, User> = self
            .all_users()?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let views = storage
            .audit_log()
            .all_entries()?
            .into_iter()
            .map(|entry| {
                let subject = entry.user_id.and_then(|id| users.get(&id));
                LogEntryView {
                    log_id: entry.id,
                    action: entry.action,
                    user_id: entry.user_id,
                    forename: subject.map(|u| u.forename.clone()),
                    surname: subject.map(|u| u.surname.clone()),
                    timestamp: entry.timestamp,
                }
            });

        let needle = search
            .filter(|s| !s.trim().is_empty())
            .map(str::to_lowercase);

        Ok(match needle {
            Some(needle) => views.filter(|v| v.matches(&needle)).collect(),
            None => views.collect(),
        })
    }
}

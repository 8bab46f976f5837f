//! Read and append paths over the stored audit entries
//!
//! [`AuditLog`] narrows the generic repository to what an audit trail may
//! do: append, and read newest first. There is no update or remove here.

use std::cmp::Ordering;

use crate::error::{DirectoryError, DirectoryResult};
use crate::models::{LogEntryId, UserId};
use crate::storage::{Repository, TableRepository};

use super::entry::LogEntry;

/// Append-only view over the `LogEntry` table
#[derive(Clone, Copy)]
pub struct AuditLog<'a> {
    entries: &'a TableRepository<LogEntry>,
}

impl<'a> AuditLog<'a> {
    /// Wrap the log entry repository
    pub fn new(entries: &'a TableRepository<LogEntry>) -> Self {
        Self { entries }
    }

    /// Store a new entry and return it with its assigned identity
    pub fn append(&self, entry: LogEntry) -> DirectoryResult<LogEntry> {
        let stored = self.entries.add(entry)?;
        tracing::debug!(
            id = %stored.id,
            user_id = ?stored.user_id,
            action = %stored.action,
            "audit entry appended"
        );
        Ok(stored)
    }

    /// Every entry about `user_id`, newest first
    pub fn entries_for(&self, user_id: UserId) -> DirectoryResult<Vec<LogEntry>> {
        let mut entries: Vec<_> = self
            .entries
            .list_all()?
            .into_iter()
            .filter(|e| e.user_id == Some(user_id))
            .collect();
        entries.sort_by(newest_first);
        Ok(entries)
    }

    /// Every entry in the trail, newest first
    pub fn all_entries(&self) -> DirectoryResult<Vec<LogEntry>> {
        let mut entries = self.entries.list_all()?;
        entries.sort_by(newest_first);
        Ok(entries)
    }

    /// A single entry by identity
    pub fn entry_by_id(&self, id: LogEntryId) -> DirectoryResult<LogEntry> {
        if !id.is_assigned() {
            return Err(DirectoryError::InvalidArgument(format!(
                "LogEntry identity must be positive, got {}",
                id
            )));
        }

        self.entries
            .get(id)?
            .ok_or_else(|| DirectoryError::log_entry_not_found(id.to_string()))
    }

    /// Number of entries in the trail
    pub fn len(&self) -> DirectoryResult<usize> {
        self.entries.count()
    }

    pub fn is_empty(&self) -> DirectoryResult<bool> {
        Ok(self.len()? == 0)
    }
}

/// Timestamp descending; equal timestamps put the later insert first
pub fn newest_first(a: &LogEntry, b: &LogEntry) -> Ordering {
    b.timestamp
        .cmp(&a.timestamp)
        .then_with(|| b.id.cmp(&a.id))
}

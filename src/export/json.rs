//! JSON export of the whole directory
//!
//! Users and the full audit trail, with a schema version so a later reader
//! can tell what it is looking at.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::audit::LogEntry;
use crate::error::{DirectoryError, DirectoryResult};
use crate::models::User;
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full directory export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Version of the tool that wrote the export
    pub app_version: String,

    /// All users, by identity
    pub users: Vec<User>,

    /// The audit trail, newest first
    pub log_entries: Vec<LogEntry>,

    pub active_user_count: usize,
}

impl FullExport {
    /// Snapshot the store
    pub fn from_storage(storage: &Storage) -> DirectoryResult<Self> {
        let users = storage.list_all::<User>()?;
        let log_entries = storage.audit_log().all_entries()?;
        let active_user_count = users.iter().filter(|u| u.is_active).count();

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            users,
            log_entries,
            active_user_count,
        })
    }
}

/// Export the full directory to JSON
pub fn export_full_json<W: Write>(
    storage: &Storage,
    writer: &mut W,
    pretty: bool,
) -> DirectoryResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| DirectoryError::Export(e.to_string()))
}

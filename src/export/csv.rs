//! CSV export of users and the audit trail (spreadsheet-compatible)

use std::io::Write;

use crate::error::{DirectoryError, DirectoryResult};
use crate::services::UserDirectory;
use crate::storage::Storage;

fn export_err(e: impl std::fmt::Display) -> DirectoryError {
    DirectoryError::Export(e.to_string())
}

/// Export all users to CSV
pub fn export_users_csv<W: Write>(storage: &Storage, writer: W) -> DirectoryResult<()> {
    let users = UserDirectory::new(storage).all_users()?;
    let mut out = ::csv::Writer::from_writer(writer);

    out.write_record(["ID", "Forename", "Surname", "Email", "Active", "Date of Birth"])
        .map_err(export_err)?;

    for user in users {
        out.write_record([
            user.id.to_string(),
            user.forename,
            user.surname,
            user.email,
            user.is_active.to_string(),
            user.date_of_birth.format("%Y-%m-%d").to_string(),
        ])
        .map_err(export_err)?;
    }

    out.flush().map_err(export_err)
}

/// Export the audit trail to CSV, newest first
pub fn export_logs_csv<W: Write>(storage: &Storage, writer: W) -> DirectoryResult<()> {
    let entries = storage.audit_log().all_entries()?;
    let mut out = ::csv::Writer::from_writer(writer);

    out.write_record(["ID", "Timestamp", "User ID", "Action", "Details"])
        .map_err(export_err)?;

    for entry in entries {
        out.write_record([
            entry.id.to_string(),
            entry.timestamp.to_rfc3339(),
            entry.user_id.map(|id| id.to_string()).unwrap_or_default(),
            entry.action,
            entry.details.unwrap_or_default(),
        ])
        .map_err(export_err)?;
    }

    out.flush().map_err(export_err)
}

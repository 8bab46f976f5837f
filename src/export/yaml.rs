//! YAML export of the whole directory
//!
//! Same content as the JSON export, for people reading it by hand.

use std::io::Write;

use crate::error::{DirectoryError, DirectoryResult};
use crate::export::json::FullExport;
use crate::storage::Storage;

/// Export the full directory to YAML
pub fn export_full_yaml<W: Write>(storage: &Storage, writer: &mut W) -> DirectoryResult<()> {
    let export = FullExport::from_storage(storage)?;

    writeln!(writer, "# User directory export")
        .and_then(|_| writeln!(writer, "# Generated: {}", export.exported_at))
        .and_then(|_| writeln!(writer, "# Version: {}", export.app_version))
        .and_then(|_| writeln!(writer))
        .map_err(|e| DirectoryError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| DirectoryError::Export(e.to_string()))
}

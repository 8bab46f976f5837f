//! Snapshot file helpers
//!
//! Repositories backed by a file read it once on open and rewrite it whole
//! after every mutation. Writes go through a temp file and a rename so a
//! crash leaves either the old snapshot or the new one, never half of each.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{DirectoryError, DirectoryResult};

/// Read a JSON snapshot, falling back to `T::default()` when the file is missing
pub fn read_json<T, P>(path: P) -> DirectoryResult<T>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        tracing::debug!(path = %path.display(), "snapshot missing, starting empty");
        return Ok(T::default());
    }

    let file = File::open(path).map_err(|e| {
        DirectoryError::Storage(format!("Failed to open {}: {}", path.display(), e))
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        DirectoryError::Storage(format!("Failed to parse {}: {}", path.display(), e))
    })
}

/// Write a JSON snapshot atomically (temp file, fsync, rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> DirectoryResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            DirectoryError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| DirectoryError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| DirectoryError::Storage(format!("Failed to serialize snapshot: {}", e)))?;
    writer
        .flush()
        .map_err(|e| DirectoryError::Storage(format!("Failed to flush snapshot: {}", e)))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| DirectoryError::Storage(format!("Failed to sync snapshot: {}", e)))?;

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(DirectoryError::Storage(format!(
            "Failed to replace {}: {}",
            path.display(),
            e
        )));
    }

    tracing::trace!(path = %path.display(), "snapshot written");
    Ok(())
}

//! Storage initialization
//!
//! Handles first-run setup of a data directory.

use crate::config::paths::DirectoryPaths;
use crate::config::settings::Settings;
use crate::error::DirectoryError;

use super::seed::default_users;
use super::Storage;

/// Initialize a data directory for a fresh installation
///
/// Creates the directories, and loads the fixture users when the settings
/// ask for it and the user table has never issued an identity. A table
/// emptied by deletes is not reseeded. Returns the number of users seeded.
pub fn initialize_storage(
    paths: &DirectoryPaths,
    settings: &Settings,
) -> Result<usize, DirectoryError> {
    paths.ensure_directories()?;

    if !settings.seed_on_init {
        return Ok(0);
    }

    let storage = Storage::open(paths.clone())?;
    if !storage.users.is_pristine()? {
        tracing::debug!("user table already in use, skipping seed");
        return Ok(0);
    }

    let users = default_users();
    let count = users.len();
    storage.users.seed(users)?;
    tracing::info!(count, "seeded fixture users");

    Ok(count)
}

/// Check if a data directory still needs `init`
pub fn needs_initialization(paths: &DirectoryPaths) -> bool {
    !paths.is_initialized()
}

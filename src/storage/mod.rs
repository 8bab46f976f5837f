//! Storage layer for the user directory
//!
//! [`Storage`] composes one [`TableRepository`] per entity kind and exposes
//! a uniform, type-indexed API over them: `storage.add::<User>(..)` and
//! `storage.add::<LogEntry>(..)` run the same code. Tables live in memory;
//! when opened over a data directory each table is mirrored to a JSON file
//! after every mutation.

pub mod file_io;
pub mod init;
pub mod repository;
pub mod seed;

pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use repository::{Repository, TableRepository};

use crate::audit::{AuditLog, LogEntry};
use crate::config::paths::DirectoryPaths;
use crate::error::DirectoryResult;
use crate::models::{Entity, User};

/// Typed access from the store to the repository of kind `T`
pub trait HasRepository<T: Entity> {
    fn repository(&self) -> &TableRepository<T>;
}

/// Main storage coordinator that owns every repository
pub struct Storage {
    paths: Option<DirectoryPaths>,
    pub users: TableRepository<User>,
    pub log_entries: TableRepository<LogEntry>,
}

impl Storage {
    /// A process-lifetime store with no tables on disk
    pub fn in_memory() -> Self {
        Self {
            paths: None,
            users: TableRepository::in_memory(),
            log_entries: TableRepository::in_memory(),
        }
    }

    /// An in-memory store pre-populated with the fixture users
    pub fn seeded() -> DirectoryResult<Self> {
        let storage = Self::in_memory();
        storage.users.seed(seed::default_users())?;
        Ok(storage)
    }

    /// Open the file-backed store under `paths`, loading every table
    pub fn open(paths: DirectoryPaths) -> DirectoryResult<Self> {
        paths.ensure_directories()?;

        let storage = Self {
            users: TableRepository::with_path(paths.users_file()),
            log_entries: TableRepository::with_path(paths.log_entries_file()),
            paths: Some(paths),
        };
        storage.load_all()?;
        Ok(storage)
    }

    /// Paths the store was opened with, if file-backed
    pub fn paths(&self) -> Option<&DirectoryPaths> {
        self.paths.as_ref()
    }

    /// Reload every table from disk
    pub fn load_all(&self) -> DirectoryResult<()> {
        self.users.load()?;
        self.log_entries.load()?;
        Ok(())
    }

    /// Append-only view over the audit entries
    pub fn audit_log(&self) -> AuditLog<'_> {
        AuditLog::new(&self.log_entries)
    }

    /// Every record of kind `T`
    pub fn list_all<T: Entity>(&self) -> DirectoryResult<Vec<T>>
    where
        Self: HasRepository<T>,
    {
        <Self as HasRepository<T>>::repository(self).list_all()
    }

    /// One record of kind `T`
    pub fn get<T: Entity>(&self, id: T::Id) -> DirectoryResult<Option<T>>
    where
        Self: HasRepository<T>,
    {
        <Self as HasRepository<T>>::repository(self).get(id)
    }

    /// Insert a record of kind `T` under the next identity
    pub fn add<T: Entity>(&self, record: T) -> DirectoryResult<T>
    where
        Self: HasRepository<T>,
    {
        <Self as HasRepository<T>>::repository(self).add(record)
    }

    /// Replace a stored record of kind `T`
    pub fn update<T: Entity>(&self, record: T) -> DirectoryResult<T>
    where
        Self: HasRepository<T>,
    {
        <Self as HasRepository<T>>::repository(self).update(record)
    }

    /// Delete a stored record of kind `T`
    pub fn remove<T: Entity>(&self, record: &T) -> DirectoryResult<T>
    where
        Self: HasRepository<T>,
    {
        <Self as HasRepository<T>>::repository(self).remove(record)
    }

    pub fn count<T: Entity>(&self) -> DirectoryResult<usize>
    where
        Self: HasRepository<T>,
    {
        <Self as HasRepository<T>>::repository(self).count()
    }

    /// Drop every record of kind `T` (identities stay retired)
    pub fn clear<T: Entity>(&self) -> DirectoryResult<()>
    where
        Self: HasRepository<T>,
    {
        <Self as HasRepository<T>>::repository(self).clear()
    }
}

impl HasRepository<User> for Storage {
    fn repository(&self) -> &TableRepository<User> {
        &self.users
    }
}

impl HasRepository<LogEntry> for Storage {
    fn repository(&self) -> &TableRepository<LogEntry> {
        &self.log_entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserId;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample_user() -> User {
        User::new(
            "Brand New",
            "User",
            "brandnewuser@example.com",
            true,
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
        )
    }

    #[test]
    fn test_seeded_store() {
        let storage = Storage::seeded().unwrap();
        assert_eq!(storage.count::<User>().unwrap(), seed::DEFAULT_USER_COUNT);
        assert_eq!(storage.count::<LogEntry>().unwrap(), 0);

        let added = storage.add(sample_user()).unwrap();
        assert_eq!(added.id, UserId::new(12));
    }

    #[test]
    fn test_kinds_have_independent_identities() {
        let storage = Storage::in_memory();

        let user = storage.add(sample_user()).unwrap();
        let entry = storage
            .add(LogEntry::new(None, "Test", Some("Testing log entry".into())))
            .unwrap();

        assert_eq!(user.id.value(), 1);
        assert_eq!(entry.id.value(), 1);

        let logs = storage.list_all::<LogEntry>().unwrap();
        assert!(logs
            .iter()
            .any(|l| l.action == "Test" && l.details.as_deref() == Some("Testing log entry")));
    }

    #[test]
    fn test_generic_update_and_remove() {
        let storage = Storage::seeded().unwrap();
        let mut first = storage.list_all::<User>().unwrap().remove(0);
        first.forename = "Updated".into();
        first.email = "updated@example.com".into();

        storage.update(first.clone()).unwrap();
        let updated = storage.get::<User>(first.id).unwrap().unwrap();
        assert_eq!(updated.forename, "Updated");
        assert_eq!(updated.email, "updated@example.com");

        storage.remove(&updated).unwrap();
        assert!(!storage
            .list_all::<User>()
            .unwrap()
            .iter()
            .any(|u| u.email == "updated@example.com"));
    }

    #[test]
    fn test_cleared_store_lists_empty() {
        let storage = Storage::seeded().unwrap();
        storage.clear::<User>().unwrap();
        assert!(storage.list_all::<User>().unwrap().is_empty());
    }

    #[test]
    fn test_open_persists_between_instances() {
        let temp_dir = TempDir::new().unwrap();
        let paths = DirectoryPaths::with_base_dir(temp_dir.path().to_path_buf());

        let storage = Storage::open(paths.clone()).unwrap();
        let user = storage.add(sample_user()).unwrap();
        storage
            .audit_log()
            .append(LogEntry::new(Some(user.id), "Created", None))
            .unwrap();
        drop(storage);

        let reopened = Storage::open(paths).unwrap();
        assert_eq!(reopened.list_all::<User>().unwrap(), vec![user.clone()]);
        assert_eq!(reopened.audit_log().entries_for(user.id).unwrap().len(), 1);
    }
}

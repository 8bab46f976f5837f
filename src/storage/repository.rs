//! Generic repository for any entity kind
//!
//! One [`TableRepository`] exists per record kind. Each owns its rows and its
//! identity counter behind a single `RwLock`, so "read counter, increment,
//! insert" is one critical section and concurrent adds never share an id.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::error::{DirectoryError, DirectoryResult};
use crate::models::{Entity, EntityId};

use super::file_io::{read_json, write_json_atomic};

/// CRUD capability over one entity kind
pub trait Repository<T: Entity>: Send + Sync {
    /// Snapshot of every record, ordered by identity
    fn list_all(&self) -> DirectoryResult<Vec<T>>;

    /// Look up a single record
    fn get(&self, id: T::Id) -> DirectoryResult<Option<T>>;

    /// Assign the next identity and insert; returns the stored record
    fn add(&self, record: T) -> DirectoryResult<T>;

    /// Replace the record carrying `record.id()`
    fn update(&self, record: T) -> DirectoryResult<T>;

    /// Delete the record carrying `record.id()`; returns what was removed
    fn remove(&self, record: &T) -> DirectoryResult<T>;

    /// Number of stored records
    fn count(&self) -> DirectoryResult<usize>;
}

/// On-disk shape of a table
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TableData<T> {
    next_id: i64,
    records: Vec<T>,
}

impl<T> Default for TableData<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            records: Vec::new(),
        }
    }
}

/// Rows plus the identity counter of one kind
#[derive(Debug)]
struct Table<T: Entity> {
    rows: BTreeMap<T::Id, T>,
    /// Next identity to hand out; only ever grows
    next_id: i64,
}

impl<T: Entity> Table<T> {
    fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    fn bump_counter_past(&mut self, id: T::Id) {
        self.next_id = self.next_id.max(id.raw() + 1);
    }

    fn to_data(&self) -> TableData<T> {
        TableData {
            next_id: self.next_id,
            records: self.rows.values().cloned().collect(),
        }
    }
}

/// In-memory table for one entity kind, optionally mirrored to a JSON file
pub struct TableRepository<T: Entity> {
    path: Option<PathBuf>,
    data: RwLock<Table<T>>,
    /// Serializes snapshot writes so a newer snapshot is never overwritten by an older one
    save_lock: Mutex<()>,
}

impl<T: Entity> TableRepository<T> {
    /// A process-lifetime table with no backing file
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: RwLock::new(Table::new()),
            save_lock: Mutex::new(()),
        }
    }

    /// A table mirrored to `path`; call [`load`](Self::load) before use
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path: Some(path),
            ..Self::in_memory()
        }
    }

    /// Backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Replace the in-memory table with the backing file's contents
    pub fn load(&self) -> DirectoryResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let file_data: TableData<T> = read_json(path)?;
        let mut table = self.write()?;

        table.rows.clear();
        table.next_id = file_data.next_id.max(1);
        for record in file_data.records {
            let id = record.id();
            table.bump_counter_past(id);
            table.rows.insert(id, record);
        }

        tracing::debug!(kind = T::KIND, count = table.rows.len(), "table loaded");
        Ok(())
    }

    /// Write the current table to the backing file (no-op when in memory)
    pub fn save(&self) -> DirectoryResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let _guard = self
            .save_lock
            .lock()
            .map_err(|e| DirectoryError::Storage(format!("Failed to acquire save lock: {}", e)))?;

        // Snapshot under the read guard, write after releasing it
        let snapshot = self.read()?.to_data();
        write_json_atomic(path, &snapshot)
    }

    /// Save, undoing the in-memory change with `revert` if the write fails
    ///
    /// Memory then matches the last snapshot that reached disk.
    fn save_or_revert(&self, revert: impl FnOnce(&mut Table<T>)) -> DirectoryResult<()> {
        if let Err(err) = self.save() {
            tracing::warn!(kind = T::KIND, error = %err, "snapshot write failed, reverting");
            revert(&mut *self.write()?);
            return Err(err);
        }
        Ok(())
    }

    /// Insert records that already carry their identities
    ///
    /// Identities must be ascending and not below any identity this table
    /// has already issued, so retired identities are never handed out again.
    /// The counter moves past the highest seeded identity.
    pub fn seed(&self, records: impl IntoIterator<Item = T>) -> DirectoryResult<()> {
        let records: Vec<T> = records.into_iter().collect();
        {
            let mut table = self.write()?;

            let mut floor = table.next_id;
            for record in &records {
                let id = record.id();
                ensure_assigned::<T>(id)?;
                if id.raw() < floor {
                    return Err(DirectoryError::InvalidArgument(format!(
                        "{} identity {} was already issued",
                        T::KIND,
                        id
                    )));
                }
                floor = id.raw() + 1;
            }

            for record in records {
                let id = record.id();
                table.bump_counter_past(id);
                table.rows.insert(id, record);
            }
        }
        self.save()
    }

    /// Put back a record removed by this table, under its old identity
    pub(crate) fn restore(&self, record: T) -> DirectoryResult<T> {
        let id = record.id();
        ensure_assigned::<T>(id)?;

        {
            let mut table = self.write()?;
            if id.raw() >= table.next_id || table.rows.contains_key(&id) {
                return Err(DirectoryError::Storage(format!(
                    "Cannot restore {} {}: not a removed record",
                    T::KIND,
                    id
                )));
            }
            table.rows.insert(id, record.clone());
        }

        tracing::debug!(kind = T::KIND, %id, "record restored");
        self.save_or_revert(|table| {
            table.rows.remove(&id);
        })?;
        Ok(record)
    }

    /// Whether this table has never issued an identity
    pub fn is_pristine(&self) -> DirectoryResult<bool> {
        Ok(self.read()?.next_id == 1)
    }

    /// Drop every record; the identity counter is kept
    pub fn clear(&self) -> DirectoryResult<()> {
        self.write()?.rows.clear();
        self.save()
    }

    /// Identity the next `add` will hand out
    pub fn next_id(&self) -> DirectoryResult<T::Id> {
        Ok(T::Id::from_raw(self.read()?.next_id))
    }

    fn read(&self) -> DirectoryResult<RwLockReadGuard<'_, Table<T>>> {
        self.data
            .read()
            .map_err(|e| DirectoryError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> DirectoryResult<RwLockWriteGuard<'_, Table<T>>> {
        self.data
            .write()
            .map_err(|e| DirectoryError::Storage(format!("Failed to acquire write lock: {}", e)))
    }
}

impl<T: Entity> Default for TableRepository<T> {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl<T: Entity> Repository<T> for TableRepository<T> {
    fn list_all(&self) -> DirectoryResult<Vec<T>> {
        Ok(self.read()?.rows.values().cloned().collect())
    }

    fn get(&self, id: T::Id) -> DirectoryResult<Option<T>> {
        Ok(self.read()?.rows.get(&id).cloned())
    }

    fn add(&self, mut record: T) -> DirectoryResult<T> {
        {
            let mut table = self.write()?;
            let id = T::Id::from_raw(table.next_id);
            table.next_id += 1;
            record.set_id(id);
            table.rows.insert(id, record.clone());
        }

        let id = record.id();
        tracing::debug!(kind = T::KIND, %id, "record added");
        self.save_or_revert(|table| {
            table.rows.remove(&id);
        })?;
        Ok(record)
    }

    fn update(&self, record: T) -> DirectoryResult<T> {
        let id = record.id();
        ensure_assigned::<T>(id)?;

        let previous = {
            let mut table = self.write()?;
            let slot = table
                .rows
                .get_mut(&id)
                .ok_or_else(|| DirectoryError::not_found(T::KIND, id.to_string()))?;
            std::mem::replace(slot, record.clone())
        };

        tracing::debug!(kind = T::KIND, %id, "record updated");
        self.save_or_revert(|table| {
            table.rows.insert(id, previous);
        })?;
        Ok(record)
    }

    fn remove(&self, record: &T) -> DirectoryResult<T> {
        let id = record.id();
        ensure_assigned::<T>(id)?;

        let removed = self
            .write()?
            .rows
            .remove(&id)
            .ok_or_else(|| DirectoryError::not_found(T::KIND, id.to_string()))?;

        tracing::debug!(kind = T::KIND, %id, "record removed");
        let reinserted = removed.clone();
        self.save_or_revert(|table| {
            table.rows.insert(id, reinserted);
        })?;
        Ok(removed)
    }

    fn count(&self) -> DirectoryResult<usize> {
        Ok(self.read()?.rows.len())
    }
}

/// Reject identities no stored record can carry
pub(crate) fn ensure_assigned<T: Entity>(id: T::Id) -> DirectoryResult<()> {
    if id.raw() <= 0 {
        return Err(DirectoryError::InvalidArgument(format!(
            "{} identity must be positive, got {}",
            T::KIND,
            id
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{User, UserId};
    use chrono::NaiveDate;
    use std::collections::HashSet;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn user(forename: &str) -> User {
        User::new(
            forename,
            "Tester",
            format!("{}@example.com", forename.to_lowercase()),
            true,
            NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        )
    }

    #[test]
    fn test_empty_table() {
        let repo = TableRepository::<User>::in_memory();
        assert!(repo.list_all().unwrap().is_empty());
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_add_assigns_sequential_ids() {
        let repo = TableRepository::<User>::in_memory();

        let a = repo.add(user("Ann")).unwrap();
        let b = repo.add(user("Bob")).unwrap();

        assert_eq!(a.id, UserId::new(1));
        assert_eq!(b.id, UserId::new(2));
        assert_eq!(repo.get(b.id).unwrap().unwrap().forename, "Bob");
    }

    #[test]
    fn test_add_replaces_incoming_id() {
        let repo = TableRepository::<User>::in_memory();
        let stored = repo.add(user("Ann").with_id(UserId::new(500))).unwrap();
        assert_eq!(stored.id, UserId::new(1));
    }

    #[test]
    fn test_ids_never_reused_after_remove() {
        let repo = TableRepository::<User>::in_memory();
        let a = repo.add(user("Ann")).unwrap();
        repo.remove(&a).unwrap();

        let b = repo.add(user("Bob")).unwrap();
        assert_eq!(b.id, UserId::new(2));
    }

    #[test]
    fn test_seed_moves_counter_past_highest_id() {
        let repo = TableRepository::<User>::in_memory();
        repo.seed(vec![
            user("Ann").with_id(UserId::new(3)),
            user("Bob").with_id(UserId::new(11)),
        ])
        .unwrap();

        assert_eq!(repo.next_id().unwrap(), UserId::new(12));
        let c = repo.add(user("Cat")).unwrap();
        assert_eq!(c.id, UserId::new(12));
    }

    #[test]
    fn test_update_replaces_record() {
        let repo = TableRepository::<User>::in_memory();
        let mut a = repo.add(user("Ann")).unwrap();
        a.email = "ann@new.example.com".into();

        repo.update(a.clone()).unwrap();

        assert_eq!(repo.get(a.id).unwrap().unwrap().email, "ann@new.example.com");
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let repo = TableRepository::<User>::in_memory();
        let err = repo
            .update(user("Ghost").with_id(UserId::new(42)))
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "User not found: 42");
    }

    #[test]
    fn test_unassigned_identity_is_invalid_argument() {
        let repo = TableRepository::<User>::in_memory();
        assert!(repo.update(user("Ann")).unwrap_err().is_invalid_argument());
        assert!(repo.remove(&user("Ann")).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_remove_missing_is_not_found() {
        let repo = TableRepository::<User>::in_memory();
        let err = repo.remove(&user("Ghost").with_id(UserId::new(7))).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_snapshot_unaffected_by_later_writes() {
        let repo = TableRepository::<User>::in_memory();
        let a = repo.add(user("Ann")).unwrap();
        let snapshot = repo.list_all().unwrap();

        repo.remove(&a).unwrap();
        repo.add(user("Bob")).unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].forename, "Ann");
    }

    #[test]
    fn test_concurrent_adds_get_distinct_contiguous_ids() {
        let repo = Arc::new(TableRepository::<User>::in_memory());
        let n = 64;

        let handles: Vec<_> = (0..n)
            .map(|i| {
                let repo = Arc::clone(&repo);
                std::thread::spawn(move || repo.add(user(&format!("U{}", i))).unwrap().id)
            })
            .collect();

        let ids: HashSet<i64> = handles
            .into_iter()
            .map(|h| h.join().unwrap().value())
            .collect();

        assert_eq!(ids.len(), n);
        assert_eq!(ids.iter().min(), Some(&1));
        assert_eq!(ids.iter().max(), Some(&(n as i64)));
    }

    #[test]
    fn test_clear_keeps_counter() {
        let repo = TableRepository::<User>::in_memory();
        repo.add(user("Ann")).unwrap();
        repo.clear().unwrap();

        assert!(repo.list_all().unwrap().is_empty());
        assert_eq!(repo.add(user("Bob")).unwrap().id, UserId::new(2));
    }

    #[test]
    fn test_file_backed_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("users.json");

        let repo = TableRepository::<User>::with_path(path.clone());
        repo.load().unwrap();
        let a = repo.add(user("Ann")).unwrap();
        let b = repo.add(user("Bob")).unwrap();
        repo.remove(&b).unwrap();

        let reopened = TableRepository::<User>::with_path(path);
        reopened.load().unwrap();

        let all = reopened.list_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, a.id);
        // The removed identity stays retired across restarts
        assert_eq!(reopened.next_id().unwrap(), UserId::new(3));
    }

    #[test]
    fn test_seed_refuses_issued_ids() {
        let repo = TableRepository::<User>::in_memory();
        let a = repo.add(user("Ann")).unwrap();
        repo.remove(&a).unwrap();

        let err = repo
            .seed(vec![user("Bob").with_id(UserId::new(1))])
            .unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(repo.list_all().unwrap().is_empty());
        assert!(!repo.is_pristine().unwrap());
    }

    #[test]
    fn test_seed_refuses_descending_ids() {
        let repo = TableRepository::<User>::in_memory();
        let err = repo
            .seed(vec![
                user("Ann").with_id(UserId::new(5)),
                user("Bob").with_id(UserId::new(2)),
            ])
            .unwrap_err();

        assert!(err.is_invalid_argument());
        assert_eq!(repo.count().unwrap(), 0);
        assert!(repo.is_pristine().unwrap());
    }

    #[test]
    fn test_restore_only_accepts_removed_records() {
        let repo = TableRepository::<User>::in_memory();
        let a = repo.add(user("Ann")).unwrap();

        assert!(repo.restore(a.clone()).is_err());
        assert!(repo.restore(user("Cat").with_id(UserId::new(9))).is_err());

        repo.remove(&a).unwrap();
        repo.restore(a.clone()).unwrap();
        assert_eq!(repo.get(a.id).unwrap(), Some(a));
    }

    #[test]
    fn test_failed_write_leaves_memory_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("users.json");
        let repo = TableRepository::<User>::with_path(path.clone());
        let a = repo.add(user("Ann")).unwrap();

        // A directory where the temp snapshot goes makes every write fail
        std::fs::create_dir(path.with_extension("json.tmp")).unwrap();

        assert!(repo.add(user("Bob")).is_err());
        let mut changed = a.clone();
        changed.forename = "Anna".into();
        assert!(repo.update(changed).is_err());
        assert!(repo.remove(&a).is_err());

        assert_eq!(repo.list_all().unwrap(), vec![a]);
        // The failed add still consumed its identity
        assert_eq!(repo.next_id().unwrap(), UserId::new(3));
    }
}

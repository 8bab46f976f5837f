//! User directory service
//!
//! The only place business rules live: filtering, lookup, and the audit
//! policy attached to each mutation. Store failures pass through untouched.
//! A mutation whose audit entry cannot be appended is undone, so the trail
//! never misses a change that stuck.

use crate::audit::{diff_users, render_changes, Action, FieldChange, LogEntry};
use crate::error::{DirectoryError, DirectoryResult};
use crate::models::{LogEntryId, User, UserId};
use crate::storage::Storage;

/// Who is performing an audited action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditContext {
    /// Free-form actor label, e.g. a login name
    pub actor: Option<String>,
}

impl AuditContext {
    /// An action with no named actor
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn actor(name: impl Into<String>) -> Self {
        Self {
            actor: Some(name.into()),
        }
    }
}

/// Service for user management
pub struct UserDirectory<'a> {
    storage: &'a Storage,
}

impl<'a> UserDirectory<'a> {
    /// Create a new user directory over `storage`
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &'a Storage {
        self.storage
    }

    /// List all users
    pub fn all_users(&self) -> DirectoryResult<Vec<User>> {
        self.storage.list_all::<User>()
    }

    /// Users whose active flag equals `is_active`
    pub fn users_where_active(&self, is_active: bool) -> DirectoryResult<Vec<User>> {
        Ok(self
            .all_users()?
            .into_iter()
            .filter(|u| u.is_active == is_active)
            .collect())
    }

    /// Look up a user; a missing user is `Ok(None)`, not an error
    pub fn user_by_id(&self, id: UserId) -> DirectoryResult<Option<User>> {
        if !id.is_assigned() {
            return Err(DirectoryError::InvalidArgument(format!(
                "User identity must be positive, got {}",
                id
            )));
        }

        Ok(self.all_users()?.into_iter().find(|u| u.id == id))
    }

    /// Store a new user without writing an audit entry
    pub fn create(&self, user: User) -> DirectoryResult<User> {
        let user = self.storage.add(user)?;
        tracing::info!(user_id = %user.id, "user created");
        Ok(user)
    }

    /// Store a new user and append a "Created" audit entry
    pub fn create_and_log(&self, user: User, context: &AuditContext) -> DirectoryResult<User> {
        let user = self.create(user)?;

        let mut details = format!(
            "Created user {} ({}, {}, born {})",
            user.full_name(),
            user.email,
            if user.is_active { "active" } else { "inactive" },
            user.date_of_birth.format("%Y-%m-%d"),
        );
        if let Some(actor) = &context.actor {
            details.push_str(&format!(" by {}", actor));
        }

        let entry = LogEntry::new(Some(user.id), Action::Created, Some(details));
        if let Err(err) = self.storage.audit_log().append(entry) {
            // The identity stays retired
            self.storage.remove(&user)?;
            return Err(err);
        }

        Ok(user)
    }

    /// Apply `proposed` onto the stored record with `existing.id` and audit
    /// what changed
    ///
    /// The diff runs against the stored record, not the caller's copy, so a
    /// stale `existing` never reverts a field without an entry saying so.
    /// When nothing differs, nothing is persisted and nothing is logged; the
    /// returned list is then empty.
    ///
    /// The record is written before the entry is appended. If the append
    /// fails, the stored record is put back and the append error returned.
    pub fn update_with_audit(
        &self,
        existing: &User,
        proposed: &User,
    ) -> DirectoryResult<Vec<FieldChange>> {
        let current = self
            .user_by_id(existing.id)?
            .ok_or_else(|| DirectoryError::user_not_found(existing.id.to_string()))?;

        let changes = diff_users(&current, proposed);
        if changes.is_empty() {
            tracing::debug!(user_id = %current.id, "update changed nothing, skipping");
            return Ok(changes);
        }

        let mut updated = current.clone();
        updated.overwrite_from(proposed);
        self.storage.update(updated)?;

        let entry = LogEntry::new(
            Some(current.id),
            Action::Updated,
            Some(render_changes(&changes)),
        );
        if let Err(err) = self.storage.audit_log().append(entry) {
            self.storage.update(current)?;
            return Err(err);
        }

        tracing::info!(user_id = %existing.id, changes = changes.len(), "user updated");
        Ok(changes)
    }

    /// Remove a user and append a "Deleted" audit entry
    ///
    /// Earlier entries about the user stay in the trail. If the append
    /// fails, the user is restored under the same identity.
    pub fn delete_with_audit(&self, user: &User) -> DirectoryResult<User> {
        let removed = self.storage.remove(user)?;

        let entry = LogEntry::new(
            Some(removed.id),
            Action::Deleted,
            Some(format!("Deleted user {}", removed.full_name())),
        );
        if let Err(err) = self.storage.audit_log().append(entry) {
            self.storage.users.restore(removed)?;
            return Err(err);
        }

        tracing::info!(user_id = %removed.id, "user deleted");
        Ok(removed)
    }

    /// Audit trail for one user, newest first
    pub fn logs_for(&self, user_id: UserId) -> DirectoryResult<Vec<LogEntry>> {
        self.storage.audit_log().entries_for(user_id)
    }

    /// Append an arbitrary audit entry
    pub fn log_user_action(
        &self,
        user_id: Option<UserId>,
        action: impl Into<String>,
        details: Option<String>,
    ) -> DirectoryResult<LogEntry> {
        self.storage
            .audit_log()
            .append(LogEntry::new(user_id, action, details))
    }

    /// A single audit entry
    pub fn log_entry(&self, id: LogEntryId) -> DirectoryResult<LogEntry> {
        self.storage.audit_log().entry_by_id(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::seed::DEFAULT_USER_COUNT;
    use chrono::NaiveDate;
    use std::collections::HashSet;

    fn new_user(forename: &str, surname: &str, active: bool) -> User {
        User::new(
            forename,
            surname,
            format!("{}.{}@example.com", forename, surname).to_lowercase(),
            active,
            NaiveDate::from_ymd_opt(1985, 3, 14).unwrap(),
        )
    }

    fn empty_storage() -> Storage {
        Storage::in_memory()
    }

    #[test]
    fn test_create_round_trip() {
        let storage = empty_storage();
        let service = UserDirectory::new(&storage);
        let user = new_user("Test", "User", true);

        let created = service.create(user.clone()).unwrap();
        let found = service.user_by_id(created.id).unwrap().unwrap();

        assert!(created.id.is_assigned());
        assert_eq!(found, user.with_id(created.id));
    }

    #[test]
    fn test_create_writes_no_audit_entry() {
        let storage = empty_storage();
        let service = UserDirectory::new(&storage);
        let created = service.create(new_user("Test", "User", true)).unwrap();

        assert!(service.logs_for(created.id).unwrap().is_empty());
    }

    #[test]
    fn test_create_and_log() {
        let storage = empty_storage();
        let service = UserDirectory::new(&storage);

        let created = service
            .create_and_log(new_user("Ada", "King", true), &AuditContext::actor("admin"))
            .unwrap();

        let logs = service.logs_for(created.id).unwrap();
        assert_eq!(logs.len(), 1);
        assert!(logs[0].is_action(Action::Created));
        let details = logs[0].details.as_deref().unwrap();
        assert!(details.contains("Ada King"));
        assert!(details.ends_with("by admin"));
    }

    #[test]
    fn test_user_by_id_missing_is_none() {
        let storage = Storage::seeded().unwrap();
        let service = UserDirectory::new(&storage);

        assert!(service.user_by_id(UserId::new(999)).unwrap().is_none());
        assert_eq!(
            service.user_by_id(UserId::new(1)).unwrap().unwrap().forename,
            "Peter"
        );
    }

    #[test]
    fn test_user_by_id_rejects_non_positive() {
        let storage = empty_storage();
        let service = UserDirectory::new(&storage);
        assert!(service
            .user_by_id(UserId::new(0))
            .unwrap_err()
            .is_invalid_argument());
    }

    #[test]
    fn test_filter_partitions_users() {
        let storage = Storage::seeded().unwrap();
        let service = UserDirectory::new(&storage);

        let active = service.users_where_active(true).unwrap();
        let inactive = service.users_where_active(false).unwrap();

        assert!(active.iter().all(|u| u.is_active));
        assert!(inactive.iter().all(|u| !u.is_active));

        let active_ids: HashSet<_> = active.iter().map(|u| u.id).collect();
        let inactive_ids: HashSet<_> = inactive.iter().map(|u| u.id).collect();
        assert!(active_ids.is_disjoint(&inactive_ids));
        assert_eq!(active_ids.len() + inactive_ids.len(), DEFAULT_USER_COUNT);
    }

    #[test]
    fn test_no_op_update_is_silent() {
        let storage = Storage::seeded().unwrap();
        let service = UserDirectory::new(&storage);
        let user = service.user_by_id(UserId::new(3)).unwrap().unwrap();

        let changes = service.update_with_audit(&user, &user).unwrap();

        assert!(changes.is_empty());
        assert_eq!(storage.audit_log().len().unwrap(), 0);
    }

    #[test]
    fn test_update_audits_changed_field_only() {
        let storage = empty_storage();
        let service = UserDirectory::new(&storage);
        let existing = service.create(new_user("A", "Stone", true)).unwrap();

        let mut proposed = existing.clone();
        proposed.forename = "B".into();
        let changes = service.update_with_audit(&existing, &proposed).unwrap();

        assert_eq!(changes.len(), 1);
        let logs = service.logs_for(existing.id).unwrap();
        assert_eq!(logs.len(), 1);
        assert!(logs[0].is_action(Action::Updated));
        let details = logs[0].details.as_deref().unwrap();
        assert!(details.contains("Forename changed from A to B"));
        assert!(!details.contains("Surname"));

        let stored = service.user_by_id(existing.id).unwrap().unwrap();
        assert_eq!(stored.forename, "B");
    }

    #[test]
    fn test_update_joins_multiple_changes() {
        let storage = empty_storage();
        let service = UserDirectory::new(&storage);
        let existing = service.create(new_user("A", "Stone", true)).unwrap();

        let mut proposed = existing.clone();
        proposed.surname = "Rock".into();
        proposed.is_active = false;
        service.update_with_audit(&existing, &proposed).unwrap();

        let logs = service.logs_for(existing.id).unwrap();
        assert_eq!(
            logs[0].details.as_deref(),
            Some("Surname changed from Stone to Rock; Active changed from true to false")
        );
    }

    #[test]
    fn test_update_keeps_existing_identity() {
        let storage = empty_storage();
        let service = UserDirectory::new(&storage);
        let existing = service.create(new_user("A", "Stone", true)).unwrap();

        let proposed = new_user("C", "Stone", true).with_id(UserId::new(77));
        service.update_with_audit(&existing, &proposed).unwrap();

        assert_eq!(service.all_users().unwrap()[0].id, existing.id);
    }

    #[test]
    fn test_update_missing_user_propagates_not_found() {
        let storage = empty_storage();
        let service = UserDirectory::new(&storage);
        let ghost = new_user("A", "Ghost", true).with_id(UserId::new(40));
        let mut proposed = ghost.clone();
        proposed.forename = "B".into();

        let err = service.update_with_audit(&ghost, &proposed).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(storage.audit_log().len().unwrap(), 0);
    }

    #[test]
    fn test_delete_keeps_history() {
        let storage = empty_storage();
        let service = UserDirectory::new(&storage);
        let user = service
            .create_and_log(new_user("Del", "Me", true), &AuditContext::anonymous())
            .unwrap();

        service.delete_with_audit(&user).unwrap();

        assert!(!service.all_users().unwrap().iter().any(|u| u.id == user.id));
        let logs = service.logs_for(user.id).unwrap();
        assert_eq!(logs.len(), 2);
        assert!(logs.iter().any(|l| l.is_action(Action::Created)));
        let deleted = logs.iter().find(|l| l.is_action(Action::Deleted)).unwrap();
        assert_eq!(deleted.details.as_deref(), Some("Deleted user Del Me"));
    }

    #[test]
    fn test_delete_missing_propagates_not_found() {
        let storage = empty_storage();
        let service = UserDirectory::new(&storage);
        let ghost = new_user("No", "One", true).with_id(UserId::new(5));

        assert!(service.delete_with_audit(&ghost).unwrap_err().is_not_found());
        assert_eq!(storage.audit_log().len().unwrap(), 0);
    }

    #[test]
    fn test_concurrent_creates_get_contiguous_ids() {
        let storage = empty_storage();
        let n = 50;

        let ids: Vec<UserId> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..n)
                .map(|i| {
                    let storage = &storage;
                    scope.spawn(move || {
                        UserDirectory::new(storage)
                            .create(new_user(&format!("U{}", i), "Load", true))
                            .unwrap()
                            .id
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let mut raw: Vec<i64> = ids.iter().map(|id| id.value()).collect();
        raw.sort_unstable();
        assert_eq!(raw, (1..=n as i64).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_store_lists_empty() {
        let storage = Storage::seeded().unwrap();
        storage.clear::<User>().unwrap();
        let service = UserDirectory::new(&storage);
        assert!(service.all_users().unwrap().is_empty());
    }

    #[test]
    fn test_log_user_action_and_lookup() {
        let storage = empty_storage();
        let service = UserDirectory::new(&storage);

        let entry = service
            .log_user_action(Some(UserId::new(3)), "Viewed", None)
            .unwrap();

        assert_eq!(service.log_entry(entry.id).unwrap(), entry);
        assert!(service
            .log_entry(LogEntryId::new(entry.id.value() + 1))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_stale_snapshot_does_not_revert_other_changes() {
        let storage = Storage::seeded().unwrap();
        let service = UserDirectory::new(&storage);
        let snapshot = service.user_by_id(UserId::new(1)).unwrap().unwrap();

        let mut first = snapshot.clone();
        first.email = "peter@example.com".into();
        service.update_with_audit(&snapshot, &first).unwrap();

        let mut second = snapshot.clone();
        second.forename = "Pete".into();
        let changes = service.update_with_audit(&snapshot, &second).unwrap();

        // The stale copy still carries the old email, and that revert is audited
        assert_eq!(changes.len(), 2);
        let stored = service.user_by_id(UserId::new(1)).unwrap().unwrap();
        assert_eq!(stored.forename, "Pete");
        assert_eq!(stored.email, "ploew@example.com");
        assert_eq!(
            service.logs_for(UserId::new(1)).unwrap()[0].details.as_deref(),
            Some("Forename changed from Peter to Pete; Email changed from peter@example.com to ploew@example.com")
        );
    }

    #[test]
    fn test_update_with_current_fields_only_changes_those() {
        let storage = Storage::seeded().unwrap();
        let service = UserDirectory::new(&storage);
        let snapshot = service.user_by_id(UserId::new(1)).unwrap().unwrap();

        let mut first = snapshot.clone();
        first.email = "peter@example.com".into();
        service.update_with_audit(&snapshot, &first).unwrap();

        // Same unchanged proposal replayed against the newer stored row
        let changes = service.update_with_audit(&snapshot, &first).unwrap();
        assert!(changes.is_empty());
        assert_eq!(service.logs_for(UserId::new(1)).unwrap().len(), 1);
    }

    fn storage_with_broken_trail() -> (tempfile::TempDir, Storage) {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let paths =
            crate::config::DirectoryPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths.clone()).unwrap();
        storage.users.seed(crate::storage::seed::default_users()).unwrap();

        // Every snapshot write of the trail now fails
        std::fs::create_dir_all(paths.log_entries_file().with_extension("json.tmp")).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_failed_append_undoes_update() {
        let (_dir, storage) = storage_with_broken_trail();
        let service = UserDirectory::new(&storage);
        let existing = service.user_by_id(UserId::new(1)).unwrap().unwrap();
        let mut proposed = existing.clone();
        proposed.surname = "Lowe".into();

        let err = service.update_with_audit(&existing, &proposed).unwrap_err();
        assert!(matches!(err, DirectoryError::Storage(_)));

        assert_eq!(service.user_by_id(existing.id).unwrap(), Some(existing.clone()));
        assert!(service.logs_for(existing.id).unwrap().is_empty());

        storage.load_all().unwrap();
        assert_eq!(service.user_by_id(existing.id).unwrap(), Some(existing));
    }

    #[test]
    fn test_failed_append_undoes_delete() {
        let (_dir, storage) = storage_with_broken_trail();
        let service = UserDirectory::new(&storage);
        let user = service.user_by_id(UserId::new(3)).unwrap().unwrap();

        assert!(service.delete_with_audit(&user).is_err());

        assert_eq!(service.user_by_id(user.id).unwrap(), Some(user.clone()));
        assert!(storage.audit_log().is_empty().unwrap());
        storage.load_all().unwrap();
        assert_eq!(service.user_by_id(user.id).unwrap(), Some(user));
    }

    #[test]
    fn test_failed_append_undoes_create_and_log() {
        let (_dir, storage) = storage_with_broken_trail();
        let service = UserDirectory::new(&storage);

        let result = service.create_and_log(new_user("Ada", "Byron", true), &AuditContext::anonymous());

        assert!(result.is_err());
        assert_eq!(service.all_users().unwrap().len(), DEFAULT_USER_COUNT);
        assert_eq!(storage.users.next_id().unwrap(), UserId::new(13));
    }
}

//! Audit trail for the user directory
//!
//! Records every audited create, update and delete as a [`LogEntry`] stored
//! alongside users in the same store.
//!
//! # Architecture
//!
//! - `LogEntry`: one append-only audit record (subject, action tag, details,
//!   timestamp).
//! - `AuditLog`: append and newest-first read paths over the stored entries.
//! - `diff_users`: structured field-by-field comparison of two users, with
//!   `render_changes` producing the text stored in `details`.
//!
//! # Example
//!
//! ```rust,ignore
//! use user_management::audit::{diff_users, render_changes, Action, LogEntry};
//!
//! let changes = diff_users(&existing, &proposed);
//! if !changes.is_empty() {
//!     storage.audit_log().append(LogEntry::new(
//!         Some(existing.id),
//!         Action::Updated,
//!         Some(render_changes(&changes)),
//!     ))?;
//! }
//! ```

mod diff;
mod entry;
mod trail;

pub use diff::{diff_users, render_changes, FieldChange, FieldValue, UserField, CHANGE_SEPARATOR};
pub use entry::{Action, LogEntry};
pub use trail::{newest_first, AuditLog};

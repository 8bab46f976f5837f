//! User Management - a user catalogue with an append-only audit trail
//!
//! Users are kept in an in-memory (optionally file-backed) store. Every
//! audited mutation goes through [`services::UserDirectory`], which computes
//! a field-level diff and appends a [`audit::LogEntry`] describing it.
//!
//! # Architecture
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: User record and integer identities
//! - `storage`: Generic entity tables with optional JSON persistence
//! - `audit`: Change detection and the audit trail
//! - `services`: Business rules and the joined audit projection
//! - `export`: JSON, YAML and CSV exports
//! - `cli` / `display`: Command handlers and terminal formatting
//!
//! # Example
//!
//! ```rust
//! use user_management::models::UserId;
//! use user_management::services::UserDirectory;
//! use user_management::storage::Storage;
//!
//! let storage = Storage::seeded()?;
//! let directory = UserDirectory::new(&storage);
//!
//! let existing = directory.user_by_id(UserId::new(1))?.expect("seeded");
//! let mut proposed = existing.clone();
//! proposed.forename = "Pete".into();
//!
//! let changes = directory.update_with_audit(&existing, &proposed)?;
//! assert_eq!(changes.len(), 1);
//! assert_eq!(directory.logs_for(existing.id)?.len(), 1);
//! # Ok::<(), user_management::DirectoryError>(())
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{DirectoryError, DirectoryResult};

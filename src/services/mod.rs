//! Service layer
//!
//! Services borrow a [`Storage`](crate::storage::Storage) and hold the
//! business rules on top of it.

pub mod log_view;
pub mod user;

pub use log_view::LogEntryView;
pub use user::{AuditContext, UserDirectory};

//! Display formatting for terminal output
//!
//! Column-aligned tables and detail views for users and audit entries.

pub mod log;
pub mod user;

pub use log::{format_log_details, format_log_list, format_user_logs};
pub use user::{format_user_details, format_user_list};

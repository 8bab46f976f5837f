//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod export;
pub mod log;
pub mod user;

pub use export::{handle_export_command, ExportArgs, ExportFormat, ExportTarget};
pub use log::{handle_log_command, LogCommands};
pub use user::{handle_user_command, UserCommands};

//! Audit trail CLI commands

use clap::Subcommand;

use crate::display::{format_log_details, format_log_list};
use crate::error::{DirectoryError, DirectoryResult};
use crate::models::LogEntryId;
use crate::services::UserDirectory;
use crate::storage::Storage;

/// Log subcommands
#[derive(Subcommand)]
pub enum LogCommands {
    /// List audit entries, newest first
    List {
        /// Case-insensitive match on forename or surname
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one audit entry
    Show {
        /// Log entry ID
        id: String,
    },
}

/// Handle a log command
pub fn handle_log_command(storage: &Storage, cmd: LogCommands) -> DirectoryResult<()> {
    let service = UserDirectory::new(storage);

    match cmd {
        LogCommands::List { search } => {
            let views = service.all_log_entries(search.as_deref())?;
            println!("{}", format_log_list(&views));
        }
        LogCommands::Show { id } => {
            let log_id = id.parse::<LogEntryId>().map_err(|_| {
                DirectoryError::InvalidArgument(format!("Invalid log entry ID: {}", id))
            })?;
            let entry = service.log_entry(log_id)?;
            println!("{}", format_log_details(&entry));
        }
    }

    Ok(())
}

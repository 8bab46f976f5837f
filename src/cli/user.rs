//! User CLI commands
//!
//! Implements CLI commands for user management.

use chrono::NaiveDate;
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_user_details, format_user_list, format_user_logs};
use crate::error::{DirectoryError, DirectoryResult};
use crate::models::{User, UserId};
use crate::services::{AuditContext, UserDirectory};
use crate::storage::Storage;

/// User subcommands
#[derive(Subcommand)]
pub enum UserCommands {
    /// List users
    List {
        /// Only active users
        #[arg(long, conflicts_with = "inactive")]
        active: bool,
        /// Only inactive users
        #[arg(long)]
        inactive: bool,
    },
    /// Show user details
    Show {
        /// User ID
        id: String,
    },
    /// Add a new user
    Add {
        #[arg(long)]
        forename: String,
        #[arg(long)]
        surname: String,
        #[arg(long)]
        email: String,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: String,
        /// Create the user as inactive
        #[arg(long)]
        inactive: bool,
        /// Name recorded in the audit entry
        #[arg(long, env = "USERMGMT_ACTOR")]
        actor: Option<String>,
    },
    /// Edit a user; only the given fields change
    Edit {
        /// User ID
        id: String,
        #[arg(long)]
        forename: Option<String>,
        #[arg(long)]
        surname: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Active flag (true/false)
        #[arg(long)]
        active: Option<bool>,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: Option<String>,
    },
    /// Delete a user
    Delete {
        /// User ID
        id: String,
    },
    /// Show the audit trail for a user
    Logs {
        /// User ID
        id: String,
    },
}

/// Handle a user command
pub fn handle_user_command(
    storage: &Storage,
    settings: &Settings,
    cmd: UserCommands,
) -> DirectoryResult<()> {
    let service = UserDirectory::new(storage);

    match cmd {
        UserCommands::List { active, inactive } => {
            let users = if active {
                service.users_where_active(true)?
            } else if inactive {
                service.users_where_active(false)?
            } else {
                service.all_users()?
            };
            println!("{}", format_user_list(&users, &settings.date_format));
        }

        UserCommands::Show { id } => {
            let user = find_user(&service, &id)?;
            println!("{}", format_user_details(&user, &settings.date_format));
        }

        UserCommands::Add {
            forename,
            surname,
            email,
            dob,
            inactive,
            actor,
        } => {
            let user = User::new(forename, surname, email, !inactive, parse_date(&dob)?);
            user.validate()
                .map_err(|e| DirectoryError::Validation(e.to_string()))?;

            let created = if settings.audit_creates {
                let context = actor.map(AuditContext::actor).unwrap_or_default();
                service.create_and_log(user, &context)?
            } else {
                service.create(user)?
            };

            println!("Created user: {} (ID: {})", created.full_name(), created.id);
        }

        UserCommands::Edit {
            id,
            forename,
            surname,
            email,
            active,
            dob,
        } => {
            let existing = find_user(&service, &id)?;

            let mut proposed = existing.clone();
            if let Some(forename) = forename {
                proposed.forename = forename;
            }
            if let Some(surname) = surname {
                proposed.surname = surname;
            }
            if let Some(email) = email {
                proposed.email = email;
            }
            if let Some(active) = active {
                proposed.is_active = active;
            }
            if let Some(dob) = dob {
                proposed.date_of_birth = parse_date(&dob)?;
            }
            proposed
                .validate()
                .map_err(|e| DirectoryError::Validation(e.to_string()))?;

            let changes = service.update_with_audit(&existing, &proposed)?;
            if changes.is_empty() {
                println!("No changes for user {}.", existing.id);
            } else {
                println!("Updated user {}:", existing.id);
                for change in &changes {
                    println!("  {}", change);
                }
            }
        }

        UserCommands::Delete { id } => {
            let user = find_user(&service, &id)?;
            let removed = service.delete_with_audit(&user)?;
            println!("Deleted user: {} (ID: {})", removed.full_name(), removed.id);
        }

        UserCommands::Logs { id } => {
            let user_id = parse_user_id(&id)?;
            let entries = service.logs_for(user_id)?;
            println!("{}", format_user_logs(&entries));
        }
    }

    Ok(())
}

fn parse_user_id(raw: &str) -> DirectoryResult<UserId> {
    raw.parse::<UserId>()
        .map_err(|_| DirectoryError::InvalidArgument(format!("Invalid user ID: {}", raw)))
}

fn find_user(service: &UserDirectory<'_>, raw: &str) -> DirectoryResult<User> {
    let id = parse_user_id(raw)?;
    service
        .user_by_id(id)?
        .ok_or_else(|| DirectoryError::user_not_found(id.to_string()))
}

pub(crate) fn parse_date(raw: &str) -> DirectoryResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        DirectoryError::InvalidArgument(format!("Invalid date '{}', expected YYYY-MM-DD", raw))
    })
}

use anyhow::Result;
use clap::{Parser, Subcommand};

use user_management::cli::{
    handle_export_command, handle_log_command, handle_user_command, ExportArgs, LogCommands,
    UserCommands,
};
use user_management::config::{paths::DirectoryPaths, settings::Settings};
use user_management::logging::init_logging;
use user_management::storage::{init, Storage};

#[derive(Parser)]
#[command(
    name = "usermgmt",
    version,
    about = "User catalogue with a field-level audit trail",
    long_about = "usermgmt keeps a small catalogue of users. Every edit and delete \
                  is recorded in an append-only audit trail describing exactly \
                  which fields changed."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and seed the default users
    Init,

    /// Show current configuration and paths
    Config,

    /// User management commands
    #[command(subcommand)]
    User(UserCommands),

    /// Audit trail commands
    #[command(subcommand, alias = "logs")]
    Log(LogCommands),

    /// Export users and/or the audit trail
    Export(ExportArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = DirectoryPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_logging(&settings);

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing usermgmt at: {}", paths.base_dir().display());
            let seeded = init::initialize_storage(&paths, &settings)?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            if seeded > 0 {
                println!("Seeded {} default users.", seeded);
            }
            println!();
            println!("Run 'usermgmt user list' to see all users.");
        }
        Some(Commands::Config) => {
            println!("usermgmt Configuration");
            println!("======================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!("Users file:     {}", paths.users_file().display());
            println!("Logs file:      {}", paths.log_entries_file().display());
            println!();
            println!("Settings:");
            println!("  Seed on init:  {}", settings.seed_on_init);
            println!("  Audit creates: {}", settings.audit_creates);
            println!("  Date format:   {}", settings.date_format);
            println!("  Log filter:    {}", settings.log_filter);
        }
        Some(Commands::User(cmd)) => {
            let storage = open_storage(paths)?;
            handle_user_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Log(cmd)) => {
            let storage = open_storage(paths)?;
            handle_log_command(&storage, cmd)?;
        }
        Some(Commands::Export(args)) => {
            let storage = open_storage(paths)?;
            handle_export_command(&storage, args)?;
        }
        None => {
            println!("usermgmt - user catalogue with an audit trail");
            println!();
            println!("Run 'usermgmt --help' for usage information.");
            println!("Run 'usermgmt init' to create the data directory.");
        }
    }

    Ok(())
}

fn open_storage(paths: DirectoryPaths) -> Result<Storage> {
    if init::needs_initialization(&paths) {
        tracing::warn!("data directory not initialized; run 'usermgmt init'");
    }
    Ok(Storage::open(paths)?)
}

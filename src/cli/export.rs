//! CLI commands for data export

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::error::{DirectoryError, DirectoryResult};
use crate::export::{csv, json, yaml};
use crate::services::UserDirectory;
use crate::storage::Storage;

/// What to export
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportTarget {
    Users,
    Logs,
    /// Users and the audit trail together
    All,
}

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    /// Human-readable YAML
    Yaml,
    /// One table; not available for `all`
    Csv,
}

/// Arguments of `usermgmt export`
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// What to export
    #[arg(value_enum)]
    pub target: ExportTarget,

    /// Export format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ExportFormat,

    /// Output file path (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Handle the export command
pub fn handle_export_command(storage: &Storage, args: ExportArgs) -> DirectoryResult<()> {
    // Checked before any output file is created or truncated
    ensure_supported(args.target, args.format)?;

    match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                DirectoryError::Export(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            let mut writer = BufWriter::new(file);
            write_export(storage, args.target, args.format, &mut writer)?;
            writer.flush()?;
            println!("Exported {:?} to: {}", args.target, path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_export(storage, args.target, args.format, &mut writer)?;
            writer.flush()?;
        }
    }

    Ok(())
}

fn ensure_supported(target: ExportTarget, format: ExportFormat) -> DirectoryResult<()> {
    if target == ExportTarget::All && format == ExportFormat::Csv {
        return Err(DirectoryError::InvalidArgument(
            "CSV exports one table at a time; use 'users' or 'logs'".into(),
        ));
    }
    Ok(())
}

fn write_export<W: Write>(
    storage: &Storage,
    target: ExportTarget,
    format: ExportFormat,
    writer: &mut W,
) -> DirectoryResult<()> {
    let service = UserDirectory::new(storage);

    match (target, format) {
        (ExportTarget::All, ExportFormat::Json) => json::export_full_json(storage, writer, true),
        (ExportTarget::All, ExportFormat::Yaml) => yaml::export_full_yaml(storage, writer),
        (ExportTarget::All, ExportFormat::Csv) => ensure_supported(target, format),
        (ExportTarget::Users, ExportFormat::Csv) => csv::export_users_csv(storage, writer),
        (ExportTarget::Logs, ExportFormat::Csv) => csv::export_logs_csv(storage, writer),
        (ExportTarget::Users, ExportFormat::Json) => {
            serde_json::to_writer_pretty(&mut *writer, &service.all_users()?)?;
            writeln!(writer)?;
            Ok(())
        }
        (ExportTarget::Logs, ExportFormat::Json) => {
            serde_json::to_writer_pretty(&mut *writer, &storage.audit_log().all_entries()?)?;
            writeln!(writer)?;
            Ok(())
        }
        (ExportTarget::Users, ExportFormat::Yaml) => {
            serde_yaml::to_writer(writer, &service.all_users()?)
                .map_err(|e| DirectoryError::Export(e.to_string()))
        }
        (ExportTarget::Logs, ExportFormat::Yaml) => {
            serde_yaml::to_writer(writer, &storage.audit_log().all_entries()?)
                .map_err(|e| DirectoryError::Export(e.to_string()))
        }
    }
}

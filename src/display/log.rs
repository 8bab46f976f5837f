//! Audit trail display formatting

use crate::audit::LogEntry;
use crate::services::LogEntryView;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format the joined audit listing
pub fn format_log_list(views: &[LogEntryView]) -> String {
    if views.is_empty() {
        return "No log entries found.".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:>5}  {:<19}  {:<10}  {:>6}  {}\n",
        "ID", "Timestamp (UTC)", "Action", "User", "Name"
    ));
    output.push_str(&format!(
        "{:->5}  {:-<19}  {:-<10}  {:->6}  {:-<20}\n",
        "", "", "", "", ""
    ));

    for view in views {
        let user = view.user_id.map(|id| id.to_string()).unwrap_or_default();
        let name = match (view.user_id, view.display_name()) {
            (_, Some(name)) => name,
            (Some(_), None) => "(deleted)".to_string(),
            (None, None) => String::new(),
        };

        output.push_str(&format!(
            "{:>5}  {:<19}  {:<10}  {:>6}  {}\n",
            view.log_id,
            view.timestamp.format(TIMESTAMP_FORMAT),
            view.action,
            user,
            name
        ));
    }

    output.push_str(&format!("\nTotal: {} entries", views.len()));
    output
}

/// Format one user's trail, newest first
pub fn format_user_logs(entries: &[LogEntry]) -> String {
    if entries.is_empty() {
        return "No log entries for this user.".to_string();
    }

    entries
        .iter()
        .map(LogEntry::format_human_readable)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a single entry with every field
pub fn format_log_details(entry: &LogEntry) -> String {
    let mut output = String::new();
    output.push_str(&format!("Log entry: {}\n", entry.id));
    output.push_str(&format!(
        "Timestamp: {} UTC\n",
        entry.timestamp.format(TIMESTAMP_FORMAT)
    ));
    output.push_str(&format!("Action:    {}\n", entry.action));
    output.push_str(&format!(
        "User:      {}\n",
        entry
            .user_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "(none)".to_string())
    ));
    output.push_str(&format!(
        "Details:   {}",
        entry.details.as_deref().unwrap_or("(none)")
    ));
    output
}

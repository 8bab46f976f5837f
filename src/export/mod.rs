//! Export module
//!
//! - CSV: users or the audit trail, one table each
//! - JSON: machine-readable full export
//! - YAML: human-readable full export

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{export_logs_csv, export_users_csv};
pub use json::{export_full_json, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_full_yaml;

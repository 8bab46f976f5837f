//! Configuration module
//!
//! - XDG-compliant path resolution
//! - Settings persistence

pub mod paths;
pub mod settings;

pub use paths::DirectoryPaths;
pub use settings::Settings;

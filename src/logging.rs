//! Tracing subscriber setup for the binary

use tracing_subscriber::EnvFilter;

use crate::config::settings::Settings;

/// Environment variable holding a tracing filter directive
pub const LOG_ENV: &str = "USERMGMT_LOG";

/// Build the filter from `USERMGMT_LOG`, falling back to the settings
pub fn log_filter(settings: &Settings) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global fmt subscriber writing to stderr
///
/// A second call is a no-op, so tests and the binary can both call it.
pub fn init_logging(settings: &Settings) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(settings))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

//! Structured logging for Vivid applications.
//!
//! Installs a `tracing` subscriber with console output (uptime timestamps,
//! targets, levels) and, in debug builds, a JSON log file for post-mortem
//! analysis. The filter comes from [`LogConfig`] and can be overridden with
//! `RUST_LOG`.

use std::path::Path;

use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use vivid_config::{Config, LogConfig};

/// File name of the JSON log written in debug builds.
pub const LOG_FILE: &str = "vivid.log";

/// Filter directives used when no config is supplied.
pub fn default_directives() -> String {
    LogConfig::default().filter_directives()
}

/// Builds the filter: `RUST_LOG` if set and valid, otherwise `directives`.
pub fn env_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives))
}

/// Create an `EnvFilter` from the default [`LogConfig`], ignoring `RUST_LOG`.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(default_directives())
}

/// Initialize the global tracing subscriber.
///
/// # Arguments
///
/// * `log_dir` - Directory for the JSON log file (debug builds only)
/// * `debug_build` - Whether this is a debug build (enables file logging)
/// * `config` - Optional configuration supplying the filter and file toggle
///
/// Returns `true` if this call installed the subscriber. Calling this twice
/// in one process is a no-op for the second call, which returns `false`.
///
/// # Examples
///
/// ```no_run
/// use vivid_config::Config;
/// use vivid_log::init_logging;
///
/// let config = Config::default();
/// init_logging(Some(std::path::Path::new("./logs")), true, Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) -> bool {
    let directives = config
        .map(|config| config.log.filter_directives())
        .unwrap_or_else(default_directives);
    let file_logging = config.is_none_or(|config| config.log.file_logging);

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter(&directives))
        .with(console_layer);

    if debug_build
        && file_logging
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        if subscriber.with(file_layer).try_init().is_err() {
            return false;
        }
        info!(
            directives = %directives,
            file = %log_dir.join(LOG_FILE).display(),
            "Logging initialized"
        );
        return true;
    }

    if subscriber.try_init().is_err() {
        return false;
    }
    info!(directives = %directives, "Logging initialized");
    true
}

//! Command-line argument parsing for Vivid applications.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Vivid command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "vivid", about = "Vivid application runtime")]
pub struct CliArgs {
    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Application name reported to the platform.
    #[arg(long)]
    pub name: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Drive the app through host callbacks instead of the blocking loop.
    #[arg(long)]
    pub host_driven: bool,

    /// Stop after this many frames.
    #[arg(long)]
    pub frames: Option<u64>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref level) = args.log_level {
            self.log.level = level.clone();
        }
        if let Some(ref name) = args.name {
            self.app.name = name.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            log_level: Some("debug".to_string()),
            name: Some("Orbit".to_string()),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.app.name, "Orbit");
        // Non-overridden fields retain defaults
        assert!(config.app.version.is_empty());
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from([
            "vivid",
            "--log-level",
            "trace",
            "--host-driven",
            "--frames",
            "120",
        ]);
        assert_eq!(args.log_level.as_deref(), Some("trace"));
        assert!(args.host_driven);
        assert_eq!(args.frames, Some(120));
        assert!(args.config.is_none());
    }
}

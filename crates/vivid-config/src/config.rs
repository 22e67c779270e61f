//! Configuration structs with sensible defaults and RON persistence.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::AppMetadata;
use crate::error::ConfigError;

/// File name used inside the config directory.
pub const CONFIG_FILE: &str = "config.ron";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Metadata reported to the host platform.
    pub app: AppMetadata,
    /// Logging settings.
    pub log: LogConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Level applied to every target without its own entry
    /// (error, warn, info, debug, trace).
    pub level: String,
    /// Per-target overrides, e.g. `"vivid_app" => "debug"`.
    pub targets: BTreeMap<String, String>,
    /// Also write JSON logs to a file in debug builds.
    pub file_logging: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        let mut targets = BTreeMap::new();
        targets.insert("bevy_ecs".to_string(), "warn".to_string());
        Self {
            level: "info".to_string(),
            targets,
            file_logging: true,
        }
    }
}

impl LogConfig {
    /// Filter directive string in `EnvFilter` syntax, e.g.
    /// `"info,bevy_ecs=warn,vivid_app=debug"`.
    pub fn filter_directives(&self) -> String {
        let level = if self.level.is_empty() {
            "info"
        } else {
            self.level.as_str()
        };

        let mut directives = vec![level.to_string()];
        directives.extend(
            self.targets
                .iter()
                .filter(|(target, lvl)| !target.is_empty() && !lvl.is_empty())
                .map(|(target, lvl)| format!("{target}={lvl}")),
        );
        directives.join(",")
    }

    /// Sets the level for one target.
    pub fn set_target_level(&mut self, target: impl Into<String>, level: impl Into<String>) {
        self.targets.insert(target.into(), level.into());
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::Write {
            path: config_path,
            source,
        })
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppKind;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("name: \"Vivid Application\""));
        assert!(ron_str.contains("level: \"info\""));
    }

    #[test]
    fn test_missing_section_uses_default() {
        let config: Config = ron::from_str("(app: (name: \"Orbit\"))").unwrap();
        assert_eq!(config.app.name, "Orbit");
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_kind_parses_from_ron() {
        let config: Config = ron::from_str("(app: (kind: Game))").unwrap();
        assert_eq!(config.app.kind, AppKind::Game);
    }

    #[test]
    fn test_filter_directives_include_targets() {
        let mut log = LogConfig::default();
        log.level = "debug".to_string();
        log.set_target_level("vivid_app", "trace");
        assert_eq!(log.filter_directives(), "debug,bevy_ecs=warn,vivid_app=trace");
    }

    #[test]
    fn test_filter_directives_fall_back_to_info() {
        let log = LogConfig {
            level: String::new(),
            targets: BTreeMap::new(),
            file_logging: false,
        };
        assert_eq!(log.filter_directives(), "info");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.app = config.app.with_info("Orbit", "0.1.0", "dev.vivid.orbit");
        config.app.set_custom("build", "nightly");
        config.log.level = "warn".to_string();

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.app.version = "9.9.9".to_string();
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.map(|c| c.app.version), Some("9.9.9".to_string()));
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{{not valid}}").unwrap();

        let err = Config::load_or_create(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(CONFIG_FILE));
    }
}

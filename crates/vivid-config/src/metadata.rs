//! Application metadata reported to the host platform.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Name used when none is configured.
pub const DEFAULT_NAME: &str = "Vivid Application";
/// Version substituted when none is configured.
pub const FALLBACK_VERSION: &str = "1.0.0";
/// Identifier substituted when none is configured.
pub const FALLBACK_IDENTIFIER: &str = "com.example.vivid";

/// What kind of program this is, as reported to the platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppKind {
    Game,
    MediaPlayer,
    #[default]
    Application,
}

impl AppKind {
    /// Platform string for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            AppKind::Game => "game",
            AppKind::MediaPlayer => "mediaplayer",
            AppKind::Application => "application",
        }
    }

    /// Parses a platform string. Unknown strings return `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "game" => Some(AppKind::Game),
            "mediaplayer" => Some(AppKind::MediaPlayer),
            "application" => Some(AppKind::Application),
            _ => None,
        }
    }
}

impl fmt::Display for AppKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Addressable metadata fields, for [`AppMetadata::set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataProperty {
    Name,
    Version,
    /// Reverse-domain identifier, e.g. `com.example.mygame`.
    Identifier,
    Creator,
    /// Single-line copyright notice.
    Copyright,
    Url,
    /// One of the [`AppKind`] strings.
    Kind,
}

/// Human-facing description of the application.
///
/// Only `name` has a default; `version` and `identifier` are expected to be
/// filled in by the application. [`resolved`](Self::resolved) substitutes
/// fallbacks for whatever is missing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppMetadata {
    pub name: String,
    pub version: String,
    pub identifier: String,
    pub creator: String,
    pub copyright: String,
    pub url: String,
    pub kind: AppKind,
    /// Extra key/value pairs outside the standard set.
    pub custom: BTreeMap<String, String>,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            version: String::new(),
            identifier: String::new(),
            creator: String::new(),
            copyright: String::new(),
            url: String::new(),
            kind: AppKind::default(),
            custom: BTreeMap::new(),
        }
    }
}

impl AppMetadata {
    /// Sets name, version and identifier in one call.
    pub fn with_info(
        mut self,
        name: impl Into<String>,
        version: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        self.name = name.into();
        self.version = version.into();
        self.identifier = identifier.into();
        self
    }

    /// Sets one property. An unrecognised [`MetadataProperty::Kind`] string
    /// leaves the kind unchanged and returns `false`.
    pub fn set(&mut self, property: MetadataProperty, value: impl Into<String>) -> bool {
        let value = value.into();
        match property {
            MetadataProperty::Name => self.name = value,
            MetadataProperty::Version => self.version = value,
            MetadataProperty::Identifier => self.identifier = value,
            MetadataProperty::Creator => self.creator = value,
            MetadataProperty::Copyright => self.copyright = value,
            MetadataProperty::Url => self.url = value,
            MetadataProperty::Kind => match AppKind::parse(&value) {
                Some(kind) => self.kind = kind,
                None => return false,
            },
        }
        true
    }

    /// Sets a custom property, replacing any previous value for `key`.
    pub fn set_custom(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.custom.insert(key.into(), value.into());
    }

    /// `true` when name, version and identifier are all non-empty.
    pub fn has_basic_info(&self) -> bool {
        self.missing_basic_info().is_empty()
    }

    /// Which of name, version and identifier are empty.
    pub fn missing_basic_info(&self) -> Vec<MetadataProperty> {
        let mut missing = Vec::new();
        if self.name.is_empty() {
            missing.push(MetadataProperty::Name);
        }
        if self.version.is_empty() {
            missing.push(MetadataProperty::Version);
        }
        if self.identifier.is_empty() {
            missing.push(MetadataProperty::Identifier);
        }
        missing
    }

    /// Copy with fallbacks substituted for empty name, version and identifier.
    pub fn resolved(&self) -> Self {
        let mut resolved = self.clone();
        if resolved.name.is_empty() {
            resolved.name = DEFAULT_NAME.to_string();
        }
        if resolved.version.is_empty() {
            resolved.version = FALLBACK_VERSION.to_string();
        }
        if resolved.identifier.is_empty() {
            resolved.identifier = FALLBACK_IDENTIFIER.to_string();
        }
        resolved
    }

    pub fn is_game(&self) -> bool {
        self.kind == AppKind::Game
    }

    pub fn is_media_player(&self) -> bool {
        self.kind == AppKind::MediaPlayer
    }

    pub fn is_application(&self) -> bool {
        self.kind == AppKind::Application
    }
}

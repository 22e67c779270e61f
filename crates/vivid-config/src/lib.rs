//! Configuration system for Vivid applications.
//!
//! Provides application metadata and logging settings that persist to disk
//! as RON files. Supports CLI overrides via clap, hot-reload detection, and
//! forward/backward compatible serialization.

mod cli;
mod config;
mod error;
mod metadata;

pub use cli::CliArgs;
pub use config::{Config, LogConfig};
pub use error::ConfigError;
pub use metadata::{AppKind, AppMetadata, MetadataProperty};

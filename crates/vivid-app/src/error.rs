//! Application error types.

use crate::{BoxError, Stage};

/// One system that returned an error while its stage was running.
#[derive(Debug, thiserror::Error)]
#[error("system `{system}` failed during {stage}: {source}")]
pub struct SystemFailure {
    /// Stage that was running.
    pub stage: Stage,
    /// Diagnostic name of the failing system.
    pub system: &'static str,
    /// Error the system returned.
    #[source]
    pub source: BoxError,
}

/// Errors surfaced by [`App`](crate::App) configuration and lifecycle calls.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A plugin's `build` returned an error. The app is left partially
    /// configured.
    #[error("plugin `{plugin}` failed to build: {source}")]
    Plugin {
        /// Name reported by the plugin.
        plugin: String,
        /// Error the plugin returned.
        #[source]
        source: BoxError,
    },

    /// A system failed during a forward-order stage. Later systems in that
    /// stage did not run.
    #[error(transparent)]
    System(#[from] SystemFailure),

    /// One or more shutdown systems failed. Every shutdown system still ran.
    #[error("{} shutdown system(s) failed", .0.len())]
    Teardown(Vec<SystemFailure>),
}

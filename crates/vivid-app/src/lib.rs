//! Plugin composition, resource injection and stage scheduling for Vivid
//! applications.
//!
//! Plugins register typed singleton [`Resources`] and ordered [`System`]s
//! into an [`App`], which drives them through a fixed sequence of
//! [`Stage`]s. The entity store is a [`bevy_ecs::world::World`] handed to
//! every system untouched.

mod app;
mod error;
pub mod host;
mod plugin;
mod resources;
mod schedule;
mod system;

pub use app::{App, AppExit, CommandLine};
pub use error::{AppError, SystemFailure};
pub use host::{AppResult, EventQueue, HostEvent, HostRunner};
pub use plugin::Plugin;
pub use resources::Resources;
pub use schedule::{Schedule, Stage};
pub use system::{BoxError, System, SystemOutput, SystemResult};

/// Re-exported so plugins can name the world type without a direct
/// `bevy_ecs` dependency.
pub use bevy_ecs::world::World;

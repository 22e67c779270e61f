//! The canonical system shape and the adapters that normalize user callbacks
//! into it.
//!
//! Every stored system takes `(&mut Resources, &mut World)`. Callbacks that
//! only need the world are wrapped by [`System::from_world`] at registration
//! time, so the scheduler never has to care about arity.

use std::any::type_name;
use std::fmt;

use bevy_ecs::world::World;

use crate::Resources;

/// Boxed error type carried out of failing systems and plugins.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result of one system invocation after normalization.
pub type SystemResult = Result<(), BoxError>;

/// Return types a system callback may have.
///
/// Infallible systems return `()`. Fallible ones return `Result<(), E>` for
/// any error convertible into [`BoxError`].
pub trait SystemOutput {
    /// Converts the callback's return value into a [`SystemResult`].
    fn into_result(self) -> SystemResult;
}

impl SystemOutput for () {
    fn into_result(self) -> SystemResult {
        Ok(())
    }
}

impl<E: Into<BoxError>> SystemOutput for Result<(), E> {
    fn into_result(self) -> SystemResult {
        self.map_err(Into::into)
    }
}

type SystemFn = Box<dyn FnMut(&mut Resources, &mut World) -> SystemResult>;

/// A registered callback in canonical `(resources, world)` form.
pub struct System {
    name: &'static str,
    func: SystemFn,
}

impl System {
    /// Wraps a callback that takes both the resource store and the world.
    pub fn new<F, O>(mut func: F) -> Self
    where
        F: FnMut(&mut Resources, &mut World) -> O + 'static,
        O: SystemOutput,
    {
        Self {
            name: type_name::<F>(),
            func: Box::new(move |resources, world| func(resources, world).into_result()),
        }
    }

    /// Wraps a callback that only takes the world. The resource store is
    /// never handed to it.
    pub fn from_world<F, O>(mut func: F) -> Self
    where
        F: FnMut(&mut World) -> O + 'static,
        O: SystemOutput,
    {
        Self {
            name: type_name::<F>(),
            func: Box::new(move |_resources, world| func(world).into_result()),
        }
    }

    /// Overrides the diagnostic name, which defaults to the callback's type
    /// name.
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Diagnostic name used in logs and errors.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Invokes the callback once.
    pub fn run(&mut self, resources: &mut Resources, world: &mut World) -> SystemResult {
        (self.func)(resources, world)
    }
}

impl fmt::Debug for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("System").field("name", &self.name).finish()
    }
}

//! The application: owns the world, the resource store and the schedule, and
//! drives them through either lifecycle.
//!
//! Two drivers are supported:
//!
//! - [`App::run`] blocks, looping over [`Stage::FRAME`] until exit is
//!   requested.
//! - [`App::initialize`], [`App::iterate`], [`App::handle_event`] and
//!   [`App::shutdown`] are discrete calls for hosts that own the loop
//!   themselves (see [`HostRunner`](crate::HostRunner)).
//!
//! The `running` flag is only consulted between frames. Once a frame's
//! `PreUpdate` stage begins, the remaining frame stages always run.

use bevy_ecs::world::World;
use tracing::{debug, info};

use crate::{AppError, Plugin, Resources, Schedule, Stage, System, SystemOutput};

/// Insert this resource from any system to request that the app stop after
/// the current frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppExit;

/// Arguments passed to [`App::initialize`], available to startup systems.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine(pub Vec<String>);

/// Runtime container for plugins, resources and systems.
pub struct App {
    world: World,
    resources: Resources,
    schedule: Schedule,
    plugins: Vec<Box<dyn Plugin>>,
    running: bool,
    initialized: bool,
    shut_down: bool,
}

impl App {
    /// Creates an empty app with a fresh world.
    pub fn new() -> Self {
        Self::with_world(World::new())
    }

    /// Creates an empty app around an existing world.
    pub fn with_world(world: World) -> Self {
        Self {
            world,
            resources: Resources::new(),
            schedule: Schedule::new(),
            plugins: Vec::new(),
            running: true,
            initialized: false,
            shut_down: false,
        }
    }

    // --- Configuration ---

    /// Builds `plugin` against this app right away, then keeps it alive for
    /// the app's lifetime.
    ///
    /// If `build` fails the plugin is dropped and whatever it registered
    /// before failing stays registered.
    pub fn add_plugin<P: Plugin>(&mut self, mut plugin: P) -> Result<&mut Self, AppError> {
        info!("Adding plugin: {}", plugin.name());
        plugin.build(self).map_err(|source| AppError::Plugin {
            plugin: plugin.name().to_string(),
            source,
        })?;
        self.plugins.push(Box::new(plugin));
        Ok(self)
    }

    /// Registers a system taking `(resources, world)`.
    pub fn add_system<F, O>(&mut self, stage: Stage, system: F) -> &mut Self
    where
        F: FnMut(&mut Resources, &mut World) -> O + 'static,
        O: SystemOutput,
    {
        self.schedule.add_system(stage, System::new(system));
        self
    }

    /// Registers a system that only needs the world.
    pub fn add_world_system<F, O>(&mut self, stage: Stage, system: F) -> &mut Self
    where
        F: FnMut(&mut World) -> O + 'static,
        O: SystemOutput,
    {
        self.schedule.add_system(stage, System::from_world(system));
        self
    }

    /// Registers an already-built [`System`].
    pub fn add_boxed_system(&mut self, stage: Stage, system: System) -> &mut Self {
        self.schedule.add_system(stage, system);
        self
    }

    /// Shorthand for `add_system(Stage::Startup, system)`.
    pub fn add_startup_system<F, O>(&mut self, system: F) -> &mut Self
    where
        F: FnMut(&mut Resources, &mut World) -> O + 'static,
        O: SystemOutput,
    {
        self.add_system(Stage::Startup, system)
    }

    /// Stores `value`, replacing any previous resource of the same type.
    pub fn insert_resource<T: 'static>(&mut self, value: T) -> &mut Self {
        self.resources.insert(value);
        self
    }

    /// Stores `T::default()` unless a `T` is already present.
    pub fn init_resource<T: Default + 'static>(&mut self) -> &mut Self {
        self.resources.get_or_insert_with(T::default);
        self
    }

    /// Returns the stored `T`, if any.
    pub fn resource<T: 'static>(&self) -> Option<&T> {
        self.resources.get::<T>()
    }

    /// Returns the stored `T` mutably, if any.
    pub fn resource_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.resources.get_mut::<T>()
    }

    // --- Accessors ---

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut Resources {
        &mut self.resources
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn schedule_mut(&mut self) -> &mut Schedule {
        &mut self.schedule
    }

    /// Names of the plugins added so far, in the order they were added.
    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|plugin| plugin.name()).collect()
    }

    /// Requests exit. The current frame, if any, still finishes.
    pub fn exit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    // --- Blocking lifecycle ---

    /// Runs `Startup`, then frames until exit is requested, then `Shutdown`.
    ///
    /// A failing frame system aborts the loop and returns its error without
    /// running `Shutdown`; the caller may still call [`shutdown`](Self::shutdown).
    pub fn run(&mut self) -> Result<(), AppError> {
        info!("Starting application...");
        self.initialize(std::iter::empty::<String>())?;

        while self.running {
            self.run_frame()?;
        }

        info!("Application shutting down...");
        self.shutdown()?;
        info!("Application finished.");
        Ok(())
    }

    // --- Host-driven lifecycle ---

    /// Runs `Startup` once. Later calls return immediately.
    ///
    /// `args` are stored as a [`CommandLine`] resource before startup
    /// systems run. If a startup system fails the app stays uninitialized.
    pub fn initialize<I, S>(&mut self, args: I) -> Result<(), AppError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.initialized {
            return Ok(());
        }

        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        info!("Initializing application with {} argument(s)", args.len());
        self.resources.insert(CommandLine(args));

        self.run_stage(Stage::Startup)?;
        self.initialized = true;
        Ok(())
    }

    /// Runs one frame. Returns `Ok(false)` without running anything if the
    /// app is not initialized or no longer running; otherwise returns the
    /// `running` flag as it is after the frame.
    pub fn iterate(&mut self) -> Result<bool, AppError> {
        if !self.initialized || !self.running {
            return Ok(false);
        }
        self.run_frame()?;
        Ok(self.running)
    }

    /// Runs the `Event` stage once and returns the `running` flag.
    ///
    /// Unlike [`iterate`](Self::iterate) this does not check `initialized` or
    /// `running`: it runs whenever called, including before `initialize` and
    /// after `shutdown`. [`HostRunner`](crate::HostRunner) only calls it once
    /// the app is initialized.
    pub fn handle_event(&mut self) -> Result<bool, AppError> {
        self.run_stage(Stage::Event)?;
        Ok(self.running)
    }

    /// Runs `Shutdown` once, most recently registered system first.
    ///
    /// No-op if the app was never initialized or is already shut down.
    /// Every shutdown system runs even if some fail.
    pub fn shutdown(&mut self) -> Result<(), AppError> {
        if !self.initialized || self.shut_down {
            return Ok(());
        }
        self.shut_down = true;
        self.running = false;

        let result = self.run_stage(Stage::Shutdown);
        info!("Application shutdown complete");
        result
    }

    fn run_frame(&mut self) -> Result<(), AppError> {
        for stage in Stage::FRAME {
            self.run_stage(stage)?;
        }
        Ok(())
    }

    fn run_stage(&mut self, stage: Stage) -> Result<(), AppError> {
        let result = self
            .schedule
            .run_stage(stage, &mut self.resources, &mut self.world);
        if self.resources.remove::<AppExit>().is_some() {
            debug!(stage = %stage, "exit requested by a system");
            self.running = false;
        }
        result
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

//! Driver for hosts that own the main loop and call back into the app.
//!
//! The host calls [`HostRunner::app_init`] once, then [`HostRunner::app_event`]
//! for every delivered event and [`HostRunner::app_iterate`] once per frame,
//! until one of them returns something other than [`AppResult::Continue`].
//! It then calls [`HostRunner::app_quit`] with that result.

use std::collections::VecDeque;
use std::fmt;
use std::marker::PhantomData;

use tracing::{error, info, warn};
use vivid_config::AppMetadata;

use crate::App;

/// Outcome of one host callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppResult {
    /// Keep calling back.
    Continue,
    /// Stop; the app exited normally.
    Success,
    /// Stop; something went wrong.
    Failure,
}

impl fmt::Display for AppResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AppResult::Continue => "CONTINUE",
            AppResult::Success => "SUCCESS",
            AppResult::Failure => "FAILURE",
        };
        f.write_str(label)
    }
}

/// An event delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent<E> {
    /// The host wants the app to quit.
    Quit,
    /// Anything else, queued for `Event` stage systems.
    Custom(E),
}

/// FIFO of host events waiting for `Event` stage systems to consume them.
#[derive(Debug)]
pub struct EventQueue<E> {
    pending: VecDeque<E>,
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }
}

impl<E> EventQueue<E> {
    pub fn push(&mut self, event: E) {
        self.pending.push_back(event);
    }

    /// Oldest pending event, if any.
    pub fn pop(&mut self) -> Option<E> {
        self.pending.pop_front()
    }

    /// Removes and yields every pending event, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = E> + '_ {
        self.pending.drain(..)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Adapts an [`App`] to the four-callback host protocol.
///
/// `E` is the payload type of [`HostEvent::Custom`].
pub struct HostRunner<E> {
    app: App,
    metadata: AppMetadata,
    initialized: bool,
    _events: PhantomData<fn(E)>,
}

impl<E: 'static> HostRunner<E> {
    pub fn new(app: App) -> Self {
        Self {
            app,
            metadata: AppMetadata::default(),
            initialized: false,
            _events: PhantomData,
        }
    }

    /// Metadata to report at init. Missing basic fields are filled with
    /// fallbacks.
    pub fn with_metadata(mut self, metadata: AppMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    pub fn into_app(self) -> App {
        self.app
    }

    /// Reports metadata, stores it as a resource and runs `Startup`.
    pub fn app_init<I, S>(&mut self, args: I) -> AppResult
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let missing = self.metadata.missing_basic_info();
        if !missing.is_empty() {
            warn!("App metadata incomplete, missing {missing:?}");
        }
        let metadata = self.metadata.resolved();
        info!(
            "App info: {} v{} ({}) [{}]",
            metadata.name, metadata.version, metadata.identifier, metadata.kind
        );
        self.app.insert_resource(metadata);

        match self.app.initialize(args) {
            Ok(()) => {
                self.initialized = true;
                info!("Application initialized successfully");
                AppResult::Continue
            }
            Err(e) => {
                error!("Failed to initialize application: {e}");
                AppResult::Failure
            }
        }
    }

    /// Runs one frame.
    pub fn app_iterate(&mut self) -> AppResult {
        if !self.initialized {
            error!("Invalid application state: not initialized");
            return AppResult::Failure;
        }

        match self.app.iterate() {
            Ok(true) => AppResult::Continue,
            Ok(false) => {
                info!("Application requested exit");
                AppResult::Success
            }
            Err(e) => {
                error!("Error during iterate: {e}");
                AppResult::Failure
            }
        }
    }

    /// Delivers one event. `Quit` requests exit; anything else is queued
    /// on the [`EventQueue`] resource and the `Event` stage runs once.
    pub fn app_event(&mut self, event: HostEvent<E>) -> AppResult {
        if !self.initialized {
            error!("Invalid application state: not initialized");
            return AppResult::Failure;
        }

        let payload = match event {
            HostEvent::Quit => {
                info!("Received quit event");
                self.app.exit();
                return AppResult::Success;
            }
            HostEvent::Custom(payload) => payload,
        };

        self.app
            .resources_mut()
            .get_or_insert_with(EventQueue::<E>::default)
            .push(payload);

        match self.app.handle_event() {
            Ok(true) => AppResult::Continue,
            Ok(false) => AppResult::Success,
            Err(e) => {
                error!("Error during event handling: {e}");
                AppResult::Failure
            }
        }
    }

    /// Tears the app down. Errors are logged, never propagated.
    pub fn app_quit(&mut self, result: AppResult) {
        info!("Quit called with result: {result}");
        if self.initialized {
            info!("Shutting down application");
            if let Err(e) = self.app.shutdown() {
                error!("Error during shutdown: {e}");
            }
        }
        info!("Application cleanup completed");
    }

    /// Drives the callbacks until one returns a final result, then quits.
    ///
    /// Before each frame `poll` is asked for the events that arrived since
    /// the last one. Returns the result that ended the loop.
    pub fn run_to_completion<I, S, P>(&mut self, args: I, mut poll: P) -> AppResult
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        P: FnMut(&mut App) -> Vec<HostEvent<E>>,
    {
        let mut result = self.app_init(args);
        'frames: while result == AppResult::Continue {
            for event in poll(&mut self.app) {
                result = self.app_event(event);
                if result != AppResult::Continue {
                    break 'frames;
                }
            }
            result = self.app_iterate();
        }
        self.app_quit(result);
        result
    }
}

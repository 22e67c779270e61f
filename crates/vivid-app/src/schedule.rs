//! Stage labels and the ordered per-stage system lists.

use std::fmt;

use bevy_ecs::world::World;
use tracing::{error, trace};

use crate::{AppError, Resources, System, SystemFailure};

/// Labels for each execution stage.
///
/// The set is closed. The order in which stages run is fixed by the
/// [`App`](crate::App) lifecycle, not by the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Runs once, before the first frame.
    Startup,
    /// Input polling, window events.
    PreUpdate,
    /// Gameplay logic.
    Update,
    /// Transform propagation, late fix-ups.
    PostUpdate,
    /// Draw submission.
    Render,
    /// End-of-frame housekeeping.
    Cleanup,
    /// Runs once per externally delivered event in host-driven mode.
    Event,
    /// Runs once at teardown, in reverse registration order.
    Shutdown,
}

impl Stage {
    /// Every stage, in declaration order.
    pub const ALL: [Stage; 8] = [
        Stage::Startup,
        Stage::PreUpdate,
        Stage::Update,
        Stage::PostUpdate,
        Stage::Render,
        Stage::Cleanup,
        Stage::Event,
        Stage::Shutdown,
    ];

    /// The stages that make up one frame, in execution order.
    pub const FRAME: [Stage; 5] = [
        Stage::PreUpdate,
        Stage::Update,
        Stage::PostUpdate,
        Stage::Render,
        Stage::Cleanup,
    ];

    /// Human-readable label.
    pub fn name(self) -> &'static str {
        match self {
            Stage::Startup => "Startup",
            Stage::PreUpdate => "PreUpdate",
            Stage::Update => "Update",
            Stage::PostUpdate => "PostUpdate",
            Stage::Render => "Render",
            Stage::Cleanup => "Cleanup",
            Stage::Event => "Event",
            Stage::Shutdown => "Shutdown",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mapping from [`Stage`] to its ordered list of systems.
///
/// Systems run in registration order, except in [`Stage::Shutdown`] where
/// the most recently registered system runs first.
pub struct Schedule {
    stages: Vec<(Stage, Vec<System>)>,
}

impl Schedule {
    /// Create a schedule with an empty list for every stage.
    pub fn new() -> Self {
        let stages = Stage::ALL
            .into_iter()
            .map(|stage| (stage, Vec::new()))
            .collect();
        Self { stages }
    }

    /// Append a system to a stage. Duplicates are allowed.
    pub fn add_system(&mut self, stage: Stage, system: System) {
        self.systems_mut(stage).push(system);
    }

    /// Run every system registered for `stage` once.
    ///
    /// In forward stages the first failing system stops the stage and its
    /// error is returned. In `Shutdown` each failure is logged and the
    /// remaining systems still run; all failures are returned together.
    pub fn run_stage(
        &mut self,
        stage: Stage,
        resources: &mut Resources,
        world: &mut World,
    ) -> Result<(), AppError> {
        let systems = self.systems_mut(stage);
        if systems.is_empty() {
            return Ok(());
        }

        if stage == Stage::Shutdown {
            let mut failures = Vec::new();
            for system in systems.iter_mut().rev() {
                trace!(stage = %stage, system = system.name(), "running system");
                if let Err(source) = system.run(resources, world) {
                    error!(system = system.name(), "shutdown system failed: {source}");
                    failures.push(SystemFailure {
                        stage,
                        system: system.name(),
                        source,
                    });
                }
            }
            if failures.is_empty() {
                return Ok(());
            }
            return Err(AppError::Teardown(failures));
        }

        for system in systems.iter_mut() {
            trace!(stage = %stage, system = system.name(), "running system");
            system.run(resources, world).map_err(|source| SystemFailure {
                stage,
                system: system.name(),
                source,
            })?;
        }
        Ok(())
    }

    /// Remove every system from a stage.
    pub fn clear_stage(&mut self, stage: Stage) {
        self.systems_mut(stage).clear();
    }

    /// Number of systems registered for a stage.
    pub fn len(&self, stage: Stage) -> usize {
        self.systems(stage).len()
    }

    /// Returns `true` if no stage has any system.
    pub fn is_empty(&self) -> bool {
        self.stages.iter().all(|(_, systems)| systems.is_empty())
    }

    /// Diagnostic names of a stage's systems, in registration order.
    pub fn system_names(&self, stage: Stage) -> Vec<&'static str> {
        self.systems(stage).iter().map(System::name).collect()
    }

    // `stages` is built from `Stage::ALL`, so a stage's discriminant is its index.
    fn systems(&self, stage: Stage) -> &[System] {
        &self.stages[stage as usize].1
    }

    fn systems_mut(&mut self, stage: Stage) -> &mut Vec<System> {
        &mut self.stages[stage as usize].1
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (stage, systems) in &self.stages {
            map.entry(stage, &systems.len());
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    fn record(log: &Log, tag: &'static str) -> System {
        let log = log.clone();
        System::from_world(move |_world: &mut World| log.borrow_mut().push(tag)).with_name(tag)
    }

    fn fail(log: &Log, tag: &'static str) -> System {
        let log = log.clone();
        System::new(move |_res: &mut Resources, _world: &mut World| {
            log.borrow_mut().push(tag);
            Err::<(), _>(format!("{tag} failed"))
        })
        .with_name(tag)
    }

    fn run(schedule: &mut Schedule, stage: Stage) -> Result<(), AppError> {
        schedule.run_stage(stage, &mut Resources::new(), &mut World::new())
    }

    #[test]
    fn test_forward_stage_runs_in_registration_order() {
        let log = Log::default();
        let mut schedule = Schedule::new();
        schedule.add_system(Stage::Update, record(&log, "A"));
        schedule.add_system(Stage::Update, record(&log, "B"));
        schedule.add_system(Stage::Update, record(&log, "C"));

        run(&mut schedule, Stage::Update).unwrap();

        assert_eq!(*log.borrow(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_shutdown_runs_in_reverse_registration_order() {
        let log = Log::default();
        let mut schedule = Schedule::new();
        schedule.add_system(Stage::Shutdown, record(&log, "A"));
        schedule.add_system(Stage::Shutdown, record(&log, "B"));
        schedule.add_system(Stage::Shutdown, record(&log, "C"));

        run(&mut schedule, Stage::Shutdown).unwrap();

        assert_eq!(*log.borrow(), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_empty_stage_is_ok() {
        let mut schedule = Schedule::new();
        assert!(schedule.is_empty());
        for stage in Stage::ALL {
            assert!(run(&mut schedule, stage).is_ok());
        }
    }

    #[test]
    fn test_only_target_stage_runs() {
        let log = Log::default();
        let mut schedule = Schedule::new();
        schedule.add_system(Stage::Render, record(&log, "render"));
        schedule.add_system(Stage::Update, record(&log, "update"));

        run(&mut schedule, Stage::Render).unwrap();

        assert_eq!(*log.borrow(), vec!["render"]);
    }

    #[test]
    fn test_duplicates_are_allowed() {
        let log = Log::default();
        let mut schedule = Schedule::new();
        schedule.add_system(Stage::Update, record(&log, "tick"));
        schedule.add_system(Stage::Update, record(&log, "tick"));

        run(&mut schedule, Stage::Update).unwrap();

        assert_eq!(schedule.len(Stage::Update), 2);
        assert_eq!(*log.borrow(), vec!["tick", "tick"]);
    }

    #[test]
    fn test_forward_failure_stops_the_stage() {
        let log = Log::default();
        let mut schedule = Schedule::new();
        schedule.add_system(Stage::Update, record(&log, "A"));
        schedule.add_system(Stage::Update, fail(&log, "B"));
        schedule.add_system(Stage::Update, record(&log, "C"));

        let err = run(&mut schedule, Stage::Update).unwrap_err();

        assert_eq!(*log.borrow(), vec!["A", "B"]);
        match err {
            AppError::System(failure) => {
                assert_eq!(failure.stage, Stage::Update);
                assert_eq!(failure.system, "B");
                assert_eq!(failure.source.to_string(), "B failed");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_shutdown_failure_does_not_block_remaining_teardown() {
        let log = Log::default();
        let mut schedule = Schedule::new();
        schedule.add_system(Stage::Shutdown, record(&log, "window"));
        schedule.add_system(Stage::Shutdown, fail(&log, "renderer"));
        schedule.add_system(Stage::Shutdown, fail(&log, "ui"));

        let err = run(&mut schedule, Stage::Shutdown).unwrap_err();

        assert_eq!(*log.borrow(), vec!["ui", "renderer", "window"]);
        match err {
            AppError::Teardown(failures) => {
                let names: Vec<_> = failures.iter().map(|f| f.system).collect();
                assert_eq!(names, vec!["ui", "renderer"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_clear_stage_empties_only_that_stage() {
        let log = Log::default();
        let mut schedule = Schedule::new();
        schedule.add_system(Stage::Update, record(&log, "update"));
        schedule.add_system(Stage::Render, record(&log, "render"));

        schedule.clear_stage(Stage::Update);
        run(&mut schedule, Stage::Update).unwrap();
        run(&mut schedule, Stage::Render).unwrap();

        assert_eq!(schedule.len(Stage::Update), 0);
        assert_eq!(*log.borrow(), vec!["render"]);
    }

    #[test]
    fn test_system_names_follow_registration_order() {
        let log = Log::default();
        let mut schedule = Schedule::new();
        schedule.add_system(Stage::Startup, record(&log, "first"));
        schedule.add_system(Stage::Startup, record(&log, "second"));
        assert_eq!(schedule.system_names(Stage::Startup), vec!["first", "second"]);
    }

    #[test]
    fn test_stage_labels_are_distinct() {
        for (i, a) in Stage::ALL.iter().enumerate() {
            for (j, b) in Stage::ALL.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b);
                    assert_ne!(a.name(), b.name());
                }
            }
        }
    }

    #[test]
    fn test_frame_stages_are_in_loop_order() {
        assert_eq!(
            Stage::FRAME,
            [
                Stage::PreUpdate,
                Stage::Update,
                Stage::PostUpdate,
                Stage::Render,
                Stage::Cleanup,
            ]
        );
    }
}

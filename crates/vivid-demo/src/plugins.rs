//! Small headless plugins that exercise every stage.

use std::time::Instant;

use bevy_ecs::prelude::*;
use tracing::{debug, info, warn};
use vivid_app::{App, AppExit, BoxError, EventQueue, Plugin, Resources, Stage};

/// Frame timing, updated at the start of every frame.
#[derive(Debug)]
pub struct FrameClock {
    pub frame: u64,
    pub delta: f64,
    pub elapsed: f64,
    last: Instant,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            frame: 0,
            delta: 0.0,
            elapsed: 0.0,
            last: Instant::now(),
        }
    }
}

impl FrameClock {
    fn tick(&mut self) {
        let now = Instant::now();
        self.delta = now.duration_since(self.last).as_secs_f64();
        self.elapsed += self.delta;
        self.last = now;
        self.frame += 1;
    }
}

/// Inserts [`FrameClock`] and advances it in `PreUpdate`.
pub struct ClockPlugin;

impl Plugin for ClockPlugin {
    fn build(&mut self, app: &mut App) -> Result<(), BoxError> {
        app.init_resource::<FrameClock>()
            .add_system(Stage::PreUpdate, |res: &mut Resources, _world: &mut World| {
                if let Some(clock) = res.get_mut::<FrameClock>() {
                    clock.tick();
                }
            });
        Ok(())
    }

    fn name(&self) -> &str {
        "ClockPlugin"
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Position(pub [f64; 2]);

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Velocity(pub [f64; 2]);

/// Spawns a handful of moving bodies and integrates them every frame.
pub struct MotionPlugin {
    pub bodies: usize,
}

impl Plugin for MotionPlugin {
    fn build(&mut self, app: &mut App) -> Result<(), BoxError> {
        if app.resource::<FrameClock>().is_none() {
            return Err("MotionPlugin needs ClockPlugin to be added first".into());
        }

        let bodies = self.bodies;
        app.add_world_system(Stage::Startup, move |world: &mut World| {
            for i in 0..bodies {
                let speed = 1.0 + i as f64;
                world.spawn((Position([0.0, 0.0]), Velocity([speed, -speed])));
            }
            info!("Spawned {bodies} bodies");
        })
        .add_system(Stage::Update, integrate_motion);
        Ok(())
    }

    fn name(&self) -> &str {
        "MotionPlugin"
    }
}

fn integrate_motion(res: &mut Resources, world: &mut World) {
    let Some(delta) = res.get::<FrameClock>().map(|clock| clock.delta) else {
        warn!("FrameClock missing, skipping motion");
        return;
    };
    let mut query = world.query::<(&mut Position, &Velocity)>();
    for (mut position, velocity) in query.iter_mut(world) {
        position.0[0] += velocity.0[0] * delta;
        position.0[1] += velocity.0[1] * delta;
    }
}

/// Requests exit once the clock reaches `max_frames`.
pub struct FrameLimitPlugin {
    pub max_frames: u64,
}

impl Plugin for FrameLimitPlugin {
    fn build(&mut self, app: &mut App) -> Result<(), BoxError> {
        let max_frames = self.max_frames;
        app.add_system(Stage::Cleanup, move |res: &mut Resources, _world: &mut World| {
            let frame = res.get::<FrameClock>().map_or(0, |clock| clock.frame);
            if frame >= max_frames {
                debug!(frame, "frame limit reached");
                res.insert(AppExit);
            }
        });
        Ok(())
    }

    fn name(&self) -> &str {
        "FrameLimitPlugin"
    }
}

/// Input delivered by the host in host-driven mode.
#[derive(Debug, Clone, PartialEq)]
pub enum DemoEvent {
    Nudge { dx: f64, dy: f64 },
    Stop,
}

/// Consumes [`DemoEvent`]s and logs a summary at shutdown.
pub struct ReportPlugin;

impl Plugin for ReportPlugin {
    fn build(&mut self, app: &mut App) -> Result<(), BoxError> {
        app.add_system(Stage::Event, apply_events)
            .add_system(Stage::Shutdown, report);
        Ok(())
    }

    fn name(&self) -> &str {
        "ReportPlugin"
    }
}

fn apply_events(res: &mut Resources, world: &mut World) {
    let Some(queue) = res.get_mut::<EventQueue<DemoEvent>>() else {
        return;
    };
    let events: Vec<DemoEvent> = queue.drain().collect();

    let mut stop = false;
    for event in events {
        match event {
            DemoEvent::Nudge { dx, dy } => {
                let mut query = world.query::<&mut Position>();
                for mut position in query.iter_mut(world) {
                    position.0[0] += dx;
                    position.0[1] += dy;
                }
            }
            DemoEvent::Stop => stop = true,
        }
    }
    if stop {
        res.insert(AppExit);
    }
}

fn report(res: &mut Resources, world: &mut World) {
    let frames = res.get::<FrameClock>().map_or(0, |clock| clock.frame);
    let mut query = world.query::<&Position>();
    let furthest = query
        .iter(world)
        .map(|p| p.0[0].hypot(p.0[1]))
        .fold(0.0_f64, f64::max);
    info!(
        "Ran {frames} frame(s), {} entities, furthest body {furthest:.3} from origin",
        world.entities().len()
    );
}

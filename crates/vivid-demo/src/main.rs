//! Demo binary that assembles a headless Vivid app from a few plugins.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p vivid-demo -- --frames 120` for the blocking loop, or
//! add `--host-driven` to drive the same app through host callbacks.

mod plugins;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use vivid_app::{App, AppError, AppResult, HostEvent, HostRunner};
use vivid_config::{CliArgs, Config};

use plugins::{ClockPlugin, DemoEvent, FrameLimitPlugin, MotionPlugin, ReportPlugin};

const DEFAULT_FRAMES: u64 = 60;

fn build_app(max_frames: u64) -> Result<App, AppError> {
    let mut app = App::new();
    app.add_plugin(ClockPlugin)?
        .add_plugin(MotionPlugin { bodies: 8 })?
        .add_plugin(FrameLimitPlugin { max_frames })?
        .add_plugin(ReportPlugin)?;
    Ok(app)
}

/// Feeds a nudge every 10 frames and a stop request halfway past the limit.
fn scripted_events(frame: &mut u64, max_frames: u64) -> Vec<HostEvent<DemoEvent>> {
    *frame += 1;
    let mut events = Vec::new();
    if *frame % 10 == 0 {
        events.push(HostEvent::Custom(DemoEvent::Nudge { dx: 0.5, dy: 0.5 }));
    }
    if *frame > max_frames + max_frames / 2 {
        events.push(HostEvent::Custom(DemoEvent::Stop));
    }
    events
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = args.config.clone().unwrap_or_else(|| {
        dirs::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("vivid")
    });

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    vivid_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let max_frames = args.frames.unwrap_or(DEFAULT_FRAMES);
    let mut app = match build_app(max_frames) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to assemble app: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!("Plugins: {}", app.plugin_names().join(", "));

    if args.host_driven {
        let mut runner = HostRunner::new(app).with_metadata(config.app.clone());
        let mut frame = 0;
        let result = runner.run_to_completion(std::env::args(), |_app| {
            scripted_events(&mut frame, max_frames)
        });
        return match result {
            AppResult::Failure => ExitCode::FAILURE,
            _ => ExitCode::SUCCESS,
        };
    }

    if let Err(e) = app.run() {
        error!("Application failed: {e}");
        if let Err(e) = app.shutdown() {
            error!("Shutdown after failure also failed: {e}");
        }
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_app_registers_all_plugins() {
        let app = build_app(3).unwrap();
        assert_eq!(
            app.plugin_names(),
            vec!["ClockPlugin", "MotionPlugin", "FrameLimitPlugin", "ReportPlugin"]
        );
    }

    #[test]
    fn test_scripted_events_nudge_then_stop() {
        let mut frame = 0;
        let batches: Vec<_> = (0..16).map(|_| scripted_events(&mut frame, 10)).collect();

        assert!(batches[..9].iter().all(Vec::is_empty));
        assert_eq!(batches[9].len(), 1);
        assert_eq!(batches[15], vec![HostEvent::Custom(DemoEvent::Stop)]);
    }

    #[test]
    fn test_host_driven_run_finishes_successfully() {
        let mut runner = HostRunner::new(build_app(4).unwrap());
        let mut frame = 0;
        let result = runner.run_to_completion(["vivid-demo"], |_app| {
            scripted_events(&mut frame, 4)
        });
        assert_eq!(result, AppResult::Success);
        assert!(!runner.app().is_running());
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the AutoSnake3D simulation headless.

mod headless;

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use autosnake_core::{Config, Event, Phase, WELCOME_BANNER};
use autosnake_rendering::{Color, FrameInput, Presentation, RenderingBackend, Scene};
use autosnake_simulation::Simulation;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::headless::HeadlessBackend;

/// Runs the self-playing snake on a simulated clock.
#[derive(Debug, Parser)]
#[command(name = "autosnake3d", version, about)]
struct CliArgs {
    /// TOML configuration file; missing sections fall back to defaults.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Number of frames to simulate.
    #[arg(long, default_value_t = 3_600)]
    frames: u32,
    /// Simulated frames per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,
    /// Overrides `gameplay.seed`.
    #[arg(long)]
    seed: Option<u64>,
    /// Overrides `snake.tick_interval_ms`.
    #[arg(long, value_name = "MS")]
    tick_interval_ms: Option<u64>,
    /// Disables particle feedback.
    #[arg(long)]
    no_particles: bool,
    /// Kills the snake when the given frame starts.
    #[arg(long, value_name = "FRAME")]
    kill_at_frame: Option<u32>,
    /// Prints the effective configuration as TOML and exits.
    #[arg(long)]
    dump_config: bool,
}

/// Entry point for the AutoSnake3D command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();
    let config = load_config(&args)?;

    if args.dump_config {
        let rendered =
            toml::to_string_pretty(&config).context("failed to render configuration as toml")?;
        print!("{rendered}");
        return Ok(());
    }

    tracing::info!("{WELCOME_BANNER}");
    let simulation = Simulation::new(config).context("failed to start simulation")?;
    let presentation = Presentation::new(
        "AutoSnake3D",
        Color::from_rgb_u8(0, 0, 0),
        Scene::capture(&simulation),
    );
    let backend = HeadlessBackend::new(args.frames, args.fps)?;
    backend.run(presentation, frame_driver(simulation, args.kill_at_frame))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn load_config(args: &CliArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read configuration at {}", path.display()))?;
            parse_config(&contents)
                .with_context(|| format!("invalid configuration in {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(seed) = args.seed {
        config.gameplay.seed = seed;
    }
    if let Some(interval) = args.tick_interval_ms {
        config.snake.tick_interval_ms = interval;
    }
    if args.no_particles {
        config.particles.enabled = false;
    }

    config.validate().context("configuration rejected")?;
    Ok(config)
}

fn parse_config(contents: &str) -> Result<Config> {
    toml::from_str(contents).context("failed to parse configuration toml contents")
}

/// Per-frame closure that feeds the simulation and refreshes the scene.
fn frame_driver(
    mut simulation: Simulation,
    kill_at_frame: Option<u32>,
) -> impl FnMut(Duration, FrameInput, &mut Scene) -> Result<bool> + 'static {
    let mut frame = 0_u32;
    let mut now = Duration::ZERO;
    let mut tally = Tally::default();

    move |delta, mut input, scene| {
        if kill_at_frame == Some(frame) {
            input.kill = true;
        }
        input.apply_to(&mut simulation)?;

        now += delta;
        simulation.frame(now, delta.as_secs_f32())?;
        tally.record(simulation.last_frame_events());
        *scene = Scene::capture(&simulation);

        frame += 1;
        if frame % 600 == 0 {
            tracing::info!(
                frame,
                length = simulation.snake_view().body().len(),
                meals = tally.meals,
                deaths = tally.deaths,
                particles = simulation.particles().len(),
                "progress"
            );
        }
        Ok(true)
    }
}

/// Running counts of notable events.
#[derive(Debug, Default)]
struct Tally {
    meals: u32,
    deaths: u32,
}

impl Tally {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::FoodConsumed { .. } => self.meals += 1,
                Event::PhaseChanged {
                    phase: Phase::Dying,
                } => self.deaths += 1,
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["autosnake3d"];
        argv.extend_from_slice(extra);
        CliArgs::try_parse_from(argv).expect("arguments parse")
    }

    #[test]
    fn flags_override_defaults() {
        let config = load_config(&args(&[
            "--seed",
            "7",
            "--tick-interval-ms",
            "40",
            "--no-particles",
        ]))
        .expect("configuration loads");

        assert_eq!(config.gameplay.seed, 7);
        assert_eq!(config.snake.tick_interval_ms, 40);
        assert!(!config.particles.enabled);
    }

    #[test]
    fn missing_configuration_file_is_reported() {
        let error = load_config(&args(&["--config", "/nonexistent/autosnake.toml"]))
            .expect_err("missing file must fail");
        assert!(error.to_string().contains("failed to read configuration"));
    }

    #[test]
    fn tally_counts_meals_and_deaths() {
        let mut tally = Tally::default();
        tally.record(&[
            Event::FoodConsumed {
                cell: autosnake_core::Cell::ORIGIN,
            },
            Event::PhaseChanged {
                phase: Phase::Dying,
            },
            Event::PhaseChanged {
                phase: Phase::Alive,
            },
        ]);
        assert_eq!((tally.meals, tally.deaths), (1, 1));
    }

    #[test]
    fn frame_driver_kills_on_the_requested_frame() {
        let mut config = Config::default();
        config.snake.initial_length = 3;
        let simulation = Simulation::new(config).expect("valid configuration");
        let mut scene = Scene::capture(&simulation);
        let mut driver = frame_driver(simulation, Some(2));

        for _ in 0..3 {
            let keep_going = driver(
                Duration::from_millis(16),
                FrameInput::default(),
                &mut scene,
            )
            .expect("frame succeeds");
            assert!(keep_going);
        }
        assert_eq!(scene.phase, Phase::Dying);
        assert_eq!(scene.segments.len(), 2);
        assert!(scene.food.is_none());
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame driver that composes the AutoSnake3D world with its systems.
//!
//! Every frame the particle collection is integrated first, then the world
//! clock advances. Events flow to the navigator, whose step commands are fed
//! back into the world until no system has anything left to say, and finally
//! every event of the frame reaches the particle system.

use std::time::Duration;

use autosnake_core::{Cell, Command, Config, ConfigError, Event, Phase, SnakeView};
use autosnake_system_navigation::Navigator;
use autosnake_system_particles::{Particle, Particles};
use autosnake_world::{self as world, query, World, WorldError};
use thiserror::Error;

/// Mixed into the gameplay seed so particles draw from their own stream.
const PARTICLE_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;

/// Errors surfaced to the code driving the simulation.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SimulationError {
    /// The configuration cannot drive a simulation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// The world could not recover from a failed command.
    #[error("world failure: {0}")]
    World(#[from] WorldError),
}

/// Self-playing snake simulation.
#[derive(Debug)]
pub struct Simulation {
    config: Config,
    world: World,
    navigator: Navigator,
    particles: Particles,
    frame_events: Vec<Event>,
}

impl Simulation {
    /// Validates `config` and builds a fresh world around it.
    pub fn new(config: Config) -> Result<Self, SimulationError> {
        config.validate()?;
        let world = World::new(&config)?;
        let particles = Particles::new(config.gameplay.seed ^ PARTICLE_STREAM);
        tracing::info!(
            boundary = config.gameplay.boundary,
            seed = config.gameplay.seed,
            initial_length = config.snake.initial_length,
            "simulation ready"
        );

        Ok(Self {
            config,
            world,
            navigator: Navigator,
            particles,
            frame_events: Vec::new(),
        })
    }

    /// Advances the simulation to `now`, integrating particles over `dt` seconds.
    ///
    /// A failed food spawn is logged and answered with a full reset; only a
    /// reset that fails as well is returned.
    pub fn frame(&mut self, now: Duration, dt: f32) -> Result<(), SimulationError> {
        self.frame_events.clear();
        if self.config.particles.enabled {
            self.particles.update(dt, &self.config.particles);
        } else if !self.particles.is_empty() {
            // Disabled through `config_mut`, which bypasses the setter.
            self.particles.clear();
        }
        self.submit(Command::Tick { now })
    }

    /// Kills a living snake as if it had collided.
    pub fn force_death(&mut self) -> Result<(), SimulationError> {
        self.submit(Command::ForceDeath)
    }

    /// Grows a living snake by one segment on its next step.
    pub fn force_growth(&mut self) -> Result<(), SimulationError> {
        self.submit(Command::ForceGrowth)
    }

    /// Sets the move cadence, clamped to the configured bounds.
    pub fn set_tick_interval(&mut self, interval: Duration) {
        let clamped = self.config.snake.clamp_tick_interval(interval);
        self.config.snake.tick_interval_ms =
            u64::try_from(clamped.as_millis()).unwrap_or(u64::MAX);
        tracing::debug!(interval_ms = self.config.snake.tick_interval_ms, "tick interval set");
    }

    /// Sets the move cadence from a speed slider level in `1..=10`.
    pub fn set_speed_level(&mut self, level: u8) {
        let interval = self.config.snake.interval_for_level(level);
        self.set_tick_interval(interval);
    }

    /// Enables or disables particle feedback; disabling drops live particles.
    pub fn set_particles_enabled(&mut self, enabled: bool) {
        self.config.particles.enabled = enabled;
        if !enabled {
            self.particles.clear();
        }
    }

    /// Sets the burst size, clamped to the configured bounds.
    pub fn set_particle_count(&mut self, count: u32) {
        self.config.particles.count = count;
        self.config.particles.count = self.config.particles.effective_count();
    }

    /// Segments to draw, head first.
    #[must_use]
    pub fn visible_segments(&self) -> &[Cell] {
        query::visible_segments(&self.world)
    }

    /// Food centre with the vertical bob applied, as `[x, y, z]`.
    #[must_use]
    pub fn food_render_position(&self) -> [f32; 3] {
        query::food_render_position(&self.world, &self.config)
    }

    /// Cell currently holding the food.
    #[must_use]
    pub fn food(&self) -> Cell {
        query::food(&self.world)
    }

    /// Full snake body and heading, including dissolved segments while dying.
    #[must_use]
    pub fn snake_view(&self) -> SnakeView<'_> {
        query::snake_view(&self.world)
    }

    /// Live particles.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        self.particles.as_slice()
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        query::phase(&self.world)
    }

    /// Time of the most recent frame.
    #[must_use]
    pub fn clock(&self) -> Duration {
        query::clock(&self.world)
    }

    /// Events produced since the last frame began.
    #[must_use]
    pub fn last_frame_events(&self) -> &[Event] {
        &self.frame_events
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable configuration, re-read by the world on every tick.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    fn submit(&mut self, command: Command) -> Result<(), SimulationError> {
        let mut pending = vec![command];

        while !pending.is_empty() {
            let mut events = Vec::new();
            for command in pending.drain(..) {
                self.apply_command(command, &mut events)?;
            }

            self.navigator.handle(
                &events,
                query::snake_view(&self.world),
                query::food(&self.world),
                self.config.gameplay.boundary,
                &mut pending,
            );
            self.particles.handle(&events, &self.config.particles);
            self.frame_events.extend(events);
        }

        Ok(())
    }

    fn apply_command(
        &mut self,
        command: Command,
        events: &mut Vec<Event>,
    ) -> Result<(), SimulationError> {
        match world::apply(&mut self.world, &self.config, command, events) {
            Ok(()) => Ok(()),
            Err(WorldError::Spawn(error)) => {
                tracing::error!(%error, "food spawn failed, resetting world");
                world::apply(&mut self.world, &self.config, Command::Reset, events)?;
                Ok(())
            }
        }
    }
}

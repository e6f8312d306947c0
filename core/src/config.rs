//! Strongly typed configuration consumed by the world and systems.
//!
//! Every section deserializes with defaults so partial configuration files
//! are accepted. Values may be mutated between frames by a settings layer;
//! consumers re-read them on every tick and normalise ranges at read time.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ColorMode, Rgb};

/// Highest level exposed by the speed slider.
pub const MAX_SPEED_LEVEL: u8 = 10;

/// Complete configuration surface of the simulation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Snake cadence, length and coloring.
    pub snake: SnakeConfig,
    /// Food appearance and spawning.
    pub food: FoodConfig,
    /// Particle feedback tuning.
    pub particles: ParticleConfig,
    /// Arena size and randomness.
    pub gameplay: GameplayConfig,
    /// Timing of the death sequence.
    pub death: DeathSchedule,
}

impl Config {
    /// Checks every section for values the simulation cannot operate with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let boundary = self.gameplay.boundary;
        if boundary < 1 {
            return Err(ConfigError::EmptyGrid { boundary });
        }

        let max_length = boundary.unsigned_abs() + 1;
        if self.snake.initial_length == 0 || self.snake.initial_length > max_length {
            return Err(ConfigError::InitialLengthOutOfRange {
                length: self.snake.initial_length,
                max: max_length,
            });
        }

        if self.snake.min_tick_interval_ms > self.snake.max_tick_interval_ms {
            return Err(ConfigError::InvertedRange {
                field: "snake.tick_interval",
            });
        }

        let particles = &self.particles;
        if particles.min_count > particles.max_count {
            return Err(ConfigError::InvertedRange {
                field: "particles.count",
            });
        }
        if particles.lifetime_min <= 0.0 {
            return Err(ConfigError::NonPositiveLifetime {
                lifetime: particles.lifetime_min,
            });
        }
        if particles.lifetime_min > particles.lifetime_max {
            return Err(ConfigError::InvertedRange {
                field: "particles.lifetime",
            });
        }
        if particles.speed_min > particles.speed_max {
            return Err(ConfigError::InvertedRange {
                field: "particles.speed",
            });
        }
        if !(particles.drag > 0.0 && particles.drag <= 1.0) {
            return Err(ConfigError::DragOutOfRange {
                drag: particles.drag,
            });
        }

        if self.food.spawn_attempts == 0 {
            return Err(ConfigError::NoSpawnAttempts);
        }

        Ok(())
    }
}

/// Errors reported when a configuration cannot drive the simulation.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The arena half-extent leaves no room for the snake.
    #[error("gameplay.boundary must be at least 1 (received {boundary})")]
    EmptyGrid {
        /// Half-extent that failed validation.
        boundary: i32,
    },
    /// The initial snake does not fit between the origin and the wall.
    #[error("snake.initial_length must be within 1..={max} (received {length})")]
    InitialLengthOutOfRange {
        /// Requested initial length.
        length: u32,
        /// Longest snake that fits the arena.
        max: u32,
    },
    /// A minimum exceeds its maximum.
    #[error("{field} minimum exceeds its maximum")]
    InvertedRange {
        /// Dotted path of the offending range.
        field: &'static str,
    },
    /// Particles would die before their first update.
    #[error("particles.lifetime_min must be positive (received {lifetime})")]
    NonPositiveLifetime {
        /// Lifetime that failed validation.
        lifetime: f32,
    },
    /// Drag would flip or amplify velocities.
    #[error("particles.drag must lie within (0, 1] (received {drag})")]
    DragOutOfRange {
        /// Drag factor that failed validation.
        drag: f32,
    },
    /// Food could never be placed.
    #[error("food.spawn_attempts must be positive")]
    NoSpawnAttempts,
}

/// Snake cadence, length and coloring.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SnakeConfig {
    /// Number of segments the snake is born with.
    pub initial_length: u32,
    /// Minimum wall-clock time between two snake steps, in milliseconds.
    pub tick_interval_ms: u64,
    /// Fastest cadence a settings layer may request, in milliseconds.
    pub min_tick_interval_ms: u64,
    /// Slowest cadence a settings layer may request, in milliseconds.
    pub max_tick_interval_ms: u64,
    /// Coloring strategy for body segments and death bursts.
    pub colors: ColorMode,
    /// Edge length of the head cube consumed by renderers.
    pub head_size: f32,
    /// Edge length of body cubes consumed by renderers.
    pub body_size: f32,
    /// Per-segment nudge renderers apply to avoid coplanar faces.
    pub z_fighting_offset: f32,
}

impl SnakeConfig {
    /// Cadence of the move gate.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Clamps `interval` into the configured cadence bounds.
    #[must_use]
    pub fn clamp_tick_interval(&self, interval: Duration) -> Duration {
        let (slowest, fastest) = self.interval_bounds();
        interval.clamp(fastest, slowest)
    }

    /// Cadence corresponding to a speed slider level, 1 being the slowest.
    #[must_use]
    pub fn interval_for_level(&self, level: u8) -> Duration {
        let (slowest, fastest) = self.interval_bounds();
        let level = level.clamp(1, MAX_SPEED_LEVEL);
        let span = slowest.saturating_sub(fastest);
        let steps = u32::from(MAX_SPEED_LEVEL - 1);
        slowest.saturating_sub(span * u32::from(level - 1) / steps)
    }

    /// Speed slider level closest to the current cadence.
    #[must_use]
    pub fn speed_level(&self) -> u8 {
        let (slowest, fastest) = self.interval_bounds();
        let span = slowest.saturating_sub(fastest).as_secs_f64();
        if span <= 0.0 {
            return MAX_SPEED_LEVEL;
        }
        let current = self.clamp_tick_interval(self.tick_interval());
        let ratio = slowest.saturating_sub(current).as_secs_f64() / span;
        let steps = f64::from(MAX_SPEED_LEVEL - 1);
        // Ratio is within 0.0..=1.0 so the rounded level stays within 1..=10.
        1 + (ratio * steps).round() as u8
    }

    fn interval_bounds(&self) -> (Duration, Duration) {
        let a = Duration::from_millis(self.min_tick_interval_ms);
        let b = Duration::from_millis(self.max_tick_interval_ms);
        (a.max(b), a.min(b))
    }
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            initial_length: 1,
            tick_interval_ms: 25,
            min_tick_interval_ms: 10,
            max_tick_interval_ms: 50,
            colors: ColorMode::default(),
            head_size: 1.0,
            body_size: 0.95,
            z_fighting_offset: 0.02,
        }
    }
}

/// Food appearance and spawning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FoodConfig {
    /// Color of the food sphere and of its capture burst.
    pub color: Rgb,
    /// Radius of the food sphere consumed by renderers.
    pub size: f32,
    /// Bob phase advanced per successful snake step, in radians.
    pub bob_speed: f32,
    /// Peak vertical displacement of the rendered food.
    pub bob_amplitude: f32,
    /// Random draws attempted before spawning is declared impossible.
    pub spawn_attempts: u32,
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            color: Rgb::new(1.0, 0.0, 0.0),
            size: 0.8,
            bob_speed: 0.05,
            bob_amplitude: 0.2,
            spawn_attempts: 4_096,
        }
    }
}

/// Particle feedback tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParticleConfig {
    /// Whether bursts are emitted and particles simulated.
    pub enabled: bool,
    /// Particles emitted per burst.
    pub count: u32,
    /// Smallest burst size a settings layer may request.
    pub min_count: u32,
    /// Largest burst size a settings layer may request.
    pub max_count: u32,
    /// Shortest lifetime of a radial burst particle, in seconds.
    pub lifetime_min: f32,
    /// Longest lifetime of a radial burst particle, in seconds.
    pub lifetime_max: f32,
    /// Slowest launch speed of a radial burst particle.
    pub speed_min: f32,
    /// Fastest launch speed of a radial burst particle.
    pub speed_max: f32,
    /// Maximum per-channel deviation from the burst color.
    pub color_variation: f32,
    /// Vertical acceleration applied every update.
    pub gravity: f32,
    /// Velocity multiplier applied every update.
    pub drag: f32,
    /// Upper bound on simultaneously live particles.
    pub max_live: usize,
    /// Point size consumed by renderers.
    pub size: f32,
}

impl ParticleConfig {
    /// Burst size with the count clamped into the current bounds.
    #[must_use]
    pub fn effective_count(&self) -> u32 {
        let (low, high) = ordered(self.min_count, self.max_count);
        self.count.clamp(low, high)
    }

    /// Lifetime bounds ordered low to high.
    #[must_use]
    pub fn lifetime_range(&self) -> (f32, f32) {
        ordered_f32(self.lifetime_min, self.lifetime_max)
    }

    /// Speed bounds ordered low to high.
    #[must_use]
    pub fn speed_range(&self) -> (f32, f32) {
        ordered_f32(self.speed_min, self.speed_max)
    }
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            count: 30,
            min_count: 10,
            max_count: 100,
            lifetime_min: 0.5,
            lifetime_max: 2.0,
            speed_min: 5.0,
            speed_max: 15.0,
            color_variation: 0.2,
            gravity: -9.8,
            drag: 0.98,
            max_live: 20_000,
            size: 2.0,
        }
    }
}

/// Arena size and randomness.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameplayConfig {
    /// Largest coordinate magnitude a living snake may occupy on any axis.
    pub boundary: i32,
    /// Seed for every random stream in the simulation.
    pub seed: u64,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            boundary: 24,
            seed: 0x5a4e_3d5e_ed00_0001,
        }
    }
}

/// Timing of the death sequence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeathSchedule {
    /// Delay before the first segment dissolves, in milliseconds. Zero
    /// dissolves it on the first tick after death.
    pub first_interval_ms: u64,
    /// Interval the acceleration starts from, in milliseconds.
    pub base_interval_ms: u64,
    /// Reduction applied per dissolved segment, in milliseconds.
    pub step_ms: u64,
    /// Shortest interval between two dissolving segments, in milliseconds.
    pub floor_ms: u64,
    /// Pause between the last dissolved segment and the reset, in milliseconds.
    pub complete_wait_ms: u64,
}

impl DeathSchedule {
    /// Delay before the first segment dissolves.
    #[must_use]
    pub fn first_interval(&self) -> Duration {
        Duration::from_millis(self.first_interval_ms)
    }

    /// Interval that follows the dissolution of segment number `progress`.
    #[must_use]
    pub fn interval_after(&self, progress: usize) -> Duration {
        let progress = u64::try_from(progress).unwrap_or(u64::MAX);
        let reduced = self
            .base_interval_ms
            .saturating_sub(progress.saturating_mul(self.step_ms));
        Duration::from_millis(reduced.max(self.floor_ms))
    }

    /// Pause between the last dissolved segment and the reset.
    #[must_use]
    pub fn complete_wait(&self) -> Duration {
        Duration::from_millis(self.complete_wait_ms)
    }
}

impl Default for DeathSchedule {
    fn default() -> Self {
        Self {
            first_interval_ms: 0,
            base_interval_ms: 500,
            step_ms: 25,
            floor_ms: 50,
            complete_wait_ms: 3_000,
        }
    }
}

fn ordered(a: u32, b: u32) -> (u32, u32) {
    (a.min(b), a.max(b))
}

fn ordered_f32(a: f32, b: f32) -> (f32, f32) {
    (a.min(b), a.max(b))
}

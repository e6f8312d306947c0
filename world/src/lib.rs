#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for AutoSnake3D.

mod clock;
mod food;
mod snake;

use std::time::Duration;

use autosnake_core::{BurstSpread, Cell, Command, Config, Direction, EmissionRequest, Event, Phase};
use thiserror::Error;

use crate::{clock::TickGate, food::FoodSpawner, snake::Snake};

pub use food::SpawnError;

/// Errors raised while executing a command.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum WorldError {
    /// Food could not be placed after the snake ate or the world reset.
    #[error("failed to spawn food: {0}")]
    Spawn(#[from] SpawnError),
}

/// Progress of the lifecycle state machine.
#[derive(Clone, Copy, Debug)]
enum PhaseState {
    Alive,
    Dying {
        progress: usize,
        gate: TickGate,
        interval: Duration,
    },
    DeathComplete {
        since: Duration,
    },
}

impl PhaseState {
    fn phase(&self) -> Phase {
        match self {
            Self::Alive => Phase::Alive,
            Self::Dying { .. } => Phase::Dying,
            Self::DeathComplete { .. } => Phase::DeathComplete,
        }
    }
}

/// Represents the authoritative AutoSnake3D world state.
#[derive(Debug)]
pub struct World {
    snake: Snake,
    food: Cell,
    spawner: FoodSpawner,
    phase: PhaseState,
    move_gate: TickGate,
    bob_phase: f32,
    clock: Duration,
}

impl World {
    /// Creates a living snake at the origin and places the first food.
    pub fn new(config: &Config) -> Result<Self, WorldError> {
        let snake = Snake::new(initial_length(config));
        let mut spawner = FoodSpawner::new(config.gameplay.seed);
        let food = spawner.spawn(
            config.gameplay.boundary,
            snake.body(),
            config.food.spawn_attempts,
        )?;

        Ok(Self {
            snake,
            food,
            spawner,
            phase: PhaseState::Alive,
            move_gate: TickGate::default(),
            bob_phase: 0.0,
            clock: Duration::ZERO,
        })
    }

    fn advance_phase(
        &mut self,
        config: &Config,
        now: Duration,
        out_events: &mut Vec<Event>,
    ) -> Result<(), WorldError> {
        match self.phase {
            PhaseState::Alive => {
                let interval = config
                    .snake
                    .clamp_tick_interval(config.snake.tick_interval());
                if self.move_gate.poll(now, interval) {
                    out_events.push(Event::MoveDue { now });
                }
            }
            PhaseState::Dying { .. } => self.dissolve_next_segment(config, now, out_events),
            PhaseState::DeathComplete { since } => {
                if now.saturating_sub(since) >= config.death.complete_wait() {
                    self.reset(config, out_events)?;
                }
            }
        }
        Ok(())
    }

    fn step_snake(
        &mut self,
        config: &Config,
        direction: Direction,
        out_events: &mut Vec<Event>,
    ) -> Result<(), WorldError> {
        if !matches!(self.phase, PhaseState::Alive) {
            return Ok(());
        }

        let from = self.snake.head();
        self.snake.advance(Some(direction));
        let to = self.snake.head();
        out_events.push(Event::SnakeMoved {
            from,
            to,
            length: self.snake.len(),
        });

        if to == self.food {
            tracing::info!(cell = ?to, length = self.snake.len(), "food consumed");
            self.snake.grow();
            out_events.push(Event::FoodConsumed { cell: to });
            if config.particles.enabled {
                out_events.push(Event::ParticlesRequested(EmissionRequest {
                    origin: to,
                    count: config.particles.effective_count(),
                    color: config.food.color,
                    spread: BurstSpread::Radial,
                }));
            }
            self.respawn_food(config, out_events)?;
        }

        if self.snake.check_collision(config.gameplay.boundary) {
            self.enter_dying(config, out_events);
        } else {
            self.bob_phase += config.food.bob_speed;
        }
        Ok(())
    }

    fn enter_dying(&mut self, config: &Config, out_events: &mut Vec<Event>) {
        tracing::info!(
            length = self.snake.len(),
            head = ?self.snake.head(),
            "snake died"
        );
        self.phase = PhaseState::Dying {
            progress: 0,
            gate: TickGate::started_at(self.clock),
            interval: config.death.first_interval(),
        };
        out_events.push(Event::PhaseChanged {
            phase: Phase::Dying,
        });
    }

    fn dissolve_next_segment(
        &mut self,
        config: &Config,
        now: Duration,
        out_events: &mut Vec<Event>,
    ) {
        let PhaseState::Dying {
            progress,
            gate,
            interval,
        } = &mut self.phase
        else {
            return;
        };
        if !gate.poll(now, *interval) {
            return;
        }

        let length = self.snake.len();
        let index = length.saturating_sub(*progress + 1);
        let cell = self.snake.body()[index];
        if config.particles.enabled {
            out_events.push(Event::ParticlesRequested(EmissionRequest {
                origin: cell,
                count: config.particles.effective_count(),
                color: config.snake.colors.segment_color(index, length, now),
                spread: BurstSpread::Fountain,
            }));
        }

        *interval = config.death.interval_after(*progress);
        *progress += 1;
        let remaining = length.saturating_sub(*progress);
        tracing::debug!(?cell, remaining, next_interval = ?interval, "segment dissolved");
        out_events.push(Event::SegmentDissolved { cell, remaining });

        if remaining == 0 {
            self.phase = PhaseState::DeathComplete { since: now };
            out_events.push(Event::PhaseChanged {
                phase: Phase::DeathComplete,
            });
        }
    }

    fn respawn_food(
        &mut self,
        config: &Config,
        out_events: &mut Vec<Event>,
    ) -> Result<(), WorldError> {
        let cell = self.spawner.spawn(
            config.gameplay.boundary,
            self.snake.body(),
            config.food.spawn_attempts,
        )?;
        tracing::debug!(?cell, "food spawned");
        self.food = cell;
        out_events.push(Event::FoodSpawned { cell });
        Ok(())
    }

    fn reset(&mut self, config: &Config, out_events: &mut Vec<Event>) -> Result<(), WorldError> {
        self.snake = Snake::new(initial_length(config));
        self.move_gate.reset();
        self.bob_phase = 0.0;
        self.phase = PhaseState::Alive;
        out_events.push(Event::WorldReset);
        self.respawn_food(config, out_events)?;
        out_events.push(Event::PhaseChanged {
            phase: Phase::Alive,
        });
        tracing::info!(length = self.snake.len(), "world reset");
        Ok(())
    }
}

fn initial_length(config: &Config) -> usize {
    usize::try_from(config.snake.initial_length).unwrap_or(usize::MAX)
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Commands that do not fit the current phase are ignored: steps and forced
/// growth only affect a living snake, and only a living snake can be killed.
pub fn apply(
    world: &mut World,
    config: &Config,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), WorldError> {
    match command {
        Command::Tick { now } => {
            world.clock = now;
            out_events.push(Event::TimeAdvanced { now });
            world.advance_phase(config, now, out_events)?;
        }
        Command::StepSnake { direction } => world.step_snake(config, direction, out_events)?,
        Command::ForceDeath => {
            if matches!(world.phase, PhaseState::Alive) {
                world.enter_dying(config, out_events);
            }
        }
        Command::ForceGrowth => {
            if matches!(world.phase, PhaseState::Alive) {
                world.snake.grow();
            }
        }
        Command::Reset => world.reset(config, out_events)?,
    }
    Ok(())
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use autosnake_core::{Cell, Config, Phase, SnakeView};

    use super::{PhaseState, World};

    /// Reports the current lifecycle phase.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.phase.phase()
    }

    /// Captures a read-only view of the full snake body and heading.
    #[must_use]
    pub fn snake_view(world: &World) -> SnakeView<'_> {
        SnakeView::new(world.snake.body(), world.snake.direction())
    }

    /// Segments that should be drawn, head first.
    ///
    /// While dying the dissolved tail segments are excluded; once every
    /// segment has dissolved the slice is empty.
    #[must_use]
    pub fn visible_segments(world: &World) -> &[Cell] {
        let body = world.snake.body();
        match world.phase {
            PhaseState::Alive => body,
            PhaseState::Dying { progress, .. } => &body[..body.len().saturating_sub(progress)],
            PhaseState::DeathComplete { .. } => &[],
        }
    }

    /// Cell currently holding the food.
    #[must_use]
    pub fn food(world: &World) -> Cell {
        world.food
    }

    /// Food centre with the vertical bob applied, as `[x, y, z]`.
    #[must_use]
    pub fn food_render_position(world: &World, config: &Config) -> [f32; 3] {
        let cell = world.food;
        let bob = world.bob_phase.sin() * config.food.bob_amplitude;
        [cell.x() as f32, cell.y() as f32 + bob, cell.z() as f32]
    }

    /// Time of the most recent tick.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the AutoSnake3D engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The simulation driver submits
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems consume event streams,
//! query immutable views, and respond exclusively with new command batches or
//! with changes to state they own outright (such as the particle collection).

mod config;

use std::{
    ops::{Add, Neg, Sub},
    time::Duration,
};

use serde::{Deserialize, Serialize};

pub use config::*;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to AutoSnake3D.";

/// Location of a single grid cell inside the cubic arena.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Cell {
    x: i32,
    y: i32,
    z: i32,
}

impl Cell {
    /// Cell at the centre of the arena where every snake is born.
    pub const ORIGIN: Cell = Cell::new(0, 0, 0);

    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Horizontal coordinate of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Depth coordinate of the cell.
    #[must_use]
    pub const fn z(&self) -> i32 {
        self.z
    }

    /// Returns the component of the cell along the provided axis.
    #[must_use]
    pub const fn component(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Cell reached by taking a single step in the provided direction.
    #[must_use]
    pub fn step(self, direction: Direction) -> Cell {
        self + direction.offset()
    }

    /// Euclidean distance between the centres of two cells.
    #[must_use]
    pub fn distance(self, other: Cell) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        let dz = f64::from(self.z) - f64::from(other.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Reports whether every axis magnitude lies within `half_extent`.
    #[must_use]
    pub fn in_bounds(self, half_extent: i32) -> bool {
        if half_extent < 0 {
            return false;
        }
        let limit = half_extent.unsigned_abs();
        Axis::ALL
            .iter()
            .all(|axis| self.component(*axis).unsigned_abs() <= limit)
    }
}

impl Add for Cell {
    type Output = Cell;

    fn add(self, rhs: Cell) -> Cell {
        Cell::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Cell {
    type Output = Cell;

    fn sub(self, rhs: Cell) -> Cell {
        Cell::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Cell {
    type Output = Cell;

    fn neg(self) -> Cell {
        Cell::new(-self.x, -self.y, -self.z)
    }
}

/// Axes of the cubic arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
    /// Depth axis.
    Z,
}

impl Axis {
    /// Every axis in evaluation order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

/// Unit steps available to the snake, one per axis sign.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing `x`.
    PositiveX,
    /// Movement toward decreasing `x`.
    NegativeX,
    /// Movement toward increasing `y`.
    PositiveY,
    /// Movement toward decreasing `y`.
    NegativeY,
    /// Movement toward increasing `z`.
    PositiveZ,
    /// Movement toward decreasing `z`.
    NegativeZ,
}

impl Direction {
    /// Every direction, positive before negative for each axis.
    pub const ALL: [Direction; 6] = [
        Direction::PositiveX,
        Direction::NegativeX,
        Direction::PositiveY,
        Direction::NegativeY,
        Direction::PositiveZ,
        Direction::NegativeZ,
    ];

    /// Unit step along `axis`, toward the positive end when `positive` is set.
    #[must_use]
    pub const fn along(axis: Axis, positive: bool) -> Self {
        match (axis, positive) {
            (Axis::X, true) => Direction::PositiveX,
            (Axis::X, false) => Direction::NegativeX,
            (Axis::Y, true) => Direction::PositiveY,
            (Axis::Y, false) => Direction::NegativeY,
            (Axis::Z, true) => Direction::PositiveZ,
            (Axis::Z, false) => Direction::NegativeZ,
        }
    }

    /// Axis the direction travels along.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Direction::PositiveX | Direction::NegativeX => Axis::X,
            Direction::PositiveY | Direction::NegativeY => Axis::Y,
            Direction::PositiveZ | Direction::NegativeZ => Axis::Z,
        }
    }

    /// Returns the direction pointing the other way along the same axis.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::PositiveX => Direction::NegativeX,
            Direction::NegativeX => Direction::PositiveX,
            Direction::PositiveY => Direction::NegativeY,
            Direction::NegativeY => Direction::PositiveY,
            Direction::PositiveZ => Direction::NegativeZ,
            Direction::NegativeZ => Direction::PositiveZ,
        }
    }

    /// Unit offset applied to a cell when stepping in this direction.
    #[must_use]
    pub const fn offset(self) -> Cell {
        match self {
            Direction::PositiveX => Cell::new(1, 0, 0),
            Direction::NegativeX => Cell::new(-1, 0, 0),
            Direction::PositiveY => Cell::new(0, 1, 0),
            Direction::NegativeY => Cell::new(0, -1, 0),
            Direction::PositiveZ => Cell::new(0, 0, 1),
            Direction::NegativeZ => Cell::new(0, 0, -1),
        }
    }
}

/// Linear RGB color with channels in the range `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel intensity.
    pub red: f32,
    /// Green channel intensity.
    pub green: f32,
    /// Blue channel intensity.
    pub blue: f32,
}

impl Rgb {
    /// Pure white.
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    /// Creates a color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }

    /// Creates a gray color with all channels set to `value`.
    #[must_use]
    pub const fn gray(value: f32) -> Self {
        Self::new(value, value, value)
    }

    /// Multiplies every channel by `factor`, clamping the result to `0.0..=1.0`.
    #[must_use]
    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.red * factor, self.green * factor, self.blue * factor).clamped()
    }

    /// Clamps every channel to `0.0..=1.0`.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self::new(
            self.red.clamp(0.0, 1.0),
            self.green.clamp(0.0, 1.0),
            self.blue.clamp(0.0, 1.0),
        )
    }

    /// Fully saturated, full value color at `hue` turns around the color wheel.
    #[must_use]
    pub fn from_hue(hue: f32) -> Self {
        let sector = hue.rem_euclid(1.0) * 6.0;
        let fraction = sector - sector.floor();
        let falling = 1.0 - fraction;
        // Sector index is in 0..6 because the hue was wrapped above.
        match sector as u32 {
            0 => Self::new(1.0, fraction, 0.0),
            1 => Self::new(falling, 1.0, 0.0),
            2 => Self::new(0.0, 1.0, fraction),
            3 => Self::new(0.0, falling, 1.0),
            4 => Self::new(fraction, 0.0, 1.0),
            _ => Self::new(1.0, 0.0, falling),
        }
    }
}

/// Strategy used to color snake segments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ColorMode {
    /// Single primary color that darkens toward the tail.
    Solid {
        /// Color of the head segment.
        color: Rgb,
        /// Fraction of brightness lost by the time the tail is reached.
        intensity: f32,
    },
    /// Dedicated head color followed by a repeating body palette.
    Pattern {
        /// Color of the head segment.
        head: Rgb,
        /// Palette repeated along the body.
        body: Vec<Rgb>,
        /// Fraction of brightness lost by the time the tail is reached.
        gradient_fade: f32,
    },
    /// Rainbow hues that travel along the body over time.
    Cycling {
        /// Hue turns per second.
        rate: f32,
    },
    /// Colored head followed by a body fading from white to dark gray.
    Grayscale {
        /// Color of the head segment.
        head: Rgb,
    },
}

impl ColorMode {
    /// Resolves the color of the segment at `index` in a body of `length`.
    ///
    /// `elapsed` is the simulation clock; only [`ColorMode::Cycling`] reads it.
    #[must_use]
    pub fn segment_color(&self, index: usize, length: usize, elapsed: Duration) -> Rgb {
        let t = if length == 0 {
            0.0
        } else {
            index as f32 / length as f32
        };

        match self {
            Self::Solid { color, intensity } => color.scaled(1.0 - t * intensity),
            Self::Pattern {
                head,
                body,
                gradient_fade,
            } => {
                if index == 0 || body.is_empty() {
                    return *head;
                }
                body[index % body.len()].scaled(1.0 - t * gradient_fade)
            }
            Self::Cycling { rate } => Rgb::from_hue(elapsed.as_secs_f32() * rate + t),
            Self::Grayscale { head } => {
                if index == 0 {
                    *head
                } else {
                    Rgb::gray(1.0 - t * 0.7)
                }
            }
        }
    }
}

impl Default for ColorMode {
    fn default() -> Self {
        Self::Pattern {
            head: Rgb::new(1.0, 0.843, 0.0),
            body: vec![
                Rgb::new(0.0, 0.5, 0.0),
                Rgb::new(0.2, 0.8, 0.2),
                Rgb::new(0.4, 0.7, 0.0),
            ],
            gradient_fade: 0.3,
        }
    }
}

/// Lifecycle phase of the simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The snake is steering toward food.
    #[default]
    Alive,
    /// The snake is unravelling segment by segment after a fatal collision.
    Dying,
    /// Every segment has dissolved; the world waits before resetting.
    DeathComplete,
}

/// Launch pattern applied to a burst of particles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BurstSpread {
    /// Velocities point uniformly in every direction.
    Radial,
    /// Velocities spray upward with a wide horizontal spread.
    Fountain,
}

/// Request for the particle system to emit a burst.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmissionRequest {
    /// Cell at whose centre the burst originates.
    pub origin: Cell,
    /// Number of particles to emit.
    pub count: u32,
    /// Color every particle is perturbed around.
    pub color: Rgb,
    /// Launch pattern of the burst.
    pub spread: BurstSpread,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock to the provided absolute time.
    Tick {
        /// Time elapsed since the simulation started.
        now: Duration,
    },
    /// Requests that the snake take a single step in the specified direction.
    StepSnake {
        /// Direction chosen for the step.
        direction: Direction,
    },
    /// Kills the snake immediately, bypassing the collision check.
    ForceDeath,
    /// Grows the snake by one segment on its next step.
    ForceGrowth,
    /// Replaces the snake and food and returns to [`Phase::Alive`].
    Reset,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Time elapsed since the simulation started.
        now: Duration,
    },
    /// Announces that the move gate opened and the snake awaits a direction.
    MoveDue {
        /// Time at which the gate opened.
        now: Duration,
    },
    /// Confirms that the snake's head moved between two cells.
    SnakeMoved {
        /// Cell the head occupied before moving.
        from: Cell,
        /// Cell the head occupies after moving.
        to: Cell,
        /// Body length after the move.
        length: usize,
    },
    /// Confirms that the snake swallowed the food.
    FoodConsumed {
        /// Cell the food occupied.
        cell: Cell,
    },
    /// Confirms that new food was placed.
    FoodSpawned {
        /// Cell the food occupies.
        cell: Cell,
    },
    /// Reports that the death sequence removed a segment from view.
    SegmentDissolved {
        /// Cell of the removed segment.
        cell: Cell,
        /// Segments still visible after the removal.
        remaining: usize,
    },
    /// Asks the particle system to emit a burst.
    ParticlesRequested(EmissionRequest),
    /// Announces that the simulation entered a new phase.
    PhaseChanged {
        /// Phase that became active.
        phase: Phase,
    },
    /// Announces that the snake and food were recreated from scratch.
    WorldReset,
}

/// Read-only view of the snake used by navigation.
#[derive(Clone, Copy, Debug)]
pub struct SnakeView<'a> {
    body: &'a [Cell],
    direction: Direction,
}

impl<'a> SnakeView<'a> {
    /// Captures a new view over the provided body and heading.
    ///
    /// The body is ordered head first and must not be empty; every snake the
    /// world builds keeps at least one segment.
    #[must_use]
    pub fn new(body: &'a [Cell], direction: Direction) -> Self {
        debug_assert!(!body.is_empty(), "snake view over an empty body");
        Self { body, direction }
    }

    /// Cell currently occupied by the head.
    #[must_use]
    pub fn head(&self) -> Cell {
        self.body[0]
    }

    /// Direction the snake travelled on its last step.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Ordered body cells, head first.
    #[must_use]
    pub fn body(&self) -> &'a [Cell] {
        self.body
    }

    /// Reports whether any body segment occupies `cell`.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }
}

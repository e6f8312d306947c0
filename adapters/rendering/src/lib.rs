#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for AutoSnake3D adapters.

use anyhow::Result as AnyResult;
use autosnake_core::{Cell, Phase, Rgb, MAX_SPEED_LEVEL};
use autosnake_simulation::{Simulation, SimulationError};
use glam::Vec3;
use std::time::Duration;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Attaches an alpha channel to a simulation color.
    #[must_use]
    pub fn from_rgb(rgb: Rgb, alpha: f32) -> Self {
        Self::new(rgb.red, rgb.green, rgb.blue, alpha.clamp(0.0, 1.0))
    }
}

/// Input snapshot gathered by adapters before advancing the simulation.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Whether the kill key was pressed on this frame.
    pub kill: bool,
    /// Whether the grow key was pressed on this frame.
    pub grow: bool,
    /// Whether the particle toggle was pressed on this frame.
    pub toggle_particles: bool,
    /// Burst size requested through the settings panel.
    pub particle_count: Option<u32>,
    /// Speed slider level requested through the settings panel.
    pub speed_level: Option<u8>,
}

impl FrameInput {
    /// Forwards the captured input to the simulation.
    pub fn apply_to(&self, simulation: &mut Simulation) -> Result<(), SimulationError> {
        if self.toggle_particles {
            let enabled = simulation.config().particles.enabled;
            simulation.set_particles_enabled(!enabled);
        }
        if let Some(count) = self.particle_count {
            simulation.set_particle_count(count);
        }
        if let Some(level) = self.speed_level {
            simulation.set_speed_level(level.min(MAX_SPEED_LEVEL));
        }
        if self.grow {
            simulation.force_growth()?;
        }
        if self.kill {
            simulation.force_death()?;
        }
        Ok(())
    }
}

/// Cube drawn for a single snake segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentPresentation {
    /// Centre of the cube in world units.
    pub position: Vec3,
    /// Edge length of the cube.
    pub size: f32,
    /// Fill color of the cube.
    pub color: Color,
}

/// Sphere drawn for the food.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FoodPresentation {
    /// Centre of the sphere, including the vertical bob.
    pub position: Vec3,
    /// Radius of the sphere.
    pub radius: f32,
    /// Fill color of the sphere.
    pub color: Color,
}

/// Point sprite drawn for a particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleSprite {
    /// Position of the sprite in world units.
    pub position: Vec3,
    /// Point size of the sprite.
    pub size: f32,
    /// Color of the sprite with its alpha fading toward expiry.
    pub color: Color,
}

/// Scene description combining the snake, food and particles.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Visible snake segments, head first.
    pub segments: Vec<SegmentPresentation>,
    /// Food sphere, hidden while the snake is dying.
    pub food: Option<FoodPresentation>,
    /// Live particle sprites.
    pub particles: Vec<ParticleSprite>,
    /// Lifecycle phase the scene was captured in.
    pub phase: Phase,
    /// Half-extent of the arena, for drawing its bounds.
    pub boundary: i32,
}

impl Scene {
    /// Captures a snapshot of the simulation for presentation.
    #[must_use]
    pub fn capture(simulation: &Simulation) -> Self {
        let config = simulation.config();
        let phase = simulation.phase();
        let elapsed = simulation.clock();
        let visible = simulation.visible_segments();
        // Colors are resolved against the full body so dissolving keeps each
        // segment's shade.
        let length = simulation.snake_view().body().len();

        let segments = visible
            .iter()
            .enumerate()
            .map(|(index, cell)| {
                let offset = config.snake.z_fighting_offset * index as f32;
                SegmentPresentation {
                    position: cell_centre(*cell) + Vec3::splat(offset),
                    size: if index == 0 {
                        config.snake.head_size
                    } else {
                        config.snake.body_size
                    },
                    color: Color::from_rgb(
                        config.snake.colors.segment_color(index, length, elapsed),
                        1.0,
                    ),
                }
            })
            .collect();

        let food = (phase != Phase::Dying).then(|| FoodPresentation {
            position: Vec3::from_array(simulation.food_render_position()),
            radius: config.food.size,
            color: Color::from_rgb(config.food.color, 1.0),
        });

        let particles = simulation
            .particles()
            .iter()
            .map(|particle| ParticleSprite {
                position: particle.position(),
                size: config.particles.size,
                color: Color::from_rgb(particle.color(), particle.alpha()),
            })
            .collect();

        Self {
            segments,
            food,
            particles,
            phase,
            boundary: config.gameplay.boundary,
        }
    }
}

fn cell_centre(cell: Cell) -> Vec3 {
    Vec3::new(cell.x() as f32, cell.y() as f32, cell.z() as f32)
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting AutoSnake3D scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta
    /// and per-frame input captured by the adapter, and refreshes the scene
    /// before it is rendered. It returns `false` once the adapter should stop.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> AnyResult<bool> + 'static;
}

#[cfg(test)]
mod tests {
    use super::*;
    use autosnake_core::{ColorMode, Config};

    fn simulation(configure: impl FnOnce(&mut Config)) -> Simulation {
        let mut config = Config::default();
        configure(&mut config);
        Simulation::new(config).expect("valid configuration")
    }

    #[test]
    fn capture_resolves_segment_colors_and_sizes() {
        let simulation = simulation(|config| {
            config.snake.initial_length = 3;
            config.snake.colors = ColorMode::Solid {
                color: Rgb::new(0.0, 1.0, 0.0),
                intensity: 0.0,
            };
        });
        let scene = Scene::capture(&simulation);

        assert_eq!(scene.segments.len(), 3);
        assert_eq!(scene.segments[0].size, 1.0);
        assert_eq!(scene.segments[1].size, 0.95);
        assert_eq!(scene.segments[0].position, Vec3::ZERO);
        assert!((scene.segments[2].position - Vec3::new(-1.96, 0.04, 0.04)).length() < 1e-5);
        assert!(scene
            .segments
            .iter()
            .all(|segment| segment.color == Color::new(0.0, 1.0, 0.0, 1.0)));
        assert!(scene.food.is_some());
        assert_eq!(scene.phase, Phase::Alive);
    }

    #[test]
    fn food_is_hidden_while_dying() {
        let mut simulation = simulation(|_| {});
        simulation.force_death().expect("death applies");
        let scene = Scene::capture(&simulation);
        assert_eq!(scene.phase, Phase::Dying);
        assert!(scene.food.is_none());
    }

    #[test]
    fn particle_sprites_fade_with_lifetime() {
        let mut simulation = simulation(|_| {});
        simulation
            .frame(Duration::ZERO, 0.0)
            .expect("frame advances");
        simulation.force_death().expect("death applies");
        simulation
            .frame(Duration::from_millis(250), 0.0)
            .expect("frame advances");
        simulation
            .frame(Duration::from_millis(266), 0.25)
            .expect("frame advances");

        let scene = Scene::capture(&simulation);
        assert!(!scene.particles.is_empty());
        for (sprite, particle) in scene.particles.iter().zip(simulation.particles()) {
            assert_eq!(sprite.color.alpha, particle.alpha());
            assert!(sprite.color.alpha < 1.0);
            assert_eq!(sprite.size, 2.0);
        }
    }

    #[test]
    fn frame_input_drives_simulation_settings() {
        let mut simulation = simulation(|_| {});
        let input = FrameInput {
            toggle_particles: true,
            particle_count: Some(500),
            speed_level: Some(30),
            kill: true,
            ..FrameInput::default()
        };
        input.apply_to(&mut simulation).expect("input applies");

        assert!(!simulation.config().particles.enabled);
        assert_eq!(simulation.config().particles.count, 100);
        assert_eq!(simulation.config().snake.tick_interval_ms, 10);
        assert_eq!(simulation.phase(), Phase::Dying);
    }

    #[test]
    fn from_rgb_u8_normalises_channels() {
        let color = Color::from_rgb_u8(255, 0, 51);
        assert_eq!(color, Color::new(1.0, 0.0, 0.2, 1.0));
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Particle feedback system.
//!
//! Owns the live particle collection outright. Bursts arrive as
//! [`Event::ParticlesRequested`] values from the world and the collection is
//! integrated once per visual frame, independently of the move gate.

use autosnake_core::{BurstSpread, Cell, EmissionRequest, Event, ParticleConfig, Rgb};
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, UnitSphere};

const FOUNTAIN_HORIZONTAL_SPEED: f32 = 15.0;
const FOUNTAIN_UPWARD_SPEED: (f32, f32) = (5.0, 20.0);
const FOUNTAIN_LIFETIME: (f32, f32) = (0.5, 1.5);

/// Single simulated particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    position: Vec3,
    velocity: Vec3,
    color: Rgb,
    remaining: f32,
    lifetime: f32,
}

impl Particle {
    /// Creates a particle that lives for `lifetime` seconds.
    #[must_use]
    pub fn new(position: Vec3, velocity: Vec3, color: Rgb, lifetime: f32) -> Self {
        Self {
            position,
            velocity,
            color,
            remaining: lifetime,
            lifetime,
        }
    }

    /// Current position in world units.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Current velocity in world units per second.
    #[must_use]
    pub const fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Base color of the particle.
    #[must_use]
    pub const fn color(&self) -> Rgb {
        self.color
    }

    /// Seconds left before the particle expires.
    #[must_use]
    pub const fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Seconds the particle lived for when it was emitted.
    #[must_use]
    pub const fn lifetime(&self) -> f32 {
        self.lifetime
    }

    /// Opacity fading linearly from one at emission to zero at expiry.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        if self.lifetime <= 0.0 {
            return 0.0;
        }
        (self.remaining / self.lifetime).clamp(0.0, 1.0)
    }
}

/// Live particle collection with its own deterministic random stream.
#[derive(Clone, Debug)]
pub struct Particles {
    particles: Vec<Particle>,
    rng: ChaCha8Rng,
}

impl Particles {
    /// Creates an empty collection whose bursts are drawn from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Emits every burst requested by the provided events.
    pub fn handle(&mut self, events: &[Event], config: &ParticleConfig) {
        if !config.enabled {
            return;
        }

        for event in events {
            if let Event::ParticlesRequested(request) = event {
                self.emit_burst(request, config);
            }
        }
    }

    /// Adds a single particle unless the live cap is reached.
    ///
    /// Returns whether the particle was accepted.
    pub fn emit(&mut self, particle: Particle, config: &ParticleConfig) -> bool {
        if self.particles.len() >= config.max_live {
            return false;
        }
        self.particles.push(particle);
        true
    }

    /// Emits `request.count` particles around the centre of `request.origin`.
    pub fn emit_burst(&mut self, request: &EmissionRequest, config: &ParticleConfig) {
        let origin = cell_centre(request.origin);
        let mut emitted = 0_u32;

        for _ in 0..request.count {
            let (velocity, lifetime) = match request.spread {
                BurstSpread::Radial => self.radial_launch(config),
                BurstSpread::Fountain => self.fountain_launch(),
            };
            let color = self.jitter(request.color, config.color_variation);
            if !self.emit(Particle::new(origin, velocity, color, lifetime), config) {
                tracing::debug!(
                    requested = request.count,
                    emitted,
                    cap = config.max_live,
                    "particle cap reached"
                );
                return;
            }
            emitted += 1;
        }
    }

    /// Integrates every particle over `dt` seconds and drops expired ones.
    pub fn update(&mut self, dt: f32, config: &ParticleConfig) {
        for particle in &mut self.particles {
            particle.position += particle.velocity * dt;
            particle.velocity.y += config.gravity * dt;
            particle.velocity *= config.drag;
            particle.remaining -= dt;
        }
        self.particles.retain(|particle| particle.remaining > 0.0);
    }

    /// Removes every live particle.
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Live particles in emission order.
    #[must_use]
    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of live particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Reports whether no particle is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    fn radial_launch(&mut self, config: &ParticleConfig) -> (Vec3, f32) {
        let direction: [f32; 3] = UnitSphere.sample(&mut self.rng);
        let (slowest, fastest) = config.speed_range();
        let (shortest, longest) = config.lifetime_range();
        let speed = sample_between(&mut self.rng, slowest, fastest);
        let lifetime = sample_between(&mut self.rng, shortest, longest);
        (Vec3::from_array(direction) * speed, lifetime)
    }

    fn fountain_launch(&mut self) -> (Vec3, f32) {
        let velocity = Vec3::new(
            sample_between(
                &mut self.rng,
                -FOUNTAIN_HORIZONTAL_SPEED,
                FOUNTAIN_HORIZONTAL_SPEED,
            ),
            sample_between(&mut self.rng, FOUNTAIN_UPWARD_SPEED.0, FOUNTAIN_UPWARD_SPEED.1),
            sample_between(
                &mut self.rng,
                -FOUNTAIN_HORIZONTAL_SPEED,
                FOUNTAIN_HORIZONTAL_SPEED,
            ),
        );
        let lifetime = sample_between(&mut self.rng, FOUNTAIN_LIFETIME.0, FOUNTAIN_LIFETIME.1);
        (velocity, lifetime)
    }

    fn jitter(&mut self, color: Rgb, variation: f32) -> Rgb {
        let spread = variation.abs();
        Rgb::new(
            color.red + sample_between(&mut self.rng, -spread, spread),
            color.green + sample_between(&mut self.rng, -spread, spread),
            color.blue + sample_between(&mut self.rng, -spread, spread),
        )
        .clamped()
    }
}

fn cell_centre(cell: Cell) -> Vec3 {
    Vec3::new(cell.x() as f32, cell.y() as f32, cell.z() as f32)
}

/// Uniform draw from `low..high`, collapsing to `low` for empty ranges.
fn sample_between(rng: &mut ChaCha8Rng, low: f32, high: f32) -> f32 {
    if low < high {
        rng.gen_range(low..high)
    } else {
        low
    }
}

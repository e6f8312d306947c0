//! Seeded food placement.

use std::collections::HashSet;

use autosnake_core::Cell;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// Reasons food could not be placed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SpawnError {
    /// The snake covers every cell of the arena.
    #[error("every cell of the arena is occupied by the snake")]
    GridFull,
    /// Rejection sampling gave up before finding a free cell.
    #[error("no free cell found after {attempts} attempts")]
    Exhausted {
        /// Number of cells drawn before giving up.
        attempts: u32,
    },
}

/// Draws food cells from a deterministic random stream.
#[derive(Clone, Debug)]
pub(crate) struct FoodSpawner {
    rng: ChaCha8Rng,
}

impl FoodSpawner {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Picks a uniformly random in-bounds cell that no segment occupies.
    pub(crate) fn spawn(
        &mut self,
        half_extent: i32,
        occupied: &[Cell],
        attempts: u32,
    ) -> Result<Cell, SpawnError> {
        if half_extent < 0 {
            return Err(SpawnError::GridFull);
        }

        let blocked: HashSet<Cell> = occupied
            .iter()
            .copied()
            .filter(|cell| cell.in_bounds(half_extent))
            .collect();
        let side = u64::from(half_extent.unsigned_abs()) * 2 + 1;
        let blocked_count = u64::try_from(blocked.len()).unwrap_or(u64::MAX);
        if side.saturating_pow(3) <= blocked_count {
            return Err(SpawnError::GridFull);
        }

        for _ in 0..attempts {
            let candidate = Cell::new(
                self.rng.gen_range(-half_extent..=half_extent),
                self.rng.gen_range(-half_extent..=half_extent),
                self.rng.gen_range(-half_extent..=half_extent),
            );
            if !blocked.contains(&candidate) {
                return Ok(candidate);
            }
        }

        Err(SpawnError::Exhausted { attempts })
    }
}

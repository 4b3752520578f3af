//! RNG module - deterministic piece generation
//!
//! Pieces are drawn uniformly from the 15-shape catalog, then a second roll
//! decides the special type:
//!
//! - roll > `bomb_threshold` (0.92): BOMB, 8%
//! - roll > `ice_threshold` (0.85): ICE, 7% (NORMAL while Freeze is active)
//! - otherwise NORMAL
//!
//! [`generate_pieces`] accepts any [`rand::Rng`]. Sessions use [`SimpleRng`], a
//! small LCG whose whole state is one `u32`, so a game is reproducible from a
//! seed and its RNG can be saved in a snapshot.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::pieces::{Piece, ShapeId};
use crate::rules::Rules;
use crate::types::SpecialKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Current internal state; `SimpleRng::new(rng.state())` resumes the sequence
    pub fn state(&self) -> u32 {
        self.state
    }

    fn step(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod 2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }
}

impl RngCore for SimpleRng {
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.step() as u64;
        let lo = self.step() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

/// Map a roll in [0, 1) to a special type
pub fn roll_special(roll: f64, rules: &Rules, allow_ice: bool) -> SpecialKind {
    if roll > rules.bomb_threshold {
        SpecialKind::Bomb
    } else if roll > rules.ice_threshold && allow_ice {
        SpecialKind::Ice
    } else {
        SpecialKind::Normal
    }
}

/// Generate `count` fresh pieces.
///
/// `next_id` is the instance-id counter; it advances by one per piece.
pub fn generate_pieces<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    rules: &Rules,
    allow_ice: bool,
    next_id: &mut u32,
) -> Vec<Piece> {
    (0..count)
        .map(|_| {
            let shape_id = ShapeId::ALL[rng.random_range(0..ShapeId::ALL.len())];
            let special = roll_special(rng.random::<f64>(), rules, allow_ice);
            let id = *next_id;
            *next_id = next_id.wrapping_add(1);
            Piece::new(id, shape_id, special)
        })
        .collect()
}

/// Session piece source: a seeded LCG plus the instance-id counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceGenerator {
    rng: SimpleRng,
    next_id: u32,
}

impl PieceGenerator {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            next_id: 1,
        }
    }

    /// Resume from saved state
    pub fn from_state(rng_state: u32, next_id: u32) -> Self {
        Self {
            rng: SimpleRng::new(rng_state),
            next_id,
        }
    }

    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }

    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    /// Deal `count` pieces from the session RNG
    pub fn deal(&mut self, count: usize, rules: &Rules, allow_ice: bool) -> Vec<Piece> {
        generate_pieces(&mut self.rng, count, rules, allow_ice, &mut self.next_id)
    }
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new(1)
    }
}

//! Snapshot module - serializable session state
//!
//! A snapshot holds everything needed to continue a session except the rules
//! (supplied again on restore) and the undo history (dropped). The RNG is
//! saved as its raw state, so a restored game deals the same pieces.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::achievements::{Achievement, GameStats};
use crate::board::Board;
use crate::objectives::Objective;
use crate::passives::Loadout;
use crate::rules::RulesError;
use crate::tray::Tray;
use crate::types::GameMode;

/// Bumped whenever the snapshot layout changes
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub schema_version: u32,
    pub mode: GameMode,
    pub level_index: usize,
    pub max_level_reached: usize,
    pub board: Board,
    pub tray: Tray,
    pub rng_state: u32,
    pub next_piece_id: u32,
    pub score: u32,
    pub high_score: u32,
    pub flux: u8,
    pub surge: bool,
    pub combo: u32,
    pub moves_left: Option<u32>,
    pub objectives: Vec<Objective>,
    pub level_complete: bool,
    pub game_over: bool,
    pub freeze_moves: u32,
    pub loadout: Loadout,
    pub stats: GameStats,
    pub achievements: Vec<Achievement>,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        !self.game_over && !self.level_complete
    }
}

/// Why a snapshot cannot be restored
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotError {
    UnsupportedVersion { found: u32, expected: u32 },
    UnknownLevel(usize),
    Rules(RulesError),
}

impl SnapshotError {
    pub fn code(&self) -> &'static str {
        match self {
            SnapshotError::UnsupportedVersion { .. } => "unsupported_version",
            SnapshotError::UnknownLevel(_) => "unknown_level",
            SnapshotError::Rules(_) => "invalid_rules",
        }
    }
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::UnsupportedVersion { found, expected } => write!(
                f,
                "snapshot schema version {} is not supported (expected {})",
                found, expected
            ),
            SnapshotError::UnknownLevel(index) => write!(f, "level {} does not exist", index),
            SnapshotError::Rules(err) => write!(f, "invalid rules: {}", err),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::Rules(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RulesError> for SnapshotError {
    fn from(err: RulesError) -> Self {
        SnapshotError::Rules(err)
    }
}

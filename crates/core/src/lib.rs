//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the grid rules, the session state and the scoring
//! economy. It has **no dependencies** on UI, networking, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games
//! - **Testable**: Every rule is a plain function over plain data
//! - **Portable**: Runs headless, in a terminal or behind any host UI
//! - **Fast**: The resolver works on fixed-size arrays; only the wave log allocates
//!
//! # Module Structure
//!
//! - [`board`]: 10x10 grid, gravity and line detection
//! - [`pieces`]: The 15-shape catalog and clockwise rotation
//! - [`placement`]: Placement validation, fit search and the best-anchor heuristic
//! - [`resolver`]: Line clears, ICE/BOMB behavior and cascading waves
//! - [`scoring`]: Placement and skill points, the flux meter and the surge
//! - [`objectives`]: Career objectives and the level table
//! - [`achievements`]: Lifetime stats and achievement unlocks
//! - [`passives`]: Equipped passive modifiers
//! - [`rng`]: Seeded piece generation
//! - [`tray`]: The three offered pieces
//! - [`rules`]: Tunable parameters
//! - [`game_state`]: The session that ties everything together
//! - [`snapshot`]: Serializable session state
//!
//! # Example
//!
//! ```
//! use flux_grid_core::GameState;
//! use flux_grid_core::placement::best_placement;
//! use flux_grid_types::GameMode;
//!
//! let mut game = GameState::new(12345, GameMode::Endless);
//!
//! let piece = *game.tray().get(0).unwrap();
//! let (x, y) = best_placement(game.board(), &piece).unwrap();
//! let event = game.commit_placement(0, x, y).unwrap();
//!
//! assert_eq!(event.blocks_placed, piece.cell_count());
//! assert!(game.score() > 0);
//! ```

pub mod achievements;
pub mod board;
pub mod game_state;
pub mod objectives;
pub mod passives;
pub mod pieces;
pub mod placement;
pub mod resolver;
pub mod rng;
pub mod rules;
pub mod scoring;
pub mod snapshot;
pub mod tray;

pub use flux_grid_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use game_state::{GameState, SkillReport};
pub use objectives::{update_objectives, Objective, ObjectiveDelta, LEVELS};
pub use pieces::{Piece, Shape, ShapeId};
pub use placement::{can_place, place, PlacementError};
pub use resolver::{resolve, Resolution, Wave};
pub use rng::{generate_pieces, PieceGenerator, SimpleRng};
pub use rules::{Rules, RulesError};
pub use scoring::{calculate_score, compute_score_delta, FluxMeter, ScoreResult};
pub use snapshot::{GameSnapshot, SnapshotError, SCHEMA_VERSION};
pub use tray::Tray;

//! Command layer over the core session.
//!
//! Hosts drive a [`GameState`](flux_grid_core::GameState) through these two
//! entry points; each validates the request, reports a typed error with a
//! stable code on rejection, and otherwise runs one full turn.

pub mod place;
pub mod skill;

pub use place::{apply_place, PlaceError};
pub use skill::{apply_skill, SkillCommand, SkillError, SkillOutcome};

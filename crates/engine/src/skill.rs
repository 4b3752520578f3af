//! Skill commands
//!
//! Every skill costs flux (see `Rules::costs`). Checks run in a fixed order:
//! playable, then target validity, then flux. A rejected command leaves the
//! state untouched.

use std::fmt;

use tracing::debug;

use flux_grid_core::placement::best_placement;
use flux_grid_core::{GameState, SkillReport};
use flux_grid_types::{Skill, TurnEvent};

/// A skill request from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillCommand {
    Reroll,
    Shatter { x: i8, y: i8 },
    Bomb { x: i8, y: i8 },
    Rotate { index: usize },
    Swap { a: usize, b: usize },
    Freeze,
    Magnet { index: usize },
    Undo,
}

impl SkillCommand {
    pub fn skill(&self) -> Skill {
        match self {
            SkillCommand::Reroll => Skill::Reroll,
            SkillCommand::Shatter { .. } => Skill::Shatter,
            SkillCommand::Bomb { .. } => Skill::Bomb,
            SkillCommand::Rotate { .. } => Skill::Rotate,
            SkillCommand::Swap { .. } => Skill::Swap,
            SkillCommand::Freeze => Skill::Freeze,
            SkillCommand::Magnet { .. } => Skill::Magnet,
            SkillCommand::Undo => Skill::Undo,
        }
    }
}

/// What an accepted skill did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillOutcome {
    /// Reroll, Rotate or Swap changed the tray
    TrayChanged,
    /// Shatter or Bomb changed the board and resolved it
    Resolved(SkillReport),
    /// Magnet placed a piece
    Placed(TurnEvent),
    /// ICE generation is off for this many placements
    Frozen { moves: u32 },
    Undone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillError {
    NotPlayable,
    InsufficientFlux { needed: u8, available: u8 },
    NoSuchPiece,
    SameSlot,
    OutOfBounds,
    EmptyCell,
    NothingToHit,
    NoPlacement,
    NothingToUndo,
}

impl SkillError {
    pub fn code(self) -> &'static str {
        match self {
            SkillError::NotPlayable => "not_playable",
            SkillError::InsufficientFlux { .. } => "insufficient_flux",
            SkillError::NoSuchPiece => "no_such_piece",
            SkillError::SameSlot => "same_slot",
            SkillError::OutOfBounds => "out_of_bounds",
            SkillError::EmptyCell => "empty_cell",
            SkillError::NothingToHit => "nothing_to_hit",
            SkillError::NoPlacement => "no_placement",
            SkillError::NothingToUndo => "nothing_to_undo",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            SkillError::NotPlayable => "game is not playable",
            SkillError::InsufficientFlux { .. } => "not enough flux",
            SkillError::NoSuchPiece => "tray slot is empty",
            SkillError::SameSlot => "cannot swap a slot with itself",
            SkillError::OutOfBounds => "target is off the grid",
            SkillError::EmptyCell => "target cell is empty",
            SkillError::NothingToHit => "blast area holds no blocks",
            SkillError::NoPlacement => "piece fits nowhere in its current orientation",
            SkillError::NothingToUndo => "no earlier turn to restore",
        }
    }
}

impl fmt::Display for SkillError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkillError::InsufficientFlux { needed, available } => {
                write!(f, "not enough flux: need {}, have {}", needed, available)
            }
            other => f.write_str(other.message()),
        }
    }
}

impl std::error::Error for SkillError {}

fn check_flux(state: &GameState, skill: Skill) -> Result<(), SkillError> {
    let needed = state.rules().cost(skill);
    let available = state.flux().level();
    if available < needed {
        return Err(SkillError::InsufficientFlux { needed, available });
    }
    Ok(())
}

fn check_slot(state: &GameState, index: usize) -> Result<(), SkillError> {
    if index >= state.tray().len() {
        return Err(SkillError::NoSuchPiece);
    }
    Ok(())
}

fn validate(state: &GameState, cmd: SkillCommand) -> Result<(), SkillError> {
    if cmd == SkillCommand::Undo {
        if state.history_len() == 0 {
            return Err(SkillError::NothingToUndo);
        }
        return check_flux(state, Skill::Undo);
    }

    if !state.playable() {
        return Err(SkillError::NotPlayable);
    }

    match cmd {
        SkillCommand::Shatter { x, y } => {
            if state.board().is_out_of_bounds(x, y) {
                return Err(SkillError::OutOfBounds);
            }
            if !state.board().is_occupied(x, y) {
                return Err(SkillError::EmptyCell);
            }
        }
        SkillCommand::Bomb { x, y } => {
            if state.board().is_out_of_bounds(x, y) {
                return Err(SkillError::OutOfBounds);
            }
            let any = (-1..=1)
                .flat_map(|dy| (-1..=1).map(move |dx| (dx, dy)))
                .any(|(dx, dy)| state.board().is_occupied(x + dx, y + dy));
            if !any {
                return Err(SkillError::NothingToHit);
            }
        }
        SkillCommand::Rotate { index } => check_slot(state, index)?,
        SkillCommand::Swap { a, b } => {
            check_slot(state, a)?;
            check_slot(state, b)?;
            if a == b {
                return Err(SkillError::SameSlot);
            }
        }
        SkillCommand::Magnet { index } => {
            check_slot(state, index)?;
            let fits = state
                .tray()
                .get(index)
                .and_then(|piece| best_placement(state.board(), piece));
            if fits.is_none() {
                return Err(SkillError::NoPlacement);
            }
        }
        SkillCommand::Reroll | SkillCommand::Freeze | SkillCommand::Undo => {}
    }

    check_flux(state, cmd.skill())
}

/// Run a skill command
pub fn apply_skill(state: &mut GameState, cmd: SkillCommand) -> Result<SkillOutcome, SkillError> {
    if let Err(err) = validate(state, cmd) {
        debug!(skill = cmd.skill().as_str(), code = err.code(), "skill rejected");
        return Err(err);
    }

    // Validated above; the error fallbacks are unreachable.
    let outcome = match cmd {
        SkillCommand::Reroll => state
            .reroll()
            .then_some(SkillOutcome::TrayChanged)
            .ok_or(SkillError::NotPlayable)?,
        SkillCommand::Shatter { x, y } => state
            .shatter(x, y)
            .map(SkillOutcome::Resolved)
            .ok_or(SkillError::EmptyCell)?,
        SkillCommand::Bomb { x, y } => state
            .bomb(x, y)
            .map(SkillOutcome::Resolved)
            .ok_or(SkillError::NothingToHit)?,
        SkillCommand::Rotate { index } => state
            .rotate_piece(index)
            .then_some(SkillOutcome::TrayChanged)
            .ok_or(SkillError::NoSuchPiece)?,
        SkillCommand::Swap { a, b } => state
            .swap_pieces(a, b)
            .then_some(SkillOutcome::TrayChanged)
            .ok_or(SkillError::NoSuchPiece)?,
        SkillCommand::Freeze => {
            if !state.freeze() {
                return Err(SkillError::NotPlayable);
            }
            SkillOutcome::Frozen {
                moves: state.freeze_moves(),
            }
        }
        SkillCommand::Magnet { index } => state
            .magnet(index)
            .map(SkillOutcome::Placed)
            .ok_or(SkillError::NoPlacement)?,
        SkillCommand::Undo => state
            .undo()
            .then_some(SkillOutcome::Undone)
            .ok_or(SkillError::NothingToUndo)?,
    };

    debug!(
        skill = cmd.skill().as_str(),
        flux = state.flux().level(),
        "skill applied"
    );
    Ok(outcome)
}

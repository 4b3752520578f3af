use std::fmt;

use tracing::debug;

use flux_grid_core::placement::{check_placement, PlacementError};
use flux_grid_core::GameState;
use flux_grid_types::TurnEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceError {
    NotPlayable,
    NoSuchPiece,
    OutOfBounds,
    Blocked,
}

impl PlaceError {
    pub fn code(self) -> &'static str {
        match self {
            PlaceError::NotPlayable => "not_playable",
            PlaceError::NoSuchPiece => "no_such_piece",
            PlaceError::OutOfBounds => "out_of_bounds",
            PlaceError::Blocked => "blocked",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PlaceError::NotPlayable => "game is not playable",
            PlaceError::NoSuchPiece => "tray slot is empty",
            PlaceError::OutOfBounds => "piece would extend past the grid",
            PlaceError::Blocked => "piece overlaps a filled cell",
        }
    }
}

impl fmt::Display for PlaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for PlaceError {}

impl From<PlacementError> for PlaceError {
    fn from(err: PlacementError) -> Self {
        match err {
            PlacementError::OutOfBounds { .. } => PlaceError::OutOfBounds,
            PlacementError::Collision { .. } => PlaceError::Blocked,
        }
    }
}

/// Place tray piece `tray_index` with its top-left mask corner at (x, y)
pub fn apply_place(
    state: &mut GameState,
    tray_index: usize,
    x: i8,
    y: i8,
) -> Result<TurnEvent, PlaceError> {
    if !state.playable() {
        return Err(PlaceError::NotPlayable);
    }

    let Some(piece) = state.tray().get(tray_index) else {
        return Err(PlaceError::NoSuchPiece);
    };

    if let Err(err) = check_placement(state.board(), piece, x, y) {
        debug!(tray_index, x, y, %err, "placement rejected");
        return Err(err.into());
    }

    state
        .commit_placement(tray_index, x, y)
        .ok_or(PlaceError::Blocked)
}

//! Placement module - validating and writing pieces onto the board
//!
//! A piece anchored at (x, y) covers `(x + col, y + row)` for every filled
//! mask cell. A placement is legal when every covered cell is in bounds and
//! empty. Writing a piece never resolves lines; that is the resolver's job.

use std::fmt;

use crate::board::{Board, N};
use crate::pieces::Piece;
use crate::types::{Block, GRID_SIZE};

/// Why a piece cannot be written at an anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    /// A covered cell lies outside the grid
    OutOfBounds { x: i8, y: i8 },
    /// A covered cell is already filled
    Collision { x: i8, y: i8 },
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementError::OutOfBounds { x, y } => write!(f, "cell ({}, {}) is off the grid", x, y),
            PlacementError::Collision { x, y } => write!(f, "cell ({}, {}) is occupied", x, y),
        }
    }
}

impl std::error::Error for PlacementError {}

/// First covered cell that blocks the placement, if any
pub fn check_placement(board: &Board, piece: &Piece, x: i8, y: i8) -> Result<(), PlacementError> {
    for (col, row) in piece.shape.offsets() {
        let tx = x.saturating_add(col);
        let ty = y.saturating_add(row);
        if board.is_out_of_bounds(tx, ty) {
            return Err(PlacementError::OutOfBounds { x: tx, y: ty });
        }
        if board.is_occupied(tx, ty) {
            return Err(PlacementError::Collision { x: tx, y: ty });
        }
    }
    Ok(())
}

/// Check whether `piece` can be placed with its top-left mask corner at (x, y)
pub fn can_place(board: &Board, piece: &Piece, x: i8, y: i8) -> bool {
    check_placement(board, piece, x, y).is_ok()
}

/// Write `piece` at (x, y); ICE blocks start at `ice_health`.
///
/// The input board is untouched; on error nothing is written.
pub fn place_with_ice_health(
    board: &Board,
    piece: &Piece,
    x: i8,
    y: i8,
    ice_health: u8,
) -> Result<Board, PlacementError> {
    check_placement(board, piece, x, y)?;

    let block = Block::new(piece.color, piece.special, ice_health);
    let mut next = board.clone();
    for (col, row) in piece.shape.offsets() {
        next.set(x + col, y + row, Some(block));
    }
    Ok(next)
}

/// Write `piece` at (x, y) with the default ICE health
pub fn place(board: &Board, piece: &Piece, x: i8, y: i8) -> Result<Board, PlacementError> {
    place_with_ice_health(board, piece, x, y, crate::types::ICE_HEALTH)
}

/// Anchors to try for a shape: every position where its bounding box fits
fn anchors(piece: &Piece) -> impl Iterator<Item = (i8, i8)> {
    let max_x = GRID_SIZE.saturating_sub(piece.shape.width()) as i8;
    let max_y = GRID_SIZE.saturating_sub(piece.shape.height()) as i8;
    (0..=max_y).flat_map(move |y| (0..=max_x).map(move |x| (x, y)))
}

/// True if the piece fits somewhere in its current orientation
pub fn fits_anywhere(board: &Board, piece: &Piece) -> bool {
    anchors(piece).any(|(x, y)| can_place(board, piece, x, y))
}

/// True if the piece fits somewhere under any of its four rotations
pub fn fits_any_rotation(board: &Board, piece: &Piece) -> bool {
    piece
        .shape
        .rotations()
        .iter()
        .any(|shape| fits_anywhere(board, &piece.with_shape(*shape)))
}

/// Number of rows and columns that would be full after placing at (x, y).
///
/// Caller guarantees the placement is legal.
pub fn lines_completed_by(board: &Board, piece: &Piece, x: i8, y: i8) -> u32 {
    let mut filled = [[false; N]; N];
    for (row_idx, row) in board.rows().iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            filled[row_idx][col_idx] = cell.is_some();
        }
    }
    for (col, row) in piece.shape.offsets() {
        let (tx, ty) = ((x + col) as usize, (y + row) as usize);
        if tx < N && ty < N {
            filled[ty][tx] = true;
        }
    }

    let rows = filled.iter().filter(|r| r.iter().all(|&f| f)).count();
    let cols = (0..N).filter(|&c| filled.iter().all(|r| r[c])).count();
    (rows + cols) as u32
}

/// Filled in-bounds orthogonal neighbours of the cells the piece would cover
fn adjacent_filled(board: &Board, piece: &Piece, x: i8, y: i8) -> u32 {
    let mut count = 0;
    for (col, row) in piece.shape.offsets() {
        let (px, py) = (x + col, y + row);
        for (dx, dy) in [(0, -1), (0, 1), (-1, 0), (1, 0)] {
            if board.is_occupied(px + dx, py + dy) {
                count += 1;
            }
        }
    }
    count
}

/// Heuristic value of a legal placement:
/// `lines * 100 + adjacent_filled * 10 + (GRID_SIZE - y) * 2`
pub fn placement_value(board: &Board, piece: &Piece, x: i8, y: i8) -> i32 {
    let lines = lines_completed_by(board, piece, x, y) as i32;
    let adjacent = adjacent_filled(board, piece, x, y) as i32;
    lines * 100 + adjacent * 10 + (GRID_SIZE as i32 - y as i32) * 2
}

/// Best anchor for the piece in its current orientation.
///
/// Scans y then x; the first anchor with the strictly highest value wins.
pub fn best_placement(board: &Board, piece: &Piece) -> Option<(i8, i8)> {
    let mut best: Option<((i8, i8), i32)> = None;
    for (x, y) in anchors(piece) {
        if !can_place(board, piece, x, y) {
            continue;
        }
        let value = placement_value(board, piece, x, y);
        if best.map_or(true, |(_, v)| value > v) {
            best = Some(((x, y), value));
        }
    }
    best.map(|(pos, _)| pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::ShapeId;
    use crate::types::{Color, SpecialKind};

    fn piece(shape: ShapeId) -> Piece {
        Piece::new(1, shape, SpecialKind::Normal)
    }

    #[test]
    fn test_place_rejects_out_of_bounds() {
        let board = Board::new();
        let err = place(&board, &piece(ShapeId::H3), 8, 0).unwrap_err();
        assert_eq!(err, PlacementError::OutOfBounds { x: 10, y: 0 });
    }

    #[test]
    fn test_place_rejects_collision_and_leaves_board() {
        let mut board = Board::new();
        board.set(1, 1, Some(Block::normal(Color::Void)));
        let before = board.clone();

        let err = place(&board, &piece(ShapeId::Square), 0, 0).unwrap_err();
        assert_eq!(err, PlacementError::Collision { x: 1, y: 1 });
        assert_eq!(board, before);
    }

    #[test]
    fn test_place_writes_piece_color_and_kind() {
        let ice = Piece::new(1, ShapeId::V2, SpecialKind::Ice);
        let board = place(&Board::new(), &ice, 4, 4).unwrap();

        let block = board.block(4, 5).unwrap();
        assert_eq!(block.color, Color::Electric);
        assert_eq!(block.health(), Some(2));
        assert_eq!(board.filled_count(), 2);
    }

    #[test]
    fn test_place_with_reduced_ice_health() {
        let ice = Piece::new(1, ShapeId::Dot, SpecialKind::Ice);
        let board = place_with_ice_health(&Board::new(), &ice, 0, 0, 1).unwrap();
        assert_eq!(board.block(0, 0).and_then(|b| b.health()), Some(1));
    }

    #[test]
    fn test_fits_any_rotation_finds_vertical_slot() {
        // Only a single free column remains: h4 does not fit, v4 does.
        let mut board = Board::new();
        for y in 0..10 {
            for x in 0..10 {
                if x != 5 {
                    board.set(x, y, Some(Block::normal(Color::Solar)));
                }
            }
        }
        let h4 = piece(ShapeId::H4);
        assert!(!fits_anywhere(&board, &h4));
        assert!(fits_any_rotation(&board, &h4));
    }

    #[test]
    fn test_best_placement_prefers_completing_a_line() {
        let mut board = Board::new();
        for x in 0..9 {
            board.set(x, 9, Some(Block::normal(Color::Solar)));
        }
        assert_eq!(best_placement(&board, &piece(ShapeId::Dot)), Some((9, 9)));
    }

    #[test]
    fn test_best_placement_on_empty_board_takes_first_top_anchor() {
        assert_eq!(
            best_placement(&Board::new(), &piece(ShapeId::Square)),
            Some((0, 0))
        );
    }
}

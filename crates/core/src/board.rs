//! Board module - manages the game grid
//!
//! The board is a 10x10 grid where each cell is either empty or holds a block.
//! Storage is a fixed-size row-major array (`cells[y][x]`), so copies are cheap
//! and nothing on the hot path allocates.
//! Coordinates: (x, y) where x is the column (0..9, left to right) and y is the
//! row (0..9, top to bottom). Gravity pulls toward y = 9.

use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::types::{Block, BlockKind, Cell, GRID_SIZE};

/// Grid side as an index type
pub const N: usize = GRID_SIZE as usize;

/// Indices of full rows or columns found in one scan
pub type LineList = ArrayVec<u8, N>;

/// The game board - 10 x 10 cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Row-major cells, `cells[y][x]`
    cells: [[Cell; N]; N],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [[None; N]; N],
        }
    }

    /// Create a board from a full cell array
    pub fn from_cells(cells: [[Cell; N]; N]) -> Self {
        Self { cells }
    }

    /// Map (x, y) to array indices; None if out of bounds
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<(usize, usize)> {
        if x < 0 || x >= GRID_SIZE as i8 || y < 0 || y >= GRID_SIZE as i8 {
            return None;
        }
        Some((x as usize, y as usize))
    }

    /// Side length of the board
    pub fn size(&self) -> u8 {
        GRID_SIZE
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|(cx, cy)| self.cells[cy][cx])
    }

    /// Get the block at (x, y), if the position is in bounds and filled
    pub fn block(&self, x: i8, y: i8) -> Option<Block> {
        self.get(x, y).flatten()
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some((cx, cy)) => {
                self.cells[cy][cx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is valid for a new block (within bounds and empty)
    pub fn is_valid(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check if position is out of bounds
    pub fn is_out_of_bounds(&self, x: i8, y: i8) -> bool {
        Self::index(x, y).is_none()
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= N {
            return false;
        }
        self.cells[y].iter().all(|cell| cell.is_some())
    }

    /// Check if a column is completely filled
    pub fn is_col_full(&self, x: usize) -> bool {
        if x >= N {
            return false;
        }
        self.cells.iter().all(|row| row[x].is_some())
    }

    /// All full rows, top to bottom
    pub fn full_rows(&self) -> LineList {
        (0..N)
            .filter(|&y| self.is_row_full(y))
            .map(|y| y as u8)
            .collect()
    }

    /// All full columns, left to right
    pub fn full_cols(&self) -> LineList {
        (0..N)
            .filter(|&x| self.is_col_full(x))
            .map(|x| x as u8)
            .collect()
    }

    /// True if every filled cell of row `y` shares one color.
    ///
    /// An empty row is not monochrome.
    pub fn is_row_monochrome(&self, y: usize) -> bool {
        if y >= N {
            return false;
        }
        single_color(self.cells[y].iter().copied())
    }

    /// True if every filled cell of column `x` shares one color
    pub fn is_col_monochrome(&self, x: usize) -> bool {
        if x >= N {
            return false;
        }
        single_color(self.cells.iter().map(|row| row[x]))
    }

    /// Number of filled cells
    pub fn filled_count(&self) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|cell| cell.is_some())
            .count()
    }

    /// Count filled cells matching a predicate
    pub fn count_blocks(&self, pred: impl Fn(&Block) -> bool) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|cell| cell.as_ref().is_some_and(&pred))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.filled_count() == 0
    }

    /// Compact one column toward the bottom, keeping block order.
    ///
    /// Two-pointer scan from the bottom; returns how many blocks moved.
    pub fn compact_column(&mut self, x: usize) -> u32 {
        if x >= N {
            return 0;
        }

        let mut write_y = N;
        let mut moved = 0;

        for read_y in (0..N).rev() {
            if let Some(block) = self.cells[read_y][x] {
                write_y -= 1;
                if write_y != read_y {
                    // Slot at write_y was already vacated by the scan.
                    self.cells[write_y][x] = Some(block);
                    self.cells[read_y][x] = None;
                    moved += 1;
                }
            }
        }

        moved
    }

    /// Compact every column; returns the total number of moved blocks
    pub fn apply_gravity(&mut self) -> u32 {
        (0..N).map(|x| self.compact_column(x)).sum()
    }

    /// True if no column has an empty cell below a filled one
    pub fn is_compacted(&self) -> bool {
        (0..N).all(|x| {
            let mut seen_block = false;
            for y in 0..N {
                match self.cells[y][x] {
                    Some(_) => seen_block = true,
                    None if seen_block => return false,
                    None => {}
                }
            }
            true
        })
    }

    /// Remove the cell at (x, y) and slide everything above it down one row.
    ///
    /// Returns false if out of bounds.
    pub fn remove_and_shift_down(&mut self, x: i8, y: i8) -> bool {
        let Some((cx, cy)) = Self::index(x, y) else {
            return false;
        };

        for row in (1..=cy).rev() {
            self.cells[row][cx] = self.cells[row - 1][cx];
        }
        self.cells[0][cx] = None;

        true
    }

    /// Replace the ICE health at (x, y). No-op for non-ice cells.
    pub(crate) fn set_ice_health(&mut self, x: usize, y: usize, health: u8) {
        if let Some(Block {
            kind: BlockKind::Ice { health: h },
            ..
        }) = &mut self.cells[y][x]
        {
            *h = health;
        }
    }

    /// Direct cell access by array index (caller guarantees bounds)
    #[inline(always)]
    pub(crate) fn at(&self, x: usize, y: usize) -> Cell {
        self.cells[y][x]
    }

    #[inline(always)]
    pub(crate) fn clear_at(&mut self, x: usize, y: usize) {
        self.cells[y][x] = None;
    }

    /// Get a reference to the internal rows
    pub fn rows(&self) -> &[[Cell; N]; N] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells = [[None; N]; N];
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// ASCII rendering, one row per line.
///
/// `.` empty, `#` normal, `B` bomb, ice shows its remaining health (`1`-`9`).
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for cell in row {
                let ch = match cell {
                    None => '.',
                    Some(block) => match block.kind {
                        BlockKind::Normal => '#',
                        BlockKind::Bomb => 'B',
                        BlockKind::Ice { health } => {
                            char::from_digit(health.min(9) as u32, 10).unwrap_or('*')
                        }
                    },
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn single_color(cells: impl Iterator<Item = Cell>) -> bool {
    let mut color = None;
    for block in cells.flatten() {
        match color {
            None => color = Some(block.color),
            Some(c) if c != block.color => return false,
            Some(_) => {}
        }
    }
    color.is_some()
}

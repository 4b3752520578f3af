//! Resolver module - line clears, special blocks and gravity
//!
//! [`resolve`] runs passes until the board is stable. One pass:
//!
//! 1. Detect full rows and full columns.
//! 2. Hit every cell of the union of those lines once. An ICE block with more
//!    than one health left loses one and stays; anything else is marked for
//!    clearing. A cleared BOMB joins a worklist.
//! 3. Each bomb on the worklist hits its 3x3 neighbourhood (clamped to the
//!    grid, its own cell included) with the same rule. A coordinate is
//!    detonated at most once per pass.
//! 4. All marked cells are cleared in one batch, then every column is
//!    compacted toward row 9.
//!
//! A line hit in a pass that cleared none of its cells is not hit again in
//! the same call, so a full line made only of chipped ICE is damaged once per
//! call, not drained to zero, whatever gravity does elsewhere. The loop ends
//! when a pass finds no fresh full line, or when a pass neither cleared a
//! cell nor moved one.
//!
//! Hits accumulate inside a pass: an ICE cell on a cleared line that is also
//! caught in a blast takes two hits.

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::board::{Board, LineList, N};
use crate::types::BlockKind;

/// What one pass did
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Wave {
    pub rows: LineList,
    pub cols: LineList,
    pub color_bonus: bool,
    pub cells_cleared: u32,
    pub bombs_exploded: u32,
    pub ice_damaged: u32,
    pub ice_broken: u32,
    /// Blocks moved by gravity after the clears
    pub cells_dropped: u32,
}

impl Wave {
    pub fn lines(&self) -> u32 {
        (self.rows.len() + self.cols.len()) as u32
    }
}

/// Result of resolving a board
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Resolution {
    pub board: Board,
    /// Rows plus columns over all passes; an intersection counts for both
    pub lines_cleared: u32,
    /// Passes that detected at least one full line
    pub chain_waves: u32,
    /// Some detected line was monochrome
    pub color_bonus: bool,
    /// BOMB blocks cleared
    pub bombs_exploded: u32,
    /// Health decrements applied to ICE blocks
    pub ice_damaged: u32,
    /// ICE blocks cleared
    pub ice_broken: u32,
    pub cells_cleared: u32,
    pub waves: Vec<Wave>,
}

impl Resolution {
    /// Nothing happened
    pub fn is_idle(&self) -> bool {
        self.chain_waves == 0
    }
}

/// Hit bookkeeping for a single pass
struct Pass<'a> {
    board: &'a Board,
    hits: [[u8; N]; N],
    clear: [[bool; N]; N],
    detonated: [[bool; N]; N],
    bombs: ArrayVec<(usize, usize), { N * N }>,
    ice_damaged: u32,
}

impl<'a> Pass<'a> {
    fn new(board: &'a Board) -> Self {
        Self {
            board,
            hits: [[0; N]; N],
            clear: [[false; N]; N],
            detonated: [[false; N]; N],
            bombs: ArrayVec::new(),
            ice_damaged: 0,
        }
    }

    fn hit(&mut self, x: usize, y: usize) {
        if self.clear[y][x] {
            return;
        }
        let Some(block) = self.board.at(x, y) else {
            return;
        };

        if let BlockKind::Ice { health } = block.kind {
            let remaining = health.saturating_sub(self.hits[y][x]);
            if remaining > 1 {
                self.hits[y][x] += 1;
                self.ice_damaged += 1;
                trace!(x, y, remaining = remaining - 1, "ice chipped");
                return;
            }
        }

        self.clear[y][x] = true;
        if block.is_bomb() && !self.detonated[y][x] {
            self.detonated[y][x] = true;
            self.bombs.push((x, y));
        }
    }

    fn detonate_all(&mut self) {
        while let Some((bx, by)) = self.bombs.pop() {
            trace!(x = bx, y = by, "bomb detonated");
            for ny in by.saturating_sub(1)..=(by + 1).min(N - 1) {
                for nx in bx.saturating_sub(1)..=(bx + 1).min(N - 1) {
                    self.hit(nx, ny);
                }
            }
        }
    }
}

/// Resolve a board to a stable state.
///
/// A board with no full line comes back unchanged with zero counters.
pub fn resolve(board: &Board) -> Resolution {
    let mut out = Resolution {
        board: board.clone(),
        ..Resolution::default()
    };

    // Lines already hit in a pass that cleared none of their cells
    let mut spent_rows = [false; N];
    let mut spent_cols = [false; N];

    loop {
        let mut rows = out.board.full_rows();
        let mut cols = out.board.full_cols();
        rows.retain(|y| !spent_rows[*y as usize]);
        cols.retain(|x| !spent_cols[*x as usize]);
        if rows.is_empty() && cols.is_empty() {
            break;
        }

        let color_bonus = rows.iter().any(|&y| out.board.is_row_monochrome(y as usize))
            || cols.iter().any(|&x| out.board.is_col_monochrome(x as usize));

        let (clear, hits, ice_damaged) = {
            let mut pass = Pass::new(&out.board);
            for y in 0..N {
                for x in 0..N {
                    if rows.contains(&(y as u8)) || cols.contains(&(x as u8)) {
                        pass.hit(x, y);
                    }
                }
            }
            pass.detonate_all();
            (pass.clear, pass.hits, pass.ice_damaged)
        };

        for &y in &rows {
            spent_rows[y as usize] = !clear[y as usize].iter().any(|&c| c);
        }
        for &x in &cols {
            spent_cols[x as usize] = !clear.iter().any(|row| row[x as usize]);
        }

        let mut wave = Wave {
            color_bonus,
            ice_damaged,
            ..Wave::default()
        };

        for y in 0..N {
            for x in 0..N {
                let Some(block) = out.board.at(x, y) else {
                    continue;
                };
                if clear[y][x] {
                    match block.kind {
                        BlockKind::Bomb => wave.bombs_exploded += 1,
                        BlockKind::Ice { .. } => wave.ice_broken += 1,
                        BlockKind::Normal => {}
                    }
                    wave.cells_cleared += 1;
                    out.board.clear_at(x, y);
                } else if let BlockKind::Ice { health } = block.kind {
                    if hits[y][x] > 0 {
                        out.board.set_ice_health(x, y, health - hits[y][x]);
                    }
                }
            }
        }

        wave.cells_dropped = out.board.apply_gravity();
        wave.rows = rows;
        wave.cols = cols;

        debug!(
            wave = out.chain_waves + 1,
            rows = wave.rows.len(),
            cols = wave.cols.len(),
            cleared = wave.cells_cleared,
            bombs = wave.bombs_exploded,
            ice_damaged = wave.ice_damaged,
            dropped = wave.cells_dropped,
            "resolve pass"
        );

        out.chain_waves += 1;
        out.lines_cleared += wave.lines();
        out.color_bonus |= wave.color_bonus;
        out.bombs_exploded += wave.bombs_exploded;
        out.ice_damaged += wave.ice_damaged;
        out.ice_broken += wave.ice_broken;
        out.cells_cleared += wave.cells_cleared;

        let settled = wave.cells_cleared == 0 && wave.cells_dropped == 0;
        out.waves.push(wave);
        if settled {
            break;
        }
    }

    out
}

//! Pieces module - the shape catalog and tray pieces
//!
//! The catalog holds 15 fixed polyomino shapes, each with a base color.
//! A shape is stored as a small boolean mask (at most 4x4) so rotation and
//! placement checks stay on the stack.
//!
//! Catalog (rows top to bottom, `#` = filled):
//!
//! | Id | Mask | Color |
//! |----|------|-------|
//! | dot | `#` | solar |
//! | h2 / v2 | `##` / vertical | electric |
//! | h3 / v3 | `###` / vertical | plasma |
//! | h4 / v4 | `####` / vertical | toxic |
//! | square | `##,##` | solar |
//! | l_shape | `#.,#.,##` | laser |
//! | j_shape | `.#,.#,##` | laser |
//! | t_shape | `###,.#.` | void |
//! | cross | `.#.,###,.#.` | plasma |
//! | z_shape | `##.,.##` | toxic |
//! | s_shape | `.##,##.` | electric |
//! | corner | `##,#.` | void |

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::types::{Color, SpecialKind};

/// Largest side of any catalog shape, before or after rotation
pub const MAX_SHAPE_DIM: usize = 4;

/// Filled-cell offsets of a shape, as (col, row)
pub type Offsets = ArrayVec<(i8, i8), { MAX_SHAPE_DIM * MAX_SHAPE_DIM }>;

/// Catalog identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeId {
    Dot,
    H2,
    V2,
    H3,
    V3,
    H4,
    V4,
    Square,
    LShape,
    JShape,
    TShape,
    Cross,
    ZShape,
    SShape,
    Corner,
}

impl ShapeId {
    pub const ALL: [ShapeId; 15] = [
        ShapeId::Dot,
        ShapeId::H2,
        ShapeId::V2,
        ShapeId::H3,
        ShapeId::V3,
        ShapeId::H4,
        ShapeId::V4,
        ShapeId::Square,
        ShapeId::LShape,
        ShapeId::JShape,
        ShapeId::TShape,
        ShapeId::Cross,
        ShapeId::ZShape,
        ShapeId::SShape,
        ShapeId::Corner,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        ShapeId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeId::Dot => "dot",
            ShapeId::H2 => "h2",
            ShapeId::V2 => "v2",
            ShapeId::H3 => "h3",
            ShapeId::V3 => "v3",
            ShapeId::H4 => "h4",
            ShapeId::V4 => "v4",
            ShapeId::Square => "square",
            ShapeId::LShape => "l_shape",
            ShapeId::JShape => "j_shape",
            ShapeId::TShape => "t_shape",
            ShapeId::Cross => "cross",
            ShapeId::ZShape => "z_shape",
            ShapeId::SShape => "s_shape",
            ShapeId::Corner => "corner",
        }
    }

    /// Mask rows of the catalog entry (1 = filled)
    fn rows(&self) -> &'static [&'static [u8]] {
        match self {
            ShapeId::Dot => &[&[1]],
            ShapeId::H2 => &[&[1, 1]],
            ShapeId::V2 => &[&[1], &[1]],
            ShapeId::H3 => &[&[1, 1, 1]],
            ShapeId::V3 => &[&[1], &[1], &[1]],
            ShapeId::H4 => &[&[1, 1, 1, 1]],
            ShapeId::V4 => &[&[1], &[1], &[1], &[1]],
            ShapeId::Square => &[&[1, 1], &[1, 1]],
            ShapeId::LShape => &[&[1, 0], &[1, 0], &[1, 1]],
            ShapeId::JShape => &[&[0, 1], &[0, 1], &[1, 1]],
            ShapeId::TShape => &[&[1, 1, 1], &[0, 1, 0]],
            ShapeId::Cross => &[&[0, 1, 0], &[1, 1, 1], &[0, 1, 0]],
            ShapeId::ZShape => &[&[1, 1, 0], &[0, 1, 1]],
            ShapeId::SShape => &[&[0, 1, 1], &[1, 1, 0]],
            ShapeId::Corner => &[&[1, 1], &[1, 0]],
        }
    }

    /// Base color of the catalog entry
    pub fn color(&self) -> Color {
        match self {
            ShapeId::Dot | ShapeId::Square => Color::Solar,
            ShapeId::H2 | ShapeId::V2 | ShapeId::SShape => Color::Electric,
            ShapeId::H3 | ShapeId::V3 | ShapeId::Cross => Color::Plasma,
            ShapeId::H4 | ShapeId::V4 | ShapeId::ZShape => Color::Toxic,
            ShapeId::LShape | ShapeId::JShape => Color::Laser,
            ShapeId::TShape | ShapeId::Corner => Color::Void,
        }
    }

    /// Unrotated shape of the catalog entry
    pub fn shape(&self) -> Shape {
        Shape::from_rows(self.rows())
    }
}

/// A rectangular occupancy mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    width: u8,
    height: u8,
    /// `mask[row][col]`; cells outside width/height are always false
    mask: [[bool; MAX_SHAPE_DIM]; MAX_SHAPE_DIM],
}

impl Shape {
    /// Build a shape from 0/1 rows. Rows longer than 4 or beyond the fourth
    /// row are truncated.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        let mut mask = [[false; MAX_SHAPE_DIM]; MAX_SHAPE_DIM];
        let height = rows.len().min(MAX_SHAPE_DIM);
        let mut width = 0;

        for (r, row) in rows.iter().take(height).enumerate() {
            let len = row.len().min(MAX_SHAPE_DIM);
            width = width.max(len);
            for (c, &v) in row.iter().take(len).enumerate() {
                mask[r][c] = v != 0;
            }
        }

        Self {
            width: width as u8,
            height: height as u8,
            mask,
        }
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Whether the mask cell at (col, row) is filled
    pub fn is_filled(&self, col: usize, row: usize) -> bool {
        col < MAX_SHAPE_DIM && row < MAX_SHAPE_DIM && self.mask[row][col]
    }

    /// Filled cells as (col, row) offsets, row-major order
    pub fn offsets(&self) -> Offsets {
        let mut out = Offsets::new();
        for row in 0..self.height as usize {
            for col in 0..self.width as usize {
                if self.mask[row][col] {
                    out.push((col as i8, row as i8));
                }
            }
        }
        out
    }

    /// Number of filled cells
    pub fn cell_count(&self) -> u32 {
        self.mask.iter().flatten().filter(|&&filled| filled).count() as u32
    }

    /// Rotate 90 degrees clockwise: `rotated[c][h - 1 - r] = mask[r][c]`.
    ///
    /// Width and height swap.
    pub fn rotate_cw(&self) -> Self {
        let h = self.height as usize;
        let w = self.width as usize;
        let mut mask = [[false; MAX_SHAPE_DIM]; MAX_SHAPE_DIM];

        for r in 0..h {
            for c in 0..w {
                mask[c][h - 1 - r] = self.mask[r][c];
            }
        }

        Self {
            width: self.height,
            height: self.width,
            mask,
        }
    }

    /// The four rotations, starting with this one
    pub fn rotations(&self) -> [Shape; 4] {
        let r1 = self.rotate_cw();
        let r2 = r1.rotate_cw();
        let r3 = r2.rotate_cw();
        [*self, r1, r2, r3]
    }
}

/// A tray piece: a catalog shape (possibly rotated), its color and special type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    /// Unique per generated piece within a session
    pub id: u32,
    pub shape_id: ShapeId,
    pub shape: Shape,
    pub color: Color,
    pub special: SpecialKind,
}

impl Piece {
    /// Fresh catalog piece with its base color
    pub fn new(id: u32, shape_id: ShapeId, special: SpecialKind) -> Self {
        Self {
            id,
            shape_id,
            shape: shape_id.shape(),
            color: shape_id.color(),
            special,
        }
    }

    pub fn cell_count(&self) -> u32 {
        self.shape.cell_count()
    }

    /// Same piece rotated 90 degrees clockwise
    pub fn rotated_cw(&self) -> Self {
        Self {
            shape: self.shape.rotate_cw(),
            ..*self
        }
    }

    /// Same piece with a different mask (rotation search)
    pub fn with_shape(&self, shape: Shape) -> Self {
        Self { shape, ..*self }
    }
}

//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data (serde-serializable, no behavior beyond parsing and
//! small accessors), so they can be used by the rules engine, a host UI, or a
//! save file alike.
//!
//! # Grid
//!
//! The playfield is a square grid:
//!
//! - **Side**: 10 cells (indexed 0-9 on both axes)
//! - **Origin**: (0, 0) is the top-left cell; gravity pulls toward row 9
//!
//! # Scoring Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BLOCK_POINTS` | 15 | Points per placed block |
//! | `LINE_POINTS` | 150 | Points per cleared row or column |
//! | `COMBO_POINTS` | 75 | Points per combo level |
//! | `COLOR_BONUS_MULTIPLIER` | 1.5 | A cleared line was a single color |
//! | `SURGE_MULTIPLIER` | 2.0 | Surge consumed by a clearing placement |
//!
//! # Flux Economy
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `FLUX_MAX` | 100 | Meter cap; reaching it arms the surge |
//! | `FLUX_PER_BLOCK` | 2 | Flux per placed block |
//! | `FLUX_PER_LINE` | 10 | Flux per cleared line |
//! | `STARTING_FLUX` | 50 | Flux at game/level start |
//!
//! # Examples
//!
//! ```
//! use flux_grid_types::{Block, Color, SpecialKind, GRID_SIZE, ICE_HEALTH};
//!
//! let ice = Block::new(Color::Electric, SpecialKind::Ice, ICE_HEALTH);
//! assert_eq!(ice.special(), SpecialKind::Ice);
//! assert_eq!(ice.health(), Some(2));
//!
//! assert_eq!(Color::from_str("plasma"), Some(Color::Plasma));
//! assert_eq!(GRID_SIZE, 10);
//! ```

use serde::{Deserialize, Serialize};

/// Grid side length in cells (10 x 10)
pub const GRID_SIZE: u8 = 10;

/// Number of pieces offered in the tray at once
pub const TRAY_SIZE: usize = 3;

/// Hits an ICE block absorbs before it can be cleared
pub const ICE_HEALTH: u8 = 2;

/// Points per placed block
pub const BLOCK_POINTS: u32 = 15;

/// Points per cleared row or column
pub const LINE_POINTS: u32 = 150;

/// Points per combo level
pub const COMBO_POINTS: u32 = 75;

/// Score multiplier when a cleared line was monochrome
pub const COLOR_BONUS_MULTIPLIER: f64 = 1.5;

/// Score multiplier when a clearing placement consumes the surge
pub const SURGE_MULTIPLIER: f64 = 2.0;

/// Flux meter cap
pub const FLUX_MAX: u8 = 100;

/// Flux gained per placed block
pub const FLUX_PER_BLOCK: u32 = 2;

/// Flux gained per cleared line
pub const FLUX_PER_LINE: u32 = 10;

/// Flux at game and level start
pub const STARTING_FLUX: u8 = 50;

/// Special roll above this value yields a BOMB piece (8%)
pub const BOMB_THRESHOLD: f64 = 0.92;

/// Special roll above this value (and not a bomb) yields an ICE piece (7%)
pub const ICE_THRESHOLD: f64 = 0.85;

/// Flux cost of rerolling the tray
pub const REROLL_COST: u8 = 20;

/// Flux cost of shattering a single block
pub const SHATTER_COST: u8 = 40;

/// Flux cost of the 3x3 bomb skill
pub const BOMB_COST: u8 = 75;

/// Flat points for a shatter
pub const SHATTER_POINTS: u32 = 5;

/// Points per block destroyed by the bomb skill
pub const BOMB_BLOCK_POINTS: u32 = 5;

/// Placements during which no ICE pieces are generated after Freeze
pub const FREEZE_MOVES: u32 = 5;

/// Undo frames kept
pub const HISTORY_LIMIT: usize = 10;

/// Passive slots
pub const MAX_EQUIPPED_PASSIVES: usize = 3;

/// Flux Boost passive multiplier
pub const FLUX_BOOST_MULTIPLIER: f64 = 1.25;

/// Score Multiplier passive multiplier
pub const SCORE_BOOST_MULTIPLIER: f64 = 1.5;


/// The six block colors of the palette
///
/// Each shape in the catalog has a base color; the color bonus compares
/// these values, never the rendered tint of special blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    /// Neon yellow
    Solar,
    /// Cyan
    Electric,
    /// Fuchsia
    Plasma,
    /// Emerald
    Toxic,
    /// Rose red
    Laser,
    /// Violet
    Void,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::Solar,
        Color::Electric,
        Color::Plasma,
        Color::Toxic,
        Color::Laser,
        Color::Void,
    ];

    /// Parse color from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "solar" => Some(Color::Solar),
            "electric" => Some(Color::Electric),
            "plasma" => Some(Color::Plasma),
            "toxic" => Some(Color::Toxic),
            "laser" => Some(Color::Laser),
            "void" => Some(Color::Void),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Solar => "solar",
            Color::Electric => "electric",
            Color::Plasma => "plasma",
            Color::Toxic => "toxic",
            Color::Laser => "laser",
            Color::Void => "void",
        }
    }

    /// Hex RGB for hosts that render the grid
    pub fn hex(&self) -> &'static str {
        match self {
            Color::Solar => "#facc15",
            Color::Electric => "#06b6d4",
            Color::Plasma => "#e879f9",
            Color::Toxic => "#34d399",
            Color::Laser => "#f43f5e",
            Color::Void => "#8b5cf6",
        }
    }
}

/// Special type carried by a piece and by every block it places
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialKind {
    #[default]
    Normal,
    /// Absorbs hits before clearing
    Ice,
    /// Hits its 3x3 neighbourhood when cleared
    Bomb,
}

impl SpecialKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Some(SpecialKind::Normal),
            "ice" => Some(SpecialKind::Ice),
            "bomb" => Some(SpecialKind::Bomb),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialKind::Normal => "normal",
            SpecialKind::Ice => "ice",
            SpecialKind::Bomb => "bomb",
        }
    }
}

/// Behavior of a filled cell.
///
/// Health only exists on the `Ice` variant, so an empty or non-ice cell can
/// never carry a stale health value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockKind {
    Normal,
    Ice { health: u8 },
    Bomb,
}

/// A filled cell: its color plus its special behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    pub color: Color,
    pub kind: BlockKind,
}

impl Block {
    /// Build a block for a piece of the given special type.
    ///
    /// `ice_health` is ignored for non-ice blocks and clamped to at least 1.
    pub fn new(color: Color, special: SpecialKind, ice_health: u8) -> Self {
        let kind = match special {
            SpecialKind::Normal => BlockKind::Normal,
            SpecialKind::Ice => BlockKind::Ice {
                health: ice_health.max(1),
            },
            SpecialKind::Bomb => BlockKind::Bomb,
        };
        Self { color, kind }
    }

    pub fn normal(color: Color) -> Self {
        Self {
            color,
            kind: BlockKind::Normal,
        }
    }

    pub fn special(&self) -> SpecialKind {
        match self.kind {
            BlockKind::Normal => SpecialKind::Normal,
            BlockKind::Ice { .. } => SpecialKind::Ice,
            BlockKind::Bomb => SpecialKind::Bomb,
        }
    }

    pub fn health(&self) -> Option<u8> {
        match self.kind {
            BlockKind::Ice { health } => Some(health),
            BlockKind::Normal | BlockKind::Bomb => None,
        }
    }

    pub fn is_bomb(&self) -> bool {
        matches!(self.kind, BlockKind::Bomb)
    }

    pub fn is_ice(&self) -> bool {
        matches!(self.kind, BlockKind::Ice { .. })
    }
}

/// A cell on the grid
///
/// - `None`: Empty cell
/// - `Some(Block)`: Filled cell
pub type Cell = Option<Block>;

/// Goal types a career level can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    /// Reach a total score
    Score,
    /// Clear ICE blocks
    BreakIce,
    /// Detonate bomb blocks
    UseBomb,
    /// Clear rows/columns
    ClearLines,
    /// Accumulate chain waves
    ChainReaction,
}

impl ObjectiveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectiveKind::Score => "score",
            ObjectiveKind::BreakIce => "break_ice",
            ObjectiveKind::UseBomb => "use_bomb",
            ObjectiveKind::ClearLines => "clear_lines",
            ObjectiveKind::ChainReaction => "chain_reaction",
        }
    }
}

/// Flux-costed active abilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    /// Replace the whole tray
    Reroll,
    /// Remove a single block
    Shatter,
    /// Destroy a 3x3 area
    Bomb,
    /// Rotate a tray piece 90° clockwise
    Rotate,
    /// Exchange two tray slots
    Swap,
    /// Stop ICE pieces from spawning for a few placements
    Freeze,
    /// Place a tray piece at the best spot automatically
    Magnet,
    /// Revert the last turn
    Undo,
}

impl Skill {
    pub const ALL: [Skill; 8] = [
        Skill::Reroll,
        Skill::Shatter,
        Skill::Bomb,
        Skill::Rotate,
        Skill::Swap,
        Skill::Freeze,
        Skill::Magnet,
        Skill::Undo,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "reroll" => Some(Skill::Reroll),
            "shatter" => Some(Skill::Shatter),
            "bomb" => Some(Skill::Bomb),
            "rotate" => Some(Skill::Rotate),
            "swap" => Some(Skill::Swap),
            "freeze" => Some(Skill::Freeze),
            "magnet" => Some(Skill::Magnet),
            "undo" => Some(Skill::Undo),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Skill::Reroll => "reroll",
            Skill::Shatter => "shatter",
            Skill::Bomb => "bomb",
            Skill::Rotate => "rotate",
            Skill::Swap => "swap",
            Skill::Freeze => "freeze",
            Skill::Magnet => "magnet",
            Skill::Undo => "undo",
        }
    }
}

/// Equippable passive modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Passive {
    /// Multiplies flux gained from placements
    FluxBoost,
    /// Multiplies placement score
    ScoreMultiplier,
    /// Newly placed ICE starts one hit weaker
    IceBreaker,
}

impl Passive {
    pub const ALL: [Passive; 3] = [Passive::FluxBoost, Passive::ScoreMultiplier, Passive::IceBreaker];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "flux_boost" => Some(Passive::FluxBoost),
            "score_multiplier" => Some(Passive::ScoreMultiplier),
            "ice_breaker" => Some(Passive::IceBreaker),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Passive::FluxBoost => "flux_boost",
            Passive::ScoreMultiplier => "score_multiplier",
            Passive::IceBreaker => "ice_breaker",
        }
    }
}

/// How a session ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Level table with objectives and a move limit
    #[default]
    Career,
    /// No objectives, no move limit; ends when nothing fits
    Endless,
}

impl GameMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "career" => Some(GameMode::Career),
            "endless" => Some(GameMode::Endless),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Career => "career",
            GameMode::Endless => "endless",
        }
    }
}

/// Core-side event emitted after a placement is committed.
///
/// Hosts map this to animations and sounds; it is not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TurnEvent {
    pub blocks_placed: u32,
    pub lines_cleared: u32,
    pub chain_waves: u32,
    pub bombs_exploded: u32,
    pub ice_broken: u32,
    pub points: u32,
    pub combo: u32,
    pub color_bonus: bool,
    pub surge_consumed: bool,
    pub surge_activated: bool,
    pub level_complete: bool,
    pub game_over: bool,
    /// Achievement unlocked by this turn, if any
    pub achievement: Option<AchievementId>,
}

/// Fixed achievement table entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    /// Reach 10,000 points in one game
    Score10k,
    /// Chain five clearing placements
    Combo5,
    /// Detonate 10 bomb blocks
    Demolitionist,
    /// Break 25 ICE blocks
    Icebreaker,
    /// Clear 100 lines
    LineLegend,
}

impl AchievementId {
    pub const ALL: [AchievementId; 5] = [
        AchievementId::Score10k,
        AchievementId::Combo5,
        AchievementId::Demolitionist,
        AchievementId::Icebreaker,
        AchievementId::LineLegend,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementId::Score10k => "score_10k",
            AchievementId::Combo5 => "combo_5",
            AchievementId::Demolitionist => "demolitionist",
            AchievementId::Icebreaker => "icebreaker",
            AchievementId::LineLegend => "line_legend",
        }
    }
}

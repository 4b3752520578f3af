//! Rules module - tunable game parameters
//!
//! Every constant the rules engine consults lives here, with defaults taken
//! from `flux_grid_types`. All fields are `#[serde(default)]`, so a rules file
//! only needs to name what it overrides:
//!
//! ```
//! use flux_grid_core::Rules;
//!
//! let rules: Rules = serde_json::from_str(r#"{ "line_points": 200 }"#).unwrap();
//! assert_eq!(rules.line_points, 200);
//! assert_eq!(rules.block_points, 15);
//! assert!(rules.validate().is_ok());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{
    Skill, BLOCK_POINTS, BOMB_BLOCK_POINTS, BOMB_COST, BOMB_THRESHOLD, COLOR_BONUS_MULTIPLIER,
    COMBO_POINTS, FLUX_BOOST_MULTIPLIER, FLUX_PER_BLOCK, FLUX_PER_LINE, FREEZE_MOVES,
    HISTORY_LIMIT, ICE_HEALTH, ICE_THRESHOLD, LINE_POINTS, REROLL_COST, SCORE_BOOST_MULTIPLIER,
    SHATTER_COST, SHATTER_POINTS, STARTING_FLUX, SURGE_MULTIPLIER, TRAY_SIZE,
};

/// Flux price of each skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillCosts {
    pub reroll: u8,
    pub shatter: u8,
    pub bomb: u8,
    pub rotate: u8,
    pub swap: u8,
    pub freeze: u8,
    pub magnet: u8,
    pub undo: u8,
}

impl Default for SkillCosts {
    fn default() -> Self {
        Self {
            reroll: REROLL_COST,
            shatter: SHATTER_COST,
            bomb: BOMB_COST,
            rotate: 10,
            swap: 5,
            freeze: 30,
            magnet: 35,
            undo: 15,
        }
    }
}

impl SkillCosts {
    pub fn get(&self, skill: Skill) -> u8 {
        match skill {
            Skill::Reroll => self.reroll,
            Skill::Shatter => self.shatter,
            Skill::Bomb => self.bomb,
            Skill::Rotate => self.rotate,
            Skill::Swap => self.swap,
            Skill::Freeze => self.freeze,
            Skill::Magnet => self.magnet,
            Skill::Undo => self.undo,
        }
    }
}

/// Game tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub block_points: u32,
    pub line_points: u32,
    pub combo_points: u32,
    pub color_bonus_multiplier: f64,
    pub surge_multiplier: f64,

    pub flux_per_block: u32,
    pub flux_per_line: u32,
    pub starting_flux: u8,

    /// Special roll above this yields a BOMB piece
    pub bomb_threshold: f64,
    /// Special roll above this (and not a bomb) yields an ICE piece
    pub ice_threshold: f64,
    pub ice_health: u8,

    pub costs: SkillCosts,
    pub shatter_points: u32,
    pub bomb_block_points: u32,

    pub tray_size: usize,
    pub history_limit: usize,
    pub freeze_moves: u32,

    pub flux_boost_multiplier: f64,
    pub score_boost_multiplier: f64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            block_points: BLOCK_POINTS,
            line_points: LINE_POINTS,
            combo_points: COMBO_POINTS,
            color_bonus_multiplier: COLOR_BONUS_MULTIPLIER,
            surge_multiplier: SURGE_MULTIPLIER,
            flux_per_block: FLUX_PER_BLOCK,
            flux_per_line: FLUX_PER_LINE,
            starting_flux: STARTING_FLUX,
            bomb_threshold: BOMB_THRESHOLD,
            ice_threshold: ICE_THRESHOLD,
            ice_health: ICE_HEALTH,
            costs: SkillCosts::default(),
            shatter_points: SHATTER_POINTS,
            bomb_block_points: BOMB_BLOCK_POINTS,
            tray_size: TRAY_SIZE,
            history_limit: HISTORY_LIMIT,
            freeze_moves: FREEZE_MOVES,
            flux_boost_multiplier: FLUX_BOOST_MULTIPLIER,
            score_boost_multiplier: SCORE_BOOST_MULTIPLIER,
        }
    }
}

impl Rules {
    /// Flux price of a skill
    pub fn cost(&self, skill: Skill) -> u8 {
        self.costs.get(skill)
    }

    /// Reject tunings the engine cannot honor
    pub fn validate(&self) -> Result<(), RulesError> {
        let probability = |name: &'static str, v: f64| {
            if v.is_finite() && (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(RulesError::Probability { field: name, value: v })
            }
        };
        probability("bomb_threshold", self.bomb_threshold)?;
        probability("ice_threshold", self.ice_threshold)?;
        if self.ice_threshold > self.bomb_threshold {
            return Err(RulesError::ThresholdOrder {
                ice: self.ice_threshold,
                bomb: self.bomb_threshold,
            });
        }

        for (name, v) in [
            ("color_bonus_multiplier", self.color_bonus_multiplier),
            ("surge_multiplier", self.surge_multiplier),
            ("flux_boost_multiplier", self.flux_boost_multiplier),
            ("score_boost_multiplier", self.score_boost_multiplier),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(RulesError::Multiplier { field: name, value: v });
            }
        }

        if self.tray_size == 0 || self.tray_size > TRAY_SIZE {
            return Err(RulesError::TraySize(self.tray_size));
        }
        if self.ice_health == 0 {
            return Err(RulesError::IceHealth);
        }
        if self.starting_flux > crate::types::FLUX_MAX {
            return Err(RulesError::StartingFlux(self.starting_flux));
        }
        Ok(())
    }
}

/// Invalid rules
#[derive(Debug, Clone, PartialEq)]
pub enum RulesError {
    Probability { field: &'static str, value: f64 },
    ThresholdOrder { ice: f64, bomb: f64 },
    Multiplier { field: &'static str, value: f64 },
    TraySize(usize),
    IceHealth,
    StartingFlux(u8),
}

impl RulesError {
    pub fn code(&self) -> &'static str {
        match self {
            RulesError::Probability { .. } => "bad_probability",
            RulesError::ThresholdOrder { .. } => "bad_threshold_order",
            RulesError::Multiplier { .. } => "bad_multiplier",
            RulesError::TraySize(_) => "bad_tray_size",
            RulesError::IceHealth => "bad_ice_health",
            RulesError::StartingFlux(_) => "bad_starting_flux",
        }
    }
}

impl fmt::Display for RulesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RulesError::Probability { field, value } => {
                write!(f, "{} must be within [0, 1], got {}", field, value)
            }
            RulesError::ThresholdOrder { ice, bomb } => write!(
                f,
                "ice_threshold ({}) must not exceed bomb_threshold ({})",
                ice, bomb
            ),
            RulesError::Multiplier { field, value } => {
                write!(f, "{} must be a finite non-negative number, got {}", field, value)
            }
            RulesError::TraySize(n) => write!(f, "tray_size must be 1..={}, got {}", TRAY_SIZE, n),
            RulesError::IceHealth => write!(f, "ice_health must be at least 1"),
            RulesError::StartingFlux(v) => write!(f, "starting_flux must be at most 100, got {}", v),
        }
    }
}

impl std::error::Error for RulesError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let rules = Rules::default();
        assert_eq!(rules.cost(Skill::Reroll), 20);
        assert_eq!(rules.cost(Skill::Shatter), 40);
        assert_eq!(rules.cost(Skill::Bomb), 75);
        assert_eq!(rules.starting_flux, 50);
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let rules: Rules =
            serde_json::from_str(r#"{ "costs": { "bomb": 60 }, "ice_health": 3 }"#).unwrap();
        assert_eq!(rules.cost(Skill::Bomb), 60);
        assert_eq!(rules.cost(Skill::Shatter), 40);
        assert_eq!(rules.ice_health, 3);
        assert_eq!(rules.line_points, 150);
    }

    #[test]
    fn test_validate_rejects_inverted_thresholds() {
        let rules = Rules {
            ice_threshold: 0.95,
            ..Rules::default()
        };
        let err = rules.validate().unwrap_err();
        assert_eq!(err.code(), "bad_threshold_order");
    }

    #[test]
    fn test_validate_rejects_oversized_tray() {
        let rules = Rules {
            tray_size: 4,
            ..Rules::default()
        };
        assert_eq!(rules.validate(), Err(RulesError::TraySize(4)));
    }
}

//! Scoring module - placement points, skill points and the flux meter
//!
//! Placement score:
//!
//! ```text
//! round((blocks * 15 + lines * 150 + combo * 75)
//!       * 1.5 if a cleared line was monochrome
//!       * 2.0 if the surge is consumed
//!       * passive multiplier)
//! ```
//!
//! Both the color bonus and the surge only apply when the placement cleared
//! at least one line. The combo level is the prior combo plus one on a
//! clearing placement and resets to zero otherwise.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::rules::Rules;
use crate::types::FLUX_MAX;

/// Combo after a placement
pub fn combo_level(prior_combo: u32, lines_cleared: u32) -> u32 {
    if lines_cleared > 0 {
        prior_combo.saturating_add(1)
    } else {
        0
    }
}

/// Combo after a skill resolution: skills extend a chain but never break it
pub fn skill_combo_level(prior_combo: u32, lines_cleared: u32) -> u32 {
    if lines_cleared > 0 {
        prior_combo.saturating_add(1)
    } else {
        prior_combo
    }
}

/// Inputs of a placement score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInput {
    pub blocks_placed: u32,
    pub lines_cleared: u32,
    pub combo_level: u32,
    pub color_bonus: bool,
    pub surge_active: bool,
    /// Product of equipped score passives (1.0 when none)
    pub passive_multiplier: f64,
}

impl Default for ScoreInput {
    fn default() -> Self {
        Self {
            blocks_placed: 0,
            lines_cleared: 0,
            combo_level: 0,
            color_bonus: false,
            surge_active: false,
            passive_multiplier: 1.0,
        }
    }
}

/// Score calculation result
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Points before multipliers
    pub base: u32,
    pub multiplier: f64,
    pub total: u32,
    pub color_bonus_applied: bool,
    pub surge_applied: bool,
}

/// Full placement score
pub fn calculate_score(input: &ScoreInput, rules: &Rules) -> ScoreResult {
    let base = input
        .blocks_placed
        .saturating_mul(rules.block_points)
        .saturating_add(input.lines_cleared.saturating_mul(rules.line_points))
        .saturating_add(input.combo_level.saturating_mul(rules.combo_points));

    let cleared = input.lines_cleared > 0;
    let color_bonus_applied = input.color_bonus && cleared;
    let surge_applied = input.surge_active && cleared;

    let mut multiplier = input.passive_multiplier;
    if color_bonus_applied {
        multiplier *= rules.color_bonus_multiplier;
    }
    if surge_applied {
        multiplier *= rules.surge_multiplier;
    }

    ScoreResult {
        base,
        multiplier,
        total: (base as f64 * multiplier).round() as u32,
        color_bonus_applied,
        surge_applied,
    }
}

/// Placement points without passives
pub fn compute_score_delta(
    blocks_placed: u32,
    lines_cleared: u32,
    combo_level: u32,
    color_bonus: bool,
    surge_active: bool,
    rules: &Rules,
) -> u32 {
    let input = ScoreInput {
        blocks_placed,
        lines_cleared,
        combo_level,
        color_bonus,
        surge_active,
        ..ScoreInput::default()
    };
    calculate_score(&input, rules).total
}

fn chain_points(lines_cleared: u32, combo: u32, rules: &Rules) -> u32 {
    lines_cleared
        .saturating_mul(rules.line_points)
        .saturating_mul(combo.max(1))
}

/// Shatter: flat points plus any lines the collapse completed
pub fn shatter_score(lines_cleared: u32, combo: u32, rules: &Rules) -> u32 {
    rules
        .shatter_points
        .saturating_add(chain_points(lines_cleared, combo, rules))
}

/// Bomb skill: points per destroyed block plus any lines completed afterwards
pub fn bomb_skill_score(destroyed: u32, lines_cleared: u32, combo: u32, rules: &Rules) -> u32 {
    destroyed
        .saturating_mul(rules.bomb_block_points)
        .saturating_add(chain_points(lines_cleared, combo, rules))
}

/// Flux earned by a placement, before the cap
pub fn flux_gain(blocks_placed: u32, lines_cleared: u32, boost: f64, rules: &Rules) -> u32 {
    let raw = blocks_placed
        .saturating_mul(rules.flux_per_block)
        .saturating_add(lines_cleared.saturating_mul(rules.flux_per_line));
    (raw as f64 * boost).round() as u32
}

/// What a placement did to the meter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FluxOutcome {
    /// Flux actually added (0 when the surge was consumed)
    pub gained: u8,
    pub surge_activated: bool,
    pub surge_consumed: bool,
}

/// Flux meter (0..=100) with the one-shot surge flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FluxMeter {
    level: u8,
    surge: bool,
}

impl FluxMeter {
    pub fn new(level: u8) -> Self {
        Self {
            level: level.min(FLUX_MAX),
            surge: false,
        }
    }

    /// Restore a saved meter
    pub fn from_parts(level: u8, surge: bool) -> Self {
        Self {
            level: level.min(FLUX_MAX),
            surge,
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn surge_active(&self) -> bool {
        self.surge
    }

    /// Apply a placement's gain.
    ///
    /// A clearing placement with the surge armed consumes it and empties the
    /// meter. Otherwise the gain is added up to the cap, and filling the meter
    /// from below arms the surge.
    pub fn apply_placement(
        &mut self,
        blocks_placed: u32,
        lines_cleared: u32,
        boost: f64,
        rules: &Rules,
    ) -> FluxOutcome {
        if self.surge && lines_cleared > 0 {
            self.level = 0;
            self.surge = false;
            return FluxOutcome {
                surge_consumed: true,
                ..FluxOutcome::default()
            };
        }

        let before = self.level;
        let gain = flux_gain(blocks_placed, lines_cleared, boost, rules);
        self.level = (before as u32).saturating_add(gain).min(FLUX_MAX as u32) as u8;

        let surge_activated = !self.surge && before < FLUX_MAX && self.level == FLUX_MAX;
        if surge_activated {
            self.surge = true;
            info!("flux surge armed");
        }

        FluxOutcome {
            gained: self.level - before,
            surge_activated,
            surge_consumed: false,
        }
    }

    /// Deduct a skill cost; false (and no change) if flux is insufficient
    pub fn spend(&mut self, cost: u8) -> bool {
        if self.level < cost {
            return false;
        }
        self.level -= cost;
        true
    }

    /// Deduct up to `amount`, stopping at zero
    pub fn drain(&mut self, amount: u8) {
        self.level = self.level.saturating_sub(amount);
    }

    pub fn can_afford(&self, cost: u8) -> bool {
        self.level >= cost
    }
}

impl Default for FluxMeter {
    fn default() -> Self {
        Self::new(crate::types::STARTING_FLUX)
    }
}

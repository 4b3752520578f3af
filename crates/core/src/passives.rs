//! Equipped passive modifiers

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::rules::Rules;
use crate::types::{Passive, MAX_EQUIPPED_PASSIVES};

/// Up to three equipped passives, no duplicates
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Loadout {
    equipped: ArrayVec<Passive, MAX_EQUIPPED_PASSIVES>,
}

impl Loadout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Equip a passive; false if already equipped or all slots are taken
    pub fn equip(&mut self, passive: Passive) -> bool {
        if self.is_equipped(passive) {
            return false;
        }
        self.equipped.try_push(passive).is_ok()
    }

    pub fn unequip(&mut self, passive: Passive) -> bool {
        match self.equipped.iter().position(|&p| p == passive) {
            Some(i) => {
                self.equipped.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn is_equipped(&self, passive: Passive) -> bool {
        self.equipped.contains(&passive)
    }

    pub fn equipped(&self) -> &[Passive] {
        &self.equipped
    }

    pub fn flux_multiplier(&self, rules: &Rules) -> f64 {
        if self.is_equipped(Passive::FluxBoost) {
            rules.flux_boost_multiplier
        } else {
            1.0
        }
    }

    pub fn score_multiplier(&self, rules: &Rules) -> f64 {
        if self.is_equipped(Passive::ScoreMultiplier) {
            rules.score_boost_multiplier
        } else {
            1.0
        }
    }

    /// Starting health of newly placed ICE
    pub fn ice_health(&self, rules: &Rules) -> u8 {
        if self.is_equipped(Passive::IceBreaker) {
            rules.ice_health.saturating_sub(1).max(1)
        } else {
            rules.ice_health
        }
    }
}

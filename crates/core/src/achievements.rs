//! Lifetime statistics and achievements
//!
//! Stats accumulate across games in a session. Achievements read them (or a
//! per-game maximum) and unlock once; the first newly unlocked id is reported
//! in the turn event.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::{AchievementId, Skill};

/// Lifetime counters
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameStats {
    pub games_played: u32,
    pub blocks_placed: u32,
    pub lines_cleared: u32,
    pub total_score: u64,
    pub bombs_exploded: u32,
    pub ice_broken: u32,
    pub highest_combo: u32,
    pub best_score: u32,
    pub skill_uses: BTreeMap<Skill, u32>,
}

impl GameStats {
    pub fn record_skill(&mut self, skill: Skill) {
        *self.skill_uses.entry(skill).or_insert(0) += 1;
    }

    pub fn skill_uses(&self, skill: Skill) -> u32 {
        self.skill_uses.get(&skill).copied().unwrap_or(0)
    }
}

/// Target per achievement
pub fn target(id: AchievementId) -> u32 {
    match id {
        AchievementId::Score10k => 10_000,
        AchievementId::Combo5 => 5,
        AchievementId::Demolitionist => 10,
        AchievementId::Icebreaker => 25,
        AchievementId::LineLegend => 100,
    }
}

/// Value an achievement is measured against
fn metric(id: AchievementId, stats: &GameStats) -> u32 {
    match id {
        AchievementId::Score10k => stats.best_score,
        AchievementId::Combo5 => stats.highest_combo,
        AchievementId::Demolitionist => stats.bombs_exploded,
        AchievementId::Icebreaker => stats.ice_broken,
        AchievementId::LineLegend => stats.lines_cleared,
    }
}

/// One achievement's progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub progress: u32,
    pub unlocked: bool,
}

/// Fresh table, one entry per id
pub fn achievement_table() -> Vec<Achievement> {
    AchievementId::ALL
        .iter()
        .map(|&id| Achievement {
            id,
            progress: 0,
            unlocked: false,
        })
        .collect()
}

/// Refresh progress from stats; returns the first id unlocked by this call
pub fn update_achievements(
    achievements: &mut [Achievement],
    stats: &GameStats,
) -> Option<AchievementId> {
    let mut first = None;
    for ach in achievements.iter_mut() {
        if ach.unlocked {
            continue;
        }
        let goal = target(ach.id);
        ach.progress = metric(ach.id, stats).min(goal);
        if ach.progress >= goal {
            ach.unlocked = true;
            info!(achievement = ach.id.as_str(), "achievement unlocked");
            first.get_or_insert(ach.id);
        }
    }
    first
}

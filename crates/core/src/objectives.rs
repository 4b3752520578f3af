//! Objectives module - career goals and the level table
//!
//! Each career level lists one or more objectives and a move budget. Progress
//! is clamped at the target; a level is complete once every objective is.

use serde::{Deserialize, Serialize};

use crate::types::ObjectiveKind;

/// One goal with its progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    pub kind: ObjectiveKind,
    pub target: u32,
    pub current: u32,
}

impl Objective {
    pub fn new(kind: ObjectiveKind, target: u32) -> Self {
        Self {
            kind,
            target,
            current: 0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.target
    }
}

/// Progress produced by one resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObjectiveDelta {
    /// Session score after the action (Score objectives track the total)
    pub total_score: u32,
    pub lines_cleared: u32,
    pub chain_waves: u32,
    pub ice_broken: u32,
    pub bombs_exploded: u32,
}

/// Apply a delta to every objective, clamping at target
pub fn update_objectives(objectives: &mut [Objective], delta: &ObjectiveDelta) {
    for obj in objectives.iter_mut() {
        let next = match obj.kind {
            ObjectiveKind::Score => delta.total_score,
            ObjectiveKind::ClearLines => obj.current.saturating_add(delta.lines_cleared),
            ObjectiveKind::ChainReaction => obj.current.saturating_add(delta.chain_waves),
            ObjectiveKind::BreakIce => obj.current.saturating_add(delta.ice_broken),
            ObjectiveKind::UseBomb => obj.current.saturating_add(delta.bombs_exploded),
        };
        obj.current = next.min(obj.target);
    }
}

/// True when there is at least one objective and all are complete
pub fn objectives_complete(objectives: &[Objective]) -> bool {
    !objectives.is_empty() && objectives.iter().all(Objective::is_complete)
}

/// A career level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelDef {
    pub name: &'static str,
    pub moves: u32,
    pub objectives: &'static [(ObjectiveKind, u32)],
}

impl LevelDef {
    /// Fresh objective list for this level
    pub fn objectives(&self) -> Vec<Objective> {
        self.objectives
            .iter()
            .map(|&(kind, target)| Objective::new(kind, target))
            .collect()
    }
}

/// Built-in career levels
pub static LEVELS: &[LevelDef] = &[
    LevelDef {
        name: "Boot Sequence",
        moves: 20,
        objectives: &[(ObjectiveKind::Score, 500)],
    },
    LevelDef {
        name: "Line Runner",
        moves: 25,
        objectives: &[(ObjectiveKind::ClearLines, 5)],
    },
    LevelDef {
        name: "Cold Start",
        moves: 30,
        objectives: &[(ObjectiveKind::BreakIce, 3), (ObjectiveKind::Score, 1500)],
    },
    LevelDef {
        name: "Demolition",
        moves: 30,
        objectives: &[(ObjectiveKind::UseBomb, 2), (ObjectiveKind::ClearLines, 8)],
    },
    LevelDef {
        name: "Cascade",
        moves: 35,
        objectives: &[
            (ObjectiveKind::ChainReaction, 6),
            (ObjectiveKind::Score, 4000),
        ],
    },
];

/// Level definition by index
pub fn level(index: usize) -> Option<&'static LevelDef> {
    LEVELS.get(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_objective_tracks_total_not_sum() {
        let mut objs = vec![Objective::new(ObjectiveKind::Score, 1000)];
        let delta = ObjectiveDelta {
            total_score: 300,
            ..ObjectiveDelta::default()
        };
        update_objectives(&mut objs, &delta);
        update_objectives(&mut objs, &delta);
        assert_eq!(objs[0].current, 300);
    }

    #[test]
    fn test_progress_is_clamped_at_target() {
        let mut objs = vec![
            Objective::new(ObjectiveKind::ClearLines, 5),
            Objective::new(ObjectiveKind::ChainReaction, 2),
        ];
        let delta = ObjectiveDelta {
            lines_cleared: 4,
            chain_waves: 3,
            ..ObjectiveDelta::default()
        };
        update_objectives(&mut objs, &delta);
        update_objectives(&mut objs, &delta);

        assert_eq!(objs[0].current, 5);
        assert_eq!(objs[1].current, 2);
        assert!(objectives_complete(&objs));
    }

    #[test]
    fn test_empty_objective_list_is_never_complete() {
        assert!(!objectives_complete(&[]));
    }

    #[test]
    fn test_level_table_is_well_formed() {
        assert!(!LEVELS.is_empty());
        for def in LEVELS {
            assert!(def.moves > 0, "{}", def.name);
            assert!(!def.objectives.is_empty(), "{}", def.name);
            assert!(def.objectives.iter().all(|&(_, t)| t > 0), "{}", def.name);
        }
        assert!(level(LEVELS.len()).is_none());
    }
}

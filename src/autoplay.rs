//! Headless autoplay runner.
//!
//! Plays a seeded session with the best-placement heuristic: each turn the
//! tray piece/anchor pair with the highest placement value is committed.
//! When no piece fits as-is, the runner optionally spends flux on Rotate or
//! Reroll before giving up.

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::placement::{best_placement, fits_any_rotation, placement_value};
use crate::core::{GameState, Rules};
use crate::engine::{apply_place, apply_skill, SkillCommand};
use crate::types::{AchievementId, GameMode, Passive, Skill};

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub seed: u32,
    pub mode: GameMode,
    pub level: usize,
    pub max_turns: u32,
    /// JSON file with `Rules` overrides
    pub rules_path: Option<PathBuf>,
    /// Where to write the final snapshot as JSON
    pub save_path: Option<PathBuf>,
    pub passives: Vec<Passive>,
    /// Spend flux on Rotate/Reroll when nothing fits
    pub use_skills: bool,
    /// 0 = warn, 1 = info, 2 = debug, 3+ = trace
    pub verbosity: u8,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            mode: GameMode::Career,
            level: 0,
            max_turns: 500,
            rules_path: None,
            save_path: None,
            passives: Vec::new(),
            use_skills: true,
            verbosity: 0,
        }
    }
}

fn non_empty(var: &str) -> Option<String> {
    env::var(var)
        .ok()
        .map(|s| s.trim().to_string())
        .and_then(|s| if s.is_empty() { None } else { Some(s) })
}

/// Map a level name (`warn`, `info`, ...) to a verbosity count
fn verbosity_from_level(s: &str) -> Option<u8> {
    match s.to_lowercase().as_str() {
        "error" | "warn" => Some(0),
        "info" => Some(1),
        "debug" => Some(2),
        "trace" => Some(3),
        _ => None,
    }
}

impl RunConfig {
    /// Defaults overridden by `FLUX_GRID_*` environment variables.
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let seed = non_empty("FLUX_GRID_SEED")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.seed);
        let mode = non_empty("FLUX_GRID_MODE")
            .and_then(|s| GameMode::from_str(&s))
            .unwrap_or(defaults.mode);
        let level = non_empty("FLUX_GRID_LEVEL")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.level);
        let max_turns = non_empty("FLUX_GRID_MAX_TURNS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_turns);
        let verbosity = non_empty("FLUX_GRID_LOG")
            .and_then(|s| verbosity_from_level(&s))
            .unwrap_or(defaults.verbosity);

        Self {
            seed,
            mode,
            level,
            max_turns,
            rules_path: non_empty("FLUX_GRID_RULES").map(PathBuf::from),
            save_path: non_empty("FLUX_GRID_SAVE").map(PathBuf::from),
            verbosity,
            ..defaults
        }
    }

    /// Apply command-line flags on top of this config
    pub fn apply_args(mut self, args: &[String]) -> Result<Self> {
        let mut i = 0usize;
        while i < args.len() {
            let flag = args[i].as_str();
            let mut value = || {
                i += 1;
                args.get(i)
                    .ok_or_else(|| anyhow!("missing value for {}", flag))
            };
            match flag {
                "--seed" => {
                    let v = value()?;
                    self.seed = v
                        .parse()
                        .map_err(|_| anyhow!("invalid --seed value: {}", v))?;
                }
                "--mode" => {
                    let v = value()?;
                    self.mode = GameMode::from_str(v)
                        .ok_or_else(|| anyhow!("invalid --mode value: {}", v))?;
                }
                "--level" => {
                    let v = value()?;
                    self.level = v
                        .parse()
                        .map_err(|_| anyhow!("invalid --level value: {}", v))?;
                }
                "--max-turns" => {
                    let v = value()?;
                    self.max_turns = v
                        .parse()
                        .map_err(|_| anyhow!("invalid --max-turns value: {}", v))?;
                }
                "--rules" => self.rules_path = Some(PathBuf::from(value()?)),
                "--save" => self.save_path = Some(PathBuf::from(value()?)),
                "--passive" => {
                    let v = value()?;
                    let passive = Passive::from_str(v)
                        .ok_or_else(|| anyhow!("invalid --passive value: {}", v))?;
                    self.passives.push(passive);
                }
                "--no-skills" => self.use_skills = false,
                "-v" | "--verbose" => self.verbosity = self.verbosity.saturating_add(1),
                "-vv" => self.verbosity = self.verbosity.saturating_add(2),
                other => return Err(anyhow!("unknown argument: {}", other)),
            }
            i += 1;
        }
        Ok(self)
    }
}

/// Load and validate a rules file; defaults when no path is given
pub fn load_rules(path: Option<&PathBuf>) -> Result<Rules> {
    let Some(path) = path else {
        return Ok(Rules::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading rules file {}", path.display()))?;
    let rules: Rules = serde_json::from_str(&text)
        .with_context(|| format!("parsing rules file {}", path.display()))?;
    rules.validate()?;
    Ok(rules)
}

/// Final report printed by the binary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub seed: u32,
    pub mode: GameMode,
    pub level: usize,
    pub levels_completed: u32,
    pub turns: u32,
    pub score: u32,
    pub high_score: u32,
    pub lines_cleared: u32,
    pub chain_waves: u32,
    pub bombs_exploded: u32,
    pub ice_broken: u32,
    pub best_combo: u32,
    pub skills_used: u32,
    pub achievements: Vec<AchievementId>,
    pub game_over: bool,
}

/// Best (tray index, x, y) over the current orientations
pub fn choose_move(state: &GameState) -> Option<(usize, i8, i8)> {
    let mut best: Option<((usize, i8, i8), i32)> = None;
    for (index, piece) in state.tray().iter().enumerate() {
        let Some((x, y)) = best_placement(state.board(), piece) else {
            continue;
        };
        let value = placement_value(state.board(), piece, x, y);
        if best.map_or(true, |(_, v)| value > v) {
            best = Some(((index, x, y), value));
        }
    }
    best.map(|(mv, _)| mv)
}

/// Try to make some tray piece fit by spending flux. Returns true if a skill was used.
fn unstick(state: &mut GameState) -> bool {
    for index in 0..state.tray().len() {
        let fits_rotated = state
            .tray()
            .get(index)
            .is_some_and(|piece| fits_any_rotation(state.board(), piece));
        if fits_rotated
            && state.can_afford(Skill::Rotate)
            && apply_skill(state, SkillCommand::Rotate { index }).is_ok()
        {
            debug!(index, "rotated stuck piece");
            return true;
        }
    }
    if apply_skill(state, SkillCommand::Reroll).is_ok() {
        debug!("rerolled stuck tray");
        return true;
    }
    false
}

/// Play one session to completion or `max_turns`
pub fn run(config: &RunConfig) -> Result<(RunSummary, GameState)> {
    let rules = load_rules(config.rules_path.as_ref())?;
    let mut state = GameState::with_rules(config.seed, config.mode, rules)?;
    for &passive in &config.passives {
        if !state.equip_passive(passive) {
            warn!(passive = passive.as_str(), "passive not equipped");
        }
    }
    if config.level > 0 && !state.start_level(config.level) {
        return Err(anyhow!("level {} is not available in {} mode", config.level, config.mode.as_str()));
    }

    let mut summary = RunSummary {
        seed: config.seed,
        mode: config.mode,
        level: state.level_index(),
        levels_completed: 0,
        turns: 0,
        score: 0,
        high_score: 0,
        lines_cleared: 0,
        chain_waves: 0,
        bombs_exploded: 0,
        ice_broken: 0,
        best_combo: 0,
        skills_used: 0,
        achievements: Vec::new(),
        game_over: false,
    };

    // Rotations and rerolls without a placement in between; bounds flux churn.
    let mut skill_streak = 0u32;

    while summary.turns < config.max_turns {
        if state.level_complete() {
            summary.levels_completed += 1;
            if !state.next_level() {
                break;
            }
            info!(level = state.level_index(), "advancing to next level");
            continue;
        }
        if state.game_over() {
            break;
        }

        let Some((index, x, y)) = choose_move(&state) else {
            if config.use_skills && skill_streak < 8 && unstick(&mut state) {
                summary.skills_used += 1;
                skill_streak += 1;
                continue;
            }
            info!(turn = summary.turns, "no piece fits as-is; stopping");
            break;
        };
        skill_streak = 0;

        let event = apply_place(&mut state, index, x, y)?;
        summary.turns += 1;
        summary.lines_cleared += event.lines_cleared;
        summary.chain_waves += event.chain_waves;
        summary.bombs_exploded += event.bombs_exploded;
        summary.ice_broken += event.ice_broken;
        summary.best_combo = summary.best_combo.max(event.combo);
        if let Some(id) = event.achievement {
            summary.achievements.push(id);
        }
    }

    summary.level = state.level_index();
    summary.score = state.score();
    summary.high_score = state.high_score();
    summary.game_over = state.game_over();

    if let Some(path) = &config.save_path {
        let json = serde_json::to_string_pretty(&state.snapshot())?;
        fs::write(path, json).with_context(|| format!("writing snapshot {}", path.display()))?;
        info!(path = %path.display(), "snapshot saved");
    }

    Ok((summary, state))
}

//! Game state module - one play session
//!
//! [`GameState`] owns the board, the tray, the economy and the career
//! progress. Every action runs a complete resolve-and-score cycle before it
//! returns, so the state is always settled between calls.
//!
//! Methods here check their own preconditions and return `None`/`false`
//! without touching the state when one fails. The engine crate wraps them
//! with typed errors.

use std::collections::VecDeque;

use tracing::{debug, info};

use crate::achievements::{achievement_table, update_achievements, Achievement, GameStats};
use crate::board::{Board, N};
use crate::objectives::{self, objectives_complete, update_objectives, LevelDef, Objective, ObjectiveDelta};
use crate::passives::Loadout;
use crate::pieces::Piece;
use crate::placement::{best_placement, fits_any_rotation, place_with_ice_health};
use crate::resolver::{resolve, Resolution};
use crate::rng::PieceGenerator;
use crate::rules::{Rules, RulesError};
use crate::snapshot::{GameSnapshot, SnapshotError, SCHEMA_VERSION};
use crate::scoring::{
    bomb_skill_score, calculate_score, combo_level, shatter_score, skill_combo_level, FluxMeter,
    ScoreInput,
};
use crate::tray::Tray;
use crate::types::{AchievementId, GameMode, Passive, Skill, TurnEvent};

/// Result of a board-changing skill (Shatter, Bomb)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SkillReport {
    /// Blocks removed directly by the skill
    pub blocks_destroyed: u32,
    pub lines_cleared: u32,
    pub chain_waves: u32,
    pub bombs_exploded: u32,
    pub ice_broken: u32,
    pub points: u32,
    pub combo: u32,
    pub level_complete: bool,
    pub game_over: bool,
    pub achievement: Option<AchievementId>,
}

/// Undo frame: everything a turn can change except lifetime stats and the RNG
#[derive(Debug, Clone)]
struct UndoFrame {
    board: Board,
    tray: Tray,
    score: u32,
    flux: FluxMeter,
    combo: u32,
    moves_left: Option<u32>,
    objectives: Vec<Objective>,
    level_complete: bool,
    game_over: bool,
    freeze_moves: u32,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    rules: Rules,
    mode: GameMode,
    level_index: usize,
    max_level_reached: usize,
    board: Board,
    tray: Tray,
    generator: PieceGenerator,
    score: u32,
    high_score: u32,
    flux: FluxMeter,
    combo: u32,
    /// Career move budget; None in endless mode
    moves_left: Option<u32>,
    objectives: Vec<Objective>,
    level_complete: bool,
    game_over: bool,
    /// Placements left during which ICE pieces are not generated
    freeze_moves: u32,
    loadout: Loadout,
    stats: GameStats,
    achievements: Vec<Achievement>,
    history: VecDeque<UndoFrame>,
    /// Last committed placement (consumed by observers)
    last_event: Option<TurnEvent>,
}

impl GameState {
    /// New session with default rules, starting at the first level (career)
    /// or an empty endless board
    pub fn new(seed: u32, mode: GameMode) -> Self {
        Self::build(seed, mode, Rules::default())
    }

    /// New session with custom rules; rejects rules that fail
    /// [`Rules::validate`]
    pub fn with_rules(seed: u32, mode: GameMode, rules: Rules) -> Result<Self, RulesError> {
        rules.validate()?;
        Ok(Self::build(seed, mode, rules))
    }

    fn build(seed: u32, mode: GameMode, rules: Rules) -> Self {
        let mut state = Self {
            flux: FluxMeter::new(rules.starting_flux),
            rules,
            mode,
            level_index: 0,
            max_level_reached: 0,
            board: Board::new(),
            tray: Tray::new(),
            generator: PieceGenerator::new(seed),
            score: 0,
            high_score: 0,
            combo: 0,
            moves_left: None,
            objectives: Vec::new(),
            level_complete: false,
            game_over: false,
            freeze_moves: 0,
            loadout: Loadout::new(),
            stats: GameStats::default(),
            achievements: achievement_table(),
            history: VecDeque::new(),
            last_event: None,
        };
        state.begin(0);
        state
    }

    /// Reset per-game state and deal a fresh tray
    fn begin(&mut self, level_index: usize) {
        self.level_index = level_index;
        self.board.clear();
        self.score = 0;
        self.flux = FluxMeter::new(self.rules.starting_flux);
        self.combo = 0;
        self.level_complete = false;
        self.game_over = false;
        self.freeze_moves = 0;
        self.history.clear();
        self.last_event = None;

        match (self.mode, objectives::level(level_index)) {
            (GameMode::Career, Some(def)) => {
                self.moves_left = Some(def.moves);
                self.objectives = def.objectives();
                self.max_level_reached = self.max_level_reached.max(level_index);
            }
            _ => {
                self.moves_left = None;
                self.objectives.clear();
            }
        }

        self.stats.games_played += 1;
        self.refill_tray();
        self.refresh_status();

        info!(
            mode = self.mode.as_str(),
            level = self.level_index,
            "game started"
        );
    }

    /// Restart the current level (or endless game)
    pub fn restart(&mut self) {
        self.begin(self.level_index);
    }

    /// Jump to a career level; false in endless mode or for an unknown level.
    ///
    /// Gating on [`max_level_reached`](Self::max_level_reached) is up to the host.
    pub fn start_level(&mut self, index: usize) -> bool {
        if self.mode != GameMode::Career || objectives::level(index).is_none() {
            return false;
        }
        self.begin(index);
        true
    }

    /// Advance after a completed level; false if not complete or on the last level
    pub fn next_level(&mut self) -> bool {
        let next = self.level_index + 1;
        if !self.level_complete || objectives::level(next).is_none() {
            return false;
        }
        self.begin(next);
        true
    }

    // ----- accessors -----

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    /// Current career level definition
    pub fn level_def(&self) -> Option<&'static LevelDef> {
        match self.mode {
            GameMode::Career => objectives::level(self.level_index),
            GameMode::Endless => None,
        }
    }

    pub fn max_level_reached(&self) -> usize {
        self.max_level_reached
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable board access for tests and tooling
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn tray(&self) -> &Tray {
        &self.tray
    }

    /// Replace the tray (scripted scenarios); re-runs the fit check
    pub fn set_tray(&mut self, pieces: impl IntoIterator<Item = Piece>) {
        self.tray.refill(pieces);
        self.refresh_status();
    }

    pub fn generator(&self) -> &PieceGenerator {
        &self.generator
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn flux(&self) -> &FluxMeter {
        &self.flux
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn moves_left(&self) -> Option<u32> {
        self.moves_left
    }

    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    pub fn level_complete(&self) -> bool {
        self.level_complete
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// Actions are accepted only while the game is neither over nor won
    pub fn playable(&self) -> bool {
        !self.game_over && !self.level_complete
    }

    pub fn freeze_moves(&self) -> u32 {
        self.freeze_moves
    }

    pub fn loadout(&self) -> &Loadout {
        &self.loadout
    }

    pub fn equip_passive(&mut self, passive: Passive) -> bool {
        self.loadout.equip(passive)
    }

    pub fn unequip_passive(&mut self, passive: Passive) -> bool {
        self.loadout.unequip(passive)
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn can_afford(&self, skill: Skill) -> bool {
        self.flux.can_afford(self.rules.cost(skill))
    }

    /// Take and clear the last placement event.
    pub fn take_last_event(&mut self) -> Option<TurnEvent> {
        self.last_event.take()
    }

    pub fn last_event(&self) -> Option<&TurnEvent> {
        self.last_event.as_ref()
    }

    // ----- persistence -----

    /// Serializable copy of the session (undo history is not included)
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            schema_version: SCHEMA_VERSION,
            mode: self.mode,
            level_index: self.level_index,
            max_level_reached: self.max_level_reached,
            board: self.board.clone(),
            tray: self.tray.clone(),
            rng_state: self.generator.rng_state(),
            next_piece_id: self.generator.next_id(),
            score: self.score,
            high_score: self.high_score,
            flux: self.flux.level(),
            surge: self.flux.surge_active(),
            combo: self.combo,
            moves_left: self.moves_left,
            objectives: self.objectives.clone(),
            level_complete: self.level_complete,
            game_over: self.game_over,
            freeze_moves: self.freeze_moves,
            loadout: self.loadout.clone(),
            stats: self.stats.clone(),
            achievements: self.achievements.clone(),
        }
    }

    /// Rebuild a session from a snapshot
    pub fn restore(snapshot: GameSnapshot, rules: Rules) -> Result<Self, SnapshotError> {
        if snapshot.schema_version != SCHEMA_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.schema_version,
                expected: SCHEMA_VERSION,
            });
        }
        rules.validate()?;
        if snapshot.mode == GameMode::Career && objectives::level(snapshot.level_index).is_none() {
            return Err(SnapshotError::UnknownLevel(snapshot.level_index));
        }

        Ok(Self {
            rules,
            mode: snapshot.mode,
            level_index: snapshot.level_index,
            max_level_reached: snapshot.max_level_reached,
            board: snapshot.board,
            tray: snapshot.tray,
            generator: PieceGenerator::from_state(snapshot.rng_state, snapshot.next_piece_id),
            score: snapshot.score,
            high_score: snapshot.high_score,
            flux: FluxMeter::from_parts(snapshot.flux, snapshot.surge),
            combo: snapshot.combo,
            moves_left: snapshot.moves_left,
            objectives: snapshot.objectives,
            level_complete: snapshot.level_complete,
            game_over: snapshot.game_over,
            freeze_moves: snapshot.freeze_moves,
            loadout: snapshot.loadout,
            stats: snapshot.stats,
            achievements: snapshot.achievements,
            history: VecDeque::new(),
            last_event: None,
        })
    }

    // ----- turn flow -----

    /// Place tray piece `tray_index` at (x, y), resolve and score.
    ///
    /// Returns None (state untouched) if the game is not playable, the slot
    /// is empty or the placement is illegal.
    pub fn commit_placement(&mut self, tray_index: usize, x: i8, y: i8) -> Option<TurnEvent> {
        if !self.playable() {
            return None;
        }
        let piece = *self.tray.get(tray_index)?;
        let ice_health = self.loadout.ice_health(&self.rules);
        let placed = place_with_ice_health(&self.board, &piece, x, y, ice_health).ok()?;

        self.push_history();
        Some(self.play(tray_index, piece, placed, x, y))
    }

    /// Finish a validated placement; the undo frame is already pushed
    fn play(&mut self, tray_index: usize, piece: Piece, placed: Board, x: i8, y: i8) -> TurnEvent {
        self.tray.take(tray_index);
        let res = self.settle(resolve(&placed));

        let blocks = piece.cell_count();
        let combo = combo_level(self.combo, res.lines_cleared);
        let score = calculate_score(
            &ScoreInput {
                blocks_placed: blocks,
                lines_cleared: res.lines_cleared,
                combo_level: combo,
                color_bonus: res.color_bonus,
                surge_active: self.flux.surge_active(),
                passive_multiplier: self.loadout.score_multiplier(&self.rules),
            },
            &self.rules,
        );
        let flux = self.flux.apply_placement(
            blocks,
            res.lines_cleared,
            self.loadout.flux_multiplier(&self.rules),
            &self.rules,
        );

        self.combo = combo;
        self.add_score(score.total);
        if let Some(moves) = self.moves_left.as_mut() {
            *moves = moves.saturating_sub(1);
        }
        self.freeze_moves = self.freeze_moves.saturating_sub(1);
        self.stats.blocks_placed += blocks;
        self.track_resolution(&res);

        if self.tray.is_empty() {
            self.refill_tray();
        }
        self.refresh_status();
        let achievement = update_achievements(&mut self.achievements, &self.stats);

        let event = TurnEvent {
            blocks_placed: blocks,
            lines_cleared: res.lines_cleared,
            chain_waves: res.chain_waves,
            bombs_exploded: res.bombs_exploded,
            ice_broken: res.ice_broken,
            points: score.total,
            combo,
            color_bonus: score.color_bonus_applied,
            surge_consumed: flux.surge_consumed,
            surge_activated: flux.surge_activated,
            level_complete: self.level_complete,
            game_over: self.game_over,
            achievement,
        };

        debug!(
            piece = piece.shape_id.as_str(),
            x,
            y,
            lines = event.lines_cleared,
            waves = event.chain_waves,
            points = event.points,
            combo = event.combo,
            flux = self.flux.level(),
            "placement committed"
        );

        self.last_event = Some(event);
        event
    }

    // ----- skills -----

    /// Spend a skill's cost; false if unaffordable
    fn pay(&mut self, skill: Skill) -> bool {
        if !self.flux.spend(self.rules.cost(skill)) {
            return false;
        }
        self.stats.record_skill(skill);
        true
    }

    /// Replace the tray with fresh pieces
    pub fn reroll(&mut self) -> bool {
        if !self.playable() || !self.can_afford(Skill::Reroll) {
            return false;
        }
        self.push_history();
        self.pay(Skill::Reroll);
        self.refill_tray();
        self.refresh_status();
        true
    }

    /// Remove the block at (x, y), drop its column by one and resolve
    pub fn shatter(&mut self, x: i8, y: i8) -> Option<SkillReport> {
        if !self.playable() || !self.board.is_occupied(x, y) || !self.can_afford(Skill::Shatter) {
            return None;
        }
        self.push_history();
        self.pay(Skill::Shatter);

        let mut board = self.board.clone();
        board.remove_and_shift_down(x, y);
        let res = self.settle(resolve(&board));

        let combo = skill_combo_level(self.combo, res.lines_cleared);
        let points = shatter_score(res.lines_cleared, combo, &self.rules);
        Some(self.finish_skill(1, &res, combo, points))
    }

    /// Destroy the clamped 3x3 area around (x, y), compact those columns and
    /// resolve. None if the area holds no block.
    pub fn bomb(&mut self, x: i8, y: i8) -> Option<SkillReport> {
        if !self.playable() || self.board.is_out_of_bounds(x, y) {
            return None;
        }
        let area = blast_area(x, y);
        let destroyed = area
            .clone()
            .filter(|&(bx, by)| self.board.is_occupied(bx, by))
            .count() as u32;
        if destroyed == 0 || !self.can_afford(Skill::Bomb) {
            return None;
        }
        self.push_history();
        self.pay(Skill::Bomb);

        let mut board = self.board.clone();
        for (bx, by) in area {
            board.set(bx, by, None);
        }
        let cx = x as usize;
        for col in cx.saturating_sub(1)..=(cx + 1).min(N - 1) {
            board.compact_column(col);
        }
        let res = self.settle(resolve(&board));

        let combo = skill_combo_level(self.combo, res.lines_cleared);
        let points = bomb_skill_score(destroyed, res.lines_cleared, combo, &self.rules);
        Some(self.finish_skill(destroyed, &res, combo, points))
    }

    /// Rotate tray piece `index` 90 degrees clockwise
    pub fn rotate_piece(&mut self, index: usize) -> bool {
        if !self.playable() || !self.can_afford(Skill::Rotate) {
            return false;
        }
        let Some(rotated) = self.tray.get(index).map(Piece::rotated_cw) else {
            return false;
        };
        self.push_history();
        self.pay(Skill::Rotate);
        self.tray.replace(index, rotated);
        self.refresh_status();
        true
    }

    /// Exchange two distinct tray slots
    pub fn swap_pieces(&mut self, a: usize, b: usize) -> bool {
        if !self.playable()
            || a == b
            || a >= self.tray.len()
            || b >= self.tray.len()
            || !self.can_afford(Skill::Swap)
        {
            return false;
        }
        self.push_history();
        self.pay(Skill::Swap);
        self.tray.swap(a, b);
        true
    }

    /// Stop ICE pieces from spawning for the next placements
    pub fn freeze(&mut self) -> bool {
        if !self.playable() || !self.can_afford(Skill::Freeze) {
            return false;
        }
        self.push_history();
        self.pay(Skill::Freeze);
        self.freeze_moves = self.rules.freeze_moves;
        true
    }

    /// Auto-place tray piece `index` at its best anchor
    pub fn magnet(&mut self, index: usize) -> Option<TurnEvent> {
        if !self.playable() || !self.can_afford(Skill::Magnet) {
            return None;
        }
        let piece = *self.tray.get(index)?;
        let (x, y) = best_placement(&self.board, &piece)?;
        let ice_health = self.loadout.ice_health(&self.rules);
        let placed = place_with_ice_health(&self.board, &piece, x, y, ice_health).ok()?;

        self.push_history();
        self.pay(Skill::Magnet);
        Some(self.play(index, piece, placed, x, y))
    }

    /// Revert to the state before the last action
    pub fn undo(&mut self) -> bool {
        let cost = self.rules.cost(Skill::Undo);
        if self.history.is_empty() || !self.flux.can_afford(cost) {
            return false;
        }
        let Some(frame) = self.history.pop_back() else {
            return false;
        };
        self.board = frame.board;
        self.tray = frame.tray;
        self.score = frame.score;
        self.flux = frame.flux;
        self.combo = frame.combo;
        self.moves_left = frame.moves_left;
        self.objectives = frame.objectives;
        self.level_complete = frame.level_complete;
        self.game_over = frame.game_over;
        self.freeze_moves = frame.freeze_moves;
        self.last_event = None;

        self.flux.drain(cost);
        self.stats.record_skill(Skill::Undo);
        debug!(remaining = self.history.len(), "undo");
        true
    }

    // ----- internals -----

    fn push_history(&mut self) {
        if self.rules.history_limit == 0 {
            return;
        }
        while self.history.len() >= self.rules.history_limit {
            self.history.pop_front();
        }
        self.history.push_back(UndoFrame {
            board: self.board.clone(),
            tray: self.tray.clone(),
            score: self.score,
            flux: self.flux,
            combo: self.combo,
            moves_left: self.moves_left,
            objectives: self.objectives.clone(),
            level_complete: self.level_complete,
            game_over: self.game_over,
            freeze_moves: self.freeze_moves,
        });
    }

    /// Adopt a resolved board, keeping the counters
    fn settle(&mut self, mut res: Resolution) -> Resolution {
        self.board = std::mem::take(&mut res.board);
        res
    }

    fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        self.high_score = self.high_score.max(self.score);
        self.stats.total_score = self.stats.total_score.saturating_add(points as u64);
        self.stats.best_score = self.stats.best_score.max(self.score);
    }

    /// Feed a resolution into objectives and lifetime stats
    fn track_resolution(&mut self, res: &Resolution) {
        update_objectives(
            &mut self.objectives,
            &ObjectiveDelta {
                total_score: self.score,
                lines_cleared: res.lines_cleared,
                chain_waves: res.chain_waves,
                ice_broken: res.ice_broken,
                bombs_exploded: res.bombs_exploded,
            },
        );
        self.stats.lines_cleared += res.lines_cleared;
        self.stats.bombs_exploded += res.bombs_exploded;
        self.stats.ice_broken += res.ice_broken;
        self.stats.highest_combo = self.stats.highest_combo.max(self.combo);
    }

    fn finish_skill(&mut self, destroyed: u32, res: &Resolution, combo: u32, points: u32) -> SkillReport {
        self.combo = combo;
        self.add_score(points);
        self.track_resolution(res);
        self.refresh_status();
        let achievement = update_achievements(&mut self.achievements, &self.stats);

        SkillReport {
            blocks_destroyed: destroyed,
            lines_cleared: res.lines_cleared,
            chain_waves: res.chain_waves,
            bombs_exploded: res.bombs_exploded,
            ice_broken: res.ice_broken,
            points,
            combo,
            level_complete: self.level_complete,
            game_over: self.game_over,
            achievement,
        }
    }

    fn refill_tray(&mut self) {
        let allow_ice = self.freeze_moves == 0;
        let pieces = self
            .generator
            .deal(self.rules.tray_size, &self.rules, allow_ice);
        self.tray.refill(pieces);
    }

    /// Recompute level completion and game over
    fn refresh_status(&mut self) {
        if self.level_complete || self.game_over {
            return;
        }

        if self.mode == GameMode::Career && objectives_complete(&self.objectives) {
            self.level_complete = true;
            if objectives::level(self.level_index + 1).is_some() {
                self.max_level_reached = self.max_level_reached.max(self.level_index + 1);
            }
            info!(level = self.level_index, score = self.score, "level complete");
            return;
        }

        let out_of_moves = self.moves_left == Some(0);
        let stuck = !self.tray.is_empty()
            && !self
                .tray
                .iter()
                .any(|piece| fits_any_rotation(&self.board, piece));

        if out_of_moves || stuck {
            self.game_over = true;
            info!(
                score = self.score,
                out_of_moves,
                stuck,
                "game over"
            );
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1, GameMode::default())
    }
}

/// In-bounds cells of the 3x3 area centred on (x, y)
fn blast_area(x: i8, y: i8) -> impl Iterator<Item = (i8, i8)> + Clone {
    (y - 1..=y + 1)
        .flat_map(move |by| (x - 1..=x + 1).map(move |bx| (bx, by)))
        .filter(|&(bx, by)| (0..N as i8).contains(&bx) && (0..N as i8).contains(&by))
}

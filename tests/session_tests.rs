//! Session tests: turns, career levels, game over and the surge

use flux_grid::core::objectives::LEVELS;
use flux_grid::core::{GameState, Piece, Rules, ShapeId};
use flux_grid::types::{Block, BlockKind, Color, GameMode, ObjectiveKind, Passive, SpecialKind};

fn dot(id: u32) -> Piece {
    Piece::new(id, ShapeId::Dot, SpecialKind::Normal)
}

fn fill(state: &mut GameState, y: i8, xs: std::ops::Range<i8>, color: Color) {
    for x in xs {
        state.board_mut().set(x, y, Some(Block::normal(color)));
    }
}

/// Checkerboard: no two empty cells touch orthogonally and no line is full
fn checkerboard(state: &mut GameState) {
    for y in 0..10 {
        for x in 0..10 {
            if (x + y) % 2 == 0 {
                state.board_mut().set(x, y, Some(Block::normal(Color::Void)));
            }
        }
    }
}

#[test]
fn test_career_level_completes_on_score() {
    let mut state = GameState::new(11, GameMode::Career);
    fill(&mut state, 8, 2..10, Color::Solar);
    fill(&mut state, 9, 2..10, Color::Solar);
    state.set_tray([Piece::new(1, ShapeId::Square, SpecialKind::Normal)]);

    let event = state.commit_placement(0, 0, 8).unwrap();

    // (4 * 15 + 2 * 150 + 1 * 75) * 1.5 = 652.5
    assert_eq!(event.lines_cleared, 2);
    assert!(event.color_bonus);
    assert_eq!(event.points, 653);
    assert!(event.level_complete);
    assert!(!state.playable());
    assert_eq!(state.max_level_reached(), 1);
    assert!(state.objectives()[0].is_complete());

    // Won levels accept no further turns.
    assert!(state.commit_placement(0, 0, 0).is_none());

    assert!(state.next_level());
    assert_eq!(state.level_index(), 1);
    assert_eq!(state.moves_left(), Some(LEVELS[1].moves));
    assert_eq!(state.objectives()[0].kind, ObjectiveKind::ClearLines);
    assert_eq!(state.score(), 0);
    assert!(state.board().is_empty());
}

#[test]
fn test_next_level_requires_completion() {
    let mut state = GameState::new(11, GameMode::Career);
    assert!(!state.next_level());
    assert_eq!(state.level_index(), 0);
}

#[test]
fn test_running_out_of_moves_ends_the_level() {
    let mut state = GameState::new(3, GameMode::Career);
    let moves = LEVELS[0].moves;

    for i in 0..moves {
        state.set_tray([dot(i)]);
        let x = (i % 5) as i8;
        let y = (i / 5) as i8;
        let event = state.commit_placement(0, x, y).unwrap();
        assert_eq!(event.lines_cleared, 0);
        assert_eq!(event.game_over, i + 1 == moves);
    }

    assert_eq!(state.moves_left(), Some(0));
    assert!(state.game_over());
    assert!(!state.level_complete());
    assert_eq!(state.score(), moves * 15);
}

#[test]
fn test_game_over_when_no_rotation_fits() {
    let mut state = GameState::new(5, GameMode::Endless);
    checkerboard(&mut state);

    state.set_tray([
        Piece::new(1, ShapeId::H2, SpecialKind::Normal),
        Piece::new(2, ShapeId::Square, SpecialKind::Normal),
    ]);

    assert!(state.game_over());
    assert!(!state.reroll());
}

#[test]
fn test_single_cell_keeps_checkerboard_alive() {
    let mut state = GameState::new(5, GameMode::Endless);
    checkerboard(&mut state);

    state.set_tray([Piece::new(1, ShapeId::H2, SpecialKind::Normal), dot(2)]);

    assert!(!state.game_over());
}

#[test]
fn test_endless_has_no_move_limit() {
    let mut state = GameState::new(8, GameMode::Endless);
    for i in 0..30u32 {
        state.set_tray([dot(i)]);
        let (x, y) = ((i % 6) as i8, (i / 6) as i8);
        state.commit_placement(0, x, y).unwrap();
    }
    assert!(state.playable());
    assert_eq!(state.moves_left(), None);
}

#[test]
fn test_surge_arms_then_doubles_next_clear() {
    let rules = Rules {
        starting_flux: 99,
        ..Rules::default()
    };
    let mut state = GameState::with_rules(21, GameMode::Endless, rules).unwrap();
    fill(&mut state, 9, 0..9, Color::Solar);
    state.set_tray([dot(1), dot(2)]);

    let first = state.commit_placement(0, 0, 0).unwrap();
    assert!(first.surge_activated);
    assert!(state.flux().surge_active());
    assert_eq!(state.flux().level(), 100);

    let second = state.commit_placement(0, 9, 9).unwrap();

    // (15 + 150 + 75) * 1.5 color * 2.0 surge
    assert_eq!(second.points, 720);
    assert!(second.surge_consumed);
    assert_eq!(state.flux().level(), 0);
    assert!(!state.flux().surge_active());
}

#[test]
fn test_non_clearing_turn_resets_combo() {
    let mut state = GameState::new(4, GameMode::Endless);
    fill(&mut state, 9, 0..9, Color::Void);
    fill(&mut state, 8, 0..9, Color::Toxic);
    state.set_tray([dot(1), dot(2), dot(3)]);

    let a = state.commit_placement(0, 9, 9).unwrap();
    assert_eq!(a.combo, 1);
    assert_eq!(a.blocks_placed, 1);
    // Row 8 dropped to row 9 and still misses (9, 9).
    let b = state.commit_placement(0, 9, 9).unwrap();
    assert_eq!(b.combo, 2);
    assert_eq!(state.combo(), 2);

    let c = state.commit_placement(0, 0, 0).unwrap();
    assert_eq!(c.combo, 0);
    assert_eq!(c.points, 15);
    assert_eq!(state.stats().highest_combo, 2);
}

#[test]
fn test_line_objective_counts_each_line() {
    let mut state = GameState::new(6, GameMode::Career);
    assert!(state.start_level(1));
    fill(&mut state, 9, 0..9, Color::Laser);
    state.set_tray([dot(1)]);

    state.commit_placement(0, 9, 9).unwrap();

    let objective = state.objectives()[0];
    assert_eq!(objective.kind, ObjectiveKind::ClearLines);
    assert_eq!(objective.current, 1);
    assert!(!state.level_complete());
}

#[test]
fn test_start_level_rejects_unknown_and_endless() {
    let mut career = GameState::new(1, GameMode::Career);
    assert!(!career.start_level(LEVELS.len()));
    assert!(career.start_level(LEVELS.len() - 1));

    let mut endless = GameState::new(1, GameMode::Endless);
    assert!(!endless.start_level(1));
}

#[test]
fn test_restart_resets_game_but_keeps_stats() {
    let mut state = GameState::new(2, GameMode::Endless);
    state.set_tray([dot(1)]);
    state.commit_placement(0, 4, 4).unwrap();
    assert_eq!(state.score(), 15);

    state.restart();

    assert_eq!(state.score(), 0);
    assert_eq!(state.high_score(), 15);
    assert!(state.board().is_empty());
    assert_eq!(state.stats().games_played, 2);
    assert_eq!(state.stats().blocks_placed, 1);
    assert_eq!(state.history_len(), 0);
}

#[test]
fn test_ice_breaker_passive_weakens_new_ice() {
    let mut state = GameState::new(2, GameMode::Endless);
    assert!(state.equip_passive(Passive::IceBreaker));
    state.set_tray([Piece::new(1, ShapeId::H2, SpecialKind::Ice)]);

    state.commit_placement(0, 0, 0).unwrap();

    let block = state.board().block(0, 0).unwrap();
    assert_eq!(block.kind, BlockKind::Ice { health: 1 });
}

#[test]
fn test_score_passive_scales_points() {
    let mut state = GameState::new(2, GameMode::Endless);
    assert!(state.equip_passive(Passive::ScoreMultiplier));
    state.set_tray([Piece::new(1, ShapeId::Square, SpecialKind::Normal)]);

    let event = state.commit_placement(0, 0, 0).unwrap();

    assert_eq!(event.points, 90);
}

#[test]
fn test_same_seed_same_trays() {
    let a = GameState::new(1234, GameMode::Endless);
    let b = GameState::new(1234, GameMode::Endless);
    assert_eq!(a.tray(), b.tray());
    assert_eq!(a.snapshot(), b.snapshot());
}

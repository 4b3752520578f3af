//! Skill tests through the engine command layer

use flux_grid::core::{GameState, Piece, Rules, ShapeId};
use flux_grid::engine::{apply_place, apply_skill, PlaceError, SkillCommand, SkillError, SkillOutcome};
use flux_grid::types::{Block, Color, GameMode, Skill, SpecialKind};

fn rich_rules() -> Rules {
    Rules {
        starting_flux: 100,
        ..Rules::default()
    }
}

fn endless_with(pieces: Vec<Piece>) -> GameState {
    let mut state = GameState::with_rules(17, GameMode::Endless, rich_rules()).unwrap();
    state.set_tray(pieces);
    state
}

fn dot(id: u32) -> Piece {
    Piece::new(id, ShapeId::Dot, SpecialKind::Normal)
}

fn h2(id: u32) -> Piece {
    Piece::new(id, ShapeId::H2, SpecialKind::Normal)
}

fn solar() -> Option<Block> {
    Some(Block::normal(Color::Solar))
}

#[test]
fn test_reroll_replaces_tray_and_costs_flux() {
    let mut state = endless_with(vec![dot(1), dot(2)]);

    let outcome = apply_skill(&mut state, SkillCommand::Reroll).unwrap();

    assert_eq!(outcome, SkillOutcome::TrayChanged);
    assert_eq!(state.tray().len(), 3);
    assert!(state.tray().iter().all(|p| p.id != 1 && p.id != 2));
    assert_eq!(state.flux().level(), 80);
    assert_eq!(state.stats().skill_uses(Skill::Reroll), 1);
}

#[test]
fn test_shatter_collapse_completes_a_line() {
    let mut state = endless_with(vec![dot(1)]);
    // Row 8 misses only (6, 8); column 6 holds (6, 7) over that gap and
    // (6, 9) under it.
    for x in 0..10 {
        if x != 6 {
            state.board_mut().set(x, 8, solar());
        }
    }
    state.board_mut().set(6, 7, solar());
    state.board_mut().set(6, 9, Some(Block::normal(Color::Void)));

    let outcome = apply_skill(&mut state, SkillCommand::Shatter { x: 6, y: 9 }).unwrap();

    let SkillOutcome::Resolved(report) = outcome else {
        panic!("expected a resolution, got {:?}", outcome);
    };
    assert_eq!(report.blocks_destroyed, 1);
    assert_eq!(report.lines_cleared, 1);
    assert_eq!(report.combo, 1);
    assert_eq!(report.points, 5 + 150);
    assert!(state.board().is_empty());
    assert_eq!(state.flux().level(), 60);
    assert_eq!(state.combo(), 1);
}

#[test]
fn test_bomb_skill_clears_area_and_compacts() {
    let mut state = endless_with(vec![dot(1)]);
    state.board_mut().set(5, 5, solar());
    state.board_mut().set(4, 4, solar());
    state.board_mut().set(6, 6, solar());
    state.board_mut().set(5, 2, Some(Block::normal(Color::Toxic)));
    state.board_mut().set(0, 9, solar());

    let outcome = apply_skill(&mut state, SkillCommand::Bomb { x: 5, y: 5 }).unwrap();

    let SkillOutcome::Resolved(report) = outcome else {
        panic!("expected a resolution, got {:?}", outcome);
    };
    assert_eq!(report.blocks_destroyed, 3);
    assert_eq!(report.points, 15);
    assert_eq!(state.board().filled_count(), 2);
    assert_eq!(state.board().block(5, 9).map(|b| b.color), Some(Color::Toxic));
    // Columns outside the blast keep their layout.
    assert!(state.board().is_occupied(0, 9));
    assert_eq!(state.flux().level(), 25);
}

#[test]
fn test_bomb_skill_on_edge_is_clamped() {
    let mut state = endless_with(vec![dot(1)]);
    state.board_mut().set(0, 0, solar());
    state.board_mut().set(1, 1, solar());

    let outcome = apply_skill(&mut state, SkillCommand::Bomb { x: 0, y: 0 }).unwrap();

    assert!(matches!(outcome, SkillOutcome::Resolved(r) if r.blocks_destroyed == 2));
    assert!(state.board().is_empty());
}

#[test]
fn test_rotate_and_swap() {
    let mut state = endless_with(vec![h2(1), dot(2)]);

    apply_skill(&mut state, SkillCommand::Rotate { index: 0 }).unwrap();
    assert_eq!(state.tray().get(0).map(|p| p.shape), Some(ShapeId::V2.shape()));
    assert_eq!(state.tray().get(0).map(|p| p.id), Some(1));

    apply_skill(&mut state, SkillCommand::Swap { a: 0, b: 1 }).unwrap();
    assert_eq!(state.tray().get(0).map(|p| p.id), Some(2));
    assert_eq!(state.tray().get(1).map(|p| p.id), Some(1));

    assert_eq!(state.flux().level(), 100 - 10 - 5);
}

#[test]
fn test_freeze_reports_duration() {
    let mut state = endless_with(vec![dot(1)]);
    let outcome = apply_skill(&mut state, SkillCommand::Freeze).unwrap();
    assert_eq!(outcome, SkillOutcome::Frozen { moves: 5 });
    assert_eq!(state.flux().level(), 70);
}

#[test]
fn test_magnet_places_at_best_anchor() {
    let mut state = endless_with(vec![dot(1), dot(2)]);

    let outcome = apply_skill(&mut state, SkillCommand::Magnet { index: 1 }).unwrap();

    let SkillOutcome::Placed(event) = outcome else {
        panic!("expected a placement, got {:?}", outcome);
    };
    assert_eq!(event.blocks_placed, 1);
    assert!(state.board().is_occupied(0, 0));
    assert_eq!(state.tray().len(), 1);
    // 100 - 35 for the skill, + 2 for the placed block
    assert_eq!(state.flux().level(), 67);
}

#[test]
fn test_undo_restores_board_and_charges_restored_meter() {
    let mut state = endless_with(vec![dot(1), dot(2)]);
    apply_place(&mut state, 0, 3, 3).unwrap();
    assert_eq!(state.score(), 15);

    let outcome = apply_skill(&mut state, SkillCommand::Undo).unwrap();

    assert_eq!(outcome, SkillOutcome::Undone);
    assert!(state.board().is_empty());
    assert_eq!(state.score(), 0);
    assert_eq!(state.tray().len(), 2);
    assert_eq!(state.flux().level(), 85);
    assert_eq!(
        apply_skill(&mut state, SkillCommand::Undo).unwrap_err(),
        SkillError::NothingToUndo
    );
}

#[test]
fn test_undo_after_freeze_reverts_only_the_freeze() {
    let mut state = endless_with(vec![dot(1), dot(2)]);
    apply_place(&mut state, 0, 3, 3).unwrap();
    apply_skill(&mut state, SkillCommand::Freeze).unwrap();
    assert_eq!(state.freeze_moves(), 5);
    assert_eq!(state.flux().level(), 70);

    apply_skill(&mut state, SkillCommand::Undo).unwrap();

    assert_eq!(state.freeze_moves(), 0);
    assert!(state.board().is_occupied(3, 3));
    assert_eq!(state.score(), 15);
    assert_eq!(state.flux().level(), 85);
    assert_eq!(state.history_len(), 1);
}

#[test]
fn test_undo_after_magnet_refunds_its_cost() {
    let mut state = endless_with(vec![dot(1), dot(2)]);
    apply_skill(&mut state, SkillCommand::Magnet { index: 1 }).unwrap();
    assert_eq!(state.flux().level(), 67);
    assert_eq!(state.history_len(), 1);

    apply_skill(&mut state, SkillCommand::Undo).unwrap();

    assert!(state.board().is_empty());
    assert_eq!(state.tray().len(), 2);
    assert_eq!(state.flux().level(), 85);
    assert_eq!(state.history_len(), 0);
}

#[test]
fn test_undo_recovers_from_game_over() {
    let mut state = GameState::with_rules(17, GameMode::Endless, rich_rules()).unwrap();
    for y in 0..10 {
        for x in 0..10 {
            if (x + y) % 2 == 0 {
                state.board_mut().set(x, y, Some(Block::normal(Color::Void)));
            }
        }
    }
    state.set_tray(vec![dot(1), h2(2)]);
    assert!(!state.game_over());

    let event = apply_place(&mut state, 0, 1, 0).unwrap();
    assert!(event.game_over);
    assert_eq!(apply_place(&mut state, 0, 3, 0).unwrap_err(), PlaceError::NotPlayable);
    assert_eq!(
        apply_skill(&mut state, SkillCommand::Shatter { x: 0, y: 0 }).unwrap_err(),
        SkillError::NotPlayable
    );

    apply_skill(&mut state, SkillCommand::Undo).unwrap();
    assert!(!state.game_over());
    assert!(!state.board().is_occupied(1, 0));
}

#[test]
fn test_insufficient_flux_leaves_state_untouched() {
    let mut state = GameState::new(17, GameMode::Endless);
    state.board_mut().set(5, 5, solar());
    let before = state.snapshot();

    let err = apply_skill(&mut state, SkillCommand::Bomb { x: 5, y: 5 }).unwrap_err();

    assert_eq!(err, SkillError::InsufficientFlux { needed: 75, available: 50 });
    assert_eq!(err.to_string(), "not enough flux: need 75, have 50");
    assert_eq!(state.snapshot(), before);
}

#[test]
fn test_target_errors_take_precedence_over_flux() {
    let mut state = GameState::new(17, GameMode::Endless);
    assert_eq!(
        apply_skill(&mut state, SkillCommand::Rotate { index: 7 }).unwrap_err(),
        SkillError::NoSuchPiece
    );
    assert_eq!(
        apply_skill(&mut state, SkillCommand::Bomb { x: -1, y: 3 }).unwrap_err(),
        SkillError::OutOfBounds
    );
}

#[test]
fn test_skills_do_not_break_combo() {
    let mut state = endless_with(vec![dot(1), dot(2)]);
    for x in 0..9 {
        state.board_mut().set(x, 9, solar());
    }
    let event = apply_place(&mut state, 0, 9, 9).unwrap();
    assert_eq!(event.combo, 1);

    apply_skill(&mut state, SkillCommand::Reroll).unwrap();
    apply_skill(&mut state, SkillCommand::Freeze).unwrap();

    assert_eq!(state.combo(), 1);
}

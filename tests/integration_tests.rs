//! Integration tests for whole sessions and the autoplay runner

use rand::rngs::StdRng;
use rand::SeedableRng;

use flux_grid::autoplay::{choose_move, run, RunConfig};
use flux_grid::core::{generate_pieces, GameState, Rules, SimpleRng};
use flux_grid::types::{GameMode, SpecialKind};

#[test]
fn test_generate_pieces_with_any_rng() {
    let rules = Rules::default();
    let mut next_id = 10;
    let mut rng = StdRng::seed_from_u64(7);

    let pieces = generate_pieces(&mut rng, 50, &rules, true, &mut next_id);

    assert_eq!(pieces.len(), 50);
    assert_eq!(next_id, 60);
    assert_eq!(pieces[0].id, 10);
    assert!(pieces.iter().all(|p| p.color == p.shape_id.color()));
}

#[test]
fn test_generate_pieces_without_ice() {
    let rules = Rules::default();
    let mut next_id = 1;
    let mut rng = SimpleRng::new(3);

    let pieces = generate_pieces(&mut rng, 500, &rules, false, &mut next_id);

    assert!(pieces.iter().all(|p| p.special != SpecialKind::Ice));
    assert!(pieces.iter().any(|p| p.special == SpecialKind::Bomb));
}

#[test]
fn test_special_rates_are_roughly_right() {
    let rules = Rules::default();
    let mut next_id = 1;
    let mut rng = StdRng::seed_from_u64(2024);

    let pieces = generate_pieces(&mut rng, 10_000, &rules, true, &mut next_id);
    let bombs = pieces.iter().filter(|p| p.special == SpecialKind::Bomb).count();
    let ice = pieces.iter().filter(|p| p.special == SpecialKind::Ice).count();

    assert!((600..1000).contains(&bombs), "bombs: {}", bombs);
    assert!((500..900).contains(&ice), "ice: {}", ice);
}

#[test]
fn test_endless_game_runs_to_completion() {
    let mut state = GameState::new(31337, GameMode::Endless);
    let mut turns = 0;

    while let Some((index, x, y)) = choose_move(&state) {
        if !state.playable() || turns >= 2000 {
            break;
        }
        let event = state.commit_placement(index, x, y).unwrap();
        assert!(event.points >= event.blocks_placed * 15);
        turns += 1;
    }

    assert!(turns > 0);
    assert!(state.board().full_rows().is_empty());
    assert!(state.board().full_cols().is_empty());
    assert_eq!(state.high_score(), state.score());
    assert!(state.stats().blocks_placed as usize >= turns);
}

#[test]
fn test_autoplay_is_deterministic() {
    let config = RunConfig {
        seed: 77,
        mode: GameMode::Endless,
        max_turns: 60,
        ..RunConfig::default()
    };

    let (a, state_a) = run(&config).unwrap();
    let (b, state_b) = run(&config).unwrap();

    assert_eq!(a, b);
    assert_eq!(state_a.snapshot(), state_b.snapshot());
    assert!(a.turns <= 60);
    assert_eq!(a.score, state_a.score());
}

#[test]
fn test_autoplay_career_reports_progress() {
    let config = RunConfig {
        seed: 5,
        mode: GameMode::Career,
        max_turns: 200,
        use_skills: false,
        ..RunConfig::default()
    };

    let (summary, state) = run(&config).unwrap();

    assert_eq!(summary.level, state.level_index());
    assert_eq!(summary.skills_used, 0);
    assert!(summary.levels_completed as usize <= flux_grid::core::LEVELS.len());
}

#[test]
fn test_autoplay_rejects_unknown_level() {
    let config = RunConfig {
        level: 99,
        ..RunConfig::default()
    };
    assert!(run(&config).is_err());
}

#[test]
fn test_autoplay_saves_snapshot() {
    let path = std::env::temp_dir().join(format!("flux-grid-snapshot-{}.json", std::process::id()));
    let config = RunConfig {
        seed: 9,
        mode: GameMode::Endless,
        max_turns: 10,
        save_path: Some(path.clone()),
        ..RunConfig::default()
    };

    let (_, state) = run(&config).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    let snap: flux_grid::core::GameSnapshot = serde_json::from_str(&text).unwrap();
    assert_eq!(snap, state.snapshot());
}

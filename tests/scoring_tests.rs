//! Scoring and flux economy tests

use flux_grid::core::scoring::{
    bomb_skill_score, combo_level, flux_gain, shatter_score, skill_combo_level, ScoreInput,
};
use flux_grid::core::{calculate_score, compute_score_delta, FluxMeter, Rules};
use flux_grid::types::FLUX_MAX;

#[test]
fn test_plain_placement_points() {
    let rules = Rules::default();
    // 4 blocks, no lines: 4 * 15
    assert_eq!(compute_score_delta(4, 0, 0, false, false, &rules), 60);
}

#[test]
fn test_single_line_with_first_combo() {
    let rules = Rules::default();
    // 2 * 15 + 1 * 150 + 1 * 75
    assert_eq!(compute_score_delta(2, 1, 1, false, false, &rules), 255);
}

#[test]
fn test_multipliers_stack() {
    let rules = Rules::default();
    let score = calculate_score(
        &ScoreInput {
            blocks_placed: 3,
            lines_cleared: 2,
            combo_level: 2,
            color_bonus: true,
            surge_active: true,
            ..ScoreInput::default()
        },
        &rules,
    );

    // base = 45 + 300 + 150 = 495; 495 * 1.5 * 2.0 = 1485
    assert_eq!(score.base, 495);
    assert_eq!(score.total, 1485);
    assert!(score.color_bonus_applied);
    assert!(score.surge_applied);
}

#[test]
fn test_bonuses_need_a_clear() {
    let rules = Rules::default();
    let score = calculate_score(
        &ScoreInput {
            blocks_placed: 2,
            color_bonus: true,
            surge_active: true,
            ..ScoreInput::default()
        },
        &rules,
    );

    assert_eq!(score.total, 30);
    assert!(!score.color_bonus_applied);
    assert!(!score.surge_applied);
}

#[test]
fn test_passive_multiplier_rounds() {
    let rules = Rules::default();
    let score = calculate_score(
        &ScoreInput {
            blocks_placed: 1,
            passive_multiplier: 1.5,
            ..ScoreInput::default()
        },
        &rules,
    );
    // 15 * 1.5 = 22.5 rounds half away from zero
    assert_eq!(score.total, 23);
}

#[test]
fn test_combo_progression() {
    assert_eq!(combo_level(0, 1), 1);
    assert_eq!(combo_level(3, 2), 4);
    assert_eq!(combo_level(3, 0), 0);

    assert_eq!(skill_combo_level(3, 0), 3);
    assert_eq!(skill_combo_level(3, 1), 4);
}

#[test]
fn test_skill_points() {
    let rules = Rules::default();
    assert_eq!(shatter_score(0, 0, &rules), 5);
    assert_eq!(shatter_score(1, 2, &rules), 5 + 300);
    assert_eq!(bomb_skill_score(6, 0, 0, &rules), 30);
    assert_eq!(bomb_skill_score(6, 1, 1, &rules), 30 + 150);
}

#[test]
fn test_flux_gain_with_boost() {
    let rules = Rules::default();
    assert_eq!(flux_gain(4, 0, 1.0, &rules), 8);
    assert_eq!(flux_gain(4, 2, 1.0, &rules), 28);
    assert_eq!(flux_gain(4, 0, 1.25, &rules), 10);
}

#[test]
fn test_non_clearing_placement_adds_block_flux_only() {
    let rules = Rules::default();
    let mut meter = FluxMeter::new(50);

    let out = meter.apply_placement(3, 0, 1.0, &rules);

    assert_eq!(out.gained, 6);
    assert_eq!(meter.level(), 56);
    assert!(!out.surge_activated);
}

#[test]
fn test_flux_caps_and_arms_surge_once() {
    let rules = Rules::default();
    let mut meter = FluxMeter::new(95);

    let out = meter.apply_placement(5, 0, 1.0, &rules);
    assert_eq!(meter.level(), FLUX_MAX);
    assert_eq!(out.gained, 5);
    assert!(out.surge_activated);
    assert!(meter.surge_active());

    // Already full: no second activation.
    let out = meter.apply_placement(1, 0, 1.0, &rules);
    assert_eq!(out.gained, 0);
    assert!(!out.surge_activated);
}

#[test]
fn test_clearing_placement_consumes_surge() {
    let rules = Rules::default();
    let mut meter = FluxMeter::from_parts(100, true);

    let out = meter.apply_placement(4, 1, 1.0, &rules);

    assert!(out.surge_consumed);
    assert_eq!(out.gained, 0);
    assert_eq!(meter.level(), 0);
    assert!(!meter.surge_active());
}

#[test]
fn test_spending_flux() {
    let mut meter = FluxMeter::new(30);
    assert!(!meter.spend(40));
    assert_eq!(meter.level(), 30);
    assert!(meter.spend(20));
    assert_eq!(meter.level(), 10);
    assert!(meter.can_afford(10));
    assert!(!meter.can_afford(11));
}

#[test]
fn test_spending_keeps_armed_surge() {
    let mut meter = FluxMeter::from_parts(100, true);
    assert!(meter.spend(20));
    assert!(meter.surge_active());
}

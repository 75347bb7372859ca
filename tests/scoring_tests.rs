//! Turn scoring tests - positional values, pattern bonuses and power orbs

use approx::assert_relative_eq;

use gravity_match::core::scoring::position_multiplier;
use gravity_match::core::{ClearedTile, Momentum, TurnResult, TurnScoreCalculator};
use gravity_match::engine::GameEngine;
use gravity_match::types::{ColorType, EngineConfig, Position};

fn tile(x: i8, y: i8, power_orb: bool, age: u32) -> ClearedTile {
    ClearedTile {
        position: Position::new(x, y),
        color: ColorType::Red,
        power_orb,
        age,
    }
}

#[test]
fn test_position_multiplier_regions() {
    for pos in [Position::new(0, 0), Position::new(7, 3), Position::new(4, 7)] {
        assert_eq!(position_multiplier(pos), 1);
    }
    for pos in [
        Position::new(3, 3),
        Position::new(4, 3),
        Position::new(3, 4),
        Position::new(4, 4),
    ] {
        assert_eq!(position_multiplier(pos), 3);
    }
    for pos in [Position::new(1, 1), Position::new(2, 3), Position::new(6, 6)] {
        assert_eq!(position_multiplier(pos), 2);
    }
}

#[test]
fn test_power_orb_turn_sets_heat_to_max() {
    // Two line matches of three, one holding an orb that has waited 4 turns.
    let turn = TurnResult {
        cleared_tiles: vec![
            tile(0, 0, true, 4),
            tile(1, 0, false, 0),
            tile(2, 0, false, 0),
            tile(2, 2, false, 0),
            tile(2, 3, false, 0),
            tile(2, 4, false, 0),
        ],
        match_sizes: vec![3, 3],
        power_orb_collected: true,
        power_orb_age: 4,
        ..TurnResult::default()
    };
    let mut momentum = Momentum::default();
    momentum.add_heat(2.0);

    let score = TurnScoreCalculator::default().calculate(&turn, &mut momentum);

    // Edge cells 10 each, inner cells 20 each.
    assert_eq!(score.base_score, 3 * 10 + 3 * 20);
    assert_eq!(score.pattern_bonus, 0);
    assert_eq!(score.power_orb_score, 5000 + 500 * 4);
    assert_relative_eq!(score.heat_gained, 8.0);
    assert_relative_eq!(score.multiplier, 10.0, epsilon = 1e-5);
    assert_eq!(score.final_score, 70_900);
    assert_relative_eq!(score.final_heat, 9.0);
}

#[test]
fn test_shape_turn_bonus_and_heat() {
    let turn = TurnResult {
        cleared_tiles: (1..6).map(|x| tile(x, 2, false, 0)).collect(),
        match_sizes: vec![5],
        has_cross: true,
        ..TurnResult::default()
    };
    let mut momentum = Momentum::default();
    let score = TurnScoreCalculator::default().calculate(&turn, &mut momentum);

    // 5 inner cells, cross bonus, heat 2 + 1.5
    assert_eq!(score.base_score, 100);
    assert_eq!(score.pattern_bonus, 100);
    assert_relative_eq!(score.heat_gained, 3.5);
    assert_relative_eq!(score.multiplier, 1.0 + 3.5 * 0.9, epsilon = 1e-5);
    assert_eq!(score.final_score, (200.0f64 * (1.0 + 3.5 * 0.9)).round() as u64);
    assert_relative_eq!(score.final_heat, 2.5);
}

#[test]
fn test_empty_turn_only_decays() {
    let mut momentum = Momentum::default();
    momentum.add_heat(4.0);
    let score = TurnScoreCalculator::default().calculate(&TurnResult::default(), &mut momentum);
    assert_eq!(score.final_score, 0);
    assert_relative_eq!(score.heat_gained, 0.0);
    assert_relative_eq!(score.final_heat, 3.0);
}

#[test]
fn test_engine_power_orb_turn() {
    // Row 0 and row 7 already hold a run of three; (0, 0) is a power orb.
    let config = EngineConfig {
        power_orb_spawn_chance: 0.0,
        ..EngineConfig::with_seed(3)
    };
    let mut engine = GameEngine::from_layout(
        config,
        &[
            "rRRYPORB", "BGYPORBG", "GYPORBGY", "YPORBGYP", "PORBGYPO", "ORBGYPOR",
            "RBGYPORB", "BGYPOPPP",
        ],
    )
    .unwrap();

    let outcome = engine
        .submit_swap(Position::new(3, 3), Position::new(4, 3))
        .unwrap();
    let score = outcome.score;

    assert!(outcome.result.power_orb_collected);
    assert_eq!(outcome.chain.levels[0].matches.len(), 2);
    assert_eq!(score.power_orb_score, 5000 + 500 * outcome.result.power_orb_age);
    assert_relative_eq!(score.heat_gained, 10.0);
    assert_relative_eq!(score.multiplier, 10.0, epsilon = 1e-5);
    let raw = f64::from(score.base_score + score.pattern_bonus + score.power_orb_score);
    assert_eq!(score.final_score, (raw * f64::from(score.multiplier)).round() as u64);
    assert_relative_eq!(engine.heat(), 9.0);
}

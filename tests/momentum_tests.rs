//! Momentum tests - clamping, decay and the multiplier curve

use approx::assert_relative_eq;
use rstest::rstest;

use gravity_match::core::{Momentum, TurnResult};
use gravity_match::types::{HeatBand, MomentumConfig, MAX_HEAT};

#[rstest]
#[case(0.0, 1.0)]
#[case(1.0, 1.9)]
#[case(5.0, 5.5)]
#[case(10.0, 10.0)]
fn test_multiplier_curve(#[case] heat: f32, #[case] expected: f32) {
    let momentum = Momentum::default();
    assert_relative_eq!(momentum.multiplier_at(heat), expected, epsilon = 1e-5);
}

#[rstest]
#[case(0.0, HeatBand::Cold)]
#[case(2.9, HeatBand::Cold)]
#[case(3.0, HeatBand::Warm)]
#[case(5.0, HeatBand::Hot)]
#[case(8.0, HeatBand::Blazing)]
#[case(10.0, HeatBand::Inferno)]
fn test_heat_bands(#[case] heat: f32, #[case] band: HeatBand) {
    let mut momentum = Momentum::default();
    momentum.add_heat(heat);
    assert_eq!(momentum.band(), band);
}

#[test]
fn test_heat_never_leaves_range() {
    let mut momentum = Momentum::default();
    let big = TurnResult {
        match_sizes: vec![5; 6],
        cascade_level: 10,
        has_l_shape: true,
        has_cross: true,
        ..TurnResult::default()
    };

    for round in 0..50 {
        if round % 3 == 0 {
            momentum.accumulate(&big);
        }
        momentum.decay();
        assert!(momentum.heat() >= 0.0);
        assert!(momentum.heat() <= MAX_HEAT);
    }
}

#[test]
fn test_idle_turns_decay_monotonically_to_zero() {
    let mut momentum = Momentum::default();
    momentum.collect_power_orb();

    let mut last = momentum.heat();
    for _ in 0..15 {
        momentum.accumulate(&TurnResult::default());
        momentum.decay();
        assert!(momentum.heat() <= last);
        assert!(momentum.heat() >= 0.0);
        last = momentum.heat();
    }
    assert_relative_eq!(momentum.heat(), 0.0);
}

#[test]
fn test_cascade_heat_uses_deepest_level_once() {
    let mut momentum = Momentum::default();
    let gained = momentum.accumulate(&TurnResult {
        match_sizes: vec![3, 3, 3],
        cascade_level: 2,
        ..TurnResult::default()
    });
    assert_relative_eq!(gained, 1.0);
}

#[test]
fn test_custom_ceiling_and_scale() {
    let mut momentum = Momentum::new(MomentumConfig {
        max_heat: 5.0,
        scale: 0.5,
        ..MomentumConfig::default()
    });
    momentum.collect_power_orb();
    assert_relative_eq!(momentum.heat(), 5.0);
    assert_relative_eq!(momentum.multiplier(), 3.5);
}

//! Anti-frustration tests - the board never stays stuck for long

use gravity_match::core::{available_move_count, EngineEvent};
use gravity_match::engine::{bot, EventRecorder, GameEngine};
use gravity_match::types::{EngineConfig, Position, QueueConfig};

/// Diagonal stripes: no straight or diagonal swap makes a run
const STRIPES: [&str; 8] = [
    "RBGYPORB", "BGYPORBG", "GYPORBGY", "YPORBGYP", "PORBGYPO", "ORBGYPOR", "RBGYPORB",
    "BGYPORBG",
];

#[test]
fn test_generated_boards_meet_the_floor() {
    for seed in 0..20 {
        let engine = GameEngine::new(EngineConfig::with_seed(seed)).unwrap();
        assert!(
            engine.available_moves() >= engine.config().queue.min_guaranteed_moves,
            "seed {} starts stuck",
            seed
        );
        assert!(engine.grid().tiles().count() == 64);
    }
}

#[test]
fn test_long_session_never_stays_below_floor() {
    let config = EngineConfig::with_seed(99);
    let floor = config.queue.min_guaranteed_moves;
    let limit = config.queue.max_consecutive_no_moves;
    let mut engine = GameEngine::new(config).unwrap();

    let mut streak = 0u32;
    let mut worst = 0u32;
    for n in 0..1000 {
        let mut swap = bot::pick_swap(engine.grid());
        if n % 2 == 1 {
            swap = swap.reversed();
        }
        let outcome = engine.submit_swap(swap.a, swap.b).unwrap();
        assert_eq!(outcome.available_moves, available_move_count(engine.grid()));

        if outcome.available_moves < floor {
            streak += 1;
        } else {
            streak = 0;
        }
        worst = worst.max(streak);
    }
    assert!(worst <= limit, "{} turns in a row below the floor", worst);
}

#[test]
fn test_stuck_board_gets_a_guaranteed_move() {
    let config = EngineConfig {
        queue: QueueConfig {
            max_consecutive_no_moves: 1,
            ..QueueConfig::default()
        },
        ..EngineConfig::with_seed(12)
    };
    let mut engine = GameEngine::from_layout(config, &STRIPES).unwrap();
    assert_eq!(engine.available_moves(), 0);

    let recorder = EventRecorder::new();
    engine.add_observer(Box::new(recorder.clone()));

    // Two same-colored diagonal neighbours: the board does not change.
    let outcome = engine
        .submit_swap(Position::new(0, 1), Position::new(1, 0))
        .unwrap();

    assert!(outcome.chain.is_empty());
    assert!(!outcome.injected.is_empty());
    assert!(outcome.available_moves >= 3);
    assert_eq!(engine.no_move_streak(), 0);

    let generated: Vec<Position> = recorder
        .events()
        .into_iter()
        .filter_map(|e| match e {
            EngineEvent::GuaranteedMoveGenerated(pos) => Some(pos),
            _ => None,
        })
        .collect();
    assert_eq!(generated, outcome.injected);
}

#[test]
fn test_streak_builds_before_injection() {
    // Default limit is two stuck turns.
    let mut engine = GameEngine::from_layout(EngineConfig::with_seed(12), &STRIPES).unwrap();

    let first = engine
        .submit_swap(Position::new(0, 1), Position::new(1, 0))
        .unwrap();
    assert!(first.injected.is_empty());
    assert_eq!(first.available_moves, 0);
    assert_eq!(engine.no_move_streak(), 1);

    let second = engine
        .submit_swap(Position::new(0, 1), Position::new(1, 0))
        .unwrap();
    assert!(!second.injected.is_empty());
    assert!(second.available_moves >= 3);
    assert_eq!(engine.no_move_streak(), 0);
}

#[test]
fn test_force_move_available_on_stuck_board() {
    let mut engine = GameEngine::from_layout(EngineConfig::with_seed(1), &STRIPES).unwrap();
    let recorder = EventRecorder::new();
    engine.add_observer(Box::new(recorder.clone()));

    assert!(engine.force_move_available(Position::new(3, 3)).unwrap());
    assert!(engine.available_moves() > 0);
    assert_eq!(
        recorder.events(),
        vec![EngineEvent::GuaranteedMoveGenerated(Position::new(3, 3))]
    );
    // The recolor never completes a run by itself.
    assert!(gravity_match::core::MatchDetector::default()
        .detect_all(engine.grid())
        .is_empty());
}

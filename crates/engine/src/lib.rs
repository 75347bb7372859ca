//! Session layer - wires the core components into a playable game
//!
//! A [`GameEngine`] is the explicit per-game context: it owns the grid, the tile
//! queue and every rule component, runs turns stage by stage, enforces the
//! anti-frustration guarantee, and reports what happened to its observers.
//!
//! # Example
//!
//! ```
//! use gravity_match_engine::{bot, EventRecorder, GameEngine};
//! use gravity_match_core::types::EngineConfig;
//!
//! let mut engine = GameEngine::new(EngineConfig::with_seed(42)).unwrap();
//! let recorder = EventRecorder::new();
//! engine.add_observer(Box::new(recorder.clone()));
//!
//! let swap = bot::pick_swap(engine.grid());
//! let outcome = engine.submit_swap(swap.a, swap.b).unwrap();
//!
//! assert_eq!(outcome.turn, 1);
//! assert_eq!(engine.score(), outcome.score.final_score);
//! assert_eq!(recorder.names()[0], "gravity_changed");
//! ```

pub mod bot;
pub mod error;
pub mod observer;
pub mod session;

pub use error::EngineError;
pub use observer::{EngineObserver, EventRecorder, LogObserver};
pub use session::{GameEngine, StageReport, TurnOutcome, TurnStage};

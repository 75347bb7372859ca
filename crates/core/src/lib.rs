//! Core turn-resolution logic - pure, deterministic, and testable
//!
//! This crate contains every rule of the puzzle: the grid, swap handling, gravity
//! flow, match detection, cascades, heat and scoring, plus the tile queue that
//! feeds the board. It has **zero dependencies** on rendering, input or I/O:
//!
//! - **Deterministic**: the same seed and swaps always produce the same game
//! - **Plan-based**: gravity and cascades return complete records of what
//!   happened, so a presentation layer replays them at its own pace
//! - **Bounded**: cascades stop at a depth limit; an exhausted tile supply
//!   leaves cells empty instead of failing
//!
//! # Module Structure
//!
//! - [`grid`]: 8x8 store of optional tiles with bounds-checked access
//! - [`swap`]: swap validation, swipe direction and its short-lived cache
//! - [`gravity`]: slides tiles along a direction and refills the source edge
//! - [`matcher`]: run and shape (L, T, cross) detection
//! - [`cascade`]: clear → flow → re-scan loop with a depth limit
//! - [`momentum`]: the heat scalar and its multiplier
//! - [`scoring`]: per-turn score breakdown
//! - [`queue`]: upcoming tiles and weighted color selection
//! - [`moves`]: move-availability analysis for the anti-frustration guarantee
//! - [`rng`]: seeded generator
//!
//! # Turn Pipeline
//!
//! ```text
//! swap → gravity → match → cascade → heat → score → refill
//! ```
//!
//! # Example
//!
//! ```
//! use gravity_match_core::{GravityResolver, Grid, MatchDetector, TileQueue};
//! use gravity_match_core::types::{Direction, MatchType, QueueConfig};
//!
//! let mut grid = Grid::from_ascii(&[
//!     "RRRRB...",
//!     "R.......",
//!     "R.......",
//!     "........",
//!     "........",
//!     "........",
//!     "........",
//!     "........",
//! ])
//! .unwrap();
//!
//! let matches = MatchDetector::default().detect_all(&grid);
//! assert_eq!(matches.len(), 1);
//! assert_eq!(matches[0].match_type, MatchType::LShape);
//! assert_eq!(matches[0].score, 900);
//!
//! // Refill the empty cells from a queue.
//! let mut queue = TileQueue::new(QueueConfig::default(), 7);
//! GravityResolver::new().apply(&mut grid, Direction::Down, &mut queue);
//! assert_eq!(grid.occupied_count(), 64);
//! ```

pub mod cascade;
pub mod error;
pub mod events;
pub mod gravity;
pub mod grid;
pub mod matcher;
pub mod momentum;
pub mod moves;
pub mod queue;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod swap;

pub use gravity_match_types as types;

// Re-export commonly used types for convenience
pub use cascade::{CascadeChain, CascadeLevel, CascadeResolver, CascadeState};
pub use error::{GridError, SwapError};
pub use events::EngineEvent;
pub use gravity::{GravityResolver, MovementPlan, NewTile, TileSource};
pub use grid::{ColorMap, Grid};
pub use matcher::{MatchData, MatchDetector};
pub use momentum::Momentum;
pub use moves::{available_move_count, find_guaranteed_move, find_moves, SwapMove};
pub use queue::TileQueue;
pub use rng::SimpleRng;
pub use scoring::{ClearedTile, ScoreResult, TurnResult, TurnScoreCalculator};
pub use snapshot::GameSnapshot;
pub use swap::{SwapResolution, SwapResolver};

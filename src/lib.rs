//! Gravity Match (workspace facade crate).
//!
//! Re-exports the member crates as `gravity_match::{types, core, engine}` and
//! hosts the pieces the simulator binary shares with tests: logger setup and
//! configuration loading.

pub mod logging;
pub mod settings;

pub use gravity_match_core as core;
pub use gravity_match_engine as engine;
pub use gravity_match_types as types;

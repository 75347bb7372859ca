use gravity_match_core::types::ConfigError;
use gravity_match_core::{GridError, SwapError};
use thiserror::Error;

/// Failures surfaced by the session API
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Swap(#[from] SwapError),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("no turn is in progress")]
    NoTurnInProgress,
}

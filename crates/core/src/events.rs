//! Engine events - the fire-and-forget surface consumed by collaborators
//!
//! Components queue events as they mutate state; the engine drains them in
//! emission order and hands each one to its observers. Nothing in the core
//! waits on an observer.

use serde::Serialize;

use crate::cascade::CascadeChain;
use crate::matcher::MatchData;
use crate::scoring::ScoreResult;
use crate::types::{ColorType, Direction, HeatBand, Position};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum EngineEvent {
    GravityChanged(Direction),
    GravityComplete,
    MatchesFound(Vec<MatchData>),
    NoMatchesFound,
    CascadeLevelChanged(u32),
    CascadeScoreAdded(f64),
    CascadeCompleted(CascadeChain),
    MomentumChanged(f32),
    HeatLevelChanged { band: HeatBand, heat: f32 },
    MaxHeatReached,
    TurnComplete(ScoreResult),
    TileDrawn(ColorType),
    QueueRefilled,
    GuaranteedMoveGenerated(Position),
    /// The tile supply ran dry and this cell was left empty
    QueueExhausted(Position),
}

impl EngineEvent {
    /// Short stable name, used in logs
    pub fn name(&self) -> &'static str {
        match self {
            EngineEvent::GravityChanged(_) => "gravity_changed",
            EngineEvent::GravityComplete => "gravity_complete",
            EngineEvent::MatchesFound(_) => "matches_found",
            EngineEvent::NoMatchesFound => "no_matches_found",
            EngineEvent::CascadeLevelChanged(_) => "cascade_level_changed",
            EngineEvent::CascadeScoreAdded(_) => "cascade_score_added",
            EngineEvent::CascadeCompleted(_) => "cascade_completed",
            EngineEvent::MomentumChanged(_) => "momentum_changed",
            EngineEvent::HeatLevelChanged { .. } => "heat_level_changed",
            EngineEvent::MaxHeatReached => "max_heat_reached",
            EngineEvent::TurnComplete(_) => "turn_complete",
            EngineEvent::TileDrawn(_) => "tile_drawn",
            EngineEvent::QueueRefilled => "queue_refilled",
            EngineEvent::GuaranteedMoveGenerated(_) => "guaranteed_move_generated",
            EngineEvent::QueueExhausted(_) => "queue_exhausted",
        }
    }
}

//! Scoring module - turns one resolved turn into an integer score
//!
//! ```text
//! base    = Σ tile_base_value × position_multiplier(cleared tile)
//! pattern = 50 if any L/T this turn, + 100 if any cross this turn
//! orb     = 5000 + 500 × orb age         (only when a power orb was cleared)
//! final   = round((base + pattern + orb) × multiplier)
//! ```
//!
//! The multiplier is read after this turn's heat gain and before the
//! end-of-turn decay, which is always the calculator's last step.

use serde::Serialize;

use crate::cascade::CascadeChain;
use crate::momentum::Momentum;
use crate::types::{ColorType, MatchType, Position, ScoringConfig};

/// A tile removed from the grid during the turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClearedTile {
    pub position: Position,
    pub color: ColorType,
    pub power_orb: bool,
    pub age: u32,
}

/// Everything scoring needs to know about a resolved turn
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TurnResult {
    pub cleared_tiles: Vec<ClearedTile>,
    pub match_sizes: Vec<usize>,
    /// Deepest cascade level reached (0 for a plain clear)
    pub cascade_level: u32,
    pub has_l_shape: bool,
    pub has_cross: bool,
    pub power_orb_collected: bool,
    /// Age of the oldest power orb cleared this turn
    pub power_orb_age: u32,
}

impl TurnResult {
    /// Summarize a cascade chain
    pub fn from_chain(chain: &CascadeChain) -> Self {
        let cleared_tiles: Vec<ClearedTile> = chain
            .cleared_tiles()
            .map(|tile| ClearedTile {
                position: tile.position,
                color: tile.color,
                power_orb: tile.is_power_orb(),
                age: tile.age,
            })
            .collect();

        let orb_age = cleared_tiles
            .iter()
            .filter(|t| t.power_orb)
            .map(|t| t.age)
            .max();

        Self {
            match_sizes: chain.matches().map(|m| m.len()).collect(),
            cascade_level: chain.depth(),
            has_l_shape: chain
                .matches()
                .any(|m| matches!(m.match_type, MatchType::LShape | MatchType::TShape)),
            has_cross: chain.matches().any(|m| m.match_type == MatchType::Cross),
            power_orb_collected: orb_age.is_some(),
            power_orb_age: orb_age.unwrap_or(0),
            cleared_tiles,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cleared_tiles.is_empty()
    }
}

/// Score breakdown for one turn
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScoreResult {
    pub base_score: u32,
    pub pattern_bonus: u32,
    pub power_orb_score: u32,
    pub multiplier: f32,
    pub final_score: u64,
    pub heat_gained: f32,
    /// Heat after the end-of-turn decay
    pub final_heat: f32,
}

/// Positional reward surface: 1 on the border, 3 on the four center cells, 2 elsewhere
///
/// # Examples
///
/// ```
/// use gravity_match_core::scoring::position_multiplier;
/// use gravity_match_core::types::Position;
///
/// assert_eq!(position_multiplier(Position::new(0, 5)), 1);
/// assert_eq!(position_multiplier(Position::new(4, 3)), 3);
/// assert_eq!(position_multiplier(Position::new(2, 5)), 2);
/// ```
pub fn position_multiplier(pos: Position) -> u32 {
    if pos.is_edge() {
        1
    } else if pos.is_center() {
        3
    } else {
        2
    }
}

/// Turn score calculator
#[derive(Debug, Clone, Default)]
pub struct TurnScoreCalculator {
    config: ScoringConfig,
}

impl TurnScoreCalculator {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn base_score(&self, turn: &TurnResult) -> u32 {
        turn.cleared_tiles
            .iter()
            .map(|t| self.config.tile_base_value * position_multiplier(t.position))
            .sum()
    }

    /// Flat per-turn bonuses, at most one of each kind
    pub fn pattern_bonus(&self, turn: &TurnResult) -> u32 {
        let mut bonus = 0;
        if turn.has_l_shape {
            bonus += self.config.l_pattern_bonus;
        }
        if turn.has_cross {
            bonus += self.config.cross_pattern_bonus;
        }
        bonus
    }

    pub fn power_orb_score(&self, turn: &TurnResult) -> u32 {
        if !turn.power_orb_collected {
            return 0;
        }
        self.config.power_orb_base + self.config.power_orb_age_bonus * turn.power_orb_age
    }

    /// Score the turn, update heat, then decay it
    pub fn calculate(&self, turn: &TurnResult, momentum: &mut Momentum) -> ScoreResult {
        let base_score = self.base_score(turn);
        let pattern_bonus = self.pattern_bonus(turn);
        let power_orb_score = self.power_orb_score(turn);

        let heat_gained = if turn.power_orb_collected {
            momentum.collect_power_orb()
        } else {
            momentum.accumulate(turn)
        };

        let multiplier = momentum.multiplier();
        let raw = f64::from(base_score + pattern_bonus + power_orb_score);
        let final_score = (raw * f64::from(multiplier)).round() as u64;

        momentum.decay();

        ScoreResult {
            base_score,
            pattern_bonus,
            power_orb_score,
            multiplier,
            final_score,
            heat_gained,
            final_heat: momentum.heat(),
        }
    }
}

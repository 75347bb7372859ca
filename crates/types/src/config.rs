//! Engine configuration
//!
//! Every section derives `serde` so a collaborator can load tuning from a file.
//! Missing fields fall back to the defaults in the crate root.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::*;

/// Rejected configuration values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("queue.visible must be at least 1")]
    EmptyVisibleQueue,
    #[error("queue.max_same_color_in_row must be at least 1")]
    ZeroSameColorLimit,
    #[error("{field} must be within [0, 1], got {value}")]
    OutOfUnitRange { field: &'static str, value: f64 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("momentum.max_heat must be positive, got {0}")]
    NonPositiveMaxHeat(f32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwapConfig {
    pub cache_ttl_ms: u64,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            cache_ttl_ms: SWAP_CACHE_TTL_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Merge crossing runs into L/T/Cross shapes
    pub detect_shapes: bool,
    pub points_per_tile: u32,
    pub l_shape_bonus: f64,
    pub t_shape_bonus: f64,
    pub cross_bonus: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            detect_shapes: true,
            points_per_tile: MATCH_POINTS_PER_TILE,
            l_shape_bonus: L_SHAPE_BONUS,
            t_shape_bonus: T_SHAPE_BONUS,
            cross_bonus: CROSS_BONUS,
        }
    }
}

impl MatchConfig {
    /// Shape bonus for a match type (plain lines are 1.0)
    pub fn bonus(&self, match_type: MatchType) -> f64 {
        match match_type {
            MatchType::Horizontal | MatchType::Vertical => 1.0,
            MatchType::LShape => self.l_shape_bonus,
            MatchType::TShape => self.t_shape_bonus,
            MatchType::Cross => self.cross_bonus,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    pub max_depth: u32,
    pub multiplier: f64,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_CASCADE_DEPTH,
            multiplier: CASCADE_MULTIPLIER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumConfig {
    pub max_heat: f32,
    pub scale: f32,
    pub decay_per_turn: f32,
    /// Heat for a 4-tile match
    pub four_match_heat: f32,
    /// Heat for a match of 5 or more tiles
    pub five_plus_match_heat: f32,
    /// Heat per cascade level reached
    pub cascade_level_heat: f32,
    pub l_shape_heat: f32,
    pub cross_heat: f32,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            max_heat: MAX_HEAT,
            scale: HEAT_SCALE,
            decay_per_turn: HEAT_DECAY,
            four_match_heat: 1.0,
            five_plus_match_heat: 2.0,
            cascade_level_heat: 0.5,
            l_shape_heat: 1.0,
            cross_heat: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub tile_base_value: u32,
    pub l_pattern_bonus: u32,
    pub cross_pattern_bonus: u32,
    pub power_orb_base: u32,
    pub power_orb_age_bonus: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            tile_base_value: TILE_BASE_VALUE,
            l_pattern_bonus: L_PATTERN_BONUS,
            cross_pattern_bonus: CROSS_PATTERN_BONUS,
            power_orb_base: POWER_ORB_BASE_SCORE,
            power_orb_age_bonus: POWER_ORB_AGE_BONUS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    pub visible: usize,
    pub buffer: usize,
    pub history_window: usize,
    pub max_same_color_in_row: u32,
    pub color_distribution_weight: f64,
    pub min_guaranteed_moves: usize,
    pub max_consecutive_no_moves: u32,
    /// When false the queue drains and is never topped up
    pub refill_enabled: bool,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            visible: QUEUE_VISIBLE,
            buffer: QUEUE_BUFFER,
            history_window: COLOR_HISTORY_WINDOW,
            max_same_color_in_row: MAX_SAME_COLOR_IN_ROW,
            color_distribution_weight: COLOR_DISTRIBUTION_WEIGHT,
            min_guaranteed_moves: MIN_GUARANTEED_MOVES,
            max_consecutive_no_moves: MAX_CONSECUTIVE_NO_MOVES,
            refill_enabled: true,
        }
    }
}

impl QueueConfig {
    /// Target queue length after every refill
    pub fn capacity(&self) -> usize {
        self.visible + self.buffer
    }
}

/// Complete engine tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub seed: u32,
    pub power_orb_spawn_chance: f64,
    pub swap: SwapConfig,
    pub matching: MatchConfig,
    pub cascade: CascadeConfig,
    pub momentum: MomentumConfig,
    pub scoring: ScoringConfig,
    pub queue: QueueConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            power_orb_spawn_chance: POWER_ORB_SPAWN_CHANCE,
            swap: SwapConfig::default(),
            matching: MatchConfig::default(),
            cascade: CascadeConfig::default(),
            momentum: MomentumConfig::default(),
            scoring: ScoringConfig::default(),
            queue: QueueConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Default tuning with a specific seed
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Check values the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue.visible == 0 {
            return Err(ConfigError::EmptyVisibleQueue);
        }
        if self.queue.max_same_color_in_row == 0 {
            return Err(ConfigError::ZeroSameColorLimit);
        }
        unit_range("power_orb_spawn_chance", self.power_orb_spawn_chance)?;
        unit_range(
            "queue.color_distribution_weight",
            self.queue.color_distribution_weight,
        )?;
        if self.momentum.max_heat <= 0.0 || self.momentum.max_heat.is_nan() {
            return Err(ConfigError::NonPositiveMaxHeat(self.momentum.max_heat));
        }
        non_negative("momentum.scale", f64::from(self.momentum.scale))?;
        non_negative("momentum.decay_per_turn", f64::from(self.momentum.decay_per_turn))?;
        non_negative("cascade.multiplier", self.cascade.multiplier)?;
        Ok(())
    }
}

fn unit_range(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

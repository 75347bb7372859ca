//! Momentum module - the heat scalar behind the score multiplier
//!
//! Heat lives in `[0, max_heat]` and is only changed through the mutators here.
//! Per turn, gains are applied in a fixed order:
//!
//! | Source | Gain |
//! |--------|------|
//! | match of 4 | +1.0 each |
//! | match of 5+ | +2.0 each |
//! | cascade | +0.5 × deepest level |
//! | any L/T shape | +1.0 |
//! | any cross | +1.5 |
//!
//! Collecting a power orb skips all of the above and pins heat at the ceiling.
//! Every turn ends with a fixed decay.

use serde::Serialize;

use crate::events::EngineEvent;
use crate::scoring::TurnResult;
use crate::types::{HeatBand, MomentumConfig};

/// Heat state machine
#[derive(Debug, Clone, Serialize)]
pub struct Momentum {
    #[serde(skip)]
    config: MomentumConfig,
    heat: f32,
    #[serde(skip)]
    events: Vec<EngineEvent>,
}

impl Momentum {
    pub fn new(config: MomentumConfig) -> Self {
        Self {
            config,
            heat: 0.0,
            events: Vec::new(),
        }
    }

    pub fn heat(&self) -> f32 {
        self.heat
    }

    pub fn max_heat(&self) -> f32 {
        self.config.max_heat
    }

    pub fn band(&self) -> HeatBand {
        HeatBand::from_heat(self.heat, self.config.max_heat)
    }

    /// Current score multiplier: `1 + heat × scale`
    pub fn multiplier(&self) -> f32 {
        self.multiplier_at(self.heat)
    }

    pub fn multiplier_at(&self, heat: f32) -> f32 {
        1.0 + heat * self.config.scale
    }

    /// Add heat, clamped to the ceiling (negative amounts are ignored)
    pub fn add_heat(&mut self, amount: f32) {
        if amount > 0.0 {
            self.set_heat(self.heat + amount);
        }
    }

    /// Apply this turn's gains in their fixed order; returns the heat gained
    pub fn accumulate(&mut self, turn: &TurnResult) -> f32 {
        let before = self.heat;

        let size_heat: f32 = turn
            .match_sizes
            .iter()
            .map(|&size| match size {
                0..=3 => 0.0,
                4 => self.config.four_match_heat,
                _ => self.config.five_plus_match_heat,
            })
            .sum();
        self.add_heat(size_heat);

        self.add_heat(self.config.cascade_level_heat * turn.cascade_level as f32);

        if turn.has_l_shape {
            self.add_heat(self.config.l_shape_heat);
        }
        if turn.has_cross {
            self.add_heat(self.config.cross_heat);
        }

        self.heat - before
    }

    /// Power orb collected: heat jumps straight to the ceiling
    pub fn collect_power_orb(&mut self) -> f32 {
        let before = self.heat;
        self.set_heat(self.config.max_heat);
        self.heat - before
    }

    /// End-of-turn decay, floored at zero
    pub fn decay(&mut self) {
        self.set_heat(self.heat - self.config.decay_per_turn);
    }

    pub fn reset(&mut self) {
        self.set_heat(0.0);
    }

    /// Drain queued events in emission order
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    fn set_heat(&mut self, value: f32) {
        let value = value.clamp(0.0, self.config.max_heat);
        if value == self.heat {
            return;
        }
        let old_band = self.band();
        self.heat = value;
        self.events.push(EngineEvent::MomentumChanged(value));

        let band = self.band();
        if band != old_band {
            self.events.push(EngineEvent::HeatLevelChanged { band, heat: value });
        }
        if value >= self.config.max_heat {
            self.events.push(EngineEvent::MaxHeatReached);
        }
    }
}

impl Default for Momentum {
    fn default() -> Self {
        Self::new(MomentumConfig::default())
    }
}

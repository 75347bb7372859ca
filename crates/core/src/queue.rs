//! Tile queue - upcoming colors and the anti-frustration color picker
//!
//! The queue holds `visible + buffer` pending colors and is topped back up after
//! every draw. New colors are chosen by weighted roulette over a short history
//! of recently generated colors:
//!
//! 1. count each color in the history window
//! 2. drop colors seen `max_same_color_in_row` times or making up more than
//!    `color_distribution_weight` of the window (waived if that drops them all)
//! 3. weight the rest by `max(0.1, 1 - count / max_same_color_in_row)`
//!
//! The history only shapes the distribution; nothing else reads it.

use std::collections::VecDeque;

use log::warn;

use crate::events::EngineEvent;
use crate::gravity::{NewTile, TileSource};
use crate::rng::SimpleRng;
use crate::types::{ColorType, QueueConfig, COLOR_COUNT};

/// Queue of upcoming tile colors
#[derive(Debug, Clone)]
pub struct TileQueue {
    config: QueueConfig,
    pending: VecDeque<ColorType>,
    history: VecDeque<ColorType>,
    rng: SimpleRng,
    events: Vec<EngineEvent>,
}

impl TileQueue {
    /// Create a queue filled to capacity
    pub fn new(config: QueueConfig, seed: u32) -> Self {
        let mut queue = Self {
            pending: VecDeque::with_capacity(config.capacity()),
            history: VecDeque::with_capacity(config.history_window),
            rng: SimpleRng::new(seed),
            events: Vec::new(),
            config,
        };
        queue.refill();
        queue
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn refill_enabled(&self) -> bool {
        self.config.refill_enabled
    }

    pub fn set_refill_enabled(&mut self, enabled: bool) {
        self.config.refill_enabled = enabled;
    }

    /// Take the next color
    ///
    /// Returns `None` only when the queue is empty and refilling is disabled.
    pub fn draw(&mut self) -> Option<ColorType> {
        if self.pending.is_empty() {
            if !self.config.refill_enabled {
                warn!("tile queue exhausted with refill disabled");
                return None;
            }
            self.refill();
        }

        let color = self.pending.pop_front()?;
        self.events.push(EngineEvent::TileDrawn(color));
        if self.config.refill_enabled {
            self.refill();
        }
        Some(color)
    }

    /// Top the queue back up to `visible + buffer`
    pub fn refill(&mut self) {
        let target = self.config.capacity();
        if self.pending.len() >= target {
            return;
        }
        while self.pending.len() < target {
            let color = self.generate_excluding(&[]);
            self.pending.push_back(color);
        }
        self.events.push(EngineEvent::QueueRefilled);
    }

    /// The next `n` colors, front first
    pub fn peek(&self, n: usize) -> Vec<ColorType> {
        self.pending.iter().take(n).copied().collect()
    }

    /// The player-visible prefix
    pub fn visible(&self) -> Vec<ColorType> {
        self.peek(self.config.visible)
    }

    /// Recently generated colors, oldest first
    pub fn history(&self) -> impl Iterator<Item = &ColorType> {
        self.history.iter()
    }

    /// Generate a color outside the queue, avoiding `banned` where possible
    ///
    /// Used when a drawn color would complete a match during board setup.
    pub fn generate_excluding(&mut self, banned: &[ColorType]) -> ColorType {
        let color = self.pick(banned);
        if self.config.history_window > 0 {
            if self.history.len() == self.config.history_window {
                self.history.pop_front();
            }
            self.history.push_back(color);
        }
        color
    }

    /// Drain queued events in emission order
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Start over with a fresh generator
    pub fn reset(&mut self, seed: u32) {
        self.pending.clear();
        self.history.clear();
        self.events.clear();
        self.rng = SimpleRng::new(seed);
        self.refill();
    }

    fn counts(&self) -> [u32; COLOR_COUNT] {
        let mut counts = [0u32; COLOR_COUNT];
        for color in &self.history {
            counts[color.index()] += 1;
        }
        counts
    }

    fn pick(&mut self, banned: &[ColorType]) -> ColorType {
        let counts = self.counts();
        let window = self.history.len();
        let max_same = self.config.max_same_color_in_row.max(1);

        let mut candidates: Vec<ColorType> = ColorType::ALL
            .into_iter()
            .filter(|c| !banned.contains(c))
            .collect();
        if candidates.is_empty() {
            candidates = ColorType::ALL.to_vec();
        }

        let allowed: Vec<ColorType> = candidates
            .iter()
            .copied()
            .filter(|c| {
                let count = counts[c.index()];
                let ratio = if window == 0 {
                    0.0
                } else {
                    f64::from(count) / window as f64
                };
                count < max_same && ratio <= self.config.color_distribution_weight
            })
            .collect();
        let pool = if allowed.is_empty() { candidates } else { allowed };

        let weights: Vec<f64> = pool
            .iter()
            .map(|c| (1.0 - f64::from(counts[c.index()]) / f64::from(max_same)).max(0.1))
            .collect();
        let total: f64 = weights.iter().sum();

        let mut roll = self.rng.next_f64() * total;
        for (color, weight) in pool.iter().zip(&weights) {
            if roll < *weight {
                return *color;
            }
            roll -= weight;
        }
        // Float rounding can leave a sliver past the last bucket.
        pool[pool.len() - 1]
    }
}

impl TileSource for TileQueue {
    fn next_tile(&mut self) -> Option<NewTile> {
        self.draw().map(NewTile::plain)
    }
}

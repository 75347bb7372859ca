//! Cascade module - clear, flow, re-scan until the board settles
//!
//! `Idle → Resolving(0) → … → Resolving(k) → Idle`. Level 0 clears the matches the
//! turn started with; level n exists only if the gravity flow after level n-1
//! produced new matches. Resolution is force-terminated at `max_depth`, so even a
//! board that would cascade forever finishes in bounded work.
//!
//! Level score: `Σ match score × (1 + level × multiplier)`.

use log::{debug, warn};
use serde::Serialize;

use crate::gravity::{GravityResolver, MovementPlan, TileSource};
use crate::grid::Grid;
use crate::matcher::{MatchData, MatchDetector};
use crate::types::{CascadeConfig, Direction, Tile};

/// One level of a cascade
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CascadeLevel {
    pub level: u32,
    pub matches: Vec<MatchData>,
    pub tiles_cleared: u32,
    pub score: f64,
    /// Tiles detached from the grid at this level
    pub cleared: Vec<Tile>,
    /// Gravity pass that followed the clear
    pub movement: MovementPlan,
}

/// Ordered cascade levels for one turn
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CascadeChain {
    pub levels: Vec<CascadeLevel>,
    pub total_score: f64,
    pub total_tiles_cleared: u32,
    /// True if resolution stopped at the depth limit with matches still pending
    pub truncated: bool,
}

impl CascadeChain {
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Deepest level reached (0 for a plain clear or an empty chain)
    pub fn depth(&self) -> u32 {
        self.levels.last().map(|l| l.level).unwrap_or(0)
    }

    pub fn matches(&self) -> impl Iterator<Item = &MatchData> {
        self.levels.iter().flat_map(|l| l.matches.iter())
    }

    pub fn cleared_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.levels.iter().flat_map(|l| l.cleared.iter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum CascadeState {
    #[default]
    Idle,
    Resolving {
        level: u32,
    },
}

/// Cascade resolver
#[derive(Debug, Clone)]
pub struct CascadeResolver {
    config: CascadeConfig,
    state: CascadeState,
}

impl CascadeResolver {
    pub fn new(config: CascadeConfig) -> Self {
        Self {
            config,
            state: CascadeState::Idle,
        }
    }

    pub fn state(&self) -> CascadeState {
        self.state
    }

    /// Score multiplier for a level
    pub fn level_factor(&self, level: u32) -> f64 {
        1.0 + f64::from(level) * self.config.multiplier
    }

    /// Score of one level before it is cleared
    pub fn level_score(&self, level: u32, matches: &[MatchData]) -> f64 {
        let base: f64 = matches.iter().map(|m| f64::from(m.score)).sum();
        base * self.level_factor(level)
    }

    /// Run the cascade starting from `initial`
    pub fn resolve(
        &mut self,
        grid: &mut Grid,
        initial: Vec<MatchData>,
        direction: Direction,
        detector: &MatchDetector,
        gravity: &GravityResolver,
        source: &mut dyn TileSource,
    ) -> CascadeChain {
        let mut chain = CascadeChain::default();
        let mut matches = initial;
        while !matches.is_empty() {
            match self.step(&mut chain, grid, matches, direction, detector, gravity, source) {
                Some(next) => matches = next,
                None => break,
            }
        }
        chain
    }

    /// Resolve the next level of `chain`: clear `matches`, flow, re-scan
    ///
    /// Returns the matches the following level starts from, or `None` once the
    /// board has settled or the depth limit is reached. Callers that need to
    /// act between levels drive this directly instead of [`Self::resolve`].
    #[allow(clippy::too_many_arguments)]
    pub fn step(
        &mut self,
        chain: &mut CascadeChain,
        grid: &mut Grid,
        matches: Vec<MatchData>,
        direction: Direction,
        detector: &MatchDetector,
        gravity: &GravityResolver,
        source: &mut dyn TileSource,
    ) -> Option<Vec<MatchData>> {
        if matches.is_empty() {
            self.state = CascadeState::Idle;
            return None;
        }
        let level = chain.levels.len() as u32;
        self.state = CascadeState::Resolving { level };

        let mut cleared = Vec::new();
        for m in &matches {
            for &pos in &m.positions {
                if let Some(tile) = grid.take(pos) {
                    cleared.push(tile);
                }
            }
        }

        let movement = gravity.apply(grid, direction, source);
        let score = self.level_score(level, &matches);
        let tiles_cleared = cleared.len() as u32;
        debug!(
            "cascade level {}: {} matches, {} tiles, score {:.1}",
            level,
            matches.len(),
            tiles_cleared,
            score
        );

        chain.total_score += score;
        chain.total_tiles_cleared += tiles_cleared;
        chain.levels.push(CascadeLevel {
            level,
            matches,
            tiles_cleared,
            score,
            cleared,
            movement,
        });

        let next = detector.detect_all(grid);
        if next.is_empty() {
            self.state = CascadeState::Idle;
            return None;
        }
        if level >= self.config.max_depth {
            warn!(
                "cascade stopped at depth {} with {} matches pending",
                level,
                next.len()
            );
            chain.truncated = true;
            self.state = CascadeState::Idle;
            return None;
        }
        self.state = CascadeState::Resolving { level: level + 1 };
        Some(next)
    }
}

impl Default for CascadeResolver {
    fn default() -> Self {
        Self::new(CascadeConfig::default())
    }
}

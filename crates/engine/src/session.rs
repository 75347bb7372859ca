//! Game session - one engine context per game
//!
//! `GameEngine` owns the grid, the tile queue and every rule component, and is
//! the only place they are wired together. A turn runs in fixed stages:
//!
//! | Stage | Work | Signal |
//! |-------|------|--------|
//! | Gravity | flow tiles after the swap | `GravityComplete` |
//! | Matching | scan for matches | `MatchesFound` / `NoMatchesFound` |
//! | Cascade | clear, flow, re-scan | `CascadeCompleted` |
//! | Scoring | heat update, score, decay | `TurnComplete` |
//! | Refill | age tiles, anti-frustration check | - |
//!
//! [`GameEngine::begin_swap`] and [`GameEngine::advance`] let a presentation layer
//! pause between stages; [`GameEngine::submit_swap`] runs them all. While a turn is
//! resolving every mutating call is rejected.

use gravity_match_core::cascade::{CascadeChain, CascadeResolver};
use gravity_match_core::gravity::{GravityResolver, MovementPlan, NewTile, TileSource};
use gravity_match_core::grid::Grid;
use gravity_match_core::matcher::{MatchData, MatchDetector};
use gravity_match_core::momentum::Momentum;
use gravity_match_core::moves::{available_move_count, find_guaranteed_move, find_guaranteed_move_at};
use gravity_match_core::queue::TileQueue;
use gravity_match_core::rng::SimpleRng;
use gravity_match_core::scoring::{ScoreResult, TurnResult, TurnScoreCalculator};
use gravity_match_core::snapshot::GameSnapshot;
use gravity_match_core::swap::{SwapResolution, SwapResolver};
use gravity_match_core::types::{ColorType, Direction, EngineConfig, Position, Tile, TileFlags};
use gravity_match_core::{EngineEvent, GridError, SwapError};
use log::{debug, info, warn};
use serde::Serialize;

use crate::error::EngineError;
use crate::observer::EngineObserver;

/// Recolors attempted per anti-frustration pass
const MAX_INJECTIONS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TurnStage {
    Gravity,
    Matching,
    Cascade,
    Scoring,
    Refill,
}

/// What one call to [`GameEngine::advance`] did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StageReport {
    Gravity(MovementPlan),
    Matching(Vec<MatchData>),
    Cascade(CascadeChain),
    Scoring(ScoreResult),
    Complete(TurnOutcome),
}

/// Full record of a resolved turn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnOutcome {
    pub turn: u32,
    pub swap: SwapResolution,
    /// Gravity pass right after the swap
    pub movement: MovementPlan,
    pub chain: CascadeChain,
    pub result: TurnResult,
    pub score: ScoreResult,
    /// Available-move count once the turn settled
    pub available_moves: usize,
    /// Positions recolored by the anti-frustration guarantee
    pub injected: Vec<Position>,
}

#[derive(Debug, Clone)]
struct PendingTurn {
    stage: TurnStage,
    swap: SwapResolution,
    movement: MovementPlan,
    matches: Vec<MatchData>,
    chain: CascadeChain,
    result: TurnResult,
    score: ScoreResult,
}

/// Tile supply for gravity: queue colors, occasionally promoted to power orbs
struct Spawner<'a> {
    queue: &'a mut TileQueue,
    rng: &'a mut SimpleRng,
    chance: f64,
}

impl TileSource for Spawner<'_> {
    fn next_tile(&mut self) -> Option<NewTile> {
        let color = self.queue.draw()?;
        let flags = if self.rng.chance(self.chance) {
            TileFlags::power_orb()
        } else {
            TileFlags::default()
        };
        Some(NewTile { color, flags })
    }
}

/// One game session
pub struct GameEngine {
    config: EngineConfig,
    grid: Grid,
    queue: TileQueue,
    rng: SimpleRng,
    swaps: SwapResolver,
    gravity: GravityResolver,
    detector: MatchDetector,
    cascade: CascadeResolver,
    momentum: Momentum,
    calculator: TurnScoreCalculator,
    gravity_direction: Direction,
    pending: Option<PendingTurn>,
    /// Monotonic episode id (increments on reset).
    episode_id: u32,
    turn: u32,
    score: u64,
    clock_ms: u64,
    no_move_streak: u32,
    outbox: Vec<EngineEvent>,
    observers: Vec<Box<dyn EngineObserver>>,
}

impl GameEngine {
    /// Start a session on a freshly generated board
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let mut engine = Self::bare(config)?;
        engine.generate_board();
        Ok(engine)
    }

    /// Start a session on a fixed board (text form, see `Grid::from_ascii`)
    ///
    /// The board is used as given: no match removal, no move injection.
    pub fn from_layout(config: EngineConfig, rows: &[&str]) -> Result<Self, EngineError> {
        let mut engine = Self::bare(config)?;
        engine.grid = Grid::from_ascii(rows)?;
        engine.drain_components();
        engine.outbox.clear();
        Ok(engine)
    }

    fn bare(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            grid: Grid::new(),
            queue: TileQueue::new(config.queue.clone(), config.seed),
            rng: SimpleRng::new(config.seed.wrapping_add(1)),
            swaps: SwapResolver::new(&config.swap),
            gravity: GravityResolver::new(),
            detector: MatchDetector::new(config.matching.clone()),
            cascade: CascadeResolver::new(config.cascade.clone()),
            momentum: Momentum::new(config.momentum.clone()),
            calculator: TurnScoreCalculator::new(config.scoring.clone()),
            gravity_direction: Direction::Down,
            pending: None,
            episode_id: 0,
            turn: 0,
            score: 0,
            clock_ms: 0,
            no_move_streak: 0,
            outbox: Vec::new(),
            observers: Vec::new(),
            config,
        })
    }

    pub fn add_observer(&mut self, observer: Box<dyn EngineObserver>) {
        self.observers.push(observer);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn heat(&self) -> f32 {
        self.momentum.heat()
    }

    pub fn multiplier(&self) -> f32 {
        self.momentum.multiplier()
    }

    pub fn gravity_direction(&self) -> Direction {
        self.gravity_direction
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn seed(&self) -> u32 {
        self.config.seed
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn is_resolving(&self) -> bool {
        self.pending.is_some()
    }

    /// Next stage [`GameEngine::advance`] will run
    pub fn stage(&self) -> Option<TurnStage> {
        self.pending.as_ref().map(|p| p.stage)
    }

    pub fn available_moves(&self) -> usize {
        available_move_count(&self.grid)
    }

    /// Consecutive settled turns below the guaranteed-move floor
    pub fn no_move_streak(&self) -> u32 {
        self.no_move_streak
    }

    pub fn peek_queue(&self, n: usize) -> Vec<ColorType> {
        self.queue.peek(n)
    }

    pub fn set_queue_refill(&mut self, enabled: bool) {
        self.queue.set_refill_enabled(enabled);
    }

    /// Advance the simulation clock that ages swap cache entries
    pub fn tick(&mut self, elapsed_ms: u64) {
        self.clock_ms = self.clock_ms.saturating_add(elapsed_ms);
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut snapshot = GameSnapshot {
            queue_preview: self.queue.visible(),
            gravity: self.gravity_direction,
            heat: self.momentum.heat(),
            band: self.momentum.band(),
            multiplier: self.momentum.multiplier(),
            score: self.score,
            turn: self.turn,
            episode_id: self.episode_id,
            seed: self.config.seed,
            available_moves: self.available_moves(),
            resolving: self.is_resolving(),
            ..GameSnapshot::default()
        };
        snapshot.fill_board(&self.grid);
        snapshot
    }

    /// Validate a swap, exchange the tiles and set the new gravity direction
    pub fn begin_swap(&mut self, a: Position, b: Position) -> Result<SwapResolution, EngineError> {
        if self.pending.is_some() {
            return Err(SwapError::TurnInProgress.into());
        }
        let swap = self.swaps.preview(a, b, self.clock_ms)?;
        self.grid.swap(a, b)?;
        self.swaps.record(&swap, self.clock_ms);

        self.gravity_direction = swap.gravity;
        debug!(
            "turn {}: swap {} -> {}, gravity {}",
            self.turn + 1,
            a,
            b,
            swap.gravity.as_str()
        );
        self.outbox.push(EngineEvent::GravityChanged(swap.gravity));
        self.pending = Some(PendingTurn {
            stage: TurnStage::Gravity,
            swap,
            movement: MovementPlan::default(),
            matches: Vec::new(),
            chain: CascadeChain::default(),
            result: TurnResult::default(),
            score: ScoreResult::default(),
        });
        self.flush();
        Ok(swap)
    }

    /// Run the next stage of the turn in progress
    pub fn advance(&mut self) -> Result<StageReport, EngineError> {
        let mut pending = self.pending.take().ok_or(EngineError::NoTurnInProgress)?;

        let report = match pending.stage {
            TurnStage::Gravity => {
                let movement = self.flow();
                self.outbox.push(EngineEvent::GravityComplete);
                pending.movement = movement.clone();
                pending.stage = TurnStage::Matching;
                StageReport::Gravity(movement)
            }
            TurnStage::Matching => {
                let matches = self.detector.detect_all(&self.grid);
                debug!("{} matches found", matches.len());
                if matches.is_empty() {
                    self.outbox.push(EngineEvent::NoMatchesFound);
                } else {
                    self.outbox.push(EngineEvent::MatchesFound(matches.clone()));
                }
                pending.matches = matches.clone();
                pending.stage = TurnStage::Cascade;
                StageReport::Matching(matches)
            }
            TurnStage::Cascade => {
                let chain = self.run_cascade(std::mem::take(&mut pending.matches));
                pending.chain = chain.clone();
                pending.stage = TurnStage::Scoring;
                StageReport::Cascade(chain)
            }
            TurnStage::Scoring => {
                let result = TurnResult::from_chain(&pending.chain);
                let score = self.calculator.calculate(&result, &mut self.momentum);
                self.score += score.final_score;
                self.drain_components();
                self.outbox.push(EngineEvent::TurnComplete(score));
                debug!(
                    "turn {} scored {} (x{:.2}), heat {:.1}",
                    self.turn + 1,
                    score.final_score,
                    score.multiplier,
                    score.final_heat
                );
                pending.result = result;
                pending.score = score;
                pending.stage = TurnStage::Refill;
                StageReport::Scoring(score)
            }
            TurnStage::Refill => {
                self.grid.age_tiles();
                let injected = self.ensure_moves();
                self.turn += 1;
                let outcome = TurnOutcome {
                    turn: self.turn,
                    swap: pending.swap,
                    movement: pending.movement,
                    chain: pending.chain,
                    result: pending.result,
                    score: pending.score,
                    available_moves: self.available_moves(),
                    injected,
                };
                self.flush();
                return Ok(StageReport::Complete(outcome));
            }
        };

        self.pending = Some(pending);
        self.flush();
        Ok(report)
    }

    /// Resolve a whole turn
    pub fn submit_swap(&mut self, a: Position, b: Position) -> Result<TurnOutcome, EngineError> {
        self.begin_swap(a, b)?;
        loop {
            if let StageReport::Complete(outcome) = self.advance()? {
                return Ok(outcome);
            }
        }
    }

    /// Make `pos` part of a move by recoloring it; false if no recolor helps
    pub fn force_move_available(&mut self, pos: Position) -> Result<bool, EngineError> {
        self.ensure_idle()?;
        if !pos.in_bounds() {
            return Err(GridError::OutOfBounds(pos).into());
        }
        let Some(color) = find_guaranteed_move_at(&self.grid, pos) else {
            return Ok(false);
        };
        self.grid.recolor(pos, color)?;
        info!("forced move at {} ({})", pos, color.as_str());
        self.outbox.push(EngineEvent::GuaranteedMoveGenerated(pos));
        self.flush();
        Ok(true)
    }

    /// Detach tiles and flow the grid in the current gravity direction
    pub fn clear_tiles(&mut self, positions: &[Position]) -> Result<MovementPlan, EngineError> {
        self.ensure_idle()?;
        if let Some(&bad) = positions.iter().find(|p| !p.in_bounds()) {
            return Err(GridError::OutOfBounds(bad).into());
        }
        for &pos in positions {
            self.grid.take(pos);
        }
        let movement = self.flow();
        self.outbox.push(EngineEvent::GravityComplete);
        self.flush();
        Ok(movement)
    }

    /// Add heat through the normal clamped mutator
    pub fn boost_heat(&mut self, amount: f32) -> Result<(), EngineError> {
        self.ensure_idle()?;
        self.momentum.add_heat(amount);
        self.drain_components();
        self.flush();
        Ok(())
    }

    /// Turn the tile at `pos` into a power orb
    pub fn place_power_orb(&mut self, pos: Position) -> Result<(), EngineError> {
        self.ensure_idle()?;
        self.grid.set_flags(pos, TileFlags::power_orb())?;
        Ok(())
    }

    /// Start a new episode with the same seed
    pub fn reset_for_new_game(&mut self) {
        self.episode_id = self.episode_id.wrapping_add(1);
        self.pending = None;
        self.grid.clear();
        self.queue.reset(self.config.seed);
        self.rng = SimpleRng::new(self.config.seed.wrapping_add(1));
        self.swaps.clear();
        self.momentum.reset();
        self.gravity_direction = Direction::Down;
        self.turn = 0;
        self.score = 0;
        self.clock_ms = 0;
        self.no_move_streak = 0;
        self.generate_board();
        info!("episode {} started (seed {})", self.episode_id, self.config.seed);
    }

    fn ensure_idle(&self) -> Result<(), EngineError> {
        if self.pending.is_some() {
            Err(SwapError::TurnInProgress.into())
        } else {
            Ok(())
        }
    }

    /// Gravity pass in the current direction, reporting cells left empty
    fn flow(&mut self) -> MovementPlan {
        let mut spawner = Spawner {
            queue: &mut self.queue,
            rng: &mut self.rng,
            chance: self.config.power_orb_spawn_chance,
        };
        let movement = self
            .gravity
            .apply(&mut self.grid, self.gravity_direction, &mut spawner);
        self.drain_components();
        for &pos in &movement.unfilled {
            self.outbox.push(EngineEvent::QueueExhausted(pos));
        }
        movement
    }

    /// Cascade driven level by level so each level's draws follow its signals
    fn run_cascade(&mut self, matches: Vec<MatchData>) -> CascadeChain {
        let mut chain = CascadeChain::default();
        if matches.is_empty() {
            return chain;
        }

        let mut pending = matches;
        while !pending.is_empty() {
            let level = chain.levels.len() as u32;
            let score = self.cascade.level_score(level, &pending);
            self.outbox.push(EngineEvent::CascadeLevelChanged(level));
            self.outbox.push(EngineEvent::CascadeScoreAdded(score));

            let mut spawner = Spawner {
                queue: &mut self.queue,
                rng: &mut self.rng,
                chance: self.config.power_orb_spawn_chance,
            };
            let next = self.cascade.step(
                &mut chain,
                &mut self.grid,
                pending,
                self.gravity_direction,
                &self.detector,
                &self.gravity,
                &mut spawner,
            );

            self.drain_components();
            if let Some(resolved) = chain.levels.last() {
                for &pos in &resolved.movement.unfilled {
                    self.outbox.push(EngineEvent::QueueExhausted(pos));
                }
            }
            pending = next.unwrap_or_default();
        }

        self.outbox.push(EngineEvent::CascadeCompleted(chain.clone()));
        chain
    }

    /// Anti-frustration check run once per settled turn
    fn ensure_moves(&mut self) -> Vec<Position> {
        let floor = self.config.queue.min_guaranteed_moves;
        if available_move_count(&self.grid) >= floor {
            self.no_move_streak = 0;
            return Vec::new();
        }

        self.no_move_streak += 1;
        if self.no_move_streak < self.config.queue.max_consecutive_no_moves {
            debug!("move floor missed ({} in a row)", self.no_move_streak);
            return Vec::new();
        }

        let injected = self.inject_moves(floor);
        if available_move_count(&self.grid) >= floor {
            self.no_move_streak = 0;
        }
        injected
    }

    /// Recolor tiles until at least `floor` positions have a move
    fn inject_moves(&mut self, floor: usize) -> Vec<Position> {
        let mut injected = Vec::new();
        for _ in 0..MAX_INJECTIONS {
            if available_move_count(&self.grid) >= floor {
                break;
            }
            let Some((pos, color)) = find_guaranteed_move(&self.grid) else {
                warn!("no recolor adds a move; board stays below the floor");
                break;
            };
            if let Err(err) = self.grid.recolor(pos, color) {
                warn!("guaranteed move at {} failed: {}", pos, err);
                break;
            }
            info!("guaranteed move generated at {} ({})", pos, color.as_str());
            self.outbox.push(EngineEvent::GuaranteedMoveGenerated(pos));
            injected.push(pos);
        }
        injected
    }

    /// Fill the grid from the queue without ready-made matches
    fn generate_board(&mut self) {
        for pos in Position::all() {
            let drawn = match self.queue.draw() {
                Some(color) => color,
                None => {
                    warn!("tile queue exhausted during board setup at {}", pos);
                    continue;
                }
            };
            let banned = self.completing_colors(pos);
            let color = if banned.contains(&drawn) {
                self.queue.generate_excluding(&banned)
            } else {
                drawn
            };
            // In bounds by construction.
            if let Err(err) = self.grid.place(pos, Tile::new(color, pos)) {
                warn!("board setup could not place {}: {}", pos, err);
            }
        }

        let floor = self.config.queue.min_guaranteed_moves;
        self.inject_moves(floor);
        self.drain_components();
        self.flush();
        debug!("board ready with {} available moves", self.available_moves());
    }

    /// Colors that would complete a run ending at `pos` during row-major setup
    fn completing_colors(&self, pos: Position) -> Vec<ColorType> {
        let mut banned = Vec::new();
        for direction in [Direction::Left, Direction::Up] {
            let one = pos.step(direction);
            let two = one.step(direction);
            if let (Some(c1), Some(c2)) = (self.grid.color_at(one), self.grid.color_at(two)) {
                if c1 == c2 && !banned.contains(&c1) {
                    banned.push(c1);
                }
            }
        }
        banned
    }

    /// Move queued component events into the outbox
    fn drain_components(&mut self) {
        self.outbox.extend(self.queue.take_events());
        self.outbox.extend(self.momentum.take_events());
    }

    fn flush(&mut self) {
        for event in self.outbox.drain(..) {
            for observer in &mut self.observers {
                observer.on_event(&event);
            }
        }
    }
}

impl std::fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEngine")
            .field("episode_id", &self.episode_id)
            .field("turn", &self.turn)
            .field("score", &self.score)
            .field("heat", &self.momentum.heat())
            .field("gravity", &self.gravity_direction)
            .field("stage", &self.stage())
            .field("observers", &self.observers.len())
            .finish()
    }
}

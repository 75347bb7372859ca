//! Swap module - turns a two-tile swipe into a gravity direction
//!
//! The swipe direction is the dominant axis of `b - a` (horizontal wins ties).
//! Gravity always flows the opposite way. Resolved swaps are cached for a short
//! time-to-live measured on the engine's simulation clock; a stale entry is
//! treated as absent.

use serde::Serialize;

use crate::error::SwapError;
use crate::types::{Direction, Position, SwapConfig};

/// A cached swap and the swipe direction derived from it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SwapCacheEntry {
    pub pos_a: Position,
    pub pos_b: Position,
    pub direction: Direction,
    pub created_at_ms: u64,
}

impl SwapCacheEntry {
    fn is_fresh(&self, now_ms: u64, ttl_ms: u64) -> bool {
        now_ms.saturating_sub(self.created_at_ms) < ttl_ms
    }
}

/// Outcome of resolving one swap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SwapResolution {
    pub pos_a: Position,
    pub pos_b: Position,
    /// Direction the player swiped
    pub swap: Direction,
    /// Direction tiles will flow (always `swap.opposite()`)
    pub gravity: Direction,
    /// True if the direction came from a fresh cache entry
    pub cached: bool,
}

/// Reject swaps that are off-grid, degenerate or not adjacent
pub fn validate_swap(a: Position, b: Position) -> Result<(), SwapError> {
    if !a.in_bounds() {
        return Err(SwapError::OutOfBounds(a));
    }
    if !b.in_bounds() {
        return Err(SwapError::OutOfBounds(b));
    }
    match a.chebyshev(b) {
        0 => Err(SwapError::SameCell(a)),
        1 => Ok(()),
        _ => Err(SwapError::NotAdjacent { a, b }),
    }
}

/// Swipe direction from `a` to `b`
///
/// # Examples
///
/// ```
/// use gravity_match_core::swap::swap_direction;
/// use gravity_match_core::types::{Direction, Position};
///
/// let a = Position::new(3, 3);
/// assert_eq!(swap_direction(a, Position::new(4, 3)), Ok(Direction::Right));
/// assert_eq!(swap_direction(a, Position::new(3, 2)), Ok(Direction::Up));
/// // Diagonal: horizontal wins the tie
/// assert_eq!(swap_direction(a, Position::new(2, 4)), Ok(Direction::Left));
/// ```
pub fn swap_direction(a: Position, b: Position) -> Result<Direction, SwapError> {
    validate_swap(a, b)?;
    let dx = i16::from(b.x) - i16::from(a.x);
    let dy = i16::from(b.y) - i16::from(a.y);
    let direction = if dx.abs() >= dy.abs() {
        if dx > 0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if dy > 0 {
        Direction::Down
    } else {
        Direction::Up
    };
    Ok(direction)
}

/// Swap/direction resolver with a short-lived cache
#[derive(Debug, Clone)]
pub struct SwapResolver {
    ttl_ms: u64,
    cache: Vec<SwapCacheEntry>,
}

impl SwapResolver {
    pub fn new(config: &SwapConfig) -> Self {
        Self {
            ttl_ms: config.cache_ttl_ms,
            cache: Vec::new(),
        }
    }

    /// Resolve a swap into its swipe and gravity directions and cache it
    pub fn resolve(
        &mut self,
        a: Position,
        b: Position,
        now_ms: u64,
    ) -> Result<SwapResolution, SwapError> {
        let resolution = self.preview(a, b, now_ms)?;
        self.record(&resolution, now_ms);
        Ok(resolution)
    }

    /// Resolve a swap without touching the cache
    pub fn preview(
        &self,
        a: Position,
        b: Position,
        now_ms: u64,
    ) -> Result<SwapResolution, SwapError> {
        validate_swap(a, b)?;
        let (swap, cached) = match self.cached(a, b, now_ms) {
            Direction::None => (swap_direction(a, b)?, false),
            direction => (direction, true),
        };
        Ok(SwapResolution {
            pos_a: a,
            pos_b: b,
            swap,
            gravity: swap.opposite(),
            cached,
        })
    }

    /// Store a previewed swap; a cache hit keeps its original timestamp
    pub fn record(&mut self, resolution: &SwapResolution, now_ms: u64) {
        self.prune(now_ms);
        if resolution.cached {
            return;
        }
        self.cache.push(SwapCacheEntry {
            pos_a: resolution.pos_a,
            pos_b: resolution.pos_b,
            direction: resolution.swap,
            created_at_ms: now_ms,
        });
    }

    /// Cached swipe direction, or `Direction::None` if absent or stale
    pub fn cached(&self, a: Position, b: Position, now_ms: u64) -> Direction {
        self.cache
            .iter()
            .find(|e| e.pos_a == a && e.pos_b == b && e.is_fresh(now_ms, self.ttl_ms))
            .map(|e| e.direction)
            .unwrap_or(Direction::None)
    }

    /// Drop stale entries
    pub fn prune(&mut self, now_ms: u64) {
        let ttl = self.ttl_ms;
        self.cache.retain(|e| e.is_fresh(now_ms, ttl));
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

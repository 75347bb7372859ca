//! Greedy move picker for headless play

use gravity_match_core::grid::Grid;
use gravity_match_core::moves::find_moves;
use gravity_match_core::types::Position;

/// A swap request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swap {
    pub a: Position,
    pub b: Position,
}

impl Swap {
    pub fn new(a: Position, b: Position) -> Self {
        Self { a, b }
    }

    /// Same tiles, opposite swipe (and so opposite gravity)
    pub fn reversed(self) -> Self {
        Self {
            a: self.b,
            b: self.a,
        }
    }
}

/// Swap creating the longest immediate run; first found wins ties
///
/// With no move on the board, falls back to swapping the two top-left tiles.
pub fn pick_swap(grid: &Grid) -> Swap {
    let mut best: Option<(usize, Swap)> = None;
    for m in find_moves(grid) {
        if best.map_or(true, |(run, _)| m.best_run > run) {
            best = Some((m.best_run, Swap::new(m.a, m.b)));
        }
    }
    best.map(|(_, swap)| swap)
        .unwrap_or_else(|| Swap::new(Position::new(0, 0), Position::new(1, 0)))
}

//! Gravity module - slides tiles along the gravity direction
//!
//! Each row (horizontal gravity) or column (vertical gravity) is scanned from the
//! target edge towards the source edge. Tiles nearest the target settle first, so
//! every later tile slides until it meets an already-settled tile and no two tiles
//! ever claim the same destination. Cells left empty at the source edge are then
//! filled from a [`TileSource`].
//!
//! The result is a [`MovementPlan`]: a complete record of what moved and what
//! spawned, for a presentation layer to replay at its own pace.

use arrayvec::ArrayVec;
use log::warn;
use serde::Serialize;

use crate::grid::Grid;
use crate::types::{
    ColorType, Direction, Position, Tile, TileFlags, GRID_CELLS, GRID_HEIGHT, GRID_WIDTH,
};

/// A tile entering the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewTile {
    pub color: ColorType,
    pub flags: TileFlags,
}

impl NewTile {
    pub fn plain(color: ColorType) -> Self {
        Self {
            color,
            flags: TileFlags::default(),
        }
    }
}

/// Supplier of tiles for vacated cells
///
/// Returning `None` means the supply is exhausted; the cell stays empty.
pub trait TileSource {
    fn next_tile(&mut self) -> Option<NewTile>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TileMove {
    pub from: Position,
    pub to: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TileSpawn {
    pub position: Position,
    pub color: ColorType,
    pub power_orb: bool,
}

/// Everything one gravity pass did to the grid
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MovementPlan {
    pub direction: Direction,
    pub moves: ArrayVec<TileMove, GRID_CELLS>,
    pub spawns: ArrayVec<TileSpawn, GRID_CELLS>,
    /// Cells the tile source could not fill
    pub unfilled: ArrayVec<Position, GRID_CELLS>,
}

impl MovementPlan {
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty() && self.spawns.is_empty() && self.unfilled.is_empty()
    }
}

/// Gravity flow resolver
#[derive(Debug, Clone, Copy, Default)]
pub struct GravityResolver;

impl GravityResolver {
    pub fn new() -> Self {
        Self
    }

    /// Slide every tile along `direction` and refill the source edge
    pub fn apply(
        &self,
        grid: &mut Grid,
        direction: Direction,
        source: &mut dyn TileSource,
    ) -> MovementPlan {
        let mut plan = MovementPlan {
            direction,
            ..MovementPlan::default()
        };
        if direction == Direction::None {
            return plan;
        }

        let lanes = if direction.is_horizontal() {
            GRID_HEIGHT
        } else {
            GRID_WIDTH
        };
        for lane in 0..lanes as i8 {
            let order = lane_order(direction, lane);

            // Compact towards the target edge.
            let mut write = 0usize;
            for read in 0..order.len() {
                let from = order[read];
                if !grid.is_occupied(from) {
                    continue;
                }
                let to = order[write];
                if from != to && grid.move_tile(from, to).is_ok() {
                    plan.moves.push(TileMove { from, to });
                }
                write += 1;
            }

            // Whatever is left is contiguous at the source edge.
            for &position in &order[write..] {
                match source.next_tile() {
                    Some(new_tile) => {
                        let tile = Tile::with_flags(new_tile.color, position, new_tile.flags);
                        if grid.place(position, tile).is_ok() {
                            plan.spawns.push(TileSpawn {
                                position,
                                color: new_tile.color,
                                power_orb: new_tile.flags.is_power_orb(),
                            });
                        }
                    }
                    None => {
                        warn!("tile source exhausted; leaving {} empty", position);
                        plan.unfilled.push(position);
                    }
                }
            }
        }

        plan
    }
}

/// Positions of one row/column ordered from the target edge to the source edge
fn lane_order(direction: Direction, lane: i8) -> ArrayVec<Position, 8> {
    let w = GRID_WIDTH as i8;
    let h = GRID_HEIGHT as i8;
    match direction {
        Direction::Down => (0..h).rev().map(|y| Position::new(lane, y)).collect(),
        Direction::Up => (0..h).map(|y| Position::new(lane, y)).collect(),
        Direction::Right => (0..w).rev().map(|x| Position::new(x, lane)).collect(),
        Direction::Left => (0..w).map(|x| Position::new(x, lane)).collect(),
        Direction::None => ArrayVec::new(),
    }
}

use serde::Serialize;

use crate::grid::{ColorMap, Grid};
use crate::types::{ColorType, Direction, HeatBand, Position, GRID_HEIGHT, GRID_WIDTH};

/// Read-only view of a session for presentation collaborators
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub board: ColorMap,
    /// Positions holding a power orb
    pub power_orbs: Vec<Position>,
    pub queue_preview: Vec<ColorType>,
    pub gravity: Direction,
    pub heat: f32,
    pub band: HeatBand,
    pub multiplier: f32,
    pub score: u64,
    pub turn: u32,
    pub episode_id: u32,
    pub seed: u32,
    pub available_moves: usize,
    pub resolving: bool,
}

impl GameSnapshot {
    /// Copy the board half of a snapshot out of the grid
    pub fn fill_board(&mut self, grid: &Grid) {
        self.board = grid.color_map();
        self.power_orbs = grid
            .tiles()
            .filter(|t| t.is_power_orb())
            .map(|t| t.position)
            .collect();
    }

    pub fn color_at(&self, pos: Position) -> Option<ColorType> {
        if !pos.in_bounds() {
            return None;
        }
        self.board[pos.y as usize][pos.x as usize]
    }

    /// Rows in the text form used by `Grid::from_ascii`
    pub fn rows(&self) -> Vec<String> {
        self.board
            .iter()
            .enumerate()
            .map(|(y, row)| {
                row.iter()
                    .enumerate()
                    .map(|(x, cell)| match cell {
                        Some(color) if self.power_orbs.contains(&Position::new(x as i8, y as i8)) => {
                            color.letter().to_ascii_lowercase()
                        }
                        Some(color) => color.letter(),
                        None => '.',
                    })
                    .collect()
            })
            .collect()
    }

    pub fn playable(&self) -> bool {
        !self.resolving
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[None; GRID_WIDTH as usize]; GRID_HEIGHT as usize],
            power_orbs: Vec::new(),
            queue_preview: Vec::new(),
            gravity: Direction::None,
            heat: 0.0,
            band: HeatBand::Cold,
            multiplier: 1.0,
            score: 0,
            turn: 0,
            episode_id: 0,
            seed: 0,
            available_moves: 0,
            resolving: false,
        }
    }
}

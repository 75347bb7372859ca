//! Grid module - owns the 8x8 array of optional tiles
//!
//! Uses a flat array for cache locality. Coordinates: (x, y) where x ranges 0..7
//! (left to right) and y ranges 0..7 (top to bottom).
//!
//! Tiles are owned by the cell they sit in. Moving a tile takes it out of one
//! cell and places it in another; nothing here clones a tile.

use crate::error::GridError;
use crate::types::{Cell, ColorType, Position, Tile, TileFlags, GRID_CELLS, GRID_HEIGHT, GRID_WIDTH};

/// Plain color view of the grid, indexed `[y][x]`
pub type ColorMap = [[Option<ColorType>; GRID_WIDTH as usize]; GRID_HEIGHT as usize];

/// The game grid - 8 columns x 8 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; GRID_CELLS],
}

impl Grid {
    /// Create a new empty grid
    pub fn new() -> Self {
        Self {
            cells: std::array::from_fn(|_| None),
        }
    }

    /// Calculate flat index from a position
    #[inline(always)]
    fn index(pos: Position) -> Option<usize> {
        if !pos.in_bounds() {
            return None;
        }
        Some((pos.y as usize) * (GRID_WIDTH as usize) + (pos.x as usize))
    }

    pub fn width(&self) -> u8 {
        GRID_WIDTH
    }

    pub fn height(&self) -> u8 {
        GRID_HEIGHT
    }

    /// Get the cell at a position
    /// Returns None if out of bounds
    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        Self::index(pos).map(|idx| &self.cells[idx])
    }

    /// Tile at a position (None if empty or out of bounds)
    pub fn tile(&self, pos: Position) -> Option<&Tile> {
        self.cell(pos).and_then(|cell| cell.as_ref())
    }

    pub fn color_at(&self, pos: Position) -> Option<ColorType> {
        self.tile(pos).map(|tile| tile.color)
    }

    /// Check if position is within bounds and empty
    pub fn is_vacant(&self, pos: Position) -> bool {
        matches!(self.cell(pos), Some(None))
    }

    /// Check if position is within bounds and filled
    pub fn is_occupied(&self, pos: Position) -> bool {
        matches!(self.cell(pos), Some(Some(_)))
    }

    /// Put a tile into a cell, returning whatever tile it displaced
    pub fn place(&mut self, pos: Position, mut tile: Tile) -> Result<Option<Tile>, GridError> {
        let idx = Self::index(pos).ok_or(GridError::OutOfBounds(pos))?;
        tile.position = pos;
        Ok(self.cells[idx].replace(tile))
    }

    /// Detach the tile at a position, leaving the cell empty
    pub fn take(&mut self, pos: Position) -> Option<Tile> {
        Self::index(pos).and_then(|idx| self.cells[idx].take())
    }

    /// Transfer a tile into an empty cell
    pub fn move_tile(&mut self, from: Position, to: Position) -> Result<(), GridError> {
        let src = Self::index(from).ok_or(GridError::OutOfBounds(from))?;
        let dst = Self::index(to).ok_or(GridError::OutOfBounds(to))?;
        if self.cells[dst].is_some() {
            return Err(GridError::Occupied(to));
        }
        let mut tile = self.cells[src].take().ok_or(GridError::Empty(from))?;
        tile.position = to;
        self.cells[dst] = Some(tile);
        Ok(())
    }

    /// Exchange the contents of two cells (either may be empty)
    pub fn swap(&mut self, a: Position, b: Position) -> Result<(), GridError> {
        let ia = Self::index(a).ok_or(GridError::OutOfBounds(a))?;
        let ib = Self::index(b).ok_or(GridError::OutOfBounds(b))?;
        self.cells.swap(ia, ib);
        if let Some(tile) = self.cells[ia].as_mut() {
            tile.position = a;
        }
        if let Some(tile) = self.cells[ib].as_mut() {
            tile.position = b;
        }
        Ok(())
    }

    /// Repaint the tile at a position in place
    pub fn recolor(&mut self, pos: Position, color: ColorType) -> Result<(), GridError> {
        let idx = Self::index(pos).ok_or(GridError::OutOfBounds(pos))?;
        let tile = self.cells[idx].as_mut().ok_or(GridError::Empty(pos))?;
        tile.color = color;
        Ok(())
    }

    /// Replace the flags of the tile at a position
    pub fn set_flags(&mut self, pos: Position, flags: TileFlags) -> Result<(), GridError> {
        let idx = Self::index(pos).ok_or(GridError::OutOfBounds(pos))?;
        let tile = self.cells[idx].as_mut().ok_or(GridError::Empty(pos))?;
        tile.flags = flags;
        Ok(())
    }

    /// Iterate all tiles in row-major order
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.cells.iter().filter_map(|cell| cell.as_ref())
    }

    pub fn occupied_count(&self) -> usize {
        self.tiles().count()
    }

    pub fn empty_positions(&self) -> Vec<Position> {
        Position::all().filter(|&pos| self.is_vacant(pos)).collect()
    }

    /// Age every tile by one turn
    pub fn age_tiles(&mut self) {
        for tile in self.cells.iter_mut().flatten() {
            tile.age = tile.age.saturating_add(1);
        }
    }

    /// Snapshot of tile colors, indexed `[y][x]`
    pub fn color_map(&self) -> ColorMap {
        let mut map: ColorMap = [[None; GRID_WIDTH as usize]; GRID_HEIGHT as usize];
        for tile in self.tiles() {
            map[tile.position.y as usize][tile.position.x as usize] = Some(tile.color);
        }
        map
    }

    /// Clear the entire grid
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Parse the text form: one row per string, one letter per cell.
    ///
    /// `R B G Y P O` are colors, lowercase marks a power orb of that color,
    /// `.` is an empty cell. Whitespace inside a row is ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use gravity_match_core::Grid;
    /// use gravity_match_core::types::{ColorType, Position};
    ///
    /// let grid = Grid::from_ascii(&[
    ///     "RRRB....",
    ///     "........",
    ///     "........",
    ///     "........",
    ///     "........",
    ///     "........",
    ///     "........",
    ///     ".......g",
    /// ])
    /// .unwrap();
    /// assert_eq!(grid.color_at(Position::new(3, 0)), Some(ColorType::Blue));
    /// assert!(grid.tile(Position::new(7, 7)).unwrap().is_power_orb());
    /// ```
    pub fn from_ascii(rows: &[&str]) -> Result<Self, GridError> {
        let shape = GridError::BadShape {
            rows: GRID_HEIGHT as usize,
            cols: GRID_WIDTH as usize,
        };
        if rows.len() != GRID_HEIGHT as usize {
            return Err(shape);
        }

        let mut grid = Self::new();
        for (y, row) in rows.iter().enumerate() {
            let letters: Vec<char> = row.chars().filter(|c| !c.is_whitespace()).collect();
            if letters.len() != GRID_WIDTH as usize {
                return Err(shape);
            }
            for (x, letter) in letters.into_iter().enumerate() {
                let position = Position::new(x as i8, y as i8);
                if letter == '.' {
                    continue;
                }
                let color = ColorType::from_letter(letter)
                    .ok_or(GridError::UnknownLetter { letter, position })?;
                let flags = if letter.is_ascii_lowercase() {
                    TileFlags::power_orb()
                } else {
                    TileFlags::default()
                };
                grid.place(position, Tile::with_flags(color, position, flags))?;
            }
        }
        Ok(grid)
    }

    /// Render the text form accepted by [`Grid::from_ascii`]
    pub fn to_ascii(&self) -> Vec<String> {
        (0..GRID_HEIGHT as i8)
            .map(|y| {
                (0..GRID_WIDTH as i8)
                    .map(|x| match self.tile(Position::new(x, y)) {
                        Some(tile) if tile.is_power_orb() => tile.color.letter().to_ascii_lowercase(),
                        Some(tile) => tile.color.letter(),
                        None => '.',
                    })
                    .collect()
            })
            .collect()
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red(x: i8, y: i8) -> Tile {
        Tile::new(ColorType::Red, Position::new(x, y))
    }

    #[test]
    fn test_grid_index_calculation() {
        assert_eq!(Grid::index(Position::new(0, 0)), Some(0));
        assert_eq!(Grid::index(Position::new(7, 0)), Some(7));
        assert_eq!(Grid::index(Position::new(0, 1)), Some(8));
        assert_eq!(Grid::index(Position::new(7, 7)), Some(63));
        assert_eq!(Grid::index(Position::new(-1, 0)), None);
        assert_eq!(Grid::index(Position::new(8, 0)), None);
        assert_eq!(Grid::index(Position::new(0, 8)), None);
    }

    #[test]
    fn test_place_sets_tile_position() {
        let mut grid = Grid::new();
        let displaced = grid.place(Position::new(2, 5), red(0, 0)).unwrap();
        assert!(displaced.is_none());
        assert_eq!(grid.tile(Position::new(2, 5)).unwrap().position, Position::new(2, 5));
    }

    #[test]
    fn test_place_out_of_bounds() {
        let mut grid = Grid::new();
        let pos = Position::new(8, 1);
        assert_eq!(grid.place(pos, red(0, 0)), Err(GridError::OutOfBounds(pos)));
    }

    #[test]
    fn test_move_tile_transfers_ownership() {
        let mut grid = Grid::new();
        grid.place(Position::new(1, 1), red(1, 1)).unwrap();
        grid.move_tile(Position::new(1, 1), Position::new(1, 6)).unwrap();

        assert!(grid.is_vacant(Position::new(1, 1)));
        assert_eq!(grid.tile(Position::new(1, 6)).unwrap().position, Position::new(1, 6));
        assert_eq!(grid.occupied_count(), 1);
    }

    #[test]
    fn test_move_tile_rejects_occupied_destination() {
        let mut grid = Grid::new();
        grid.place(Position::new(0, 0), red(0, 0)).unwrap();
        grid.place(Position::new(0, 1), red(0, 1)).unwrap();
        assert_eq!(
            grid.move_tile(Position::new(0, 0), Position::new(0, 1)),
            Err(GridError::Occupied(Position::new(0, 1)))
        );
        assert_eq!(
            grid.move_tile(Position::new(3, 3), Position::new(4, 4)),
            Err(GridError::Empty(Position::new(3, 3)))
        );
    }

    #[test]
    fn test_swap_with_empty_cell() {
        let mut grid = Grid::new();
        grid.place(Position::new(0, 0), red(0, 0)).unwrap();
        grid.swap(Position::new(0, 0), Position::new(1, 0)).unwrap();
        assert!(grid.is_vacant(Position::new(0, 0)));
        assert_eq!(grid.tile(Position::new(1, 0)).unwrap().position, Position::new(1, 0));
    }

    #[test]
    fn test_ascii_roundtrip() {
        let rows = [
            "RBGYPORB", "........", "..r.....", "........", "........", "........",
            "........", "OOOOOOOO",
        ];
        let grid = Grid::from_ascii(&rows).unwrap();
        assert_eq!(grid.to_ascii(), rows.iter().map(|r| r.to_string()).collect::<Vec<_>>());
    }

    #[test]
    fn test_ascii_rejects_bad_input() {
        assert!(matches!(Grid::from_ascii(&["RRR"]), Err(GridError::BadShape { .. })));
        let mut rows = vec!["........"; 8];
        rows[3] = "...X....";
        assert_eq!(
            Grid::from_ascii(&rows),
            Err(GridError::UnknownLetter {
                letter: 'X',
                position: Position::new(3, 3)
            })
        );
    }

    #[test]
    fn test_recolor_keeps_tile_in_place() {
        let mut grid = Grid::new();
        grid.place(Position::new(2, 2), red(2, 2)).unwrap();
        grid.recolor(Position::new(2, 2), ColorType::Blue).unwrap();
        assert_eq!(grid.color_at(Position::new(2, 2)), Some(ColorType::Blue));
        assert_eq!(
            grid.recolor(Position::new(3, 3), ColorType::Blue),
            Err(GridError::Empty(Position::new(3, 3)))
        );
    }

    #[test]
    fn test_age_tiles() {
        let mut grid = Grid::new();
        grid.place(Position::new(4, 4), red(4, 4)).unwrap();
        grid.age_tiles();
        grid.age_tiles();
        assert_eq!(grid.tile(Position::new(4, 4)).unwrap().age, 2);
    }
}

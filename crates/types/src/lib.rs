//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are plain data with no behaviour beyond small conversions, making them
//! usable in any context (core simulation, presentation collaborators, logging).
//!
//! # Grid Dimensions
//!
//! - **Width**: 8 columns (indexed 0-7, left to right)
//! - **Height**: 8 rows (indexed 0-7, top to bottom)
//!
//! # Default Tuning
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MIN_MATCH_LEN` | 3 | Shortest run that counts as a match |
//! | `MATCH_POINTS_PER_TILE` | 100 | Match-detector score per matched cell |
//! | `MAX_HEAT` | 10.0 | Heat ceiling |
//! | `HEAT_SCALE` | 0.9 | Multiplier gained per heat point |
//! | `HEAT_DECAY` | 1.0 | Heat lost at the end of every turn |
//! | `MAX_CASCADE_DEPTH` | 10 | Deepest cascade level resolved in one turn |
//! | `SWAP_CACHE_TTL_MS` | 1000 | Lifetime of a cached swap direction |
//!
//! # Examples
//!
//! ```
//! use gravity_match_types::{ColorType, Direction, Position, GRID_WIDTH};
//!
//! // Gravity always flows against the swipe.
//! assert_eq!(Direction::Right.opposite(), Direction::Left);
//!
//! // Colors round-trip through their letter form.
//! assert_eq!(ColorType::from_letter('g'), Some(ColorType::Green));
//!
//! // Positions know whether they sit on the grid.
//! assert!(Position::new(7, 0).in_bounds());
//! assert!(!Position::new(GRID_WIDTH as i8, 0).in_bounds());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod config;

pub use config::{
    CascadeConfig, ConfigError, EngineConfig, MatchConfig, MomentumConfig, QueueConfig,
    ScoringConfig, SwapConfig,
};

/// Grid width in cells (8 columns)
pub const GRID_WIDTH: u8 = 8;

/// Grid height in cells (8 rows)
pub const GRID_HEIGHT: u8 = 8;

/// Total number of cells on the grid
pub const GRID_CELLS: usize = GRID_WIDTH as usize * GRID_HEIGHT as usize;

/// Number of distinct tile colors
pub const COLOR_COUNT: usize = 6;

/// Shortest same-color run that forms a match
pub const MIN_MATCH_LEN: usize = 3;

/// Match-detector points per matched cell (before shape bonus)
pub const MATCH_POINTS_PER_TILE: u32 = 100;

/// Shape bonus multipliers applied by the match detector
pub const L_SHAPE_BONUS: f64 = 1.5;
pub const T_SHAPE_BONUS: f64 = 1.8;
pub const CROSS_BONUS: f64 = 2.0;

/// Swap cache time-to-live (1 second of simulation clock)
pub const SWAP_CACHE_TTL_MS: u64 = 1000;

/// Cascade limits
pub const MAX_CASCADE_DEPTH: u32 = 10;
pub const CASCADE_MULTIPLIER: f64 = 1.5;

/// Momentum tuning
pub const MAX_HEAT: f32 = 10.0;
pub const HEAT_SCALE: f32 = 0.9;
pub const HEAT_DECAY: f32 = 1.0;

/// Turn scoring
pub const TILE_BASE_VALUE: u32 = 10;
pub const L_PATTERN_BONUS: u32 = 50;
pub const CROSS_PATTERN_BONUS: u32 = 100;
pub const POWER_ORB_BASE_SCORE: u32 = 5000;
pub const POWER_ORB_AGE_BONUS: u32 = 500;

/// Tile queue sizing
pub const QUEUE_VISIBLE: usize = 10;
pub const QUEUE_BUFFER: usize = 5;
pub const COLOR_HISTORY_WINDOW: usize = 10;

/// Anti-frustration tuning
pub const MAX_SAME_COLOR_IN_ROW: u32 = 3;
pub const COLOR_DISTRIBUTION_WEIGHT: f64 = 0.7;
pub const MIN_GUARANTEED_MOVES: usize = 3;
pub const MAX_CONSECUTIVE_NO_MOVES: u32 = 2;

/// Chance that a tile entering the grid is a power orb
pub const POWER_ORB_SPAWN_CHANCE: f64 = 0.02;

/// The six tile colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorType {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
}

impl ColorType {
    /// All colors in index order
    pub const ALL: [ColorType; COLOR_COUNT] = [
        ColorType::Red,
        ColorType::Blue,
        ColorType::Green,
        ColorType::Yellow,
        ColorType::Purple,
        ColorType::Orange,
    ];

    /// Stable index in `0..COLOR_COUNT`
    pub fn index(&self) -> usize {
        match self {
            ColorType::Red => 0,
            ColorType::Blue => 1,
            ColorType::Green => 2,
            ColorType::Yellow => 3,
            ColorType::Purple => 4,
            ColorType::Orange => 5,
        }
    }

    /// Inverse of [`ColorType::index`]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Uppercase letter used by the grid text form
    ///
    /// # Examples
    ///
    /// ```
    /// use gravity_match_types::ColorType;
    ///
    /// assert_eq!(ColorType::Purple.letter(), 'P');
    /// ```
    pub fn letter(&self) -> char {
        match self {
            ColorType::Red => 'R',
            ColorType::Blue => 'B',
            ColorType::Green => 'G',
            ColorType::Yellow => 'Y',
            ColorType::Purple => 'P',
            ColorType::Orange => 'O',
        }
    }

    /// Parse a color letter (case-insensitive)
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'R' => Some(ColorType::Red),
            'B' => Some(ColorType::Blue),
            'G' => Some(ColorType::Green),
            'Y' => Some(ColorType::Yellow),
            'P' => Some(ColorType::Purple),
            'O' => Some(ColorType::Orange),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorType::Red => "red",
            ColorType::Blue => "blue",
            ColorType::Green => "green",
            ColorType::Yellow => "yellow",
            ColorType::Purple => "purple",
            ColorType::Orange => "orange",
        }
    }
}

/// Swipe and gravity directions
///
/// `None` means "no direction"; it is what an expired swap cache entry resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The four real directions
    pub const CARDINAL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// 180° rotation (Up↔Down, Left↔Right)
    ///
    /// # Examples
    ///
    /// ```
    /// use gravity_match_types::Direction;
    ///
    /// assert_eq!(Direction::Up.opposite(), Direction::Down);
    /// assert_eq!(Direction::Left.opposite(), Direction::Right);
    /// assert_eq!(Direction::None.opposite(), Direction::None);
    /// ```
    pub fn opposite(&self) -> Self {
        match self {
            Direction::None => Direction::None,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Unit step `(dx, dy)`; y grows downwards
    pub fn delta(&self) -> (i8, i8) {
        match self {
            Direction::None => (0, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" => Some(Direction::None),
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::None => "none",
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// A grid coordinate
///
/// Signed so that neighbour arithmetic can step off the grid and be rejected
/// by bounds checks instead of wrapping. Ordering is row-major (y, then x).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub y: i8,
    pub x: i8,
}

impl Position {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { y, x }
    }

    /// True if the coordinate lies inside the 8x8 grid
    pub fn in_bounds(&self) -> bool {
        self.x >= 0 && self.x < GRID_WIDTH as i8 && self.y >= 0 && self.y < GRID_HEIGHT as i8
    }

    /// Neighbour one step along `direction` (may be out of bounds)
    pub fn step(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// Chebyshev (king-move) distance
    pub fn chebyshev(&self, other: Position) -> u8 {
        let dx = (i16::from(self.x) - i16::from(other.x)).unsigned_abs();
        let dy = (i16::from(self.y) - i16::from(other.y)).unsigned_abs();
        dx.max(dy).min(u16::from(u8::MAX)) as u8
    }

    /// True on the outermost ring of the grid
    pub fn is_edge(&self) -> bool {
        self.x == 0
            || self.y == 0
            || self.x == GRID_WIDTH as i8 - 1
            || self.y == GRID_HEIGHT as i8 - 1
    }

    /// True for the four center cells
    pub fn is_center(&self) -> bool {
        let cx = (GRID_WIDTH / 2) as i8;
        let cy = (GRID_HEIGHT / 2) as i8;
        (self.x == cx - 1 || self.x == cx) && (self.y == cy - 1 || self.y == cy)
    }

    /// Iterate every on-grid position in row-major order
    pub fn all() -> impl Iterator<Item = Position> {
        (0..GRID_HEIGHT as i8).flat_map(|y| (0..GRID_WIDTH as i8).map(move |x| Position::new(x, y)))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Special tile kinds
///
/// Only the power orb has behaviour inside the core; other power-up effects
/// are applied by collaborators through the engine's primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialType {
    #[default]
    None,
    PowerOrb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TileFlags {
    pub is_power_up: bool,
    pub special_type: SpecialType,
}

impl TileFlags {
    pub fn power_orb() -> Self {
        Self {
            is_power_up: true,
            special_type: SpecialType::PowerOrb,
        }
    }

    pub fn is_power_orb(&self) -> bool {
        self.special_type == SpecialType::PowerOrb
    }
}

/// A tile on the grid
///
/// Not `Copy`. A tile is owned by one grid cell at a time and moves between
/// cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub color: ColorType,
    pub position: Position,
    pub flags: TileFlags,
    /// Completed turns this tile has spent on the grid
    pub age: u32,
}

impl Tile {
    pub fn new(color: ColorType, position: Position) -> Self {
        Self {
            color,
            position,
            flags: TileFlags::default(),
            age: 0,
        }
    }

    pub fn with_flags(color: ColorType, position: Position, flags: TileFlags) -> Self {
        Self {
            color,
            position,
            flags,
            age: 0,
        }
    }

    pub fn is_power_orb(&self) -> bool {
        self.flags.is_power_orb()
    }
}

/// A grid cell: empty or owning one tile
pub type Cell = Option<Tile>;

/// Shape of a detected match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Horizontal,
    Vertical,
    LShape,
    TShape,
    Cross,
}

impl MatchType {
    /// True for the compound shapes (L, T, Cross)
    pub fn is_shape(&self) -> bool {
        matches!(self, MatchType::LShape | MatchType::TShape | MatchType::Cross)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Horizontal => "horizontal",
            MatchType::Vertical => "vertical",
            MatchType::LShape => "l_shape",
            MatchType::TShape => "t_shape",
            MatchType::Cross => "cross",
        }
    }
}

/// Named heat bands for presentation
///
/// | Band | Heat |
/// |------|------|
/// | Cold | [0, 3) |
/// | Warm | [3, 5) |
/// | Hot | [5, 8) |
/// | Blazing | [8, max) |
/// | Inferno | max |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatBand {
    Cold,
    Warm,
    Hot,
    Blazing,
    Inferno,
}

impl HeatBand {
    /// Classify a heat value against the configured ceiling
    ///
    /// # Examples
    ///
    /// ```
    /// use gravity_match_types::{HeatBand, MAX_HEAT};
    ///
    /// assert_eq!(HeatBand::from_heat(0.0, MAX_HEAT), HeatBand::Cold);
    /// assert_eq!(HeatBand::from_heat(4.5, MAX_HEAT), HeatBand::Warm);
    /// assert_eq!(HeatBand::from_heat(9.9, MAX_HEAT), HeatBand::Blazing);
    /// assert_eq!(HeatBand::from_heat(10.0, MAX_HEAT), HeatBand::Inferno);
    /// ```
    pub fn from_heat(heat: f32, max_heat: f32) -> Self {
        if heat >= max_heat {
            HeatBand::Inferno
        } else if heat >= 8.0 {
            HeatBand::Blazing
        } else if heat >= 5.0 {
            HeatBand::Hot
        } else if heat >= 3.0 {
            HeatBand::Warm
        } else {
            HeatBand::Cold
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HeatBand::Cold => "cold",
            HeatBand::Warm => "warm",
            HeatBand::Hot => "hot",
            HeatBand::Blazing => "blazing",
            HeatBand::Inferno => "inferno",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tuning_values() {
        assert_eq!(GRID_WIDTH, 8);
        assert_eq!(GRID_HEIGHT, 8);
        assert_eq!(MAX_CASCADE_DEPTH, 10);
        assert_eq!(QUEUE_VISIBLE + QUEUE_BUFFER, 15);
        assert_eq!(MIN_GUARANTEED_MOVES, 3);
        assert_eq!(MAX_CONSECUTIVE_NO_MOVES, 2);
    }

    #[test]
    fn test_position_ordering_is_row_major() {
        let mut positions = vec![
            Position::new(3, 1),
            Position::new(0, 2),
            Position::new(7, 0),
        ];
        positions.sort();
        assert_eq!(
            positions,
            vec![Position::new(7, 0), Position::new(3, 1), Position::new(0, 2)]
        );
    }

    #[test]
    fn test_position_classes() {
        assert!(Position::new(0, 4).is_edge());
        assert!(Position::new(4, 7).is_edge());
        assert!(!Position::new(1, 1).is_edge());
        for (x, y) in [(3, 3), (4, 3), (3, 4), (4, 4)] {
            assert!(Position::new(x, y).is_center());
        }
        assert!(!Position::new(2, 3).is_center());
    }

    #[test]
    fn test_chebyshev_distance() {
        let origin = Position::new(2, 2);
        assert_eq!(origin.chebyshev(Position::new(3, 3)), 1);
        assert_eq!(origin.chebyshev(Position::new(2, 4)), 2);
        assert_eq!(origin.chebyshev(origin), 0);
    }

    #[test]
    fn test_all_positions() {
        let all: Vec<Position> = Position::all().collect();
        assert_eq!(all.len(), GRID_CELLS);
        assert_eq!(all[0], Position::new(0, 0));
        assert_eq!(all[9], Position::new(1, 1));
    }

    #[test]
    fn test_color_letter_roundtrip() {
        for color in ColorType::ALL {
            assert_eq!(ColorType::from_letter(color.letter()), Some(color));
            assert_eq!(ColorType::from_index(color.index()), Some(color));
        }
        assert_eq!(ColorType::from_letter('x'), None);
    }

    #[test]
    fn test_tile_serializes_with_lowercase_color() {
        let tile = Tile::with_flags(ColorType::Red, Position::new(1, 2), TileFlags::power_orb());
        let json = serde_json::to_string(&tile).unwrap();
        assert!(json.contains("\"color\":\"red\""));
        assert!(json.contains("\"special_type\":\"power_orb\""));
    }
}

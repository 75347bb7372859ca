//! Move analysis - which swaps would produce a match right now
//!
//! A swap is a move when it exchanges two adjacent tiles of different colors
//! (diagonal neighbours included, as the swap resolver accepts them) and leaves
//! a run of at least three through either swapped cell. The available-move count is the number of distinct positions that take
//! part in at least one move; the anti-frustration guarantee is measured on it.
//!
//! The analysis works on a [`ColorMap`] copy, never on the grid itself.

use std::collections::BTreeSet;

use crate::grid::{ColorMap, Grid};
use crate::matcher::{has_match_at, run_lengths_at};
use crate::types::{ColorType, Position, MIN_MATCH_LEN};

/// Neighbour offsets that visit every adjacent pair exactly once
const PAIR_OFFSETS: [(i8, i8); 4] = [(1, 0), (0, 1), (1, 1), (-1, 1)];

/// A match-producing swap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapMove {
    pub a: Position,
    pub b: Position,
    /// Longest run the swap creates through either cell
    pub best_run: usize,
}

fn get(colors: &ColorMap, pos: Position) -> Option<ColorType> {
    if pos.in_bounds() {
        colors[pos.y as usize][pos.x as usize]
    } else {
        None
    }
}

fn set(colors: &mut ColorMap, pos: Position, color: Option<ColorType>) {
    colors[pos.y as usize][pos.x as usize] = color;
}

/// Longest run through `a` or `b` after swapping them (0 if not a legal move)
fn swap_gain(colors: &mut ColorMap, a: Position, b: Position) -> usize {
    let (Some(ca), Some(cb)) = (get(colors, a), get(colors, b)) else {
        return 0;
    };
    if ca == cb {
        return 0;
    }

    set(colors, a, Some(cb));
    set(colors, b, Some(ca));
    let (ah, av) = run_lengths_at(colors, a);
    let (bh, bv) = run_lengths_at(colors, b);
    set(colors, a, Some(ca));
    set(colors, b, Some(cb));

    let best = ah.max(av).max(bh).max(bv);
    if best >= MIN_MATCH_LEN {
        best
    } else {
        0
    }
}

/// Every match-producing swap on a color map
pub fn find_moves_in(colors: &ColorMap) -> Vec<SwapMove> {
    let mut work = *colors;
    let mut moves = Vec::new();
    for a in Position::all() {
        for (dx, dy) in PAIR_OFFSETS {
            let b = Position::new(a.x + dx, a.y + dy);
            if !b.in_bounds() {
                continue;
            }
            let best_run = swap_gain(&mut work, a, b);
            if best_run > 0 {
                moves.push(SwapMove { a, b, best_run });
            }
        }
    }
    moves
}

/// Every match-producing swap on the grid
pub fn find_moves(grid: &Grid) -> Vec<SwapMove> {
    find_moves_in(&grid.color_map())
}

/// Distinct positions that take part in at least one move
pub fn move_positions(colors: &ColorMap) -> BTreeSet<Position> {
    find_moves_in(colors)
        .into_iter()
        .flat_map(|m| [m.a, m.b])
        .collect()
}

pub fn available_move_count_in(colors: &ColorMap) -> usize {
    move_positions(colors).len()
}

/// Number of grid positions that, if swapped, would yield a match
pub fn available_move_count(grid: &Grid) -> usize {
    available_move_count_in(&grid.color_map())
}

/// Best recolor for `pos`: no match of its own, most positions with a move afterwards
fn best_recolor(colors: &mut ColorMap, pos: Position) -> Option<(ColorType, usize)> {
    let original = get(colors, pos)?;
    let mut best: Option<(ColorType, usize)> = None;
    for color in ColorType::ALL {
        if color == original {
            continue;
        }
        set(colors, pos, Some(color));
        if !has_match_at(colors, pos) {
            let count = available_move_count_in(colors);
            if best.map_or(true, |(_, n)| count > n) {
                best = Some((color, count));
            }
        }
        set(colors, pos, Some(original));
    }
    best
}

/// Pick the tile to recolor so the board gains the most available moves
///
/// Power orbs are never recolored. Returns `None` when no recolor helps.
pub fn find_guaranteed_move(grid: &Grid) -> Option<(Position, ColorType)> {
    let mut colors = grid.color_map();
    let baseline = available_move_count_in(&colors);
    let mut best: Option<(Position, ColorType, usize)> = None;

    for tile in grid.tiles() {
        if tile.is_power_orb() {
            continue;
        }
        if let Some((color, count)) = best_recolor(&mut colors, tile.position) {
            if count > baseline && best.map_or(true, |(_, _, n)| count > n) {
                best = Some((tile.position, color, count));
            }
        }
    }
    best.map(|(pos, color, _)| (pos, color))
}

/// Recolor for `pos` that adds moves without matching on its own
pub fn find_guaranteed_move_at(grid: &Grid, pos: Position) -> Option<ColorType> {
    let tile = grid.tile(pos)?;
    if tile.is_power_orb() {
        return None;
    }
    let mut colors = grid.color_map();
    let baseline = available_move_count_in(&colors);
    best_recolor(&mut colors, pos)
        .filter(|&(_, count)| count > baseline)
        .map(|(color, _)| color)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Six-color diagonal stripes: no run of two anywhere, no moves
    fn stripes() -> Grid {
        Grid::from_ascii(&[
            "RBGYPORB", "BGYPORBG", "GYPORBGY", "YPORBGYP", "PORBGYPO", "ORBGYPOR",
            "RBGYPORB", "BGYPORBG",
        ])
        .unwrap()
    }

    #[test]
    fn test_stripes_have_no_moves() {
        assert!(find_moves(&stripes()).is_empty());
        assert_eq!(available_move_count(&stripes()), 0);
    }

    #[test]
    fn test_simple_move() {
        // R R B R: swapping the blue with the last red finishes the run.
        let grid = Grid::from_ascii(&[
            "RRBRYPOG", "........", "........", "........", "........", "........",
            "........", "........",
        ])
        .unwrap();
        let moves = find_moves(&grid);
        assert_eq!(
            moves,
            vec![SwapMove {
                a: Position::new(2, 0),
                b: Position::new(3, 0),
                best_run: 3
            }]
        );
        assert_eq!(available_move_count(&grid), 2);
    }

    #[test]
    fn test_diagonal_only_moves() {
        // Each red run can only be finished from a diagonal neighbour.
        let grid = Grid::from_ascii(&[
            "RRB.....", "...R....", "........", "........", "....GGY.", ".....G..",
            "........", "........",
        ])
        .unwrap();
        assert_eq!(
            find_moves(&grid),
            vec![
                SwapMove {
                    a: Position::new(2, 0),
                    b: Position::new(3, 1),
                    best_run: 3
                },
                SwapMove {
                    a: Position::new(6, 4),
                    b: Position::new(5, 5),
                    best_run: 3
                },
            ]
        );
        assert_eq!(available_move_count(&grid), 4);
    }

    #[test]
    fn test_swapping_equal_colors_is_not_a_move() {
        let grid = Grid::from_ascii(&[
            "RR......", "R.......", "........", "........", "........", "........",
            "........", "........",
        ])
        .unwrap();
        assert!(find_moves(&grid).is_empty());
    }

    #[test]
    fn test_guaranteed_move_on_dead_board() {
        let grid = stripes();
        let (pos, color) = find_guaranteed_move(&grid).expect("a recolor exists");

        let mut colors = grid.color_map();
        colors[pos.y as usize][pos.x as usize] = Some(color);
        assert!(!has_match_at(&colors, pos));
        assert!(available_move_count_in(&colors) > 0);
    }

    #[test]
    fn test_guaranteed_move_at_position() {
        let grid = stripes();
        let pos = Position::new(4, 4);
        let color = find_guaranteed_move_at(&grid, pos).expect("a recolor exists");
        let mut colors = grid.color_map();
        colors[4][4] = Some(color);
        assert!(!has_match_at(&colors, pos));
        assert!(available_move_count_in(&colors) > 0);
    }

    #[test]
    fn test_power_orb_is_never_recolored() {
        let mut rows = [
            "RBGYPORB", "BGYPORBG", "GYPORBGY", "YPORBGYP", "PORBGYPO", "ORBGYPOR",
            "RBGYPORB", "BGYPORBG",
        ];
        rows[4] = "PORBgYPO";
        let grid = Grid::from_ascii(&rows).unwrap();
        assert_eq!(find_guaranteed_move_at(&grid, Position::new(4, 4)), None);
    }
}

//! Match detection - runs and compound shapes of one color
//!
//! A detection pass has three steps:
//!
//! 1. **Line scan**: rows left to right, then columns top to bottom. Only maximal
//!    runs of at least [`MIN_MATCH_LEN`] are emitted, and their cells are marked in a
//!    per-direction visited bitmap so a run is never reported twice or in pieces.
//! 2. **Shape merge**: a horizontal and a vertical run of the same color that share
//!    a cell become one match. Where the shared cell sits decides the shape: the end
//!    of both arms is an L, the end of one arm and the middle of the other is a T,
//!    the middle of both is a Cross. Runs chained through several crossings merge
//!    into a single match typed by its strongest crossing.
//! 3. **De-duplication**: matches with identical position sets collapse to one.
//!
//! After merging, no two matches share a cell. Results are unordered.

use std::collections::BTreeSet;

use arrayvec::ArrayVec;
use serde::Serialize;

use crate::grid::{ColorMap, Grid};
use crate::types::{ColorType, MatchConfig, MatchType, Position, GRID_HEIGHT, GRID_WIDTH, MIN_MATCH_LEN};

/// One detected match
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchData {
    pub positions: BTreeSet<Position>,
    pub match_type: MatchType,
    pub color: ColorType,
    pub score: u32,
}

impl MatchData {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.positions.contains(&pos)
    }

    pub fn overlaps(&self, other: &MatchData) -> bool {
        self.positions.intersection(&other.positions).next().is_some()
    }
}

/// A maximal same-color run found by the line scan
#[derive(Debug, Clone)]
struct Run {
    color: ColorType,
    horizontal: bool,
    cells: ArrayVec<Position, 8>,
}

impl Run {
    fn first(&self) -> Position {
        self.cells[0]
    }

    fn last(&self) -> Position {
        self.cells[self.cells.len() - 1]
    }

    fn is_end(&self, pos: Position) -> bool {
        pos == self.first() || pos == self.last()
    }

    /// Cell shared with a perpendicular run of the same color, if any
    fn crossing(&self, other: &Run) -> Option<Position> {
        if self.color != other.color || self.horizontal == other.horizontal {
            return None;
        }
        let (h, v) = if self.horizontal { (self, other) } else { (other, self) };
        let cross = Position::new(v.first().x, h.first().y);
        let in_h = cross.x >= h.first().x && cross.x <= h.last().x;
        let in_v = cross.y >= v.first().y && cross.y <= v.last().y;
        (in_h && in_v).then_some(cross)
    }
}

/// Shape formed where a horizontal and a vertical run share `cross`
fn crossing_shape(a: &Run, b: &Run, cross: Position) -> MatchType {
    match (a.is_end(cross), b.is_end(cross)) {
        (true, true) => MatchType::LShape,
        (false, false) => MatchType::Cross,
        _ => MatchType::TShape,
    }
}

/// Match detector
#[derive(Debug, Clone, Default)]
pub struct MatchDetector {
    config: MatchConfig,
}

impl MatchDetector {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Find every match on the grid
    pub fn detect_all(&self, grid: &Grid) -> Vec<MatchData> {
        self.detect_colors(&grid.color_map())
    }

    /// Find every match on a color map
    pub fn detect_colors(&self, colors: &ColorMap) -> Vec<MatchData> {
        let runs = scan_runs(colors);
        if runs.is_empty() {
            return Vec::new();
        }

        // Union runs that cross; remember the strongest shape per group.
        let mut parent: Vec<usize> = (0..runs.len()).collect();
        let mut crossings: Vec<(usize, usize, Position)> = Vec::new();
        for i in 0..runs.len() {
            for j in (i + 1)..runs.len() {
                if let Some(cross) = runs[i].crossing(&runs[j]) {
                    crossings.push((i, j, cross));
                    let (ri, rj) = (find(&mut parent, i), find(&mut parent, j));
                    if ri != rj {
                        parent[rj] = ri;
                    }
                }
            }
        }

        let mut groups: Vec<(usize, Vec<usize>)> = Vec::new();
        for i in 0..runs.len() {
            let root = find(&mut parent, i);
            match groups.iter_mut().find(|(r, _)| *r == root) {
                Some((_, members)) => members.push(i),
                None => groups.push((root, vec![i])),
            }
        }

        let mut matches: Vec<MatchData> = Vec::with_capacity(groups.len());
        for (root, members) in groups {
            let positions: BTreeSet<Position> = members
                .iter()
                .flat_map(|&i| runs[i].cells.iter().copied())
                .collect();
            let color = runs[members[0]].color;

            let shape = crossings
                .iter()
                .filter(|(i, _, _)| find(&mut parent, *i) == root)
                .map(|&(i, j, cross)| crossing_shape(&runs[i], &runs[j], cross))
                .max();
            let match_type = match shape {
                Some(shape) if self.config.detect_shapes => shape,
                _ => line_type(&runs, &members),
            };

            let score = self.score(positions.len(), match_type);
            matches.push(MatchData {
                positions,
                match_type,
                color,
                score,
            });
        }

        dedup(matches)
    }

    /// `count × points_per_tile × shape bonus`, rounded
    pub fn score(&self, count: usize, match_type: MatchType) -> u32 {
        let base = count as f64 * f64::from(self.config.points_per_tile);
        (base * self.config.bonus(match_type)).round() as u32
    }
}

/// Line type of a group: its longest run's axis (horizontal wins ties)
fn line_type(runs: &[Run], members: &[usize]) -> MatchType {
    let longest = members
        .iter()
        .map(|&i| &runs[i])
        .fold(None::<&Run>, |best, run| match best {
            Some(b) if b.cells.len() > run.cells.len() => Some(b),
            Some(b) if b.cells.len() == run.cells.len() && b.horizontal => Some(b),
            _ => Some(run),
        });
    match longest {
        Some(run) if !run.horizontal => MatchType::Vertical,
        _ => MatchType::Horizontal,
    }
}

fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

fn dedup(matches: Vec<MatchData>) -> Vec<MatchData> {
    let mut unique: Vec<MatchData> = Vec::with_capacity(matches.len());
    for m in matches {
        if !unique.iter().any(|u| u.positions == m.positions) {
            unique.push(m);
        }
    }
    unique
}

/// Maximal runs of length >= MIN_MATCH_LEN, rows first then columns
fn scan_runs(colors: &ColorMap) -> Vec<Run> {
    let w = GRID_WIDTH as i8;
    let h = GRID_HEIGHT as i8;
    let mut runs = Vec::new();

    let mut visited = [[false; GRID_WIDTH as usize]; GRID_HEIGHT as usize];
    for y in 0..h {
        scan_lane(colors, &mut visited, (0..w).map(|x| Position::new(x, y)), true, &mut runs);
    }

    let mut visited = [[false; GRID_WIDTH as usize]; GRID_HEIGHT as usize];
    for x in 0..w {
        scan_lane(colors, &mut visited, (0..h).map(|y| Position::new(x, y)), false, &mut runs);
    }

    runs
}

fn scan_lane(
    colors: &ColorMap,
    visited: &mut [[bool; GRID_WIDTH as usize]; GRID_HEIGHT as usize],
    lane: impl Iterator<Item = Position>,
    horizontal: bool,
    runs: &mut Vec<Run>,
) {
    let mut current: Option<Run> = None;
    for pos in lane {
        let color = color_at(colors, pos);
        let seen = visited[pos.y as usize][pos.x as usize];
        let extends = !seen && matches!((&current, color), (Some(run), Some(c)) if run.color == c);
        if extends {
            if let Some(run) = current.as_mut() {
                run.cells.push(pos);
            }
            continue;
        }

        if let Some(run) = current.take() {
            emit_run(run, visited, runs);
        }
        current = match color {
            Some(c) if !seen => {
                let mut cells = ArrayVec::new();
                cells.push(pos);
                Some(Run {
                    color: c,
                    horizontal,
                    cells,
                })
            }
            _ => None,
        };
    }
    if let Some(run) = current {
        emit_run(run, visited, runs);
    }
}

fn emit_run(
    run: Run,
    visited: &mut [[bool; GRID_WIDTH as usize]; GRID_HEIGHT as usize],
    runs: &mut Vec<Run>,
) {
    if run.cells.len() < MIN_MATCH_LEN {
        return;
    }
    for pos in &run.cells {
        visited[pos.y as usize][pos.x as usize] = true;
    }
    runs.push(run);
}

fn color_at(colors: &ColorMap, pos: Position) -> Option<ColorType> {
    if !pos.in_bounds() {
        return None;
    }
    colors[pos.y as usize][pos.x as usize]
}

/// Lengths of the horizontal and vertical same-color runs through `pos`
///
/// Returns `(0, 0)` for an empty or off-grid cell.
pub fn run_lengths_at(colors: &ColorMap, pos: Position) -> (usize, usize) {
    let Some(color) = color_at(colors, pos) else {
        return (0, 0);
    };
    let span = |dx: i8, dy: i8| {
        let mut n = 0;
        let mut p = Position::new(pos.x + dx, pos.y + dy);
        while color_at(colors, p) == Some(color) {
            n += 1;
            p = Position::new(p.x + dx, p.y + dy);
        }
        n
    };
    (1 + span(-1, 0) + span(1, 0), 1 + span(0, -1) + span(0, 1))
}

/// True if `pos` is part of a run of at least [`MIN_MATCH_LEN`]
pub fn has_match_at(colors: &ColorMap, pos: Position) -> bool {
    let (h, v) = run_lengths_at(colors, pos);
    h >= MIN_MATCH_LEN || v >= MIN_MATCH_LEN
}

//! Match detector tests - runs, shapes and the no-overlap guarantee

use gravity_match::core::{Grid, MatchDetector, SimpleRng};
use gravity_match::types::{ColorType, MatchConfig, MatchType, Position, Tile, COLOR_COUNT};

fn detect(rows: &[&str]) -> Vec<gravity_match::core::MatchData> {
    MatchDetector::default().detect_all(&Grid::from_ascii(rows).unwrap())
}

/// Board of random colors drawn from the first `colors` colors
fn random_grid(rng: &mut SimpleRng, colors: u32) -> Grid {
    let mut grid = Grid::new();
    for pos in Position::all() {
        let color = ColorType::from_index(rng.next_range(colors) as usize).unwrap();
        grid.place(pos, Tile::new(color, pos)).unwrap();
    }
    grid
}

#[test]
fn test_l_shape_scenario() {
    // Four reds along row 0 and three down column 0, sharing (0, 0).
    let matches = detect(&[
        "RRRRB...", "R.......", "R.......", "........", "........", "........",
        "........", "........",
    ]);

    assert_eq!(matches.len(), 1);
    let m = &matches[0];
    assert_eq!(m.match_type, MatchType::LShape);
    assert_eq!(m.color, ColorType::Red);
    assert_eq!(m.len(), 6);
    assert_eq!(m.score, 900);
    for pos in [
        Position::new(0, 0),
        Position::new(3, 0),
        Position::new(0, 2),
    ] {
        assert!(m.contains(pos));
    }
}

#[test]
fn test_run_of_five_reported_once() {
    let matches = detect(&[
        "........", "........", "........", "........", ".GGGGG..", "........",
        "........", "........",
    ]);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].len(), 5);
    assert_eq!(matches[0].match_type, MatchType::Horizontal);
    assert_eq!(matches[0].score, 500);
}

#[test]
fn test_vertical_run() {
    let matches = detect(&[
        "........", "......P.", "......P.", "......P.", "......P.", "........",
        "........", "........",
    ]);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].match_type, MatchType::Vertical);
    assert_eq!(matches[0].len(), 4);
}

#[test]
fn test_power_orb_matches_by_color() {
    let matches = detect(&[
        "........", "........", "........", "........", "........", "........",
        "........", "..BbB...",
    ]);
    assert_eq!(matches.len(), 1);
    assert!(matches[0].contains(Position::new(3, 7)));
}

#[test]
fn test_shape_detection_can_be_disabled() {
    let detector = MatchDetector::new(MatchConfig {
        detect_shapes: false,
        ..MatchConfig::default()
    });
    let grid = Grid::from_ascii(&[
        "RRRRB...", "R.......", "R.......", "........", "........", "........",
        "........", "........",
    ])
    .unwrap();
    let matches = detector.detect_all(&grid);
    assert_eq!(matches.len(), 1);
    assert!(!matches[0].match_type.is_shape());
    assert_eq!(matches[0].len(), 6);
}

#[test]
fn test_random_boards_never_overlap() {
    let mut rng = SimpleRng::new(2024);
    let detector = MatchDetector::default();

    for _ in 0..500 {
        // Few colors so runs and shapes are common.
        let grid = random_grid(&mut rng, 3);
        let matches = detector.detect_all(&grid);

        for (i, a) in matches.iter().enumerate() {
            assert!(a.len() >= 3);
            for pos in &a.positions {
                assert_eq!(grid.color_at(*pos), Some(a.color));
            }
            for b in &matches[i + 1..] {
                assert!(!a.overlaps(b), "overlap on\n{}", grid.to_ascii().join("\n"));
            }
        }
    }
}

#[test]
fn test_random_boards_every_run_is_covered() {
    let mut rng = SimpleRng::new(77);
    let detector = MatchDetector::default();

    for _ in 0..200 {
        let grid = random_grid(&mut rng, COLOR_COUNT as u32 / 2);
        let matches = detector.detect_all(&grid);
        let colors = grid.color_map();

        for pos in Position::all() {
            if gravity_match::core::matcher::has_match_at(&colors, pos) {
                assert!(
                    matches.iter().any(|m| m.contains(pos)),
                    "{} is in a run but not in any match",
                    pos
                );
            }
        }
    }
}

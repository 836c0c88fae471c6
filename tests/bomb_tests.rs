//! Bomb tests - spawn classification and detonation through real swaps

use std::collections::HashSet;

use gemfall::core::{
    pieces_affected_by_bomb, BoardEngine, BoardEvent, DestroyedPiece, EventLog, Grid,
    PieceCatalog, PieceFactory, SwapReport,
};
use gemfall::types::{BombKind, EngineError, PieceType, Pos};

/// Match-free background (types 2..=5) with cells overridden by hand.
fn fixture(width: usize, height: usize, overrides: &[((usize, usize), PieceType)]) -> Vec<Vec<PieceType>> {
    let mut rows: Vec<Vec<PieceType>> = (0..height)
        .map(|y| (0..width).map(|x| ((x + 2 * y) % 4) as PieceType + 2).collect())
        .collect();
    for &((x, y), piece_type) in overrides {
        rows[y][x] = piece_type;
    }
    rows
}

fn fixture_grid(rows: &[Vec<PieceType>], bombs: &[(Pos, BombKind)]) -> (Grid, PieceCatalog) {
    let catalog = PieceCatalog::new(6).unwrap();
    let mut factory = PieceFactory::new(catalog);
    let mut grid = Grid::from_type_rows(rows, &mut factory).unwrap();
    for &(pos, kind) in bombs {
        grid.promote(pos, kind).unwrap();
    }
    (grid, catalog)
}

fn swap(rows: &[Vec<PieceType>], bombs: &[(Pos, BombKind)], a: Pos, b: Pos) -> SwapReport {
    let (grid, catalog) = fixture_grid(rows, bombs);
    let mut engine = BoardEngine::from_grid(grid, catalog, 17, EventLog::default());
    let report = engine.request_swap(a, b).unwrap();
    assert!(report.accepted);
    assert!(engine.grid().is_full());
    assert!(engine.grid().is_consistent());
    report
}

/// Pieces of the first clear step
fn first_clear(report: &SwapReport) -> &[DestroyedPiece] {
    report
        .events
        .iter()
        .find_map(|event| match event {
            BoardEvent::PiecesDestroyed(pieces) => Some(pieces.as_slice()),
            _ => None,
        })
        .unwrap_or(&[])
}

/// Bomb spawned by the first clear step; refills may spawn more later
fn first_bomb(report: &SwapReport) -> Option<(Pos, BombKind)> {
    report
        .events
        .iter()
        .take_while(|event| !matches!(event, BoardEvent::PiecesDestroyed(_)))
        .find_map(|event| match event {
            BoardEvent::BombSpawned { pos, kind, .. } => Some((*pos, *kind)),
            _ => None,
        })
}

/// Bombs spawned before the `steps`-th clear step
fn spawns_within(report: &SwapReport, steps: usize) -> Vec<(Pos, BombKind)> {
    let mut clears = 0;
    let mut spawns = Vec::new();
    for event in &report.events {
        match event {
            BoardEvent::PiecesDestroyed(_) => {
                clears += 1;
                if clears == steps {
                    break;
                }
            }
            BoardEvent::BombSpawned { pos, kind, .. } => spawns.push((*pos, *kind)),
            _ => {}
        }
    }
    spawns
}

/// Runs of type 0 along row 2 from (2, 2) and up column 2 from (2, 2).
///
/// A cascade can leave such an L standing; any swap then resolves it.
fn standing_corner(width: usize, row_len: usize, column_len: usize) -> Vec<Vec<PieceType>> {
    let mut overrides: Vec<((usize, usize), PieceType)> =
        (2..2 + row_len).map(|x| ((x, 2), 0)).collect();
    overrides.extend((3..2 + column_len).map(|y| ((2, y), 0)));
    fixture(width, 6, &overrides)
}

fn positions(pieces: &[DestroyedPiece]) -> Vec<Pos> {
    pieces.iter().map(|p| p.pos).collect()
}

#[test]
fn test_run_of_three_spawns_nothing() {
    let rows = fixture(6, 4, &[((0, 0), 0), ((1, 0), 0), ((2, 0), 1), ((2, 1), 0)]);
    let report = swap(&rows, &[], Pos::new(2, 0), Pos::new(2, 1));

    assert!(matches!(report.events[1], BoardEvent::PiecesDestroyed(_)));
    assert_eq!(
        positions(first_clear(&report)),
        [Pos::new(0, 0), Pos::new(1, 0), Pos::new(2, 0)]
    );
    assert!(first_clear(&report).iter().all(|p| p.piece_type == 0));
}

#[test]
fn test_horizontal_four_spawns_row_clear() {
    let rows = fixture(6, 4, &[((0, 0), 0), ((1, 0), 0), ((2, 0), 1), ((3, 0), 0), ((2, 1), 0)]);
    let report = swap(&rows, &[], Pos::new(2, 0), Pos::new(2, 1));

    assert_eq!(first_bomb(&report), Some((Pos::new(0, 0), BombKind::RowClear)));
    assert_eq!(
        positions(first_clear(&report)),
        [Pos::new(1, 0), Pos::new(2, 0), Pos::new(3, 0)]
    );
}

#[test]
fn test_vertical_four_spawns_column_clear() {
    let rows = fixture(6, 5, &[((0, 0), 0), ((0, 1), 0), ((0, 2), 1), ((0, 3), 0), ((1, 2), 0)]);
    let report = swap(&rows, &[], Pos::new(0, 2), Pos::new(1, 2));

    assert_eq!(
        first_bomb(&report),
        Some((Pos::new(0, 0), BombKind::ColumnClear))
    );
    assert_eq!(
        positions(first_clear(&report)),
        [Pos::new(0, 1), Pos::new(0, 2), Pos::new(0, 3)]
    );
}

#[test]
fn test_run_of_five_spawns_color_clear() {
    let rows = fixture(
        6,
        4,
        &[((0, 0), 0), ((1, 0), 0), ((2, 0), 1), ((3, 0), 0), ((4, 0), 0), ((2, 1), 0)],
    );
    let report = swap(&rows, &[], Pos::new(2, 0), Pos::new(2, 1));

    assert_eq!(
        first_bomb(&report),
        Some((Pos::new(0, 0), BombKind::ColorClear))
    );
    assert_eq!(first_clear(&report).len(), 4);
    assert!(!positions(first_clear(&report)).contains(&Pos::new(0, 0)));
}

#[test]
fn test_crossing_runs_clear_shared_cell_once() {
    let rows = fixture(
        6,
        4,
        &[((0, 0), 0), ((1, 0), 0), ((2, 0), 1), ((3, 0), 0), ((2, 1), 0), ((2, 2), 0)],
    );
    let report = swap(&rows, &[], Pos::new(2, 0), Pos::new(3, 0));

    assert_eq!(first_bomb(&report), None);
    let cleared: HashSet<Pos> = positions(first_clear(&report)).into_iter().collect();
    assert_eq!(first_clear(&report).len(), 5);
    assert_eq!(
        cleared,
        HashSet::from([
            Pos::new(0, 0),
            Pos::new(1, 0),
            Pos::new(2, 0),
            Pos::new(2, 1),
            Pos::new(2, 2),
        ])
    );
}

#[test]
fn test_color_bomb_sweeps_partner_type() {
    let rows = fixture(6, 4, &[((0, 0), 0)]);
    let (grid, _) = fixture_grid(&rows, &[(Pos::new(0, 0), BombKind::ColorClear)]);
    let mut targets: HashSet<Pos> = grid
        .pieces()
        .filter(|p| p.piece_type() == 3)
        .map(|p| p.pos())
        .collect();
    // The partner at (1, 0) ends up at (0, 0); the bomb lands on (1, 0).
    targets.insert(Pos::new(0, 0));

    let report = swap(
        &rows,
        &[(Pos::new(0, 0), BombKind::ColorClear)],
        Pos::new(0, 0),
        Pos::new(1, 0),
    );

    let cleared = first_clear(&report);
    assert_eq!(cleared[0].pos, Pos::new(1, 0));
    assert_eq!(cleared[0].bomb, BombKind::ColorClear);
    assert!(cleared[0].detonated);
    assert_eq!(cleared.len(), targets.len());
    assert_eq!(
        positions(cleared).into_iter().collect::<HashSet<_>>(),
        targets
    );
    assert!(cleared[1..].iter().all(|p| p.piece_type == 3 && !p.detonated));
}

#[test]
fn test_row_bomb_clears_its_new_row() {
    let rows = fixture(6, 6, &[]);
    let report = swap(
        &rows,
        &[(Pos::new(2, 2), BombKind::RowClear)],
        Pos::new(2, 2),
        Pos::new(2, 3),
    );

    let cleared = first_clear(&report);
    assert_eq!(cleared[0].pos, Pos::new(2, 3));
    assert!(cleared[0].was_bomb());
    let expected: HashSet<Pos> = (0..6).map(|x| Pos::new(x, 3)).collect();
    assert_eq!(
        positions(cleared).into_iter().collect::<HashSet<_>>(),
        expected
    );
}

#[test]
fn test_two_line_bombs_union_row_and_column() {
    let rows = fixture(6, 4, &[]);
    let report = swap(
        &rows,
        &[
            (Pos::new(1, 1), BombKind::RowClear),
            (Pos::new(2, 1), BombKind::ColumnClear),
        ],
        Pos::new(1, 1),
        Pos::new(2, 1),
    );

    // Row clear now sits at (2, 1), column clear at (1, 1).
    let cleared = first_clear(&report);
    let mut expected: HashSet<Pos> = (0..6).map(|x| Pos::new(x, 1)).collect();
    expected.extend((0..4).map(|y| Pos::new(1, y)));
    assert_eq!(cleared.len(), expected.len());
    assert_eq!(
        positions(cleared).into_iter().collect::<HashSet<_>>(),
        expected
    );
    assert_eq!(cleared.iter().filter(|p| p.detonated).count(), 2);
}

#[test]
fn test_bomb_caught_in_a_match_does_not_fire() {
    let rows = fixture(6, 4, &[((0, 0), 0), ((1, 0), 0), ((2, 0), 1), ((2, 1), 0)]);
    let report = swap(
        &rows,
        &[(Pos::new(1, 0), BombKind::RowClear)],
        Pos::new(2, 0),
        Pos::new(2, 1),
    );

    let cleared = first_clear(&report);
    assert_eq!(cleared.len(), 3);
    assert_eq!(cleared[1].pos, Pos::new(1, 0));
    assert_eq!(cleared[1].bomb, BombKind::RowClear);
    assert!(!cleared[1].detonated);
}

#[test]
fn test_color_bomb_without_target_is_an_error() {
    let rows = fixture(4, 4, &[]);
    let (grid, _) = fixture_grid(&rows, &[(Pos::new(1, 1), BombKind::ColorClear)]);
    let bomb = grid.get(Pos::new(1, 1)).unwrap().unwrap();

    assert_eq!(
        pieces_affected_by_bomb(&grid, &bomb, None),
        Err(EngineError::MissingColorTarget)
    );
    let swept = pieces_affected_by_bomb(&grid, &bomb, Some(2)).unwrap();
    assert_eq!(swept[0], Pos::new(1, 1));
    assert!(swept[1..].iter().all(|&pos| grid.type_at(pos) == Some(2)));
}

#[test]
fn test_corner_of_five_and_four_spawns_one_color_clear() {
    let rows = standing_corner(7, 5, 4);
    let report = swap(&rows, &[], Pos::new(0, 0), Pos::new(1, 0));

    assert_eq!(
        spawns_within(&report, 1),
        [(Pos::new(2, 2), BombKind::ColorClear)]
    );
    assert_eq!(report.bombs_spawned[0], (Pos::new(2, 2), BombKind::ColorClear));
    let cleared = positions(first_clear(&report));
    assert_eq!(cleared.len(), 7);
    assert!(!cleared.contains(&Pos::new(2, 2)));
}

#[test]
fn test_corner_of_two_fours_spawns_one_bomb() {
    let rows = standing_corner(6, 4, 4);
    let report = swap(&rows, &[], Pos::new(0, 0), Pos::new(1, 0));

    // Rows are scanned first, so the row run names the kind.
    assert_eq!(
        spawns_within(&report, 1),
        [(Pos::new(2, 2), BombKind::RowClear)]
    );
    assert_eq!(first_clear(&report).len(), 6);
}

#[test]
fn test_run_outside_blast_spawns_once() {
    // The row bomb lands on row 1; its partner completes four on row 0.
    let rows = fixture(6, 4, &[((0, 0), 0), ((1, 0), 0), ((2, 0), 1), ((3, 0), 0), ((2, 1), 0)]);
    let report = swap(
        &rows,
        &[(Pos::new(2, 0), BombKind::RowClear)],
        Pos::new(2, 0),
        Pos::new(2, 1),
    );

    let blast = positions(first_clear(&report));
    assert_eq!(blast.len(), 6);
    assert!(blast.iter().all(|pos| pos.y == 1));
    assert!(spawns_within(&report, 1).is_empty());

    assert_eq!(
        spawns_within(&report, 2),
        [(Pos::new(0, 0), BombKind::RowClear)]
    );
    let second_clear = report
        .events
        .iter()
        .filter_map(|event| match event {
            BoardEvent::PiecesDestroyed(pieces) => Some(positions(pieces)),
            _ => None,
        })
        .nth(1)
        .unwrap();
    assert!(second_clear.contains(&Pos::new(1, 0)));
    assert!(!second_clear.contains(&Pos::new(0, 0)));
}

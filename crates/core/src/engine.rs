//! Board engine - setup, swaps and the cascade loop
//!
//! The engine owns the grid and is the only thing that mutates it. A swap is
//! resolved completely before [`BoardEngine::request_swap`] returns:
//!
//! 1. validate and tentatively swap
//! 2. fire bombs, or scan for matches (undoing the swap if there are none)
//! 3. clear, spawning bombs for runs of four or more
//! 4. collapse, refill and re-scan until the board is stable
//!
//! Every state change is reported as a [`BoardEvent`], both to the sink and
//! in the returned [`SwapReport`].

use arrayvec::ArrayVec;
use tracing::{debug, info, trace, warn};

use crate::bomb::{classify_run_for_bomb_spawn, resolve_swap_blast, BombSpawnDecision};
use crate::config::EngineConfig;
use crate::events::{BoardEvent, DestroyedPiece, PresentationSink};
use crate::grid::Grid;
use crate::matcher::{find_matches, has_match, matched_positions, MatchGroup};
use crate::piece::{Piece, PieceCatalog, PieceFactory};
use crate::rng::SimpleRng;
use crate::snapshot::BoardSnapshot;
use crate::types::{BombKind, EngineError, EngineResult, EngineState, PieceType, Pos};

/// Outcome of one swap request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SwapReport {
    /// False when the swap made no match and was undone
    pub accepted: bool,
    /// Everything that happened, in order
    pub events: Vec<BoardEvent>,
    /// Collapse/refill passes run
    pub cascade_steps: usize,
    /// Pieces removed over the whole resolution
    pub destroyed: usize,
    /// Bombs created, with where they were placed
    pub bombs_spawned: Vec<(Pos, BombKind)>,
}

/// The board state machine
#[derive(Debug, Clone)]
pub struct BoardEngine<S: PresentationSink = ()> {
    grid: Grid,
    factory: PieceFactory,
    rng: SimpleRng,
    state: EngineState,
    sink: S,
    /// Events of the resolution in progress
    pending: Vec<BoardEvent>,
}

impl<S: PresentationSink> BoardEngine<S> {
    /// Create a board of random pieces with no ready-made matches
    pub fn new(config: &EngineConfig, sink: S) -> EngineResult<Self> {
        config.validate()?;
        let catalog = PieceCatalog::new(config.catalog_size)?;
        catalog.ensure_setup_capable()?;

        let mut grid = Grid::new(config.width, config.height)?;
        let mut factory = PieceFactory::new(catalog);
        let mut rng = SimpleRng::new(config.seed);
        fill_without_matches(&mut grid, &mut factory, &mut rng)?;

        info!(
            width = config.width,
            height = config.height,
            catalog = config.catalog_size,
            seed = config.seed,
            "board set up"
        );

        Ok(Self::assemble(grid, factory, rng, sink))
    }

    /// Wrap an existing grid (fixtures, restored boards).
    ///
    /// New piece ids continue after the highest id already on the grid.
    pub fn from_grid(grid: Grid, catalog: PieceCatalog, seed: u32, sink: S) -> Self {
        let factory = PieceFactory::resume_after(catalog, grid.max_id());
        Self::assemble(grid, factory, SimpleRng::new(seed), sink)
    }

    fn assemble(grid: Grid, factory: PieceFactory, rng: SimpleRng, sink: S) -> Self {
        Self {
            grid,
            factory,
            rng,
            state: EngineState::Idle,
            sink,
            pending: Vec::new(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn catalog(&self) -> PieceCatalog {
        self.factory.catalog()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::from_grid(&self.grid)
    }

    /// Input-source entry point taking raw coordinates
    pub fn try_select_and_swap(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
    ) -> EngineResult<SwapReport> {
        let a = self.grid.pos_checked(x1, y1)?;
        let b = self.grid.pos_checked(x2, y2)?;
        self.request_swap(a, b)
    }

    /// Swap the pieces at `a` and `b` and resolve the result.
    ///
    /// Fails without touching the board or emitting events when a cell is out
    /// of bounds or empty, the cells are not adjacent, or a resolution is
    /// already running.
    pub fn request_swap(&mut self, a: Pos, b: Pos) -> EngineResult<SwapReport> {
        let first = self.occupied(a)?;
        let second = self.occupied(b)?;
        if !a.is_adjacent(b) {
            return Err(EngineError::NotAdjacent { a, b });
        }
        if self.state != EngineState::Idle {
            return Err(EngineError::Busy);
        }

        self.state = EngineState::Resolving;
        let result = self.resolve_swap(first, second);
        self.state = EngineState::Idle;

        let events = std::mem::take(&mut self.pending);
        result.map(|mut report| {
            report.events = events;
            report
        })
    }

    fn occupied(&self, pos: Pos) -> EngineResult<Piece> {
        self.grid.get(pos)?.ok_or(EngineError::EmptyCell {
            x: pos.x,
            y: pos.y,
        })
    }

    fn emit(&mut self, event: BoardEvent) {
        self.sink.on_event(&event);
        self.pending.push(event);
    }

    fn resolve_swap(&mut self, first: Piece, second: Piece) -> EngineResult<SwapReport> {
        let (a, b) = (first.pos(), second.pos());
        self.grid.swap(a, b)?;
        self.emit(BoardEvent::SwapAnimate {
            first: first.id(),
            from: a,
            second: second.id(),
            to: b,
        });

        let mut report = SwapReport {
            accepted: true,
            ..SwapReport::default()
        };

        if first.is_bomb() || second.is_bomb() {
            let moved_first = self.occupied(b)?;
            let moved_second = self.occupied(a)?;
            let blast = resolve_swap_blast(&self.grid, &moved_first, &moved_second)?;
            debug!(
                detonations = blast.detonations.len(),
                cells = blast.cells.len(),
                "bomb swap"
            );
            let detonated: ArrayVec<Pos, 2> = blast.detonations.iter().map(|d| d.pos).collect();
            self.clear(blast.cells, &detonated, &mut report)?;
        } else {
            let groups = find_matches(&self.grid);
            if groups.is_empty() {
                self.grid.swap(a, b)?;
                self.emit(BoardEvent::SwapRejected {
                    first: first.id(),
                    from: a,
                    second: second.id(),
                    to: b,
                });
                debug!(%a, %b, "swap rejected");
                return Ok(SwapReport::default());
            }
            debug!(%a, %b, groups = groups.len(), "swap accepted");
            self.clear(matched_positions(&groups), &[], &mut report)?;
        }

        self.cascade(&mut report)?;
        self.emit(BoardEvent::CascadeSettled);
        Ok(report)
    }

    /// Remove `destroy` from the board, except anchors of runs long enough to
    /// become bombs. Runs are re-scanned here, so only currently matched
    /// groups spawn bombs, never the wider blast set.
    fn clear(
        &mut self,
        mut destroy: Vec<Pos>,
        detonated: &[Pos],
        report: &mut SwapReport,
    ) -> EngineResult<()> {
        let groups = find_matches(&self.grid);
        for (anchor, kind) in plan_bomb_spawns(&groups, &destroy) {
            if detonated.contains(&anchor) {
                continue;
            }
            destroy.retain(|pos| *pos != anchor);
            if self.occupied(anchor)?.bomb().rank() >= kind.rank() {
                continue;
            }
            let piece = self.grid.promote(anchor, kind)?;
            report.bombs_spawned.push((anchor, kind));
            self.emit(BoardEvent::BombSpawned {
                id: piece.id(),
                pos: anchor,
                kind,
            });
        }

        let mut removed = Vec::with_capacity(destroy.len());
        for pos in destroy {
            if let Some(piece) = self.grid.get(pos)? {
                removed.push(DestroyedPiece {
                    id: piece.id(),
                    pos,
                    piece_type: piece.piece_type(),
                    bomb: piece.bomb(),
                    detonated: detonated.contains(&pos),
                });
            }
        }
        if removed.is_empty() {
            return Ok(());
        }

        for piece in &removed {
            self.grid.take(piece.pos)?;
        }
        report.destroyed += removed.len();
        self.emit(BoardEvent::PiecesDestroyed(removed));
        Ok(())
    }

    /// Collapse, refill and re-scan until no run remains.
    ///
    /// Bounded by the cell count; hitting the bound leaves a full board that
    /// may still hold a run.
    fn cascade(&mut self, report: &mut SwapReport) -> EngineResult<()> {
        let limit = self.grid.len();
        loop {
            self.collapse()?;
            self.refill()?;
            report.cascade_steps += 1;

            let groups = find_matches(&self.grid);
            if groups.is_empty() {
                return Ok(());
            }
            if report.cascade_steps >= limit {
                warn!(steps = report.cascade_steps, "cascade bound reached");
                return Ok(());
            }
            trace!(
                step = report.cascade_steps,
                groups = groups.len(),
                "cascade step"
            );
            self.clear(matched_positions(&groups), &[], report)?;
        }
    }

    /// Slide pieces down over gaps, keeping their order within the column
    fn collapse(&mut self) -> EngineResult<()> {
        let (width, height) = (self.grid.width() as i8, self.grid.height() as i8);
        for x in 0..width {
            let mut write_y = 0;
            for y in 0..height {
                let from = Pos::new(x, y);
                let Some(piece) = self.grid.get(from)? else {
                    continue;
                };
                if y != write_y {
                    self.grid.take(from)?;
                    self.grid.set(Pos::new(x, write_y), Some(piece))?;
                    self.emit(BoardEvent::PieceCollapsed {
                        id: piece.id(),
                        x,
                        from_y: y,
                        to_y: write_y,
                    });
                }
                write_y += 1;
            }
        }
        Ok(())
    }

    /// Fill empty cells with random pieces, bottom of each gap first
    fn refill(&mut self) -> EngineResult<()> {
        for pos in self.grid.positions().collect::<Vec<_>>() {
            if self.grid.get(pos)?.is_some() {
                continue;
            }
            let piece = self.factory.spawn_random(&mut self.rng, pos);
            self.grid.set(pos, Some(piece))?;
            self.emit(BoardEvent::PieceSpawned {
                id: piece.id(),
                pos,
                piece_type: piece.piece_type(),
            });
        }
        Ok(())
    }

    /// First swap that would make a match, or `None` if the board is stuck.
    ///
    /// Cells are probed row by row from the bottom, left to right, trying the
    /// right neighbor before the one above. Bomb swaps are not considered.
    pub fn find_possible_move(&self) -> Option<(Pos, Pos)> {
        let mut probe = self.grid.clone();
        let candidates: Vec<Pos> = probe.positions().collect();
        for pos in candidates {
            if probe.type_at(pos).is_none() {
                continue;
            }
            for next in [pos.right(), pos.up()] {
                if probe.type_at(next).is_none() || probe.swap(pos, next).is_err() {
                    continue;
                }
                let found = has_match(&probe);
                if probe.swap(pos, next).is_err() {
                    return None;
                }
                if found {
                    return Some((pos, next));
                }
            }
        }
        None
    }

    pub fn has_possible_move(&self) -> bool {
        self.find_possible_move().is_some()
    }
}

/// One bomb per anchor cell, in scan order.
///
/// Runs sharing an anchor keep the strongest kind; on a tie the first run
/// scanned wins, so rows beat columns. Runs with no cell in `destroy` stay on
/// the board and spawn when a later pass clears them.
fn plan_bomb_spawns(groups: &[MatchGroup], destroy: &[Pos]) -> Vec<(Pos, BombKind)> {
    let mut plan: Vec<(Pos, BombKind)> = Vec::new();
    for group in groups {
        if !group.cells().iter().any(|pos| destroy.contains(pos)) {
            continue;
        }
        let BombSpawnDecision::Spawn { anchor, kind } = classify_run_for_bomb_spawn(group) else {
            continue;
        };
        match plan.iter_mut().find(|(pos, _)| *pos == anchor) {
            Some(entry) if kind.rank() > entry.1.rank() => entry.1 = kind,
            Some(_) => {}
            None => plan.push((anchor, kind)),
        }
    }
    plan
}

/// Fill every cell, refusing types that would complete a run with pieces
/// already placed.
///
/// Cells are filled column by column from the bottom, so only the left and
/// lower neighbors are known when a cell is drawn. If every type is refused
/// the draw falls back to any type.
fn fill_without_matches(
    grid: &mut Grid,
    factory: &mut PieceFactory,
    rng: &mut SimpleRng,
) -> EngineResult<()> {
    let catalog = factory.catalog();
    let (width, height) = (grid.width() as i8, grid.height() as i8);

    for x in 0..width {
        for y in 0..height {
            let pos = Pos::new(x, y);
            let forbidden = forbidden_types(grid, pos);
            let allowed: Vec<PieceType> = (0..catalog.size())
                .filter(|t| !forbidden.contains(t))
                .collect();

            let piece_type = match rng.pick(&allowed) {
                Some(t) => t,
                None => {
                    warn!(%pos, "every piece type would match, picking freely");
                    rng.next_type(catalog.size())
                }
            };
            let piece = factory.spawn(piece_type, pos)?;
            grid.set(pos, Some(piece))?;
        }
    }
    Ok(())
}

fn forbidden_types(grid: &Grid, pos: Pos) -> ArrayVec<PieceType, 3> {
    let at = |dx: i8, dy: i8| grid.type_at(Pos::new(pos.x + dx, pos.y + dy));
    let pairs = [
        // two to the left
        (at(-1, 0), at(-2, 0)),
        // one on each side
        (at(-1, 0), at(1, 0)),
        // two below
        (at(0, -1), at(0, -2)),
    ];

    let mut forbidden = ArrayVec::new();
    for pair in pairs {
        if let (Some(a), Some(b)) = pair {
            if a == b && !forbidden.contains(&a) {
                forbidden.push(a);
            }
        }
    }
    forbidden
}

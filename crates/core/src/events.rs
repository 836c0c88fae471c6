//! Events emitted to the presentation layer
//!
//! The engine resolves a move completely before returning, and describes what
//! happened as an ordered list of [`BoardEvent`]s. Each event is also pushed
//! to the engine's [`PresentationSink`] as it is produced. A sink may replay
//! them at its own pace; nothing it does feeds back into board state.

use crate::types::{BombKind, PieceId, PieceType, Pos};

/// One piece removed by a clear step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DestroyedPiece {
    pub id: PieceId,
    pub pos: Pos,
    pub piece_type: PieceType,
    /// Bomb kind the piece carried when it was removed
    pub bomb: BombKind,
    /// The piece was one of the bombs fired by the swap
    pub detonated: bool,
}

impl DestroyedPiece {
    pub fn was_bomb(&self) -> bool {
        self.bomb.is_bomb()
    }
}

/// State transitions, in the order they happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// `first` moved `from -> to`, `second` moved `to -> from`
    SwapAnimate {
        first: PieceId,
        from: Pos,
        second: PieceId,
        to: Pos,
    },
    /// The swap made no match and was undone; both pieces are back in place
    SwapRejected {
        first: PieceId,
        from: Pos,
        second: PieceId,
        to: Pos,
    },
    PiecesDestroyed(Vec<DestroyedPiece>),
    BombSpawned {
        id: PieceId,
        pos: Pos,
        kind: BombKind,
    },
    PieceCollapsed {
        id: PieceId,
        x: i8,
        from_y: i8,
        to_y: i8,
    },
    PieceSpawned {
        id: PieceId,
        pos: Pos,
        piece_type: PieceType,
    },
    /// Resolution finished; the board is stable and accepts input again
    CascadeSettled,
}

impl BoardEvent {
    /// Route the event to the matching sink callback
    pub fn dispatch<S: PresentationSink + ?Sized>(&self, sink: &mut S) {
        match self {
            BoardEvent::SwapAnimate {
                first,
                from,
                second,
                to,
            } => sink.on_swap_animate(*first, *from, *second, *to),
            BoardEvent::SwapRejected {
                first,
                from,
                second,
                to,
            } => sink.on_swap_rejected(*first, *from, *second, *to),
            BoardEvent::PiecesDestroyed(pieces) => sink.on_pieces_destroyed(pieces),
            BoardEvent::BombSpawned { id, pos, kind } => sink.on_bomb_spawned(*id, *pos, *kind),
            BoardEvent::PieceCollapsed {
                id,
                x,
                from_y,
                to_y,
            } => sink.on_piece_collapsed(*id, *x, *from_y, *to_y),
            BoardEvent::PieceSpawned {
                id,
                pos,
                piece_type,
            } => sink.on_piece_spawned(*id, *pos, *piece_type),
            BoardEvent::CascadeSettled => sink.on_cascade_settled(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BoardEvent::SwapAnimate { .. } => "swap_animate",
            BoardEvent::SwapRejected { .. } => "swap_rejected",
            BoardEvent::PiecesDestroyed(_) => "pieces_destroyed",
            BoardEvent::BombSpawned { .. } => "bomb_spawned",
            BoardEvent::PieceCollapsed { .. } => "piece_collapsed",
            BoardEvent::PieceSpawned { .. } => "piece_spawned",
            BoardEvent::CascadeSettled => "cascade_settled",
        }
    }
}

/// Receiver of board notifications (fire-and-forget).
///
/// Every callback defaults to a no-op. Sinks that want whole events override
/// [`on_event`](PresentationSink::on_event) instead of the individual callbacks.
#[allow(unused_variables)]
pub trait PresentationSink {
    /// Entry point used by the engine; dispatches to the callbacks below
    fn on_event(&mut self, event: &BoardEvent) {
        event.dispatch(self);
    }

    fn on_swap_animate(&mut self, first: PieceId, from: Pos, second: PieceId, to: Pos) {}

    fn on_swap_rejected(&mut self, first: PieceId, from: Pos, second: PieceId, to: Pos) {}

    fn on_pieces_destroyed(&mut self, pieces: &[DestroyedPiece]) {}

    fn on_bomb_spawned(&mut self, id: PieceId, pos: Pos, kind: BombKind) {}

    fn on_piece_collapsed(&mut self, id: PieceId, x: i8, from_y: i8, to_y: i8) {}

    fn on_piece_spawned(&mut self, id: PieceId, pos: Pos, piece_type: PieceType) {}

    fn on_cascade_settled(&mut self) {}
}

/// Null sink
impl PresentationSink for () {
    fn on_event(&mut self, _event: &BoardEvent) {}
}

impl<S: PresentationSink + ?Sized> PresentationSink for &mut S {
    fn on_event(&mut self, event: &BoardEvent) {
        (**self).on_event(event);
    }
}

impl<S: PresentationSink + ?Sized> PresentationSink for Box<S> {
    fn on_event(&mut self, event: &BoardEvent) {
        (**self).on_event(event);
    }
}

/// Sink that keeps every event it receives
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<BoardEvent>,
}

impl EventLog {
    pub fn events(&self) -> &[BoardEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Take the recorded events, leaving the log empty
    pub fn drain(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }
}

impl PresentationSink for EventLog {
    fn on_event(&mut self, event: &BoardEvent) {
        self.events.push(event.clone());
    }
}

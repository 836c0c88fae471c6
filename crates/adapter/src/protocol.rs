//! Protocol module - JSON message types for board events
//!
//! Every message carries `type` and `seq` (sequence number within one
//! stream). Field names are snake_case; bomb kinds use their lowercase names.

use serde::{Deserialize, Serialize};

use crate::core::{BoardEvent, BoardSnapshot, DestroyedPiece};
use crate::types::{Axis, BombKind, Pos};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PosWire {
    pub x: i8,
    pub y: i8,
}

impl From<Pos> for PosWire {
    fn from(value: Pos) -> Self {
        Self {
            x: value.x,
            y: value.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BombKindLower {
    None,
    RowClear,
    ColumnClear,
    ColorClear,
}

impl From<BombKind> for BombKindLower {
    fn from(value: BombKind) -> Self {
        match value {
            BombKind::None => Self::None,
            BombKind::RowClear => Self::RowClear,
            BombKind::ColumnClear => Self::ColumnClear,
            BombKind::ColorClear => Self::ColorClear,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisLower {
    Horizontal,
    Vertical,
}

impl From<Axis> for AxisLower {
    fn from(value: Axis) -> Self {
        match value {
            Axis::Horizontal => Self::Horizontal,
            Axis::Vertical => Self::Vertical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestroyedWire {
    pub id: u32,
    pub x: i8,
    pub y: i8,
    pub piece_type: u8,
    pub bomb: BombKindLower,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blast_axis: Option<AxisLower>,
    pub detonated: bool,
}

impl From<&DestroyedPiece> for DestroyedWire {
    fn from(value: &DestroyedPiece) -> Self {
        Self {
            id: value.id.get(),
            x: value.pos.x,
            y: value.pos.y,
            piece_type: value.piece_type,
            bomb: value.bomb.into(),
            blast_axis: value.bomb.axis().map(AxisLower::from),
            detonated: value.detonated,
        }
    }
}

/// Board event in wire form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventMessage {
    SwapAnimate {
        first: u32,
        from: PosWire,
        second: u32,
        to: PosWire,
    },
    SwapRejected {
        first: u32,
        from: PosWire,
        second: u32,
        to: PosWire,
    },
    PiecesDestroyed {
        pieces: Vec<DestroyedWire>,
    },
    BombSpawned {
        id: u32,
        at: PosWire,
        kind: BombKindLower,
    },
    PieceCollapsed {
        id: u32,
        x: i8,
        from_y: i8,
        to_y: i8,
    },
    PieceSpawned {
        id: u32,
        at: PosWire,
        piece_type: u8,
    },
    CascadeSettled,
}

impl From<&BoardEvent> for EventMessage {
    fn from(value: &BoardEvent) -> Self {
        match value {
            BoardEvent::SwapAnimate {
                first,
                from,
                second,
                to,
            } => Self::SwapAnimate {
                first: first.get(),
                from: (*from).into(),
                second: second.get(),
                to: (*to).into(),
            },
            BoardEvent::SwapRejected {
                first,
                from,
                second,
                to,
            } => Self::SwapRejected {
                first: first.get(),
                from: (*from).into(),
                second: second.get(),
                to: (*to).into(),
            },
            BoardEvent::PiecesDestroyed(pieces) => Self::PiecesDestroyed {
                pieces: pieces.iter().map(DestroyedWire::from).collect(),
            },
            BoardEvent::BombSpawned { id, pos, kind } => Self::BombSpawned {
                id: id.get(),
                at: (*pos).into(),
                kind: (*kind).into(),
            },
            BoardEvent::PieceCollapsed {
                id,
                x,
                from_y,
                to_y,
            } => Self::PieceCollapsed {
                id: id.get(),
                x: *x,
                from_y: *from_y,
                to_y: *to_y,
            },
            BoardEvent::PieceSpawned {
                id,
                pos,
                piece_type,
            } => Self::PieceSpawned {
                id: id.get(),
                at: (*pos).into(),
                piece_type: *piece_type,
            },
            BoardEvent::CascadeSettled => Self::CascadeSettled,
        }
    }
}

/// Event plus its position in the stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub seq: u64,
    #[serde(flatten)]
    pub event: EventMessage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnapshotType {
    #[serde(rename = "snapshot")]
    Snapshot,
}

impl Default for SnapshotType {
    fn default() -> Self {
        Self::Snapshot
    }
}

/// Whole board, for a renderer that (re)starts mid-stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: SnapshotType,
    pub seq: u64,
    pub width: u8,
    pub height: u8,
    /// Row-major from the bottom row: 0 = empty, otherwise piece type + 1
    pub cells: Vec<u8>,
    /// Bomb kind per cell, same layout as `cells`
    pub bombs: Vec<BombKindLower>,
}

pub fn create_snapshot(seq: u64, snapshot: &BoardSnapshot) -> SnapshotMessage {
    let mut cells = Vec::with_capacity(snapshot.cells.len());
    snapshot.write_u8_grid(&mut cells);
    let bombs = snapshot
        .cells
        .iter()
        .map(|cell| cell.map_or(BombKindLower::None, |c| c.bomb.into()))
        .collect();
    SnapshotMessage {
        msg_type: SnapshotType::Snapshot,
        seq,
        width: snapshot.width,
        height: snapshot.height,
        cells,
        bombs,
    }
}

pub fn create_event(seq: u64, event: &BoardEvent) -> EventEnvelope {
    EventEnvelope {
        seq,
        event: event.into(),
    }
}

/// Serialize one message as a single JSON line (without the newline)
pub fn encode_line<T: Serialize>(message: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string(message)?)
}

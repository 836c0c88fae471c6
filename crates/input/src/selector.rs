//! Two-click selection.
//!
//! - first click selects a cell
//! - clicking an adjacent cell requests a swap and clears the selection
//! - clicking any other cell, the selected one included, selects it instead
//!
//! Only [`Selector::clear`] drops the selection.

use tracing::trace;

use crate::types::Pos;

/// What a click did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Selected(Pos),
    /// Selection moved from `previous` to `current` (possibly the same cell)
    Reselected { previous: Pos, current: Pos },
    /// Two adjacent cells picked; hand them to the engine
    SwapRequested(Pos, Pos),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selector {
    selected: Option<Pos>,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<Pos> {
        self.selected
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn click(&mut self, pos: Pos) -> SelectOutcome {
        let outcome = match self.selected {
            None => {
                self.selected = Some(pos);
                SelectOutcome::Selected(pos)
            }
            Some(previous) if previous.is_adjacent(pos) => {
                self.selected = None;
                SelectOutcome::SwapRequested(previous, pos)
            }
            Some(previous) => {
                self.selected = Some(pos);
                SelectOutcome::Reselected {
                    previous,
                    current: pos,
                }
            }
        };
        trace!(?outcome, "click");
        outcome
    }
}

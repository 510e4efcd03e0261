//! Reorder Controller: drag-start id + drag-over id → new block order.
//!
//! A reorder is a *move*: the dragged block is removed from its index and
//! inserted at the target's index, so every block in between shifts by one.
//! It never swaps.
//!
//! [`DragTracker`] turns raw pointer events into a reorder. A press only
//! becomes a drag once the pointer has travelled further than the activation
//! distance; anything shorter is a click on the block.

use munipage_types::{Block, BlockId};

/// Pointer travel (in pixels) before a press becomes a drag.
pub const DEFAULT_ACTIVATION_DISTANCE: f32 = 6.0;

/// Move the element at `from` to `to`, shifting the ones in between.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to || from >= items.len() || to >= items.len() {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

/// Reorder `blocks` by moving `active` to where `over` is.
///
/// Returns the input unchanged when the ids are equal or either is missing.
pub fn reorder(mut blocks: Vec<Block>, active: &BlockId, over: &BlockId) -> Vec<Block> {
    reorder_in_place(&mut blocks, active, over);
    blocks
}

/// In-place [`reorder`]. Returns whether the order changed.
pub fn reorder_in_place(blocks: &mut Vec<Block>, active: &BlockId, over: &BlockId) -> bool {
    if active == over {
        return false;
    }
    let Some(from) = blocks.iter().position(|b| b.id() == active) else {
        return false;
    };
    let Some(to) = blocks.iter().position(|b| b.id() == over) else {
        return false;
    };
    array_move(blocks, from, to);
    true
}

#[derive(Clone, Debug, PartialEq)]
enum DragState {
    Idle,
    /// Pressed, not yet past the activation distance.
    Pending { active: BlockId, origin: (f32, f32) },
    Dragging { active: BlockId, over: Option<BlockId> },
}

/// How a press ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DragOutcome {
    /// No press was in progress.
    Idle,
    /// Released before the activation distance: a click on the block.
    Click(BlockId),
    /// Released over a block: apply [`reorder`].
    Drop { active: BlockId, over: BlockId },
    /// Released outside any block, or cancelled.
    Cancelled,
}

/// Pointer-gesture state for block dragging.
#[derive(Clone, Debug)]
pub struct DragTracker {
    activation_distance: f32,
    state: DragState,
}

impl Default for DragTracker {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIVATION_DISTANCE)
    }
}

impl DragTracker {
    pub fn new(activation_distance: f32) -> Self {
        Self {
            activation_distance: activation_distance.max(0.0),
            state: DragState::Idle,
        }
    }

    pub fn activation_distance(&self) -> f32 {
        self.activation_distance
    }

    /// Pointer pressed on a block's drag handle.
    pub fn pointer_down(&mut self, block: BlockId, x: f32, y: f32) {
        self.state = DragState::Pending {
            active: block,
            origin: (x, y),
        };
    }

    /// Pointer moved. `over` is the block currently under the pointer.
    ///
    /// Returns whether a drag is in progress after this event.
    pub fn pointer_move(&mut self, x: f32, y: f32, over: Option<BlockId>) -> bool {
        match &mut self.state {
            DragState::Idle => false,
            DragState::Pending { active, origin } => {
                let travelled = (x - origin.0).hypot(y - origin.1);
                if travelled > self.activation_distance {
                    let active = active.clone();
                    self.state = DragState::Dragging { active, over };
                    true
                } else {
                    false
                }
            }
            DragState::Dragging { over: current, .. } => {
                *current = over;
                true
            }
        }
    }

    /// Pointer released.
    pub fn pointer_up(&mut self) -> DragOutcome {
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Idle => DragOutcome::Idle,
            DragState::Pending { active, .. } => DragOutcome::Click(active),
            DragState::Dragging {
                active,
                over: Some(over),
            } => DragOutcome::Drop { active, over },
            DragState::Dragging { over: None, .. } => DragOutcome::Cancelled,
        }
    }

    /// Abort the gesture (escape key, pointer lost).
    pub fn cancel(&mut self) -> DragOutcome {
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Idle => DragOutcome::Idle,
            _ => DragOutcome::Cancelled,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The block being pressed or dragged.
    pub fn active(&self) -> Option<&BlockId> {
        match &self.state {
            DragState::Idle => None,
            DragState::Pending { active, .. } | DragState::Dragging { active, .. } => Some(active),
        }
    }
}

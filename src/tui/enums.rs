//! Enumerations for TUI state management.

use crate::drag::Slot;
use crate::task::TaskId;

/// Which screen or popup has the keyboard.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BoardMode {
    Browse,
    /// A card is picked up and follows the arrow keys.
    Carrying,
    TaskForm,
    Comment,
    ConfirmDelete,
    Detail,
    Help,
}

/// The card being carried and where it would land.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Carry {
    pub task_id: TaskId,
    pub source: Slot,
    pub target: Slot,
}

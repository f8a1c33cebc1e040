//! Drag-and-drop transitions between board columns.
//!
//! A drag ends with a source slot and, unless it was cancelled, a destination
//! slot. Only a change of column is a transition; dropping a card elsewhere in
//! its own column reorders the view and is forgotten on the next reload.

use crate::fields::Status;
use crate::task::{Task, TaskId};

/// A position on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub column: Status,
    pub index: usize,
}

impl Slot {
    pub fn new(column: Status, index: usize) -> Self {
        Slot { column, index }
    }
}

/// The end of a drag gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragEvent {
    pub task_id: TaskId,
    pub source: Slot,
    /// `None` when the card was dropped outside any column or the drag was cancelled.
    pub destination: Option<Slot>,
}

/// Work out the task update a drop implies, if any.
///
/// Returns a copy of `task` with its status set to the destination column, or
/// `None` when the drop is not a status change.
pub fn plan_transition(source: Slot, destination: Option<Slot>, task: &Task) -> Option<Task> {
    let destination = destination?;
    if destination == source {
        return None;
    }
    if task.status.is(destination.column) {
        return None;
    }
    Some(task.with_status(destination.column))
}

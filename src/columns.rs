//! Column projection of the task snapshot.
//!
//! The board never stores columns; they are recomputed from the store's
//! snapshot whenever it changes.

use crate::fields::Status;
use crate::task::Task;

/// Tasks partitioned by status, each column in snapshot order.
#[derive(Debug, Default)]
pub struct Columns<'a> {
    buckets: [Vec<&'a Task>; 3],
    hidden: usize,
}

impl<'a> Columns<'a> {
    pub fn column(&self, status: Status) -> &[&'a Task] {
        &self.buckets[status.index()]
    }

    /// Task at `index` in the given column.
    pub fn get(&self, status: Status, index: usize) -> Option<&'a Task> {
        self.buckets[status.index()].get(index).copied()
    }

    pub fn len(&self, status: Status) -> usize {
        self.buckets[status.index()].len()
    }

    /// Tasks shown across all columns.
    pub fn total(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    /// Tasks whose status matched no column and are therefore not shown.
    pub fn hidden(&self) -> usize {
        self.hidden
    }

    /// Locate a task by id: its column and position within it.
    pub fn position_of(&self, id: &crate::task::TaskId) -> Option<(Status, usize)> {
        Status::ALL.into_iter().find_map(|status| {
            self.column(status)
                .iter()
                .position(|t| t.id.as_ref() == Some(id))
                .map(|i| (status, i))
        })
    }
}

/// Partition `tasks` into the three status columns.
pub fn project(tasks: &[Task]) -> Columns<'_> {
    let mut columns = Columns::default();
    for task in tasks {
        match task.column() {
            Some(status) => columns.buckets[status.index()].push(task),
            None => columns.hidden += 1,
        }
    }
    columns
}

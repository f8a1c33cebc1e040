//! The board: owner of the task store and the only caller of the sync adapter.
//!
//! Every write goes to the server first and is followed by a full reload; the
//! snapshot is never patched locally. Views get read-only access through
//! [`Board::tasks`] and [`Board::columns`].

use crate::api::TaskApi;
use crate::columns::{self, Columns};
use crate::drag::{plan_transition, DragEvent};
use crate::error::{Error, Result};
use crate::fields::Status;
use crate::store::{LoadOutcome, TaskStore};
use crate::task::{Task, TaskId};

pub struct Board<A> {
    api: A,
    store: TaskStore,
}

impl<A: TaskApi> Board<A> {
    /// Create a board with an empty snapshot. Call [`Board::reload`] to populate it.
    pub fn new(api: A) -> Self {
        Board {
            api,
            store: TaskStore::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.all()
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.store.get(id)
    }

    pub fn columns(&self) -> Columns<'_> {
        columns::project(self.store.all())
    }

    /// Replace the snapshot with the server's current task list.
    pub fn reload(&mut self) -> Result<LoadOutcome> {
        self.store.load(&self.api)
    }

    /// Reload after a successful write. A failure here is logged only: the write
    /// itself went through and must not be reported (and retried) as failed.
    fn resync(&mut self) {
        if let Err(e) = self.reload() {
            tracing::warn!(error = %e, "write succeeded but reload failed; board may be stale");
        }
    }

    /// Create a task. Returns the task as the server echoed it, or the sent
    /// draft when the response carried no task record.
    pub fn create(&mut self, task: &Task) -> Result<Task> {
        let created = self.api.create_task(task).map_err(|e| {
            tracing::error!(error = %e, title = %task.title, "error adding task");
            e
        })?;
        self.resync();
        Ok(created.unwrap_or_else(|| task.clone()))
    }

    /// Send the full task to the server under its id. Returns the task from
    /// the refreshed snapshot when it is there.
    pub fn update(&mut self, task: &Task) -> Result<Task> {
        let id = task.id.clone().ok_or_else(|| Error::MissingId(task.title.clone()))?;
        let echoed = self.api.update_task(task, &id).map_err(|e| {
            tracing::error!(error = %e, task = %task.label(), "error updating task");
            e
        })?;
        self.resync();
        Ok(self
            .store
            .get(&id)
            .cloned()
            .or(echoed)
            .unwrap_or_else(|| task.clone()))
    }

    pub fn delete(&mut self, id: &TaskId) -> Result<()> {
        self.api.delete_task(id).map_err(|e| {
            tracing::error!(error = %e, %id, "error deleting task");
            e
        })?;
        self.resync();
        Ok(())
    }

    /// Handle the end of a drag.
    ///
    /// Returns the column the task moved to, or `None` when the drop was not a
    /// status change (cancelled, same slot, reorder, unknown task).
    pub fn drag(&mut self, event: &DragEvent) -> Result<Option<Status>> {
        let Some(task) = self.store.get(&event.task_id) else {
            tracing::debug!(id = %event.task_id, "dropped task is not in the snapshot");
            return Ok(None);
        };
        let Some(planned) = plan_transition(event.source, event.destination, task) else {
            tracing::debug!(id = %event.task_id, "drop is not a status change");
            return Ok(None);
        };
        let to = planned.column();
        self.update(&planned)?;
        Ok(to)
    }

    /// Append a comment to a task's reviewer log. Blank comments send nothing.
    pub fn add_comment(&mut self, id: &TaskId, comment: &str) -> Result<bool> {
        let mut task = self.require(id)?.clone();
        if !task.append_comment(comment) {
            return Ok(false);
        }
        self.update(&task)?;
        Ok(true)
    }

    /// Set a task's self evaluation. Ignored (nothing sent) unless the task is done.
    pub fn set_self_evaluation(&mut self, id: &TaskId, score: u8) -> Result<bool> {
        let mut task = self.require(id)?.clone();
        if !task.set_self_evaluation(score) {
            tracing::debug!(%id, score, "self evaluation rejected");
            return Ok(false);
        }
        self.update(&task)?;
        Ok(true)
    }

    fn require(&self, id: &TaskId) -> Result<&Task> {
        self.store
            .get(id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))
    }

    /// Resolve a task identifier (either id or title) to a task.
    /// Titles match case-insensitively and must be unique.
    pub fn resolve(&self, identifier: &str) -> Result<&Task> {
        if let Some(task) = self.store.get(&TaskId::new(identifier)) {
            return Ok(task);
        }

        let wanted = identifier.to_lowercase();
        let matches: Vec<&Task> = self
            .store
            .all()
            .iter()
            .filter(|t| t.title.to_lowercase() == wanted)
            .collect();

        match matches.as_slice() {
            [] => Err(Error::TaskNotFound(identifier.to_string())),
            [task] => Ok(*task),
            many => {
                let mut msg = format!("Multiple tasks found with title '{identifier}':\n");
                for t in many {
                    let id = t.id.as_ref().map(TaskId::as_str).unwrap_or("-");
                    msg.push_str(&format!("  {id}: {} [{}]\n", t.title, t.status));
                }
                msg.push_str("Please use the id instead.");
                Err(Error::AmbiguousTask(msg))
            }
        }
    }
}

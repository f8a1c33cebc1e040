//! In-memory task store.
//!
//! Holds the latest snapshot fetched from the server. The snapshot is only
//! ever replaced wholesale by a completed load; nothing patches it in place.
//! Loads are numbered so a response that arrives after a newer one has been
//! applied is discarded instead of overwriting fresher data.

use crate::api::TaskApi;
use crate::error::Result;
use crate::task::{Task, TaskId};

/// Sequence number handed out when a load starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

/// What a finished load did to the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Snapshot replaced; holds the new task count.
    Replaced(usize),
    /// A newer load had already been applied; response ignored.
    Stale,
}

#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    issued: u64,
    applied: u64,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next load sequence number.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        LoadTicket(self.issued)
    }

    /// Apply the result of the load identified by `ticket`.
    ///
    /// On error the previous snapshot is kept and the error is returned.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<Vec<Task>>) -> Result<LoadOutcome> {
        let tasks = match result {
            Ok(tasks) => tasks,
            Err(e) => {
                tracing::error!(error = %e, ticket = ticket.0, "error fetching tasks, keeping previous snapshot");
                return Err(e);
            }
        };
        if ticket.0 <= self.applied {
            tracing::debug!(ticket = ticket.0, applied = self.applied, "discarding stale task list");
            return Ok(LoadOutcome::Stale);
        }
        for task in tasks.iter().filter(|t| t.column().is_none()) {
            tracing::warn!(task = %task.label(), status = %task.status, "task has an unrecognised status and will not be shown");
        }
        self.applied = ticket.0;
        self.tasks = tasks;
        Ok(LoadOutcome::Replaced(self.tasks.len()))
    }

    /// Fetch the task list and replace the snapshot with it.
    pub fn load(&mut self, api: &impl TaskApi) -> Result<LoadOutcome> {
        let ticket = self.begin_load();
        let result = api.fetch_tasks();
        self.finish_load(ticket, result)
    }

    /// Current snapshot in the order the server sent it.
    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id.as_ref() == Some(id))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn task(id: &str) -> Task {
        serde_json::from_value(serde_json::json!({"_id": id, "title": id, "status": "To Do"})).unwrap()
    }

    fn ids(store: &TaskStore) -> Vec<String> {
        store.all().iter().map(|t| t.id.clone().unwrap().to_string()).collect()
    }

    #[test]
    fn reload_replaces_rather_than_merges() {
        let mut store = TaskStore::new();
        let t = store.begin_load();
        store.finish_load(t, Ok(vec![task("T1"), task("T2")])).unwrap();
        assert_eq!(ids(&store), vec!["T1", "T2"]);

        let t = store.begin_load();
        let outcome = store.finish_load(t, Ok(vec![task("T3")])).unwrap();
        assert_eq!(outcome, LoadOutcome::Replaced(1));
        assert_eq!(ids(&store), vec!["T3"]);
        assert!(store.get(&TaskId::new("T1")).is_none());
    }

    #[test]
    fn failed_load_keeps_previous_snapshot() {
        let mut store = TaskStore::new();
        let t = store.begin_load();
        store.finish_load(t, Ok(vec![task("T1")])).unwrap();

        let t = store.begin_load();
        let err = store
            .finish_load(t, Err(Error::Status { status: 500, body: String::new() }))
            .unwrap_err();
        assert!(matches!(err, Error::Status { status: 500, .. }));
        assert_eq!(ids(&store), vec!["T1"]);
    }

    #[test]
    fn first_load_failure_leaves_store_empty() {
        let mut store = TaskStore::new();
        let t = store.begin_load();
        assert!(store.finish_load(t, Err(Error::Config("offline".into()))).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn older_response_arriving_late_is_discarded() {
        let mut store = TaskStore::new();
        let older = store.begin_load();
        let newer = store.begin_load();

        assert_eq!(store.finish_load(newer, Ok(vec![task("fresh")])).unwrap(), LoadOutcome::Replaced(1));
        assert_eq!(store.finish_load(older, Ok(vec![task("stale"), task("x")])).unwrap(), LoadOutcome::Stale);
        assert_eq!(ids(&store), vec!["fresh"]);
    }

    #[test]
    fn failed_newer_load_does_not_block_older_success() {
        let mut store = TaskStore::new();
        let older = store.begin_load();
        let newer = store.begin_load();
        assert!(store.finish_load(newer, Err(Error::Config("boom".into()))).is_err());
        assert_eq!(store.finish_load(older, Ok(vec![task("a")])).unwrap(), LoadOutcome::Replaced(1));
    }

    #[test]
    fn insertion_order_is_kept() {
        let mut store = TaskStore::new();
        let t = store.begin_load();
        store.finish_load(t, Ok(vec![task("c"), task("a"), task("b")])).unwrap();
        assert_eq!(ids(&store), vec!["c", "a", "b"]);
    }
}

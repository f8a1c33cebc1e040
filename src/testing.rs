//! In-memory `TaskApi` used by unit tests. Records every call it receives.

use std::cell::{Cell, RefCell};

use crate::api::TaskApi;
use crate::error::{Error, Result};
use crate::task::{Task, TaskId};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Fetch,
    Create(Task),
    Update(TaskId, Task),
    Delete(TaskId),
}

#[derive(Default)]
pub struct FakeApi {
    pub remote: RefCell<Vec<Task>>,
    pub calls: RefCell<Vec<Call>>,
    next_id: Cell<u32>,
    fail_writes: Cell<bool>,
    fail_fetch: Cell<bool>,
    silent_writes: Cell<bool>,
}

impl FakeApi {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let api = FakeApi::default();
        *api.remote.borrow_mut() = tasks;
        api
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn fail_fetch(&self, fail: bool) {
        self.fail_fetch.set(fail);
    }

    /// Accept writes but answer without a task record, like a
    /// `{"message": "..."}` response.
    pub fn silent_writes(&self, silent: bool) {
        self.silent_writes.set(silent);
    }

    fn echo(&self, task: Task) -> Option<Task> {
        (!self.silent_writes.get()).then_some(task)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Calls other than fetches.
    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(|c| *c != Call::Fetch).collect()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn write_guard(&self) -> Result<()> {
        if self.fail_writes.get() {
            return Err(Error::Status { status: 500, body: "write failed".into() });
        }
        Ok(())
    }
}

/// A stored task as the server would return it.
pub fn remote_task(id: &str, title: &str, status: &str) -> Task {
    serde_json::from_value(serde_json::json!({
        "_id": id,
        "title": title,
        "status": status,
        "priority": "Med",
        "dateAssigned": "2024-05-01",
    }))
    .expect("valid task json")
}

impl TaskApi for FakeApi {
    fn fetch_tasks(&self) -> Result<Vec<Task>> {
        self.calls.borrow_mut().push(Call::Fetch);
        if self.fail_fetch.get() {
            return Err(Error::Status { status: 503, body: "unavailable".into() });
        }
        Ok(self.remote.borrow().clone())
    }

    fn create_task(&self, task: &Task) -> Result<Option<Task>> {
        self.calls.borrow_mut().push(Call::Create(task.clone()));
        self.write_guard()?;
        self.next_id.set(self.next_id.get() + 1);
        let mut created = task.clone();
        created.id = Some(TaskId::new(format!("t{}", self.next_id.get())));
        self.remote.borrow_mut().push(created.clone());
        Ok(self.echo(created))
    }

    fn update_task(&self, task: &Task, id: &TaskId) -> Result<Option<Task>> {
        self.calls.borrow_mut().push(Call::Update(id.clone(), task.clone()));
        self.write_guard()?;
        let mut remote = self.remote.borrow_mut();
        let slot = remote
            .iter_mut()
            .find(|t| t.id.as_ref() == Some(id))
            .ok_or_else(|| Error::Status { status: 404, body: "not found".into() })?;
        *slot = task.clone();
        Ok(self.echo(task.clone()))
    }

    fn delete_task(&self, id: &TaskId) -> Result<()> {
        self.calls.borrow_mut().push(Call::Delete(id.clone()));
        self.write_guard()?;
        let mut remote = self.remote.borrow_mut();
        let before = remote.len();
        remote.retain(|t| t.id.as_ref() != Some(id));
        if remote.len() == before {
            return Err(Error::Status { status: 404, body: "not found".into() });
        }
        Ok(())
    }
}

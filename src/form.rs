//! Create/edit flow for a single task.
//!
//! `Idle -> Editing -> Submitting -> Idle`. Cancel goes straight from
//! `Editing` back to `Idle` and throws the staged fields away. Nothing reaches
//! the server unless the title is non-empty.

use chrono::NaiveDate;

use crate::api::TaskApi;
use crate::board::Board;
use crate::error::Result;
use crate::task::{Task, TaskId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(TaskId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Editing,
    Submitting,
}

/// A task ready to be sent, produced by [`TaskFormController::begin_submit`].
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub mode: FormMode,
    pub task: Task,
}

#[derive(Debug)]
pub struct TaskFormController {
    phase: FormPhase,
    mode: FormMode,
    draft: Option<Task>,
    last_error: Option<String>,
}

impl Default for TaskFormController {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskFormController {
    pub fn new() -> Self {
        TaskFormController {
            phase: FormPhase::Idle,
            mode: FormMode::Create,
            draft: None,
            last_error: None,
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// The staged task, if a form is open or a failed submission was kept.
    pub fn draft(&self) -> Option<&Task> {
        self.draft.as_ref()
    }

    /// Message from the last failed submission.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Start a new task with default fields.
    pub fn open_create(&mut self, today: NaiveDate) {
        self.open(FormMode::Create, Task::draft(today));
    }

    /// Start editing a copy of an existing task.
    pub fn open_edit(&mut self, task: &Task) -> Result<()> {
        let id = task
            .id
            .clone()
            .ok_or_else(|| crate::error::Error::MissingId(task.title.clone()))?;
        self.open(FormMode::Edit(id), task.clone());
        Ok(())
    }

    fn open(&mut self, mode: FormMode, draft: Task) {
        self.mode = mode;
        self.draft = Some(draft);
        self.last_error = None;
        self.phase = FormPhase::Editing;
    }

    /// Mutable access to the staged fields; only while editing.
    pub fn draft_mut(&mut self) -> Option<&mut Task> {
        match self.phase {
            FormPhase::Editing => self.draft.as_mut(),
            _ => None,
        }
    }

    pub fn can_submit(&self) -> bool {
        self.phase == FormPhase::Editing
            && self.draft.as_ref().is_some_and(|t| !t.title.trim().is_empty())
    }

    /// Move to `Submitting` and hand out the task to send.
    ///
    /// Returns `None`, staying in `Editing`, when the form is not submittable.
    pub fn begin_submit(&mut self) -> Option<Submission> {
        if !self.can_submit() {
            return None;
        }
        let mut task = self.draft.clone()?;
        task.title = task.title.trim().to_string();
        self.phase = FormPhase::Submitting;
        Some(Submission {
            mode: self.mode.clone(),
            task,
        })
    }

    /// Record how the submission went. Always returns to `Idle`.
    ///
    /// On success the draft is dropped; on failure it is kept so that
    /// [`TaskFormController::reopen`] can put the same fields back in front of
    /// the user.
    pub fn finish<T>(&mut self, result: &Result<T>) {
        if self.phase != FormPhase::Submitting {
            return;
        }
        self.phase = FormPhase::Idle;
        match result {
            Ok(_) => {
                self.draft = None;
                self.last_error = None;
            }
            Err(e) => self.last_error = Some(e.to_string()),
        }
    }

    /// Return to `Editing` with the draft a failed submission left behind.
    pub fn reopen(&mut self) -> bool {
        if self.phase != FormPhase::Idle || self.draft.is_none() {
            return false;
        }
        self.phase = FormPhase::Editing;
        true
    }

    /// Abandon the form without contacting the server.
    pub fn cancel(&mut self) {
        if self.phase == FormPhase::Editing {
            self.phase = FormPhase::Idle;
            self.draft = None;
            self.last_error = None;
        }
    }

    /// Validate, send through the board, and settle the phase.
    ///
    /// Returns `Ok(None)` when validation blocked the submission.
    pub fn submit<A: TaskApi>(&mut self, board: &mut Board<A>) -> Result<Option<Task>> {
        let Some(submission) = self.begin_submit() else {
            return Ok(None);
        };
        let result = match submission.mode {
            FormMode::Create => board.create(&submission.task),
            FormMode::Edit(id) => {
                let mut task = submission.task;
                task.id = Some(id);
                board.update(&task)
            }
        };
        self.finish(&result);
        result.map(Some)
    }
}

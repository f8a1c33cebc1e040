//! Task form popup for the board.
//!
//! `TaskForm` holds the on-screen inputs and field focus; the staged task and
//! the submit state machine live in the wrapped [`TaskFormController`].

use chrono::NaiveDate;

use crate::{
    dates::parse_deadline_input,
    error::Result,
    fields::{Priority, Status},
    form::{FormMode, FormPhase, TaskFormController},
    task::Task,
    tui::input::InputField,
};

pub const TITLE_ORDER: usize = 0;
pub const DESCRIPTION_ORDER: usize = 1;
pub const PRIORITY_ORDER: usize = 2;
pub const DEADLINE_ORDER: usize = 3;
pub const STATUS_ORDER: usize = 4;
const FIELD_COUNT: usize = 5;

pub struct TaskForm {
    pub controller: TaskFormController,
    pub title: InputField,
    pub description: InputField,
    pub deadline: InputField,
    pub priority: usize,
    pub status: usize,
    /// Whether the user has changed the status selector since the form opened.
    pub status_touched: bool,
    pub current_field: usize,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskForm {
    pub fn new() -> Self {
        Self {
            controller: TaskFormController::new(),
            title: InputField::new(),
            description: InputField::new(),
            deadline: InputField::new(),
            priority: 1, // Med
            status: 0,   // To Do
            status_touched: false,
            current_field: TITLE_ORDER,
        }
    }

    pub fn open_create(&mut self, today: NaiveDate) {
        self.controller.open_create(today);
        self.load_from_draft();
    }

    pub fn open_edit(&mut self, task: &Task) -> Result<()> {
        self.controller.open_edit(task)?;
        self.load_from_draft();
        Ok(())
    }

    /// Reopen after a failed submission with the same fields.
    pub fn reopen(&mut self) -> bool {
        self.controller.reopen()
    }

    pub fn cancel(&mut self) {
        self.controller.cancel();
    }

    pub fn is_open(&self) -> bool {
        self.controller.phase() != FormPhase::Idle
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.controller.mode(), FormMode::Edit(_))
    }

    fn load_from_draft(&mut self) {
        let Some(draft) = self.controller.draft() else {
            return;
        };
        self.title = InputField::with_value(&draft.title);
        self.description = InputField::with_value(&draft.description);
        self.deadline = InputField::with_value(
            &draft.deadline.map(|d| d.to_string()).unwrap_or_default(),
        );
        self.priority = Priority::ALL.iter().position(|&p| p == draft.priority).unwrap_or(1);
        // A task with an unrecognised status keeps it unless the user changes the selector.
        self.status = draft.column().map_or(0, Status::index);
        self.status_touched = false;
        self.current_field = TITLE_ORDER;
    }

    /// Copy the inputs into the staged task.
    ///
    /// Fails with a user-facing message if the deadline cannot be parsed.
    pub fn apply_to_draft(&mut self, today: NaiveDate) -> std::result::Result<(), String> {
        let deadline_text = self.deadline.value.trim();
        let deadline = if deadline_text.is_empty() {
            None
        } else {
            Some(parse_deadline_input(deadline_text, today).ok_or_else(|| {
                format!("Invalid deadline '{deadline_text}'. Use YYYY-MM-DD, today, tomorrow, in Nd")
            })?)
        };
        let priority = Priority::ALL[self.priority % Priority::ALL.len()];
        let status = Status::ALL[self.status % Status::ALL.len()];
        let title = self.title.value.clone();
        let description = self.description.value.clone();

        let Some(draft) = self.controller.draft_mut() else {
            return Err("Form is not open".to_string());
        };
        draft.title = title;
        draft.description = description;
        draft.priority = priority;
        draft.deadline = deadline;
        if draft.column().is_some() || self.status_touched {
            draft.status = status.into();
        }
        Ok(())
    }

    /// Whether the title currently typed would pass validation.
    pub fn title_ok(&self) -> bool {
        !self.title.value.trim().is_empty()
    }

    fn active_input(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            TITLE_ORDER => Some(&mut self.title),
            DESCRIPTION_ORDER => Some(&mut self.description),
            DEADLINE_ORDER => Some(&mut self.deadline),
            _ => None,
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
    }

    pub fn prev_field(&mut self) {
        self.current_field = (self.current_field + FIELD_COUNT - 1) % FIELD_COUNT;
    }

    pub fn handle_char(&mut self, c: char) {
        if let Some(input) = self.active_input() {
            input.handle_char(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        if let Some(input) = self.active_input() {
            input.handle_backspace();
        }
    }

    pub fn handle_delete(&mut self) {
        if let Some(input) = self.active_input() {
            input.handle_delete();
        }
    }

    /// Left/right moves the cursor in text fields and cycles selectors.
    pub fn handle_left_right(&mut self, right: bool) {
        let cycle = |value: usize, len: usize| {
            if right {
                (value + 1) % len
            } else {
                (value + len - 1) % len
            }
        };
        match self.current_field {
            PRIORITY_ORDER => self.priority = cycle(self.priority, Priority::ALL.len()),
            STATUS_ORDER => {
                self.status = cycle(self.status, Status::ALL.len());
                self.status_touched = true;
            }
            _ => {
                if let Some(input) = self.active_input() {
                    if right {
                        input.move_cursor_right();
                    } else {
                        input.move_cursor_left();
                    }
                }
            }
        }
    }
}

//! Command implementations for the CLI interface.
//!
//! Every command works against a freshly loaded board, goes through the same
//! board/form code paths the UI uses, and prints the outcome.

use std::io::{self, BufRead, Write};

use chrono::{Local, NaiveDate};
use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::api::TaskApi;
use crate::board::Board;
use crate::cli::Cli;
use crate::dates::parse_deadline_input;
use crate::display::{print_columns, print_task};
use crate::drag::{DragEvent, Slot};
use crate::error::{Error, Result};
use crate::fields::*;
use crate::form::TaskFormController;
use crate::task::MAX_SCORE;
use crate::tui::run::run_board_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive Kanban board.
    Ui,

    /// List tasks grouped by column.
    List {
        /// Only show this column.
        #[arg(long, value_enum)]
        status: Option<Status>,
    },

    /// Show every field of a task, including comments.
    View {
        /// Task id or title.
        task: String,
    },

    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Priority: high | med | low.
        #[arg(long, value_enum, default_value_t = Priority::Med)]
        priority: Priority,
        /// Deadline: YYYY-MM-DD, "today", "tomorrow", "in Nd", or a weekday.
        #[arg(long)]
        deadline: Option<String>,
        /// Starting column: todo | in-progress | done.
        #[arg(long, value_enum, default_value_t = Status::ToDo)]
        status: Status,
    },

    /// Update fields on a task.
    Update {
        /// Task id or title.
        task: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        #[arg(long)]
        deadline: Option<String>,
        /// Remove the deadline.
        #[arg(long, conflicts_with = "deadline")]
        clear_deadline: bool,
        #[arg(long, value_enum)]
        status: Option<Status>,
    },

    /// Move a task to another column, as dragging its card would.
    Move {
        /// Task id or title.
        task: String,
        /// Destination column.
        #[arg(value_enum)]
        to: Status,
    },

    /// Delete a task.
    Delete {
        /// Task id or title.
        task: String,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },

    /// Append a comment to a task's reviewer log.
    Comment {
        /// Task id or title.
        task: String,
        /// Comment text.
        text: String,
    },

    /// Set your self evaluation (0-5) on a finished task.
    Evaluate {
        /// Task id or title.
        task: String,
        #[arg(value_parser = clap::value_parser!(u8).range(0..=MAX_SCORE as i64))]
        score: u8,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn parse_deadline(input: &str) -> Result<NaiveDate> {
    parse_deadline_input(input, today()).ok_or_else(|| {
        Error::Config(format!(
            "invalid deadline '{input}'. Use YYYY-MM-DD, 'today', 'tomorrow', 'in Nd' or a weekday"
        ))
    })
}

pub fn cmd_ui<A: TaskApi>(board: Board<A>, source: &str) -> Result<()> {
    run_board_tui(board, source)?;
    Ok(())
}

pub fn cmd_list<A: TaskApi>(board: &Board<A>, status: Option<Status>) {
    print_columns(&board.columns(), status, today());
}

pub fn cmd_view<A: TaskApi>(board: &Board<A>, task: &str) -> Result<()> {
    print_task(board.resolve(task)?, today());
    Ok(())
}

pub fn cmd_add<A: TaskApi>(
    board: &mut Board<A>,
    title: String,
    desc: Option<String>,
    priority: Priority,
    deadline: Option<String>,
    status: Status,
) -> Result<()> {
    let deadline = deadline.as_deref().map(parse_deadline).transpose()?;

    let mut form = TaskFormController::new();
    form.open_create(today());
    if let Some(draft) = form.draft_mut() {
        draft.title = title;
        draft.description = desc.unwrap_or_default();
        draft.priority = priority;
        draft.deadline = deadline;
        draft.status = status.into();
    }

    match form.submit(board)? {
        Some(created) => {
            println!("Added task {} to {}", created.label(), status);
            Ok(())
        }
        None => Err(Error::Config("title must not be empty".into())),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_update<A: TaskApi>(
    board: &mut Board<A>,
    task: &str,
    title: Option<String>,
    desc: Option<String>,
    priority: Option<Priority>,
    deadline: Option<String>,
    clear_deadline: bool,
    status: Option<Status>,
) -> Result<()> {
    let deadline = deadline.as_deref().map(parse_deadline).transpose()?;
    let current = board.resolve(task)?.clone();

    let mut form = TaskFormController::new();
    form.open_edit(&current)?;
    if let Some(draft) = form.draft_mut() {
        if let Some(title) = title {
            draft.title = title;
        }
        if let Some(desc) = desc {
            draft.description = desc;
        }
        if let Some(priority) = priority {
            draft.priority = priority;
        }
        if deadline.is_some() {
            draft.deadline = deadline;
        }
        if clear_deadline {
            draft.deadline = None;
        }
        if let Some(status) = status {
            draft.status = status.into();
        }
        if *draft == current {
            println!("Nothing to update for {}", current.label());
            form.cancel();
            return Ok(());
        }
    }

    match form.submit(board)? {
        Some(updated) => {
            println!("Updated task {}", updated.label());
            Ok(())
        }
        None => Err(Error::Config("title must not be empty".into())),
    }
}

pub fn cmd_move<A: TaskApi>(board: &mut Board<A>, task: &str, to: Status) -> Result<()> {
    let task = board.resolve(task)?.clone();
    let Some(id) = task.id.clone() else {
        return Err(Error::MissingId(task.title));
    };
    let Some((column, index)) = board.columns().position_of(&id) else {
        println!(
            "Task {} is not on the board (status '{}'); use `update --status` instead",
            task.label(),
            task.status
        );
        return Ok(());
    };

    let event = DragEvent {
        task_id: id,
        source: Slot::new(column, index),
        destination: Some(Slot::new(to, board.columns().len(to))),
    };
    match board.drag(&event)? {
        Some(moved_to) => println!("Moved {} to {}", task.label(), moved_to),
        None => println!("{} is already in {}", task.label(), to),
    }
    Ok(())
}

/// Ask a yes/no question on stdin. Anything but y/yes is a no.
fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

pub fn cmd_delete<A: TaskApi>(board: &mut Board<A>, task: &str, yes: bool) -> Result<()> {
    let task = board.resolve(task)?.clone();
    let id = task.id.clone().ok_or_else(|| Error::MissingId(task.title.clone()))?;

    if !yes && !confirm(&format!("Delete task '{}'? This cannot be undone.", task.title))? {
        println!("Cancelled");
        return Ok(());
    }
    board.delete(&id)?;
    println!("Deleted task {}", task.label());
    Ok(())
}

pub fn cmd_comment<A: TaskApi>(board: &mut Board<A>, task: &str, text: &str) -> Result<()> {
    let task = board.resolve(task)?.clone();
    let id = task.id.clone().ok_or_else(|| Error::MissingId(task.title.clone()))?;
    if board.add_comment(&id, text)? {
        println!("Comment added to {}", task.label());
    } else {
        println!("Empty comment ignored");
    }
    Ok(())
}

pub fn cmd_evaluate<A: TaskApi>(board: &mut Board<A>, task: &str, score: u8) -> Result<()> {
    let task = board.resolve(task)?.clone();
    let id = task.id.clone().ok_or_else(|| Error::MissingId(task.title.clone()))?;
    if board.set_self_evaluation(&id, score)? {
        println!("Self evaluation for {} set to {score}/{MAX_SCORE}", task.label());
    } else {
        println!(
            "Self evaluation can only be set on tasks in {} ({} is in '{}')",
            Status::Done,
            task.label(),
            task.status
        );
    }
    Ok(())
}

pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{remote_task, Call, FakeApi};
    use crate::task::TaskId;

    fn board(tasks: Vec<crate::task::Task>) -> Board<FakeApi> {
        let mut b = Board::new(FakeApi::with_tasks(tasks));
        b.reload().unwrap();
        b.api().clear_calls();
        b
    }

    #[test]
    fn add_goes_through_form_defaults() {
        let mut b = board(vec![]);
        cmd_add(&mut b, "Write report".into(), None, Priority::Med, Some("2030-01-02".into()), Status::ToDo)
            .unwrap();
        let t = &b.tasks()[0];
        assert_eq!(t.title, "Write report");
        assert_eq!(t.deadline, NaiveDate::from_ymd_opt(2030, 1, 2));
        assert_eq!(t.date_assigned, Some(today()));
    }

    #[test]
    fn add_rejects_blank_title_and_bad_deadline() {
        let mut b = board(vec![]);
        assert!(cmd_add(&mut b, "  ".into(), None, Priority::Med, None, Status::ToDo).is_err());
        assert!(cmd_add(&mut b, "x".into(), None, Priority::Med, Some("someday".into()), Status::ToDo).is_err());
        assert!(b.api().writes().is_empty());
    }

    #[test]
    fn move_issues_single_update() {
        let mut b = board(vec![remote_task("1", "Write report", "To Do")]);
        cmd_move(&mut b, "write report", Status::InProgress).unwrap();
        let writes = b.api().writes();
        assert_eq!(writes.len(), 1);
        assert!(matches!(&writes[0], Call::Update(id, t) if *id == TaskId::new("1") && t.column() == Some(Status::InProgress)));

        b.api().clear_calls();
        cmd_move(&mut b, "1", Status::InProgress).unwrap();
        assert!(b.api().writes().is_empty());
    }

    #[test]
    fn update_without_changes_sends_nothing() {
        let mut b = board(vec![remote_task("1", "Same", "To Do")]);
        cmd_update(&mut b, "1", None, None, None, None, false, None).unwrap();
        assert!(b.api().writes().is_empty());

        cmd_update(&mut b, "1", None, None, Some(Priority::Low), None, false, None).unwrap();
        assert_eq!(b.api().writes().len(), 1);
        assert_eq!(b.tasks()[0].priority, Priority::Low);
    }

    #[test]
    fn delete_with_yes_skips_prompt() {
        let mut b = board(vec![remote_task("1", "Gone", "Done")]);
        cmd_delete(&mut b, "Gone", true).unwrap();
        assert_eq!(b.api().writes(), vec![Call::Delete(TaskId::new("1"))]);
        assert!(b.tasks().is_empty());
    }
}

//! Text formatting shared by the CLI output and the board UI.

use chrono::NaiveDate;

use crate::columns::Columns;
use crate::dates::format_deadline_relative;
use crate::fields::{Priority, Status};
use crate::task::{Task, MAX_SCORE};

/// Format a priority level for display.
pub fn format_priority(p: Priority) -> &'static str {
    match p {
        Priority::High => "High",
        Priority::Med => "Medium",
        Priority::Low => "Low",
    }
}

/// Score as filled and empty stars, e.g. `★★★☆☆`.
pub fn stars(score: u8) -> String {
    let filled = score.min(MAX_SCORE) as usize;
    let mut s = "★".repeat(filled);
    s.push_str(&"☆".repeat(MAX_SCORE as usize - filled));
    s
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

/// Print the board as one table per column.
pub fn print_columns(columns: &Columns<'_>, only: Option<Status>, today: NaiveDate) {
    for status in Status::ALL {
        if only.is_some_and(|o| o != status) {
            continue;
        }
        let tasks = columns.column(status);
        println!("{} ({})", status, tasks.len());
        if tasks.is_empty() {
            println!("  No tasks");
        } else {
            print_table(tasks, today);
        }
        println!();
    }
    if columns.hidden() > 0 {
        println!(
            "{} task(s) with an unrecognised status are not shown.",
            columns.hidden()
        );
    }
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[&Task], today: NaiveDate) {
    println!(
        "  {:<26} {:<7} {:<10} {:<6} {:<6} {}",
        "ID", "Pri", "Deadline", "Self", "Review", "Title"
    );
    for t in tasks {
        let id = t.id.as_ref().map(|i| i.to_string()).unwrap_or_else(|| "-".into());
        println!(
            "  {:<26} {:<7} {:<10} {:<6} {:<6} {}",
            truncate(&id, 26),
            format_priority(t.priority),
            format_deadline_relative(t.deadline, today),
            format!("{}/{}", t.self_evaluation, MAX_SCORE),
            format!("{}/{}", t.reviewer_score, MAX_SCORE),
            t.title,
        );
    }
}

/// Print every field of a task, comments one per line.
pub fn print_task(task: &Task, today: NaiveDate) {
    let id = task.id.as_ref().map(|i| i.to_string()).unwrap_or_else(|| "-".into());
    println!("{}  [{}]", task.title, id);
    println!("  Status:      {}", task.status);
    println!("  Priority:    {}", format_priority(task.priority));
    println!("  Deadline:    {}", format_deadline_relative(task.deadline, today));
    println!(
        "  Assigned:    {}",
        task.date_assigned.map(|d| d.to_string()).unwrap_or_else(|| "-".into())
    );
    println!("  Self:        {}", stars(task.self_evaluation));
    println!("  Review:      {}", stars(task.reviewer_score));
    if !task.description.is_empty() {
        println!("  Description: {}", task.description);
    }
    for comment in task.comments() {
        println!("  > {comment}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_rendering() {
        assert_eq!(stars(0), "☆☆☆☆☆");
        assert_eq!(stars(3), "★★★☆☆");
        assert_eq!(stars(9), "★★★★★");
    }

    #[test]
    fn truncation() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer title", 6), "a lon…");
    }
}

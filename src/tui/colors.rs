//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::{Priority, Status};

/// Used for the To Do column
pub const TODO_BLUE: Color = Color::Rgb(59, 130, 246);
/// Used for the In Progress column
pub const GOLD: Color = Color::Rgb(234, 179, 8);
/// Used for the Done column
pub const DONE_GREEN: Color = Color::Rgb(34, 197, 94);

pub const HIGH_RED: Color = Color::Rgb(185, 28, 28);
pub const LOW_GREEN: Color = Color::Rgb(0, 80, 0);

pub fn column_color(status: Status) -> Color {
    match status {
        Status::ToDo => TODO_BLUE,
        Status::InProgress => GOLD,
        Status::Done => DONE_GREEN,
    }
}

pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => HIGH_RED,
        Priority::Med => GOLD,
        Priority::Low => LOW_GREEN,
    }
}

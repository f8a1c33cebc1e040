//! Enumerations and field types for board tasks.
//!
//! This module defines the status values that double as board columns and the
//! priority levels a task can carry, along with how they appear on the wire.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};

/// Task status. Each known status is also a board column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
pub enum Status {
    #[serde(rename = "To Do")]
    #[value(name = "todo", alias = "to-do")]
    ToDo,
    #[serde(rename = "In Progress")]
    #[value(name = "in-progress")]
    InProgress,
    #[serde(rename = "Done")]
    #[value(name = "done")]
    Done,
}

impl Status {
    /// Columns in board order.
    pub const ALL: [Status; 3] = [Status::ToDo, Status::InProgress, Status::Done];

    /// The exact string the remote API stores.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::ToDo => "To Do",
            Status::InProgress => "In Progress",
            Status::Done => "Done",
        }
    }

    /// Position of this column on the board.
    pub fn index(self) -> usize {
        match self {
            Status::ToDo => 0,
            Status::InProgress => 1,
            Status::Done => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Status> {
        Status::ALL.get(index).copied()
    }

    /// Column to the left, if any.
    pub fn prev(self) -> Option<Status> {
        self.index().checked_sub(1).and_then(Status::from_index)
    }

    /// Column to the right, if any.
    pub fn next(self) -> Option<Status> {
        Status::from_index(self.index() + 1)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status as read from the server.
///
/// Anything outside the three columns is kept verbatim so that writing the
/// task back never rewrites it, but such a task is shown in no column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum TaskStatus {
    Known(Status),
    Unrecognised(String),
}

impl TaskStatus {
    pub fn known(&self) -> Option<Status> {
        match self {
            TaskStatus::Known(s) => Some(*s),
            TaskStatus::Unrecognised(_) => None,
        }
    }

    pub fn is(&self, status: Status) -> bool {
        self.known() == Some(status)
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Known(Status::ToDo)
    }
}

impl From<Status> for TaskStatus {
    fn from(s: Status) -> Self {
        TaskStatus::Known(s)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Known(s) => f.write_str(s.as_str()),
            TaskStatus::Unrecognised(raw) => f.write_str(raw),
        }
    }
}

/// Read a status, mapping `null` to the default column and keeping any other
/// value verbatim.
pub fn lenient_status<'de, D>(deserializer: D) -> Result<TaskStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match raw {
        None => TaskStatus::default(),
        Some(serde_json::Value::String(s)) => match Status::ALL.into_iter().find(|k| k.as_str() == s) {
            Some(status) => TaskStatus::Known(status),
            None => TaskStatus::Unrecognised(s),
        },
        Some(other) => TaskStatus::Unrecognised(other.to_string()),
    })
}

/// Priority classification for task importance.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
pub enum Priority {
    #[serde(alias = "high", alias = "HIGH")]
    High,
    #[default]
    #[serde(alias = "med", alias = "Medium", alias = "medium")]
    #[value(alias = "medium")]
    Med,
    #[serde(alias = "low", alias = "LOW")]
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Med, Priority::Low];
}

/// Read a priority, mapping `null` and unknown spellings to the default.
pub fn lenient_priority<'de, D>(deserializer: D) -> Result<Priority, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(raw
        .and_then(|v| serde_json::from_value::<Priority>(v).ok())
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_names_match_column_titles() {
        for s in Status::ALL {
            let json = serde_json::to_string(&s).unwrap();
            assert_eq!(json, format!("\"{}\"", s.as_str()));
        }
    }

    #[test]
    fn unknown_status_is_kept_verbatim() {
        let s: TaskStatus = serde_json::from_str("\"Archived\"").unwrap();
        assert_eq!(s, TaskStatus::Unrecognised("Archived".to_string()));
        assert_eq!(s.known(), None);
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"Archived\"");

        let s: TaskStatus = serde_json::from_str("\"In Progress\"").unwrap();
        assert!(s.is(Status::InProgress));
    }

    #[test]
    fn status_null_or_non_string_still_reads() {
        #[derive(Deserialize)]
        struct Wrap {
            #[serde(default, deserialize_with = "lenient_status")]
            s: TaskStatus,
        }
        let read = |json: &str| serde_json::from_str::<Wrap>(json).unwrap().s;
        assert_eq!(read(r#"{"s":null}"#), TaskStatus::Known(Status::ToDo));
        assert_eq!(read(r#"{}"#), TaskStatus::Known(Status::ToDo));
        assert_eq!(read(r#"{"s":"Done"}"#), TaskStatus::Known(Status::Done));
        assert_eq!(read(r#"{"s":"Blocked"}"#), TaskStatus::Unrecognised("Blocked".into()));
        assert_eq!(read(r#"{"s":2}"#), TaskStatus::Unrecognised("2".into()));
    }

    #[test]
    fn column_neighbours() {
        assert_eq!(Status::ToDo.prev(), None);
        assert_eq!(Status::ToDo.next(), Some(Status::InProgress));
        assert_eq!(Status::Done.next(), None);
        assert_eq!(Status::Done.prev(), Some(Status::InProgress));
    }

    #[test]
    fn priority_accepts_loose_spellings() {
        #[derive(Deserialize)]
        struct Wrap {
            #[serde(default, deserialize_with = "lenient_priority")]
            p: Priority,
        }
        let read = |json: &str| serde_json::from_str::<Wrap>(json).unwrap().p;
        assert_eq!(read(r#"{"p":"High"}"#), Priority::High);
        assert_eq!(read(r#"{"p":"medium"}"#), Priority::Med);
        assert_eq!(read(r#"{"p":"low"}"#), Priority::Low);
        assert_eq!(read(r#"{"p":"urgent"}"#), Priority::Med);
        assert_eq!(read(r#"{"p":null}"#), Priority::Med);
        assert_eq!(read(r#"{}"#), Priority::Med);
    }
}

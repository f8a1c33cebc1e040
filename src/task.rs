//! Task data structure and related functionality.
//!
//! This module defines the `Task` entity exchanged with the remote task API,
//! its identifier type, and the two field-level rules the board enforces
//! locally: self evaluation is only editable on finished tasks, and reviewer
//! comments are an append-only log.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::dates;
use crate::fields::*;

/// Separator between entries of the reviewer comment log.
pub const COMMENT_SEPARATOR: &str = "\n---\n";

/// Highest score for self evaluation and reviewer score.
pub const MAX_SCORE: u8 = 5;

/// Identifier assigned by the remote system when a task is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        TaskId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A card on the board.
///
/// Reads go through [`WireTask`] so that a loosely shaped record from the
/// server still yields a task instead of failing the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "WireTask")]
pub struct Task {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<TaskId>,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: TaskStatus,
    #[serde(serialize_with = "dates::serialize_plain")]
    pub deadline: Option<NaiveDate>,
    #[serde(serialize_with = "dates::serialize_plain")]
    pub date_assigned: Option<NaiveDate>,
    pub self_evaluation: u8,
    pub reviewer_score: u8,
    pub reviewer_comments: String,
}

/// A task record as the server may send it. Every field is optional and
/// tolerates `null` or an unexpected type.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTask {
    #[serde(rename = "_id", default, deserialize_with = "lenient_id")]
    underscore_id: Option<TaskId>,
    #[serde(default, deserialize_with = "lenient_id")]
    id: Option<TaskId>,
    #[serde(default, deserialize_with = "lenient_text")]
    title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    description: String,
    #[serde(default, deserialize_with = "lenient_priority")]
    priority: Priority,
    #[serde(default, deserialize_with = "lenient_status")]
    status: TaskStatus,
    #[serde(default, deserialize_with = "dates::deserialize_lenient")]
    deadline: Option<NaiveDate>,
    #[serde(default, deserialize_with = "dates::deserialize_lenient")]
    date_assigned: Option<NaiveDate>,
    #[serde(default, deserialize_with = "score")]
    self_evaluation: u8,
    #[serde(default, deserialize_with = "score")]
    reviewer_score: u8,
    #[serde(default, deserialize_with = "lenient_text")]
    reviewer_comments: String,
}

impl From<WireTask> for Task {
    fn from(w: WireTask) -> Self {
        Task {
            id: w.underscore_id.or(w.id),
            title: w.title,
            description: w.description,
            priority: w.priority,
            status: w.status,
            deadline: w.deadline,
            date_assigned: w.date_assigned,
            self_evaluation: w.self_evaluation,
            reviewer_score: w.reviewer_score,
            reviewer_comments: w.reviewer_comments,
        }
    }
}

impl Task {
    /// A fresh draft as the create form starts with it.
    pub fn draft(today: NaiveDate) -> Self {
        Task {
            id: None,
            title: String::new(),
            description: String::new(),
            priority: Priority::Med,
            status: TaskStatus::Known(Status::ToDo),
            deadline: None,
            date_assigned: Some(today),
            self_evaluation: 0,
            reviewer_score: 0,
            reviewer_comments: String::new(),
        }
    }

    /// The column this task renders in, if its status is one of the known ones.
    pub fn column(&self) -> Option<Status> {
        self.status.known()
    }

    /// Copy of this task with only the status changed.
    pub fn with_status(&self, status: Status) -> Task {
        Task {
            status: status.into(),
            ..self.clone()
        }
    }

    /// Set the self evaluation score.
    ///
    /// Returns `false` and leaves the task untouched unless the task is done
    /// and `score` is within `0..=MAX_SCORE`.
    pub fn set_self_evaluation(&mut self, score: u8) -> bool {
        if !self.status.is(Status::Done) || score > MAX_SCORE {
            return false;
        }
        self.self_evaluation = score;
        true
    }

    /// Append an entry to the reviewer comment log. Blank comments are ignored.
    pub fn append_comment(&mut self, comment: &str) -> bool {
        let comment = comment.trim();
        if comment.is_empty() {
            return false;
        }
        if self.reviewer_comments.is_empty() {
            self.reviewer_comments = comment.to_string();
        } else {
            self.reviewer_comments.push_str(COMMENT_SEPARATOR);
            self.reviewer_comments.push_str(comment);
        }
        true
    }

    /// Individual entries of the comment log, oldest first.
    pub fn comments(&self) -> impl Iterator<Item = &str> {
        self.reviewer_comments
            .split(COMMENT_SEPARATOR)
            .filter(|c| !c.is_empty())
    }

    /// Short label used in log lines and messages.
    pub fn label(&self) -> String {
        match &self.id {
            Some(id) => format!("{} ({})", self.title, id),
            None => self.title.clone(),
        }
    }
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<TaskId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.is_empty() => Some(TaskId(s)),
        Some(Value::Number(n)) => Some(TaskId(n.to_string())),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

/// Read a score from a number or numeric string, rounded and clamped to `0..=MAX_SCORE`.
fn score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(raw
        .filter(|v| v.is_finite())
        .map_or(0, |v| v.round().clamp(0.0, MAX_SCORE as f64) as u8))
}

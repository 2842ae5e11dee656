use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::parse::clean_text;

/// Task status as reported by the task managers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Scheduled,
    Started,
    Completed,
    Unscheduled,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Scheduled => "scheduled",
            Status::Started => "started",
            Status::Completed => "completed",
            Status::Unscheduled => "unscheduled",
        }
    }

    /// Whether this status takes the task off the day's mind map
    pub fn removes_line(self) -> bool {
        self == Status::Unscheduled
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status '{0}' (expected scheduled, started, completed or unscheduled)")]
pub struct ParseStatusError(pub String);

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scheduled" => Ok(Status::Scheduled),
            "started" => Ok(Status::Started),
            "completed" => Ok(Status::Completed),
            "unscheduled" => Ok(Status::Unscheduled),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// Which mutation an event requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Init,
    AppendTask,
    AppendSubtask,
    UpdateStatus,
}

/// One requested mutation of the mind map.
///
/// Identities and titles are cleaned on construction, so the same logical
/// task maps to the same outline line whatever status decoration the
/// producer saw. Fields are private: an event does not change once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    kind: EventKind,
    task_id: String,
    parent_task_id: Option<String>,
    title: String,
    new_status: Option<Status>,
    date: NaiveDate,
}

impl Event {
    pub fn init(date: NaiveDate) -> Self {
        Event {
            kind: EventKind::Init,
            task_id: String::new(),
            parent_task_id: None,
            title: String::new(),
            new_status: None,
            date,
        }
    }

    pub fn append_task(task_id: &str, title: &str, date: NaiveDate) -> Self {
        Event {
            kind: EventKind::AppendTask,
            task_id: clean_text(task_id),
            parent_task_id: None,
            title: clean_text(title),
            new_status: None,
            date,
        }
    }

    pub fn append_subtask(parent_task_id: &str, subtask_id: &str, title: &str, date: NaiveDate) -> Self {
        Event {
            kind: EventKind::AppendSubtask,
            task_id: clean_text(subtask_id),
            parent_task_id: Some(clean_text(parent_task_id)),
            title: clean_text(title),
            new_status: None,
            date,
        }
    }

    /// Status change for a task, or for a subtask when `parent_task_id` is set.
    pub fn update_status(
        parent_task_id: Option<&str>,
        task_id: &str,
        new_status: Status,
        date: NaiveDate,
    ) -> Self {
        let task_id = clean_text(task_id);
        Event {
            kind: EventKind::UpdateStatus,
            title: task_id.clone(),
            task_id,
            parent_task_id: parent_task_id.map(clean_text),
            new_status: Some(new_status),
            date,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn parent_task_id(&self) -> Option<&str> {
        self.parent_task_id.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn new_status(&self) -> Option<Status> {
        self.new_status
    }

    /// The date the producer saw when it built the event
    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

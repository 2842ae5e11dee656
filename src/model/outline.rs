use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

/// Section that holds the day's work tasks
pub const WORK_SECTION: &str = "Work";
/// Section reserved for personal items; never written to by the updater
pub const PERSONAL_SECTION: &str = "Personal";

/// Depth of each line kind in an outline file
pub const DATE_DEPTH: usize = 0;
pub const SECTION_DEPTH: usize = 1;
pub const TASK_DEPTH: usize = 2;
pub const SUBTASK_DEPTH: usize = 3;

/// Parsed view of one day's outline file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outline {
    /// Header line as written (normally the ISO date)
    pub header: String,
    /// The header parsed as a date, when it is one
    pub date: Option<NaiveDate>,
    /// Sections in file order
    pub sections: IndexMap<String, Vec<OutlineTask>>,
}

/// A depth-2 line and its depth-3 children
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineTask {
    pub title: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<String>,
}

impl Outline {
    pub fn work_tasks(&self) -> &[OutlineTask] {
        self.sections
            .get(WORK_SECTION)
            .map(|tasks| tasks.as_slice())
            .unwrap_or(&[])
    }

    pub fn task_count(&self) -> usize {
        self.sections.values().map(|tasks| tasks.len()).sum()
    }
}

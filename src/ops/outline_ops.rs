use crate::model::event::{Event, EventKind, Status};
use crate::model::outline::{SECTION_DEPTH, SUBTASK_DEPTH, TASK_DEPTH, WORK_SECTION};
use crate::parse::{clean_text, indent, line_depth};

/// Result of applying one mutation to an outline's lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Lines were modified and need writing back
    Changed,
    /// A line with the same identity is already on the map
    Duplicate,
    /// The parent task of a subtask is not on the map
    MissingParent,
    /// Nothing on the map matches the identity
    NotFound,
    /// The target line was already in normal form
    Unchanged,
    /// The title was empty after cleaning
    Blank,
}

impl Outcome {
    pub fn is_changed(self) -> bool {
        self == Outcome::Changed
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Index of the line at `depth` whose identity equals `identity`
pub fn find_line(lines: &[String], identity: &str, depth: usize) -> Option<usize> {
    let identity = clean_text(identity);
    lines
        .iter()
        .position(|line| line_depth(line) == depth && clean_text(line) == identity)
}

/// Index of the `Work` section header
pub fn find_work_header(lines: &[String]) -> Option<usize> {
    find_line(lines, WORK_SECTION, SECTION_DEPTH)
}

/// Whether a line equal to `new_line` (same depth, same identity) exists
/// anywhere in the file
pub fn has_duplicate(lines: &[String], new_line: &str) -> bool {
    let depth = line_depth(new_line);
    let identity = clean_text(new_line);
    lines
        .iter()
        .any(|line| line_depth(line) == depth && clean_text(line) == identity)
}

/// Where a new task goes: after the `Work` header and everything nested
/// under it, so an existing task is never separated from its subtasks
pub fn task_insert_index(lines: &[String], work_idx: usize) -> usize {
    run_end(lines, work_idx, TASK_DEPTH)
}

/// Where a new subtask goes: after the parent's run of subtasks
pub fn subtask_insert_index(lines: &[String], parent_idx: usize) -> usize {
    run_end(lines, parent_idx, SUBTASK_DEPTH)
}

/// First index after `start` whose depth is below `min_depth`
fn run_end(lines: &[String], start: usize, min_depth: usize) -> usize {
    let mut idx = start + 1;
    while idx < lines.len() && line_depth(&lines[idx]) >= min_depth {
        idx += 1;
    }
    idx
}

// ---------------------------------------------------------------------------
// Mutation
// ---------------------------------------------------------------------------

/// Remove the line at `idx`. A task takes its contiguous subtasks with it.
/// Returns the number of lines removed.
pub fn remove_line(lines: &mut Vec<String>, idx: usize) -> usize {
    if idx >= lines.len() {
        return 0;
    }
    let end = if line_depth(&lines[idx]) == TASK_DEPTH {
        run_end(lines, idx, SUBTASK_DEPTH)
    } else {
        idx + 1
    };
    lines.drain(idx..end);
    end - idx
}

/// Insert a task line under `Work` unless the identity is already present
pub fn append_task(lines: &mut Vec<String>, task_id: &str, title: &str) -> Outcome {
    let title = clean_text(title);
    if title.is_empty() {
        return Outcome::Blank;
    }
    if find_line(lines, task_id, TASK_DEPTH).is_some() {
        return Outcome::Duplicate;
    }
    let new_line = indent(&title, TASK_DEPTH);
    if has_duplicate(lines, &new_line) {
        return Outcome::Duplicate;
    }

    let work_idx = match find_work_header(lines) {
        Some(idx) => idx,
        None => {
            lines.push(indent(WORK_SECTION, SECTION_DEPTH));
            lines.len() - 1
        }
    };
    let at = task_insert_index(lines, work_idx);
    lines.insert(at, new_line);
    Outcome::Changed
}

/// Insert a subtask line under its parent task. The parent is not created
/// when missing.
pub fn append_subtask(
    lines: &mut Vec<String>,
    parent_task_id: &str,
    subtask_id: &str,
    title: &str,
) -> Outcome {
    let title = clean_text(title);
    if title.is_empty() {
        return Outcome::Blank;
    }
    let Some(parent_idx) = find_line(lines, parent_task_id, TASK_DEPTH) else {
        return Outcome::MissingParent;
    };
    if find_line(lines, subtask_id, SUBTASK_DEPTH).is_some() {
        return Outcome::Duplicate;
    }
    let new_line = indent(&title, SUBTASK_DEPTH);
    if has_duplicate(lines, &new_line) {
        return Outcome::Duplicate;
    }

    let at = subtask_insert_index(lines, parent_idx);
    lines.insert(at, new_line);
    Outcome::Changed
}

/// Apply a status change.
///
/// The target is looked up among subtasks first, then tasks. `Unscheduled`
/// removes it; any other status rewrites it as clean text at its depth.
/// A target that is missing is created (its parent first, when given),
/// unless the status would remove it anyway.
pub fn update_status(
    lines: &mut Vec<String>,
    parent_task_id: Option<&str>,
    task_id: &str,
    status: Status,
) -> Outcome {
    let target = find_line(lines, task_id, SUBTASK_DEPTH)
        .or_else(|| find_line(lines, task_id, TASK_DEPTH));

    match target {
        Some(idx) if status.removes_line() => {
            remove_line(lines, idx);
            Outcome::Changed
        }
        Some(idx) => {
            let normalized = indent(&clean_text(&lines[idx]), line_depth(&lines[idx]));
            if lines[idx] == normalized {
                Outcome::Unchanged
            } else {
                lines[idx] = normalized;
                Outcome::Changed
            }
        }
        None if status.removes_line() => Outcome::NotFound,
        None => match parent_task_id {
            Some(parent) => {
                let parent_outcome = append_task(lines, parent, parent);
                let outcome = append_subtask(lines, parent, task_id, task_id);
                if parent_outcome.is_changed() {
                    Outcome::Changed
                } else {
                    outcome
                }
            }
            None => append_task(lines, task_id, task_id),
        },
    }
}

/// Apply an event to the lines of today's outline. `Init` needs nothing
/// beyond the file existing, so it leaves the lines untouched.
pub fn apply_event(lines: &mut Vec<String>, event: &Event) -> Outcome {
    match event.kind() {
        EventKind::Init => Outcome::Unchanged,
        EventKind::AppendTask => append_task(lines, event.task_id(), event.title()),
        EventKind::AppendSubtask => match event.parent_task_id() {
            Some(parent) => append_subtask(lines, parent, event.task_id(), event.title()),
            None => append_task(lines, event.task_id(), event.title()),
        },
        EventKind::UpdateStatus => match event.new_status() {
            Some(status) => update_status(lines, event.parent_task_id(), event.task_id(), status),
            None => Outcome::Unchanged,
        },
    }
}

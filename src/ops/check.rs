use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::outline::{SECTION_DEPTH, SUBTASK_DEPTH, TASK_DEPTH, WORK_SECTION};
use crate::parse::{clean_text, line_depth, split_lines};

/// Structured result from `daymap check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// A structural error: the updater may misplace lines in this file.
/// Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckError {
    /// First line is not a `YYYY-MM-DD` header
    #[serde(rename = "bad_header")]
    BadHeader { line: usize, text: String },
    /// A depth-0 line after the header
    #[serde(rename = "extra_header")]
    ExtraHeader { line: usize, text: String },
    /// Depth increases by more than one level
    #[serde(rename = "depth_jump")]
    DepthJump { line: usize, from: usize, to: usize },
    /// Same task identity twice
    #[serde(rename = "duplicate_task")]
    DuplicateTask { title: String, lines: Vec<usize> },
    /// Same subtask identity twice
    #[serde(rename = "duplicate_subtask")]
    DuplicateSubtask { title: String, lines: Vec<usize> },
}

/// A non-critical issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckWarning {
    /// Header date differs from the file name
    #[serde(rename = "date_mismatch")]
    DateMismatch { expected: String, found: String },
    /// No `Work` section, so appends will add one
    #[serde(rename = "missing_work_section")]
    MissingWorkSection,
    /// Task line in a section other than `Work`
    #[serde(rename = "task_outside_work")]
    TaskOutsideWork { line: usize, section: String },
    /// Blank line inside the outline
    #[serde(rename = "blank_line")]
    BlankLine { line: usize },
    /// Line still carries a status marker
    #[serde(rename = "decorated_line")]
    DecoratedLine { line: usize },
}

/// Validate the content of an outline file.
///
/// Read-only. `expected_date` is the date the file name claims.
pub fn check_outline(content: &str, expected_date: Option<NaiveDate>) -> CheckResult {
    let mut result = CheckResult::default();
    let lines = split_lines(content);

    let mut prev_depth: Option<usize> = None;
    let mut section: Option<String> = None;
    let mut seen_work = false;
    let mut tasks: HashMap<String, Vec<usize>> = HashMap::new();
    let mut subtasks: HashMap<String, Vec<usize>> = HashMap::new();

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            result.warnings.push(CheckWarning::BlankLine { line: line_no });
            continue;
        }
        let depth = line_depth(line);
        let text = clean_text(line);
        if text != line.trim() {
            result.warnings.push(CheckWarning::DecoratedLine { line: line_no });
        }

        match prev_depth {
            None => check_header(&text, depth, line_no, expected_date, &mut result),
            Some(prev) => {
                if depth == 0 {
                    result.errors.push(CheckError::ExtraHeader {
                        line: line_no,
                        text: text.clone(),
                    });
                } else if depth > prev + 1 {
                    result.errors.push(CheckError::DepthJump {
                        line: line_no,
                        from: prev,
                        to: depth,
                    });
                }
            }
        }
        prev_depth = Some(depth);

        if depth == SECTION_DEPTH {
            seen_work |= text == WORK_SECTION;
            section = Some(text);
        } else if depth == TASK_DEPTH {
            let name = section.clone().unwrap_or_default();
            if name != WORK_SECTION {
                result.warnings.push(CheckWarning::TaskOutsideWork {
                    line: line_no,
                    section: name,
                });
            }
            tasks.entry(text).or_default().push(line_no);
        } else if depth == SUBTASK_DEPTH {
            subtasks.entry(text).or_default().push(line_no);
        }
    }

    if !seen_work {
        result.warnings.push(CheckWarning::MissingWorkSection);
    }
    result.errors.extend(duplicates(tasks).map(|(title, lines)| CheckError::DuplicateTask { title, lines }));
    result.errors.extend(
        duplicates(subtasks).map(|(title, lines)| CheckError::DuplicateSubtask { title, lines }),
    );

    result.valid = result.errors.is_empty();
    result
}

fn check_header(
    text: &str,
    depth: usize,
    line_no: usize,
    expected_date: Option<NaiveDate>,
    result: &mut CheckResult,
) {
    let parsed = NaiveDate::parse_from_str(text, "%Y-%m-%d").ok();
    if depth != 0 || parsed.is_none() {
        result.errors.push(CheckError::BadHeader {
            line: line_no,
            text: text.to_string(),
        });
        return;
    }
    if let (Some(expected), Some(found)) = (expected_date, parsed)
        && expected != found
    {
        result.warnings.push(CheckWarning::DateMismatch {
            expected: expected.format("%Y-%m-%d").to_string(),
            found: found.format("%Y-%m-%d").to_string(),
        });
    }
}

/// Identities seen more than once, sorted by first occurrence
fn duplicates(seen: HashMap<String, Vec<usize>>) -> impl Iterator<Item = (String, Vec<usize>)> {
    let mut dups: Vec<(String, Vec<usize>)> =
        seen.into_iter().filter(|(_, lines)| lines.len() > 1).collect();
    dups.sort_by_key(|(_, lines)| lines[0]);
    dups.into_iter()
}

use std::fmt::Write;

use serde::Serialize;

use crate::model::outline::Outline;
use crate::ops::check::{CheckError, CheckResult, CheckWarning};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ShowJson<'a> {
    pub path: String,
    #[serde(flatten)]
    pub outline: &'a Outline,
}

#[derive(Serialize)]
pub struct StatusJson {
    pub task: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub status: crate::model::event::Status,
    pub line: String,
    pub processed: u64,
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

/// Render an outline with two-space indentation per level
pub fn format_outline(outline: &Outline) -> String {
    let mut out = String::new();
    if !outline.header.is_empty() {
        let _ = writeln!(out, "{}", outline.header);
    }
    for (section, tasks) in &outline.sections {
        let _ = writeln!(out, "  {}", section);
        for task in tasks {
            let _ = writeln!(out, "    {}", task.title);
            for sub in &task.subtasks {
                let _ = writeln!(out, "      {}", sub);
            }
        }
    }
    out
}

pub fn format_check(result: &CheckResult) -> String {
    let mut out = String::new();
    for err in &result.errors {
        let _ = writeln!(out, "error: {}", describe_error(err));
    }
    for warn in &result.warnings {
        let _ = writeln!(out, "warning: {}", describe_warning(warn));
    }
    if result.valid && result.warnings.is_empty() {
        out.push_str("ok\n");
    }
    out
}

fn describe_error(err: &CheckError) -> String {
    match err {
        CheckError::BadHeader { line, text } => {
            format!("line {}: expected a YYYY-MM-DD header, found '{}'", line, text)
        }
        CheckError::ExtraHeader { line, text } => {
            format!("line {}: unexpected top-level line '{}'", line, text)
        }
        CheckError::DepthJump { line, from, to } => {
            format!("line {}: depth jumps from {} to {}", line, from, to)
        }
        CheckError::DuplicateTask { title, lines } => {
            format!("task '{}' appears on lines {}", title, join_numbers(lines))
        }
        CheckError::DuplicateSubtask { title, lines } => {
            format!("subtask '{}' appears on lines {}", title, join_numbers(lines))
        }
    }
}

fn describe_warning(warn: &CheckWarning) -> String {
    match warn {
        CheckWarning::DateMismatch { expected, found } => {
            format!("header says {} but the file is for {}", found, expected)
        }
        CheckWarning::MissingWorkSection => "no Work section".to_string(),
        CheckWarning::TaskOutsideWork { line, section } => {
            format!("line {}: task in section '{}'", line, section)
        }
        CheckWarning::BlankLine { line } => format!("line {}: blank line", line),
        CheckWarning::DecoratedLine { line } => {
            format!("line {}: status marker in outline", line)
        }
    }
}

fn join_numbers(numbers: &[usize]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::check::check_outline;
    use crate::parse::parse_outline;
    use insta::assert_snapshot;

    #[test]
    fn outline_text() {
        let outline = parse_outline(
            "2025-06-12\n\tPersonal\n\tWork\n\t\tTask A\n\t\t\tStep 1\n\t\t\tStep 2\n\t\tTask B\n",
        );
        assert_snapshot!(format_outline(&outline), @r"
        2025-06-12
          Personal
          Work
            Task A
              Step 1
              Step 2
            Task B
        ");
    }

    #[test]
    fn check_text_ok() {
        let result = check_outline("2025-06-12\n\tPersonal\n\tWork\n", None);
        assert_eq!(format_check(&result), "ok\n");
    }

    #[test]
    fn check_text_problems() {
        let result = check_outline("2025-06-12\n\tWork\n\t\tA\n\t\tA\n\n", None);
        assert_snapshot!(format_check(&result), @r"
        error: task 'A' appears on lines 3, 4
        warning: line 5: blank line
        ");
    }

    #[test]
    fn show_json_flattens_outline() {
        let outline = parse_outline("2025-06-12\n\tWork\n\t\tTask A\n");
        let json = serde_json::to_value(ShowJson {
            path: "/tmp/2025-06-12.txt".into(),
            outline: &outline,
        })
        .unwrap();
        assert_eq!(json["path"], "/tmp/2025-06-12.txt");
        assert_eq!(json["date"], "2025-06-12");
        assert_eq!(json["sections"]["Work"][0]["title"], "Task A");
    }
}

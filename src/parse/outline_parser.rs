use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::model::outline::{
    Outline, OutlineTask, PERSONAL_SECTION, SECTION_DEPTH, SUBTASK_DEPTH, TASK_DEPTH, WORK_SECTION,
};
use crate::parse::clean::clean_text;

/// Number of leading tab characters
pub fn line_depth(line: &str) -> usize {
    line.chars().take_while(|&c| c == '\t').count()
}

/// `text` at the given depth
pub fn indent(text: &str, depth: usize) -> String {
    let mut line = "\t".repeat(depth);
    line.push_str(text);
    line
}

/// Canonical content of a fresh outline file
pub fn skeleton(date: NaiveDate) -> String {
    join_lines(&[
        date.format("%Y-%m-%d").to_string(),
        indent(PERSONAL_SECTION, SECTION_DEPTH),
        indent(WORK_SECTION, SECTION_DEPTH),
    ])
}

/// Split file content into lines, dropping the terminating newline and
/// any `\r` left by editors that write CRLF
pub fn split_lines(content: &str) -> Vec<String> {
    content.lines().map(|l| l.trim_end_matches('\r').to_string()).collect()
}

/// Join lines back into file content; every line is newline-terminated
pub fn join_lines(lines: &[String]) -> String {
    let mut out = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Parse outline content into sections, tasks and subtasks.
///
/// Lenient: blank lines are ignored, lines deeper than a subtask are
/// folded into the nearest subtask depth, and tasks that appear before any
/// section header are collected under an empty section name.
pub fn parse_outline(content: &str) -> Outline {
    let lines = split_lines(content);
    let mut iter = lines.iter().filter(|l| !l.trim().is_empty()).peekable();

    let header = match iter.peek() {
        Some(line) if line_depth(line) == 0 => Some(line.trim().to_string()),
        _ => None,
    };
    if header.is_some() {
        iter.next();
    }
    let header = header.unwrap_or_default();
    let date = NaiveDate::parse_from_str(&header, "%Y-%m-%d").ok();

    let mut sections: IndexMap<String, Vec<OutlineTask>> = IndexMap::new();
    let mut current_section: Option<String> = None;

    for line in iter {
        let depth = line_depth(line);
        let text = clean_text(line);
        if depth <= SECTION_DEPTH {
            sections.entry(text.clone()).or_default();
            current_section = Some(text);
            continue;
        }

        let section = current_section.clone().unwrap_or_default();
        let tasks = sections.entry(section).or_default();
        if depth == TASK_DEPTH {
            tasks.push(OutlineTask {
                title: text,
                subtasks: Vec::new(),
            });
        } else if depth >= SUBTASK_DEPTH {
            match tasks.last_mut() {
                Some(task) => task.subtasks.push(text),
                // Orphaned subtask: keep it visible as a task of its own
                None => tasks.push(OutlineTask {
                    title: text,
                    subtasks: Vec::new(),
                }),
            }
        }
    }

    Outline {
        header,
        date,
        sections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 12).unwrap()
    }

    #[test]
    fn depth_counts_leading_tabs_only() {
        assert_eq!(line_depth("2025-06-12"), 0);
        assert_eq!(line_depth("\tWork"), 1);
        assert_eq!(line_depth("\t\t\tSub\ttask"), 3);
        assert_eq!(line_depth("  \tspaces first"), 0);
        assert_eq!(line_depth(""), 0);
    }

    #[test]
    fn skeleton_content() {
        assert_eq!(skeleton(day()), "2025-06-12\n\tPersonal\n\tWork\n");
    }

    #[test]
    fn split_and_join() {
        let lines = split_lines("a\r\n\tb\n");
        assert_eq!(lines, vec!["a".to_string(), "\tb".to_string()]);
        assert_eq!(join_lines(&lines), "a\n\tb\n");
        assert_eq!(join_lines(&[]), "");
    }

    #[test]
    fn parses_sections_tasks_and_subtasks() {
        let content = "2025-06-12\n\tPersonal\n\t\tGym\n\tWork\n\t\tTask A\n\t\t\tStep 1\n\t\t\tStep 2\n\t\tTask B\n";
        let outline = parse_outline(content);
        assert_eq!(outline.header, "2025-06-12");
        assert_eq!(outline.date, Some(day()));
        assert_eq!(
            outline.sections.keys().collect::<Vec<_>>(),
            vec!["Personal", "Work"]
        );
        assert_eq!(outline.sections["Personal"][0].title, "Gym");
        let work = outline.work_tasks();
        assert_eq!(work.len(), 2);
        assert_eq!(work[0].title, "Task A");
        assert_eq!(work[0].subtasks, vec!["Step 1", "Step 2"]);
        assert!(work[1].subtasks.is_empty());
        assert_eq!(outline.task_count(), 3);
    }

    #[test]
    fn parse_cleans_decorated_lines() {
        let content = "2025-06-12\n\tWork\n\t\tTask A ✅ 2025-06-12\n";
        let outline = parse_outline(content);
        assert_eq!(outline.work_tasks()[0].title, "Task A");
    }

    #[test]
    fn parse_tolerates_missing_header_and_blank_lines() {
        let outline = parse_outline("\n\tWork\n\n\t\tTask\n\t\t\t\tDeep\n");
        assert_eq!(outline.header, "");
        assert_eq!(outline.date, None);
        assert_eq!(outline.work_tasks()[0].subtasks, vec!["Deep"]);
    }

    #[test]
    fn orphan_subtask_becomes_task() {
        let outline = parse_outline("2025-06-12\n\tWork\n\t\t\tOrphan\n");
        assert_eq!(outline.work_tasks()[0].title, "Orphan");
    }
}

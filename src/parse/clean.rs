use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::model::event::Status;

/// Icon appended to a completed task line
pub const DONE_ICON: &str = "✅";
/// Icon appended to a task that has been started
pub const IN_PROGRESS_ICON: &str = "🛫";
/// Icon appended to a scheduled task
pub const SCHEDULED_ICON: &str = "⏳";

/// A status icon followed by whitespace and an ISO date, e.g. ` ✅ 2025-06-12`.
/// The icon may carry an emoji variation selector; the date is ASCII digits only.
static STATUS_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*(?:✅|🛫|⏳)\x{FE0F}?\s+[0-9]{4}-[0-9]{2}-[0-9]{2}")
        .expect("status marker pattern is valid")
});

/// Strip status markers and surrounding whitespace, yielding the identity
/// key of a task line.
///
/// Removing one marker can splice together the pieces of another (an icon
/// left of the removed span followed by a date right of it), so stripping
/// repeats until nothing changes. That makes cleaning idempotent.
pub fn clean_text(text: &str) -> String {
    let mut current = text.trim().to_string();
    loop {
        let next = STATUS_MARKER.replace_all(&current, "").trim().to_string();
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Icon for a status, `None` for statuses that carry no marker
pub fn status_icon(status: Status) -> Option<&'static str> {
    match status {
        Status::Completed => Some(DONE_ICON),
        Status::Started => Some(IN_PROGRESS_ICON),
        Status::Scheduled => Some(SCHEDULED_ICON),
        Status::Unscheduled => None,
    }
}

/// Render a task line the way the notes files show it: clean title, then
/// the status icon and date. Cleaning the result gives back the title.
pub fn decorate_title(title: &str, status: Status, date: NaiveDate) -> String {
    let title = clean_text(title);
    match status_icon(status) {
        Some(icon) => format!("{} {} {}", title, icon, date.format("%Y-%m-%d")),
        None => title,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 12).unwrap()
    }

    #[test]
    fn strips_each_marker_kind() {
        assert_eq!(clean_text("Write report ✅ 2025-06-12"), "Write report");
        assert_eq!(clean_text("Write report 🛫 2025-06-12"), "Write report");
        assert_eq!(clean_text("Write report ⏳ 2025-06-12"), "Write report");
    }

    #[test]
    fn strips_multiple_markers_and_tabs() {
        assert_eq!(
            clean_text("\t\tDeploy ⏳ 2025-06-10 🛫 2025-06-11 ✅ 2025-06-12"),
            "Deploy"
        );
    }

    #[test]
    fn keeps_icon_without_date() {
        assert_eq!(clean_text("Ship it ✅"), "Ship it ✅");
    }

    #[test]
    fn keeps_plain_dates() {
        assert_eq!(clean_text("Review 2025-06-12 notes"), "Review 2025-06-12 notes");
    }

    #[test]
    fn spliced_markers_are_removed() {
        assert_eq!(clean_text("x ✅ ✅ 2025-01-01 2025-01-02"), "x");
    }

    #[test]
    fn strips_icon_with_variation_selector() {
        assert_eq!(clean_text("Write report ⏳\u{FE0F} 2025-06-12"), "Write report");
        assert_eq!(clean_text("Write report ✅\u{FE0F} 2025-06-12"), "Write report");
    }

    #[test]
    fn keeps_non_ascii_digit_dates() {
        // Arabic-Indic digits are not a YYYY-MM-DD date
        let text = "Budget ✅ \u{0662}\u{0660}\u{0662}\u{0665}-\u{0660}\u{0666}-\u{0661}\u{0662}";
        assert_eq!(clean_text(text), text);
    }

    #[test]
    fn clean_text_is_unchanged() {
        assert_eq!(clean_text("Already clean"), "Already clean");
    }

    #[test]
    fn icon_per_status() {
        assert_eq!(status_icon(Status::Completed), Some(DONE_ICON));
        assert_eq!(status_icon(Status::Started), Some(IN_PROGRESS_ICON));
        assert_eq!(status_icon(Status::Scheduled), Some(SCHEDULED_ICON));
        assert_eq!(status_icon(Status::Unscheduled), None);
    }

    #[test]
    fn decorate_then_clean_gives_title() {
        let line = decorate_title("Plan sprint", Status::Started, day());
        assert_eq!(line, "Plan sprint 🛫 2025-06-12");
        assert_eq!(clean_text(&line), "Plan sprint");
        assert_eq!(decorate_title("Plan sprint", Status::Unscheduled, day()), "Plan sprint");
    }

    #[test]
    fn decorate_replaces_old_marker() {
        let line = decorate_title("Plan sprint ⏳ 2025-06-10", Status::Completed, day());
        assert_eq!(line, "Plan sprint ✅ 2025-06-12");
    }

    fn decorated_strategy() -> impl Strategy<Value = String> {
        let icon = prop_oneof![Just("✅"), Just("🛫"), Just("⏳"), Just("⏳\u{FE0F}"), Just("")];
        let piece = prop_oneof![
            "[ \t]{0,2}",
            "[a-zA-Z ]{0,8}",
            "[0-9]{4}-[0-9]{2}-[0-9]{2}",
            (icon, "[ \t]{0,2}").prop_map(|(i, ws)| format!("{i}{ws}")),
        ];
        proptest::collection::vec(piece, 0..8).prop_map(|parts| parts.concat())
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]

        #[test]
        fn cleaning_is_idempotent(input in decorated_strategy()) {
            let once = clean_text(&input);
            prop_assert_eq!(clean_text(&once), once.clone());
        }

        #[test]
        fn cleaning_arbitrary_text_is_idempotent(input in "\\PC{0,40}") {
            let once = clean_text(&input);
            prop_assert_eq!(clean_text(&once), once.clone());
        }
    }
}

//! Read-side views over a task snapshot: statistics and date groups.
//!
//! Everything here is a pure function of the collection passed in, so the
//! values can never drift from the stored tasks.

use super::clock::DateFormats;
use super::types::{DateGroup, Task, TaskStats};
use chrono::{Duration, NaiveDate};

pub const TODAY_LABEL: &str = "Today";
pub const YESTERDAY_LABEL: &str = "Yesterday";

pub fn compute_stats(tasks: &[Task]) -> TaskStats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|task| task.completed).count();

    TaskStats {
        total,
        completed,
        pending: total - completed,
        progress_percent: progress_percent(completed, total),
    }
}

/// `round(completed / total * 100)` rounding half up; 0 for an empty list.
pub fn progress_percent(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed * 200 + total) / (total * 2)) as u32
}

/// Buckets tasks by `createdDate`.
///
/// Order: "Today", "Yesterday", then the remaining dates newest first.
/// Labels that do not parse with `formats` go last, in order of first appearance.
pub fn group_by_date<'a>(
    tasks: &'a [Task],
    today: NaiveDate,
    formats: &DateFormats,
) -> Vec<DateGroup<'a>> {
    let today_label = formats.format_date(today);
    let yesterday_label = formats.format_date(today - Duration::days(1));

    // Collection order is preserved inside each bucket.
    let mut buckets: Vec<(&'a str, Vec<&'a Task>)> = Vec::new();
    for task in tasks {
        match buckets
            .iter_mut()
            .find(|(date, _)| *date == task.created_date.as_str())
        {
            Some((_, members)) => members.push(task),
            None => buckets.push((task.created_date.as_str(), vec![task])),
        }
    }

    let mut today_group = None;
    let mut yesterday_group = None;
    let mut dated: Vec<(NaiveDate, &'a str, Vec<&'a Task>)> = Vec::new();
    let mut undated: Vec<(&'a str, Vec<&'a Task>)> = Vec::new();

    for (date, members) in buckets {
        if date == today_label {
            today_group = Some(members);
        } else if date == yesterday_label {
            yesterday_group = Some(members);
        } else if let Some(parsed) = formats.parse_date(date) {
            dated.push((parsed, date, members));
        } else {
            undated.push((date, members));
        }
    }

    // Stable sort keeps first-appearance order for equal dates.
    dated.sort_by(|a, b| b.0.cmp(&a.0));

    let mut groups = Vec::new();
    if let Some(members) = today_group {
        groups.push(DateGroup {
            label: TODAY_LABEL.to_string(),
            tasks: members,
        });
    }
    if let Some(members) = yesterday_group {
        groups.push(DateGroup {
            label: YESTERDAY_LABEL.to_string(),
            tasks: members,
        });
    }
    groups.extend(dated.into_iter().map(|(_, date, members)| DateGroup {
        label: date.to_string(),
        tasks: members,
    }));
    groups.extend(undated.into_iter().map(|(date, members)| DateGroup {
        label: date.to_string(),
        tasks: members,
    }));

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, date: &str, completed: bool) -> Task {
        Task {
            id: id.to_string(),
            text: format!("task {}", id),
            completed,
            created_at: "9:00:00 AM".to_string(),
            created_date: date.to_string(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn labels(groups: &[DateGroup]) -> Vec<String> {
        groups.iter().map(|g| g.label.clone()).collect()
    }

    #[test]
    fn test_stats_empty() {
        let stats = compute_stats(&[]);
        assert_eq!(stats, TaskStats::default());
        assert_eq!(stats.progress_percent, 0);
    }

    #[test]
    fn test_stats_all_completed_is_100() {
        let tasks = vec![task("a", "1/1/2026", true), task("b", "1/1/2026", true)];
        let stats = compute_stats(&tasks);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.pending, 0);
        assert_eq!(stats.progress_percent, 100);
    }

    #[test]
    fn test_progress_rounds_half_up() {
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
        assert_eq!(progress_percent(1, 8), 13); // 12.5
        assert_eq!(progress_percent(1, 200), 1); // 0.5
        assert_eq!(progress_percent(0, 5), 0);
    }

    #[test]
    fn test_groups_today_yesterday_and_literal() {
        let tasks = vec![
            task("1", "10/19/2026", false),
            task("2", "10/18/2026", false),
            task("3", "10/2/2026", true),
        ];

        let groups = group_by_date(&tasks, today(), &DateFormats::default());

        assert_eq!(labels(&groups), vec!["Today", "Yesterday", "10/2/2026"]);
        assert_eq!(groups[0].tasks[0].id, "1");
        assert_eq!(groups[1].tasks[0].id, "2");
        assert_eq!(groups[2].tasks[0].id, "3");
    }

    #[test]
    fn test_groups_order_independent_of_collection_order() {
        let tasks = vec![
            task("old", "1/5/2025", false),
            task("y", "10/18/2026", false),
            task("mid", "9/30/2026", false),
            task("t", "10/19/2026", false),
            task("older", "12/31/2024", false),
        ];

        let groups = group_by_date(&tasks, today(), &DateFormats::default());

        assert_eq!(
            labels(&groups),
            vec!["Today", "Yesterday", "9/30/2026", "1/5/2025", "12/31/2024"]
        );
    }

    #[test]
    fn test_group_members_keep_collection_order() {
        let tasks = vec![
            task("c", "10/19/2026", false),
            task("x", "3/3/2026", false),
            task("b", "10/19/2026", true),
            task("a", "10/19/2026", false),
        ];

        let groups = group_by_date(&tasks, today(), &DateFormats::default());
        let ids: Vec<&str> = groups[0].tasks.iter().map(|t| t.id.as_str()).collect();

        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_unparseable_labels_go_last() {
        let tasks = vec![
            task("1", "someday", false),
            task("2", "1/1/2026", false),
            task("3", "whenever", false),
            task("4", "10/19/2026", false),
        ];

        let groups = group_by_date(&tasks, today(), &DateFormats::default());

        assert_eq!(
            labels(&groups),
            vec!["Today", "1/1/2026", "someday", "whenever"]
        );
    }

    #[test]
    fn test_empty_collection_has_no_groups() {
        assert!(group_by_date(&[], today(), &DateFormats::default()).is_empty());
    }
}

// Finds simpler patterns in your task history
//
// Like tasks that read almost the same, tasks you keep doing over and over,
// or a bunch of tasks that were all due on the same day.

use crate::db::{Task, TaskStatus};
use crate::intelligence::corpus::Corpus;
use crate::intelligence::text_similarity::{follow_up_neighbors, TfIdfModel};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

// A title has to come back at least this often to count as recurring
const MIN_RECURRENCES: usize = 2;

// Same goes for a day: one task alone isn't a cluster
const MIN_SAME_DAY_TASKS: usize = 2;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Similar,
    Recurring,
    SameDay,
}

impl std::fmt::Display for PatternType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PatternType::Similar => "similar",
            PatternType::Recurring => "recurring",
            PatternType::SameDay => "same_day",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FollowUp {
    pub pattern_type: PatternType,
    pub label: String,
    pub related: Vec<String>,
}

pub struct PatternDetector;

impl PatternDetector {
    // Titles whose text is close to another title (score above 0.5).
    // `limit` caps the related titles across all entries, not the entries.
    pub fn similar_follow_ups(
        tasks: &[Task],
        title_filter: Option<&str>,
        limit: usize,
    ) -> Vec<FollowUp> {
        if limit == 0 {
            return Vec::new();
        }

        let corpus = Corpus::new(tasks);
        let Some(model) = TfIdfModel::fit(corpus.texts()) else {
            return Vec::new();
        };
        let neighbors = follow_up_neighbors(&model);

        let mut follow_ups = Vec::new();
        let mut remaining = limit;
        let mut seen_titles: HashSet<&str> = HashSet::new();

        for (i, task) in tasks.iter().enumerate() {
            // First occurrence speaks for every duplicate of a title
            if !seen_titles.insert(task.title.as_str()) {
                continue;
            }
            if title_filter.is_some_and(|wanted| wanted != task.title) {
                continue;
            }

            let mut related: Vec<String> = Vec::new();
            for neighbor in &neighbors[i] {
                if remaining == 0 {
                    break;
                }
                let title = &tasks[neighbor.index].title;
                if *title == task.title || related.contains(title) {
                    continue;
                }
                related.push(title.clone());
                remaining -= 1;
            }

            if !related.is_empty() {
                follow_ups.push(FollowUp {
                    pattern_type: PatternType::Similar,
                    label: format!("{} Follow-up", task.title),
                    related,
                });
            }

            if remaining == 0 {
                break;
            }
        }

        follow_ups
    }

    // Completed titles that show up more than once, most frequent first
    pub fn recurring_follow_ups(tasks: &[Task], limit: usize) -> Vec<FollowUp> {
        let mut order: Vec<&str> = Vec::new();
        let mut counts: HashMap<&str, usize> = HashMap::new();

        for task in tasks.iter().filter(|t| t.status == TaskStatus::Completed) {
            let count = counts.entry(task.title.as_str()).or_insert_with(|| {
                order.push(task.title.as_str());
                0
            });
            *count += 1;
        }

        let mut recurring: Vec<(&str, usize)> = order
            .into_iter()
            .map(|title| (title, counts[title]))
            .filter(|(_, count)| *count >= MIN_RECURRENCES)
            .collect();

        // Stable, so equal counts keep first-seen order
        recurring.sort_by(|a, b| b.1.cmp(&a.1));

        recurring
            .into_iter()
            .take(limit)
            .map(|(title, _)| FollowUp {
                pattern_type: PatternType::Recurring,
                label: format!("{} Follow-up", title),
                related: vec![title.to_string()],
            })
            .collect()
    }

    // Completed tasks sharing a due date (UTC calendar day), earliest day first
    pub fn same_day_follow_ups(tasks: &[Task], limit: usize) -> Vec<FollowUp> {
        let mut by_day: BTreeMap<NaiveDate, Vec<String>> = BTreeMap::new();

        for task in tasks.iter().filter(|t| t.status == TaskStatus::Completed) {
            if let Some(due) = task.due_date {
                by_day
                    .entry(due.date_naive())
                    .or_default()
                    .push(task.title.clone());
            }
        }

        by_day
            .into_values()
            .filter(|titles| titles.len() >= MIN_SAME_DAY_TASKS)
            .take(limit)
            .map(|titles| FollowUp {
                pattern_type: PatternType::SameDay,
                label: format!("{} Review", titles.join(" and ")),
                related: titles,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn task(title: &str, status: TaskStatus) -> Task {
        Task {
            id: 0,
            title: title.to_string(),
            description: None,
            created_at: Utc::now(),
            due_date: None,
            status,
        }
    }

    fn due(title: &str, day: u32, hour: u32) -> Task {
        let mut t = task(title, TaskStatus::Completed);
        t.due_date = Some(Utc.with_ymd_and_hms(2026, 10, day, hour, 0, 0).unwrap());
        t
    }

    #[test]
    fn test_similar_follow_ups() {
        let tasks = vec![
            task("Buy groceries", TaskStatus::Pending),
            task("Buy groceries weekly", TaskStatus::Pending),
            task("Quarterly tax filing", TaskStatus::Pending),
        ];

        let follow_ups = PatternDetector::similar_follow_ups(&tasks, None, 10);

        assert_eq!(follow_ups.len(), 2);
        assert_eq!(follow_ups[0].label, "Buy groceries Follow-up");
        assert_eq!(follow_ups[0].related, vec!["Buy groceries weekly"]);
        assert_eq!(follow_ups[1].related, vec!["Buy groceries"]);
    }

    #[test]
    fn test_similar_respects_filter_and_limit() {
        let tasks = vec![
            task("Buy groceries", TaskStatus::Pending),
            task("Buy groceries weekly", TaskStatus::Pending),
        ];

        let filtered =
            PatternDetector::similar_follow_ups(&tasks, Some("Buy groceries weekly"), 10);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].related, vec!["Buy groceries"]);

        let limited = PatternDetector::similar_follow_ups(&tasks, None, 1);
        assert_eq!(limited.len(), 1);

        assert!(PatternDetector::similar_follow_ups(&tasks, None, 0).is_empty());
        assert!(PatternDetector::similar_follow_ups(&[], None, 5).is_empty());
    }

    #[test]
    fn test_duplicate_titles_do_not_suggest_themselves() {
        let tasks = vec![
            task("Water plants", TaskStatus::Completed),
            task("Water plants", TaskStatus::Completed),
        ];

        assert!(PatternDetector::similar_follow_ups(&tasks, None, 5).is_empty());
    }

    #[test]
    fn test_recurring_follow_ups() {
        let tasks = vec![
            task("Pay rent", TaskStatus::Completed),
            task("Water plants", TaskStatus::Completed),
            task("Water plants", TaskStatus::Completed),
            task("Pay rent", TaskStatus::Completed),
            task("Water plants", TaskStatus::Completed),
            task("Pay rent", TaskStatus::Pending),
            task("Wash car", TaskStatus::Completed),
        ];

        let follow_ups = PatternDetector::recurring_follow_ups(&tasks, 5);

        let labels: Vec<_> = follow_ups.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["Water plants Follow-up", "Pay rent Follow-up"]);

        assert_eq!(PatternDetector::recurring_follow_ups(&tasks, 1).len(), 1);
    }

    #[test]
    fn test_same_day_follow_ups() {
        let tasks = vec![
            due("Pay rent", 20, 9),
            due("Water plants", 20, 18),
            due("Wash car", 21, 9),
            due("Book flights", 3, 9),
            due("Pack bags", 3, 12),
        ];

        let follow_ups = PatternDetector::same_day_follow_ups(&tasks, 5);

        assert_eq!(follow_ups.len(), 2);
        assert_eq!(follow_ups[0].label, "Book flights and Pack bags Review");
        assert_eq!(follow_ups[1].related, vec!["Pay rent", "Water plants"]);

        assert_eq!(PatternDetector::same_day_follow_ups(&tasks, 1).len(), 1);
    }

    #[test]
    fn test_same_day_ignores_open_tasks() {
        let mut open = due("Pay rent", 20, 9);
        open.status = TaskStatus::InProgress;
        let tasks = vec![open, due("Water plants", 20, 10)];

        assert!(PatternDetector::same_day_follow_ups(&tasks, 5).is_empty());
    }

    #[test]
    fn test_pattern_type_display() {
        assert_eq!(PatternType::SameDay.to_string(), "same_day");
        assert_eq!(PatternType::Recurring.to_string(), "recurring");
    }
}

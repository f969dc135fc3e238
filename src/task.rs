//! Task model and field validation.
//!
//! The persisted wire format mirrors the storage slot layout: camelCase keys,
//! `deadline` as `YYYY-MM-DD` or null, `createdAt` as `YYYY-MM-DD HH:mm`.

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

pub const PRIORITIES: [&str; 3] = ["high", "medium", "low"];
pub const CATEGORIES: [&str; 4] = ["work", "study", "personal", "other"];

/// Task priority, highest first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Rank for sorting; lower sorts first.
    pub fn rank(self) -> usize {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Parse free-text input from the CLI or the editor form.
    pub fn parse(input: &str) -> Result<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(Error::Validation(format!(
                "unknown priority '{}' (expected {})",
                other,
                PRIORITIES.join(", ")
            ))),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task category. Persisted data without a category reads as `Other`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Study,
    Personal,
    #[default]
    Other,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Study => "study",
            Category::Personal => "personal",
            Category::Other => "other",
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "work" => Ok(Category::Work),
            "study" => Ok(Category::Study),
            "personal" => Ok(Category::Personal),
            "other" => Ok(Category::Other),
            other => Err(Error::Validation(format!(
                "unknown category '{}' (expected {})",
                other,
                CATEGORIES.join(", ")
            ))),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single to-do record.
///
/// `id` and `created_at` are assigned at creation and never change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: Priority,
    #[serde(default)]
    pub category: Category,
    pub deadline: Option<NaiveDate>,
    pub completed: bool,
    #[serde(with = "created_at_format")]
    pub created_at: NaiveDateTime,
}

impl Task {
    /// Build a new task from a validated draft with a fresh id and timestamp.
    pub fn from_draft(draft: TaskDraft) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            category: draft.category,
            deadline: draft.deadline,
            completed: false,
            created_at: now_minute(),
        }
    }

    /// True when the deadline has passed relative to `today` and the task is
    /// still open.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.deadline.map(|d| d < today).unwrap_or(false)
    }
}

/// Current local time truncated to minute resolution, matching the persisted
/// `createdAt` precision.
pub fn now_minute() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
}

/// The mutable fields of a task, as entered through the CLI or the form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: Category,
    pub deadline: Option<NaiveDate>,
}

impl TaskDraft {
    /// Enforce required fields before a create or update is applied.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation("title cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// Parse a `YYYY-MM-DD` deadline from free text.
pub fn parse_deadline(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
        Error::Validation(format!("invalid deadline '{trimmed}' (expected YYYY-MM-DD)"))
    })
}

mod created_at_format {
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M";

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            ..TaskDraft::default()
        }
    }

    #[test]
    fn draft_requires_non_blank_title() {
        assert!(draft("Buy milk").validate().is_ok());
        assert!(matches!(draft("").validate(), Err(Error::Validation(_))));
        assert!(matches!(draft("   ").validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn priority_parses_case_insensitively() {
        assert_eq!(Priority::parse("HIGH").unwrap(), Priority::High);
        assert_eq!(Priority::parse(" medium ").unwrap(), Priority::Medium);
        assert!(matches!(
            Priority::parse("urgent"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn category_defaults_to_other() {
        assert_eq!(Category::default(), Category::Other);
        assert_eq!(Category::parse("Work").unwrap(), Category::Work);
        assert!(matches!(
            Category::parse("chores"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn wire_format_matches_storage_slot_layout() {
        let task = Task {
            id: "t1".to_string(),
            title: "Buy milk".to_string(),
            description: String::new(),
            priority: Priority::Medium,
            category: Category::Other,
            deadline: None,
            completed: false,
            created_at: NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
        };

        let json: serde_json::Value = serde_json::to_value(&task).unwrap();
        assert_eq!(json["id"], "t1");
        assert_eq!(json["createdAt"], "2025-03-01 09:30");
        assert_eq!(json["priority"], "medium");
        assert_eq!(json["category"], "other");
        assert!(json["deadline"].is_null());
        assert_eq!(json["completed"], false);
    }

    #[test]
    fn wire_format_round_trips() {
        let task = Task {
            id: "t2".to_string(),
            title: "Call Bob".to_string(),
            description: "about the report".to_string(),
            priority: Priority::High,
            category: Category::Work,
            deadline: NaiveDate::from_ymd_opt(2025, 4, 15),
            completed: true,
            created_at: NaiveDate::from_ymd_opt(2025, 3, 2)
                .unwrap()
                .and_hms_opt(18, 5, 0)
                .unwrap(),
        };

        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"deadline\":\"2025-04-15\""));
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn missing_category_reads_as_other() {
        let json = r#"{
            "id": "t3",
            "title": "Old record",
            "description": "",
            "priority": "low",
            "deadline": null,
            "completed": false,
            "createdAt": "2024-12-31 23:59"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.category, Category::Other);
    }

    #[test]
    fn overdue_requires_open_task_and_past_deadline() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let mut task = Task::from_draft(TaskDraft {
            title: "x".to_string(),
            deadline: NaiveDate::from_ymd_opt(2025, 3, 9),
            ..TaskDraft::default()
        });
        assert!(task.is_overdue(today));

        task.completed = true;
        assert!(!task.is_overdue(today));

        task.completed = false;
        task.deadline = NaiveDate::from_ymd_opt(2025, 3, 10);
        assert!(!task.is_overdue(today));

        task.deadline = None;
        assert!(!task.is_overdue(today));
    }

    #[test]
    fn deadline_parsing_rejects_bad_input() {
        assert_eq!(
            parse_deadline("2025-06-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );
        assert!(matches!(
            parse_deadline("June 1st"),
            Err(Error::Validation(_))
        ));
    }
}

use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Date;

use crate::id::TaskId;
use crate::priority::Priority;

/// `YYYY-MM-DD`, the calendar date layout used on disk and in input fields.
pub const DUE_DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

time::serde::format_description!(due_date_format, Date, "[year]-[month]-[day]");

/// Parse a `YYYY-MM-DD` date.
///
/// # Errors
/// Returns an error when the input is not a valid calendar date in that layout.
pub fn parse_due_date(raw: &str) -> Result<Date, time::error::Parse> {
    Date::parse(raw.trim(), DUE_DATE_FORMAT)
}

/// Render a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_due_date(date: Date) -> String {
    date.format(DUE_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Editable part of a task record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFields {
    /// Short title; must not be blank.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Optional due date.
    pub due_date: Option<Date>,
    /// Urgency tag.
    pub priority: Priority,
    /// Optional category label.
    pub category: Option<String>,
}

impl TaskFields {
    /// Fields with the given title and description and defaults elsewhere.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Set the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: Option<Date>) -> Self {
        self.due_date = due_date;
        self
    }

    /// Set the category; blank values clear it.
    #[must_use]
    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category.filter(|value| !value.trim().is_empty());
        self
    }
}

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Identifier minted at creation; never changes.
    pub id: TaskId,
    /// Short title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Optional due date stored as `YYYY-MM-DD`.
    #[serde(default, with = "due_date_format::option", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Date>,
    /// Urgency tag.
    #[serde(default)]
    pub priority: Priority,
    /// Optional category label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Completion flag.
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Create a new, not yet completed task with a freshly minted id.
    #[must_use]
    pub fn new(fields: TaskFields) -> Self {
        Self::with_id(TaskId::new(), fields)
    }

    /// Create a not yet completed task with an explicit id.
    #[must_use]
    pub fn with_id(id: TaskId, fields: TaskFields) -> Self {
        let TaskFields {
            title,
            description,
            due_date,
            priority,
            category,
        } = fields;
        Self {
            id,
            title,
            description,
            due_date,
            priority,
            category,
            completed: false,
        }
    }

    /// Copy of the editable fields.
    #[must_use]
    pub fn fields(&self) -> TaskFields {
        TaskFields {
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: self.due_date,
            priority: self.priority,
            category: self.category.clone(),
        }
    }

    /// Replace the editable fields as an edit-submit does: only `id` carries
    /// over and the task is reopened.
    pub fn apply_fields(&mut self, fields: TaskFields) {
        self.title = fields.title;
        self.description = fields.description;
        self.due_date = fields.due_date;
        self.priority = fields.priority;
        self.category = fields.category;
        self.completed = false;
    }

    /// Due date formatted for display, if any.
    #[must_use]
    pub fn due_date_label(&self) -> Option<String> {
        self.due_date.map(format_due_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn sample() -> Task {
        Task::new(
            TaskFields::new("Write docs", "cover the storage layout")
                .with_priority(Priority::High)
                .with_due_date(Some(date!(2025 - 03 - 07)))
                .with_category(Some("work".into())),
        )
    }

    #[test]
    fn new_tasks_start_incomplete() {
        let task = sample();
        assert!(!task.completed);
        assert_eq!(task.priority, Priority::High);
    }

    #[test]
    fn serializes_with_camel_case_and_plain_dates() {
        let task = sample();
        let value = serde_json::to_value(&task).unwrap_or_else(|err| panic!("serialize: {err}"));
        assert_eq!(value["dueDate"], "2025-03-07");
        assert_eq!(value["priority"], "high");
        assert_eq!(value["category"], "work");
        assert_eq!(value["completed"], false);
        assert_eq!(value["id"], task.id.to_string());
    }

    #[test]
    fn optional_fields_default_when_missing() {
        let id = TaskId::new();
        let raw = format!(r#"{{"id":"{id}","title":"t","description":"d"}}"#);
        let task: Task = serde_json::from_str(&raw).unwrap_or_else(|err| panic!("deserialize: {err}"));
        assert_eq!(task.due_date, None);
        assert_eq!(task.priority, Priority::Low);
        assert_eq!(task.category, None);
        assert!(!task.completed);
    }

    #[test]
    fn apply_fields_keeps_identity_and_reopens() {
        let mut task = sample();
        task.completed = true;
        let id = task.id;
        task.apply_fields(TaskFields::new("Renamed", "new body"));
        assert_eq!(task.id, id);
        assert!(!task.completed);
        assert_eq!(task.title, "Renamed");
        assert_eq!(task.due_date, None);
    }

    #[test]
    fn blank_category_is_dropped() {
        let fields = TaskFields::new("t", "d").with_category(Some("  ".into()));
        assert_eq!(fields.category, None);
    }

    #[test]
    fn due_date_parsing_rejects_other_layouts() {
        assert_eq!(
            parse_due_date("2024-02-29").ok(),
            Some(date!(2024 - 02 - 29))
        );
        assert!(parse_due_date("2023-02-29").is_err());
        assert!(parse_due_date("02/03/2024").is_err());
        assert_eq!(format_due_date(date!(2024 - 01 - 05)), "2024-01-05");
    }
}

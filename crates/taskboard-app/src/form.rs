//! Create/edit form state and validation.

use std::fmt;

use taskboard_core::{Priority, Task, TaskFields, TaskId, parse_due_date};
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

/// Validation failures that block a submit.
#[derive(Debug, Error)]
pub enum FormError {
    /// Title is empty or whitespace.
    #[error("title is required")]
    MissingTitle,
    /// Description is empty or whitespace.
    #[error("description is required")]
    MissingDescription,
    /// Due date is not a `YYYY-MM-DD` calendar date.
    #[error("invalid due date {input:?} (expected YYYY-MM-DD)")]
    InvalidDueDate {
        /// Raw field content.
        input: String,
        /// Parser failure.
        #[source]
        source: time::error::Parse,
    },
}

impl FormError {
    /// Field the error refers to.
    #[must_use]
    pub const fn field(&self) -> FormField {
        match self {
            Self::MissingTitle => FormField::Title,
            Self::MissingDescription => FormField::Description,
            Self::InvalidDueDate { .. } => FormField::DueDate,
        }
    }
}

/// Whether the form creates a new task or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    /// A new id is minted on submit.
    Create,
    /// The id is carried over; submitting reopens the task.
    Edit {
        /// Id of the task being edited.
        id: TaskId,
    },
}

/// Input fields in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    /// Task title.
    Title,
    /// Task description.
    Description,
    /// Due date text (`YYYY-MM-DD`).
    DueDate,
    /// Priority selector.
    Priority,
    /// Category text.
    Category,
}

impl FormField {
    /// Every field in focus order.
    pub const ALL: [Self; 5] = [
        Self::Title,
        Self::Description,
        Self::DueDate,
        Self::Priority,
        Self::Category,
    ];

    /// Label shown next to the input.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Description => "Description",
            Self::DueDate => "Due date",
            Self::Priority => "Priority",
            Self::Category => "Category",
        }
    }

    /// Whether the field must be filled in.
    #[must_use]
    pub const fn is_required(self) -> bool {
        matches!(self, Self::Title | Self::Description)
    }

    const fn next(self) -> Self {
        match self {
            Self::Title => Self::Description,
            Self::Description => Self::DueDate,
            Self::DueDate => Self::Priority,
            Self::Priority => Self::Category,
            Self::Category => Self::Title,
        }
    }

    const fn prev(self) -> Self {
        match self {
            Self::Title => Self::Category,
            Self::Description => Self::Title,
            Self::DueDate => Self::Description,
            Self::Priority => Self::DueDate,
            Self::Category => Self::Priority,
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Form state. Never touches storage; [`TaskForm::submit`] hands back a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    mode: FormMode,
    title: String,
    description: String,
    due_date: String,
    priority: Priority,
    category: String,
    focus: FormField,
}

impl TaskForm {
    /// Blank form for a new task.
    #[must_use]
    pub const fn create(default_priority: Priority) -> Self {
        Self {
            mode: FormMode::Create,
            title: String::new(),
            description: String::new(),
            due_date: String::new(),
            priority: default_priority,
            category: String::new(),
            focus: FormField::Title,
        }
    }

    /// Form pre-filled from an existing task.
    #[must_use]
    pub fn edit(task: &Task) -> Self {
        Self {
            mode: FormMode::Edit { id: task.id },
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date_label().unwrap_or_default(),
            priority: task.priority,
            category: task.category.clone().unwrap_or_default(),
            focus: FormField::Title,
        }
    }

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> FormMode {
        self.mode
    }

    /// Focused field.
    #[must_use]
    pub const fn focus(&self) -> FormField {
        self.focus
    }

    /// Move focus to a specific field.
    pub const fn set_focus(&mut self, field: FormField) {
        self.focus = field;
    }

    /// Move focus forward, wrapping around.
    pub const fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    /// Move focus backward, wrapping around.
    pub const fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Selected priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Select a priority.
    pub const fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    /// Advance the priority selector.
    pub const fn cycle_priority(&mut self) {
        self.priority = self.priority.cycle();
    }

    /// Display text of a field.
    #[must_use]
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.title,
            FormField::Description => &self.description,
            FormField::DueDate => &self.due_date,
            FormField::Priority => self.priority.as_str(),
            FormField::Category => &self.category,
        }
    }

    /// Replace the content of a text field. The priority field accepts any
    /// spelling [`Priority`] parses and ignores the rest.
    pub fn set_value(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match self.text_mut(field) {
            Some(text) => *text = value,
            None => {
                if let Ok(priority) = value.parse() {
                    self.priority = priority;
                }
            }
        }
    }

    /// Type a character into the focused field. On the priority selector a
    /// space cycles the value and other characters are ignored.
    pub fn insert_char(&mut self, ch: char) {
        if ch.is_control() {
            return;
        }
        match self.text_mut(self.focus) {
            Some(text) => text.push(ch),
            None if ch == ' ' => self.cycle_priority(),
            None => {}
        }
    }

    /// Delete the last grapheme of the focused text field.
    pub fn backspace(&mut self) {
        if let Some(text) = self.text_mut(self.focus)
            && let Some((offset, _)) = text.grapheme_indices(true).next_back()
        {
            text.truncate(offset);
        }
    }

    /// Empty the focused text field.
    pub fn clear_field(&mut self) {
        if let Some(text) = self.text_mut(self.focus) {
            text.clear();
        }
    }

    const fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::DueDate => Some(&mut self.due_date),
            FormField::Category => Some(&mut self.category),
            FormField::Priority => None,
        }
    }

    /// Check required fields and parse the due date.
    ///
    /// # Errors
    /// Returns the first failing field in focus order.
    pub fn validate(&self) -> Result<TaskFields, FormError> {
        if self.title.trim().is_empty() {
            return Err(FormError::MissingTitle);
        }
        if self.description.trim().is_empty() {
            return Err(FormError::MissingDescription);
        }
        let due_date = if self.due_date.trim().is_empty() {
            None
        } else {
            Some(
                parse_due_date(&self.due_date).map_err(|source| FormError::InvalidDueDate {
                    input: self.due_date.clone(),
                    source,
                })?,
            )
        };
        let category = Some(self.category.trim().to_owned());
        Ok(TaskFields::new(self.title.trim(), self.description.trim())
            .with_due_date(due_date)
            .with_priority(self.priority)
            .with_category(category))
    }

    /// Build the complete task record: a fresh id in create mode, the original
    /// id in edit mode. Either way the record starts out not completed.
    ///
    /// # Errors
    /// Returns a [`FormError`] when validation fails; the form stays as is.
    pub fn submit(&self) -> Result<Task, FormError> {
        let fields = self.validate()?;
        Ok(match self.mode {
            FormMode::Create => Task::new(fields),
            FormMode::Edit { id } => Task::with_id(id, fields),
        })
    }
}

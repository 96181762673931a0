//! Derivation of the visible task subset from filter criteria.
//!
//! Every predicate is pure and independent, so the three criteria compose by
//! logical AND in any order. Results keep the order of the input list.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use time::Date;

use crate::priority::Priority;
use crate::task::{Task, format_due_date, parse_due_date};
use crate::text_matcher::TextMatcher;

/// Error returned when parsing filter criteria from user input.
#[derive(Debug, Error)]
pub enum FilterParseError {
    /// Priority token was not `all`, `low`, `medium` or `high`.
    #[error("invalid priority filter: {token}")]
    InvalidPriority {
        /// Offending input.
        token: String,
    },
    /// Due-date token was neither a bucket name nor a `YYYY-MM-DD` date.
    #[error("invalid due date filter: {token}: {source}")]
    InvalidDueDate {
        /// Offending input.
        token: String,
        /// Underlying date parse failure.
        #[source]
        source: time::error::Parse,
    },
}

/// Priority criterion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriorityFilter {
    /// Pass-through.
    #[default]
    All,
    /// Exact priority match.
    Only(Priority),
}

impl PriorityFilter {
    /// Whether the task passes this criterion.
    #[must_use]
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Only(priority) => task.priority == priority,
        }
    }

    /// Label used in summaries and on the filter bar.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(priority) => priority.as_str(),
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.eq_ignore_ascii_case("all") || token.is_empty() {
            return Ok(Self::All);
        }
        token
            .parse::<Priority>()
            .map(Self::Only)
            .map_err(|_| FilterParseError::InvalidPriority {
                token: s.to_owned(),
            })
    }
}

/// Due-date criterion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DueDateFilter {
    /// Pass-through.
    #[default]
    All,
    /// Due on the reference day.
    Today,
    /// Due on the day after the reference day.
    Tomorrow,
    /// Due on an exact date.
    On(Date),
}

impl DueDateFilter {
    /// Whether the task passes this criterion relative to `today`.
    ///
    /// Tasks without a due date only pass [`DueDateFilter::All`].
    #[must_use]
    pub fn matches(self, task: &Task, today: Date) -> bool {
        let target = match self {
            Self::All => return true,
            Self::Today => Some(today),
            Self::Tomorrow => today.next_day(),
            Self::On(date) => Some(date),
        };
        match (task.due_date, target) {
            (Some(due), Some(target)) => due == target,
            _ => false,
        }
    }

    /// Next bucket in the all → today → tomorrow → all cycle. An exact date returns to `All`.
    #[must_use]
    pub const fn cycle(self) -> Self {
        match self {
            Self::All => Self::Today,
            Self::Today => Self::Tomorrow,
            Self::Tomorrow | Self::On(_) => Self::All,
        }
    }
}

impl fmt::Display for DueDateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Today => f.write_str("today"),
            Self::Tomorrow => f.write_str("tomorrow"),
            Self::On(date) => f.write_str(&format_due_date(*date)),
        }
    }
}

impl FromStr for DueDateFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        match token.to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "today" => Ok(Self::Today),
            "tomorrow" => Ok(Self::Tomorrow),
            _ => parse_due_date(token)
                .map(Self::On)
                .map_err(|source| FilterParseError::InvalidDueDate {
                    token: s.to_owned(),
                    source,
                }),
        }
    }
}

/// Full set of criteria driving the visible subset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Priority criterion.
    pub priority: PriorityFilter,
    /// Due-date criterion.
    pub due: DueDateFilter,
    /// Raw search text as typed; empty means no text constraint.
    pub text: String,
}

impl TaskFilter {
    /// Filter with every criterion set to pass-through.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the priority criterion.
    #[must_use]
    pub const fn with_priority(mut self, priority: PriorityFilter) -> Self {
        self.priority = priority;
        self
    }

    /// Set the due-date criterion.
    #[must_use]
    pub const fn with_due(mut self, due: DueDateFilter) -> Self {
        self.due = due;
        self
    }

    /// Set the search text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// True when no criterion constrains the list.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.priority == PriorityFilter::All
            && self.due == DueDateFilter::All
            && self.text.is_empty()
    }

    /// Whether a single task passes every criterion.
    #[must_use]
    pub fn matches(&self, task: &Task, today: Date) -> bool {
        self.matches_with(task, today, TextMatcher::new(&self.text).as_ref())
    }

    fn matches_with(&self, task: &Task, today: Date, matcher: Option<&TextMatcher>) -> bool {
        self.priority.matches(task)
            && self.due.matches(task, today)
            && matcher.is_none_or(|matcher| matcher.matches(task))
    }

    /// Tasks passing the filter, in list order.
    #[must_use]
    pub fn apply<'a>(&self, tasks: &'a [Task], today: Date) -> Vec<&'a Task> {
        let matcher = TextMatcher::new(&self.text);
        tasks
            .iter()
            .filter(|task| self.matches_with(task, today, matcher.as_ref()))
            .collect()
    }

    /// One-line description of the active criteria.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.is_empty() {
            return "no filter".to_owned();
        }
        let mut parts = Vec::new();
        if self.priority != PriorityFilter::All {
            parts.push(format!("priority={}", self.priority.label()));
        }
        if self.due != DueDateFilter::All {
            parts.push(format!("due={}", self.due));
        }
        if !self.text.is_empty() {
            parts.push(format!("text={:?}", self.text));
        }
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskFields;
    use time::macros::date;

    const TODAY: Date = date!(2025 - 06 - 10);

    fn task(title: &str, description: &str, priority: Priority, due: Option<Date>) -> Task {
        Task::new(
            TaskFields::new(title, description)
                .with_priority(priority)
                .with_due_date(due),
        )
    }

    fn titles(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|task| task.title.clone()).collect()
    }

    fn fixture() -> Vec<Task> {
        vec![
            task("A", "d1", Priority::High, Some(TODAY)),
            task("B", "d2", Priority::Low, Some(date!(2025 - 06 - 11))),
            task("C", "release notes", Priority::High, None),
            task("D", "Draft D2 plan", Priority::Medium, Some(date!(2025 - 07 - 01))),
        ]
    }

    #[test]
    fn priority_filter_keeps_exact_matches() {
        let tasks = fixture();
        let filter = TaskFilter::new().with_priority(PriorityFilter::Only(Priority::High));
        assert_eq!(titles(&filter.apply(&tasks, TODAY)), vec!["A", "C"]);
    }

    #[test]
    fn search_matches_title_or_description_case_insensitively() {
        let tasks = fixture();
        let filter = TaskFilter::new().with_text("d2");
        assert_eq!(titles(&filter.apply(&tasks, TODAY)), vec!["B", "D"]);

        let filter = TaskFilter::new().with_text("c");
        assert_eq!(titles(&filter.apply(&tasks, TODAY)), vec!["C"]);
    }

    #[test]
    fn due_buckets_compare_against_reference_day() {
        let tasks = fixture();
        let today = TaskFilter::new().with_due(DueDateFilter::Today);
        assert_eq!(titles(&today.apply(&tasks, TODAY)), vec!["A"]);

        let tomorrow = TaskFilter::new().with_due(DueDateFilter::Tomorrow);
        assert_eq!(titles(&tomorrow.apply(&tasks, TODAY)), vec!["B"]);

        let exact = TaskFilter::new().with_due(DueDateFilter::On(date!(2025 - 07 - 01)));
        assert_eq!(titles(&exact.apply(&tasks, TODAY)), vec!["D"]);
    }

    #[test]
    fn tasks_without_due_date_only_pass_all() {
        let undated = task("x", "y", Priority::Low, None);
        assert!(DueDateFilter::All.matches(&undated, TODAY));
        assert!(!DueDateFilter::Today.matches(&undated, TODAY));
        assert!(!DueDateFilter::Tomorrow.matches(&undated, TODAY));
        assert!(!DueDateFilter::On(TODAY).matches(&undated, TODAY));
    }

    #[test]
    fn empty_text_and_defaults_match_everything() {
        let tasks = fixture();
        let filter = TaskFilter::new().with_text("");
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&tasks, TODAY).len(), tasks.len());
        assert!(!TaskFilter::new().with_text(" ").is_empty());
    }

    #[test]
    fn criteria_compose_in_any_order() {
        let tasks = fixture();
        let priority = PriorityFilter::Only(Priority::High);
        let due = DueDateFilter::Today;
        let matcher = TextMatcher::new("d1");

        type Stage<'a> = Box<dyn Fn(&Task) -> bool + 'a>;
        let stages: [Stage<'_>; 3] = [
            Box::new(|task| priority.matches(task)),
            Box::new(|task| due.matches(task, TODAY)),
            Box::new(|task| matcher.as_ref().is_none_or(|m| m.matches(task))),
        ];
        let orders = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];

        let combined = TaskFilter::new()
            .with_priority(priority)
            .with_due(due)
            .with_text("d1");
        let expected = titles(&combined.apply(&tasks, TODAY));

        for order in orders {
            let mut current: Vec<&Task> = tasks.iter().collect();
            for stage in order {
                current.retain(|task| stages[stage](*task));
            }
            assert_eq!(titles(&current), expected, "order {order:?}");
        }
    }

    #[test]
    fn parses_filter_tokens() {
        assert_eq!("ALL".parse::<PriorityFilter>().ok(), Some(PriorityFilter::All));
        assert_eq!(
            "medium".parse::<PriorityFilter>().ok(),
            Some(PriorityFilter::Only(Priority::Medium))
        );
        assert!("urgent".parse::<PriorityFilter>().is_err());

        assert_eq!("today".parse::<DueDateFilter>().ok(), Some(DueDateFilter::Today));
        assert_eq!(
            "2025-01-31".parse::<DueDateFilter>().ok(),
            Some(DueDateFilter::On(date!(2025 - 01 - 31)))
        );
        assert!(matches!(
            "someday".parse::<DueDateFilter>(),
            Err(FilterParseError::InvalidDueDate { .. })
        ));
    }

    #[test]
    fn summary_lists_active_criteria() {
        assert_eq!(TaskFilter::new().summary(), "no filter");
        let filter = TaskFilter::new()
            .with_priority(PriorityFilter::Only(Priority::Low))
            .with_due(DueDateFilter::Tomorrow)
            .with_text("plan");
        assert_eq!(filter.summary(), "priority=low due=tomorrow text=\"plan\"");
    }

    #[test]
    fn due_cycle_returns_to_all() {
        assert_eq!(DueDateFilter::All.cycle(), DueDateFilter::Today);
        assert_eq!(DueDateFilter::Today.cycle(), DueDateFilter::Tomorrow);
        assert_eq!(DueDateFilter::Tomorrow.cycle(), DueDateFilter::All);
        assert_eq!(DueDateFilter::On(TODAY).cycle(), DueDateFilter::All);
    }
}

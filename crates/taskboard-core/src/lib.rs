//! Domain types and the filter/search engine for taskboard.

/// Filter criteria and visible-subset derivation.
pub mod filter;
/// Identifier types.
pub mod id;
/// Priority and theme flags.
pub mod priority;
/// Task records.
pub mod task;
/// Case-insensitive text search.
pub mod text_matcher;

pub use filter::{DueDateFilter, FilterParseError, PriorityFilter, TaskFilter};
pub use id::TaskId;
pub use priority::{Priority, Theme, UnknownPriority};
pub use task::{DUE_DATE_FORMAT, Task, TaskFields, format_due_date, parse_due_date};
pub use text_matcher::TextMatcher;

use time::{Date, OffsetDateTime};

/// Current calendar day in the local time zone, falling back to UTC when the
/// local offset cannot be determined.
#[must_use]
pub fn today_local() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

use crate::task::Task;

/// Case-insensitive substring matcher for task text.
#[derive(Debug, Clone)]
pub struct TextMatcher {
    needle: String,
}

impl TextMatcher {
    /// Lowercase a query into a matcher. Returns `None` for an empty query;
    /// whitespace is part of the needle.
    #[must_use]
    pub fn new(query: &str) -> Option<Self> {
        if query.is_empty() {
            return None;
        }
        Some(Self {
            needle: query.to_lowercase(),
        })
    }

    /// Whether the title or the description contains the query.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.matches_field(&task.title) || self.matches_field(&task.description)
    }

    fn matches_field(&self, value: &str) -> bool {
        value.to_lowercase().contains(&self.needle)
    }
}

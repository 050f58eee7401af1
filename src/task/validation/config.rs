//! Configuration for task input validation.

/// Configurable inputs to task validation.
///
/// Length and date bounds are business rules and fixed in
/// [`rules`](super::rules); only the disallowed-word list varies between
/// deployments.
#[derive(Debug, Clone, Default)]
pub struct TaskValidationConfig {
    /// Words that may not appear in a task title, compared
    /// case-insensitively. An empty list disables the check.
    pub disallowed_title_words: Vec<String>,
}

impl TaskValidationConfig {
    /// Creates a configuration with the given disallowed title words.
    #[must_use]
    pub fn with_disallowed_words(words: impl IntoIterator<Item = String>) -> Self {
        Self {
            disallowed_title_words: words.into_iter().collect(),
        }
    }

    /// Returns the first configured word found in the title, if any.
    ///
    /// Matching is case-insensitive substring containment.
    #[must_use]
    pub fn find_disallowed_word(&self, title: &str) -> Option<&str> {
        let lowered = title.to_lowercase();
        self.disallowed_title_words
            .iter()
            .find(|word| lowered.contains(&word.to_lowercase()))
            .map(String::as_str)
    }
}

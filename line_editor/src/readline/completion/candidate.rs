// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// One completion suggestion.
///
/// `value` is what gets inserted, `display` is what the list shows. Candidates sharing
/// a `key` are merged into a single entry when listed (eg: a command and its aliases).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub value: String,
    pub display: String,
    pub group: Option<String>,
    pub description: Option<String>,
    /// Appended after `value`, and removed again if the next key typed is one of
    /// `remove_suffix_chars` (eg: the `/` after a directory name).
    pub suffix: Option<String>,
    pub key: Option<String>,
    /// When `false` the word is left open after insertion, so no separator is added.
    pub complete: bool,
}

impl Candidate {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            display: value.clone(),
            value,
            group: None,
            description: None,
            suffix: None,
            key: None,
            complete: true,
        }
    }

    #[must_use]
    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = display.into();
        self
    }

    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_complete(mut self, complete: bool) -> Self {
        self.complete = complete;
        self
    }

    /// Group name, with the empty string for ungrouped candidates.
    #[must_use]
    pub fn group_name(&self) -> &str { self.group.as_deref().unwrap_or_default() }
}

impl From<&str> for Candidate {
    fn from(value: &str) -> Self { Candidate::new(value) }
}

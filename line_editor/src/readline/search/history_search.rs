// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::History;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    Backward,
    Forward,
}

impl SearchDirection {
    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            SearchDirection::Backward => SearchDirection::Forward,
            SearchDirection::Forward => SearchDirection::Backward,
        }
    }
}

/// What a history entry has to look like to match a plain text search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery<'a> {
    pub term: &'a str,
    /// Match at the start of the entry only, instead of anywhere in it.
    pub starts_with: bool,
    pub case_insensitive: bool,
}

impl HistoryQuery<'_> {
    #[must_use]
    pub fn matches(&self, entry: &str) -> bool {
        if self.case_insensitive {
            let entry = entry.to_lowercase();
            let term = self.term.to_lowercase();
            if self.starts_with {
                entry.starts_with(&term)
            } else {
                entry.contains(&term)
            }
        } else if self.starts_with {
            entry.starts_with(self.term)
        } else {
            entry.contains(self.term)
        }
    }
}

/// Absolute index of the nearest entry matching `query`, not counting `start` itself.
#[must_use]
pub fn find_in_history(
    history: &dyn History,
    query: &HistoryQuery<'_>,
    start: usize,
    direction: SearchDirection,
) -> Option<usize> {
    let predicate = |entry: &str| query.matches(entry);
    match direction {
        SearchDirection::Backward => history.search_backward(start, &predicate),
        SearchDirection::Forward => history.search_forward(start, &predicate),
    }
}

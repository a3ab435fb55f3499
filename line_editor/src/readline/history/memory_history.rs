// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::collections::VecDeque;

use super::History;

/// Default maximum number of entries kept by [`MemoryHistory`].
pub const HISTORY_SIZE_MAX: usize = 500;

/// In memory [`History`]. Oldest entries are evicted once `max_size` is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryHistory {
    pub entries: VecDeque<String>,
    pub max_size: usize,
    /// Don't record a line that is the same as the newest entry.
    pub ignore_dups: bool,
    /// Absolute index of `entries[0]`.
    offset: usize,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self {
            entries: VecDeque::default(),
            max_size: HISTORY_SIZE_MAX,
            ignore_dups: true,
            offset: 0,
        }
    }
}

impl MemoryHistory {
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            ..Default::default()
        }
    }

    /// Convenience for tests and hosts that seed the history.
    #[must_use]
    pub fn new_with(lines: &[&str]) -> Self {
        let mut it = Self::default();
        for line in lines {
            it.add(line);
        }
        it
    }
}

impl History for MemoryHistory {
    fn first_index(&self) -> usize { self.offset }

    fn len(&self) -> usize { self.entries.len() }

    fn get(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(self.offset)
            .and_then(|it| self.entries.get(it))
            .map(String::as_str)
    }

    fn add(&mut self, line: &str) {
        // Don't add entry if last entry was same, or line was empty.
        if line.is_empty()
            || (self.ignore_dups && self.entries.back().is_some_and(|it| it == line))
        {
            return;
        }
        self.entries.push_back(line.to_string());

        while self.entries.len() > self.max_size.max(1) {
            self.entries.pop_front();
            self.offset += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add() {
        let mut history = MemoryHistory::new(2);
        history.add("test1");
        assert_eq!(history.last(), Some("test1"));

        history.add("");
        history.add("test1");
        assert_eq!(history.len(), 1);

        history.add("test2");
        history.add("test3");
        assert_eq!(history.len(), 2);
        assert_eq!(history.first_index(), 1);
        assert_eq!(history.end_index(), 3);
        assert_eq!(history.get(0), None);
        assert_eq!(history.get(1), Some("test2"));
        assert_eq!(history.get(2), Some("test3"));
    }

    #[test]
    fn test_dups_kept_when_asked() {
        let mut history = MemoryHistory::default();
        history.ignore_dups = false;
        history.add("same");
        history.add("same");
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_search_backward_and_forward() {
        let history = MemoryHistory::new_with(&["cargo build", "ls", "cargo test", "pwd"]);
        let is_cargo = |it: &str| it.starts_with("cargo");
        assert_eq!(history.search_backward(history.end_index(), &is_cargo), Some(2));
        assert_eq!(history.search_backward(2, &is_cargo), Some(0));
        assert_eq!(history.search_backward(0, &is_cargo), None);
        assert_eq!(history.search_forward(0, &is_cargo), Some(2));
        assert_eq!(history.search_forward(2, &is_cargo), None);
    }
}

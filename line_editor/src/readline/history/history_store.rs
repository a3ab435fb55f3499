// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Append-only log of accepted lines, addressed by absolute index.
///
/// Indices keep counting up when old entries are evicted, so `!42` keeps meaning the
/// same line for as long as it is kept. The valid range is
/// `[first_index(), end_index())`. Persisting the log is up to the implementation.
pub trait History: Send {
    /// Absolute index of the oldest entry still kept.
    fn first_index(&self) -> usize;

    /// Number of entries kept.
    fn len(&self) -> usize;

    /// Entry at absolute `index`, [`None`] if it was evicted or does not exist yet.
    fn get(&self, index: usize) -> Option<&str>;

    /// Record an accepted line.
    fn add(&mut self, line: &str);

    fn is_empty(&self) -> bool { self.len() == 0 }

    /// One past the newest entry. This is where the line being edited lives while the
    /// user walks through the history.
    fn end_index(&self) -> usize { self.first_index() + self.len() }

    /// Newest entry.
    fn last(&self) -> Option<&str> {
        self.end_index().checked_sub(1).and_then(|it| self.get(it))
    }

    /// Walk backward from `start` (exclusive) and return the index of the first entry
    /// accepted by `predicate`.
    fn search_backward(&self, start: usize, predicate: &dyn Fn(&str) -> bool) -> Option<usize> {
        let start = start.min(self.end_index());
        (self.first_index()..start)
            .rev()
            .find(|it| self.get(*it).is_some_and(predicate))
    }

    /// Walk forward from `start` (exclusive) and return the index of the first entry
    /// accepted by `predicate`.
    fn search_forward(&self, start: usize, predicate: &dyn Fn(&str) -> bool) -> Option<usize> {
        let from = (start + 1).max(self.first_index());
        (from..self.end_index()).find(|it| self.get(*it).is_some_and(predicate))
    }
}

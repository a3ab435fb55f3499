// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use regex::{Regex, RegexBuilder};

use super::SearchDirection;
use crate::{History, TextBuffer};

/// Compile the search term typed so far. Lower case chars match either case, any other
/// char only matches itself, so typing a capital letter pins the case of that letter.
///
/// # Errors
///
/// Only if the compiled pattern exceeds the regex size limit.
pub fn search_pattern(term: &str, case_insensitive: bool) -> Result<Regex, regex::Error> {
    let mut acc = String::with_capacity(term.len() * 4);
    for ch in term.chars() {
        if ch.is_lowercase() {
            acc.push('[');
            acc.extend(ch.to_lowercase());
            acc.extend(ch.to_uppercase());
            acc.push(']');
        } else {
            acc.push_str(&regex::escape(ch.encode_utf8(&mut [0; 4])));
        }
    }
    RegexBuilder::new(&acc)
        .case_insensitive(case_insensitive)
        .build()
}

/// Char offsets of every match of `pattern` in `line`.
fn match_offsets(pattern: &Regex, line: &str) -> Vec<usize> {
    pattern
        .find_iter(line)
        .map(|it| line[..it.start()].chars().count())
        .collect()
}

/// State of one `bck-i-search` / `fwd-i-search` session.
///
/// The buffer shows the line the current match is in, with the cursor on the match.
/// The line can be the buffer as it was when the search started (`history_index` is
/// [`None`]) or a history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncrementalSearch {
    pub term: String,
    pub direction: SearchDirection,
    /// No match for the current term. The term is kept so the user can backspace.
    pub failing: bool,
    pub history_index: Option<usize>,
    /// Buffer before the search started, restored on abort.
    pub original: TextBuffer,
}

impl IncrementalSearch {
    #[must_use]
    pub fn new(direction: SearchDirection, original: TextBuffer) -> Self {
        Self {
            term: String::new(),
            direction,
            failing: false,
            history_index: None,
            original,
        }
    }

    /// Status line shown below the prompt while searching.
    #[must_use]
    pub fn prompt(&self) -> String {
        format!(
            "{}{}: {}_",
            if self.failing { "failing " } else { "" },
            match self.direction {
                SearchDirection::Backward => "bck-i-search",
                SearchDirection::Forward => "fwd-i-search",
            },
            self.term
        )
    }

    pub fn push_str(&mut self, text: &str) { self.term.push_str(text); }

    pub fn pop_char(&mut self) { self.term.pop(); }

    /// Look for the term again after it changed, or for the next match in
    /// `self.direction` when `next` is set. Updates `buf` on success and `failing`
    /// either way. Returns `false` when nothing matched.
    pub fn search(
        &mut self,
        buf: &mut TextBuffer,
        history: &dyn History,
        next: bool,
        case_insensitive: bool,
    ) -> bool {
        if self.term.is_empty() {
            buf.copy_from(&self.original);
            self.history_index = None;
            self.failing = false;
            return true;
        }
        let Ok(pattern) = search_pattern(&self.term, case_insensitive) else {
            self.failing = true;
            return false;
        };

        let cursor = buf.cursor();
        let in_buffer = match_offsets(&pattern, &buf.to_string()).into_iter();
        let found = match self.direction {
            SearchDirection::Backward => in_buffer
                .filter(|it| if next { *it < cursor } else { *it <= cursor })
                .max()
                .map(|offset| (self.history_index, offset))
                .or_else(|| self.search_history_backward(&pattern, history)),
            SearchDirection::Forward => {
                let offset = in_buffer
                    .filter(|it| if next { *it > cursor } else { *it >= cursor })
                    .min();
                offset
                    .map(|offset| (self.history_index, offset))
                    .or_else(|| self.search_history_forward(&pattern, history))
            }
        };

        match found {
            Some((history_index, offset)) => {
                self.history_index = history_index;
                let line = match history_index.and_then(|it| history.get(it)) {
                    Some(entry) => entry.to_owned(),
                    None => self.original.to_string(),
                };
                buf.set_text(&line);
                buf.set_cursor(offset);
                self.failing = false;
                true
            }
            None => {
                self.failing = true;
                false
            }
        }
    }

    fn search_history_backward(
        &self,
        pattern: &Regex,
        history: &dyn History,
    ) -> Option<(Option<usize>, usize)> {
        let start = self.history_index.unwrap_or(history.end_index());
        (history.first_index()..start).rev().find_map(|index| {
            let entry = history.get(index)?;
            let offset = *match_offsets(pattern, entry).first()?;
            Some((Some(index), offset))
        })
    }

    fn search_history_forward(
        &self,
        pattern: &Regex,
        history: &dyn History,
    ) -> Option<(Option<usize>, usize)> {
        // Searching forward from the original buffer has nowhere to go.
        let start = self.history_index? + 1;
        (start..history.end_index())
            .find_map(|index| {
                let entry = history.get(index)?;
                let offset = *match_offsets(pattern, entry).first()?;
                Some((Some(index), offset))
            })
            .or_else(|| {
                let offset = *match_offsets(pattern, &self.original.to_string()).first()?;
                Some((None, offset))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryHistory;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("git", "GIT log", true ; "lower case matches any case")]
    #[test_case("Git", "git log", false ; "upper case is literal")]
    #[test_case("a.b", "axb", false ; "regex chars are literal")]
    #[test_case("a.b", "A.B", true ; "lower case around a literal dot")]
    fn test_search_pattern(term: &str, line: &str, expected: bool) {
        let Ok(pattern) = search_pattern(term, false) else {
            panic!("bad pattern for {term}");
        };
        assert_eq!(pattern.is_match(line), expected);
    }

    #[test]
    fn test_backward_search_walks_history() {
        let history = MemoryHistory::new_with(&["cargo build", "ls -la", "cargo test"]);
        let mut buf = TextBuffer::new();
        let mut search = IncrementalSearch::new(SearchDirection::Backward, buf.copy());

        search.push_str("car");
        assert!(search.search(&mut buf, &history, false, false));
        assert_eq!(buf.to_string(), "cargo test");
        assert_eq!(buf.cursor(), 0);
        assert_eq!(search.history_index, Some(2));

        // Ctrl-R again: next older match.
        assert!(search.search(&mut buf, &history, true, false));
        assert_eq!(buf.to_string(), "cargo build");
        assert_eq!(search.history_index, Some(0));

        assert!(!search.search(&mut buf, &history, true, false));
        assert!(search.failing);
        assert_eq!(search.prompt(), "failing bck-i-search: car_");
        assert_eq!(buf.to_string(), "cargo build", "buffer kept on failure");
    }

    #[test]
    fn test_backspace_to_empty_restores_original() {
        let history = MemoryHistory::new_with(&["echo hello"]);
        let mut buf = TextBuffer::new_with("draft");
        let mut search = IncrementalSearch::new(SearchDirection::Backward, buf.copy());

        search.push_str("h");
        assert!(search.search(&mut buf, &history, false, false));
        assert_eq!(buf.to_string(), "echo hello");
        assert_eq!(buf.cursor(), 2);

        search.pop_char();
        assert!(search.search(&mut buf, &history, false, false));
        assert_eq!(buf, search.original);
    }

    #[test]
    fn test_forward_search_returns_to_original() {
        let history = MemoryHistory::new_with(&["make all", "make test"]);
        let mut buf = TextBuffer::new_with("make");
        let mut search = IncrementalSearch::new(SearchDirection::Backward, buf.copy());

        search.push_str("make");
        // The buffer itself matches first.
        assert!(search.search(&mut buf, &history, false, false));
        assert_eq!(search.history_index, None);
        assert!(search.search(&mut buf, &history, true, false));
        assert_eq!(search.history_index, Some(1));
        assert!(search.search(&mut buf, &history, true, false));
        assert_eq!(search.history_index, Some(0));

        search.direction = SearchDirection::Forward;
        assert!(search.search(&mut buf, &history, true, false));
        assert_eq!(search.history_index, Some(1));
        assert!(search.search(&mut buf, &history, true, false));
        assert_eq!(search.history_index, None);
        assert_eq!(buf.to_string(), "make");
    }
}

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Accepting the line and moving through history.
//!
//! The entry being edited is `history_index`, with [`History::end_index`] standing for
//! the new line. Edits made to an entry are kept in `modified_history` until the read
//! ends, so walking away from a line and back again finds it as it was left.

use super::{LineReader, ReaderState};
use crate::{History, HistoryQuery, IncrementalSearch, MAIN, ParseContext, ParseError,
            ReaderOption, SearchDirection, VI_COMMAND, WidgetName, expand_history,
            find_in_history, search_terminators_key_map};

impl LineReader {
    /// Accept the line, unless history expansion fails, `history-verify` wants the
    /// expanded line shown first, or the parser says the line goes on. In the last case
    /// a continuation line is opened instead.
    pub(super) fn accept_line(&mut self) -> bool {
        if !self.options.is_set(ReaderOption::DisableEventExpansion) {
            let line = self.buf.to_string();
            match expand_history(self.history.as_ref(), &line) {
                Ok(expanded) if expanded != line => {
                    self.buf.set_text(&expanded);
                    if self.options.is_set(ReaderOption::HistoryVerify) {
                        return true;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    self.report_expansion_error(&error);
                    return false;
                }
            }
        }

        let line = self.buf.to_string();
        match self.parser.parse(&line, self.buf.cursor(), ParseContext::AcceptLine) {
            Ok(_) => {}
            Err(ParseError::Incomplete {
                open_brackets,
                next_closing,
                ..
            }) => {
                self.open_continuation_line(open_brackets, next_closing);
                return true;
            }
            Err(error @ ParseError::Syntax { .. }) => {
                tracing::debug!(message = "Accepting line with syntax error", error = %error);
            }
        }

        self.state = ReaderState::Done;
        true
    }

    /// Insert a newline indented for the open brackets. With `insert-bracket`, the
    /// closer of the innermost bracket goes on a line of its own below the cursor.
    fn open_continuation_line(&mut self, open_brackets: usize, next_closing: Option<char>) {
        let indent = |depth: usize| " ".repeat(depth * self.variables.indentation);
        let mut text = format!("\n{}", indent(open_brackets));
        let cursor_offset = text.chars().count();
        if self.options.is_set(ReaderOption::InsertBracket) && open_brackets > 1 {
            if let Some(closer) = next_closing {
                text.push('\n');
                text.push_str(&indent(open_brackets - 1));
                text.push(closer);
            }
        }
        let len = text.chars().count();
        self.buf.write(&text);
        self.buf.move_by(-isize::try_from(len - cursor_offset).unwrap_or(0));
    }

    /// Accept the line and start the next read with the same text.
    pub(super) fn accept_and_hold(&mut self) -> bool {
        self.next_buffer = Some(self.buf.to_string());
        let accepted = self.accept_line();
        if self.state != ReaderState::Done {
            self.next_buffer = None;
        }
        accepted
    }

    /// Accept the line and start the next read with the history entry after it.
    pub(super) fn accept_line_and_down_history(&mut self) -> bool {
        let next = self.history_index + 1;
        self.next_history_id = (next < self.history.end_index()).then_some(next);
        self.accept_line()
    }

    /// Accept the line and start the next read with the entry that followed the most
    /// recent entry equal to it.
    pub(super) fn accept_and_infer_next_history(&mut self) -> bool {
        self.next_history_id = self.inferred_next_entry();
        self.accept_line()
    }

    /// Load the entry that followed the most recent entry equal to the buffer.
    pub(super) fn infer_next_history(&mut self) -> bool {
        match self.inferred_next_entry() {
            Some(index) => self.go_to_history(index),
            None => false,
        }
    }

    fn inferred_next_entry(&self) -> Option<usize> {
        let line = self.buf.to_string();
        let found = self
            .history
            .search_backward(self.history.end_index(), &|entry| entry == line)?;
        let next = found + 1;
        (next < self.history.end_index()).then_some(next)
    }

    /// Switch the buffer to entry `index`, keeping the edits of the entry left behind.
    pub(super) fn go_to_history(&mut self, index: usize) -> bool {
        if index < self.history.first_index() || index > self.history.end_index() {
            return false;
        }
        if index == self.history_index {
            return true;
        }
        self.modified_history
            .insert(self.history_index, self.buf.to_string());
        let text = match self.modified_history.get(&index) {
            Some(edited) => edited.clone(),
            None => self.history.get(index).unwrap_or_default().to_owned(),
        };
        self.history_index = index;
        self.set_buffer(&text);
        true
    }

    fn move_history(&mut self, next: bool) -> bool {
        let target = if next {
            Some(self.history_index + 1)
        } else {
            self.history_index.checked_sub(1)
        };
        target.is_some_and(|it| self.go_to_history(it))
    }

    /// Running off either end fails quietly unless `history-beep` is set.
    pub(super) fn up_history(&mut self) -> bool {
        if self.count < 0 {
            return self.call_neg(Self::down_history);
        }
        for _ in 0..self.count {
            if !self.move_history(false) {
                return !self.options.is_set(ReaderOption::HistoryBeep);
            }
        }
        true
    }

    pub(super) fn down_history(&mut self) -> bool {
        if self.count < 0 {
            return self.call_neg(Self::up_history);
        }
        for _ in 0..self.count {
            if !self.move_history(true) {
                return !self.options.is_set(ReaderOption::HistoryBeep);
            }
        }
        true
    }

    pub(super) fn beginning_of_history(&mut self) -> bool {
        self.go_to_history(self.history.first_index())
    }

    /// Back to the line being edited.
    pub(super) fn end_of_history(&mut self) -> bool {
        self.go_to_history(self.history.end_index())
    }

    pub(super) fn beginning_of_buffer_or_history(&mut self) -> bool {
        if self.buf.beginning_of_line(self.buf.cursor()) != 0 {
            self.buf.set_cursor(0);
            return true;
        }
        self.beginning_of_history()
    }

    pub(super) fn end_of_buffer_or_history(&mut self) -> bool {
        if self.buf.end_of_line(self.buf.cursor()) != self.buf.len() {
            self.buf.set_cursor(self.buf.len());
            return true;
        }
        self.end_of_history()
    }

    /// To the start of the line, or of the previous entry when already there.
    pub(super) fn beginning_of_line_hist(&mut self) -> bool {
        if self.count < 0 {
            return self.call_neg(Self::end_of_line_hist);
        }
        for _ in 0..self.count {
            let bol = self.buf.beginning_of_line(self.buf.cursor());
            if bol == self.buf.cursor() {
                self.move_history(false);
                self.buf.set_cursor(0);
            } else {
                self.buf.set_cursor(bol);
            }
        }
        true
    }

    pub(super) fn end_of_line_hist(&mut self) -> bool {
        if self.count < 0 {
            return self.call_neg(Self::beginning_of_line_hist);
        }
        for _ in 0..self.count {
            let eol = self.buf.end_of_line(self.buf.cursor());
            if eol == self.buf.cursor() {
                self.move_history(true);
            } else {
                self.buf.set_cursor(eol);
            }
        }
        true
    }

    pub(super) fn up_line_or_history(&mut self) -> bool {
        self.up_line() || self.up_history()
    }

    pub(super) fn down_line_or_history(&mut self) -> bool {
        self.down_line() || self.down_history()
    }

    pub(super) fn vi_up_line_or_history(&mut self) -> bool {
        self.up_line() || (self.up_history() && self.vi_first_non_blank())
    }

    pub(super) fn vi_down_line_or_history(&mut self) -> bool {
        self.down_line() || (self.down_history() && self.vi_first_non_blank())
    }

    pub(super) fn up_line_or_search(&mut self) -> bool {
        self.up_line() || self.history_search_backward()
    }

    pub(super) fn down_line_or_search(&mut self) -> bool {
        self.down_line() || self.history_search_forward()
    }

    pub(super) fn history_search_backward(&mut self) -> bool {
        if self.count < 0 {
            return self.call_neg(Self::history_search_forward);
        }
        self.history_search(SearchDirection::Backward)
    }

    pub(super) fn history_search_forward(&mut self) -> bool {
        if self.count < 0 {
            return self.call_neg(Self::history_search_backward);
        }
        self.history_search(SearchDirection::Forward)
    }

    /// Entries starting with the first word of the line as it was when the search
    /// started. Searching forward past the newest match brings that line back.
    fn history_search(&mut self, direction: SearchDirection) -> bool {
        let current = self.buf.to_string();
        let on_entry = self.history.get(self.history_index) == Some(current.as_str());
        if self.history_buffer.is_none() || !on_entry {
            self.history_buffer = Some(self.buf.copy());
            self.search_buffer = first_word(&current).to_owned();
        }
        let case_insensitive = self.options.is_set(ReaderOption::CaseInsensitiveSearch);

        for _ in 0..self.count {
            let shown = self.buf.to_string();
            let query = HistoryQuery {
                term: &self.search_buffer,
                starts_with: true,
                case_insensitive,
            };
            let predicate = |entry: &str| entry != shown && query.matches(entry);
            let found = match direction {
                SearchDirection::Backward => {
                    self.history.search_backward(self.history_index, &predicate)
                }
                SearchDirection::Forward => {
                    self.history.search_forward(self.history_index, &predicate)
                }
            };
            match (found, direction) {
                (Some(index), _) => {
                    let entry = self.history.get(index).unwrap_or_default().to_owned();
                    self.modified_history.insert(self.history_index, shown);
                    self.history_index = index;
                    self.set_buffer(&entry);
                }
                (None, SearchDirection::Forward) => {
                    let Some(original) = self.history_buffer.take() else {
                        return false;
                    };
                    self.history_index = self.history.end_index();
                    self.buf.copy_from(&original);
                    return true;
                }
                (None, SearchDirection::Backward) => return false,
            }
        }
        true
    }

    pub(super) fn history_incremental_search_backward(&mut self) -> bool {
        self.do_search_history(SearchDirection::Backward)
    }

    pub(super) fn history_incremental_search_forward(&mut self) -> bool {
        self.do_search_history(SearchDirection::Forward)
    }

    /// Search as the user types. The search terminators end the search and are
    /// consumed; any other key that is not a search key ends it and then runs as usual.
    /// Send-break puts the buffer back.
    fn do_search_history(&mut self, direction: SearchDirection) -> bool {
        let terminators = search_terminators_key_map(&self.variables.search_terminators);
        let case_insensitive = self.options.is_set(ReaderOption::CaseInsensitiveSearch);
        let mut search = IncrementalSearch::new(direction, self.buf.copy());

        loop {
            self.post = Some(search.prompt());
            self.redisplay();
            let Some(binding) = self.read_binding_local(&terminators) else {
                self.buf.copy_from(&search.original);
                self.post = None;
                return true;
            };
            let found = match binding.builtin() {
                Some(WidgetName::SendBreak) => {
                    self.buf.copy_from(&search.original);
                    self.post = None;
                    return true;
                }
                Some(
                    widget @ (WidgetName::HistoryIncrementalSearchBackward
                    | WidgetName::HistoryIncrementalSearchForward),
                ) => {
                    search.direction = if widget == WidgetName::HistoryIncrementalSearchBackward
                    {
                        SearchDirection::Backward
                    } else {
                        SearchDirection::Forward
                    };
                    if search.term.is_empty() {
                        search.push_str(&self.previous_search_term);
                    }
                    search.search(&mut self.buf, self.history.as_ref(), true, case_insensitive)
                }
                Some(WidgetName::BackwardDeleteChar | WidgetName::ViBackwardDeleteChar) => {
                    search.pop_char();
                    search.search(&mut self.buf, self.history.as_ref(), false, case_insensitive)
                }
                Some(WidgetName::SelfInsert) => {
                    let typed = self.last_binding().to_owned();
                    search.push_str(&typed);
                    search.search(&mut self.buf, self.history.as_ref(), false, case_insensitive)
                }
                _ => {
                    if let Some(index) = search.history_index {
                        self.modified_history
                            .insert(self.history_index, search.original.to_string());
                        self.history_index = index;
                    }
                    if !search.term.is_empty() {
                        self.previous_search_term = search.term.clone();
                    }
                    self.post = None;
                    if terminators.get(self.last_binding()).is_none() {
                        self.reader.push_back_binding();
                    }
                    return true;
                }
            };
            if !found {
                self.beep();
            }
        }
    }

    /// Read the term of a vi history search below the line. [`None`] when the user
    /// backed out.
    fn read_vi_search_term(&mut self) -> Option<String> {
        let prefix = if self.search_backward { '/' } else { '?' };
        let mut term = String::new();
        loop {
            self.post = Some(format!("{prefix}{term}_"));
            self.redisplay();
            let binding = self.read_binding_in(MAIN)?;
            match binding.builtin() {
                Some(WidgetName::SendBreak) => {
                    self.post = None;
                    return None;
                }
                Some(WidgetName::AcceptLine | WidgetName::ViCmdMode) => {
                    self.post = None;
                    return Some(term);
                }
                Some(WidgetName::SelfInsert) => term.push_str(self.reader.last_binding()),
                Some(WidgetName::MagicSpace) => term.push(' '),
                Some(WidgetName::BackwardDeleteChar | WidgetName::ViBackwardDeleteChar) => {
                    if term.pop().is_none() {
                        self.post = None;
                        return None;
                    }
                }
                Some(WidgetName::BackwardKillLine | WidgetName::KillWholeLine) => term.clear(),
                Some(WidgetName::Redisplay | WidgetName::ClearScreen) => {}
                _ => {
                    self.post = None;
                    self.reader.push_back_binding();
                    return None;
                }
            }
        }
    }

    /// `/`: search older entries for a typed term. An empty term repeats the last one.
    pub(super) fn vi_history_search_backward(&mut self) -> bool {
        self.start_vi_search(true)
    }

    /// `?`: search newer entries.
    pub(super) fn vi_history_search_forward(&mut self) -> bool { self.start_vi_search(false) }

    fn start_vi_search(&mut self, backward: bool) -> bool {
        self.search_backward = backward;
        let Some(term) = self.read_vi_search_term() else {
            return false;
        };
        if !term.is_empty() {
            self.search_term = Some(term);
        }
        self.vi_repeat_search()
    }

    pub(super) fn vi_repeat_search(&mut self) -> bool {
        let Some(term) = self.search_term.clone() else {
            return false;
        };
        let query = HistoryQuery {
            term: &term,
            starts_with: false,
            case_insensitive: self.options.is_set(ReaderOption::CaseInsensitiveSearch),
        };
        let direction = if self.search_backward {
            SearchDirection::Backward
        } else {
            SearchDirection::Forward
        };
        let Some(index) = find_in_history(self.history.as_ref(), &query, self.history_index, direction)
        else {
            return false;
        };
        self.go_to_history(index);
        if self.key_map == VI_COMMAND {
            self.buf.move_by(-1);
        }
        true
    }

    pub(super) fn vi_rev_repeat_search(&mut self) -> bool {
        self.search_backward = !self.search_backward;
        let found = self.vi_repeat_search();
        self.search_backward = !self.search_backward;
        found
    }

    /// `G`: the entry numbered by the argument, or the line being edited without one.
    pub(super) fn vi_fetch_history(&mut self) -> bool {
        let target = if self.repeat_count == 0 {
            self.history.end_index()
        } else {
            match usize::try_from(self.count) {
                Ok(it) => it,
                Err(_) => return false,
            }
        };
        self.go_to_history(target) && self.vi_first_non_blank()
    }

    /// Insert the last word of the previous entry, or the `count`-th word from its end.
    pub(super) fn insert_last_word(&mut self) -> bool {
        let Some(previous) = self
            .history_index
            .checked_sub(1)
            .and_then(|it| self.history.get(it))
            .map(str::to_owned)
        else {
            return false;
        };
        let Ok(parsed) =
            self.parser
                .parse(&previous, previous.chars().count(), ParseContext::SplitLine)
        else {
            return false;
        };
        let Ok(from_end) = usize::try_from(self.count) else {
            return false;
        };
        let Some(word) = from_end
            .checked_sub(1)
            .and_then(|it| parsed.words.iter().rev().nth(it))
        else {
            return false;
        };
        let word = word.clone();
        self.put_string(&word);
        true
    }
}

fn first_word(line: &str) -> &str {
    line.split(char::is_whitespace).next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryHistory, RecordingRenderer, ScriptedKeySource, TextBuffer};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn reader_with(history: &[&str], text: &str, keys: &str) -> LineReader {
        let mut it = LineReader::new(
            Box::new(ScriptedKeySource::from_keys(keys)),
            Box::new(RecordingRenderer::new()),
        )
        .with_history(MemoryHistory::new_with(history));
        it.buf = TextBuffer::new_with(text);
        it.history_index = it.history.end_index();
        it
    }

    #[test]
    fn test_accept_line_expands_history() {
        let mut it = reader_with(&["ls -la"], "!! /tmp", "");
        assert!(it.accept_line());
        assert_eq!(it.buf.to_string(), "ls -la /tmp");
        assert_eq!(it.state, ReaderState::Done);
    }

    #[test]
    fn test_history_verify_shows_expansion_first() {
        let mut it = reader_with(&["ls"], "!!", "");
        it.options.set(ReaderOption::HistoryVerify, true);
        assert!(it.accept_line());
        assert_eq!(it.buf.to_string(), "ls");
        assert_eq!(it.state, ReaderState::Normal);
        assert!(it.accept_line());
        assert_eq!(it.state, ReaderState::Done);
    }

    #[test]
    fn test_event_not_found_keeps_editing() {
        let mut it = reader_with(&["ls"], "!nope", "");
        assert!(!it.accept_line());
        assert_eq!(it.state, ReaderState::Normal);
        assert_eq!(it.post.as_deref(), Some("!nope: event not found"));
    }

    #[test_case("echo 'abc", "echo 'abc\n" ; "open quote")]
    #[test_case("echo (a", "echo (a\n" ; "open bracket")]
    fn test_incomplete_line_continues(text: &str, expected: &str) {
        let mut it = reader_with(&[], text, "");
        assert!(it.accept_line());
        assert_eq!(it.buf.to_string(), expected);
        assert_eq!(it.state, ReaderState::Normal);
    }

    #[test]
    fn test_continuation_with_indentation_and_closing_bracket() {
        let mut it = reader_with(&[], "f([", "");
        it.variables.indentation = 2;
        it.options.set(ReaderOption::InsertBracket, true);
        assert!(it.accept_line());
        assert_eq!(it.buf.to_string(), "f([\n    \n  ]");
        assert_eq!(it.buf.cursor(), 8);
    }

    #[test]
    fn test_stray_closer_is_accepted() {
        let mut it = reader_with(&[], "a)", "");
        assert!(it.accept_line());
        assert_eq!(it.state, ReaderState::Done);
    }

    #[test]
    fn test_walking_history_keeps_edits() {
        let mut it = reader_with(&["one", "two"], "draft", "");
        assert!(it.up_history());
        assert_eq!(it.buf.to_string(), "two");
        it.buf.write("!");
        assert!(it.up_history());
        assert_eq!(it.buf.to_string(), "one");
        assert!(!it.up_history());
        assert_eq!(it.buf.to_string(), "one");

        it.options.set(ReaderOption::HistoryBeep, false);
        assert!(it.up_history());
        assert!(it.down_history());
        assert_eq!(it.buf.to_string(), "two!");
        assert!(it.end_of_history());
        assert_eq!(it.buf.to_string(), "draft");
    }

    #[test]
    fn test_history_search_by_first_word() {
        let mut it = reader_with(&["git log", "ls", "git status"], "git", "");
        assert!(it.history_search_backward());
        assert_eq!(it.buf.to_string(), "git status");
        assert!(it.history_search_backward());
        assert_eq!(it.buf.to_string(), "git log");
        assert!(!it.history_search_backward());
        assert!(it.history_search_forward());
        assert_eq!(it.buf.to_string(), "git status");
        assert!(it.history_search_forward());
        assert_eq!(it.buf.to_string(), "git");
    }

    #[test]
    fn test_incremental_search_accepts_on_terminator() {
        let mut it = reader_with(&["cargo build", "ls"], "", "car\n");
        assert!(it.history_incremental_search_backward());
        assert_eq!(it.buf.to_string(), "cargo build");
        assert_eq!(it.history_index, 0);
        assert_eq!(it.post, None);
        assert_eq!(it.previous_search_term, "car");
    }

    #[test]
    fn test_incremental_search_send_break_restores() {
        let mut it = reader_with(&["cargo build"], "typed", "c\x07");
        assert!(it.history_incremental_search_backward());
        assert_eq!(it.buf.to_string(), "typed");
    }

    #[test]
    fn test_incremental_search_pushes_back_other_keys() {
        let mut it = reader_with(&["cargo build"], "", "ca\x01");
        assert!(it.history_incremental_search_backward());
        assert_eq!(it.buf.to_string(), "cargo build");
        assert_eq!(it.reader.read_character().ok(), Some(crate::KeyInput::Char('\x01')));
    }

    #[test]
    fn test_vi_search_and_repeat() {
        let mut it = reader_with(&["make test", "ls", "make run"], "", "make\r");
        it.key_map = VI_COMMAND.into();
        assert!(it.vi_history_search_backward());
        assert_eq!(it.buf.to_string(), "make run");
        assert!(it.vi_repeat_search());
        assert_eq!(it.buf.to_string(), "make test");
        assert!(!it.vi_repeat_search());
        assert!(it.vi_rev_repeat_search());
        assert_eq!(it.buf.to_string(), "make run");
    }

    #[test]
    fn test_infer_next_and_insert_last_word() {
        let mut it = reader_with(&["cd src", "ls -l 'a b'", "cd src", "make"], "cd src", "");
        assert!(it.infer_next_history());
        assert_eq!(it.buf.to_string(), "make");

        let mut it = reader_with(&["ls -l 'a b'"], "echo ", "");
        assert!(it.insert_last_word());
        assert_eq!(it.buf.to_string(), "echo 'a b'");
        it.count = 2;
        assert!(it.insert_last_word());
        assert_eq!(it.buf.to_string(), "echo 'a b'-l");
    }

    #[test]
    fn test_vi_fetch_history() {
        let mut it = reader_with(&["one", "two"], "new", "");
        it.repeat_count = 1;
        it.count = 1;
        assert!(it.vi_fetch_history());
        assert_eq!(it.buf.to_string(), "two");
        it.repeat_count = 0;
        assert!(it.vi_fetch_history());
        assert_eq!(it.buf.to_string(), "new");
    }
}

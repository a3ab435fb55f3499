// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{LineReader, RegionType, motion_widgets::bracket_type};
use crate::{ExpansionError, ReaderOption, VI_INSERT, expand_history};

const COMMENT_BEGIN: &str = "#";

impl LineReader {
    pub(super) fn self_insert(&mut self) -> bool {
        let keys = self.last_binding().to_owned();
        for _ in 0..self.count.max(0) {
            self.put_string(&keys);
        }
        true
    }

    /// Insert the key that followed an ESC, so that eg: `ESC RET` inserts a newline.
    pub(super) fn self_insert_unmeta(&mut self) -> bool {
        let Some(rest) = self.last_binding().strip_prefix('\x1b') else {
            return false;
        };
        let text = if rest == "\r" { "\n".to_owned() } else { rest.to_owned() };
        for _ in 0..self.count.max(0) {
            self.put_string(&text);
        }
        true
    }

    pub(super) fn quoted_insert(&mut self) -> bool {
        let Some(ch) = self.read_character() else {
            return false;
        };
        let text = ch.to_string();
        for _ in 0..self.count.max(0) {
            self.put_string(&text);
        }
        true
    }

    pub(super) fn overwrite_mode(&mut self) -> bool {
        self.overtyping = !self.overtyping;
        true
    }

    pub(super) fn delete_char(&mut self) -> bool {
        if self.count < 0 {
            return self.call_neg(Self::backward_delete_char);
        }
        if self.buf.cursor() == self.buf.len() {
            return false;
        }
        self.buf.delete(self.count.unsigned_abs());
        true
    }

    pub(super) fn backward_delete_char(&mut self) -> bool {
        if self.count < 0 {
            return self.call_neg(Self::delete_char);
        }
        if self.buf.cursor() == 0 {
            return false;
        }
        self.buf.backspace(self.count.unsigned_abs());
        true
    }

    /// Swap the char before the cursor with the one under it, without crossing a line
    /// break, and move past both.
    pub(super) fn transpose_chars(&mut self) -> bool {
        let line_start = self.buf.beginning_of_line(self.buf.cursor());
        let line_end = self.buf.end_of_line(self.buf.cursor());
        if line_end - line_start < 2 {
            return false;
        }
        let negative = self.count < 0;
        for _ in 0..self.count.unsigned_abs() {
            while self.buf.cursor() <= line_start {
                self.buf.move_by(1);
            }
            while self.buf.cursor() >= line_end {
                self.buf.move_by(-1);
            }
            let (Some(curr), Some(prev)) = (self.buf.curr_char(), self.buf.prev_char()) else {
                return false;
            };
            self.buf.set_curr_char(prev);
            self.buf.move_by(-1);
            self.buf.set_curr_char(curr);
            self.buf.move_by(if negative { 0 } else { 2 });
        }
        true
    }

    /// Swap the word at (or before) the cursor with the next word, or with the previous
    /// one for a negative count. Words are runs of letters and digits on the current
    /// line.
    pub(super) fn transpose_words(&mut self) -> bool {
        let line_start = self.buf.beginning_of_line(self.buf.cursor());
        let line_end = self.buf.end_of_line(self.buf.cursor());
        if line_end - line_start < 2 {
            return false;
        }
        let negative = self.count < 0;
        for _ in 0..self.count.unsigned_abs() {
            let words = self.words_between(line_start, line_end);
            if words.len() < 2 {
                return false;
            }
            let cursor = self.buf.cursor();
            let current = words
                .iter()
                .rposition(|(start, _)| *start <= cursor)
                .unwrap_or(0);
            let other = match (negative, current) {
                (false, it) if it + 1 < words.len() => it + 1,
                (false, it) => it - 1,
                (true, 0) => 1,
                (true, it) => it - 1,
            };
            let (left, right) = if current < other {
                (words[current], words[other])
            } else {
                (words[other], words[current])
            };
            let left_text = self.buf.substring(left.0, left.1);
            let right_text = self.buf.substring(right.0, right.1);
            let between = self.buf.substring(left.1, right.0);
            let swapped = format!("{right_text}{between}{left_text}");
            self.buf.set_cursor(left.0);
            self.buf.delete(right.1 - left.0);
            self.buf.write(&swapped);
            let target = if negative {
                left.0 + right_text.chars().count()
            } else {
                right.1
            };
            self.buf.set_cursor(target);
        }
        true
    }

    /// Start and end of each run of non delimiter chars in `start..end`.
    fn words_between(&self, start: usize, end: usize) -> Vec<(usize, usize)> {
        let mut acc = vec![];
        let mut word_start = None;
        for index in start..end {
            let delimiter = Self::is_delimiter(self.buf.at_char(index));
            match (word_start, delimiter) {
                (None, false) => word_start = Some(index),
                (Some(begin), true) => {
                    acc.push((begin, index));
                    word_start = None;
                }
                _ => {}
            }
        }
        if let Some(begin) = word_start {
            acc.push((begin, end));
        }
        acc
    }

    /// Apply `convert` to the next `count` words. A negative count converts the same
    /// words but leaves the cursor where it was.
    fn convert_words(&mut self, convert: fn(char, bool) -> char, skip_non_alpha: bool) -> bool {
        let cursor = self.buf.cursor();
        for _ in 0..self.count.unsigned_abs() {
            while self.buf.cursor() < self.buf.len() && !self.is_word(self.buf.curr_char()) {
                self.buf.move_by(1);
            }
            if skip_non_alpha {
                while self.buf.cursor() < self.buf.len()
                    && self.is_word(self.buf.curr_char())
                    && !self.buf.curr_char().is_some_and(char::is_alphabetic)
                {
                    self.buf.move_by(1);
                }
            }
            let mut first = true;
            while let Some(ch) = self.buf.curr_char().filter(|it| self.is_word(Some(*it))) {
                self.buf.set_curr_char(convert(ch, first));
                self.buf.move_by(1);
                first = false;
            }
        }
        if self.count < 0 {
            self.buf.set_cursor(cursor);
        }
        true
    }

    pub(super) fn up_case_word(&mut self) -> bool {
        self.convert_words(|ch, _| to_upper(ch), false)
    }

    pub(super) fn down_case_word(&mut self) -> bool {
        self.convert_words(|ch, _| to_lower(ch), false)
    }

    pub(super) fn capitalize_word(&mut self) -> bool {
        self.convert_words(
            |ch, first| if first { to_upper(ch) } else { to_lower(ch) },
            true,
        )
    }

    pub(super) fn clear_buffer(&mut self) -> bool {
        self.buf.clear();
        true
    }

    /// Comment out the current line and accept the buffer.
    pub(super) fn insert_comment(&mut self) -> bool { self.do_insert_comment(false) }

    pub(super) fn vi_insert_comment(&mut self) -> bool { self.do_insert_comment(true) }

    fn do_insert_comment(&mut self, vi_mode: bool) -> bool {
        self.beginning_of_line();
        self.put_string(COMMENT_BEGIN);
        if vi_mode {
            self.set_key_map(VI_INSERT);
        }
        self.accept_line()
    }

    /// Run history expansion over the buffer. Fails when nothing changed.
    pub(super) fn expand_history(&mut self) -> bool {
        let line = self.buf.to_string();
        match expand_history(self.history.as_ref(), &line) {
            Ok(expanded) if expanded != line => {
                self.buf.set_text(&expanded);
                true
            }
            Ok(_) => false,
            Err(error) => {
                self.report_expansion_error(&error);
                false
            }
        }
    }

    pub(super) fn report_expansion_error(&mut self, error: &ExpansionError) {
        tracing::debug!(message = "History expansion failed", error = %error);
        self.post = Some(error.to_string());
    }

    /// Expand history designators, then insert a space.
    pub(super) fn magic_space(&mut self) -> bool {
        if !self.options.is_set(ReaderOption::DisableEventExpansion) {
            self.expand_history();
        }
        for _ in 0..self.count.max(1) {
            self.put_string(" ");
        }
        true
    }

    pub(super) fn insert_close_paren(&mut self) -> bool { self.insert_close(')') }

    pub(super) fn insert_close_square(&mut self) -> bool { self.insert_close(']') }

    pub(super) fn insert_close_curly(&mut self) -> bool { self.insert_close('}') }

    /// Insert `closer` and move the cursor onto the matching opener for a moment. When
    /// the opener isn't right before the closer, the closer is outdented by one level.
    fn insert_close(&mut self, closer: char) -> bool {
        debug_assert!(bracket_type(closer).is_some_and(|it| it < 0));
        self.put_string(closer.encode_utf8(&mut [0; 4]));

        let blink = self.variables.blink_matching_paren();
        if blink.is_zero() {
            self.remove_indentation();
            return true;
        }
        let close_position = self.buf.cursor();
        self.buf.move_by(-1);
        self.vi_match_bracket();
        self.redisplay();
        if let Err(error) = self.reader.peek_character(blink) {
            self.io_error = Some(error);
        }
        let blink_position = self.buf.cursor();
        self.buf.set_cursor(close_position);
        if blink_position + 1 != close_position {
            self.remove_indentation();
        }
        true
    }

    /// Delete up to `indentation` spaces right before the char just inserted.
    fn remove_indentation(&mut self) {
        let indent = self.variables.indentation;
        if indent == 0 {
            return;
        }
        self.buf.move_by(-1);
        for _ in 0..indent {
            if self.buf.cursor() == 0 || self.buf.prev_char() != Some(' ') {
                break;
            }
            self.buf.backspace(1);
        }
        self.buf.move_by(1);
    }

    /// Replace the active region with the yank buffer, keeping the replaced text in the
    /// yank buffer.
    pub(super) fn put_replace_selection(&mut self) -> bool {
        let Some(range) = self.region_range() else {
            return false;
        };
        let replaced = self.buf.substring(range.start, range.end);
        self.buf.set_cursor(range.start);
        self.buf.delete(range.end - range.start);
        let yanked = std::mem::replace(&mut self.yank_buffer, replaced);
        for _ in 0..self.count.max(1) {
            self.put_string(&yanked);
        }
        self.region_active = RegionType::None;
        true
    }
}

fn to_upper(ch: char) -> char { ch.to_uppercase().next().unwrap_or(ch) }

fn to_lower(ch: char) -> char { ch.to_lowercase().next().unwrap_or(ch) }

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryHistory, RecordingRenderer, ScriptedKeySource, TextBuffer};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn reader_with(text: &str, cursor: usize) -> LineReader {
        let mut it = LineReader::new(
            Box::new(ScriptedKeySource::new()),
            Box::new(RecordingRenderer::new()),
        );
        it.buf = TextBuffer::new_with(text);
        it.buf.set_cursor(cursor);
        it
    }

    #[test_case("abcd", 2, 1, "acbd", 3 ; "middle")]
    #[test_case("abcd", 4, 1, "abdc", 4 ; "at the end swaps the last two")]
    #[test_case("abcd", 0, 1, "bacd", 2 ; "at the start swaps the first two")]
    #[test_case("a\nbc", 1, 1, "a\nbc", 1 ; "single char line fails")]
    fn test_transpose_chars(
        text: &str,
        cursor: usize,
        count: isize,
        expected: &str,
        expected_cursor: usize,
    ) {
        let mut it = reader_with(text, cursor);
        it.count = count;
        it.transpose_chars();
        assert_eq!(it.buf.to_string(), expected);
        assert_eq!(it.buf.cursor(), expected_cursor);
    }

    #[test_case("hello world", 2, 1, "world hello", 11 ; "forward")]
    #[test_case("one two three", 12, 1, "one three two", 13 ; "last word swaps with previous")]
    #[test_case("one two three", 5, -1, "two one three", 3 ; "negative swaps backward")]
    fn test_transpose_words(
        text: &str,
        cursor: usize,
        count: isize,
        expected: &str,
        expected_cursor: usize,
    ) {
        let mut it = reader_with(text, cursor);
        it.count = count;
        assert!(it.transpose_words());
        assert_eq!(it.buf.to_string(), expected);
        assert_eq!(it.buf.cursor(), expected_cursor);
    }

    #[test]
    fn test_transpose_words_needs_two_words() {
        let mut it = reader_with("alone", 2);
        assert!(!it.transpose_words());
    }

    #[test]
    fn test_case_words() {
        let mut it = reader_with("hello WORLD 9lives", 0);
        it.count = 2;
        assert!(it.up_case_word());
        assert_eq!(it.buf.to_string(), "HELLO WORLD 9lives");
        assert_eq!(it.buf.cursor(), 11);

        it.count = 1;
        assert!(it.capitalize_word());
        assert_eq!(it.buf.to_string(), "HELLO WORLD 9Lives");

        it.buf.set_cursor(0);
        it.count = -1;
        assert!(it.down_case_word());
        assert_eq!(it.buf.to_string(), "hello WORLD 9Lives");
        assert_eq!(it.buf.cursor(), 0);
    }

    #[test]
    fn test_delete_and_backspace_with_counts() {
        let mut it = reader_with("abcdef", 3);
        it.count = 2;
        assert!(it.delete_char());
        assert_eq!(it.buf.to_string(), "abcf");
        it.count = -1;
        assert!(it.delete_char());
        assert_eq!(it.buf.to_string(), "abf");
        it.buf.set_cursor(0);
        it.count = 1;
        assert!(!it.backward_delete_char());
    }

    #[test]
    fn test_expand_history_reports_missing_event() {
        let mut it = reader_with("echo !nope", 10);
        it.history = Box::new(MemoryHistory::new_with(&["ls"]));
        assert!(!it.expand_history());
        assert_eq!(it.post.as_deref(), Some("!nope: event not found"));

        it.buf.set_text("!!");
        assert!(it.expand_history());
        assert_eq!(it.buf.to_string(), "ls");
    }

    #[test]
    fn test_insert_close_removes_indentation() {
        let mut it = reader_with("(a\n    ", 7);
        it.variables.indentation = 2;
        it.variables.blink_matching_paren_ms = 0;
        assert!(it.insert_close_paren());
        assert_eq!(it.buf.to_string(), "(a\n  )");
    }

    #[test]
    fn test_put_replace_selection_swaps_with_yank_buffer() {
        let mut it = reader_with("one two", 4);
        it.yank_buffer = "six".into();
        it.region_mark = 7;
        it.region_active = RegionType::Char;
        assert!(it.put_replace_selection());
        assert_eq!(it.buf.to_string(), "one six");
        assert_eq!(it.yank_buffer, "two");
    }
}

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Kill ring and vi yank buffer widgets. Consecutive kills are merged into one kill ring
//! entry by [`crate::KillRing`], so the widgets here only say which side they killed.

use super::{LineReader, RegionType};

impl LineReader {
    pub(super) fn kill_line(&mut self) -> bool {
        if self.count < 0 {
            return self.call_neg(Self::backward_kill_line);
        }
        let cursor = self.buf.cursor();
        if cursor == self.buf.len() {
            return false;
        }
        let mut end = cursor;
        for _ in 0..self.count {
            if self.buf.at_char(end) == Some('\n') {
                end += 1;
            } else {
                end = self.buf.end_of_line(end);
            }
        }
        let killed = self.buf.substring(cursor, end);
        self.buf.delete(end - cursor);
        self.kill_ring.add(&killed);
        true
    }

    pub(super) fn backward_kill_line(&mut self) -> bool {
        if self.count < 0 {
            return self.call_neg(Self::kill_line);
        }
        let cursor = self.buf.cursor();
        if cursor == 0 {
            return false;
        }
        let mut start = cursor;
        for _ in 0..self.count {
            if start == 0 {
                break;
            }
            if self.buf.at_char(start - 1) == Some('\n') {
                start -= 1;
            } else {
                start = self.buf.beginning_of_line(start);
            }
        }
        let killed = self.buf.substring(start, cursor);
        self.buf.backspace(cursor - start);
        self.kill_ring.add_backwards(&killed);
        true
    }

    /// Kill `count` whole lines starting with the current one (or ending with it for a
    /// negative count).
    pub(super) fn kill_whole_line(&mut self) -> bool {
        if self.buf.is_empty() {
            return false;
        }
        let (start, end) = if self.count < 0 {
            let end = self.buf.end_of_line(self.buf.cursor());
            let mut start = end;
            for _ in 0..self.count.unsigned_abs() {
                start = self.buf.beginning_of_line(start);
                if start == 0 {
                    break;
                }
                start -= 1;
            }
            (start, end)
        } else {
            let start = self.buf.beginning_of_line(self.buf.cursor());
            let mut end = start;
            for _ in 0..self.count {
                end = self.buf.end_of_line(end);
                if end < self.buf.len() {
                    end += 1;
                }
            }
            (start, end)
        };
        let killed = self.buf.substring(start, end);
        self.buf.set_cursor(start);
        self.buf.delete(end - start);
        self.kill_ring.add(&killed);
        true
    }

    /// Position `count` words after the cursor, skipping to the end of each.
    fn word_end_after_cursor(&self) -> usize {
        let mut end = self.buf.cursor();
        for _ in 0..self.count {
            while end < self.buf.len() && !self.is_word(self.buf.at_char(end)) {
                end += 1;
            }
            while end < self.buf.len() && self.is_word(self.buf.at_char(end)) {
                end += 1;
            }
        }
        end
    }

    fn word_start_before(&self, from: usize, count: isize) -> usize {
        let mut start = from;
        for _ in 0..count {
            while start > 0 && !self.is_word(self.buf.at_char(start - 1)) {
                start -= 1;
            }
            while start > 0 && self.is_word(self.buf.at_char(start - 1)) {
                start -= 1;
            }
        }
        start
    }

    pub(super) fn kill_word(&mut self) -> bool {
        if self.count < 0 {
            return self.call_neg(Self::backward_kill_word);
        }
        let cursor = self.buf.cursor();
        let end = self.word_end_after_cursor();
        let killed = self.buf.substring(cursor, end);
        self.buf.delete(end - cursor);
        self.kill_ring.add(&killed);
        true
    }

    pub(super) fn backward_kill_word(&mut self) -> bool {
        if self.count < 0 {
            return self.call_neg(Self::kill_word);
        }
        let cursor = self.buf.cursor();
        let start = self.word_start_before(cursor, self.count);
        let killed = self.buf.substring(start, cursor);
        self.buf.backspace(cursor - start);
        self.kill_ring.add_backwards(&killed);
        true
    }

    /// Like [`Self::backward_kill_word`] with vi word boundaries, and never past the
    /// start of the line.
    pub(super) fn vi_backward_kill_word(&mut self) -> bool {
        if self.count < 0 {
            return false;
        }
        let limit = self.buf.beginning_of_line(self.buf.cursor());
        let cursor = self.buf.cursor();
        let mut start = cursor;
        for _ in 0..self.count {
            while start > limit && Self::is_whitespace(self.buf.at_char(start - 1)) {
                start -= 1;
            }
            if start > limit {
                let alnum = Self::is_vi_alnum(self.buf.at_char(start - 1));
                while start > limit {
                    let ch = self.buf.at_char(start - 1);
                    let same_kind = if alnum {
                        Self::is_vi_alnum(ch)
                    } else {
                        !Self::is_vi_alnum(ch) && !Self::is_whitespace(ch)
                    };
                    if !same_kind {
                        break;
                    }
                    start -= 1;
                }
            }
        }
        let killed = self.buf.substring(start, cursor);
        self.buf.backspace(cursor - start);
        self.kill_ring.add_backwards(&killed);
        true
    }

    pub(super) fn kill_buffer(&mut self) -> bool {
        self.kill_ring.add(&self.buf.to_string());
        self.buf.clear();
        true
    }

    pub(super) fn kill_region(&mut self) -> bool { self.copy_kill_region(true) }

    pub(super) fn copy_region_as_kill(&mut self) -> bool { self.copy_kill_region(false) }

    /// Put the text between the mark and the cursor on the kill ring, and delete it when
    /// `kill` is set. In vi-command mode the char under the cursor is included.
    fn copy_kill_region(&mut self, kill: bool) -> bool {
        let len = self.buf.len();
        self.region_mark = self.region_mark.min(len);
        let cursor = self.buf.cursor();
        let vi_cmd = usize::from(self.is_in_vi_cmd_mode());

        if self.region_active == RegionType::Line {
            let (start, end) = if self.region_mark < cursor {
                (self.region_mark, cursor)
            } else {
                (cursor, self.region_mark)
            };
            let start = self.buf.beginning_of_line(start);
            let end = (self.buf.end_of_line(end) + vi_cmd).min(len);
            let text = self.buf.substring(start, end);
            if self.region_mark < cursor {
                self.kill_ring.add(&text);
            } else {
                self.kill_ring.add_backwards(&text);
            }
            if kill {
                self.buf.set_cursor(start);
                self.buf.delete(end - start);
            }
        } else if self.region_mark > cursor {
            let end = (self.region_mark + vi_cmd).min(len);
            self.kill_ring.add(&self.buf.substring(cursor, end));
            if kill {
                self.buf.delete(end - cursor);
            }
        } else {
            let end = (cursor + vi_cmd).min(len);
            self.buf.set_cursor(end);
            self.kill_ring.add(&self.buf.substring(self.region_mark, end));
            if kill {
                self.buf.backspace(end - self.region_mark);
            }
        }
        if kill {
            self.region_active = RegionType::None;
        }
        true
    }

    /// Insert the `count`th word before the cursor again.
    pub(super) fn copy_prev_word(&mut self) -> bool {
        if self.count <= 0 {
            return false;
        }
        let mut end = self.buf.cursor();
        let mut start = end;
        let mut count = self.count;
        loop {
            end = start;
            start = self.word_start_before(start, 1);
            count -= 1;
            if count == 0 {
                break;
            }
            if start == 0 {
                return false;
            }
        }
        let word = self.buf.substring(start, end);
        self.buf.write(&word);
        true
    }

    pub(super) fn yank(&mut self) -> bool {
        let Some(yanked) = self.kill_ring.yank().map(str::to_owned) else {
            return false;
        };
        self.put_string(&yanked);
        true
    }

    /// Replace the text just yanked with the previous kill ring entry.
    pub(super) fn yank_pop(&mut self) -> bool {
        if !self.kill_ring.last_was_yank() {
            return false;
        }
        let Some(current) = self.kill_ring.yank().map(|it| it.chars().count()) else {
            return false;
        };
        self.buf.backspace(current);
        let Some(yanked) = self.kill_ring.yank_pop().map(str::to_owned) else {
            return false;
        };
        self.put_string(&yanked);
        true
    }

    /// Paste the yank buffer after the cursor. Whole lines go below the current line.
    pub(super) fn vi_put_after(&mut self) -> bool {
        let yanked = self.yank_buffer.clone();
        if yanked.contains('\n') {
            while self.buf.move_by(1) == 1 && self.buf.curr_char() != Some('\n') {}
            self.buf.move_by(1);
            self.put_string(&yanked);
            self.buf.move_by(-signed_len(&yanked));
        } else if !yanked.is_empty() {
            if self.buf.cursor() < self.buf.len() {
                self.buf.move_by(1);
            }
            for _ in 0..self.count.max(1) {
                self.put_string(&yanked);
            }
            self.buf.move_by(-1);
        }
        true
    }

    pub(super) fn vi_put_before(&mut self) -> bool {
        let yanked = self.yank_buffer.clone();
        if yanked.contains('\n') {
            while self.buf.move_by(-1) == -1 && self.buf.prev_char() != Some('\n') {}
            self.put_string(&yanked);
            self.buf.move_by(-signed_len(&yanked));
        } else if !yanked.is_empty() {
            for _ in 0..self.count.max(1) {
                self.put_string(&yanked);
            }
            self.buf.move_by(-1);
        }
        true
    }

    /// Yank `count` lines, starting with the current one, into the yank buffer.
    pub(super) fn vi_yank_whole_line(&mut self) -> bool {
        let start = self.buf.beginning_of_line(self.buf.cursor());
        let mut end = start;
        for _ in 0..self.count.max(1) {
            end = self.buf.end_of_line(end);
            if end < self.buf.len() {
                end += 1;
            }
        }
        let mut yanked = self.buf.substring(start, end);
        if !yanked.ends_with('\n') {
            yanked.push('\n');
        }
        self.yank_buffer = yanked;
        true
    }

    pub(super) fn vi_yank_eol(&mut self) -> bool {
        let cursor = self.buf.cursor();
        let eol = self.buf.end_of_line(cursor);
        self.yank_buffer = self.buf.substring(cursor, eol);
        true
    }

    /// Kill from the cursor back to where insert mode was entered, or the start of the
    /// line.
    pub(super) fn vi_kill_line(&mut self) -> bool {
        let cursor = self.buf.cursor();
        let start = self.buf.beginning_of_line(cursor);
        if start == cursor {
            return false;
        }
        let killed = self.buf.substring(start, cursor);
        self.buf.backspace(cursor - start);
        self.kill_ring.add_backwards(&killed);
        true
    }
}

fn signed_len(text: &str) -> isize { isize::try_from(text.chars().count()).unwrap_or(0) }

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RecordingRenderer, ScriptedKeySource, TextBuffer, VI_COMMAND};
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

    #[test_case("abc def\nghi", 4, 1, "abc \nghi", "def" ; "to end of line")]
    #[test_case("abc\nghi", 3, 1, "abcghi", "\n" ; "on newline kills it")]
    #[test_case("abc def\nghi", 4, 2, "abc ghi", "def\n" ; "count joins the newline")]
    fn test_kill_line(text: &str, cursor: usize, count: isize, expected: &str, killed: &str) {
        let mut it = reader_with(text, cursor);
        it.count = count;
        assert!(it.kill_line());
        assert_eq!(it.buf.to_string(), expected);
        assert_eq!(it.kill_ring.yank(), Some(killed));
    }

    #[test]
    fn test_kill_whole_line() {
        let mut it = reader_with("one\ntwo\nthree", 5);
        assert!(it.kill_whole_line());
        assert_eq!(it.buf.to_string(), "one\nthree");
        assert_eq!(it.buf.cursor(), 4);
        assert_eq!(it.kill_ring.yank(), Some("two\n"));
    }

    #[test]
    fn test_consecutive_kills_merge_and_yank_pop_cycles() {
        let mut it = reader_with("one two three", 13);
        assert!(it.backward_kill_word());
        assert!(it.backward_kill_word());
        assert_eq!(it.buf.to_string(), "one ");
        assert_eq!(it.kill_ring.yank(), Some("two three"));

        it.kill_ring.reset_last_kill();
        it.buf.set_cursor(0);
        assert!(it.kill_word());
        assert_eq!(it.buf.to_string(), " ");

        assert!(it.yank());
        assert_eq!(it.buf.to_string(), "one ");
        assert!(it.yank_pop());
        assert_eq!(it.buf.to_string(), "two three ");
    }

    #[test]
    fn test_yank_pop_needs_a_yank_first() {
        let mut it = reader_with("abc", 3);
        it.kill_ring.add("x");
        assert!(!it.yank_pop());
    }

    #[test]
    fn test_copy_region_keeps_text_and_kill_region_deletes() {
        let mut it = reader_with("hello world", 2);
        it.region_mark = 8;
        it.region_active = RegionType::Char;
        assert!(it.copy_region_as_kill());
        assert_eq!(it.buf.to_string(), "hello world");
        it.kill_ring.reset_last_kill();
        assert!(it.kill_region());
        assert_eq!(it.buf.to_string(), "herld");
        assert_eq!(it.region_active, RegionType::None);
        assert_eq!(it.kill_ring.yank(), Some("llo wo"));
    }

    #[test]
    fn test_copy_prev_word() {
        let mut it = reader_with("cp file", 7);
        assert!(it.copy_prev_word());
        assert_eq!(it.buf.to_string(), "cp filefile");
    }

    #[test]
    fn test_vi_put_after_and_before() {
        let mut it = reader_with("abc", 0);
        it.key_map = VI_COMMAND.into();
        it.yank_buffer = "xy".into();
        assert!(it.vi_put_after());
        assert_eq!(it.buf.to_string(), "axybc");
        assert_eq!(it.buf.cursor(), 2);

        it.yank_buffer = "line\n".into();
        it.buf.set_cursor(1);
        assert!(it.vi_put_before());
        assert_eq!(it.buf.to_string(), "line\naxybc");
        assert_eq!(it.buf.cursor(), 0);
    }

    #[test]
    fn test_vi_backward_kill_word_stops_at_line_start() {
        let mut it = reader_with("one\ntwo.three", 13);
        it.count = 5;
        assert!(it.vi_backward_kill_word());
        assert_eq!(it.buf.to_string(), "one\n");
    }
}

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The line being edited. A gap buffer of [`char`]s with a cursor.
//!
//! All positions are measured in code points, never in bytes or display columns. The
//! cursor is an insertion point in `[0, len]`, and every operation keeps it there.
//!
//! Storage is `[pre-gap | gap | post-gap]`. The gap is only relocated to the cursor when
//! the buffer is written to or deleted from, so plain cursor movement is `O(1)`.

use std::fmt::{Debug, Display, Formatter, Result};

/// Initial and minimum size of the gap.
const MIN_GAP_SIZE: usize = 32;

/// Filler for the unused slots in the gap. Never observable from the outside.
const GAP_FILLER: char = '\0';

#[derive(Clone)]
pub struct TextBuffer {
    data: Vec<char>,
    gap_start: usize,
    gap_end: usize,
    cursor: usize,
    /// Column to return to when moving up or down across lines of different length.
    /// Cleared by anything other than [`TextBuffer::up`] and [`TextBuffer::down`].
    preferred_column: Option<usize>,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self {
            data: vec![GAP_FILLER; MIN_GAP_SIZE],
            gap_start: 0,
            gap_end: MIN_GAP_SIZE,
            cursor: 0,
            preferred_column: None,
        }
    }
}

impl TextBuffer {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Creates a buffer holding `text`, with the cursor at the end.
    #[must_use]
    pub fn new_with(text: &str) -> Self {
        let mut it = Self::default();
        it.write(text);
        it
    }

    #[must_use]
    pub fn len(&self) -> usize { self.data.len() - self.gap_len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    #[must_use]
    pub fn cursor(&self) -> usize { self.cursor }

    fn gap_len(&self) -> usize { self.gap_end - self.gap_start }

    /// Maps a logical position to an index into `data`.
    fn physical(&self, index: usize) -> usize {
        if index < self.gap_start {
            index
        } else {
            index + self.gap_len()
        }
    }

    /// Returns the char at `index`, or [`None`] if `index` is out of bounds.
    #[must_use]
    pub fn at_char(&self, index: usize) -> Option<char> {
        if index < self.len() {
            Some(self.data[self.physical(index)])
        } else {
            None
        }
    }

    /// Char right after the cursor.
    #[must_use]
    pub fn curr_char(&self) -> Option<char> { self.at_char(self.cursor) }

    /// Char right before the cursor.
    #[must_use]
    pub fn prev_char(&self) -> Option<char> {
        self.cursor.checked_sub(1).and_then(|it| self.at_char(it))
    }

    #[must_use]
    pub fn next_char(&self) -> Option<char> { self.at_char(self.cursor + 1) }

    /// Replace the char under the cursor. Returns `false` at the end of the buffer.
    pub fn set_curr_char(&mut self, ch: char) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        let index = self.physical(self.cursor);
        self.data[index] = ch;
        true
    }

    /// Moves the cursor to `position`, clamped to the buffer. Returns `true` if the
    /// cursor ended up exactly at `position`.
    pub fn set_cursor(&mut self, position: usize) -> bool {
        if position == self.cursor {
            return true;
        }
        let delta = signed(position) - signed(self.cursor);
        self.move_by(delta) == delta
    }

    /// Moves the cursor by `delta` code points, clamped to `[0, len]`. Returns how far
    /// the cursor actually moved, so `0` means it was already at the edge.
    pub fn move_by(&mut self, delta: isize) -> isize {
        let target = (signed(self.cursor) + delta).clamp(0, signed(self.len()));
        let moved = target - signed(self.cursor);
        self.cursor = unsigned(target);
        self.preferred_column = None;
        moved
    }

    /// Column of the cursor within its line, measured from the last `'\n'` before it.
    fn column(&mut self) -> usize {
        if let Some(column) = self.preferred_column {
            return column;
        }
        let column = self.cursor - self.beginning_of_line(self.cursor);
        self.preferred_column = Some(column);
        column
    }

    /// Moves the cursor to the previous line, keeping the column if that line is long
    /// enough. Returns `false` when already on the first line.
    pub fn up(&mut self) -> bool {
        let column = self.column();
        let line_start = self.beginning_of_line(self.cursor);
        if line_start == 0 {
            return false;
        }
        let prev_line_end = line_start - 1;
        let prev_line_start = self.beginning_of_line(prev_line_end);
        self.cursor = (prev_line_start + column).min(prev_line_end);
        true
    }

    /// Moves the cursor to the next line, keeping the column if that line is long
    /// enough. Returns `false` when already on the last line.
    pub fn down(&mut self) -> bool {
        let column = self.column();
        let line_end = self.end_of_line(self.cursor);
        if line_end >= self.len() {
            return false;
        }
        let next_line_start = line_end + 1;
        let next_line_end = self.end_of_line(next_line_start);
        self.cursor = (next_line_start + column).min(next_line_end);
        true
    }

    /// Index of the first char of the line that contains `position`.
    #[must_use]
    pub fn beginning_of_line(&self, position: usize) -> usize {
        let mut it = position.min(self.len());
        while it > 0 && self.at_char(it - 1) != Some('\n') {
            it -= 1;
        }
        it
    }

    /// Index of the `'\n'` ending the line that contains `position`, or `len` on the
    /// last line.
    #[must_use]
    pub fn end_of_line(&self, position: usize) -> usize {
        let mut it = position;
        while it < self.len() && self.at_char(it) != Some('\n') {
            it += 1;
        }
        it
    }

    /// Inserts `text` at the cursor and moves the cursor past it.
    pub fn write(&mut self, text: &str) { self.write_overtyping(text, false); }

    pub fn write_char(&mut self, ch: char) { self.write_char_overtyping(ch, false); }

    /// Inserts `text`, replacing existing chars instead of pushing them right when
    /// `overtype` is set (chars past the end of the buffer are still appended).
    pub fn write_overtyping(&mut self, text: &str, overtype: bool) {
        for ch in text.chars() {
            self.write_char_overtyping(ch, overtype);
        }
    }

    pub fn write_char_overtyping(&mut self, ch: char, overtype: bool) {
        self.move_gap_to_cursor();
        if overtype && self.gap_end < self.data.len() {
            self.gap_end += 1;
        }
        self.ensure_gap(1);
        self.data[self.gap_start] = ch;
        self.gap_start += 1;
        self.cursor += 1;
        self.preferred_column = None;
    }

    /// Deletes up to `count` chars after the cursor. Returns how many were deleted.
    pub fn delete(&mut self, count: usize) -> usize {
        let count = count.min(self.len() - self.cursor);
        if count > 0 {
            self.move_gap_to_cursor();
            self.gap_end += count;
        }
        self.preferred_column = None;
        count
    }

    /// Deletes up to `count` chars before the cursor. Returns how many were deleted.
    pub fn backspace(&mut self, count: usize) -> usize {
        let count = count.min(self.cursor);
        if count > 0 {
            self.cursor -= count;
            self.move_gap_to_cursor();
            self.gap_end += count;
        }
        self.preferred_column = None;
        count
    }

    /// Empties the buffer. Returns `false` if it was already empty.
    pub fn clear(&mut self) -> bool {
        if self.is_empty() {
            return false;
        }
        self.gap_start = 0;
        self.gap_end = self.data.len();
        self.cursor = 0;
        self.preferred_column = None;
        true
    }

    /// Chars in `[start, end)`, with both ends clamped to the buffer.
    #[must_use]
    pub fn substring(&self, start: usize, end: usize) -> String {
        let end = end.min(self.len());
        (start.min(end)..end).filter_map(|it| self.at_char(it)).collect()
    }

    #[must_use]
    pub fn up_to_cursor(&self) -> String { self.substring(0, self.cursor) }

    /// Iterates over the chars of the buffer, skipping the gap.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.data[..self.gap_start]
            .iter()
            .chain(self.data[self.gap_end..].iter())
            .copied()
    }

    /// Deep snapshot, used for undo and for the modified history entries.
    #[must_use]
    pub fn copy(&self) -> Self { self.clone() }

    /// Replace content and cursor with those of `other`.
    pub fn copy_from(&mut self, other: &TextBuffer) {
        self.clear();
        self.write(&other.to_string());
        self.cursor = other.cursor.min(self.len());
        self.preferred_column = None;
    }

    /// Replace the whole content with `text`, cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.clear();
        self.write(text);
    }

    fn move_gap_to_cursor(&mut self) {
        let cursor = self.cursor;
        if cursor < self.gap_start {
            let count = self.gap_start - cursor;
            self.data
                .copy_within(cursor..self.gap_start, self.gap_end - count);
            self.gap_start -= count;
            self.gap_end -= count;
        } else if cursor > self.gap_start {
            let count = cursor - self.gap_start;
            self.data
                .copy_within(self.gap_end..self.gap_end + count, self.gap_start);
            self.gap_start += count;
            self.gap_end += count;
        }
    }

    /// Grows the storage so the gap holds at least `needed` slots.
    fn ensure_gap(&mut self, needed: usize) {
        if self.gap_len() >= needed {
            return;
        }
        let new_gap = (self.data.len()).max(MIN_GAP_SIZE).max(needed);
        let post_len = self.data.len() - self.gap_end;
        let mut data = Vec::with_capacity(self.gap_start + new_gap + post_len);
        data.extend_from_slice(&self.data[..self.gap_start]);
        data.resize(self.gap_start + new_gap, GAP_FILLER);
        data.extend_from_slice(&self.data[self.gap_end..]);
        self.gap_end = self.gap_start + new_gap;
        self.data = data;
    }
}

#[allow(clippy::cast_possible_wrap)]
fn signed(it: usize) -> isize { it as isize }

#[allow(clippy::cast_sign_loss)]
fn unsigned(it: isize) -> usize { it.max(0) as usize }

impl Display for TextBuffer {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for ch in self.chars() {
            write!(f, "{ch}")?;
        }
        Ok(())
    }
}

impl Debug for TextBuffer {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "TextBuffer[{:?} @ {}]", self.to_string(), self.cursor)
    }
}

/// Two buffers are equal when they hold the same chars and the same cursor, regardless
/// of where their gaps are.
impl PartialEq for TextBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.cursor == other.cursor && self.chars().eq(other.chars())
    }
}

impl Eq for TextBuffer {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn assert_invariants(buf: &TextBuffer) {
        assert!(buf.cursor() <= buf.len());
        assert_eq!(buf.substring(0, buf.len()), buf.to_string());
    }

    #[test]
    fn test_write_and_read_back() {
        let mut buf = TextBuffer::new();
        buf.write("héllo wörld");
        assert_eq!(buf.to_string(), "héllo wörld");
        assert_eq!(buf.len(), 11);
        assert_eq!(buf.cursor(), 11);
        assert_invariants(&buf);
    }

    #[test]
    fn test_insert_in_the_middle() {
        let mut buf = TextBuffer::new_with("helld");
        buf.set_cursor(3);
        buf.write("lo wor");
        assert_eq!(buf.to_string(), "hello world");
        assert_eq!(buf.cursor(), 9);
        assert_invariants(&buf);
    }

    #[test]
    fn test_move_by_clamps_and_reports_actual_delta() {
        let mut buf = TextBuffer::new_with("abc");
        assert_eq!(buf.move_by(1), 0);
        assert_eq!(buf.move_by(-2), -2);
        assert_eq!(buf.cursor(), 1);
        assert_eq!(buf.move_by(-5), -1);
        assert_eq!(buf.cursor(), 0);
        assert_eq!(buf.move_by(-1), 0);
        assert_eq!(buf.move_by(10), 3);
    }

    #[test]
    fn test_insert_then_delete_restores_content_and_cursor() {
        let mut buf = TextBuffer::new_with("one three");
        buf.set_cursor(4);
        let before = buf.copy();

        buf.write("two ");
        assert_eq!(buf.to_string(), "one two three");
        buf.backspace(4);
        assert_eq!(buf, before);

        buf.write("two ");
        buf.move_by(-4);
        buf.delete(4);
        assert_eq!(buf, before);
    }

    #[test]
    fn test_delete_and_backspace_at_edges() {
        let mut buf = TextBuffer::new_with("ab");
        assert_eq!(buf.delete(1), 0);
        assert_eq!(buf.backspace(5), 2);
        assert!(buf.is_empty());
        assert_eq!(buf.backspace(1), 0);
        assert_eq!(buf.cursor(), 0);
        assert_invariants(&buf);
    }

    #[test]
    fn test_many_operations_keep_invariants() {
        let mut buf = TextBuffer::new();
        for round in 0..200_usize {
            match round % 5 {
                0 => buf.write("xyz"),
                1 => {
                    buf.move_by(-2);
                }
                2 => {
                    buf.delete(1);
                }
                3 => {
                    buf.backspace(2);
                }
                _ => {
                    buf.move_by(7);
                }
            }
            assert_invariants(&buf);
        }
    }

    #[test]
    fn test_gap_grows_past_initial_size() {
        let mut buf = TextBuffer::new();
        let long = "0123456789".repeat(20);
        buf.write(&long);
        buf.set_cursor(5);
        buf.write(&long);
        assert_eq!(buf.len(), 400);
        assert_eq!(buf.substring(0, 5), "01234");
        assert_eq!(buf.substring(5, 15), "0123456789");
        assert_invariants(&buf);
    }

    #[test]
    fn test_overtyping() {
        let mut buf = TextBuffer::new_with("abcd");
        buf.set_cursor(1);
        buf.write_overtyping("XYZW", true);
        assert_eq!(buf.to_string(), "aXYZW");
        assert_eq!(buf.cursor(), 5);
    }

    #[test]
    fn test_set_curr_char() {
        let mut buf = TextBuffer::new_with("abc");
        buf.set_cursor(1);
        assert!(buf.set_curr_char('B'));
        assert_eq!(buf.to_string(), "aBc");
        buf.set_cursor(3);
        assert!(!buf.set_curr_char('x'));
    }

    #[test]
    fn test_up_and_down_keep_column() {
        let mut buf = TextBuffer::new_with("first line\nab\nthird line");
        buf.set_cursor(20); // "third |line"
        assert!(buf.up());
        assert_eq!(buf.cursor(), 13); // end of "ab"
        assert!(buf.up());
        assert_eq!(buf.cursor(), 6); // column 6 restored on the first line
        assert!(!buf.up());
        assert!(buf.down());
        assert_eq!(buf.cursor(), 13);
        assert!(buf.down());
        assert_eq!(buf.cursor(), 20);
        assert!(!buf.down());
    }

    #[test]
    fn test_line_boundaries() {
        let buf = TextBuffer::new_with("ab\ncd");
        assert_eq!(buf.beginning_of_line(4), 3);
        assert_eq!(buf.end_of_line(0), 2);
        assert_eq!(buf.end_of_line(3), 5);
    }

    #[test]
    fn test_copy_from_keeps_cursor() {
        let mut source = TextBuffer::new_with("hello");
        source.set_cursor(2);
        let mut target = TextBuffer::new_with("something else");
        target.copy_from(&source);
        assert_eq!(target, source);
    }

    #[test]
    fn test_clear() {
        let mut buf = TextBuffer::new_with("abc");
        assert!(buf.clear());
        assert!(!buf.clear());
        assert_eq!(buf.to_string(), "");
        buf.write("z");
        assert_eq!(buf.to_string(), "z");
    }
}

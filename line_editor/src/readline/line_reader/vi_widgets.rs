// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Vi mode switches, operators and the single key vi edits.
//!
//! An operator (`d`, `c`, `y`, `gU`, ...) reads the next binding with the
//! [`crate::VI_OPP`] map on top of vi-command. Repeating the operator key works on whole
//! lines, a motion works on the chars it moved over (whole lines for `j` and `k`), and
//! digits typed in between multiply the count. With an active region the operator works
//! on the region instead and reads nothing.

use super::{LineReader, ReaderState, RegionType, ViMoveMode};
use crate::{EMACS, MAIN, VI_COMMAND, VI_INSERT, VI_OPP, WidgetName};

/// What a vi operator applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViTarget {
    /// From one position to another, in either order.
    Chars(usize, usize),
    /// Whole lines: `start` is a line start, `end` is past the last newline (or the
    /// buffer end).
    Lines(usize, usize),
    /// Escape or send-break while the operator was pending.
    Cancel,
}

impl LineReader {
    fn use_main_key_map(&mut self, name: &str) -> bool {
        let Some(key_map) = self.key_maps.get(name).cloned() else {
            return false;
        };
        self.key_maps.insert(MAIN.into(), key_map);
        self.set_key_map(name)
    }

    pub(super) fn emacs_editing_mode(&mut self) -> bool {
        self.region_active = RegionType::None;
        self.use_main_key_map(EMACS)
    }

    pub(super) fn vi_editing_mode(&mut self) -> bool { self.use_main_key_map(VI_INSERT) }

    /// Leave insert mode. The cursor steps back onto the char just typed, as in vi.
    pub(super) fn vi_cmd_mode(&mut self) -> bool {
        if self.state == ReaderState::Normal
            && !self.is_in_vi_cmd_mode()
            && !self.is_in_vi_move_operation()
        {
            let bol = self.buf.beginning_of_line(self.buf.cursor());
            if self.buf.cursor() > bol {
                self.buf.move_by(-1);
            }
        }
        self.overtyping = false;
        self.set_key_map(VI_COMMAND)
    }

    pub(super) fn vi_insert(&mut self) -> bool { self.set_key_map(VI_INSERT) }

    pub(super) fn vi_add_next(&mut self) -> bool {
        if self.buf.cursor() < self.buf.end_of_line(self.buf.cursor()) {
            self.buf.move_by(1);
        }
        self.set_key_map(VI_INSERT)
    }

    pub(super) fn vi_add_eol(&mut self) -> bool {
        self.buf.set_cursor(self.buf.end_of_line(self.buf.cursor()));
        self.set_key_map(VI_INSERT)
    }

    pub(super) fn vi_insert_bol(&mut self) -> bool {
        self.vi_first_non_blank();
        self.set_key_map(VI_INSERT)
    }

    /// Insert mode, typing over the existing chars.
    pub(super) fn vi_replace(&mut self) -> bool {
        self.overtyping = true;
        self.set_key_map(VI_INSERT)
    }

    /// `start..end` covering every line touched by `from` through `to`.
    fn lines_covering(&self, from: usize, to: usize) -> ViTarget {
        let start = self.buf.beginning_of_line(from.min(to));
        let mut end = self.buf.end_of_line(from.max(to));
        if end < self.buf.len() {
            end += 1;
        }
        ViTarget::Lines(start, end)
    }

    /// `count` lines starting with the current one.
    fn count_lines(&self) -> ViTarget {
        let cursor = self.buf.cursor();
        let mut last = cursor;
        for _ in 1..self.count.max(1) {
            let eol = self.buf.end_of_line(last);
            if eol >= self.buf.len() {
                break;
            }
            last = eol + 1;
        }
        self.lines_covering(cursor, last)
    }

    /// Read and run the motion of a pending operator. [`None`] when the motion failed
    /// or the key was not a motion (that key is pushed back).
    fn read_vi_target(&mut self, mode: ViMoveMode, operator: WidgetName) -> Option<ViTarget> {
        if self.region_active != RegionType::None {
            let is_line = self.region_active == RegionType::Line;
            let region = self.region_range();
            self.region_active = RegionType::None;
            return region.map(|it| {
                if is_line {
                    self.lines_covering(it.start, it.end)
                } else {
                    ViTarget::Chars(it.start, it.end)
                }
            });
        }

        let start = self.buf.cursor();
        let mut motion_count: isize = 0;
        loop {
            let binding = self.read_binding(Some(VI_OPP))?;
            let Some(widget) = binding.builtin() else {
                self.reader.push_back_binding();
                return None;
            };
            if widget == operator {
                return Some(self.count_lines());
            }
            if matches!(widget, WidgetName::ViCmdMode | WidgetName::SendBreak) {
                return Some(ViTarget::Cancel);
            }

            let is_digit = matches!(widget, WidgetName::DigitArgument | WidgetName::ViArgDigit)
                || (widget == WidgetName::ViDigitOrBeginningOfLine && motion_count > 0);
            let digit = self.last_binding().chars().last().and_then(|it| it.to_digit(10));
            if let (true, Some(digit)) = (is_digit, digit) {
                motion_count = motion_count * 10 + isize::try_from(digit).unwrap_or(0);
                continue;
            }
            if !widget.is_vi_motion() {
                self.reader.push_back_binding();
                return None;
            }

            if motion_count > 0 {
                self.count *= motion_count;
            }
            self.vi_move_mode = mode;
            let moved = self.call_widget(widget.into());
            self.vi_move_mode = ViMoveMode::Normal;
            if !moved {
                self.buf.set_cursor(start);
                return None;
            }
            let end = self.buf.cursor();
            return Some(match widget {
                WidgetName::UpLine | WidgetName::DownLine => self.lines_covering(start, end),
                _ => ViTarget::Chars(start, end),
            });
        }
    }

    pub(super) fn vi_delete(&mut self) -> bool {
        match self.read_vi_target(ViMoveMode::Delete, WidgetName::ViDelete) {
            None => false,
            Some(ViTarget::Cancel) => true,
            Some(ViTarget::Chars(from, to)) => self.vi_delete_chars(from, to, false),
            Some(ViTarget::Lines(start, end)) => self.vi_delete_lines(start, end),
        }
    }

    pub(super) fn vi_change_to(&mut self) -> bool {
        match self.read_vi_target(ViMoveMode::Change, WidgetName::ViChangeTo) {
            None => false,
            Some(ViTarget::Cancel) => true,
            Some(ViTarget::Chars(from, to)) => self.vi_delete_chars(from, to, true),
            Some(ViTarget::Lines(start, end)) => self.vi_change_lines(start, end),
        }
    }

    /// Copy into the yank buffer. The cursor goes back where it was, or to the start of
    /// the text when the motion went backwards.
    pub(super) fn vi_yank(&mut self) -> bool {
        let cursor = self.buf.cursor();
        match self.read_vi_target(ViMoveMode::Yank, WidgetName::ViYank) {
            None => false,
            Some(ViTarget::Cancel) => true,
            Some(ViTarget::Chars(from, to)) => {
                self.yank_buffer = self.buf.substring(from.min(to), from.max(to));
                self.buf.set_cursor(from.min(to).min(cursor));
                true
            }
            Some(ViTarget::Lines(start, end)) => {
                self.yank_buffer = as_lines(self.buf.substring(start, end));
                self.buf.set_cursor(cursor);
                true
            }
        }
    }

    pub(super) fn vi_oper_swap_case(&mut self) -> bool {
        self.vi_case_operator(WidgetName::ViOperSwapCase, swap_case)
    }

    pub(super) fn vi_up_case(&mut self) -> bool {
        self.vi_case_operator(WidgetName::ViUpCase, str::to_uppercase)
    }

    pub(super) fn vi_down_case(&mut self) -> bool {
        self.vi_case_operator(WidgetName::ViDownCase, str::to_lowercase)
    }

    fn vi_case_operator(&mut self, operator: WidgetName, convert: fn(&str) -> String) -> bool {
        let (start, end) = match self.read_vi_target(ViMoveMode::Yank, operator) {
            None => return false,
            Some(ViTarget::Cancel) => return true,
            Some(ViTarget::Chars(from, to)) => (from.min(to), from.max(to)),
            Some(ViTarget::Lines(start, end)) => (start, end),
        };
        let converted = convert(&self.buf.substring(start, end));
        self.buf.set_cursor(start);
        self.buf.delete(end - start);
        self.buf.write(&converted);
        self.buf.set_cursor(start);
        true
    }

    /// Delete (or change) the chars between two positions into the yank buffer.
    fn vi_delete_chars(&mut self, from: usize, to: usize, is_change: bool) -> bool {
        let (start, end) = (from.min(to), from.max(to));
        if start < end {
            self.yank_buffer = self.buf.substring(start, end);
            self.buf.set_cursor(start);
            self.buf.delete(end - start);
        } else {
            self.buf.set_cursor(start);
        }
        if is_change {
            return self.set_key_map(VI_INSERT);
        }
        if start > 0 && start == self.buf.len() {
            self.buf.move_by(-1);
        }
        true
    }

    fn vi_delete_lines(&mut self, start: usize, end: usize) -> bool {
        let text = self.buf.substring(start, end);
        // The last line has no newline of its own, so take the one before it.
        let start = if !text.ends_with('\n') && start > 0 {
            start - 1
        } else {
            start
        };
        self.yank_buffer = as_lines(text);
        self.buf.set_cursor(start);
        self.buf.delete(end - start);
        self.vi_first_non_blank()
    }

    /// Empty the lines but keep them, then insert.
    fn vi_change_lines(&mut self, start: usize, end: usize) -> bool {
        let text = self.buf.substring(start, end);
        let end = if text.ends_with('\n') { end - 1 } else { end };
        self.yank_buffer = as_lines(text);
        self.buf.set_cursor(start);
        self.buf.delete(end - start);
        self.set_key_map(VI_INSERT)
    }

    /// `x`: delete `count` chars under and after the cursor, without leaving the line.
    pub(super) fn vi_delete_char(&mut self) -> bool {
        if self.count < 0 {
            return self.call_neg(Self::vi_backward_delete_char);
        }
        let cursor = self.buf.cursor();
        let eol = self.buf.end_of_line(cursor);
        let end = (cursor + self.count.unsigned_abs()).min(eol);
        if end == cursor {
            return false;
        }
        self.yank_buffer = self.buf.substring(cursor, end);
        self.buf.delete(end - cursor);
        self.step_back_from_eol();
        true
    }

    /// `X`: delete `count` chars before the cursor, without leaving the line.
    pub(super) fn vi_backward_delete_char(&mut self) -> bool {
        if self.count < 0 {
            return self.call_neg(Self::vi_delete_char);
        }
        let cursor = self.buf.cursor();
        let bol = self.buf.beginning_of_line(cursor);
        let start = cursor.saturating_sub(self.count.unsigned_abs()).max(bol);
        if start == cursor {
            return false;
        }
        self.yank_buffer = self.buf.substring(start, cursor);
        self.buf.backspace(cursor - start);
        true
    }

    /// In vi-command mode the cursor sits on a char, never past the last one.
    fn step_back_from_eol(&mut self) {
        let cursor = self.buf.cursor();
        if self.is_in_vi_cmd_mode()
            && cursor == self.buf.end_of_line(cursor)
            && cursor > self.buf.beginning_of_line(cursor)
        {
            self.buf.move_by(-1);
        }
    }

    pub(super) fn vi_swap_case(&mut self) -> bool {
        let mut changed = false;
        for _ in 0..self.count.max(1) {
            let Some(ch) = self.buf.curr_char().filter(|it| *it != '\n') else {
                break;
            };
            changed |= self.buf.set_curr_char(swap_case_char(ch));
            self.buf.move_by(1);
        }
        self.step_back_from_eol();
        changed
    }

    /// `r`: replace `count` chars with the next key typed.
    pub(super) fn vi_replace_chars(&mut self) -> bool {
        let Some(ch) = self.read_character() else {
            return true;
        };
        if ch == '\x1b' || ch == '\x03' {
            return true;
        }
        let ch = if ch == '\r' { '\n' } else { ch };
        let count = self.count.unsigned_abs().max(1);
        let cursor = self.buf.cursor();
        if cursor + count > self.buf.end_of_line(cursor) {
            return false;
        }
        for index in 0..count {
            self.buf.set_cursor(cursor + index);
            self.buf.set_curr_char(ch);
        }
        true
    }

    pub(super) fn vi_change_eol(&mut self) -> bool {
        let cursor = self.buf.cursor();
        let eol = self.buf.end_of_line(cursor);
        self.vi_delete_chars(cursor, eol, true)
    }

    pub(super) fn vi_change_whole_line(&mut self) -> bool {
        self.vi_first_non_blank() && self.vi_change_eol()
    }

    /// `D`: kill to the end of the line.
    pub(super) fn vi_kill_eol(&mut self) -> bool {
        let cursor = self.buf.cursor();
        let eol = self.buf.end_of_line(cursor);
        if cursor == eol {
            return false;
        }
        let killed = self.buf.substring(cursor, eol);
        self.buf.delete(eol - cursor);
        self.kill_ring.add(&killed);
        self.step_back_from_eol();
        true
    }

    /// `s`: delete `count` chars and insert.
    pub(super) fn vi_substitute(&mut self) -> bool {
        let cursor = self.buf.cursor();
        let eol = self.buf.end_of_line(cursor);
        let end = (cursor + self.count.unsigned_abs().max(1)).min(eol);
        self.vi_delete_chars(cursor, end, true)
    }

    pub(super) fn vi_open_line_above(&mut self) -> bool {
        let bol = self.buf.beginning_of_line(self.buf.cursor());
        self.buf.set_cursor(bol);
        self.buf.write_char('\n');
        self.buf.move_by(-1);
        self.set_key_map(VI_INSERT)
    }

    pub(super) fn vi_open_line_below(&mut self) -> bool {
        let eol = self.buf.end_of_line(self.buf.cursor());
        self.buf.set_cursor(eol);
        self.buf.write_char('\n');
        self.set_key_map(VI_INSERT)
    }

    /// `J`: join the next line onto this one, with one space in between.
    pub(super) fn vi_join(&mut self) -> bool {
        let mut joined = false;
        for _ in 0..(self.count - 1).max(1) {
            let eol = self.buf.end_of_line(self.buf.cursor());
            if eol >= self.buf.len() {
                break;
            }
            self.buf.set_cursor(eol);
            self.buf.delete(1);
            while self.buf.curr_char().is_some_and(|it| it == ' ' || it == '\t') {
                self.buf.delete(1);
            }
            let bol = self.buf.beginning_of_line(eol);
            let at_end = self.buf.curr_char().is_none_or(|it| it == '\n');
            if eol > bol && !at_end {
                self.buf.write_char(' ');
                self.buf.move_by(-1);
            }
            joined = true;
        }
        joined
    }
}

/// Yank buffer text that puts as whole lines.
fn as_lines(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

fn swap_case_char(ch: char) -> char {
    if ch.is_uppercase() {
        ch.to_lowercase().next().unwrap_or(ch)
    } else {
        ch.to_uppercase().next().unwrap_or(ch)
    }
}

fn swap_case(text: &str) -> String { text.chars().map(swap_case_char).collect() }

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Cursor motions. Every motion honors the repeat count, and a negative count runs the
//! opposite motion.

use super::LineReader;
use crate::{MAIN, WidgetName};

impl LineReader {
    fn find_bol(&self) -> usize { self.buf.beginning_of_line(self.buf.cursor()) }

    fn find_eol(&self) -> usize { self.buf.end_of_line(self.buf.cursor()) }

    fn at_end(&self) -> bool { self.buf.cursor() >= self.buf.len() }

    pub(super) fn forward_char(&mut self) -> bool {
        if self.count < 0 {
            return self.call_neg(Self::backward_char);
        }
        self.buf.move_by(self.count) != 0
    }

    pub(super) fn backward_char(&mut self) -> bool {
        if self.count < 0 {
            return self.call_neg(Self::forward_char);
        }
        self.buf.move_by(-self.count) != 0
    }

    /// Stops before the last char of the line in vi-command mode.
    pub(super) fn vi_forward_char(&mut self) -> bool {
        if self.count < 0 {
            return self.call_neg(Self::vi_backward_char);
        }
        let mut limit = self.find_eol();
        if self.is_in_vi_cmd_mode() && !self.is_in_vi_move_operation() {
            limit = limit.saturating_sub(1);
        }
        if self.buf.cursor() >= limit {
            return false;
        }
        let mut count = self.count;
        while count > 0 && self.buf.cursor() < limit {
            count -= 1;
            self.buf.move_by(1);
        }
        true
    }

    pub(super) fn vi_backward_char(&mut self) -> bool {
        if self.count < 0 {
            return self.call_neg(Self::vi_forward_char);
        }
        if self.buf.cursor() == self.find_bol() {
            return false;
        }
        let mut count = self.count;
        while count > 0 && self.buf.cursor() > 0 {
            count -= 1;
            self.buf.move_by(-1);
            if self.buf.curr_char() == Some('\n') {
                self.buf.move_by(1);
                break;
            }
        }
        true
    }

    pub(super) fn forward_word(&mut self) -> bool {
        if self.count < 0 {
            return self.call_neg(Self::backward_word);
        }
        let mut count = self.count;
        while count > 0 {
            count -= 1;
            while !self.at_end() && self.is_word(self.buf.curr_char()) {
                self.buf.move_by(1);
            }
            if self.is_in_vi_change_operation() && count == 0 {
                break;
            }
            while !self.at_end() && !self.is_word(self.buf.curr_char()) {
                self.buf.move_by(1);
            }
        }
        true
    }

    pub(super) fn backward_word(&mut self) -> bool {
        if self.count < 0 {
            return self.call_neg(Self::forward_word);
        }
        let mut count = self.count;
        while count > 0 {
            count -= 1;
            while self.buf.cursor() > 0 && !self.is_word(self.buf.prev_char()) {
                self.buf.move_by(-1);
            }
            while self.buf.cursor() > 0 && self.is_word(self.buf.prev_char()) {
                self.buf.move_by(-1);
            }
        }
        true
    }

    /// Moves to the end of the word rather than to the start of the next one.
    pub(super) fn emacs_forward_word(&mut self) -> bool {
        if self.count < 0 {
            return self.call_neg(Self::emacs_backward_word);
        }
        let mut count = self.count;
        while count > 0 {
            count -= 1;
            while !self.at_end() && !self.is_word(self.buf.curr_char()) {
                self.buf.move_by(1);
            }
            if self.is_in_vi_change_operation() && count == 0 {
                return true;
            }
            while !self.at_end() && self.is_word(self.buf.curr_char()) {
                self.buf.move_by(1);
            }
        }
        true
    }

    pub(super) fn emacs_backward_word(&mut self) -> bool {
        if self.count < 0 {
            return self.call_neg(Self::emacs_forward_word);
        }
        let mut count = self.count;
        while count > 0 {
            count -= 1;
            while self.buf.cursor() > 0 {
                self.buf.move_by(-1);
                if self.is_word(self.buf.curr_char()) {
                    break;
                }
            }
            while self.buf.cursor() > 0 {
                self.buf.move_by(-1);
                if !self.is_word(self.buf.curr_char()) {
                    break;
                }
            }
        }
        true
    }

    /// Skip whitespace after a word, but never across an empty line.
    fn skip_blanks_within_paragraph(&mut self) {
        let mut newlines = usize::from(self.buf.curr_char() == Some('\n'));
        while !self.at_end() && newlines < 2 && Self::is_whitespace(self.buf.curr_char()) {
            self.buf.move_by(1);
            newlines += usize::from(self.buf.curr_char() == Some('\n'));
        }
    }

    pub(super) fn vi_forward_word(&mut self) -> bool {
        if self.count < 0 {
            return self.call_neg(Self::backward_word);
        }
        let mut count = self.count;
        while count > 0 {
            count -= 1;
            if Self::is_vi_alnum(self.buf.curr_char()) {
                while !self.at_end() && Self::is_vi_alnum(self.buf.curr_char()) {
                    self.buf.move_by(1);
                }
            } else {
                while !self.at_end()
                    && !Self::is_vi_alnum(self.buf.curr_char())
                    && !Self::is_whitespace(self.buf.curr_char())
                {
                    self.buf.move_by(1);
                }
            }
            if self.is_in_vi_change_operation() && count == 0 {
                return true;
            }
            self.skip_blanks_within_paragraph();
        }
        true
    }

    pub(super) fn vi_forward_blank_word(&mut self) -> bool {
        if self.count < 0 {
            return self.call_neg(Self::vi_backward_blank_word);
        }
        let mut count = self.count;
        while count > 0 {
            count -= 1;
            while !self.at_end() && !Self::is_whitespace(self.buf.curr_char()) {
                self.buf.move_by(1);
            }
            if self.is_in_vi_change_operation() && count == 0 {
                return true;
            }
            self.skip_blanks_within_paragraph();
        }
        true
    }

    pub(super) fn vi_forward_word_end(&mut self) -> bool {
        if self.count < 0 {
            return self.call_neg(Self::backward_word);
        }
        let mut count = self.count;
        while count > 0 {
            count -= 1;
            while !self.at_end() && Self::is_whitespace(self.buf.next_char()) {
                self.buf.move_by(1);
            }
            if !self.at_end() {
                let alnum = Self::is_vi_alnum(self.buf.next_char());
                self.buf.move_by(1);
                while !self.at_end() {
                    let next = self.buf.next_char();
                    let same_kind = if alnum {
                        Self::is_vi_alnum(next)
                    } else {
                        !Self::is_vi_alnum(next) && !Self::is_whitespace(next)
                    };
                    if !same_kind {
                        break;
                    }
                    self.buf.move_by(1);
                }
            }
        }
        if !self.at_end() && self.is_in_vi_move_operation() {
            self.buf.move_by(1);
        }
        true
    }

    pub(super) fn vi_forward_blank_word_end(&mut self) -> bool {
        if self.count < 0 {
            return false;
        }
        let mut count = self.count;
        while count > 0 {
            count -= 1;
            while !self.at_end() {
                self.buf.move_by(1);
                if !Self::is_whitespace(self.buf.curr_char()) {
                    break;
                }
            }
            while !self.at_end() {
                self.buf.move_by(1);
                if Self::is_whitespace(self.buf.curr_char()) {
                    break;
                }
            }
        }
        true
    }

    pub(super) fn vi_backward_word(&mut self) -> bool {
        if self.count < 0 {
            return self.call_neg(Self::backward_word);
        }
        let mut count = self.count;
        while count > 0 {
            count -= 1;
            let mut newlines = 0;
            while self.buf.cursor() > 0 {
                self.buf.move_by(-1);
                if !Self::is_whitespace(self.buf.curr_char()) {
                    break;
                }
                newlines += usize::from(self.buf.curr_char() == Some('\n'));
                if newlines == 2 {
                    self.buf.move_by(1);
                    break;
                }
            }
            if self.buf.cursor() > 0 {
                let alnum = Self::is_vi_alnum(self.buf.curr_char());
                while self.buf.cursor() > 0 {
                    let prev = self.buf.prev_char();
                    let same_kind = if alnum {
                        Self::is_vi_alnum(prev)
                    } else {
                        !Self::is_vi_alnum(prev) && !Self::is_whitespace(prev)
                    };
                    if !same_kind {
                        break;
                    }
                    self.buf.move_by(-1);
                }
            }
        }
        true
    }

    pub(super) fn vi_backward_blank_word(&mut self) -> bool {
        if self.count < 0 {
            return self.call_neg(Self::vi_forward_blank_word);
        }
        let mut count = self.count;
        while count > 0 {
            count -= 1;
            while self.buf.cursor() > 0 {
                self.buf.move_by(-1);
                if !Self::is_whitespace(self.buf.curr_char()) {
                    break;
                }
            }
            while self.buf.cursor() > 0 {
                self.buf.move_by(-1);
                if Self::is_whitespace(self.buf.curr_char()) {
                    break;
                }
            }
        }
        true
    }

    pub(super) fn vi_backward_word_end(&mut self) -> bool {
        if self.count < 0 {
            return self.call_neg(Self::vi_forward_word_end);
        }
        let mut count = self.count;
        while count > 0 && self.buf.cursor() > 1 {
            count -= 1;
            // 1: on an alphanumeric word, 2: on punctuation, 0: on whitespace.
            let start = if Self::is_vi_alnum(self.buf.curr_char()) {
                1
            } else if !Self::is_whitespace(self.buf.curr_char()) {
                2
            } else {
                0
            };
            while self.buf.cursor() > 0 {
                let curr = self.buf.curr_char();
                let mut same = start != 1 && Self::is_whitespace(curr);
                if start != 0 {
                    same |= Self::is_vi_alnum(curr);
                }
                if same == (start == 2) {
                    break;
                }
                self.buf.move_by(-1);
            }
            while self.buf.cursor() > 0 && Self::is_whitespace(self.buf.curr_char()) {
                self.buf.move_by(-1);
            }
        }
        true
    }

    pub(super) fn vi_backward_blank_word_end(&mut self) -> bool {
        if self.count < 0 {
            return self.call_neg(Self::vi_forward_blank_word_end);
        }
        let mut count = self.count;
        while count > 0 {
            count -= 1;
            while self.buf.cursor() > 0 && !Self::is_whitespace(self.buf.curr_char()) {
                self.buf.move_by(-1);
            }
            while self.buf.cursor() > 0 && Self::is_whitespace(self.buf.curr_char()) {
                self.buf.move_by(-1);
            }
        }
        true
    }

    pub(super) fn beginning_of_line(&mut self) -> bool {
        let mut count = self.count;
        while count > 0 {
            count -= 1;
            while self.buf.move_by(-1) == -1 && self.buf.prev_char() != Some('\n') {}
        }
        true
    }

    pub(super) fn end_of_line(&mut self) -> bool {
        let mut count = self.count;
        while count > 0 {
            count -= 1;
            while self.buf.move_by(1) == 1 && self.buf.curr_char() != Some('\n') {}
        }
        true
    }

    pub(super) fn vi_beginning_of_line(&mut self) -> bool {
        self.buf.set_cursor(self.find_bol());
        true
    }

    /// Onto the last char of the line, `count - 1` lines down.
    pub(super) fn vi_end_of_line(&mut self) -> bool {
        if self.count < 0 {
            return false;
        }
        let mut count = self.count;
        while count > 0 {
            count -= 1;
            self.buf.set_cursor(self.find_eol() + 1);
        }
        self.buf.move_by(-1);
        true
    }

    pub(super) fn vi_first_non_blank(&mut self) -> bool {
        self.buf.set_cursor(self.find_bol());
        while !self.at_end() && Self::is_whitespace(self.buf.curr_char()) {
            self.buf.move_by(1);
        }
        true
    }

    /// To column `count` (1 based) of the current line, or its end if shorter.
    pub(super) fn vi_goto_column(&mut self) -> bool {
        if self.count < 1 {
            return false;
        }
        let bol = self.find_bol();
        let eol = self.find_eol();
        let column = usize::try_from(self.count - 1).unwrap_or(0);
        self.buf.set_cursor((bol + column).min(eol));
        true
    }

    pub(super) fn up_line(&mut self) -> bool {
        let mut count = self.count;
        while count > 0 {
            count -= 1;
            if !self.buf.up() {
                return false;
            }
        }
        true
    }

    pub(super) fn down_line(&mut self) -> bool {
        let mut count = self.count;
        while count > 0 {
            count -= 1;
            if !self.buf.down() {
                return false;
            }
        }
        true
    }

    /// Read the char to find. [`None`] when the user cancelled with the `send-break`
    /// key, or the read ended.
    fn vi_get_key(&mut self) -> Option<char> {
        let ch = self.read_character()?;
        let cancels = self
            .key_maps
            .get(MAIN)
            .and_then(|it| it.get(ch.encode_utf8(&mut [0; 4])))
            .is_some_and(|it| it.is(WidgetName::SendBreak));
        (!cancels).then_some(ch)
    }

    fn start_find(&mut self, direction: isize, tail: isize) -> bool {
        let Some(ch) = self.vi_get_key() else {
            return false;
        };
        self.find_char = Some(ch);
        self.find_dir = direction;
        self.find_tail = tail;
        self.vi_find_char(false)
    }

    pub(super) fn vi_find_next_char(&mut self) -> bool { self.start_find(1, 0) }

    pub(super) fn vi_find_prev_char(&mut self) -> bool { self.start_find(-1, 0) }

    pub(super) fn vi_find_next_char_skip(&mut self) -> bool { self.start_find(1, -1) }

    pub(super) fn vi_find_prev_char_skip(&mut self) -> bool { self.start_find(-1, 1) }

    pub(super) fn vi_repeat_find(&mut self) -> bool { self.vi_find_char(true) }

    pub(super) fn vi_rev_repeat_find(&mut self) -> bool {
        if self.count < 0 {
            return self.call_neg(|it| it.vi_find_char(true));
        }
        self.find_tail = -self.find_tail;
        self.find_dir = -self.find_dir;
        let it = self.vi_find_char(true);
        self.find_tail = -self.find_tail;
        self.find_dir = -self.find_dir;
        it
    }

    /// Move onto (or, with a tail, next to) the `count`th occurrence of the find char
    /// on the current line.
    fn vi_find_char(&mut self, repeat: bool) -> bool {
        let Some(find_char) = self.find_char else {
            return false;
        };
        if self.find_dir == 0 {
            return false;
        }
        if self.count < 0 {
            return self.call_neg(Self::vi_rev_repeat_find);
        }
        if repeat && self.find_tail != 0 {
            if self.find_dir > 0 {
                if !self.at_end() && self.buf.next_char() == Some(find_char) {
                    self.buf.move_by(1);
                }
            } else if self.buf.cursor() > 0 && self.buf.prev_char() == Some(find_char) {
                self.buf.move_by(-1);
            }
        }
        let cursor = self.buf.cursor();
        let mut count = self.count;
        while count > 0 {
            count -= 1;
            loop {
                self.buf.move_by(self.find_dir);
                let curr = self.buf.curr_char();
                if self.buf.cursor() == 0
                    || self.at_end()
                    || curr == Some(find_char)
                    || curr == Some('\n')
                {
                    break;
                }
            }
            if self.buf.cursor() == 0 || self.at_end() || self.buf.curr_char() == Some('\n') {
                self.buf.set_cursor(cursor);
                return false;
            }
        }
        if self.find_tail != 0 {
            self.buf.move_by(self.find_tail);
        }
        if self.find_dir == 1 && self.is_in_vi_move_operation() {
            self.buf.move_by(1);
        }
        true
    }

    /// Emacs `C-]`: read a char and move to its next occurrence, `count` times.
    pub(super) fn character_search(&mut self) -> bool {
        if self.count < 0 {
            return self.call_neg(Self::character_search_backward);
        }
        let Some(target) = self.read_character() else {
            return false;
        };
        let mut position = self.buf.cursor();
        for _ in 0..self.count {
            match (position + 1..self.buf.len()).find(|it| self.buf.at_char(*it) == Some(target))
            {
                Some(found) => position = found,
                None => return false,
            }
        }
        self.buf.set_cursor(position);
        true
    }

    pub(super) fn character_search_backward(&mut self) -> bool {
        if self.count < 0 {
            return self.call_neg(Self::character_search);
        }
        let Some(target) = self.read_character() else {
            return false;
        };
        let mut position = self.buf.cursor();
        for _ in 0..self.count {
            match (0..position).rev().find(|it| self.buf.at_char(*it) == Some(target)) {
                Some(found) => position = found,
                None => return false,
            }
        }
        self.buf.set_cursor(position);
        true
    }

    /// Jump to the bracket matching the one under the cursor.
    pub(super) fn vi_match_bracket(&mut self) -> bool {
        let mut position = self.buf.cursor();
        let Some(kind) = self.buf.curr_char().and_then(bracket_type) else {
            return false;
        };
        let step: isize = if kind < 0 { -1 } else { 1 };
        let mut depth = 1;
        while depth > 0 {
            match position.checked_add_signed(step) {
                Some(next) if next < self.buf.len() => position = next,
                _ => return false,
            }
            match self.buf.at_char(position).and_then(bracket_type) {
                Some(it) if it == kind => depth += 1,
                Some(it) if it == -kind => depth -= 1,
                _ => {}
            }
        }
        if step > 0 && self.is_in_vi_move_operation() {
            position += 1;
        }
        self.buf.set_cursor(position);
        true
    }
}

/// Positive for openers, negative for the matching closers.
pub(super) fn bracket_type(ch: char) -> Option<i8> {
    match ch {
        '[' => Some(1),
        ']' => Some(-1),
        '{' => Some(2),
        '}' => Some(-2),
        '(' => Some(3),
        ')' => Some(-3),
        _ => None,
    }
}

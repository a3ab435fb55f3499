// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{LineReader, ReaderState, RegionType};
use crate::lock_ignoring_poison;

/// Multiplier applied by each `universal-argument`.
const UNIVERSAL_ARGUMENT: isize = 4;

impl LineReader {
    // Arguments.

    pub(super) fn digit_argument(&mut self) -> bool {
        let Some(digit) = self.last_binding().chars().last().and_then(|it| it.to_digit(10))
        else {
            return false;
        };
        let digit = isize::try_from(digit).unwrap_or(0);
        self.repeat_count = self.repeat_count.saturating_mul(10).saturating_add(digit);
        self.is_arg_digit = true;
        true
    }

    pub(super) fn vi_arg_digit(&mut self) -> bool { self.digit_argument() }

    /// `0` starts the line, unless a count is being typed.
    pub(super) fn vi_digit_or_beginning_of_line(&mut self) -> bool {
        if self.repeat_count > 0 {
            self.digit_argument()
        } else {
            self.vi_beginning_of_line()
        }
    }

    pub(super) fn neg_argument(&mut self) -> bool {
        self.mult = -self.mult;
        self.is_arg_digit = true;
        true
    }

    pub(super) fn universal_argument(&mut self) -> bool {
        self.mult = self.mult.saturating_mul(UNIVERSAL_ARGUMENT);
        self.is_arg_digit = true;
        true
    }

    // Region.

    pub(super) fn set_mark_command(&mut self) -> bool {
        if self.count < 0 {
            self.region_active = RegionType::None;
            return true;
        }
        self.region_mark = self.buf.cursor();
        self.region_active = RegionType::Char;
        true
    }

    /// Swap the cursor and the mark. A zero count only shows the region.
    pub(super) fn exchange_point_and_mark(&mut self) -> bool {
        if self.count == 0 {
            self.region_active = RegionType::Char;
            return true;
        }
        let mark = self.region_mark;
        self.region_mark = self.buf.cursor();
        self.buf.set_cursor(mark);
        if self.buf.cursor() != mark {
            return false;
        }
        if self.count > 0 {
            self.region_active = RegionType::Char;
        }
        true
    }

    /// Toggle a char region. While an operator is pending, `v` makes its motion
    /// charwise instead.
    pub(super) fn visual_mode(&mut self) -> bool {
        if self.is_in_vi_move_operation() {
            self.is_arg_digit = true;
            self.force_line = false;
            self.force_char = !self.force_char;
            return true;
        }
        self.region_active = match self.region_active {
            RegionType::None | RegionType::Paste => {
                self.region_mark = self.buf.cursor();
                RegionType::Char
            }
            RegionType::Char => RegionType::None,
            RegionType::Line => RegionType::Char,
        };
        true
    }

    pub(super) fn visual_line_mode(&mut self) -> bool {
        if self.is_in_vi_move_operation() {
            self.is_arg_digit = true;
            self.force_char = false;
            self.force_line = !self.force_line;
            return true;
        }
        self.region_active = match self.region_active {
            RegionType::None | RegionType::Paste => {
                self.region_mark = self.buf.cursor();
                RegionType::Line
            }
            RegionType::Line => RegionType::None,
            RegionType::Char => RegionType::Line,
        };
        true
    }

    pub(super) fn deactivate_region(&mut self) -> bool {
        self.region_active = RegionType::None;
        true
    }

    // Undo.

    pub(super) fn undo(&mut self) -> bool {
        self.is_undo = true;
        match self.undo.undo() {
            Some(state) => {
                self.buf.copy_from(state);
                true
            }
            None => false,
        }
    }

    pub(super) fn redo(&mut self) -> bool {
        self.is_undo = true;
        match self.undo.redo() {
            Some(state) => {
                self.buf.copy_from(state);
                true
            }
            None => false,
        }
    }

    pub(super) fn vi_undo_change(&mut self) -> bool {
        if !self.undo() {
            return false;
        }
        if self.is_in_vi_cmd_mode() && self.buf.cursor() == self.buf.len() {
            self.buf.move_by(-1);
        }
        true
    }

    // Terminal.

    pub(super) fn clear_screen(&mut self) -> bool {
        let result = lock_ignoring_poison(&self.display).renderer.clear_screen();
        match result {
            Ok(()) => true,
            Err(error) => {
                self.io_error = Some(error);
                false
            }
        }
    }

    /// Drop the whole line and ring the bell.
    pub(super) fn send_break(&mut self) -> bool {
        self.buf.clear();
        self.region_active = RegionType::None;
        false
    }

    pub(super) fn end_of_file(&mut self) -> bool {
        self.state = ReaderState::Eof;
        true
    }

    pub(super) fn delete_char_or_eof(&mut self) -> bool {
        if self.buf.is_empty() {
            return self.end_of_file();
        }
        self.delete_char()
    }

    /// The caller takes over the line (eg: to open it in an editor). The read returns
    /// an empty line that stays out of history.
    pub(super) fn edit_and_execute_command(&mut self) -> bool {
        self.state = ReaderState::Ignore;
        true
    }

    pub(super) fn undefined_key(&mut self) -> bool { false }

    /// Describe the char under the cursor and where the cursor is, in the status line.
    pub(super) fn what_cursor_position(&mut self) -> bool {
        let cursor = self.buf.cursor();
        let described = match self.buf.curr_char() {
            Some(ch) => {
                let code = u32::from(ch);
                let name = match ch {
                    ' ' => "SPC".to_owned(),
                    '\n' => "LFD".to_owned(),
                    '\x7f' => "^?".to_owned(),
                    _ if code < 32 => {
                        let shown = char::from_u32(code + u32::from('@')).unwrap_or('?');
                        format!("^{shown}")
                    }
                    _ => ch.to_string(),
                };
                format!("Char: {name} (0{code:o} {code} 0x{code:x} )")
            }
            None => "EOF".to_owned(),
        };
        self.post = Some(format!(
            "{described}   point {} of {}",
            cursor + 1,
            self.buf.len() + 1
        ));
        true
    }

    /// Run the keys of the last binding again, lower cased.
    pub(super) fn do_lowercase_version(&mut self) -> bool {
        let keys = self.last_binding().to_lowercase();
        self.reader.run_macro(&keys);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{KeyInput, RecordingRenderer, ScriptedKeySource, TextBuffer};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn reader_with(text: &str) -> LineReader {
        let mut it = LineReader::new(
            Box::new(ScriptedKeySource::new()),
            Box::new(RecordingRenderer::new()),
        );
        it.buf = TextBuffer::new_with(text);
        it
    }

    #[test]
    fn test_undo_and_redo_walk_snapshots() {
        let mut it = reader_with("");
        it.undo.new_state(it.buf.copy());
        assert!(!it.undo());
        assert!(it.is_undo);

        it.buf.write("one");
        it.undo.new_state(it.buf.copy());
        it.buf.write(" two");
        it.undo.new_state(it.buf.copy());

        assert!(it.undo());
        assert_eq!(it.buf.to_string(), "one");
        assert!(it.undo());
        assert_eq!(it.buf.to_string(), "");
        assert!(it.redo());
        assert_eq!(it.buf.to_string(), "one");
        assert!(it.redo());
        assert!(!it.redo());
        assert_eq!(it.buf.to_string(), "one two");
    }

    #[test]
    fn test_argument_widgets_accumulate() {
        let mut it = reader_with("");
        it.reader.run_macro("\x1b1");
        let _unused = it.read_binding(None);
        assert!(it.digit_argument());
        it.reader.run_macro("\x1b2");
        let _unused = it.read_binding(None);
        assert!(it.digit_argument());
        assert_eq!(it.repeat_count, 12);
        assert!(it.is_arg_digit);

        assert!(it.neg_argument());
        assert!(it.universal_argument());
        assert_eq!(it.mult, -4);
    }

    #[test]
    fn test_zero_starts_line_without_count() {
        let mut it = reader_with("abc");
        assert!(it.vi_digit_or_beginning_of_line());
        assert_eq!(it.buf.cursor(), 0);
        assert_eq!(it.repeat_count, 0);
    }

    #[test]
    fn test_mark_and_exchange() {
        let mut it = reader_with("hello world");
        it.buf.set_cursor(2);
        assert!(it.set_mark_command());
        assert_eq!(it.region_active, RegionType::Char);
        it.buf.set_cursor(8);
        assert!(it.exchange_point_and_mark());
        assert_eq!(it.buf.cursor(), 2);
        assert_eq!(it.region_mark, 8);
        assert_eq!(it.region_range(), Some(2..8));
    }

    #[test]
    fn test_visual_modes_toggle() {
        let mut it = reader_with("abc");
        assert!(it.visual_mode());
        assert_eq!(it.region_active, RegionType::Char);
        assert!(it.visual_line_mode());
        assert_eq!(it.region_active, RegionType::Line);
        assert!(it.visual_line_mode());
        assert_eq!(it.region_active, RegionType::None);
        assert!(it.visual_mode());
        assert!(it.deactivate_region());
        assert_eq!(it.region_active, RegionType::None);
    }

    #[test]
    fn test_end_of_input_widgets() {
        let mut it = reader_with("ab");
        it.buf.set_cursor(0);
        assert!(it.delete_char_or_eof());
        assert_eq!(it.buf.to_string(), "b");
        assert_eq!(it.state, ReaderState::Normal);

        let mut it = reader_with("");
        assert!(it.delete_char_or_eof());
        assert_eq!(it.state, ReaderState::Eof);

        let mut it = reader_with("ab");
        assert!(it.edit_and_execute_command());
        assert_eq!(it.state, ReaderState::Ignore);
    }

    #[test]
    fn test_send_break_drops_line() {
        let mut it = reader_with("partial");
        assert!(!it.send_break());
        assert!(it.buf.is_empty());
    }

    #[test_case("a b", 0, "Char: a (0141 97 0x61 )   point 1 of 4" ; "letter")]
    #[test_case("a b", 1, "Char: SPC (040 32 0x20 )   point 2 of 4" ; "space")]
    #[test_case("\x01", 0, "Char: ^A (01 1 0x1 )   point 1 of 2" ; "control")]
    #[test_case("ab", 2, "EOF   point 3 of 3" ; "end")]
    fn test_what_cursor_position(text: &str, cursor: usize, expected: &str) {
        let mut it = reader_with(text);
        it.buf.set_cursor(cursor);
        assert!(it.what_cursor_position());
        assert_eq!(it.post.as_deref(), Some(expected));
    }

    #[test]
    fn test_lowercase_version_replays_keys() {
        let mut it = reader_with("");
        it.reader.run_macro("\x1bX");
        let _unused = it.read_binding(None);
        assert!(it.do_lowercase_version());
        assert_eq!(it.reader.read_character().ok(), Some(KeyInput::Char('\x1b')));
        assert_eq!(it.reader.read_character().ok(), Some(KeyInput::Char('x')));
    }

    #[test]
    fn test_clear_screen_reaches_renderer() {
        let renderer = RecordingRenderer::new();
        let mut it = LineReader::new(
            Box::new(ScriptedKeySource::new()),
            Box::new(renderer.clone()),
        );
        assert!(it.clear_screen());
        assert_eq!(renderer.record().clear_screens, 1);
    }
}

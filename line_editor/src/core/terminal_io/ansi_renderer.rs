// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::{self, Write};

use crossterm::{QueueableCommand, cursor,
                terminal::{self, Clear,
                           ClearType::{All, FromCursorDown}}};

use super::{RenderFrame, Renderer, Size};
use crate::{display_width, ok};

/// Paints frames by rewriting the rows it painted last time: move up to the first row,
/// clear down, write everything again, then move the cursor into place. Lines longer
/// than the terminal wrap, and the row math accounts for that.
#[derive(Debug)]
pub struct AnsiRenderer<W: Write + Send> {
    term: W,
    size: Size,
    /// Physical row of the cursor, counted from the first row of the frame.
    cursor_row: usize,
    /// Last physical row that the frame painted.
    end_row: usize,
}

impl AnsiRenderer<io::Stdout> {
    /// Render to stdout, sized to the current terminal.
    #[must_use]
    pub fn stdout() -> Self {
        let size = terminal::size()
            .map(|(columns, rows)| Size::new(columns, rows))
            .unwrap_or_default();
        Self::new(io::stdout(), size)
    }
}

impl<W: Write + Send> AnsiRenderer<W> {
    pub fn new(term: W, size: Size) -> Self {
        Self {
            term,
            size,
            cursor_row: 0,
            end_row: 0,
        }
    }

    /// Rows that a line of `width` cells takes up.
    fn line_height(&self, width: usize) -> usize {
        width.saturating_sub(1) / self.size.width() + 1
    }

    fn move_to_beginning(&mut self) -> io::Result<()> {
        self.term.queue(cursor::MoveToColumn(0))?;
        if self.cursor_row > 0 {
            self.term.queue(cursor::MoveUp(to_u16(self.cursor_row)))?;
        }
        self.cursor_row = 0;
        ok!()
    }

    /// Write `text` so that newlines also return the carriage, which raw mode does not
    /// do by itself.
    fn write_lines(&mut self, text: &str) -> io::Result<()> {
        for (index, line) in text.split('\n').enumerate() {
            if index > 0 {
                self.term.write_all(b"\r\n")?;
            }
            self.term.write_all(line.as_bytes())?;
        }
        ok!()
    }
}

fn to_u16(value: usize) -> u16 { u16::try_from(value).unwrap_or(u16::MAX) }

impl<W: Write + Send> Renderer for AnsiRenderer<W> {
    fn render(&mut self, frame: &RenderFrame) -> io::Result<()> {
        self.move_to_beginning()?;
        self.term.queue(Clear(FromCursorDown))?;

        let mut rows_before_cursor = 0;
        let mut total_rows = 0;
        for (index, line) in frame.lines.iter().enumerate() {
            if index > 0 {
                self.term.write_all(b"\r\n")?;
            }
            self.term.write_all(line.as_bytes())?;
            if index < frame.cursor_line {
                rows_before_cursor += self.line_height(display_width(line));
            }
            total_rows += self.line_height(display_width(line));
        }
        if let Some(post) = &frame.post {
            self.term.write_all(b"\r\n")?;
            self.write_lines(post)?;
            total_rows += post
                .split('\n')
                .map(|it| self.line_height(display_width(it)))
                .sum::<usize>();
        }
        self.end_row = total_rows.saturating_sub(1);

        let width = self.size.width();
        let target_row = rows_before_cursor + frame.cursor_column / width;
        let target_column = frame.cursor_column % width;
        // A cursor just past a line that fills the last column sits on a row that was
        // never written.
        while target_row > self.end_row {
            self.term.write_all(b"\r\n")?;
            self.end_row += 1;
        }
        if self.end_row > target_row {
            self.term.queue(cursor::MoveUp(to_u16(self.end_row - target_row)))?;
        }
        self.term.queue(cursor::MoveToColumn(to_u16(target_column)))?;
        self.cursor_row = target_row;

        self.term.flush()
    }

    fn beep(&mut self) -> io::Result<()> {
        self.term.write_all(b"\x07")?;
        self.term.flush()
    }

    fn size(&self) -> Size { self.size }

    fn set_size(&mut self, size: Size) { self.size = size; }

    fn print_above(&mut self, text: &str) -> io::Result<()> {
        self.erase()?;
        self.write_lines(text)?;
        if !text.ends_with('\n') {
            self.term.write_all(b"\r\n")?;
        }
        self.term.queue(cursor::MoveToColumn(0))?;
        self.term.flush()
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        self.term.queue(Clear(All))?.queue(cursor::MoveTo(0, 0))?;
        self.cursor_row = 0;
        self.end_row = 0;
        self.term.flush()
    }

    fn erase(&mut self) -> io::Result<()> {
        self.move_to_beginning()?;
        self.term.queue(Clear(FromCursorDown))?;
        self.end_row = 0;
        self.term.flush()
    }

    fn finish_line(&mut self) -> io::Result<()> {
        if self.end_row > self.cursor_row {
            self.term
                .queue(cursor::MoveDown(to_u16(self.end_row - self.cursor_row)))?;
        }
        self.term.write_all(b"\r\n")?;
        self.cursor_row = 0;
        self.end_row = 0;
        self.term.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StdoutMock;
    use pretty_assertions::assert_eq;

    fn frame(lines: &[&str], cursor_line: usize, cursor_column: usize) -> RenderFrame {
        RenderFrame {
            lines: lines.iter().map(ToString::to_string).collect(),
            cursor_line,
            cursor_column,
            ..Default::default()
        }
    }

    #[test]
    fn test_render_writes_prompt_and_line() {
        let stdout_mock = StdoutMock::new();
        let mut renderer = AnsiRenderer::new(stdout_mock.clone(), Size::new(80, 24));
        renderer.render(&frame(&["> hello"], 0, 4)).ok();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string_strip_ansi(), "> hello");
        assert_eq!(renderer.cursor_row, 0);
    }

    #[test]
    fn test_wrapped_line_tracks_rows() {
        let stdout_mock = StdoutMock::new();
        let mut renderer = AnsiRenderer::new(stdout_mock.clone(), Size::new(10, 24));
        // 25 cells wrap onto 3 rows, cursor at cell 12 is on the second.
        renderer.render(&frame(&["0123456789012345678901234"], 0, 12)).ok();
        assert_eq!(renderer.end_row, 2);
        assert_eq!(renderer.cursor_row, 1);
        // The next render starts by moving back up to the first row.
        renderer.render(&frame(&["x"], 0, 1)).ok();
        assert!(stdout_mock.get_copy_of_buffer_as_string().contains("\x1b[1A"));
        assert_eq!(renderer.end_row, 0);
    }

    // Stripping ANSI also drops the carriage returns.
    #[test]
    fn test_multi_line_and_post() {
        let stdout_mock = StdoutMock::new();
        let mut renderer = AnsiRenderer::new(stdout_mock.clone(), Size::new(80, 24));
        let mut it = frame(&["> (a", "> b"], 1, 3);
        it.post = Some("one  two\nthree".into());
        renderer.render(&it).ok();
        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string_strip_ansi(),
            "> (a\n> b\none  two\nthree"
        );
        assert_eq!(renderer.end_row, 3);
        assert_eq!(renderer.cursor_row, 1);
    }

    #[test]
    fn test_print_above_and_finish() {
        let stdout_mock = StdoutMock::new();
        let mut renderer = AnsiRenderer::new(stdout_mock.clone(), Size::new(80, 24));
        renderer.render(&frame(&["> ab"], 0, 4)).ok();
        renderer.print_above("log line").ok();
        renderer.render(&frame(&["> ab"], 0, 4)).ok();
        renderer.finish_line().ok();
        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string_strip_ansi(),
            "> ablog line\n> ab\n"
        );
        assert_eq!(renderer.cursor_row, 0);
    }
}

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io, ops::Range};

/// Terminal size in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub columns: u16,
    pub rows: u16,
}

impl Default for Size {
    fn default() -> Self {
        Self {
            columns: 80,
            rows: 24,
        }
    }
}

impl Size {
    #[must_use]
    pub fn new(columns: u16, rows: u16) -> Self { Self { columns, rows } }

    /// Columns as a `usize`, never zero.
    #[must_use]
    pub fn width(self) -> usize { usize::from(self.columns.max(1)) }

    #[must_use]
    pub fn height(self) -> usize { usize::from(self.rows.max(1)) }
}

/// Everything a [`Renderer`] needs to paint the prompt and the line being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderFrame {
    /// Primary prompt, may contain ANSI styling.
    pub prompt: String,
    /// Buffer text after masking, unstyled.
    pub buffer: String,
    /// Cursor as a char offset into `buffer`.
    pub cursor: usize,
    /// Display lines. The first starts with the prompt, the others with the secondary
    /// prompt. Highlighting and the region are already applied.
    pub lines: Vec<String>,
    /// Cursor position within `lines`, the column in display cells.
    pub cursor_line: usize,
    pub cursor_column: usize,
    /// Status text shown below the lines: completion lists, the search prompt,
    /// messages.
    pub post: Option<String>,
    /// Highlighted region as char offsets into `buffer`.
    pub region: Option<Range<usize>>,
}

/// Paints the editing state. The engine calls [`Renderer::render`] after every widget.
pub trait Renderer: Send {
    /// Replace whatever the last frame painted with `frame`.
    ///
    /// # Errors
    ///
    /// I/O errors of the terminal.
    fn render(&mut self, frame: &RenderFrame) -> io::Result<()>;

    /// # Errors
    ///
    /// I/O errors of the terminal.
    fn beep(&mut self) -> io::Result<()>;

    fn size(&self) -> Size;

    fn set_size(&mut self, size: Size);

    /// Erase the last frame and print `text` in its place. The caller repaints the
    /// frame afterwards if a read is still active.
    ///
    /// # Errors
    ///
    /// I/O errors of the terminal.
    fn print_above(&mut self, text: &str) -> io::Result<()>;

    /// # Errors
    ///
    /// I/O errors of the terminal.
    fn clear_screen(&mut self) -> io::Result<()>;

    /// Erase the last frame without printing anything.
    ///
    /// # Errors
    ///
    /// I/O errors of the terminal.
    fn erase(&mut self) -> io::Result<()>;

    /// Leave the last frame on screen and move to a fresh line below it.
    ///
    /// # Errors
    ///
    /// I/O errors of the terminal.
    fn finish_line(&mut self) -> io::Result<()>;
}

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Hooks the host plugs into the reader besides the [`crate::Completer`].

use crate::CommonResult;

/// Styles the buffer for display. Purely cosmetic: the result must show the same chars
/// as `buffer`, only ANSI styling may be added. Errors are logged and the buffer is then
/// shown unstyled.
pub trait Highlighter: Send + Sync {
    /// # Errors
    ///
    /// Any error the host runs into, eg: a broken syntax definition.
    fn highlight(&self, buffer: &str) -> CommonResult<String>;
}

impl<F> Highlighter for F
where
    F: Fn(&str) -> CommonResult<String> + Send + Sync,
{
    fn highlight(&self, buffer: &str) -> CommonResult<String> { self(buffer) }
}

/// Changes what is shown, and what is stored in history, for a line. Used for password
/// prompts and for lines that should not be remembered.
pub trait MaskingCallback: Send + Sync {
    /// Text shown in place of `line`. Must have the same number of chars.
    fn display(&self, line: &str) -> String;

    /// Text added to history for the accepted `line`. [`None`] keeps it out of history.
    fn history(&self, line: &str) -> Option<String>;
}

/// Shows every char as `mask`, and keeps the line out of history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleMaskingCallback {
    pub mask: char,
}

impl MaskingCallback for SimpleMaskingCallback {
    fn display(&self, line: &str) -> String { line.chars().map(|_| self.mask).collect() }

    fn history(&self, _line: &str) -> Option<String> { None }
}

/// Closure form: `display` comes from the closure, history keeps the line as is.
impl<F> MaskingCallback for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn display(&self, line: &str) -> String { self(line) }

    fn history(&self, line: &str) -> Option<String> { Some(line.to_owned()) }
}

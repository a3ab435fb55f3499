// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Why a line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum ParseError {
    /// The line ends inside a quote, after an escape, or with open brackets. This is not
    /// a hard error: `accept-line` inserts a continuation line and keeps editing.
    #[error("{message}")]
    #[diagnostic(code(r3bl_line_editor::parser::incomplete))]
    Incomplete {
        message: String,
        /// What would complete the line: `"quote"`, `"dquote"`, `"newline"`, or
        /// `"add: )]"` for missing closers.
        missing: String,
        /// Brackets still open before the cursor.
        open_brackets: usize,
        /// Closer for the innermost bracket open before the cursor.
        next_closing: Option<char>,
    },

    /// A closing bracket without a matching opener. Continuing the line can't fix this,
    /// so the line is accepted as is.
    #[error("Missing opening bracket for '{missing_opening}'")]
    #[diagnostic(code(r3bl_line_editor::parser::syntax))]
    Syntax { missing_opening: char },
}

impl ParseError {
    #[must_use]
    pub fn is_incomplete(&self) -> bool { matches!(self, ParseError::Incomplete { .. }) }
}

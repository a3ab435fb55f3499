// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io;

/// Why [`crate::LineReader::read_line`] did not return a line.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ReadlineError {
    /// The end of file key on an empty line, or the key source ran out of input.
    #[error("end of file")]
    #[diagnostic(code(r3bl_line_editor::readline::end_of_file))]
    EndOfFile { partial_line: String },

    /// The interrupt key, or [`crate::LineReaderHandle::interrupt`] from another
    /// thread. Carries the line as it was.
    #[error("interrupted")]
    #[diagnostic(code(r3bl_line_editor::readline::user_interrupt))]
    UserInterrupt { partial_line: String },

    /// An internal I/O error occurred.
    #[error(transparent)]
    #[diagnostic(code(r3bl_line_editor::readline::io))]
    IO(#[from] io::Error),

    /// A thread panicked while holding the display lock.
    #[error("display lock poisoned")]
    #[diagnostic(code(r3bl_line_editor::readline::poisoned))]
    Poisoned,
}

impl ReadlineError {
    /// The text that was in the buffer when reading stopped, if any.
    #[must_use]
    pub fn partial_line(&self) -> Option<&str> {
        match self {
            ReadlineError::EndOfFile { partial_line }
            | ReadlineError::UserInterrupt { partial_line } => Some(partial_line),
            ReadlineError::IO(_) | ReadlineError::Poisoned => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_line_and_display() {
        let it = ReadlineError::UserInterrupt {
            partial_line: "ls -".into(),
        };
        assert_eq!(it.partial_line(), Some("ls -"));
        assert_eq!(it.to_string(), "interrupted");
        let it = ReadlineError::from(io::Error::other("gone"));
        assert_eq!(it.partial_line(), None);
        assert_eq!(it.to_string(), "gone");
    }
}

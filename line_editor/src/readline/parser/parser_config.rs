// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use serde::{Deserialize, Serialize};

use crate::InlineVec;

/// What the line is being parsed for. Only [`ParseContext::AcceptLine`] and
/// [`ParseContext::SecondaryPrompt`] report incomplete input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseContext {
    AcceptLine,
    Complete,
    SecondaryPrompt,
    /// Keep quotes and escapes in the words, for callers that re-join them.
    SplitLine,
}

impl ParseContext {
    #[must_use]
    pub fn reports_incomplete(self) -> bool {
        matches!(self, ParseContext::AcceptLine | ParseContext::SecondaryPrompt)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub quote_chars: InlineVec<char>,
    pub escape_chars: InlineVec<char>,
    /// `(opener, closer)` pairs. Empty disables bracket checking.
    pub bracket_pairs: Vec<(char, char)>,
    pub eof_on_unclosed_quote: bool,
    pub eof_on_escaped_new_line: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            quote_chars: InlineVec::from_slice(&['\'', '"']),
            escape_chars: InlineVec::from_slice(&['\\']),
            bracket_pairs: vec![],
            eof_on_unclosed_quote: true,
            eof_on_escaped_new_line: true,
        }
    }
}

impl ParserConfig {
    /// Check `()`, `[]` and `{}`.
    #[must_use]
    pub fn with_default_brackets(mut self) -> Self {
        self.bracket_pairs = vec![('(', ')'), ('[', ']'), ('{', '}')];
        self
    }
}

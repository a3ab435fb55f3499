// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::InlineVec;

/// A view over the buffer text, split into shell-like words. Recomputed from the buffer
/// whenever it is needed, never stored across keystrokes.
///
/// There are two cursor measures for the word under the cursor:
/// - [`ParsedLine::word_cursor`] counts chars of the unescaped word value, which is what
///   completion candidates are matched against.
/// - [`ParsedLine::raw_word_cursor`] and [`ParsedLine::raw_word_length`] count chars of
///   the text as typed (quotes and escape chars included), which is the span completion
///   replaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub line: String,
    pub cursor: usize,
    pub words: Vec<String>,
    /// May be `words.len()` when the cursor sits in trailing whitespace.
    pub word_index: usize,
    pub word_cursor: usize,
    pub raw_word_cursor: usize,
    pub raw_word_length: usize,
    /// Quote that opened the current word and was not closed yet.
    pub opening_quote: Option<char>,
    pub(crate) quote_chars: InlineVec<char>,
    pub(crate) escape_chars: InlineVec<char>,
}

impl ParsedLine {
    /// The word under the cursor, or `""` between words.
    #[must_use]
    pub fn word(&self) -> &str {
        self.words.get(self.word_index).map_or("", String::as_str)
    }

    /// Part of the current word before the cursor.
    #[must_use]
    pub fn word_up_to_cursor(&self) -> String {
        self.word().chars().take(self.word_cursor).collect()
    }

    /// Buffer index where the raw text of the current word starts.
    #[must_use]
    pub fn raw_word_start(&self) -> usize { self.cursor - self.raw_word_cursor }

    /// Escape `candidate` so that it parses back into a single word. If the current word
    /// was opened with a quote, the quote is put back in front and, when `complete`, the
    /// closing quote is appended.
    #[must_use]
    pub fn escape(&self, candidate: &str, complete: bool) -> String {
        let is_quote = |ch: char| self.quote_chars.contains(&ch);
        let is_escape = |ch: char| self.escape_chars.contains(&ch);

        let middle_quotes = self.opening_quote.is_none() && candidate.chars().any(is_quote);
        let mut quote = self.opening_quote;
        let mut acc = String::with_capacity(candidate.len() + 2);

        if let Some(escape_char) = self.escape_chars.first().copied() {
            for ch in candidate.chars() {
                let needs_escape = match self.opening_quote {
                    // Inside quotes only escapes and the quote itself need escaping.
                    Some(opening) => is_escape(ch) || ch == opening,
                    None if middle_quotes => is_escape(ch),
                    None => ch.is_whitespace() || is_escape(ch) || is_quote(ch),
                };
                if needs_escape {
                    acc.push(escape_char);
                }
                acc.push(ch);
            }
        } else {
            acc.push_str(candidate);
            if quote.is_none() && !middle_quotes && candidate.chars().any(char::is_whitespace)
            {
                quote = Some('\'');
            }
        }

        match quote {
            Some(quote) => {
                let mut quoted = String::with_capacity(acc.len() + 2);
                quoted.push(quote);
                quoted.push_str(&acc);
                if complete {
                    quoted.push(quote);
                }
                quoted
            }
            None => acc,
        }
    }
}

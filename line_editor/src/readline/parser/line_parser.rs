// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{BracketChecker, ParseContext, ParseError, ParsedLine, ParserConfig};

/// Splits a line into words. The reader uses it to find the word to complete and to
/// decide whether an accepted line is complete or needs a continuation line.
pub trait LineParser: Send {
    /// # Errors
    ///
    /// Returns [`ParseError::Incomplete`] when `context` asks for validation and the
    /// line ends inside a quote, after an escape char, or with brackets left open.
    fn parse(
        &self,
        line: &str,
        cursor: usize,
        context: ParseContext,
    ) -> Result<ParsedLine, ParseError>;

    /// Escape chars are stripped from the accepted line when history expansion is on.
    fn is_escape_char(&self, ch: char) -> bool;
}

/// Shell-like word splitting: whitespace separated, `'` and `"` quotes, `\` escapes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultParser {
    pub config: ParserConfig,
}

impl DefaultParser {
    #[must_use]
    pub fn new(config: ParserConfig) -> Self { Self { config } }

    /// Is `chars[index]` an escape char that is not itself escaped?
    fn is_escape_at(&self, chars: &[char], index: usize) -> bool {
        if !self.config.escape_chars.contains(&chars[index]) {
            return false;
        }
        let preceding = chars[..index]
            .iter()
            .rev()
            .take_while(|it| self.config.escape_chars.contains(it))
            .count();
        preceding % 2 == 0
    }

    fn is_escaped(&self, chars: &[char], index: usize) -> bool {
        index > 0 && self.is_escape_at(chars, index - 1)
    }

    fn is_quote_at(&self, chars: &[char], index: usize) -> bool {
        self.config.quote_chars.contains(&chars[index]) && !self.is_escaped(chars, index)
    }

    fn is_delimiter_at(&self, chars: &[char], index: usize) -> bool {
        chars[index].is_whitespace() && !self.is_escaped(chars, index)
    }
}

impl LineParser for DefaultParser {
    fn parse(
        &self,
        line: &str,
        cursor: usize,
        context: ParseContext,
    ) -> Result<ParsedLine, ParseError> {
        let chars: Vec<char> = line.chars().collect();
        let len = chars.len();
        let cursor = cursor.min(len);
        let keep_quotes = context == ParseContext::SplitLine;

        let mut words: Vec<String> = vec![];
        let mut current = String::new();
        let mut word_index = 0;
        let mut word_cursor = 0;
        let mut raw_word_cursor: Option<usize> = None;
        let mut raw_word_length: Option<usize> = None;
        let mut raw_word_start = 0;
        let mut quote_start: Option<usize> = None;
        let mut quoted_word = false;
        let mut brackets = BracketChecker::new(&self.config.bracket_pairs, cursor);

        for (index, &ch) in chars.iter().enumerate() {
            if index == cursor {
                word_index = words.len();
                word_cursor = current.chars().count();
                raw_word_cursor = Some(index - raw_word_start);
            }

            if quote_start.is_none() && self.is_quote_at(&chars, index) {
                // Opening quote. On an empty word the quotes are dropped from the value;
                // in the middle of a word they are kept as literal chars.
                quote_start = Some(index);
                if current.is_empty() {
                    quoted_word = true;
                    if keep_quotes {
                        current.push(ch);
                    }
                } else {
                    current.push(ch);
                }
            } else if quote_start.is_some_and(|start| chars[start] == ch)
                && !self.is_escaped(&chars, index)
            {
                // Closing quote.
                if !quoted_word || keep_quotes {
                    current.push(ch);
                } else if raw_word_cursor.is_some() && raw_word_length.is_none() {
                    raw_word_length = Some(index - raw_word_start + 1);
                }
                quote_start = None;
                quoted_word = false;
            } else if quote_start.is_none() && self.is_delimiter_at(&chars, index) {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                    if raw_word_cursor.is_some() && raw_word_length.is_none() {
                        raw_word_length = Some(index - raw_word_start);
                    }
                }
                raw_word_start = index + 1;
            } else if !self.is_escape_at(&chars, index) {
                current.push(ch);
                if quote_start.is_none() {
                    brackets.check(ch, index);
                }
            } else if keep_quotes {
                current.push(ch);
            }
        }

        if !current.is_empty() || cursor == len {
            words.push(current);
            if raw_word_cursor.is_some() && raw_word_length.is_none() {
                raw_word_length = Some(len - raw_word_start);
            }
        }

        if cursor == len {
            word_index = words.len() - 1;
            word_cursor = words[word_index].chars().count();
            raw_word_cursor = Some(cursor - raw_word_start);
            raw_word_length = raw_word_cursor;
        }

        if context.reports_incomplete() {
            if self.config.eof_on_escaped_new_line
                && len > 0
                && self.is_escape_at(&chars, len - 1)
            {
                return Err(ParseError::Incomplete {
                    message: "Escaped new line".into(),
                    missing: "newline".into(),
                    open_brackets: 0,
                    next_closing: None,
                });
            }
            if let Some(start) = quote_start.filter(|_| self.config.eof_on_unclosed_quote) {
                let missing = if chars[start] == '\'' { "quote" } else { "dquote" };
                return Err(ParseError::Incomplete {
                    message: "Missing closing quote".into(),
                    missing: missing.into(),
                    open_brackets: 0,
                    next_closing: None,
                });
            }
            if brackets.is_closing_bracket_missing() {
                return Err(ParseError::Incomplete {
                    message: "Missing closing brackets".into(),
                    missing: format!("add: {}", brackets.missing_closing_brackets()),
                    open_brackets: brackets.open_brackets(),
                    next_closing: brackets.next_closing(),
                });
            }
            if let Some(missing_opening) = brackets.missing_opening() {
                return Err(ParseError::Syntax { missing_opening });
            }
        }

        let opening_quote = if quoted_word {
            quote_start.map(|start| chars[start])
        } else {
            None
        };

        Ok(ParsedLine {
            line: line.to_string(),
            cursor,
            words,
            word_index,
            word_cursor,
            raw_word_cursor: raw_word_cursor.unwrap_or(0),
            raw_word_length: raw_word_length.unwrap_or(0),
            opening_quote,
            quote_chars: self.config.quote_chars.clone(),
            escape_chars: self.config.escape_chars.clone(),
        })
    }

    fn is_escape_char(&self, ch: char) -> bool { self.config.escape_chars.contains(&ch) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn words(line: &str) -> Vec<String> {
        DefaultParser::default()
            .parse(line, line.chars().count(), ParseContext::Complete)
            .unwrap()
            .words
    }

    #[test_case("ls -la /tmp", &["ls", "-la", "/tmp"] ; "plain words")]
    #[test_case("  spaced   out  ", &["spaced", "out", ""] ; "extra whitespace")]
    #[test_case(r#"echo "hello world""#, &["echo", "hello world"] ; "double quotes")]
    #[test_case("echo 'a \"b\" c'", &["echo", "a \"b\" c"] ; "other quote inside quotes")]
    #[test_case(r"echo hello\ world", &["echo", "hello world"] ; "escaped space")]
    #[test_case(r#"a"b c"d"#, &["a\"b c\"d"] ; "quote in the middle of a word is literal")]
    #[test_case(r"say \\", &["say", "\\"] ; "escaped escape")]
    fn test_split_words(line: &str, expected: &[&str]) {
        assert_eq!(words(line), expected);
    }

    #[test]
    fn test_round_trip_of_plain_words() {
        let original = ["git", "commit", "-m", "message"];
        let joined = original.join(" ");
        assert_eq!(words(&joined), original);
        assert_eq!(words(&words(&joined).join(" ")), original);
    }

    #[test]
    fn test_cursor_in_the_middle_of_a_word() {
        let parsed = DefaultParser::default()
            .parse("git commit", 7, ParseContext::Complete)
            .unwrap();
        assert_eq!(parsed.word_index, 1);
        assert_eq!(parsed.word(), "commit");
        assert_eq!(parsed.word_cursor, 3);
        assert_eq!(parsed.word_up_to_cursor(), "com");
        assert_eq!(parsed.raw_word_cursor, 3);
        assert_eq!(parsed.raw_word_length, 6);
        assert_eq!(parsed.raw_word_start(), 4);
    }

    #[test]
    fn test_raw_offsets_of_open_quoted_word() {
        let parsed = DefaultParser::default()
            .parse("echo \"fo", 8, ParseContext::Complete)
            .unwrap();
        assert_eq!(parsed.word(), "fo");
        assert_eq!(parsed.word_cursor, 2);
        assert_eq!(parsed.raw_word_cursor, 3);
        assert_eq!(parsed.raw_word_length, 3);
        assert_eq!(parsed.opening_quote, Some('"'));
        assert_eq!(parsed.escape("foo bar", true), "\"foo bar\"");
        assert_eq!(parsed.escape("foo bar", false), "\"foo bar");
    }

    #[test]
    fn test_raw_offsets_of_escaped_word() {
        let line = r"cat my\ fi";
        let parsed = DefaultParser::default()
            .parse(line, 10, ParseContext::Complete)
            .unwrap();
        assert_eq!(parsed.word(), "my fi");
        assert_eq!(parsed.word_cursor, 5);
        assert_eq!(parsed.raw_word_cursor, 6);
        assert_eq!(parsed.escape("my file", true), r"my\ file");
    }

    #[test]
    fn test_cursor_between_words() {
        let parsed = DefaultParser::default()
            .parse("ab  cd", 3, ParseContext::Complete)
            .unwrap();
        assert_eq!(parsed.word_index, 1);
        assert_eq!(parsed.word(), "cd");
        assert_eq!(parsed.word_cursor, 0);
    }

    #[test_case("echo \"abc", "dquote" ; "unclosed double quote")]
    #[test_case("echo 'abc", "quote" ; "unclosed single quote")]
    #[test_case("echo abc\\", "newline" ; "trailing escape")]
    fn test_incomplete_on_accept(line: &str, expected_missing: &str) {
        let result =
            DefaultParser::default().parse(line, line.len(), ParseContext::AcceptLine);
        match result {
            Err(ParseError::Incomplete { missing, .. }) => {
                assert_eq!(missing, expected_missing);
            }
            other => panic!("expected incomplete, got {other:?}"),
        }
    }

    #[test]
    fn test_incomplete_is_not_reported_for_completion() {
        let result =
            DefaultParser::default().parse("echo \"abc", 9, ParseContext::Complete);
        assert!(result.is_ok());
    }

    #[test]
    fn test_open_brackets_are_incomplete() {
        let parser = DefaultParser::new(ParserConfig::default().with_default_brackets());
        let result = parser.parse("foo(a, [b", 9, ParseContext::AcceptLine);
        assert_eq!(
            result,
            Err(ParseError::Incomplete {
                message: "Missing closing brackets".into(),
                missing: "add: ])".into(),
                open_brackets: 2,
                next_closing: Some(']'),
            })
        );

        // Brackets inside quotes don't count.
        assert!(parser.parse("echo '('", 8, ParseContext::AcceptLine).is_ok());
    }

    #[test]
    fn test_stray_closer_is_a_syntax_error() {
        let parser = DefaultParser::new(ParserConfig::default().with_default_brackets());
        let result = parser.parse("foo)", 4, ParseContext::AcceptLine);
        assert_eq!(result, Err(ParseError::Syntax { missing_opening: ')' }));
    }

    #[test]
    fn test_escape_without_quote() {
        let parsed = DefaultParser::default()
            .parse("ls ", 3, ParseContext::Complete)
            .unwrap();
        assert_eq!(parsed.escape("a b", true), r"a\ b");
        assert_eq!(parsed.escape(r"a\b", true), r"a\\b");
        // A quote inside the candidate already protects the whitespace.
        assert_eq!(parsed.escape("it's here", true), "it's here");
    }
}

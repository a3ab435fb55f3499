// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Tracks bracket nesting while the parser walks a line. Brackets inside quotes or after
/// an escape char are never fed to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketChecker<'a> {
    pairs: &'a [(char, char)],
    /// Index into `pairs` for each bracket that is still open, innermost last.
    nested: Vec<usize>,
    missing_opening: Option<char>,
    cursor: usize,
    /// Open bracket count as seen right before the cursor.
    open_brackets: usize,
    next_closing: Option<char>,
}

impl<'a> BracketChecker<'a> {
    #[must_use]
    pub fn new(pairs: &'a [(char, char)], cursor: usize) -> Self {
        Self {
            pairs,
            nested: vec![],
            missing_opening: None,
            cursor,
            open_brackets: 0,
            next_closing: None,
        }
    }

    /// Feed the char at `position`.
    pub fn check(&mut self, ch: char, position: usize) {
        if self.pairs.is_empty() {
            return;
        }
        if let Some(id) = self.pairs.iter().position(|(open, _)| *open == ch) {
            self.nested.push(id);
        } else if let Some(id) = self.pairs.iter().position(|(_, close)| *close == ch) {
            if self.nested.last() == Some(&id) {
                self.nested.pop();
            } else {
                self.missing_opening = Some(ch);
            }
        }
        if self.cursor > position {
            self.open_brackets = self.nested.len();
            self.next_closing = self.nested.last().map(|id| self.pairs[*id].1);
        }
    }

    #[must_use]
    pub fn is_closing_bracket_missing(&self) -> bool { !self.nested.is_empty() }

    #[must_use]
    pub fn missing_opening(&self) -> Option<char> { self.missing_opening }

    /// Closers needed to balance the line, innermost first.
    #[must_use]
    pub fn missing_closing_brackets(&self) -> String {
        self.nested.iter().rev().map(|id| self.pairs[*id].1).collect()
    }

    #[must_use]
    pub fn open_brackets(&self) -> usize { self.open_brackets }

    #[must_use]
    pub fn next_closing(&self) -> Option<char> { self.next_closing }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAIRS: &[(char, char)] = &[('(', ')'), ('[', ']'), ('{', '}')];

    fn run(text: &str, cursor: usize) -> BracketChecker<'static> {
        let mut checker = BracketChecker::new(PAIRS, cursor);
        for (index, ch) in text.chars().enumerate() {
            checker.check(ch, index);
        }
        checker
    }

    #[test]
    fn test_balanced() {
        let checker = run("f(a[1], {b})", 12);
        assert!(!checker.is_closing_bracket_missing());
        assert_eq!(checker.missing_opening(), None);
    }

    #[test]
    fn test_missing_closers_innermost_first() {
        let checker = run("f(a[1", 5);
        assert!(checker.is_closing_bracket_missing());
        assert_eq!(checker.missing_closing_brackets(), "])");
        assert_eq!(checker.open_brackets(), 2);
        assert_eq!(checker.next_closing(), Some(']'));
    }

    #[test]
    fn test_mismatched_closer() {
        let checker = run("(]", 2);
        assert_eq!(checker.missing_opening(), Some(']'));
        assert_eq!(checker.next_closing(), Some(')'));
    }
}

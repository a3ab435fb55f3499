// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::style::Stylize;

use super::{Candidate, ListLayout};

/// Menu selection over a laid out candidate grid.
///
/// The candidates are in [`ListLayout::ordered`] order, so index `i` sits at row
/// `i % lines`, column `i / lines` when the grid is filled column by column (or the
/// transposed position when filled row by row). Every move wraps around the grid edges,
/// and the last row or column may be shorter than the others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionMenu {
    candidates: Vec<Candidate>,
    selection: usize,
    lines: usize,
    rows_first: bool,
    /// First row shown when the list is taller than the screen.
    top_line: usize,
}

impl CompletionMenu {
    /// Starts with the first candidate selected. [`None`] when there is nothing to pick.
    #[must_use]
    pub fn new(candidates: Vec<Candidate>, lines: usize, rows_first: bool) -> Option<Self> {
        if candidates.is_empty() {
            return None;
        }
        Some(Self {
            candidates,
            selection: 0,
            lines: lines.max(1),
            rows_first,
            top_line: 0,
        })
    }

    #[must_use]
    pub fn candidates(&self) -> &[Candidate] { &self.candidates }

    #[must_use]
    pub fn selection(&self) -> usize { self.selection }

    #[must_use]
    pub fn selected(&self) -> &Candidate { &self.candidates[self.selection] }

    /// Call after the layout was recomputed, eg: on resize.
    pub fn set_lines(&mut self, lines: usize) { self.lines = lines.max(1); }

    fn columns(&self) -> usize { self.candidates.len().div_ceil(self.lines) }

    pub fn next(&mut self) { self.selection = (self.selection + 1) % self.candidates.len(); }

    pub fn previous(&mut self) {
        let count = self.candidates.len();
        self.selection = (self.selection + count - 1) % count;
    }

    pub fn up(&mut self) {
        if self.rows_first {
            self.major(-1);
        } else {
            self.minor(-1);
        }
    }

    pub fn down(&mut self) {
        if self.rows_first {
            self.major(1);
        } else {
            self.minor(1);
        }
    }

    pub fn left(&mut self) {
        if self.rows_first {
            self.minor(-1);
        } else {
            self.major(-1);
        }
    }

    pub fn right(&mut self) {
        if self.rows_first {
            self.minor(1);
        } else {
            self.major(1);
        }
    }

    fn axis(&self) -> isize {
        let it = if self.rows_first {
            self.columns()
        } else {
            self.lines
        };
        to_isize(it.max(1))
    }

    /// Jump a whole row (rows first) or column (columns first).
    fn major(&mut self, step: isize) {
        let axis = self.axis();
        let count = to_isize(self.candidates.len());
        let mut selection = to_isize(self.selection) + step * axis;
        if selection < 0 {
            let position = (selection + axis).rem_euclid(axis);
            selection = count - count % axis + position;
            if selection >= count {
                selection -= axis;
            }
        } else if selection >= count {
            selection %= axis;
        }
        self.selection = usize::try_from(selection).unwrap_or(0);
    }

    /// Move within the current row (rows first) or column (columns first).
    fn minor(&mut self, step: isize) {
        let mut axis = self.axis();
        let count = to_isize(self.candidates.len());
        let selection = to_isize(self.selection);
        let offset = selection % axis;
        if selection - offset + axis > count {
            // Short last row or column.
            axis = (count % axis).max(1);
        }
        let moved = selection - offset + (axis + offset + step).rem_euclid(axis);
        self.selection = usize::try_from(moved).unwrap_or(0);
    }

    /// The part of `layout` that fits in `rows` screen rows, scrolled so the selection
    /// stays visible, with a "rows x to y of z" footer when not everything fits.
    pub fn visible_text(&mut self, layout: &ListLayout, rows: usize) -> String {
        if layout.lines <= rows || rows < 2 {
            return layout.text.clone();
        }
        let displayed = rows - 1;
        if let Some(selected) = layout.selected_line {
            if selected < self.top_line {
                self.top_line = selected;
            } else if selected >= self.top_line + displayed {
                self.top_line = selected + 1 - displayed;
            }
        }
        let lines: Vec<&str> = layout.text.lines().collect();
        self.top_line = self.top_line.min(lines.len().saturating_sub(displayed));
        let mut acc: Vec<String> = lines
            .iter()
            .skip(self.top_line)
            .take(displayed)
            .map(|it| (*it).to_owned())
            .collect();
        let footer = format!(
            "rows {} to {} of {}",
            self.top_line + 1,
            self.top_line + displayed,
            lines.len()
        );
        acc.push(footer.cyan().to_string());
        acc.join("\n")
    }
}

fn to_isize(value: usize) -> isize { isize::try_from(value).unwrap_or(isize::MAX) }

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        CompletionMode, LayoutSettings, MatchSettings, MatchStage, candidates_by_value,
        find_matches, layout_candidates,
    };
    use crate::{DefaultParser, LineParser, ParseContext};
    use pretty_assertions::assert_eq;

    fn menu(count: usize, lines: usize, rows_first: bool) -> CompletionMenu {
        let candidates = (0..count).map(|it| Candidate::new(it.to_string())).collect();
        match CompletionMenu::new(candidates, lines, rows_first) {
            Some(it) => it,
            None => panic!("empty menu"),
        }
    }

    #[test]
    fn test_typed_prefix_narrows_then_next_wraps() {
        let line = match DefaultParser::default().parse("a", 1, ParseContext::Complete) {
            Ok(it) => it,
            Err(error) => panic!("{error}"),
        };
        let settings = MatchSettings::default();
        let by_value = candidates_by_value(
            ["apple", "apricot", "banana"].into_iter().map(Candidate::new).collect(),
        );
        let stages = MatchStage::stages_for(&line, CompletionMode::Word, &settings, true);
        let possible: Vec<_> = find_matches(&by_value, &stages, &settings)
            .into_values()
            .flatten()
            .collect();
        let layout = layout_candidates(&possible, None, "a", &LayoutSettings::default());

        let Some(mut menu) = CompletionMenu::new(layout.ordered, layout.lines, false) else {
            panic!("empty menu");
        };
        assert_eq!(menu.candidates().len(), 2);
        assert_eq!(menu.selected().value, "apple");
        menu.next();
        assert_eq!(menu.selected().value, "apricot");
        menu.next();
        assert_eq!(menu.selected().value, "apple");
        menu.previous();
        assert_eq!(menu.selected().value, "apricot");
    }

    #[test]
    fn test_columns_first_moves() {
        // 0 2 4
        // 1 3
        let mut it = menu(5, 2, false);
        it.right();
        assert_eq!(it.selection(), 2);
        it.right();
        assert_eq!(it.selection(), 4);
        it.right();
        assert_eq!(it.selection(), 0);
        it.left();
        assert_eq!(it.selection(), 4);
        it.down();
        assert_eq!(it.selection(), 4, "short last column has one row");
        it.left();
        it.down();
        assert_eq!(it.selection(), 3);
        it.down();
        assert_eq!(it.selection(), 2);
        it.up();
        assert_eq!(it.selection(), 3);
    }

    #[test]
    fn test_left_from_second_row_skips_missing_cell() {
        // 0 2 4
        // 1 3
        let mut it = menu(5, 2, false);
        it.down();
        assert_eq!(it.selection(), 1);
        it.left();
        assert_eq!(it.selection(), 3);
    }

    #[test]
    fn test_rows_first_moves() {
        // 0 1 2
        // 3 4
        let mut it = menu(5, 2, true);
        it.down();
        assert_eq!(it.selection(), 3);
        it.right();
        assert_eq!(it.selection(), 4);
        it.right();
        assert_eq!(it.selection(), 3);
        it.up();
        assert_eq!(it.selection(), 0);
        it.up();
        assert_eq!(it.selection(), 3);
    }

    #[test]
    fn test_visible_text_scrolls_to_selection() {
        let layout = ListLayout {
            text: "a\nb\nc\nd\ne".into(),
            lines: 5,
            selected_line: Some(4),
            ordered: vec![],
        };
        let mut it = menu(5, 5, false);
        let text = it.visible_text(&layout, 3);
        let plain = strip_ansi_escapes::strip_str(&text);
        assert_eq!(plain, "d\ne\nrows 4 to 5 of 5");
    }
}

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Tiling candidates into the column grid shown below the prompt.
//!
//! Every column is as wide as the widest entry (display text plus its description in
//! parentheses), capped at the terminal width. The grid then uses as many columns as
//! fit, separated by [`MARGIN_BETWEEN_COLUMNS`] spaces, and as few columns as possible
//! for that number of rows, so 9 candidates split 5/4 rather than 6/3.


use crossterm::style::Stylize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::{Candidate, compare_groups};

pub const MARGIN_BETWEEN_COLUMNS: usize = 3;
const MARGIN_BETWEEN_DISPLAY_AND_DESCRIPTION: usize = 1;
const DESCRIPTION_PREFIX: &str = "(";
const DESCRIPTION_SUFFIX: &str = ")";
const ELLIPSIS: char = '…';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutSettings {
    /// Terminal width in columns.
    pub width: usize,
    /// Show group names as titles above their candidates.
    pub auto_group: bool,
    /// Lay out each group separately. Otherwise all candidates share one grid.
    pub group: bool,
    /// Fill the grid row by row instead of column by column.
    pub rows_first: bool,
    pub case_insensitive: bool,
    pub original_group_name: String,
    pub others_group_name: String,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            width: 80,
            auto_group: true,
            group: true,
            rows_first: false,
            case_insensitive: false,
            original_group_name: "original".into(),
            others_group_name: "others".into(),
        }
    }
}

/// Candidate list rendered for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListLayout {
    /// Styled text, rows separated by `\n`, no trailing newline.
    pub text: String,
    /// Number of rows in `text`, group titles included.
    pub lines: usize,
    /// Row holding the selected candidate.
    pub selected_line: Option<usize>,
    /// Candidates group by group, in the order the grid indexes them. Menu selection
    /// indexes into this.
    pub ordered: Vec<Candidate>,
}

enum ListItem {
    Title(String),
    Candidates(Vec<Candidate>),
}

/// Display width of `text`, ignoring ANSI escapes.
#[must_use]
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(strip_ansi_escapes::strip_str(text).as_str())
}

/// Lay out `possible`, highlighting `selection`, with the leading `completed` part of
/// each entry styled as already typed.
#[must_use]
pub fn layout_candidates(
    possible: &[Candidate],
    selection: Option<&Candidate>,
    completed: &str,
    settings: &LayoutSettings,
) -> ListLayout {
    let mut ordered = vec![];
    let items = if settings.group {
        group_items(possible, settings, &mut ordered)
    } else {
        flat_items(possible, settings, &mut ordered)
    };

    let max_width = items
        .iter()
        .flat_map(|item| match item {
            ListItem::Title(title) => vec![display_width(title)],
            ListItem::Candidates(list) => list.iter().map(entry_width).collect(),
        })
        .max()
        .unwrap_or(0);

    let mut acc = ListLayout {
        ordered,
        ..ListLayout::default()
    };
    if max_width == 0 || settings.width == 0 {
        return acc;
    }
    for item in &items {
        match item {
            ListItem::Title(title) => {
                acc.text.push_str(&format!("{}\n", title.as_str().magenta().bold()));
                acc.lines += 1;
            }
            ListItem::Candidates(list) => {
                tile(list, max_width, selection, completed, settings, &mut acc);
            }
        }
    }
    if acc.text.ends_with('\n') {
        acc.text.pop();
    }
    acc
}

fn entry_width(candidate: &Candidate) -> usize {
    let display = display_width(&candidate.display);
    match &candidate.description {
        Some(description) => {
            display
                + MARGIN_BETWEEN_DISPLAY_AND_DESCRIPTION
                + DESCRIPTION_PREFIX.len()
                + display_width(description)
                + DESCRIPTION_SUFFIX.len()
        }
        None => display,
    }
}

/// Put `candidate` into `list`, replacing (in place) an earlier one with the same value.
fn insert_unique(list: &mut Vec<Candidate>, candidate: &Candidate) {
    match list.iter_mut().find(|it| it.value == candidate.value) {
        Some(existing) => *existing = candidate.clone(),
        None => list.push(candidate.clone()),
    }
}

fn group_items(
    possible: &[Candidate],
    settings: &LayoutSettings,
    ordered: &mut Vec<Candidate>,
) -> Vec<ListItem> {
    let mut groups: Vec<(String, Vec<Candidate>)> = vec![];
    for candidate in possible {
        let name = candidate.group_name();
        match groups.iter_mut().find(|(it, _)| it == name) {
            Some((_, list)) => insert_unique(list, candidate),
            None => groups.push((name.to_owned(), vec![candidate.clone()])),
        }
    }
    groups.sort_by(|(lhs, _), (rhs, _)| {
        compare_groups(
            lhs,
            rhs,
            &settings.original_group_name,
            &settings.others_group_name,
        )
    });

    let group_count = groups.len();
    let mut acc = vec![];
    for (name, list) in groups {
        let title = if name.is_empty() && group_count > 1 {
            settings.others_group_name.clone()
        } else {
            name
        };
        if !title.is_empty() && settings.auto_group {
            acc.push(ListItem::Title(title));
        }
        ordered.extend(list.iter().cloned());
        acc.push(ListItem::Candidates(list));
    }
    acc
}

fn flat_items(
    possible: &[Candidate],
    settings: &LayoutSettings,
    ordered: &mut Vec<Candidate>,
) -> Vec<ListItem> {
    let mut titles: Vec<String> = vec![];
    let mut list: Vec<Candidate> = vec![];
    for candidate in possible {
        if let Some(group) = candidate.group.as_ref().filter(|it| !titles.contains(it)) {
            titles.push(group.clone());
        }
        insert_unique(&mut list, candidate);
    }
    list.sort_by(|a, b| a.value.cmp(&b.value));
    ordered.extend(list.iter().cloned());

    let mut acc = vec![];
    if settings.auto_group {
        acc.extend(titles.into_iter().map(ListItem::Title));
    }
    acc.push(ListItem::Candidates(list));
    acc
}

/// Grid shape for `count` entries of `max_width` columns each: `(rows, columns)`.
#[must_use]
pub fn grid_shape(count: usize, max_width: usize, width: usize) -> (usize, usize) {
    if count == 0 || max_width == 0 || width == 0 {
        return (0, 0);
    }
    let max_width = max_width.min(width);
    let mut columns = width / max_width;
    while columns > 1
        && columns * max_width + (columns - 1) * MARGIN_BETWEEN_COLUMNS >= width
    {
        columns -= 1;
    }
    let rows = count.div_ceil(columns);
    (rows, count.div_ceil(rows))
}

fn starts_with_completed(text: &str, completed: &str, case_insensitive: bool) -> bool {
    if case_insensitive {
        text.to_lowercase().starts_with(&completed.to_lowercase())
    } else {
        text.starts_with(completed)
    }
}

/// Cut `text` to at most `width` display columns, ending it with an ellipsis when cut.
fn truncate_to_width(text: &str, width: usize) -> String {
    if display_width(text) <= width {
        return text.to_owned();
    }
    let budget = width.saturating_sub(ELLIPSIS.width().unwrap_or(1));
    let mut acc = String::new();
    let mut used = 0;
    for ch in strip_ansi_escapes::strip_str(text).chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > budget {
            break;
        }
        used += ch_width;
        acc.push(ch);
    }
    acc.push(ELLIPSIS);
    acc
}

fn tile(
    list: &[Candidate],
    max_width: usize,
    selection: Option<&Candidate>,
    completed: &str,
    settings: &LayoutSettings,
    acc: &mut ListLayout,
) {
    let max_width = max_width.min(settings.width);
    let (rows, columns) = grid_shape(list.len(), max_width, settings.width);
    let index = |row: usize, column: usize| {
        if settings.rows_first {
            row * columns + column
        } else {
            column * rows + row
        }
    };
    let completed_len = completed.chars().count();

    for row in 0..rows {
        for column in 0..columns {
            let Some(candidate) = list.get(index(row, column)) else {
                continue;
            };
            let has_right_item =
                column + 1 < columns && index(row, column + 1) < list.len();
            let left = candidate.display.as_str();
            let left_width = display_width(left);

            let right = candidate.description.as_deref().map(|description| {
                let room = max_width.saturating_sub(
                    left_width
                        + MARGIN_BETWEEN_DISPLAY_AND_DESCRIPTION
                        + DESCRIPTION_PREFIX.len()
                        + DESCRIPTION_SUFFIX.len(),
                );
                format!(
                    "{DESCRIPTION_PREFIX}{}{DESCRIPTION_SUFFIX}",
                    truncate_to_width(description, room)
                )
            });
            let right_width = right.as_deref().map_or(0, display_width);
            let padding = " ".repeat(max_width.saturating_sub(left_width + right_width));

            if selection == Some(candidate) {
                acc.selected_line = Some(acc.lines + row);
                let plain = strip_ansi_escapes::strip_str(left);
                let entry = format!("{plain}{padding}{}", right.unwrap_or_default());
                acc.text.push_str(&entry.reverse().to_string());
            } else {
                let plain = strip_ansi_escapes::strip_str(left);
                if starts_with_completed(&plain, completed, settings.case_insensitive) {
                    let split = plain
                        .char_indices()
                        .nth(completed_len)
                        .map_or(plain.len(), |(it, _)| it);
                    let (head, tail) = plain.split_at(split);
                    acc.text.push_str(&format!("{}{tail}", head.cyan()));
                } else {
                    acc.text.push_str(left);
                }
                if right.is_some() || has_right_item {
                    acc.text.push_str(&padding);
                }
                if let Some(right) = right {
                    acc.text.push_str(&right.dark_grey().to_string());
                }
            }
            if has_right_item {
                acc.text.push_str(&" ".repeat(MARGIN_BETWEEN_COLUMNS));
            }
        }
        acc.text.push('\n');
    }
    acc.lines += rows;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn plain_rows(layout: &ListLayout) -> Vec<String> {
        strip_ansi_escapes::strip_str(&layout.text)
            .lines()
            .map(|it| it.trim_end().to_owned())
            .collect()
    }

    fn candidates(values: &[&str]) -> Vec<Candidate> {
        values.iter().map(|it| Candidate::new(*it)).collect()
    }

    #[test_case(9, 5, 40, (2, 5) ; "nine entries fit in two rows")]
    #[test_case(9, 5, 20, (5, 2) ; "margin forces fewer columns")]
    #[test_case(3, 100, 40, (3, 1) ; "wider than terminal")]
    #[test_case(0, 5, 40, (0, 0) ; "nothing to show")]
    fn test_grid_shape(count: usize, max_width: usize, width: usize, expected: (usize, usize)) {
        assert_eq!(grid_shape(count, max_width, width), expected);
    }

    #[test]
    fn test_columns_first_order() {
        let settings = LayoutSettings {
            width: 20,
            ..LayoutSettings::default()
        };
        let layout = layout_candidates(&candidates(&["a", "b", "c", "d", "e"]), None, "", &settings);
        // Width 1, so 5 columns would fit, and one row holds them all.
        assert_eq!(plain_rows(&layout), vec!["a   b   c   d   e"]);
        assert_eq!(layout.lines, 1);
    }

    #[test]
    fn test_rows_first_vs_columns_first() {
        let values = ["aaaa", "bbbb", "cccc", "dddd"];
        let columns_first = LayoutSettings {
            width: 12,
            ..LayoutSettings::default()
        };
        let layout = layout_candidates(&candidates(&values), None, "", &columns_first);
        assert_eq!(plain_rows(&layout), vec!["aaaa   cccc", "bbbb   dddd"]);

        let rows_first = LayoutSettings {
            rows_first: true,
            ..columns_first
        };
        let layout = layout_candidates(&candidates(&values), None, "", &rows_first);
        assert_eq!(plain_rows(&layout), vec!["aaaa   bbbb", "cccc   dddd"]);
    }

    #[test]
    fn test_groups_and_titles() {
        let possible = vec![
            Candidate::new("ls").with_group("commands"),
            Candidate::new("cbt").with_group("original"),
            Candidate::new("notes.txt"),
        ];
        let layout = layout_candidates(&possible, None, "", &LayoutSettings::default());
        assert_eq!(
            plain_rows(&layout),
            vec!["original", "cbt", "commands", "ls", "others", "notes.txt"]
        );
        let ordered: Vec<_> = layout.ordered.iter().map(|it| it.value.as_str()).collect();
        assert_eq!(ordered, vec!["cbt", "ls", "notes.txt"]);
        assert_eq!(layout.lines, 6);
        assert!(layout.text.starts_with(&format!("{}\n", "original".magenta().bold())));
    }

    #[test]
    fn test_description_is_truncated() {
        let possible = vec![
            Candidate::new("-v").with_description("verbose output for everything"),
        ];
        let settings = LayoutSettings {
            width: 16,
            ..LayoutSettings::default()
        };
        let layout = layout_candidates(&possible, None, "", &settings);
        assert_eq!(plain_rows(&layout), vec!["-v (verbose ou…)"]);
        assert!(layout.text.contains(&format!("{}", "(verbose ou…)".dark_grey())));
    }

    #[test]
    fn test_selection_line_and_style() {
        let possible = candidates(&["apple", "apricot"]);
        let settings = LayoutSettings {
            width: 10,
            ..LayoutSettings::default()
        };
        let layout = layout_candidates(&possible, Some(&possible[1]), "ap", &settings);
        assert_eq!(layout.selected_line, Some(1));
        assert!(layout.text.contains(&format!("{}", "apricot".reverse())));
        assert!(layout.text.contains(&format!("{}ple", "ap".cyan())));
    }
}

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Narrowing a candidate list down to the ones that match the typed word.
//!
//! Matching runs in stages (see [`MatchStage::stages_for`]). The first stage that keeps
//! at least one candidate wins, later stages never run. So a word that is a prefix of
//! some candidates never falls through to substring or typo matching.

use std::{cmp::Ordering, collections::BTreeMap};

use super::Candidate;
use crate::ParsedLine;

/// Candidates keyed by their value with ANSI escapes stripped. Several candidates may
/// share a value (eg: the same word offered by two groups).
pub type CandidatesByValue = BTreeMap<String, Vec<Candidate>>;

/// Knobs that change how words are compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSettings {
    pub case_insensitive: bool,
    /// Typo matching accepts candidates strictly closer than this edit distance.
    pub errors: usize,
    /// Group given to the typed word when typo matching offers it back.
    pub original_group_name: String,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            errors: 2,
            original_group_name: "original".into(),
        }
    }
}

/// How the word under the cursor is being completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionMode {
    /// Match against the whole word.
    Word,
    /// Match against the part of the word before the cursor only.
    Prefix,
    /// Match the part before the cursor, then the part after it somewhere later.
    InWord,
}

/// One matching rule. Words are already lower cased when matching is case insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchStage {
    Prefix(String),
    Substring(String),
    /// Starts with `prefix` and contains `suffix` after it.
    PrefixThenSuffix { prefix: String, suffix: String },
    /// Contains `prefix` and, after it, `suffix`.
    Surrounding { prefix: String, suffix: String },
    Typo(String),
    /// Everything except options. Used for an empty word when options are not offered.
    NotAnOption,
}

impl MatchStage {
    /// The stages to try, in order, for the word under the cursor.
    #[must_use]
    pub fn stages_for(
        line: &ParsedLine,
        mode: CompletionMode,
        settings: &MatchSettings,
        empty_word_options: bool,
    ) -> Vec<MatchStage> {
        let word = if settings.case_insensitive {
            line.word().to_lowercase()
        } else {
            line.word().to_owned()
        };
        let split = word
            .char_indices()
            .nth(line.word_cursor)
            .map_or(word.len(), |(index, _)| index);
        let (before, after) = word.split_at(split);

        match mode {
            CompletionMode::Prefix => vec![
                MatchStage::Prefix(before.into()),
                MatchStage::Substring(before.into()),
                MatchStage::Typo(before.into()),
            ],
            CompletionMode::InWord => vec![
                MatchStage::PrefixThenSuffix {
                    prefix: before.into(),
                    suffix: after.into(),
                },
                MatchStage::Surrounding {
                    prefix: before.into(),
                    suffix: after.into(),
                },
                MatchStage::Typo(word.clone()),
            ],
            CompletionMode::Word if word.is_empty() && !empty_word_options => {
                vec![MatchStage::NotAnOption]
            }
            CompletionMode::Word => vec![
                MatchStage::Prefix(word.clone()),
                MatchStage::Substring(word.clone()),
                MatchStage::Typo(word),
            ],
        }
    }

    fn accepts(&self, value: &str, settings: &MatchSettings) -> bool {
        let lowered;
        let value = if settings.case_insensitive {
            lowered = value.to_lowercase();
            lowered.as_str()
        } else {
            value
        };
        match self {
            MatchStage::Prefix(word) => value.starts_with(word.as_str()),
            MatchStage::Substring(word) => value.contains(word.as_str()),
            MatchStage::PrefixThenSuffix { prefix, suffix } => value
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.contains(suffix.as_str())),
            MatchStage::Surrounding { prefix, suffix } => {
                value.match_indices(prefix.as_str()).any(|(index, it)| {
                    value[index + it.len()..].contains(suffix.as_str())
                })
            }
            MatchStage::Typo(word) => distance(word, value) < settings.errors,
            MatchStage::NotAnOption => !value.starts_with('-'),
        }
    }

    /// Keep the entries whose value this stage accepts.
    #[must_use]
    pub fn apply(
        &self,
        candidates: &CandidatesByValue,
        settings: &MatchSettings,
    ) -> CandidatesByValue {
        let mut acc: CandidatesByValue = candidates
            .iter()
            .filter(|(value, _)| self.accepts(value, settings))
            .map(|(value, list)| (value.clone(), list.clone()))
            .collect();

        // Several close matches: offer the typed word too, so the user can keep it.
        let typed = match self {
            MatchStage::Typo(word) if acc.len() > 1 => Some(word),
            _ => None,
        };
        if let Some(word) = typed.filter(|it| !acc.contains_key(it.as_str())) {
            acc.insert(
                word.clone(),
                vec![
                    Candidate::new(word.as_str())
                        .with_group(settings.original_group_name.as_str())
                        .with_complete(false),
                ],
            );
        }
        acc
    }
}

/// Index the candidates by their value with ANSI escapes stripped.
#[must_use]
pub fn candidates_by_value(candidates: Vec<Candidate>) -> CandidatesByValue {
    let mut acc = CandidatesByValue::new();
    for candidate in candidates {
        let plain = strip_ansi_escapes::strip_str(&candidate.value);
        acc.entry(plain).or_default().push(candidate);
    }
    acc
}

/// Run the stages in order and return the result of the first one that matches
/// anything. Empty when no stage matches.
#[must_use]
pub fn find_matches(
    candidates: &CandidatesByValue,
    stages: &[MatchStage],
    settings: &MatchSettings,
) -> CandidatesByValue {
    stages
        .iter()
        .map(|stage| stage.apply(candidates, settings))
        .find(|it| !it.is_empty())
        .unwrap_or_default()
}

/// Edit distance between the typed `word` and a candidate. When the word is shorter,
/// the candidate's leading part of the same length is also tried, so that `gti` is one
/// edit away from `git-status`.
#[must_use]
pub fn distance(word: &str, candidate: &str) -> usize {
    let word: Vec<char> = word.chars().collect();
    let candidate: Vec<char> = candidate.chars().collect();
    if word.len() < candidate.len() {
        let head = damerau_levenshtein(&word, &candidate[..word.len()]);
        head.min(damerau_levenshtein(&word, &candidate))
    } else {
        damerau_levenshtein(&word, &candidate)
    }
}

/// Optimal string alignment distance: insert, delete, substitute, or swap two adjacent
/// chars, each costing one.
fn damerau_levenshtein(lhs: &[char], rhs: &[char]) -> usize {
    let width = rhs.len() + 1;
    let mut table = vec![0_usize; (lhs.len() + 1) * width];
    let at = |row: usize, col: usize| row * width + col;

    for row in 0..=lhs.len() {
        table[at(row, 0)] = row;
    }
    for col in 0..=rhs.len() {
        table[at(0, col)] = col;
    }
    for row in 1..=lhs.len() {
        for col in 1..=rhs.len() {
            let cost = usize::from(lhs[row - 1] != rhs[col - 1]);
            let mut best = (table[at(row - 1, col)] + 1)
                .min(table[at(row, col - 1)] + 1)
                .min(table[at(row - 1, col - 1)] + cost);
            if row > 1
                && col > 1
                && lhs[row - 1] == rhs[col - 2]
                && lhs[row - 2] == rhs[col - 1]
            {
                best = best.min(table[at(row - 2, col - 2)] + 1);
            }
            table[at(row, col)] = best;
        }
    }
    table[at(lhs.len(), rhs.len())]
}

/// Longest common leading part of two strings, in chars.
#[must_use]
pub fn common_start(lhs: &str, rhs: &str, case_insensitive: bool) -> String {
    lhs.chars()
        .zip(rhs.chars())
        .take_while(|(a, b)| {
            a == b
                || case_insensitive
                    && (a.to_uppercase().eq(b.to_uppercase())
                        || a.to_lowercase().eq(b.to_lowercase()))
        })
        .map(|(a, _)| a)
        .collect()
}

/// Common leading part of all the values, [`None`] when there are none.
#[must_use]
pub fn common_prefix<'a>(
    values: impl IntoIterator<Item = &'a str>,
    case_insensitive: bool,
) -> Option<String> {
    values.into_iter().fold(None, |acc, value| match acc {
        None => Some(value.to_owned()),
        Some(prefix) => Some(common_start(&prefix, value, case_insensitive)),
    })
}

/// Candidates closest to the typed word come first, ties are broken by value.
pub fn sort_candidates(candidates: &mut [Candidate], word: &str, case_insensitive: bool) {
    let word = if case_insensitive {
        word.to_lowercase()
    } else {
        word.to_owned()
    };
    candidates.sort_by_cached_key(|it| {
        let value = if case_insensitive {
            it.value.to_lowercase()
        } else {
            it.value.clone()
        };
        (distance(&word, &value), it.value.clone())
    });
}

/// Order in which groups are listed: the typed word's group first, then the named groups
/// alphabetically ignoring case, and the ungrouped "others" last.
#[must_use]
pub fn compare_groups(lhs: &str, rhs: &str, original: &str, others: &str) -> Ordering {
    let rank = |group: &str| {
        if group.is_empty() || group == others {
            2
        } else if group == original {
            0
        } else {
            1
        }
    };
    rank(lhs)
        .cmp(&rank(rhs))
        .then_with(|| lhs.to_lowercase().cmp(&rhs.to_lowercase()))
        .then_with(|| lhs.cmp(rhs))
}

/// Fold candidates that share a [`Candidate::key`] into the first one by value. The
/// survivor lists every display string, and every distinct description.
pub fn merge_candidates(candidates: &mut Vec<Candidate>) {
    let mut by_key: BTreeMap<String, Vec<Candidate>> = BTreeMap::new();
    for candidate in candidates.iter() {
        if let Some(key) = &candidate.key {
            by_key.entry(key.clone()).or_default().push(candidate.clone());
        }
    }
    if by_key.values().all(|it| it.len() < 2) {
        return;
    }

    candidates.retain(|it| it.key.is_none());
    for (_, mut group) in by_key {
        group.sort_by(|a, b| a.value.cmp(&b.value));
        let mut merged = group[0].clone();
        merged.display = group
            .iter()
            .map(|it| it.display.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let mut descriptions: Vec<&str> = vec![];
        for description in group.iter().filter_map(|it| it.description.as_deref()) {
            if !description.is_empty() && !descriptions.contains(&description) {
                descriptions.push(description);
            }
        }
        merged.description = if descriptions.is_empty() {
            None
        } else {
            Some(descriptions.join("; "))
        };
        candidates.push(merged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DefaultParser, LineParser, ParseContext};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn parse(line: &str) -> ParsedLine {
        match DefaultParser::default().parse(line, line.chars().count(), ParseContext::Complete)
        {
            Ok(it) => it,
            Err(error) => panic!("{error}"),
        }
    }

    fn matched_values(values: &[&str], typed: &str, settings: &MatchSettings) -> Vec<String> {
        let by_value =
            candidates_by_value(values.iter().map(|it| Candidate::new(*it)).collect());
        let stages =
            MatchStage::stages_for(&parse(typed), CompletionMode::Word, settings, true);
        find_matches(&by_value, &stages, settings).into_keys().collect()
    }

    #[test]
    fn test_prefix_stage_wins() {
        let it = matched_values(&["foo", "foobar", "fox"], "fo", &MatchSettings::default());
        assert_eq!(it, vec!["foo", "foobar", "fox"]);
    }

    #[test]
    fn test_falls_through_to_substring() {
        let it = matched_values(&["foo", "bar", "obar"], "ar", &MatchSettings::default());
        assert_eq!(it, vec!["bar", "obar"]);
    }

    #[test]
    fn test_typo_offers_typed_word_when_ambiguous() {
        let settings = MatchSettings::default();
        let by_value =
            candidates_by_value(vec![Candidate::new("cat"), Candidate::new("cut")]);
        let stages = MatchStage::stages_for(&parse("cbt"), CompletionMode::Word, &settings, true);
        let it = find_matches(&by_value, &stages, &settings);

        assert_eq!(it.keys().collect::<Vec<_>>(), vec!["cat", "cbt", "cut"]);
        let original = &it["cbt"][0];
        assert_eq!(original.group.as_deref(), Some("original"));
        assert!(!original.complete);
    }

    #[test]
    fn test_typo_does_not_duplicate_real_candidate() {
        let settings = MatchSettings {
            errors: 3,
            ..MatchSettings::default()
        };
        let stage = MatchStage::Typo("cat".into());
        let by_value = candidates_by_value(vec![
            Candidate::new("cat").with_group("animals"),
            Candidate::new("car"),
        ]);
        // Neither stage above typo runs here, "cat" is both typed and offered.
        let it = stage.apply(&by_value, &settings);
        assert_eq!(it["cat"].len(), 1);
        assert_eq!(it["cat"][0].group.as_deref(), Some("animals"));
    }

    #[test]
    fn test_case_insensitive_prefix() {
        let settings = MatchSettings {
            case_insensitive: true,
            ..MatchSettings::default()
        };
        let it = matched_values(&["README.md", "src"], "re", &settings);
        assert_eq!(it, vec!["README.md"]);
    }

    #[test]
    fn test_empty_word_without_options() {
        let settings = MatchSettings::default();
        let by_value = candidates_by_value(vec![Candidate::new("-v"), Candidate::new("file")]);
        let stages = MatchStage::stages_for(&parse("ls "), CompletionMode::Word, &settings, false);
        assert_eq!(stages, vec![MatchStage::NotAnOption]);
        let it = find_matches(&by_value, &stages, &settings);
        assert_eq!(it.keys().collect::<Vec<_>>(), vec!["file"]);
    }

    #[test]
    fn test_in_word_stages() {
        let settings = MatchSettings::default();
        let line = match DefaultParser::default().parse("fbar", 1, ParseContext::Complete) {
            Ok(it) => it,
            Err(error) => panic!("{error}"),
        };
        let by_value = candidates_by_value(vec![
            Candidate::new("foobar"),
            Candidate::new("xfbar"),
            Candidate::new("fizz"),
        ]);
        let stages = MatchStage::stages_for(&line, CompletionMode::InWord, &settings, true);
        let it = find_matches(&by_value, &stages, &settings);
        assert_eq!(it.keys().collect::<Vec<_>>(), vec!["foobar"]);
    }

    #[test_case("kitten", "sitting", 2 ; "shorter word keeps best of head and whole")]
    #[test_case("sitting", "kitten", 3)]
    #[test_case("abc", "acb", 1 ; "transposition")]
    #[test_case("gti", "git-status", 1 ; "shorter word uses candidate head")]
    #[test_case("", "abc", 0 ; "empty word")]
    #[test_case("same", "same", 0)]
    fn test_distance(word: &str, candidate: &str, expected: usize) {
        assert_eq!(distance(word, candidate), expected);
    }

    #[test]
    fn test_common_prefix() {
        assert_eq!(
            common_prefix(["apple", "apricot"], false),
            Some("ap".to_string())
        );
        assert_eq!(
            common_prefix(["Apple", "apricot"], true),
            Some("Ap".to_string())
        );
        assert_eq!(common_prefix(std::iter::empty::<&str>(), false), None);
    }

    #[test]
    fn test_sort_candidates_by_distance_then_value() {
        let mut it = vec![
            Candidate::new("foobar"),
            Candidate::new("fox"),
            Candidate::new("foo"),
        ];
        sort_candidates(&mut it, "fo", false);
        let values: Vec<_> = it.iter().map(|it| it.value.as_str()).collect();
        assert_eq!(values, vec!["foo", "foobar", "fox"]);
    }

    #[test]
    fn test_compare_groups() {
        let mut groups = vec!["others", "Files", "original", "", "commands"];
        groups.sort_by(|a, b| compare_groups(a, b, "original", "others"));
        assert_eq!(groups, vec!["original", "commands", "Files", "", "others"]);
    }

    #[test]
    fn test_merge_candidates_by_key() {
        let mut it = vec![
            Candidate::new("ls").with_key("list").with_description("list files"),
            Candidate::new("dir").with_key("list").with_description("list files"),
            Candidate::new("cd"),
        ];
        merge_candidates(&mut it);
        assert_eq!(it.len(), 2);
        let merged = &it[1];
        assert_eq!(merged.value, "dir");
        assert_eq!(merged.display, "dir ls");
        assert_eq!(merged.description.as_deref(), Some("list files"));
    }
}

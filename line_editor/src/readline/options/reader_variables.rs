// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_KILL_RING_SIZE, HISTORY_SIZE_MAX};

pub const DEFAULT_WORD_CHARS: &str = "*?_-.[]~=/&;!#$%^(){}<>";
pub const DEFAULT_REMOVE_SUFFIX_CHARS: &str = " \t\n;&|";
pub const DEFAULT_SEARCH_TERMINATORS: &str = "\x1b\n";
pub const DEFAULT_ERRORS: usize = 2;
pub const DEFAULT_LIST_MAX: usize = 100;
pub const DEFAULT_MENU_LIST_MAX: usize = usize::MAX;
pub const DEFAULT_BLINK_MATCHING_PAREN_MS: u64 = 500;
pub const DEFAULT_AMBIGUOUS_BINDING_MS: u64 = 1000;
pub const DEFAULT_ORIGINAL_GROUP_NAME: &str = "original";
pub const DEFAULT_OTHERS_GROUP_NAME: &str = "others";
pub const DEFAULT_SECONDARY_PROMPT_PATTERN: &str = "> ";

/// Tunables. Every field has a default, so a host can load a partial JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderVariables {
    /// Chars besides letters and digits that are part of a word for emacs word motion.
    pub word_chars: String,
    /// Typing one of these right after a completion removes the completion's suffix.
    pub remove_suffix_chars: String,
    /// Typo matching accepts candidates closer than this edit distance.
    pub errors: usize,
    /// Ask before listing this many candidates or more. `0` never asks.
    pub list_max: usize,
    /// Don't enter menu selection with more candidates than this.
    pub menu_list_max: usize,
    /// How long the cursor rests on the matching opening bracket.
    pub blink_matching_paren_ms: u64,
    /// How long to wait for more keys when a sequence is both bound and a prefix of a
    /// longer binding.
    pub ambiguous_binding_ms: u64,
    /// Keys that end an incremental search and are consumed.
    pub search_terminators: String,
    pub history_size: usize,
    pub original_group_name: String,
    pub others_group_name: String,
    /// Prompt shown on continuation lines.
    pub secondary_prompt_pattern: String,
    pub kill_ring_size: usize,
    /// Spaces per open bracket on a continuation line.
    pub indentation: usize,
}

impl Default for ReaderVariables {
    fn default() -> Self {
        Self {
            word_chars: DEFAULT_WORD_CHARS.into(),
            remove_suffix_chars: DEFAULT_REMOVE_SUFFIX_CHARS.into(),
            errors: DEFAULT_ERRORS,
            list_max: DEFAULT_LIST_MAX,
            menu_list_max: DEFAULT_MENU_LIST_MAX,
            blink_matching_paren_ms: DEFAULT_BLINK_MATCHING_PAREN_MS,
            ambiguous_binding_ms: DEFAULT_AMBIGUOUS_BINDING_MS,
            search_terminators: DEFAULT_SEARCH_TERMINATORS.into(),
            history_size: HISTORY_SIZE_MAX,
            original_group_name: DEFAULT_ORIGINAL_GROUP_NAME.into(),
            others_group_name: DEFAULT_OTHERS_GROUP_NAME.into(),
            secondary_prompt_pattern: DEFAULT_SECONDARY_PROMPT_PATTERN.into(),
            kill_ring_size: DEFAULT_KILL_RING_SIZE,
            indentation: 0,
        }
    }
}

impl ReaderVariables {
    #[must_use]
    pub fn blink_matching_paren(&self) -> Duration {
        Duration::from_millis(self.blink_matching_paren_ms)
    }

    #[must_use]
    pub fn ambiguous_binding(&self) -> Duration {
        Duration::from_millis(self.ambiguous_binding_ms)
    }

    /// Letters and digits, plus [`Self::word_chars`].
    #[must_use]
    pub fn is_word_char(&self, ch: char) -> bool {
        ch.is_alphanumeric() || self.word_chars.contains(ch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CommonResult;
    use miette::IntoDiagnostic;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_json_keeps_defaults() -> CommonResult<()> {
        let it: ReaderVariables =
            serde_json::from_str(r#"{ "errors": 3, "word_chars": "_" }"#).into_diagnostic()?;
        assert_eq!(it.errors, 3);
        assert_eq!(it.word_chars, "_");
        assert_eq!(it.list_max, DEFAULT_LIST_MAX);
        assert_eq!(it.ambiguous_binding(), Duration::from_secs(1));
        assert!(it.is_word_char('_'));
        assert!(!it.is_word_char('-'));
        Ok(())
    }
}

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// On/off switches that change how the reader behaves. The string form is the kebab
/// case name, eg: `"auto-list"`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ReaderOption {
    /// List the candidates when completion is ambiguous.
    AutoList,
    /// Enter menu selection on the second ambiguous completion.
    AutoMenu,
    /// Show group names as titles in the candidate list.
    AutoGroup,
    /// Lay out each candidate group separately.
    Group,
    /// Ring the bell when history navigation runs off either end.
    HistoryBeep,
    HistoryIgnoreDups,
    /// Offer options (words starting with `-`) when completing an empty word.
    EmptyWordOptions,
    /// After history expansion on accept, let the user check the line first.
    HistoryVerify,
    /// On a continuation line, also insert the closing bracket below the cursor.
    InsertBracket,
    DisableEventExpansion,
    /// Only list after the unambiguous prefix was inserted and completion asked again.
    ListAmbiguous,
    /// Always go straight to menu selection.
    MenuComplete,
    ListRowsFirst,
    CaseInsensitive,
    CaseInsensitiveSearch,
    /// Complete using the text on both sides of the cursor.
    CompleteInWord,
    /// Accept an exact match right away even when other candidates also match.
    RecognizeExact,
    /// Completion on an empty word inserts a tab instead.
    InsertTab,
    /// Clear the edited line from the screen when it is accepted.
    EraseLineOnFinish,
}

impl ReaderOption {
    #[must_use]
    pub fn default_value(self) -> bool {
        matches!(
            self,
            ReaderOption::AutoList
                | ReaderOption::AutoMenu
                | ReaderOption::AutoGroup
                | ReaderOption::Group
                | ReaderOption::HistoryBeep
                | ReaderOption::HistoryIgnoreDups
                | ReaderOption::EmptyWordOptions
        )
    }
}

/// Options explicitly set by the host. Anything not set has its
/// [`ReaderOption::default_value`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReaderOptions {
    values: HashMap<ReaderOption, bool>,
}

impl ReaderOptions {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn is_set(&self, option: ReaderOption) -> bool {
        self.values
            .get(&option)
            .copied()
            .unwrap_or_else(|| option.default_value())
    }

    pub fn set(&mut self, option: ReaderOption, value: bool) {
        self.values.insert(option, value);
    }

    /// Go back to the default value.
    pub fn reset(&mut self, option: ReaderOption) { self.values.remove(&option); }

    #[must_use]
    pub fn with(mut self, option: ReaderOption, value: bool) -> Self {
        self.set(option, value);
        self
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::CommonResult;
    use miette::IntoDiagnostic;
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    #[test]
    fn test_defaults_and_overrides() {
        let mut options = ReaderOptions::new();
        assert!(options.is_set(ReaderOption::AutoList));
        assert!(!options.is_set(ReaderOption::MenuComplete));

        options.set(ReaderOption::AutoList, false);
        assert!(!options.is_set(ReaderOption::AutoList));
        options.reset(ReaderOption::AutoList);
        assert!(options.is_set(ReaderOption::AutoList));
    }

    #[test]
    fn test_names_round_trip() -> CommonResult<()> {
        assert_eq!(ReaderOption::CaseInsensitiveSearch.to_string(), "case-insensitive-search");
        for option in ReaderOption::iter() {
            assert_eq!(ReaderOption::from_str(&option.to_string()).into_diagnostic()?, option);
        }
        Ok(())
    }

    #[test]
    fn test_load_from_json() -> CommonResult<()> {
        let options: ReaderOptions =
            serde_json::from_str(r#"{ "menu-complete": true, "auto-list": false }"#)
                .into_diagnostic()?;
        assert!(options.is_set(ReaderOption::MenuComplete));
        assert!(!options.is_set(ReaderOption::AutoList));
        assert!(options.is_set(ReaderOption::Group));
        Ok(())
    }
}

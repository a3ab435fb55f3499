// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::Candidate;
use crate::{CommonResult, ParsedLine, ok};

/// Supplies completion candidates for the word under the cursor. Candidates don't need
/// to be filtered: the reader matches them against the typed word itself.
///
/// Errors are logged by the reader and treated as "no candidates".
pub trait Completer: Send + Sync {
    /// # Errors
    ///
    /// Any error the host runs into while looking up candidates.
    fn complete(&self, line: &ParsedLine, candidates: &mut Vec<Candidate>)
    -> CommonResult<()>;
}

impl<F> Completer for F
where
    F: Fn(&ParsedLine, &mut Vec<Candidate>) -> CommonResult<()> + Send + Sync,
{
    fn complete(
        &self,
        line: &ParsedLine,
        candidates: &mut Vec<Candidate>,
    ) -> CommonResult<()> {
        self(line, candidates)
    }
}

/// Offers the same fixed set of words at every position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringsCompleter {
    pub candidates: Vec<Candidate>,
}

impl StringsCompleter {
    pub fn new<S: AsRef<str>>(values: impl IntoIterator<Item = S>) -> Self {
        Self {
            candidates: values
                .into_iter()
                .map(|it| Candidate::new(it.as_ref()))
                .collect(),
        }
    }
}

impl Completer for StringsCompleter {
    fn complete(
        &self,
        _line: &ParsedLine,
        candidates: &mut Vec<Candidate>,
    ) -> CommonResult<()> {
        candidates.extend(self.candidates.iter().cloned());
        ok!()
    }
}

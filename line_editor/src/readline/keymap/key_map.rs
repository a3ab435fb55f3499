// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{collections::BTreeMap,
          ops::Bound::{Excluded, Unbounded},
          time::Duration};

use super::Binding;

pub const ESC: char = '\x1b';
pub const DEL: char = '\x7f';
/// End of file on an empty line.
pub const CTRL_D: char = '\x04';

/// `ch` with the control modifier: `ctrl('a')` is `\x01`, `ctrl('?')` is DEL.
#[must_use]
pub fn ctrl(ch: char) -> String {
    let ch = match ch {
        '?' => DEL,
        it => char::from(u8::try_from(u32::from(it) & 0x1f).unwrap_or(0)),
    };
    ch.to_string()
}

/// `keys` with the meta modifier, which terminals send as an ESC prefix.
#[must_use]
pub fn alt(keys: &str) -> String {
    let mut acc = String::with_capacity(keys.len() + 1);
    acc.push(ESC);
    acc.push_str(keys);
    acc
}

#[must_use]
pub fn alt_char(ch: char) -> String { alt(ch.encode_utf8(&mut [0; 4])) }

/// Every single char sequence from `from` to `to`, both included.
#[must_use]
pub fn range(from: char, to: char) -> Vec<String> {
    (from..=to).map(String::from).collect()
}

/// Outcome of looking up the keys read so far.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyLookup {
    /// `binding` is bound to the first `consumed` chars. The rest belong to the next
    /// binding.
    Bound { binding: Binding, consumed: usize },
    /// All the keys are bound, and they are also the start of a longer binding.
    Ambiguous(Binding),
    /// The keys are the start of a longer binding only.
    Prefix,
    NoMatch,
}

/// Key sequence to [`Binding`] table.
///
/// Sequences are kept sorted so that "is there a longer binding starting with these
/// keys" is a single range query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyMap {
    bindings: BTreeMap<String, Binding>,
    /// Used for a single non ASCII char that is not bound.
    pub unicode: Option<Binding>,
    /// Used for the first char of keys that match nothing.
    pub nomatch: Option<Binding>,
    /// How long to wait for more keys in the [`KeyLookup::Ambiguous`] case. [`None`]
    /// takes the shorter binding right away.
    pub ambiguous_timeout: Option<Duration>,
}

impl KeyMap {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Bind `keys`, replacing any binding it had. Empty keys are ignored.
    pub fn bind(&mut self, binding: impl Into<Binding>, keys: impl AsRef<str>) {
        let keys = keys.as_ref();
        if !keys.is_empty() {
            self.bindings.insert(keys.to_owned(), binding.into());
        }
    }

    pub fn bind_all<S: AsRef<str>>(
        &mut self,
        binding: impl Into<Binding>,
        all_keys: impl IntoIterator<Item = S>,
    ) {
        let binding = binding.into();
        for keys in all_keys {
            self.bind(binding.clone(), keys);
        }
    }

    pub fn unbind(&mut self, keys: &str) -> Option<Binding> { self.bindings.remove(keys) }

    #[must_use]
    pub fn get(&self, keys: &str) -> Option<&Binding> { self.bindings.get(keys) }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.bindings.iter().map(|(keys, binding)| (keys.as_str(), binding))
    }

    /// Some bound sequence is longer than `prefix` and starts with it.
    #[must_use]
    pub fn has_longer(&self, prefix: &str) -> bool {
        self.bindings
            .range::<str, _>((Excluded(prefix), Unbounded))
            .next()
            .is_some_and(|(keys, _)| keys.starts_with(prefix))
    }

    /// Resolve the keys read so far. Walks the keys char by char, following the
    /// longest path that bound sequences share with them.
    #[must_use]
    pub fn lookup(&self, keys: &str) -> KeyLookup {
        let ends: Vec<usize> = keys
            .char_indices()
            .map(|(index, ch)| index + ch.len_utf8())
            .collect();
        for (count, end) in ends.iter().enumerate() {
            let prefix = &keys[..*end];
            let is_last = count + 1 == ends.len();
            if self.has_longer(prefix) {
                if is_last {
                    return match self.get(prefix) {
                        Some(binding) => KeyLookup::Ambiguous(binding.clone()),
                        None => KeyLookup::Prefix,
                    };
                }
                continue;
            }
            if let Some(binding) = self.get(prefix) {
                return KeyLookup::Bound {
                    binding: binding.clone(),
                    consumed: count + 1,
                };
            }
            // Fall back to the shorter sequence the walk came through.
            let shorter = count.checked_sub(1).map(|it| &keys[..ends[it]]);
            return match shorter.and_then(|it| self.get(it)) {
                Some(binding) => KeyLookup::Bound {
                    binding: binding.clone(),
                    consumed: count,
                },
                None => KeyLookup::NoMatch,
            };
        }
        KeyLookup::NoMatch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WidgetName;
    use pretty_assertions::assert_eq;

    fn key_map() -> KeyMap {
        let mut it = KeyMap::new();
        it.bind(WidgetName::ViCmdMode, "\x1b");
        it.bind(WidgetName::UpLineOrHistory, "\x1b[A");
        it.bind(WidgetName::ForwardWord, "\x1bf");
        it.bind(WidgetName::BeginningOfLine, ctrl('A'));
        it
    }

    #[test]
    fn test_ctrl_and_alt() {
        assert_eq!(ctrl('A'), "\x01");
        assert_eq!(ctrl('a'), "\x01");
        assert_eq!(ctrl('['), "\x1b");
        assert_eq!(ctrl('@'), "\x00");
        assert_eq!(ctrl('?'), "\x7f");
        assert_eq!(ctrl('D'), CTRL_D.to_string());
        assert_eq!(alt("f"), "\x1bf");
        assert_eq!(range('a', 'c'), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_lookup() {
        let it = key_map();
        assert_eq!(
            it.lookup("\x01"),
            KeyLookup::Bound {
                binding: WidgetName::BeginningOfLine.into(),
                consumed: 1
            }
        );
        assert_eq!(
            it.lookup("\x1b"),
            KeyLookup::Ambiguous(WidgetName::ViCmdMode.into())
        );
        assert_eq!(it.lookup("\x1b["), KeyLookup::Prefix);
        assert_eq!(
            it.lookup("\x1b[A"),
            KeyLookup::Bound {
                binding: WidgetName::UpLineOrHistory.into(),
                consumed: 3
            }
        );
        assert_eq!(it.lookup("z"), KeyLookup::NoMatch);
    }

    #[test]
    fn test_lookup_falls_back_to_shorter_binding() {
        let it = key_map();
        // ESC then a key that continues no binding: ESC alone, `x` is left over.
        assert_eq!(
            it.lookup("\x1bx"),
            KeyLookup::Bound {
                binding: WidgetName::ViCmdMode.into(),
                consumed: 1
            }
        );
        // A dead end two keys deep with no binding on the way.
        assert_eq!(it.lookup("\x1b[Z"), KeyLookup::NoMatch);
    }

    #[test]
    fn test_unbind() {
        let mut it = key_map();
        assert!(it.unbind("\x1bf").is_some());
        assert!(it.get("\x1bf").is_none());
        assert_eq!(it.iter().count(), 3);
    }
}

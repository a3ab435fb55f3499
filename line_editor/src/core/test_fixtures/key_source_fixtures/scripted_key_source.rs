// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{collections::VecDeque,
          io,
          sync::{Arc,
                 atomic::{AtomicBool, Ordering}},
          time::Duration};

use crate::{KeyInput, KeySource};

/// Plays back a fixed list of [`KeyInput`]s, then reports [`KeyInput::Eof`] forever.
/// Timeouts are part of the script, so tests that need "the user paused here" push a
/// [`KeyInput::Timeout`] instead of sleeping.
#[derive(Debug, Default)]
pub struct ScriptedKeySource {
    script: VecDeque<KeyInput>,
    interrupted: Option<Arc<AtomicBool>>,
}

impl ScriptedKeySource {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// One [`KeyInput::Char`] per char of `keys`.
    #[must_use]
    pub fn from_keys(keys: &str) -> Self {
        let mut it = Self::new();
        it.push_keys(keys);
        it
    }

    pub fn push(&mut self, input: KeyInput) -> &mut Self {
        self.script.push_back(input);
        self
    }

    pub fn push_keys(&mut self, keys: &str) -> &mut Self {
        self.script.extend(keys.chars().map(KeyInput::Char));
        self
    }

    #[must_use]
    pub fn remaining(&self) -> usize { self.script.len() }
}

impl KeySource for ScriptedKeySource {
    fn read_key(&mut self, _timeout: Option<Duration>) -> io::Result<KeyInput> {
        let interrupted = self
            .interrupted
            .as_ref()
            .is_some_and(|it| it.swap(false, Ordering::AcqRel));
        if interrupted {
            return Ok(KeyInput::Interrupt);
        }
        Ok(self.script.pop_front().unwrap_or(KeyInput::Eof))
    }

    fn attach_interrupt(&mut self, flag: Arc<AtomicBool>) { self.interrupted = Some(flag); }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plays_script_then_eof() {
        let mut it = ScriptedKeySource::from_keys("ab");
        it.push(KeyInput::Timeout);
        assert_eq!(it.remaining(), 3);
        assert_eq!(it.read_key(None).ok(), Some(KeyInput::Char('a')));
        assert_eq!(it.read_key(None).ok(), Some(KeyInput::Char('b')));
        assert_eq!(it.read_key(None).ok(), Some(KeyInput::Timeout));
        assert_eq!(it.read_key(None).ok(), Some(KeyInput::Eof));
        assert_eq!(it.read_key(None).ok(), Some(KeyInput::Eof));
    }

    #[test]
    fn test_attached_flag_interrupts() {
        let flag = Arc::new(AtomicBool::new(false));
        let mut it = ScriptedKeySource::from_keys("a");
        it.attach_interrupt(flag.clone());
        flag.store(true, Ordering::Release);
        assert_eq!(it.read_key(None).ok(), Some(KeyInput::Interrupt));
        assert_eq!(it.read_key(None).ok(), Some(KeyInput::Char('a')));
    }
}

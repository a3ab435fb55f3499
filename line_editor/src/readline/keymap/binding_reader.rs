// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{collections::VecDeque,
          io,
          sync::{Arc,
                 atomic::{AtomicBool, Ordering}},
          time::Duration};

use super::{Binding, KeyLookup, KeyMap};
use crate::{KeyInput, KeySource};

/// Result of reading one binding.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyRead {
    Binding(Binding),
    Eof,
    Interrupt,
}

/// Turns keys into bindings.
///
/// Keys come from the push back queue first (macros and keys handed back by nested
/// loops), then from the [`KeySource`]. Keys read past the end of a binding go back to
/// the front of the queue for the next read.
pub struct BindingReader {
    source: Box<dyn KeySource>,
    push_back: VecDeque<char>,
    op_buffer: String,
    last_binding: String,
    interrupted: Arc<AtomicBool>,
}

impl std::fmt::Debug for BindingReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingReader")
            .field("push_back", &self.push_back)
            .field("op_buffer", &self.op_buffer)
            .field("last_binding", &self.last_binding)
            .finish_non_exhaustive()
    }
}

impl BindingReader {
    pub fn new(mut source: Box<dyn KeySource>) -> Self {
        let interrupted = Arc::new(AtomicBool::new(false));
        source.attach_interrupt(interrupted.clone());
        Self {
            source,
            push_back: VecDeque::new(),
            op_buffer: String::new(),
            last_binding: String::new(),
            interrupted,
        }
    }

    /// Set from any thread to make the blocked read return [`KeyRead::Interrupt`].
    #[must_use]
    pub fn interrupt_flag(&self) -> Arc<AtomicBool> { self.interrupted.clone() }

    /// Keys of the binding returned by the last [`Self::read_binding`], or the char
    /// returned by the last [`Self::read_character`].
    #[must_use]
    pub fn last_binding(&self) -> &str { &self.last_binding }

    /// Replay `keys` after anything already queued.
    pub fn run_macro(&mut self, keys: &str) { self.push_back.extend(keys.chars()); }

    /// Hand the last binding back so the next read returns it again. Nested loops use
    /// this to end on a key that the outer loop should handle.
    pub fn push_back_binding(&mut self) {
        for ch in self.last_binding.chars().rev() {
            self.push_back.push_front(ch);
        }
        self.last_binding.clear();
    }

    /// Drop queued keys and any partial sequence.
    pub fn reset(&mut self) {
        self.push_back.clear();
        self.op_buffer.clear();
        self.interrupted.store(false, Ordering::Release);
    }

    /// Read keys until they resolve to a binding of `local` (checked first) or `keys`.
    ///
    /// # Errors
    ///
    /// I/O errors of the key source.
    pub fn read_binding(
        &mut self,
        keys: &KeyMap,
        local: Option<&KeyMap>,
    ) -> io::Result<KeyRead> {
        self.last_binding.clear();
        loop {
            if !self.op_buffer.is_empty() {
                let found = match local.map(|it| it.lookup(&self.op_buffer)) {
                    Some(KeyLookup::NoMatch) | None => keys.lookup(&self.op_buffer),
                    Some(hit) => hit,
                };
                match found {
                    KeyLookup::Bound { binding, consumed } => {
                        let split = self
                            .op_buffer
                            .char_indices()
                            .nth(consumed)
                            .map_or(self.op_buffer.len(), |(index, _)| index);
                        for ch in self.op_buffer[split..].chars().rev() {
                            self.push_back.push_front(ch);
                        }
                        self.op_buffer.truncate(split);
                        self.last_binding = std::mem::take(&mut self.op_buffer);
                        return Ok(KeyRead::Binding(binding));
                    }
                    KeyLookup::Ambiguous(binding) => {
                        let more = match keys.ambiguous_timeout {
                            Some(timeout) => self.peek_character(timeout)?,
                            None => false,
                        };
                        if !more {
                            self.last_binding = std::mem::take(&mut self.op_buffer);
                            return Ok(KeyRead::Binding(binding));
                        }
                    }
                    KeyLookup::NoMatch => {
                        let first_len =
                            self.op_buffer.chars().next().map_or(0, char::len_utf8);
                        let rest = self.op_buffer.split_off(first_len);
                        self.last_binding = std::mem::replace(&mut self.op_buffer, rest);
                        let is_unicode =
                            self.last_binding.chars().any(|it| u32::from(it) >= 128);
                        let fallback = if is_unicode {
                            &keys.unicode
                        } else {
                            &keys.nomatch
                        };
                        if let Some(binding) = fallback {
                            return Ok(KeyRead::Binding(binding.clone()));
                        }
                        // Drop the char, try again with what is left.
                        continue;
                    }
                    KeyLookup::Prefix => {}
                }
            }

            match self.next_key(None)? {
                KeyInput::Char(ch) => self.op_buffer.push(ch),
                KeyInput::Timeout => {}
                KeyInput::Eof => return Ok(KeyRead::Eof),
                KeyInput::Interrupt => return Ok(KeyRead::Interrupt),
            }
        }
    }

    /// Read a single char, bypassing key maps. Used by `quoted-insert` and the vi find
    /// and replace widgets.
    ///
    /// # Errors
    ///
    /// I/O errors of the key source.
    pub fn read_character(&mut self) -> io::Result<KeyInput> {
        let it = self.next_key(None)?;
        if let KeyInput::Char(ch) = it {
            self.last_binding = ch.to_string();
        }
        Ok(it)
    }

    /// Wait up to `timeout` for another key without consuming it.
    ///
    /// # Errors
    ///
    /// I/O errors of the key source.
    pub fn peek_character(&mut self, timeout: Duration) -> io::Result<bool> {
        if !self.push_back.is_empty() {
            return Ok(true);
        }
        match self.next_key(Some(timeout))? {
            KeyInput::Char(ch) => {
                self.push_back.push_front(ch);
                Ok(true)
            }
            KeyInput::Timeout | KeyInput::Eof => Ok(false),
            KeyInput::Interrupt => {
                // Keep the interrupt for the read that follows.
                self.interrupted.store(true, Ordering::Release);
                Ok(false)
            }
        }
    }

    fn next_key(&mut self, timeout: Option<Duration>) -> io::Result<KeyInput> {
        if self.interrupted.swap(false, Ordering::AcqRel) {
            return Ok(KeyInput::Interrupt);
        }
        if let Some(ch) = self.push_back.pop_front() {
            return Ok(KeyInput::Char(ch));
        }
        let it = self.source.read_key(timeout)?;
        if it == KeyInput::Timeout && self.interrupted.swap(false, Ordering::AcqRel) {
            return Ok(KeyInput::Interrupt);
        }
        Ok(it)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ScriptedKeySource, WidgetName, emacs_key_map, vi_insert_key_map};
    use pretty_assertions::assert_eq;

    fn reader(script: ScriptedKeySource) -> BindingReader {
        BindingReader::new(Box::new(script))
    }

    fn widget(read: io::Result<KeyRead>) -> Option<WidgetName> {
        match read {
            Ok(KeyRead::Binding(binding)) => binding.builtin(),
            _ => None,
        }
    }

    #[test]
    fn test_reads_single_and_multi_key_bindings() {
        let keys = emacs_key_map();
        let mut it = reader(ScriptedKeySource::from_keys("a\x1b[A\x01"));
        assert_eq!(widget(it.read_binding(&keys, None)), Some(WidgetName::SelfInsert));
        assert_eq!(it.last_binding(), "a");
        assert_eq!(
            widget(it.read_binding(&keys, None)),
            Some(WidgetName::UpLineOrSearch)
        );
        assert_eq!(it.last_binding(), "\x1b[A");
        assert_eq!(
            widget(it.read_binding(&keys, None)),
            Some(WidgetName::BeginningOfLine)
        );
        assert!(matches!(it.read_binding(&keys, None), Ok(KeyRead::Eof)));
    }

    #[test]
    fn test_lone_escape_resolves_after_timeout() {
        let mut keys = vi_insert_key_map();
        keys.ambiguous_timeout = Some(Duration::from_millis(10));
        let mut script = ScriptedKeySource::from_keys("\x1b");
        script.push(KeyInput::Timeout);
        script.push_keys("x");
        let mut it = reader(script);
        assert_eq!(widget(it.read_binding(&keys, None)), Some(WidgetName::ViCmdMode));
        assert_eq!(widget(it.read_binding(&keys, None)), Some(WidgetName::SelfInsert));
        assert_eq!(it.last_binding(), "x");
    }

    #[test]
    fn test_extra_keys_are_kept_for_next_read() {
        let mut keys = KeyMap::new();
        keys.bind(WidgetName::ViCmdMode, "\x1b");
        keys.bind(WidgetName::ForwardWord, "\x1bf");
        keys.bind(WidgetName::SelfInsert, "x");
        keys.ambiguous_timeout = Some(Duration::from_millis(10));
        let mut it = reader(ScriptedKeySource::from_keys("\x1bx"));
        assert_eq!(widget(it.read_binding(&keys, None)), Some(WidgetName::ViCmdMode));
        assert_eq!(widget(it.read_binding(&keys, None)), Some(WidgetName::SelfInsert));
    }

    #[test]
    fn test_unicode_fallback_and_unbound_chars() {
        let keys = emacs_key_map();
        let mut it = reader(ScriptedKeySource::from_keys("é"));
        assert_eq!(widget(it.read_binding(&keys, None)), None, "unicode is unset");

        let mut keys = emacs_key_map();
        keys.unicode = Some(WidgetName::SelfInsert.into());
        let mut it = reader(ScriptedKeySource::from_keys("é"));
        assert_eq!(widget(it.read_binding(&keys, None)), Some(WidgetName::SelfInsert));
        assert_eq!(it.last_binding(), "é");
    }

    #[test]
    fn test_local_map_wins() {
        let keys = emacs_key_map();
        let mut local = KeyMap::new();
        local.bind(WidgetName::DeactivateRegion, "a");
        let mut it = reader(ScriptedKeySource::from_keys("ab"));
        assert_eq!(
            widget(it.read_binding(&keys, Some(&local))),
            Some(WidgetName::DeactivateRegion)
        );
        assert_eq!(
            widget(it.read_binding(&keys, Some(&local))),
            Some(WidgetName::SelfInsert)
        );
    }

    #[test]
    fn test_macro_and_push_back() {
        let keys = emacs_key_map();
        let mut it = reader(ScriptedKeySource::from_keys("z"));
        it.run_macro("\x05");
        assert_eq!(widget(it.read_binding(&keys, None)), Some(WidgetName::EndOfLine));
        it.push_back_binding();
        assert_eq!(widget(it.read_binding(&keys, None)), Some(WidgetName::EndOfLine));
        assert_eq!(widget(it.read_binding(&keys, None)), Some(WidgetName::SelfInsert));
    }

    #[test]
    fn test_interrupt_flag() {
        let keys = emacs_key_map();
        let mut it = reader(ScriptedKeySource::from_keys("a"));
        it.interrupt_flag().store(true, Ordering::Release);
        assert!(matches!(it.read_binding(&keys, None), Ok(KeyRead::Interrupt)));
        assert_eq!(widget(it.read_binding(&keys, None)), Some(WidgetName::SelfInsert));
    }
}

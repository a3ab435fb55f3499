// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Fixed size ring of killed (cut) text.
//!
//! Consecutive kills coalesce into one slot, so that `kill-word kill-word yank` brings
//! back both words. [`KillRing::yank_pop`] only works right after a yank. The ring does
//! not know what the user did between two calls; the reader loop calls
//! [`KillRing::reset_last_kill`] and [`KillRing::reset_last_yank`] after every widget
//! that is not a kill or a yank.

/// Number of slots used when none is configured.
pub const DEFAULT_KILL_RING_SIZE: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillRing {
    slots: Vec<Option<String>>,
    head: usize,
    last_was_kill: bool,
    last_was_yank: bool,
}

impl Default for KillRing {
    fn default() -> Self { Self::new(DEFAULT_KILL_RING_SIZE) }
}

impl KillRing {
    /// Creates a ring with `size` slots (at least one).
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size.max(1)],
            head: 0,
            last_was_kill: false,
            last_was_yank: false,
        }
    }

    pub fn reset_last_yank(&mut self) { self.last_was_yank = false; }

    pub fn reset_last_kill(&mut self) { self.last_was_kill = false; }

    #[must_use]
    pub fn last_was_yank(&self) -> bool { self.last_was_yank }

    #[must_use]
    pub fn last_was_kill(&self) -> bool { self.last_was_kill }

    /// Stores text killed forward (`kill-line`, `kill-word`). Appends to the current
    /// slot if the previous command was a kill too.
    pub fn add(&mut self, text: &str) {
        self.last_was_yank = false;
        if self.last_was_kill {
            if let Some(slot) = self.slots[self.head].as_mut() {
                slot.push_str(text);
                return;
            }
        }
        self.last_was_kill = true;
        self.advance();
        self.slots[self.head] = Some(text.to_string());
    }

    /// Stores text killed backward (`backward-kill-word`). Prepends to the current slot
    /// if the previous command was a kill too.
    pub fn add_backwards(&mut self, text: &str) {
        self.last_was_yank = false;
        if self.last_was_kill {
            if let Some(slot) = self.slots[self.head].as_mut() {
                slot.insert_str(0, text);
                return;
            }
        }
        self.last_was_kill = true;
        self.advance();
        self.slots[self.head] = Some(text.to_string());
    }

    /// The most recent kill, or [`None`] if nothing was killed yet.
    pub fn yank(&mut self) -> Option<&str> {
        self.last_was_kill = false;
        self.last_was_yank = true;
        self.slots[self.head].as_deref()
    }

    /// Rotates to the previous kill. Only valid right after [`KillRing::yank`] or
    /// another `yank_pop`, returns [`None`] otherwise.
    pub fn yank_pop(&mut self) -> Option<&str> {
        self.last_was_kill = false;
        if !self.last_was_yank {
            return None;
        }
        self.retreat();
        self.slots[self.head].as_deref()
    }

    /// Moves `head` to a fresh slot, unless the ring is still empty.
    fn advance(&mut self) {
        if self.head == 0 && self.slots[0].is_none() {
            return;
        }
        self.head = (self.head + 1) % self.slots.len();
    }

    /// Moves `head` back, skipping the never filled slots at the end of the ring.
    fn retreat(&mut self) {
        if self.head > 0 {
            self.head -= 1;
            return;
        }
        self.head = self
            .slots
            .iter()
            .rposition(Option::is_some)
            .unwrap_or(0);
    }
}

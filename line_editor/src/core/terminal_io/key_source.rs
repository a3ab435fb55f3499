// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io,
          sync::{Arc, atomic::AtomicBool},
          time::Duration};

/// One unit of keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    /// Nothing arrived before the timeout passed to [`KeySource::read_key`].
    Timeout,
    /// The read was cancelled, eg: by [`crate::LineReaderHandle::interrupt`].
    Interrupt,
    /// No more input will ever arrive.
    Eof,
}

/// Where keys come from. Keys are delivered as the chars of canonical terminal
/// sequences (`\x01` for Ctrl+A, `\x1b[A` for Up, `\x1bf` for Alt+F), one char at a
/// time. This allows real terminals and scripted tests to be swapped via dependency
/// injection.
pub trait KeySource: Send {
    /// Block until a char arrives, or until `timeout` passes ([`None`] waits forever).
    ///
    /// # Errors
    ///
    /// I/O errors of the underlying terminal.
    fn read_key(&mut self, timeout: Option<Duration>) -> io::Result<KeyInput>;

    /// A blocking implementation should return [`KeyInput::Interrupt`] soon after
    /// `flag` becomes `true`, and clear it. The default does nothing: the flag is still
    /// checked between reads.
    fn attach_interrupt(&mut self, _flag: Arc<AtomicBool>) {}
}

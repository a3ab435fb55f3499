// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{collections::VecDeque,
          io,
          sync::{Arc,
                 atomic::{AtomicBool, Ordering}},
          time::{Duration, Instant}};

use crossterm::{event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
                terminal};

use super::{KeyInput, KeySource};

/// How often a blocked read wakes up to check for an interrupt.
pub const INTERRUPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

const F_KEYS: [&str; 12] = [
    "\x1bOP", "\x1bOQ", "\x1bOR", "\x1bOS", "\x1b[15~", "\x1b[17~", "\x1b[18~",
    "\x1b[19~", "\x1b[20~", "\x1b[21~", "\x1b[23~", "\x1b[24~",
];

/// Reads key events from the terminal with crossterm and turns each one into the chars
/// of its canonical escape sequence. The terminal has to be in raw mode, see
/// [`RawModeGuard`].
#[derive(Debug, Default)]
pub struct CrosstermKeySource {
    pending: VecDeque<char>,
    interrupted: Option<Arc<AtomicBool>>,
}

impl CrosstermKeySource {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    fn take_interrupt(&self) -> bool {
        self.interrupted
            .as_ref()
            .is_some_and(|it| it.swap(false, Ordering::AcqRel))
    }
}

impl KeySource for CrosstermKeySource {
    fn read_key(&mut self, timeout: Option<Duration>) -> io::Result<KeyInput> {
        let deadline = timeout.map(|it| Instant::now() + it);
        loop {
            if let Some(ch) = self.pending.pop_front() {
                return Ok(KeyInput::Char(ch));
            }
            if self.take_interrupt() {
                return Ok(KeyInput::Interrupt);
            }
            let slice = match deadline {
                Some(deadline) => {
                    let left = deadline.saturating_duration_since(Instant::now());
                    if left.is_zero() {
                        return Ok(KeyInput::Timeout);
                    }
                    left.min(INTERRUPT_POLL_INTERVAL)
                }
                None => INTERRUPT_POLL_INTERVAL,
            };
            if !event::poll(slice)? {
                continue;
            }
            match event::read()? {
                Event::Key(key_event) if key_event.kind != KeyEventKind::Release => {
                    self.pending.extend(key_event_to_keys(&key_event).chars());
                }
                Event::Paste(text) => self.pending.extend(text.chars()),
                // Resize is picked up by the SIGWINCH watcher.
                _ => {}
            }
        }
    }

    fn attach_interrupt(&mut self, flag: Arc<AtomicBool>) { self.interrupted = Some(flag); }
}

/// xterm modifier parameter: 1 + shift + 2 * alt + 4 * ctrl.
fn modifier_param(modifiers: KeyModifiers) -> u8 {
    1 + u8::from(modifiers.contains(KeyModifiers::SHIFT))
        + 2 * u8::from(modifiers.contains(KeyModifiers::ALT))
        + 4 * u8::from(modifiers.contains(KeyModifiers::CONTROL))
}

/// CSI sequence for a cursor key, eg: `\x1b[A`, or `\x1b[1;5A` with modifiers.
fn csi_letter(letter: char, modifiers: KeyModifiers) -> String {
    match modifier_param(modifiers) {
        1 => format!("\x1b[{letter}"),
        param => format!("\x1b[1;{param}{letter}"),
    }
}

/// CSI sequence for an editing key, eg: `\x1b[3~`, or `\x1b[3;5~` with modifiers.
fn csi_tilde(code: u8, modifiers: KeyModifiers) -> String {
    match modifier_param(modifiers) {
        1 => format!("\x1b[{code}~"),
        param => format!("\x1b[{code};{param}~"),
    }
}

/// The chars a terminal sends for `key_event`. Empty for keys that have no sequence.
#[must_use]
pub fn key_event_to_keys(key_event: &KeyEvent) -> String {
    let modifiers = key_event.modifiers;
    let alt = modifiers.contains(KeyModifiers::ALT);
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let meta = |keys: String| if alt { format!("\x1b{keys}") } else { keys };

    match key_event.code {
        KeyCode::Char(ch) if ctrl => meta(control_char(ch).map(String::from).unwrap_or_default()),
        KeyCode::Char(ch) => meta(ch.to_string()),
        KeyCode::Enter => meta("\r".into()),
        KeyCode::Tab => meta("\t".into()),
        KeyCode::BackTab => "\x1b[Z".into(),
        KeyCode::Backspace if ctrl => meta("\x08".into()),
        KeyCode::Backspace => meta("\x7f".into()),
        KeyCode::Esc => meta("\x1b".into()),
        KeyCode::Null => "\x00".into(),
        KeyCode::Up => csi_letter('A', modifiers),
        KeyCode::Down => csi_letter('B', modifiers),
        KeyCode::Right => csi_letter('C', modifiers),
        KeyCode::Left => csi_letter('D', modifiers),
        KeyCode::Home => csi_letter('H', modifiers),
        KeyCode::End => csi_letter('F', modifiers),
        KeyCode::Insert => csi_tilde(2, modifiers),
        KeyCode::Delete => csi_tilde(3, modifiers),
        KeyCode::PageUp => csi_tilde(5, modifiers),
        KeyCode::PageDown => csi_tilde(6, modifiers),
        KeyCode::F(number) => F_KEYS
            .get(usize::from(number).wrapping_sub(1))
            .map(|it| (*it).to_owned())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

fn control_char(ch: char) -> Option<char> {
    match ch {
        '?' => Some('\x7f'),
        ' ' | '2' => Some('\x00'),
        'a'..='z' | 'A'..='Z' | '@' | '[' | '\\' | ']' | '^' | '_' => {
            u8::try_from(u32::from(ch) & 0x1f).ok().map(char::from)
        }
        '3' => Some('\x1b'),
        '4' => Some('\x1c'),
        '5' => Some('\x1d'),
        '6' => Some('\x1e'),
        '7' | '/' => Some('\x1f'),
        _ => None,
    }
}

/// Puts the terminal in raw mode for as long as it lives.
#[derive(Debug)]
pub struct RawModeGuard;

impl RawModeGuard {
    /// # Errors
    ///
    /// When the terminal can't be switched to raw mode.
    pub fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(error) = terminal::disable_raw_mode() {
            tracing::warn!(message = "Failed to leave raw mode", error = ?error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(KeyCode::Char('a'), KeyModifiers::NONE, "a" ; "plain char")]
    #[test_case(KeyCode::Char('A'), KeyModifiers::SHIFT, "A" ; "shifted char")]
    #[test_case(KeyCode::Char('a'), KeyModifiers::CONTROL, "\x01" ; "ctrl a")]
    #[test_case(KeyCode::Char('_'), KeyModifiers::CONTROL, "\x1f" ; "ctrl underscore")]
    #[test_case(KeyCode::Char(' '), KeyModifiers::CONTROL, "\x00" ; "ctrl space")]
    #[test_case(KeyCode::Char('f'), KeyModifiers::ALT, "\x1bf" ; "alt f")]
    #[test_case(KeyCode::Backspace, KeyModifiers::ALT, "\x1b\x7f" ; "alt backspace")]
    #[test_case(KeyCode::Enter, KeyModifiers::NONE, "\r" ; "enter")]
    #[test_case(KeyCode::Up, KeyModifiers::NONE, "\x1b[A" ; "up")]
    #[test_case(KeyCode::Right, KeyModifiers::CONTROL, "\x1b[1;5C" ; "ctrl right")]
    #[test_case(KeyCode::Left, KeyModifiers::ALT, "\x1b[1;3D" ; "alt left")]
    #[test_case(KeyCode::Delete, KeyModifiers::NONE, "\x1b[3~" ; "delete")]
    #[test_case(KeyCode::Delete, KeyModifiers::CONTROL, "\x1b[3;5~" ; "ctrl delete")]
    #[test_case(KeyCode::BackTab, KeyModifiers::SHIFT, "\x1b[Z" ; "back tab")]
    #[test_case(KeyCode::F(1), KeyModifiers::NONE, "\x1bOP" ; "f1")]
    #[test_case(KeyCode::F(0), KeyModifiers::NONE, "" ; "no f0")]
    fn test_key_event_to_keys(code: KeyCode, modifiers: KeyModifiers, expected: &str) {
        assert_eq!(key_event_to_keys(&KeyEvent::new(code, modifiers)), expected);
    }
}

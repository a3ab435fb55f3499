// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::{Debug, Formatter},
          io,
          sync::{Arc,
                 atomic::{AtomicBool, Ordering}}};

use crate::{ReadlineError, RenderFrame, Renderer, Safe, Size, lock_ignoring_poison, ok};

/// The part of the reader that other threads may touch while a read is blocked on the
/// next key: the renderer and what it painted last. The editing state itself stays with
/// the reading thread, which only takes this lock to paint.
pub struct SharedDisplay {
    pub renderer: Box<dyn Renderer>,
    pub last_frame: Option<RenderFrame>,
    /// A read is in progress, so the last frame is on screen.
    pub reading: bool,
}

impl Debug for SharedDisplay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedDisplay")
            .field("last_frame", &self.last_frame)
            .field("reading", &self.reading)
            .finish_non_exhaustive()
    }
}

impl SharedDisplay {
    #[must_use]
    pub fn new(renderer: Box<dyn Renderer>) -> Self {
        Self {
            renderer,
            last_frame: None,
            reading: false,
        }
    }

    /// Paint the last frame again, if a read is showing one.
    ///
    /// # Errors
    ///
    /// I/O errors of the renderer.
    pub fn repaint(&mut self) -> io::Result<()> {
        if !self.reading {
            return ok!();
        }
        if let Some(frame) = &self.last_frame {
            self.renderer.render(frame)?;
        }
        ok!()
    }
}

/// Cloneable handle for talking to a [`crate::LineReader`] from other threads, eg: a
/// task that logs while the user types.
#[derive(Clone)]
pub struct LineReaderHandle {
    pub(crate) display: Safe<SharedDisplay>,
    pub(crate) interrupted: Arc<AtomicBool>,
}

impl Debug for LineReaderHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineReaderHandle")
            .field("interrupted", &self.interrupted)
            .finish_non_exhaustive()
    }
}

impl LineReaderHandle {
    /// Print `text` above the prompt. The line being edited is painted again below it.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::Poisoned`] if a thread panicked while painting, or the I/O
    /// error of the renderer.
    pub fn print_above(&self, text: &str) -> Result<(), ReadlineError> {
        let mut display = self.display.lock().map_err(|_| ReadlineError::Poisoned)?;
        display.renderer.print_above(text)?;
        display.repaint()?;
        ok!()
    }

    /// Tell the renderer about a new terminal size and repaint.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::Poisoned`] if a thread panicked while painting, or the I/O
    /// error of the renderer.
    pub fn resize(&self, size: Size) -> Result<(), ReadlineError> {
        let mut display = self.display.lock().map_err(|_| ReadlineError::Poisoned)?;
        display.renderer.set_size(size);
        display.repaint()?;
        ok!()
    }

    #[must_use]
    pub fn size(&self) -> Size { lock_ignoring_poison(&self.display).renderer.size() }

    /// Make the blocked read return [`ReadlineError::UserInterrupt`].
    pub fn interrupt(&self) { self.interrupted.store(true, Ordering::Release); }
}

/// Repaints on `SIGWINCH` for as long as it lives.
#[cfg(unix)]
#[derive(Debug)]
pub struct ResizeWatcher {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl ResizeWatcher {
    /// Watch for terminal resizes and pass the new size to `reader`.
    ///
    /// # Errors
    ///
    /// When the signal handler can't be registered.
    pub fn new(reader: LineReaderHandle) -> io::Result<Self> {
        use signal_hook::{consts::signal::SIGWINCH, iterator::Signals};

        let mut signals = Signals::new([SIGWINCH])?;
        let handle = signals.handle();
        let thread = std::thread::spawn(move || {
            for _ in signals.forever() {
                let Ok((columns, rows)) = crossterm::terminal::size() else {
                    continue;
                };
                if let Err(error) = reader.resize(Size::new(columns, rows)) {
                    tracing::warn!(message = "Repaint after resize failed", error = ?error);
                }
            }
        });
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }
}

#[cfg(unix)]
impl Drop for ResizeWatcher {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            thread.join().ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RecordingRenderer, StdMutex};
    use pretty_assertions::assert_eq;

    fn handle(renderer: &RecordingRenderer) -> LineReaderHandle {
        LineReaderHandle {
            display: Arc::new(StdMutex::new(SharedDisplay::new(Box::new(
                renderer.clone(),
            )))),
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }

    #[test]
    fn test_print_above_repaints_only_while_reading() -> Result<(), ReadlineError> {
        let renderer = RecordingRenderer::new();
        let it = handle(&renderer);

        it.print_above("before")?;
        assert_eq!(renderer.record().frames.len(), 0);

        {
            let mut display = lock_ignoring_poison(&it.display);
            display.reading = true;
            display.last_frame = Some(RenderFrame {
                lines: vec!["> ab".into()],
                ..Default::default()
            });
        }
        it.print_above("during")?;
        let record = renderer.record();
        assert_eq!(record.printed, vec!["before".to_owned(), "during".to_owned()]);
        assert_eq!(record.frames.len(), 1);
        ok!()
    }

    #[test]
    fn test_resize_and_interrupt() -> Result<(), ReadlineError> {
        let renderer = RecordingRenderer::new();
        let it = handle(&renderer);
        it.resize(Size::new(40, 10))?;
        assert_eq!(it.size(), Size::new(40, 10));

        it.interrupt();
        assert!(it.interrupted.load(Ordering::Acquire));
        ok!()
    }
}

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io, sync::Arc};

use crate::{RenderFrame, Renderer, Size, StdMutex, lock_ignoring_poison};

/// What a [`RecordingRenderer`] saw.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderRecord {
    pub frames: Vec<RenderFrame>,
    pub beeps: usize,
    pub printed: Vec<String>,
    pub clear_screens: usize,
    pub finished_lines: usize,
}

/// A [`Renderer`] that paints nothing and remembers every call. Clones share the
/// record, so a test keeps one clone and gives the other to the reader.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    record: Arc<StdMutex<RenderRecord>>,
    size: Size,
}

impl RecordingRenderer {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn with_size(size: Size) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn record(&self) -> RenderRecord { lock_ignoring_poison(&self.record).clone() }

    #[must_use]
    pub fn last_frame(&self) -> Option<RenderFrame> {
        lock_ignoring_poison(&self.record).frames.last().cloned()
    }

    #[must_use]
    pub fn beeps(&self) -> usize { lock_ignoring_poison(&self.record).beeps }

    /// Status text of the last frame.
    #[must_use]
    pub fn last_post(&self) -> Option<String> {
        self.last_frame().and_then(|it| it.post)
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, frame: &RenderFrame) -> io::Result<()> {
        lock_ignoring_poison(&self.record).frames.push(frame.clone());
        Ok(())
    }

    fn beep(&mut self) -> io::Result<()> {
        lock_ignoring_poison(&self.record).beeps += 1;
        Ok(())
    }

    fn size(&self) -> Size { self.size }

    fn set_size(&mut self, size: Size) { self.size = size; }

    fn print_above(&mut self, text: &str) -> io::Result<()> {
        lock_ignoring_poison(&self.record).printed.push(text.to_owned());
        Ok(())
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        lock_ignoring_poison(&self.record).clear_screens += 1;
        Ok(())
    }

    fn erase(&mut self) -> io::Result<()> { Ok(()) }

    fn finish_line(&mut self) -> io::Result<()> {
        lock_ignoring_poison(&self.record).finished_lines += 1;
        Ok(())
    }
}

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod line_reader_handle;
pub mod line_reader_impl;

// Widgets, split by area. Each adds methods to `LineReader`.
mod completion_widgets;
mod edit_widgets;
mod history_widgets;
mod kill_yank_widgets;
mod misc_widgets;
mod motion_widgets;
mod vi_widgets;
mod widget_dispatch;

#[cfg(test)]
mod line_reader_tests;

// Re-export.
pub use line_reader_handle::*;
pub use line_reader_impl::*;

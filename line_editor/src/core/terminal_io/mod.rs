// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Private modules (hide internal structure).
mod ansi_renderer;
mod crossterm_key_source;
mod key_source;
mod renderer;

// Re-exports for flat public API.
pub use ansi_renderer::*;
pub use crossterm_key_source::*;
pub use key_source::*;
pub use renderer::*;

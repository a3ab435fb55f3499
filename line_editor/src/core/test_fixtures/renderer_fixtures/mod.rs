// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod recording_renderer;
pub mod stdout_mock;

// Re-export.
pub use recording_renderer::*;
pub use stdout_mock::*;

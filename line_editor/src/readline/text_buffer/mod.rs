// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod gap_buffer;

// Re-export.
pub use gap_buffer::*;

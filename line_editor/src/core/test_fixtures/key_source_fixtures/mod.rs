// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod scripted_key_source;

// Re-export.
pub use scripted_key_source::*;

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod reader_options;
pub mod reader_variables;

// Re-export.
pub use reader_options::*;
pub use reader_variables::*;

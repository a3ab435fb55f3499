// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod history_expander;
pub mod history_store;
pub mod memory_history;

// Re-export.
pub use history_expander::*;
pub use history_store::*;
pub use memory_history::*;

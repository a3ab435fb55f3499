// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod history_search;
pub mod incremental_search;

// Re-export.
pub use history_search::*;
pub use incremental_search::*;

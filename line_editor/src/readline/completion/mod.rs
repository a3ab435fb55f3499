// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod candidate;
pub mod column_layout;
pub mod completer;
pub mod completion_menu;
pub mod matchers;

// Re-export.
pub use candidate::*;
pub use column_layout::*;
pub use completer::*;
pub use completion_menu::*;
pub use matchers::*;

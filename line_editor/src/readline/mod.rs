// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod callbacks;
pub mod completion;
pub mod history;
pub mod keymap;
pub mod kill_ring;
pub mod line_reader;
pub mod options;
pub mod parser;
pub mod readline_error;
pub mod search;
pub mod text_buffer;
pub mod undo_tree;

// Re-export.
pub use callbacks::*;
pub use completion::*;
pub use history::*;
pub use keymap::*;
pub use kill_ring::*;
pub use line_reader::*;
pub use options::*;
pub use parser::*;
pub use readline_error::*;
pub use search::*;
pub use text_buffer::*;
pub use undo_tree::*;

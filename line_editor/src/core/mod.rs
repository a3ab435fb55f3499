// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Building blocks shared by the line editor that have nothing to do with editing
//! itself: result types and macros, logging setup, stack allocated collections, and the
//! fixtures that the engine tests use to script keystrokes and capture output.

// Attach.
pub mod common;
pub mod log;
pub mod stack_alloc_types;
pub mod terminal_io;
pub mod test_fixtures;

// Re-export.
pub use common::*;
pub use log::*;
pub use stack_alloc_types::*;
pub use terminal_io::*;
pub use test_fixtures::*;

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Stand-ins for the terminal, so that the reader loop can be driven end to end in
//! tests: keys come from a script, and frames, bells and output are recorded.

// Attach sources.
pub mod key_source_fixtures;
pub mod renderer_fixtures;

// Re-export.
pub use key_source_fixtures::*;
pub use renderer_fixtures::*;

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod binding;
pub mod binding_reader;
pub mod default_key_maps;
pub mod key_map;
pub mod widget_name;

// Re-export.
pub use binding::*;
pub use binding_reader::*;
pub use default_key_maps::*;
pub use key_map::*;
pub use widget_name::*;

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod bracket_checker;
pub mod line_parser;
pub mod parse_error;
pub mod parsed_line;
pub mod parser_config;

// Re-export.
pub use bracket_checker::*;
pub use line_parser::*;
pub use parse_error::*;
pub use parsed_line::*;
pub use parser_config::*;

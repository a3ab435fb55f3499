// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Pretty printing for the [`miette::Report`]s a host's `main() -> miette::Result<_>`
//! ends with, eg: a [`crate::ReadlineError`] from a terminal that went away.
//!
//! The hook is lazy: the terminal width is read when a report is printed, not when the
//! hook is installed, so a resize in between is picked up.

use miette::MietteHandlerOpts;

/// Width used when the terminal size can't be read (eg: output is piped).
const FALLBACK_WIDTH: u16 = 80;

/// Install a graphical report handler sized to the terminal, with `issues_url` as the
/// footer of every report.
pub fn setup_default_miette_global_report_handler(issues_url: &'static str) {
    miette::set_hook(Box::new(|_report| {
        let terminal_width = crossterm::terminal::size()
            .map_or(FALLBACK_WIDTH, |(columns, _rows)| columns);
        tracing::debug!(message = "Printing report", terminal_width = terminal_width);
        Box::new(
            MietteHandlerOpts::new()
                .width(usize::from(terminal_width))
                .wrap_lines(true)
                .unicode(true)
                .context_lines(2)
                .with_cause_chain()
                .footer(issues_url.to_string())
                .build(),
        )
    }))
    .ok();
}

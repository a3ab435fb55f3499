// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A small REPL on the process terminal. Try tab on an empty line, `C-r` to search
//! history, `!!` to repeat a command, and the `vi` and `emacs` commands to switch key
//! bindings. Logs go to `line_editor_debug.log`.

use std::str::FromStr;

use crossterm::style::Stylize;
use miette::IntoDiagnostic;
use r3bl_line_editor::{Candidate, CommonResult, LineReader, MemoryHistory, ParsedLine,
                       ReadlineError, TracingConfig, ok,
                       setup_default_miette_global_report_handler,
                       try_initialize_logging_global};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, EnumIter, Display)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
enum Command {
    Help,
    History,
    Password,
    Vi,
    Emacs,
    Exit,
}

impl Command {
    fn description(self) -> &'static str {
        match self {
            Command::Help => "list the commands",
            Command::History => "print what was typed so far",
            Command::Password => "read a line without echoing it",
            Command::Vi => "switch to vi key bindings",
            Command::Emacs => "switch to emacs key bindings",
            Command::Exit => "leave the repl",
        }
    }

    fn group(self) -> &'static str {
        match self {
            Command::Vi | Command::Emacs => "modes",
            _ => "commands",
        }
    }
}

fn complete(line: &ParsedLine, candidates: &mut Vec<Candidate>) -> CommonResult<()> {
    if line.word_index > 0 {
        return ok!();
    }
    candidates.extend(Command::iter().map(|it| {
        Candidate::new(it.to_string())
            .with_group(it.group())
            .with_description(it.description())
    }));
    ok!()
}

fn highlight(line: &str) -> CommonResult<String> {
    let mut words = line.splitn(2, ' ');
    let first = words.next().unwrap_or_default();
    let rest = words.next().map(|it| format!(" {it}")).unwrap_or_default();
    let first = if Command::from_str(first).is_ok() {
        first.green().bold().to_string()
    } else {
        first.to_owned()
    };
    Ok(format!("{first}{rest}"))
}

fn main() -> miette::Result<()> {
    setup_default_miette_global_report_handler(
        "https://github.com/r3bl-org/r3bl-open-core/issues",
    );
    try_initialize_logging_global(&TracingConfig::new_file(None))?;

    let mut reader = LineReader::new_terminal()
        .with_history(MemoryHistory::new(500))
        .with_completer(complete)
        .with_highlighter(highlight);

    #[cfg(unix)]
    let _resize_watcher =
        r3bl_line_editor::ResizeWatcher::new(reader.handle()).into_diagnostic()?;

    let prompt = "repl> ".cyan().to_string();
    loop {
        let line = match reader.read_line(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::UserInterrupt { .. }) => continue,
            Err(ReadlineError::EndOfFile { .. }) => break,
            Err(error) => return Err(error.into()),
        };
        tracing::info!(message = "Read line", line = %line);

        let Ok(command) = Command::from_str(line.trim()) else {
            if !line.trim().is_empty() {
                println!("{} {line}", "unknown command:".red());
            }
            continue;
        };
        match command {
            Command::Help => {
                for it in Command::iter() {
                    println!("{:<10} {}", it.to_string().bold(), it.description());
                }
            }
            Command::History => {
                let history = reader.history();
                for index in history.first_index()..history.end_index() {
                    if let Some(entry) = history.get(index) {
                        println!("{index:>4}  {entry}");
                    }
                }
            }
            Command::Password => match reader.read_line_masked("password: ", '*') {
                Ok(secret) => println!("{} chars typed", secret.chars().count()),
                Err(error) => println!("{error}"),
            },
            Command::Vi => {
                reader.call_widget("vi-editing-mode");
            }
            Command::Emacs => {
                reader.call_widget("emacs-editing-mode");
            }
            Command::Exit => break,
        }
    }
    Ok(())
}

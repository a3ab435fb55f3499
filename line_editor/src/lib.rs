// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words readline emacs isearch

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

//! # r3bl_line_editor
//!
//! An embeddable terminal line editor: call [`LineReader::read_line`] and get back one
//! edited line of text. It gives you the editing experience of a shell prompt, without
//! the shell.
//!
//! # Table of contents
//!
//! <!-- TOC -->
//! - [Features](#features)
//! - [Quick start](#quick-start)
//! - [How a keystroke becomes an edit](#how-a-keystroke-becomes-an-edit)
//! - [Key maps and widgets](#key-maps-and-widgets)
//! - [Completion](#completion)
//! - [History](#history)
//! - [Talking to the reader from other threads](#talking-to-the-reader-from-other-threads)
//! - [Logging](#logging)
//! - [Testing your own widgets](#testing-your-own-widgets)
//! <!-- /TOC -->
//!
//! # Features
//!
//! - Emacs and vi key maps (insert, command, visual and operator pending), both fully
//!   rebindable. Compile with `--no-default-features` to start in vi insert mode.
//! - A gap buffer measured in chars, with multi line editing.
//! - A kill ring with kill coalescing and `yank-pop`, and a linear undo / redo log.
//! - Shell like tokenizing with quotes, escapes and bracket checking. An unclosed quote
//!   or bracket continues the line instead of accepting it.
//! - History expansion (`!!`, `!$`, `!-2`, `^old^new^`, ...).
//! - Tab completion that narrows by prefix, substring and typos, lays the matches out
//!   in a column grid with groups and descriptions, and cycles through them in a menu.
//! - Incremental (`C-r`) and prefix (`M-p`) history search, plus the vi `/` and `?`
//!   searches.
//!
//! # Quick start
//!
//! ```no_run
//! use r3bl_line_editor::{LineReader, MemoryHistory, ReadlineError, StringsCompleter};
//!
//! let mut reader = LineReader::new_terminal()
//!     .with_history(MemoryHistory::new(500))
//!     .with_completer(StringsCompleter::new(["help", "history", "quit"]));
//!
//! loop {
//!     match reader.read_line("> ") {
//!         Ok(line) if line == "quit" => break,
//!         Ok(line) => println!("you typed: {line}"),
//!         // Ctrl+C clears the line, the prompt comes back.
//!         Err(ReadlineError::UserInterrupt { .. }) => continue,
//!         // Ctrl+D on an empty line.
//!         Err(ReadlineError::EndOfFile { .. }) => break,
//!         Err(error) => {
//!             eprintln!("{error}");
//!             break;
//!         }
//!     }
//! }
//! ```
//!
//! # How a keystroke becomes an edit
//!
//! ```text
//! KeySource ──▶ BindingReader ──▶ KeyMap lookup ──▶ widget ──▶ TextBuffer
//!   (keys)      (sequences,          (Binding)        │       (+ KillRing,
//!                timeouts)                            │        UndoTree, ...)
//!                                                     ▼
//!                                              Renderer (frame)
//! ```
//!
//! 1. A [`KeySource`] produces chars. [`CrosstermKeySource`] turns crossterm key events
//!    into the byte sequences a terminal sends, so that key maps are plain strings.
//! 2. The [`BindingReader`] collects chars until they resolve to a [`Binding`] in the
//!    active [`KeyMap`]. When a sequence is both bound and the start of a longer one
//!    (eg: `ESC` and `ESC f`), it waits [`ReaderVariables::ambiguous_binding_ms`] for
//!    more.
//! 3. The binding runs a widget. Widgets are methods of [`LineReader`] named by
//!    [`WidgetName`], or closures registered with [`LineReader::register_widget`].
//! 4. After every widget the reader pushes an undo snapshot if the text changed, and
//!    hands a [`RenderFrame`] to the [`Renderer`].
//!
//! # Key maps and widgets
//!
//! The reader owns a set of named key maps ([`EMACS`], [`VI_INSERT`], [`VI_COMMAND`],
//! [`MENU_SELECT`], [`VISUAL`], [`VI_OPP`], [`SAFE`]). [`MAIN`] is the one the reader
//! starts in. Rebind keys with [`LineReader::key_map_mut`]:
//!
//! ```
//! use r3bl_line_editor::{Binding, EMACS, LineReader, RecordingRenderer,
//!                        ScriptedKeySource, WidgetName, ctrl};
//!
//! let mut reader = LineReader::new(
//!     Box::new(ScriptedKeySource::from_keys("abc\x14\r")),
//!     Box::new(RecordingRenderer::new()),
//! );
//! reader.register_widget("shout", |reader| {
//!     let upper = reader.buffer().to_string().to_uppercase();
//!     reader.buffer_mut().set_text(&upper);
//!     true
//! });
//! for name in [EMACS, r3bl_line_editor::MAIN] {
//!     if let Some(key_map) = reader.key_map_mut(name) {
//!         key_map.bind(Binding::Widget("shout".into()), ctrl('T'));
//!         key_map.bind(WidgetName::KillLine, ctrl('K'));
//!     }
//! }
//! assert_eq!(reader.read_line("> ").ok().as_deref(), Some("ABC"));
//! ```
//!
//! Behavior switches live in [`ReaderOptions`] and tunables in [`ReaderVariables`],
//! which can also be loaded from JSON.
//!
//! # Completion
//!
//! Implement [`Completer`] (or pass a closure). Candidates don't need to be filtered,
//! the reader matches them against the word under the cursor. One match is inserted,
//! several are first narrowed to their common prefix and then listed below the line
//! ([`ReaderOption::AutoList`]) or cycled in a menu ([`ReaderOption::AutoMenu`]).
//!
//! # History
//!
//! [`History`] is a trait with an in memory implementation, [`MemoryHistory`]. The
//! reader adds every accepted line, except duplicates of the previous one and lines a
//! [`MaskingCallback`] keeps out.
//!
//! # Talking to the reader from other threads
//!
//! The editing state belongs to the thread that calls [`LineReader::read_line`]. Other
//! threads get a [`LineReaderHandle`], which can print above the prompt, tell the
//! reader about a resize, or interrupt the read. On unix a [`ResizeWatcher`] does the
//! resizing on `SIGWINCH`.
//!
//! # Logging
//!
//! The reader logs through [`tracing`]. Install a subscriber with [`try_initialize_logging_global`]
//! and a [`TracingConfig`] to see them, or flip [`DEBUG_LINE_EDITOR`] to log every
//! dispatched binding.
//!
//! # Testing your own widgets
//!
//! [`ScriptedKeySource`] plays back keys and [`RecordingRenderer`] remembers every
//! frame, bell and line printed above the prompt, so a whole read can be driven
//! without a terminal.

// Enforce strict error handling in production library code only. Tests and examples are
// allowed to use .unwrap() (workspace `Cargo.toml` config allows it).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach modules (re-exported below to provide clean public API).
pub mod core;
pub mod readline;

// Re-export stable public API using glob imports for a flat API surface.
pub use core::*;
pub use readline::*;

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{collections::HashMap,
          fmt::{Debug, Formatter},
          io,
          ops::Range,
          str::FromStr,
          sync::Arc};

use crossterm::style::Stylize;

use super::{LineReaderHandle, SharedDisplay};
use crate::{AnsiRenderer, Binding, BindingReader, CTRL_D, Completer, CrosstermKeySource,
            DefaultParser, EMACS, Highlighter, History, InlineWidget, KeyInput, KeyMap,
            KeyRead, KeySource, KillRing, LineParser, MAIN, MaskingCallback,
            MemoryHistory, ParserConfig, RawModeGuard, ReaderOption, ReaderOptions,
            ReaderVariables, ReadlineError, RenderFrame, Renderer, Safe, SimpleMaskingCallback, StdMutex,
            TextBuffer, UndoTree, VI_COMMAND, VI_INSERT, VISUAL, WidgetName, call_if_true,
            default_key_maps, display_width, lock_ignoring_poison};

/// Flip to `true` to log every binding the reader loop dispatches.
pub const DEBUG_LINE_EDITOR: bool = false;

/// Where the reader loop is. Anything other than [`ReaderState::Normal`] ends the read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReaderState {
    #[default]
    Normal,
    /// The line was accepted.
    Done,
    /// Return an empty line without touching history.
    Ignore,
    Eof,
    Interrupt,
}

/// Kind of the active region (the text between the mark and the cursor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionType {
    #[default]
    None,
    Char,
    /// Whole lines from the one holding the mark to the one holding the cursor.
    Line,
    /// Text that was just pasted. Cleared by the next widget.
    Paste,
}

/// The pending vi operator, while its motion runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViMoveMode {
    #[default]
    Normal,
    Yank,
    Delete,
    Change,
}

/// Emacs and vi style line editor.
///
/// Keys come from a [`KeySource`] and are resolved through the active [`KeyMap`] into
/// [`Binding`]s. Each binding runs one widget against the [`TextBuffer`], and after
/// each widget the frame is handed to the [`Renderer`]. A read ends when a widget puts
/// the reader into a state other than [`ReaderState::Normal`].
///
/// The editing state belongs to the reading thread. Other threads talk to the reader
/// through a [`LineReaderHandle`], which only shares the renderer and the frame painted
/// last.
///
/// ```no_run
/// use r3bl_line_editor::{LineReader, ReadlineError, StringsCompleter};
///
/// let mut reader = LineReader::new_terminal()
///     .with_completer(StringsCompleter::new(["help", "history", "quit"]));
/// loop {
///     match reader.read_line("> ") {
///         Ok(line) if line == "quit" => break,
///         Ok(line) => println!("{line}"),
///         Err(ReadlineError::UserInterrupt { .. }) => continue,
///         Err(_) => break,
///     }
/// }
/// ```
pub struct LineReader {
    pub(super) buf: TextBuffer,
    pub(super) reader: BindingReader,
    pub(super) display: Safe<SharedDisplay>,
    /// Put the terminal in raw mode for the duration of each read.
    pub(super) raw_mode: bool,

    pub(super) key_maps: HashMap<String, KeyMap>,
    pub(super) key_map: String,
    pub(super) widgets: HashMap<String, InlineWidget>,
    pub(super) options: ReaderOptions,
    pub(super) variables: ReaderVariables,

    pub(super) history: Box<dyn History>,
    pub(super) completer: Option<Box<dyn Completer>>,
    pub(super) highlighter: Option<Box<dyn Highlighter>>,
    pub(super) parser: Box<dyn LineParser>,
    pub(super) masking: Option<Box<dyn MaskingCallback>>,
    pub(super) prompt: String,

    pub(super) kill_ring: KillRing,
    pub(super) undo: UndoTree<TextBuffer>,
    pub(super) is_undo: bool,
    pub(super) state: ReaderState,
    /// Status text painted below the line. Cleared before every widget.
    pub(super) post: Option<String>,
    pub(super) io_error: Option<io::Error>,
    pub(super) overtyping: bool,

    /// Repeat count of the running widget, negative for a negative argument.
    pub(super) count: isize,
    pub(super) repeat_count: isize,
    pub(super) mult: isize,
    pub(super) is_arg_digit: bool,

    /// Entry being edited. [`History::end_index`] is the new line.
    pub(super) history_index: usize,
    /// Edits made to entries while walking through history.
    pub(super) modified_history: HashMap<usize, String>,
    pub(super) history_buffer: Option<TextBuffer>,
    pub(super) search_buffer: String,
    /// Term of the last incremental search, reused when a new search starts empty.
    pub(super) previous_search_term: String,
    /// Text for the next read, set by `accept-and-hold`.
    pub(super) next_buffer: Option<String>,
    /// Entry loaded into the next read, set by the accept and infer widgets.
    pub(super) next_history_id: Option<usize>,

    pub(super) region_mark: usize,
    pub(super) region_active: RegionType,
    pub(super) force_char: bool,
    pub(super) force_line: bool,

    pub(super) vi_move_mode: ViMoveMode,
    pub(super) yank_buffer: String,
    pub(super) find_char: Option<char>,
    pub(super) find_dir: isize,
    pub(super) find_tail: isize,
    pub(super) search_term: Option<String>,
    pub(super) search_backward: bool,
}

impl Debug for LineReader {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineReader")
            .field("buf", &self.buf)
            .field("key_map", &self.key_map)
            .field("state", &self.state)
            .field("count", &self.count)
            .field("history_index", &self.history_index)
            .field("region_active", &self.region_active)
            .field("vi_move_mode", &self.vi_move_mode)
            .field("post", &self.post)
            .finish_non_exhaustive()
    }
}

impl LineReader {
    /// Reader over any key source and renderer. Tests pass a
    /// [`crate::ScriptedKeySource`] and a [`crate::RecordingRenderer`].
    #[must_use]
    pub fn new(key_source: Box<dyn KeySource>, renderer: Box<dyn Renderer>) -> Self {
        let variables = ReaderVariables::default();
        Self {
            buf: TextBuffer::new(),
            reader: BindingReader::new(key_source),
            display: Arc::new(StdMutex::new(SharedDisplay::new(renderer))),
            raw_mode: false,
            key_maps: default_key_maps(cfg!(feature = "emacs")),
            key_map: MAIN.into(),
            widgets: HashMap::new(),
            options: ReaderOptions::new(),
            history: Box::new(history_with_size(variables.history_size)),
            completer: None,
            highlighter: None,
            parser: Box::new(DefaultParser::new(
                ParserConfig::default().with_default_brackets(),
            )),
            masking: None,
            prompt: String::new(),
            kill_ring: KillRing::new(variables.kill_ring_size),
            undo: UndoTree::new(),
            is_undo: false,
            state: ReaderState::Normal,
            post: None,
            io_error: None,
            overtyping: false,
            count: 1,
            repeat_count: 0,
            mult: 1,
            is_arg_digit: false,
            history_index: 0,
            modified_history: HashMap::new(),
            history_buffer: None,
            search_buffer: String::new(),
            previous_search_term: String::new(),
            next_buffer: None,
            next_history_id: None,
            region_mark: 0,
            region_active: RegionType::None,
            force_char: false,
            force_line: false,
            vi_move_mode: ViMoveMode::Normal,
            yank_buffer: String::new(),
            find_char: None,
            find_dir: 0,
            find_tail: 0,
            search_term: None,
            search_backward: false,
            variables,
        }
    }

    /// Reader on the process terminal: crossterm keys, ANSI output on stdout, raw mode
    /// while reading.
    #[must_use]
    pub fn new_terminal() -> Self {
        let mut it = Self::new(
            Box::new(CrosstermKeySource::new()),
            Box::new(AnsiRenderer::stdout()),
        );
        it.raw_mode = true;
        it
    }

    #[must_use]
    pub fn with_history(mut self, history: impl History + 'static) -> Self {
        self.history = Box::new(history);
        self
    }

    #[must_use]
    pub fn with_completer(mut self, completer: impl Completer + 'static) -> Self {
        self.completer = Some(Box::new(completer));
        self
    }

    #[must_use]
    pub fn with_highlighter(mut self, highlighter: impl Highlighter + 'static) -> Self {
        self.highlighter = Some(Box::new(highlighter));
        self
    }

    #[must_use]
    pub fn with_parser(mut self, parser: impl LineParser + 'static) -> Self {
        self.parser = Box::new(parser);
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: ReaderOptions) -> Self {
        self.options = options;
        self
    }

    /// Also resizes the kill ring, applies the ambiguous binding timeout to every key
    /// map, and sizes the default history if nothing was added to it yet.
    #[must_use]
    pub fn with_variables(mut self, variables: ReaderVariables) -> Self {
        self.kill_ring = KillRing::new(variables.kill_ring_size);
        let timeout = Some(variables.ambiguous_binding());
        for key_map in self.key_maps.values_mut() {
            key_map.ambiguous_timeout = timeout;
        }
        if self.history.is_empty() {
            self.history = Box::new(history_with_size(variables.history_size));
        }
        self.variables = variables;
        self
    }

    #[must_use]
    pub fn buffer(&self) -> &TextBuffer { &self.buf }

    pub fn buffer_mut(&mut self) -> &mut TextBuffer { &mut self.buf }

    #[must_use]
    pub fn options(&self) -> &ReaderOptions { &self.options }

    pub fn options_mut(&mut self) -> &mut ReaderOptions { &mut self.options }

    #[must_use]
    pub fn variables(&self) -> &ReaderVariables { &self.variables }

    #[must_use]
    pub fn history(&self) -> &dyn History { self.history.as_ref() }

    pub fn history_mut(&mut self) -> &mut dyn History { self.history.as_mut() }

    #[must_use]
    pub fn state(&self) -> ReaderState { self.state }

    /// Repeat count of the running widget.
    #[must_use]
    pub fn count(&self) -> isize { self.count }

    /// Keys that resolved to the running widget.
    #[must_use]
    pub fn last_binding(&self) -> &str { self.reader.last_binding() }

    #[must_use]
    pub fn key_map_name(&self) -> &str { &self.key_map }

    /// Switch to the key map called `name`. Returns `false` if there is none.
    pub fn set_key_map(&mut self, name: &str) -> bool {
        if !self.key_maps.contains_key(name) {
            return false;
        }
        name.clone_into(&mut self.key_map);
        true
    }

    /// For rebinding keys, eg: `key_map_mut(EMACS)`.
    pub fn key_map_mut(&mut self, name: &str) -> Option<&mut KeyMap> {
        self.key_maps.get_mut(name)
    }

    /// Add (or replace) a named key map.
    pub fn insert_key_map(&mut self, name: &str, key_map: KeyMap) {
        self.key_maps.insert(name.to_owned(), key_map);
    }

    /// Make `widget` callable by `name` from key maps and [`Self::call_widget`]. A
    /// widget registered under a built in name replaces the built in.
    pub fn register_widget(
        &mut self,
        name: &str,
        widget: impl Fn(&mut LineReader) -> bool + Send + Sync + 'static,
    ) {
        self.widgets.insert(name.to_owned(), Arc::new(widget));
    }

    /// Status text shown below the line until the next key.
    pub fn set_post(&mut self, text: impl Into<String>) { self.post = Some(text.into()); }

    #[must_use]
    pub fn handle(&self) -> LineReaderHandle {
        LineReaderHandle {
            display: self.display.clone(),
            interrupted: self.reader.interrupt_flag(),
        }
    }

    /// Run the widget called `name`: a registered one first, then a built in one.
    /// Returns `false` when the widget failed or does not exist.
    pub fn call_widget(&mut self, name: &str) -> bool {
        if let Some(widget) = self.widgets.get(name).cloned() {
            return widget(self);
        }
        match WidgetName::from_str(name) {
            Ok(builtin) => self.call_builtin(builtin),
            Err(_) => {
                tracing::warn!(message = "No such widget", name = name);
                false
            }
        }
    }

    /// Read one line.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::EndOfFile`] and [`ReadlineError::UserInterrupt`] when the user
    /// ends the read without accepting a line, [`ReadlineError::IO`] when the terminal
    /// fails.
    pub fn read_line(&mut self, prompt: &str) -> Result<String, ReadlineError> {
        self.read_line_with(prompt, None, None)
    }

    /// Read one line showing every char as `mask`. The line is kept out of history.
    ///
    /// # Errors
    ///
    /// See [`Self::read_line`].
    pub fn read_line_masked(
        &mut self,
        prompt: &str,
        mask: char,
    ) -> Result<String, ReadlineError> {
        self.read_line_with(
            prompt,
            Some(Box::new(SimpleMaskingCallback { mask })),
            None,
        )
    }

    /// Read one line, with an optional masking callback and text to start from.
    ///
    /// # Errors
    ///
    /// See [`Self::read_line`].
    pub fn read_line_with(
        &mut self,
        prompt: &str,
        masking: Option<Box<dyn MaskingCallback>>,
        initial: Option<&str>,
    ) -> Result<String, ReadlineError> {
        let _raw_mode = if self.raw_mode {
            Some(RawModeGuard::enable()?)
        } else {
            None
        };
        self.start_read(prompt, masking, initial);
        let result = self.run_loop();
        let ended = self.end_read();
        let line = result?;
        ended?;
        Ok(line)
    }

    fn start_read(
        &mut self,
        prompt: &str,
        masking: Option<Box<dyn MaskingCallback>>,
        initial: Option<&str>,
    ) {
        prompt.clone_into(&mut self.prompt);
        self.masking = masking;
        self.state = ReaderState::Normal;
        self.modified_history.clear();
        self.history_index = self.history.end_index();

        self.buf.clear();
        if let Some(initial) = initial {
            self.buf.write(initial);
        }
        if let Some(next) = self.next_buffer.take() {
            self.buf.set_text(&next);
        } else if let Some(id) = self.next_history_id.take() {
            if let Some(line) = self.history.get(id) {
                self.buf.set_text(line);
                self.history_index = id;
            }
        }

        self.key_map = self.initial_key_map().into();
        self.count = 1;
        self.repeat_count = 0;
        self.mult = 1;
        self.is_arg_digit = false;
        self.is_undo = false;
        self.post = None;
        self.io_error = None;
        self.overtyping = false;
        self.region_active = RegionType::None;
        self.region_mark = 0;
        self.vi_move_mode = ViMoveMode::Normal;
        self.history_buffer = None;

        self.undo.clear();
        self.undo.new_state(self.buf.copy());

        lock_ignoring_poison(&self.display).reading = true;
        self.redisplay();
    }

    /// Name of the editing map that [`MAIN`] points at, so that mode checks like "is
    /// this vi-command" can compare names.
    fn initial_key_map(&self) -> &'static str {
        let main = self.key_maps.get(MAIN);
        if main.is_some() && main == self.key_maps.get(VI_INSERT) {
            VI_INSERT
        } else if main.is_some() && main == self.key_maps.get(EMACS) {
            EMACS
        } else {
            MAIN
        }
    }

    fn run_loop(&mut self) -> Result<String, ReadlineError> {
        loop {
            let local = (self.is_in_vi_cmd_mode() && self.region_active != RegionType::None)
                .then_some(VISUAL);
            let Some(binding) = self.read_binding(local) else {
                return Err(self.aborted());
            };
            if self.buf.is_empty() && self.last_binding().starts_with(CTRL_D) {
                return Err(ReadlineError::EndOfFile {
                    partial_line: String::new(),
                });
            }

            self.is_arg_digit = false;
            let repeat = if self.repeat_count == 0 {
                1
            } else {
                self.repeat_count
            };
            self.count = repeat * self.mult;
            self.is_undo = false;
            if self.region_active == RegionType::Paste {
                self.region_active = RegionType::None;
            }
            if !binding.builtin().is_some_and(WidgetName::is_argument) {
                self.post = None;
            }

            call_if_true!(DEBUG_LINE_EDITOR, {
                tracing::debug!(
                    message = "Applying binding",
                    binding = ?binding,
                    key_map = %self.key_map,
                    count = self.count
                );
            });
            let copy = self.buf.copy();
            if !self.apply_binding(&binding) {
                self.beep();
            }
            if !self.is_undo && !copy.chars().eq(self.buf.chars()) {
                self.undo.new_state(self.buf.copy());
            }

            if let Some(error) = self.io_error.take() {
                return Err(error.into());
            }
            match self.state {
                ReaderState::Normal => {}
                ReaderState::Done => return Ok(self.finish_buffer()),
                ReaderState::Ignore => return Ok(String::new()),
                ReaderState::Eof | ReaderState::Interrupt => return Err(self.aborted()),
            }

            if !self.is_arg_digit {
                self.repeat_count = 0;
                self.mult = 1;
            }
            self.redisplay();
        }
    }

    /// Error for a read that ended without an accepted line.
    fn aborted(&mut self) -> ReadlineError {
        if let Some(error) = self.io_error.take() {
            return error.into();
        }
        let partial_line = self.buf.to_string();
        call_if_true!(DEBUG_LINE_EDITOR, {
            tracing::debug!(message = "Read aborted", state = ?self.state);
        });
        match self.state {
            ReaderState::Interrupt => ReadlineError::UserInterrupt { partial_line },
            _ => ReadlineError::EndOfFile { partial_line },
        }
    }

    /// The accepted line, with escapes stripped when event expansion is on. Adds it to
    /// history unless the masking callback or `history-ignore-dups` keeps it out.
    fn finish_buffer(&mut self) -> String {
        let raw = self.buf.to_string();
        let line = if self.options.is_set(ReaderOption::DisableEventExpansion) {
            raw.clone()
        } else {
            let mut acc = String::with_capacity(raw.len());
            let mut escaped = false;
            for ch in raw.chars() {
                if escaped {
                    escaped = false;
                    if ch != '\n' {
                        acc.push(ch);
                    }
                } else if self.parser.is_escape_char(ch) {
                    escaped = true;
                } else {
                    acc.push(ch);
                }
            }
            acc
        };

        let for_history = match &self.masking {
            Some(masking) => masking.history(&raw),
            None => Some(raw),
        };
        if let Some(entry) = for_history.filter(|it| !it.is_empty()) {
            let is_dup = self.options.is_set(ReaderOption::HistoryIgnoreDups)
                && self.history.last() == Some(entry.as_str());
            if !is_dup {
                self.history.add(&entry);
            }
        }
        line
    }

    fn end_read(&mut self) -> io::Result<()> {
        self.buf.set_cursor(self.buf.len());
        self.post = None;
        self.region_active = RegionType::None;
        let frame = self.build_frame();
        self.masking = None;
        self.history_index = self.history.end_index();

        let mut display = lock_ignoring_poison(&self.display);
        display.reading = false;
        display.last_frame = None;
        if self.options.is_set(ReaderOption::EraseLineOnFinish) {
            display.renderer.erase()
        } else {
            display.renderer.render(&frame)?;
            display.renderer.finish_line()
        }
    }

    /// Read the next binding from the active key map, with the key map called `local`
    /// (if any) taking precedence. [`None`] means the read must end: the state is now
    /// [`ReaderState::Eof`] or [`ReaderState::Interrupt`], or an I/O error was stored.
    pub(super) fn read_binding(&mut self, local: Option<&str>) -> Option<Binding> {
        let empty = KeyMap::new();
        let keys = self
            .key_maps
            .get(&self.key_map)
            .or_else(|| self.key_maps.get(MAIN))
            .unwrap_or(&empty);
        let local = local.and_then(|it| self.key_maps.get(it));
        let result = self.reader.read_binding(keys, local);
        self.on_binding_read(result)
    }

    /// Read from the [`MAIN`] key map (so that typing inserts, even in vi-command mode)
    /// with a key map that is not registered by name on top, eg: the search
    /// terminators.
    pub(super) fn read_binding_local(&mut self, local: &KeyMap) -> Option<Binding> {
        let empty = KeyMap::new();
        let keys = self.key_maps.get(MAIN).unwrap_or(&empty);
        let result = self.reader.read_binding(keys, Some(local));
        self.on_binding_read(result)
    }

    /// Read a binding from the key map called `name` only.
    pub(super) fn read_binding_in(&mut self, name: &str) -> Option<Binding> {
        let empty = KeyMap::new();
        let keys = self.key_maps.get(name).unwrap_or(&empty);
        let result = self.reader.read_binding(keys, None);
        self.on_binding_read(result)
    }

    fn on_binding_read(&mut self, result: io::Result<KeyRead>) -> Option<Binding> {
        match result {
            Ok(KeyRead::Binding(binding)) => {
                let builtin = binding.builtin();
                if !builtin.is_some_and(WidgetName::keeps_last_yank) {
                    self.kill_ring.reset_last_yank();
                }
                if !builtin.is_some_and(WidgetName::keeps_last_kill) {
                    self.kill_ring.reset_last_kill();
                }
                Some(binding)
            }
            Ok(KeyRead::Eof) => {
                self.state = ReaderState::Eof;
                None
            }
            Ok(KeyRead::Interrupt) => {
                self.state = ReaderState::Interrupt;
                None
            }
            Err(error) => {
                self.io_error = Some(error);
                None
            }
        }
    }

    /// Read one raw char, bypassing the key maps.
    pub(super) fn read_character(&mut self) -> Option<char> {
        match self.reader.read_character() {
            Ok(KeyInput::Char(ch)) => Some(ch),
            Ok(KeyInput::Timeout) => None,
            Ok(KeyInput::Eof) => {
                self.state = ReaderState::Eof;
                None
            }
            Ok(KeyInput::Interrupt) => {
                self.state = ReaderState::Interrupt;
                None
            }
            Err(error) => {
                self.io_error = Some(error);
                None
            }
        }
    }

    pub(super) fn apply_binding(&mut self, binding: &Binding) -> bool {
        match binding {
            Binding::Widget(name) => self.call_widget(name),
            Binding::Macro(keys) => {
                self.reader.run_macro(keys);
                true
            }
            Binding::Inline(widget) => widget(self),
        }
    }

    pub(super) fn beep(&mut self) {
        let result = lock_ignoring_poison(&self.display).renderer.beep();
        if let Err(error) = result {
            self.io_error = Some(error);
        }
    }

    /// Paint the current state and remember it for repaints from other threads.
    pub(super) fn redisplay(&mut self) {
        let frame = self.build_frame();
        let mut display = lock_ignoring_poison(&self.display);
        if let Err(error) = display.renderer.render(&frame) {
            self.io_error = Some(error);
        }
        display.last_frame = Some(frame);
    }

    pub(super) fn terminal_width(&self) -> usize {
        lock_ignoring_poison(&self.display).renderer.size().width()
    }

    pub(super) fn terminal_height(&self) -> usize {
        lock_ignoring_poison(&self.display).renderer.size().height()
    }

    fn build_frame(&self) -> RenderFrame {
        let raw = self.buf.to_string();
        let region = match &self.masking {
            Some(_) => None,
            None => self.region_range(),
        };

        let (text, cursor, styled) = match &self.masking {
            Some(masking) => {
                let shown = masking.display(&raw);
                let cursor = masking.display(&self.buf.up_to_cursor()).chars().count();
                (shown.clone(), cursor, split_lines(&shown))
            }
            None => {
                let styled = match (&region, &self.highlighter) {
                    (Some(region), _) => style_region(&raw, region),
                    (None, Some(highlighter)) => match highlighter.highlight(&raw) {
                        Ok(it) => split_lines(&it),
                        Err(error) => {
                            tracing::warn!(message = "Highlighter failed", error = ?error);
                            split_lines(&raw)
                        }
                    },
                    (None, None) => split_lines(&raw),
                };
                (raw, self.buf.cursor(), styled)
            }
        };

        let before_cursor: String = text.chars().take(cursor).collect();
        let cursor_line = before_cursor.matches('\n').count();
        let line_start = before_cursor.rfind('\n').map_or(0, |it| it + 1);
        let prompt_width = if cursor_line == 0 {
            display_width(&self.prompt)
        } else {
            display_width(&self.variables.secondary_prompt_pattern)
        };
        let cursor_column = prompt_width + display_width(&before_cursor[line_start..]);

        let lines = styled
            .into_iter()
            .enumerate()
            .map(|(index, line)| {
                if index == 0 {
                    format!("{}{line}", self.prompt)
                } else {
                    format!("{}{line}", self.variables.secondary_prompt_pattern)
                }
            })
            .collect();

        RenderFrame {
            prompt: self.prompt.clone(),
            buffer: text,
            cursor,
            lines,
            cursor_line,
            cursor_column,
            post: self.post.clone(),
            region,
        }
    }

    /// Chars covered by the active region.
    pub(super) fn region_range(&self) -> Option<Range<usize>> {
        let len = self.buf.len();
        let cursor = self.buf.cursor();
        let mark = self.region_mark.min(len);
        let (start, end) = if mark <= cursor {
            (mark, cursor)
        } else {
            (cursor, mark)
        };
        match self.region_active {
            RegionType::None => None,
            RegionType::Char | RegionType::Paste => {
                let end = if self.is_in_vi_cmd_mode() {
                    (end + 1).min(len)
                } else {
                    end
                };
                Some(start..end)
            }
            RegionType::Line => {
                Some(self.buf.beginning_of_line(start)..self.buf.end_of_line(end))
            }
        }
    }

    pub(super) fn is_in_vi_cmd_mode(&self) -> bool { self.key_map == VI_COMMAND }

    pub(super) fn is_in_vi_move_operation(&self) -> bool {
        self.vi_move_mode != ViMoveMode::Normal
    }

    pub(super) fn is_in_vi_change_operation(&self) -> bool {
        self.vi_move_mode == ViMoveMode::Change
    }

    /// Letters, digits and the configured word chars. The edges of the buffer are not.
    pub(super) fn is_word(&self, ch: Option<char>) -> bool {
        ch.is_some_and(|it| self.variables.is_word_char(it))
    }

    pub(super) fn is_vi_alnum(ch: Option<char>) -> bool {
        ch.is_some_and(|it| it == '_' || it.is_alphanumeric())
    }

    pub(super) fn is_whitespace(ch: Option<char>) -> bool {
        ch.is_some_and(char::is_whitespace)
    }

    /// Anything but a letter or digit, including the edges of the buffer.
    pub(super) fn is_delimiter(ch: Option<char>) -> bool {
        !ch.is_some_and(char::is_alphanumeric)
    }

    /// Run `widget` with the count negated.
    pub(super) fn call_neg(&mut self, widget: fn(&mut Self) -> bool) -> bool {
        self.count = -self.count;
        let it = widget(self);
        self.count = -self.count;
        it
    }

    /// Insert at the cursor, over typing when overwrite mode is on.
    pub(super) fn put_string(&mut self, text: &str) {
        self.buf.write_overtyping(text, self.overtyping);
    }

    pub(super) fn set_buffer(&mut self, text: &str) { self.buf.set_text(text); }
}

fn history_with_size(size: usize) -> MemoryHistory {
    let mut it = MemoryHistory::new(size);
    // Duplicates are dropped by the reader, where the option lives.
    it.ignore_dups = false;
    it
}

fn split_lines(text: &str) -> Vec<String> { text.split('\n').map(str::to_owned).collect() }

/// Split `text` into lines, showing the chars in `region` in reverse video.
fn style_region(text: &str, region: &Range<usize>) -> Vec<String> {
    let mut acc = vec![];
    let mut offset = 0;
    for line in text.split('\n') {
        let chars: Vec<char> = line.chars().collect();
        let start = region.start.saturating_sub(offset).min(chars.len());
        let end = region.end.saturating_sub(offset).min(chars.len());
        let before: String = chars[..start].iter().collect();
        let inside: String = chars[start..end].iter().collect();
        let after: String = chars[end..].iter().collect();
        if inside.is_empty() {
            acc.push(line.to_owned());
        } else {
            acc.push(format!("{before}{}{after}", inside.reverse()));
        }
        offset += chars.len() + 1;
    }
    acc
}

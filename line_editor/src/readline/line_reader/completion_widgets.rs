// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Tab completion: insert the only match, or the part all matches share, then list
//! them below the line or cycle through them in a menu.

use super::LineReader;
use crate::{Candidate, CompletionMenu, CompletionMode, LayoutSettings, MENU_SELECT,
            MatchSettings, MatchStage, ParseContext, ParsedLine, ReaderOption, WidgetName,
            candidates_by_value, common_prefix, expand_history, find_matches,
            inline_string, layout_candidates, merge_candidates, sort_candidates};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompletionKind {
    /// History expansion only.
    Expand,
    /// History expansion, then completion when nothing was expanded.
    ExpandComplete,
    Complete,
    /// Show the matches, change nothing.
    List,
}

impl LineReader {
    pub(super) fn complete_word(&mut self) -> bool {
        if self.options.is_set(ReaderOption::MenuComplete) {
            return self.menu_complete();
        }
        self.do_complete(CompletionKind::Complete, false, false, false)
    }

    pub(super) fn menu_complete(&mut self) -> bool {
        self.do_complete(CompletionKind::Complete, true, false, false)
    }

    /// Like [`Self::menu_complete`], starting at the last match.
    pub(super) fn reverse_menu_complete(&mut self) -> bool {
        self.do_complete(CompletionKind::Complete, true, false, true)
    }

    pub(super) fn expand_or_complete(&mut self) -> bool {
        let menu = self.options.is_set(ReaderOption::MenuComplete);
        self.do_complete(CompletionKind::ExpandComplete, menu, false, false)
    }

    pub(super) fn expand_or_complete_prefix(&mut self) -> bool {
        let menu = self.options.is_set(ReaderOption::MenuComplete);
        self.do_complete(CompletionKind::ExpandComplete, menu, true, false)
    }

    pub(super) fn complete_prefix(&mut self) -> bool {
        let menu = self.options.is_set(ReaderOption::MenuComplete);
        self.do_complete(CompletionKind::Complete, menu, true, false)
    }

    pub(super) fn list_choices(&mut self) -> bool {
        self.do_complete(CompletionKind::List, false, false, false)
    }

    pub(super) fn menu_expand_or_complete(&mut self) -> bool {
        self.do_complete(CompletionKind::ExpandComplete, true, false, false)
    }

    pub(super) fn expand_word(&mut self) -> bool {
        self.do_complete(CompletionKind::Expand, false, false, false)
    }

    /// Inside a menu this keeps the selection and goes on with the next match (see
    /// [`Self::do_menu`]). Outside one it starts a menu.
    pub(super) fn accept_and_menu_complete(&mut self) -> bool { self.menu_complete() }

    /// Delete the char under the cursor, or list the matches at the end of the line.
    pub(super) fn delete_char_or_list(&mut self) -> bool {
        if self.buf.cursor() != self.buf.len() || self.buf.is_empty() {
            return self.delete_char();
        }
        self.do_complete(CompletionKind::List, false, false, false)
    }

    /// `insert-tab`: a tab typed where only blanks precede it on the line is inserted.
    fn should_insert_tab(&self) -> bool {
        if !self.options.is_set(ReaderOption::InsertTab) || self.last_binding() != "\t" {
            return false;
        }
        let before = self.buf.up_to_cursor();
        let line = before.rsplit('\n').next().unwrap_or_default();
        line.chars().all(char::is_whitespace)
    }

    fn match_settings(&self) -> MatchSettings {
        MatchSettings {
            case_insensitive: self.options.is_set(ReaderOption::CaseInsensitive),
            errors: self.variables.errors,
            original_group_name: self.variables.original_group_name.clone(),
        }
    }

    fn layout_settings(&self) -> LayoutSettings {
        LayoutSettings {
            width: self.terminal_width(),
            auto_group: self.options.is_set(ReaderOption::AutoGroup),
            group: self.options.is_set(ReaderOption::Group),
            rows_first: self.options.is_set(ReaderOption::ListRowsFirst),
            case_insensitive: self.options.is_set(ReaderOption::CaseInsensitive),
            original_group_name: self.variables.original_group_name.clone(),
            others_group_name: self.variables.others_group_name.clone(),
        }
    }

    /// Screen rows left below the lines of the buffer.
    fn rows_below_buffer(&self) -> usize {
        let buffer_lines = self.buf.chars().filter(|it| *it == '\n').count() + 1;
        self.terminal_height().saturating_sub(buffer_lines)
    }

    fn do_complete(
        &mut self,
        kind: CompletionKind,
        use_menu: bool,
        prefix: bool,
        reverse: bool,
    ) -> bool {
        if kind != CompletionKind::List && self.should_insert_tab() {
            self.put_string("\t");
            return true;
        }

        if kind != CompletionKind::List
            && !self.options.is_set(ReaderOption::DisableEventExpansion)
        {
            let line = self.buf.to_string();
            match expand_history(self.history.as_ref(), &line) {
                Ok(expanded) if expanded != line => {
                    self.buf.set_text(&expanded);
                    return true;
                }
                Ok(_) => {}
                Err(error) => {
                    self.report_expansion_error(&error);
                    return false;
                }
            }
        }
        if kind == CompletionKind::Expand {
            return false;
        }

        let line = self.buf.to_string();
        let parsed = match self
            .parser
            .parse(&line, self.buf.cursor(), ParseContext::Complete)
        {
            Ok(it) => it,
            Err(error) => {
                tracing::debug!(message = "Line can't be completed", error = %error);
                return false;
            }
        };

        let mut candidates = vec![];
        if let Some(completer) = &self.completer {
            if let Err(report) = completer.complete(&parsed, &mut candidates) {
                tracing::warn!(message = "Completer failed", error = ?report);
                candidates.clear();
            }
        }

        let settings = self.match_settings();
        let mode = if prefix {
            CompletionMode::Prefix
        } else if self.options.is_set(ReaderOption::CompleteInWord) {
            CompletionMode::InWord
        } else {
            CompletionMode::Word
        };
        let stages = MatchStage::stages_for(
            &parsed,
            mode,
            &settings,
            self.options.is_set(ReaderOption::EmptyWordOptions),
        );
        let matching = find_matches(&candidates_by_value(candidates), &stages, &settings);
        if matching.is_empty() {
            return false;
        }
        let possible: Vec<Candidate> = matching.values().flatten().cloned().collect();

        if kind == CompletionKind::List {
            let word = parsed.word().to_owned();
            self.do_list(possible, &word, &parsed, false);
            return true;
        }

        let current = if prefix {
            parsed.word_up_to_cursor()
        } else {
            parsed.word().to_owned()
        };

        let single = if matching.len() == 1 {
            matching.values().next().and_then(|it| it.first())
        } else if self.options.is_set(ReaderOption::RecognizeExact) {
            matching
                .iter()
                .find(|(value, _)| same_word(value, &current, settings.case_insensitive))
                .and_then(|(_, list)| list.first())
        } else {
            None
        };
        if let Some(completion) = single.filter(|it| !it.value.is_empty()).cloned() {
            self.insert_completion(&parsed, &completion, prefix);
            return true;
        }

        if use_menu {
            self.delete_raw_word(&parsed, prefix);
            return self.do_menu(possible, &current, &parsed, reverse);
        }

        let shared = common_prefix(matching.keys().map(String::as_str), settings.case_insensitive)
            .unwrap_or_default();
        let has_unambiguous = shared.chars().count() > current.chars().count()
            && same_word(
                &shared.chars().take(current.chars().count()).collect::<String>(),
                &current,
                settings.case_insensitive,
            );
        let mut current = current;
        if has_unambiguous {
            self.delete_raw_word(&parsed, prefix);
            self.put_string(&parsed.escape(&shared, false));
            current = shared;
            let auto_list = self.options.is_set(ReaderOption::AutoList);
            let auto_menu = self.options.is_set(ReaderOption::AutoMenu);
            let list_ambiguous = self.options.is_set(ReaderOption::ListAmbiguous);
            if ((!auto_list && auto_menu) || (auto_list && list_ambiguous))
                && !self.next_binding_is_complete()
            {
                return true;
            }
        }

        if self.options.is_set(ReaderOption::AutoList) {
            self.do_list(possible, &current, &parsed, true);
            return true;
        }
        if self.options.is_set(ReaderOption::AutoMenu) {
            let typed = parsed.escape(&current, false).chars().count();
            self.buf.backspace(typed);
            self.do_menu(possible, &current, &parsed, false);
        }
        true
    }

    /// Remove the raw text of the word (or of its part before the cursor) that is
    /// being completed.
    fn delete_raw_word(&mut self, parsed: &ParsedLine, prefix: bool) {
        if prefix {
            self.buf.backspace(parsed.raw_word_cursor);
        } else {
            self.buf
                .set_cursor(parsed.raw_word_start() + parsed.raw_word_length);
            self.buf.backspace(parsed.raw_word_length);
        }
    }

    /// Put the only match in place of the word. A complete match gets a separator.
    /// With a suffix, the next key decides whether the suffix stays.
    fn insert_completion(&mut self, parsed: &ParsedLine, completion: &Candidate, prefix: bool) {
        self.delete_raw_word(parsed, prefix);
        self.put_string(&parsed.escape(&completion.value, completion.complete));

        let Some(suffix) = &completion.suffix else {
            if completion.complete {
                if self.buf.curr_char() == Some(' ') {
                    self.buf.move_by(1);
                } else {
                    self.put_string(" ");
                }
            }
            return;
        };
        self.put_string(suffix);
        self.redisplay();
        let Some(binding) = self.read_binding(None) else {
            return;
        };
        let key = self.last_binding().chars().next();
        let removes = binding.is(WidgetName::AcceptLine)
            || (binding.is(WidgetName::SelfInsert)
                && key.is_some_and(|it| self.variables.remove_suffix_chars.contains(it)));
        if removes {
            self.buf.backspace(suffix.chars().count());
            if completion.complete && key != Some(' ') {
                self.put_string(" ");
            }
        }
        self.reader.push_back_binding();
    }

    /// Peek at the next binding: [`true`] (and consumed) when it asks for the next
    /// completion.
    fn next_binding_is_complete(&mut self) -> bool {
        self.redisplay();
        let Some(binding) = self.read_binding(Some(MENU_SELECT)) else {
            return false;
        };
        if binding.is(WidgetName::MenuComplete) {
            return true;
        }
        self.reader.push_back_binding();
        false
    }

    /// Show the matches below the line. With `run_loop`, keep the list up while the user
    /// narrows it down by typing, and go into the menu on tab. Returns [`true`] when the
    /// list was shown.
    fn do_list(
        &mut self,
        mut possible: Vec<Candidate>,
        completed: &str,
        parsed: &ParsedLine,
        run_loop: bool,
    ) -> bool {
        let case_insensitive = self.options.is_set(ReaderOption::CaseInsensitive);
        merge_candidates(&mut possible);
        let settings = self.layout_settings();

        let layout = layout_candidates(&possible, None, completed, &settings);
        let list_max = self.variables.list_max;
        if (list_max > 0 && possible.len() >= list_max)
            || layout.lines >= self.rows_below_buffer()
        {
            self.post = Some(
                inline_string!(
                    "do you wish to see all {} possibilities ({} lines)?",
                    possible.len(),
                    layout.lines
                )
                .to_string(),
            );
            self.redisplay();
            if !matches!(self.read_character(), Some('y' | 'Y' | '\t')) {
                self.post = None;
                return false;
            }
        }

        let mut typed = String::new();
        loop {
            let current = format!("{completed}{typed}");
            let mut shown: Vec<Candidate> = possible
                .iter()
                .filter(|it| starts_with(&it.value, &current, case_insensitive))
                .cloned()
                .collect();
            sort_candidates(&mut shown, &current, case_insensitive);
            self.post = Some(layout_candidates(&shown, None, &current, &settings).text);
            if !run_loop {
                return true;
            }
            self.redisplay();

            let Some(binding) = self.read_binding(None) else {
                self.post = None;
                return true;
            };
            match binding.builtin() {
                Some(WidgetName::BackwardDeleteChar | WidgetName::ViBackwardDeleteChar) => {
                    if typed.pop().is_none() {
                        self.reader.push_back_binding();
                        self.post = None;
                        return true;
                    }
                    self.buf.backspace(1);
                }
                Some(WidgetName::SelfInsert) => {
                    let keys = self.last_binding().to_owned();
                    typed.push_str(&keys);
                    self.put_string(&keys);
                    let current = format!("{completed}{typed}");
                    let any = possible
                        .iter()
                        .any(|it| starts_with(&it.value, &current, case_insensitive));
                    if !any {
                        self.post = None;
                        return true;
                    }
                }
                _ if self.last_binding() == "\t" => {
                    if shown.len() == 1 || !typed.is_empty() {
                        self.post = None;
                        self.reader.push_back_binding();
                    } else if self.options.is_set(ReaderOption::AutoMenu) {
                        let inserted = parsed.escape(&current, false).chars().count();
                        self.buf.backspace(inserted);
                        self.do_menu(shown, &current, parsed, false);
                    }
                    return true;
                }
                _ => {
                    self.reader.push_back_binding();
                    self.post = None;
                    return true;
                }
            }
        }
    }

    /// Cycle through the matches, showing each in place of the word. The menu keys move
    /// the selection. Any other key keeps the selection and then runs as usual, except
    /// accept-line which only ends the menu. `completed` is what was typed of the word,
    /// already removed from the buffer.
    fn do_menu(
        &mut self,
        mut possible: Vec<Candidate>,
        completed: &str,
        parsed: &ParsedLine,
        reverse: bool,
    ) -> bool {
        let case_insensitive = self.options.is_set(ReaderOption::CaseInsensitive);
        sort_candidates(&mut possible, completed, case_insensitive);
        merge_candidates(&mut possible);

        // The menu walks a plain grid.
        let settings = LayoutSettings {
            group: false,
            auto_group: false,
            ..self.layout_settings()
        };
        let layout = layout_candidates(&possible, None, completed, &settings);
        let Some(mut menu) = CompletionMenu::new(layout.ordered, layout.lines, settings.rows_first)
        else {
            return false;
        };
        if reverse {
            menu.previous();
        }

        let mut inserted = 0;
        loop {
            self.buf.backspace(inserted);
            let selected = menu.selected();
            let mut word = parsed.escape(&selected.value, false);
            if let Some(suffix) = &selected.suffix {
                word.push_str(suffix);
            }
            inserted = word.chars().count();
            self.put_string(&word);

            let layout =
                layout_candidates(menu.candidates(), Some(menu.selected()), completed, &settings);
            let rows = self.rows_below_buffer().min(self.variables.menu_list_max);
            self.post = Some(menu.visible_text(&layout, rows));
            self.redisplay();

            let Some(binding) = self.read_binding(Some(MENU_SELECT)) else {
                self.post = None;
                return false;
            };
            let widget = binding.builtin();
            match widget {
                Some(WidgetName::MenuComplete) => menu.next(),
                Some(WidgetName::ReverseMenuComplete) => menu.previous(),
                Some(WidgetName::UpLineOrHistory | WidgetName::UpLineOrSearch) => menu.up(),
                Some(WidgetName::DownLineOrHistory | WidgetName::DownLineOrSearch) => {
                    menu.down();
                }
                Some(WidgetName::ForwardChar) => menu.right(),
                Some(WidgetName::BackwardChar) => menu.left(),
                Some(WidgetName::ClearScreen) => {
                    self.clear_screen();
                }
                Some(WidgetName::AcceptAndMenuComplete) => {
                    if menu.selected().complete {
                        self.put_string(" ");
                    }
                    inserted = 0;
                    menu.next();
                }
                _ => {
                    let completion = menu.selected().clone();
                    let key = self.last_binding().chars().next();
                    let is_self_insert = widget == Some(WidgetName::SelfInsert);
                    if let Some(suffix) = &completion.suffix {
                        let removes = widget == Some(WidgetName::BackwardDeleteChar)
                            || (is_self_insert
                                && key.is_some_and(|it| {
                                    self.variables.remove_suffix_chars.contains(it)
                                }));
                        if removes {
                            self.buf.backspace(suffix.chars().count());
                        }
                    }
                    if completion.complete && key != Some(' ') {
                        self.put_string(" ");
                    }
                    let typed_suffix = is_self_insert
                        && completion
                            .suffix
                            .as_deref()
                            .is_some_and(|it| it.starts_with(self.last_binding()));
                    if widget != Some(WidgetName::AcceptLine) && !typed_suffix {
                        self.reader.push_back_binding();
                    }
                    self.post = None;
                    return true;
                }
            }
        }
    }
}

fn same_word(lhs: &str, rhs: &str, case_insensitive: bool) -> bool {
    if case_insensitive {
        lhs.to_lowercase() == rhs.to_lowercase()
    } else {
        lhs == rhs
    }
}

fn starts_with(value: &str, start: &str, case_insensitive: bool) -> bool {
    if case_insensitive {
        value.to_lowercase().starts_with(&start.to_lowercase())
    } else {
        value.starts_with(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{KeyInput, MemoryHistory, RecordingRenderer, ScriptedKeySource,
                StringsCompleter, TextBuffer};
    use pretty_assertions::assert_eq;

    fn reader_with(text: &str, keys: &str, candidates: Vec<Candidate>) -> LineReader {
        let mut it = LineReader::new(
            Box::new(ScriptedKeySource::from_keys(keys)),
            Box::new(RecordingRenderer::new()),
        )
        .with_completer(StringsCompleter { candidates });
        it.buf = TextBuffer::new_with(text);
        it
    }

    fn words(values: &[&str]) -> Vec<Candidate> {
        values.iter().map(|it| Candidate::new(*it)).collect()
    }

    #[test]
    fn test_single_match_is_inserted_with_separator() {
        let mut it = reader_with("say he", "", words(&["hello", "world"]));
        assert!(it.complete_word());
        assert_eq!(it.buf.to_string(), "say hello ");
        assert_eq!(it.buf.cursor(), 10);
    }

    #[test]
    fn test_no_match_fails() {
        let mut it = reader_with("zz", "", words(&["hello"]));
        assert!(!it.complete_word());
        assert_eq!(it.buf.to_string(), "zz");
    }

    #[test]
    fn test_shared_prefix_then_list_until_other_key() {
        let mut it = reader_with("fo", "\x01", words(&["foobar", "foobaz", "zap"]));
        assert!(it.complete_word());
        assert_eq!(it.buf.to_string(), "fooba");
        assert_eq!(it.post, None);
        assert_eq!(it.reader.read_character().ok(), Some(KeyInput::Char('\x01')));
    }

    #[test]
    fn test_typing_in_list_narrows_it() {
        let mut it = reader_with("fo", "r\x01", words(&["foobar", "foobaz"]));
        assert!(it.complete_word());
        assert_eq!(it.buf.to_string(), "foobar");
    }

    #[test]
    fn test_list_choices_only_shows() {
        let mut it = reader_with("fo", "", words(&["foo", "foobar", "fox"]));
        assert!(it.list_choices());
        assert_eq!(it.buf.to_string(), "fo");
        let post = it.post.clone().unwrap_or_default();
        let plain = strip_ansi_escapes::strip_str(&post);
        assert!(plain.contains("foobar"));
        assert!(plain.contains("fox"));
    }

    #[test]
    fn test_menu_cycles_and_wraps() {
        let mut it = reader_with("a", "\t\t\r", words(&["apple", "apricot", "banana"]));
        assert!(it.menu_complete());
        assert_eq!(it.buf.to_string(), "apple ");
        assert_eq!(it.post, None);
        assert_eq!(it.reader.read_character().ok(), Some(KeyInput::Eof));
    }

    #[test]
    fn test_reverse_menu_starts_at_last() {
        let mut it = reader_with("a", "\r", words(&["apple", "apricot"]));
        assert!(it.reverse_menu_complete());
        assert_eq!(it.buf.to_string(), "apricot ");
    }

    #[test]
    fn test_tab_in_list_enters_menu() {
        let mut it = reader_with("ap", "\t\t\r", words(&["apple", "apricot"]));
        assert!(it.complete_word());
        assert_eq!(it.buf.to_string(), "apricot ");
    }

    #[test]
    fn test_suffix_removed_by_separator() {
        let candidate = Candidate::new("src").with_suffix("/").with_complete(false);
        let mut it = reader_with("ls sr", " ", vec![candidate.clone()]);
        assert!(it.complete_word());
        assert_eq!(it.buf.to_string(), "ls src");
        assert_eq!(it.reader.read_character().ok(), Some(KeyInput::Char(' ')));

        let mut it = reader_with("ls sr", "m", vec![candidate]);
        assert!(it.complete_word());
        assert_eq!(it.buf.to_string(), "ls src/");
    }

    #[test]
    fn test_history_is_expanded_before_completing() {
        let mut it = reader_with("!!", "", words(&["x"]))
            .with_history(MemoryHistory::new_with(&["git status"]));
        assert!(it.expand_or_complete());
        assert_eq!(it.buf.to_string(), "git status");
        assert!(!it.expand_word());
    }

    #[test]
    fn test_completer_errors_mean_no_candidates() {
        let mut it = LineReader::new(
            Box::new(ScriptedKeySource::new()),
            Box::new(RecordingRenderer::new()),
        )
        .with_completer(|_: &ParsedLine, _: &mut Vec<Candidate>| -> crate::CommonResult<()> {
            crate::CommonError::new_error_result(crate::CommonErrorType::NotFound, "no index")
        });
        it.buf = TextBuffer::new_with("x");
        assert!(!it.complete_word());
    }

    #[test]
    fn test_long_list_asks_first() {
        let mut it = reader_with("a", "n", words(&["ab", "ac", "ad"]));
        it.variables.list_max = 2;
        assert!(it.list_choices());
        assert_eq!(it.post, None);

        let mut it = reader_with("a", "y", words(&["ab", "ac", "ad"]));
        it.variables.list_max = 2;
        assert!(it.list_choices());
        assert!(it.post.is_some());
    }

    #[test]
    fn test_delete_char_or_list() {
        let mut it = reader_with("ab", "", words(&["abc", "abd"]));
        it.buf.set_cursor(0);
        assert!(it.delete_char_or_list());
        assert_eq!(it.buf.to_string(), "b");

        let mut it = reader_with("ab", "", words(&["abc", "abd"]));
        assert!(it.delete_char_or_list());
        assert_eq!(it.buf.to_string(), "ab");
        assert!(it.post.is_some());
    }
}

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::LineReader;
use crate::WidgetName;

impl LineReader {
    /// Run the built in widget `widget`. Returns `false` when it failed.
    #[allow(clippy::too_many_lines)]
    pub(super) fn call_builtin(&mut self, widget: WidgetName) -> bool {
        match widget {
            // Motion.
            WidgetName::ForwardChar => self.forward_char(),
            WidgetName::BackwardChar => self.backward_char(),
            WidgetName::ForwardWord => self.forward_word(),
            WidgetName::BackwardWord => self.backward_word(),
            WidgetName::EmacsForwardWord => self.emacs_forward_word(),
            WidgetName::EmacsBackwardWord => self.emacs_backward_word(),
            WidgetName::BeginningOfLine => self.beginning_of_line(),
            WidgetName::EndOfLine => self.end_of_line(),
            WidgetName::BeginningOfLineHist => self.beginning_of_line_hist(),
            WidgetName::EndOfLineHist => self.end_of_line_hist(),
            WidgetName::BeginningOfBufferOrHistory => self.beginning_of_buffer_or_history(),
            WidgetName::EndOfBufferOrHistory => self.end_of_buffer_or_history(),
            WidgetName::UpLine => self.up_line(),
            WidgetName::DownLine => self.down_line(),
            WidgetName::UpLineOrHistory => self.up_line_or_history(),
            WidgetName::DownLineOrHistory => self.down_line_or_history(),
            WidgetName::UpLineOrSearch => self.up_line_or_search(),
            WidgetName::DownLineOrSearch => self.down_line_or_search(),
            WidgetName::ViUpLineOrHistory => self.vi_up_line_or_history(),
            WidgetName::ViDownLineOrHistory => self.vi_down_line_or_history(),
            WidgetName::ViForwardChar => self.vi_forward_char(),
            WidgetName::ViBackwardChar => self.vi_backward_char(),
            WidgetName::ViForwardWord => self.vi_forward_word(),
            WidgetName::ViForwardBlankWord => self.vi_forward_blank_word(),
            WidgetName::ViForwardWordEnd => self.vi_forward_word_end(),
            WidgetName::ViForwardBlankWordEnd => self.vi_forward_blank_word_end(),
            WidgetName::ViBackwardWord => self.vi_backward_word(),
            WidgetName::ViBackwardBlankWord => self.vi_backward_blank_word(),
            WidgetName::ViBackwardWordEnd => self.vi_backward_word_end(),
            WidgetName::ViBackwardBlankWordEnd => self.vi_backward_blank_word_end(),
            WidgetName::ViBeginningOfLine => self.vi_beginning_of_line(),
            WidgetName::ViEndOfLine => self.vi_end_of_line(),
            WidgetName::ViFirstNonBlank => self.vi_first_non_blank(),
            WidgetName::ViGotoColumn => self.vi_goto_column(),
            WidgetName::ViFindNextChar => self.vi_find_next_char(),
            WidgetName::ViFindPrevChar => self.vi_find_prev_char(),
            WidgetName::ViFindNextCharSkip => self.vi_find_next_char_skip(),
            WidgetName::ViFindPrevCharSkip => self.vi_find_prev_char_skip(),
            WidgetName::ViRepeatFind => self.vi_repeat_find(),
            WidgetName::ViRevRepeatFind => self.vi_rev_repeat_find(),
            WidgetName::ViMatchBracket => self.vi_match_bracket(),
            WidgetName::CharacterSearch => self.character_search(),
            WidgetName::CharacterSearchBackward => self.character_search_backward(),

            // Editing.
            WidgetName::SelfInsert => self.self_insert(),
            WidgetName::SelfInsertUnmeta => self.self_insert_unmeta(),
            WidgetName::QuotedInsert => self.quoted_insert(),
            WidgetName::OverwriteMode => self.overwrite_mode(),
            WidgetName::DeleteChar => self.delete_char(),
            WidgetName::BackwardDeleteChar => self.backward_delete_char(),
            WidgetName::DeleteCharOrList => self.delete_char_or_list(),
            WidgetName::TransposeChars => self.transpose_chars(),
            WidgetName::TransposeWords => self.transpose_words(),
            WidgetName::CapitalizeWord => self.capitalize_word(),
            WidgetName::UpCaseWord => self.up_case_word(),
            WidgetName::DownCaseWord => self.down_case_word(),
            WidgetName::ClearBuffer => self.clear_buffer(),
            WidgetName::InsertComment => self.insert_comment(),
            WidgetName::ViInsertComment => self.vi_insert_comment(),
            WidgetName::ViDeleteChar => self.vi_delete_char(),
            WidgetName::ViBackwardDeleteChar => self.vi_backward_delete_char(),
            WidgetName::ViSwapCase => self.vi_swap_case(),
            WidgetName::ViOperSwapCase => self.vi_oper_swap_case(),
            WidgetName::ViReplaceChars => self.vi_replace_chars(),
            WidgetName::ViReplace => self.vi_replace(),
            WidgetName::ViChangeEol => self.vi_change_eol(),
            WidgetName::ViChangeWholeLine => self.vi_change_whole_line(),
            WidgetName::ViKillEol => self.vi_kill_eol(),
            WidgetName::ViSubstitute => self.vi_substitute(),
            WidgetName::ViOpenLineAbove => self.vi_open_line_above(),
            WidgetName::ViOpenLineBelow => self.vi_open_line_below(),
            WidgetName::ViJoin => self.vi_join(),
            WidgetName::ViUpCase => self.vi_up_case(),
            WidgetName::ViDownCase => self.vi_down_case(),
            WidgetName::MagicSpace => self.magic_space(),
            WidgetName::ExpandHistory => self.expand_history(),
            WidgetName::InsertCloseParen => self.insert_close_paren(),
            WidgetName::InsertCloseSquare => self.insert_close_square(),
            WidgetName::InsertCloseCurly => self.insert_close_curly(),
            WidgetName::PutReplaceSelection => self.put_replace_selection(),

            // Kill and yank.
            WidgetName::KillLine => self.kill_line(),
            WidgetName::BackwardKillLine => self.backward_kill_line(),
            WidgetName::KillWholeLine => self.kill_whole_line(),
            WidgetName::KillWord => self.kill_word(),
            WidgetName::BackwardKillWord => self.backward_kill_word(),
            WidgetName::KillBuffer => self.kill_buffer(),
            WidgetName::KillRegion => self.kill_region(),
            WidgetName::CopyRegionAsKill => self.copy_region_as_kill(),
            WidgetName::CopyPrevWord => self.copy_prev_word(),
            WidgetName::Yank => self.yank(),
            WidgetName::YankPop => self.yank_pop(),
            WidgetName::ViPutAfter => self.vi_put_after(),
            WidgetName::ViPutBefore => self.vi_put_before(),
            WidgetName::ViYank => self.vi_yank(),
            WidgetName::ViYankWholeLine => self.vi_yank_whole_line(),
            WidgetName::ViYankEol => self.vi_yank_eol(),
            WidgetName::ViDelete => self.vi_delete(),
            WidgetName::ViChangeTo => self.vi_change_to(),
            WidgetName::ViKillLine => self.vi_kill_line(),
            WidgetName::ViBackwardKillWord => self.vi_backward_kill_word(),

            // Arguments.
            WidgetName::DigitArgument => self.digit_argument(),
            WidgetName::NegArgument => self.neg_argument(),
            WidgetName::UniversalArgument => self.universal_argument(),
            WidgetName::ViDigitOrBeginningOfLine => self.vi_digit_or_beginning_of_line(),
            WidgetName::ViArgDigit => self.vi_arg_digit(),

            // Region.
            WidgetName::SetMarkCommand => self.set_mark_command(),
            WidgetName::ExchangePointAndMark => self.exchange_point_and_mark(),
            WidgetName::VisualMode => self.visual_mode(),
            WidgetName::VisualLineMode => self.visual_line_mode(),
            WidgetName::DeactivateRegion => self.deactivate_region(),

            // Undo.
            WidgetName::Undo => self.undo(),
            WidgetName::Redo => self.redo(),
            WidgetName::ViUndoChange => self.vi_undo_change(),

            // History.
            WidgetName::AcceptLine => self.accept_line(),
            WidgetName::AcceptAndHold => self.accept_and_hold(),
            WidgetName::AcceptAndInferNextHistory => self.accept_and_infer_next_history(),
            WidgetName::AcceptLineAndDownHistory => self.accept_line_and_down_history(),
            WidgetName::UpHistory => self.up_history(),
            WidgetName::DownHistory => self.down_history(),
            WidgetName::BeginningOfHistory => self.beginning_of_history(),
            WidgetName::EndOfHistory => self.end_of_history(),
            WidgetName::HistorySearchBackward => self.history_search_backward(),
            WidgetName::HistorySearchForward => self.history_search_forward(),
            WidgetName::HistoryIncrementalSearchBackward => {
                self.history_incremental_search_backward()
            }
            WidgetName::HistoryIncrementalSearchForward => {
                self.history_incremental_search_forward()
            }
            WidgetName::ViHistorySearchBackward => self.vi_history_search_backward(),
            WidgetName::ViHistorySearchForward => self.vi_history_search_forward(),
            WidgetName::ViRepeatSearch => self.vi_repeat_search(),
            WidgetName::ViRevRepeatSearch => self.vi_rev_repeat_search(),
            WidgetName::ViFetchHistory => self.vi_fetch_history(),
            WidgetName::InferNextHistory => self.infer_next_history(),
            WidgetName::InsertLastWord => self.insert_last_word(),

            // Completion.
            WidgetName::CompleteWord => self.complete_word(),
            WidgetName::ExpandOrComplete => self.expand_or_complete(),
            WidgetName::ExpandOrCompletePrefix => self.expand_or_complete_prefix(),
            WidgetName::CompletePrefix => self.complete_prefix(),
            WidgetName::MenuComplete => self.menu_complete(),
            WidgetName::ReverseMenuComplete => self.reverse_menu_complete(),
            WidgetName::ListChoices => self.list_choices(),
            WidgetName::MenuExpandOrComplete => self.menu_expand_or_complete(),
            WidgetName::ExpandWord => self.expand_word(),
            WidgetName::AcceptAndMenuComplete => self.accept_and_menu_complete(),

            // Modes.
            WidgetName::EmacsEditingMode => self.emacs_editing_mode(),
            WidgetName::ViEditingMode => self.vi_editing_mode(),
            WidgetName::ViCmdMode => self.vi_cmd_mode(),
            WidgetName::ViInsert => self.vi_insert(),
            WidgetName::ViAddNext => self.vi_add_next(),
            WidgetName::ViAddEol => self.vi_add_eol(),
            WidgetName::ViInsertBol => self.vi_insert_bol(),

            // Terminal.
            WidgetName::Beep => {
                self.beep();
                true
            }
            WidgetName::ClearScreen => self.clear_screen(),
            WidgetName::Redisplay => {
                self.redisplay();
                true
            }
            WidgetName::SendBreak => self.send_break(),
            WidgetName::EndOfFile => self.end_of_file(),
            WidgetName::DeleteCharOrEof => self.delete_char_or_eof(),
            WidgetName::EditAndExecuteCommand => self.edit_and_execute_command(),
            WidgetName::UndefinedKey => self.undefined_key(),
            WidgetName::WhatCursorPosition => self.what_cursor_position(),
            WidgetName::DoLowercaseVersion => self.do_lowercase_version(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RecordingRenderer, ScriptedKeySource, TextBuffer};
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_builtin_is_callable_by_name() {
        for widget in WidgetName::iter() {
            // These read keys or end the read. Calling them on an empty script is fine,
            // the point is that the name resolves.
            let mut it = LineReader::new(
                Box::new(ScriptedKeySource::new()),
                Box::new(RecordingRenderer::new()),
            );
            it.buf = TextBuffer::new_with("some text");
            let name: &'static str = widget.into();
            let _ran = it.call_widget(name);
        }
    }

    #[test]
    fn test_unknown_name_fails() {
        let mut it = LineReader::new(
            Box::new(ScriptedKeySource::new()),
            Box::new(RecordingRenderer::new()),
        );
        assert!(!it.call_widget("no-such-widget"));
    }

    #[test]
    fn test_dispatch_runs_the_named_widget() {
        let mut it = LineReader::new(
            Box::new(ScriptedKeySource::new()),
            Box::new(RecordingRenderer::new()),
        );
        it.buf = TextBuffer::new_with("abc");
        assert!(it.call_widget("beginning-of-line"));
        assert_eq!(it.buf.cursor(), 0);
        assert!(it.call_widget("kill-line"));
        assert_eq!(it.buf.to_string(), "");
    }
}

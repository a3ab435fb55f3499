// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The stock key maps. Key sequences are the canonical ones that
//! [`crate::CrosstermKeySource`] produces: control chars, an ESC prefix for meta, and
//! xterm CSI sequences for the cursor and editing keys.

use std::{collections::HashMap, time::Duration};

use super::{Binding, DEL, ESC, KeyMap, WidgetName, alt, alt_char, ctrl, range};
use crate::DEFAULT_AMBIGUOUS_BINDING_MS;

pub const EMACS: &str = "emacs";
pub const VI_INSERT: &str = "vi-insert";
pub const VI_COMMAND: &str = "vi-command";
pub const MENU_SELECT: &str = "menu-select";
pub const VISUAL: &str = "visual";
pub const VI_OPP: &str = "vi-opp";
pub const SAFE: &str = "safe";
/// Alias of the editing map selected by `emacs-editing-mode` or `vi-editing-mode`.
pub const MAIN: &str = "main";

pub const KEY_UP: &str = "\x1b[A";
pub const KEY_DOWN: &str = "\x1b[B";
pub const KEY_RIGHT: &str = "\x1b[C";
pub const KEY_LEFT: &str = "\x1b[D";
pub const KEY_HOME: &str = "\x1b[H";
pub const KEY_END: &str = "\x1b[F";
pub const KEY_DELETE: &str = "\x1b[3~";
pub const KEY_INSERT: &str = "\x1b[2~";
pub const KEY_PAGE_UP: &str = "\x1b[5~";
pub const KEY_PAGE_DOWN: &str = "\x1b[6~";
pub const KEY_BACK_TAB: &str = "\x1b[Z";
pub const KEY_CTRL_RIGHT: &str = "\x1b[1;5C";
pub const KEY_CTRL_LEFT: &str = "\x1b[1;5D";
pub const KEY_ALT_RIGHT: &str = "\x1b[1;3C";
pub const KEY_ALT_LEFT: &str = "\x1b[1;3D";
pub const KEY_CTRL_DELETE: &str = "\x1b[3;5~";

/// Function keys F1 to F12.
pub const KEY_FUNCTIONS: [&str; 12] = [
    "\x1bOP", "\x1bOQ", "\x1bOR", "\x1bOS", "\x1b[15~", "\x1b[17~", "\x1b[18~",
    "\x1b[19~", "\x1b[20~", "\x1b[21~", "\x1b[23~", "\x1b[24~",
];

/// All the stock maps, with [`MAIN`] pointing at emacs or vi-insert.
#[must_use]
pub fn default_key_maps(emacs_main: bool) -> HashMap<String, KeyMap> {
    let mut acc = HashMap::new();
    acc.insert(EMACS.to_owned(), emacs_key_map());
    acc.insert(VI_INSERT.to_owned(), vi_insert_key_map());
    acc.insert(VI_COMMAND.to_owned(), vi_command_key_map());
    acc.insert(MENU_SELECT.to_owned(), menu_select_key_map());
    acc.insert(VISUAL.to_owned(), visual_key_map());
    acc.insert(VI_OPP.to_owned(), vi_opp_key_map());
    acc.insert(SAFE.to_owned(), safe_key_map());

    let timeout = Duration::from_millis(DEFAULT_AMBIGUOUS_BINDING_MS);
    for key_map in acc.values_mut() {
        key_map.unicode = Some(WidgetName::SelfInsert.into());
        key_map.ambiguous_timeout = Some(timeout);
    }

    let main = if emacs_main { EMACS } else { VI_INSERT };
    if let Some(it) = acc.get(main).cloned() {
        acc.insert(MAIN.to_owned(), it);
    }
    acc
}

fn bind_arrow_keys(it: &mut KeyMap) {
    it.bind(WidgetName::UpLineOrSearch, KEY_UP);
    it.bind(WidgetName::DownLineOrSearch, KEY_DOWN);
    it.bind(WidgetName::BackwardChar, KEY_LEFT);
    it.bind(WidgetName::ForwardChar, KEY_RIGHT);
    it.bind(WidgetName::BeginningOfLine, KEY_HOME);
    it.bind(WidgetName::EndOfLine, KEY_END);
    it.bind(WidgetName::DeleteChar, KEY_DELETE);
    it.bind(WidgetName::OverwriteMode, KEY_INSERT);
}

/// Meta bindings shared by emacs and vi-command.
fn bind_meta_keys(it: &mut KeyMap) {
    it.bind(WidgetName::SendBreak, alt(&ctrl('G')));
    it.bind(WidgetName::BackwardKillWord, alt(&ctrl('H')));
    it.bind(WidgetName::SelfInsertUnmeta, alt(&ctrl('M')));
    it.bind(WidgetName::CompleteWord, alt(&ESC.to_string()));
    it.bind(WidgetName::CharacterSearchBackward, alt(&ctrl(']')));
    it.bind(WidgetName::CopyPrevWord, alt(&ctrl('_')));
    it.bind(WidgetName::SetMarkCommand, alt_char(' '));
    it.bind(WidgetName::InsertLastWord, alt_char('.'));
    it.bind(WidgetName::InsertLastWord, alt_char('_'));
    it.bind(WidgetName::BeginningOfHistory, alt_char('<'));
    it.bind(WidgetName::ListChoices, alt_char('='));
    it.bind(WidgetName::EndOfHistory, alt_char('>'));
    it.bind(WidgetName::ListChoices, alt_char('?'));
    it.bind_all(
        WidgetName::DoLowercaseVersion,
        range('A', 'Z').iter().map(|it| alt(it)),
    );
    it.bind(WidgetName::AcceptAndHold, alt_char('a'));
    it.bind(WidgetName::BackwardWord, alt_char('b'));
    it.bind(WidgetName::CapitalizeWord, alt_char('c'));
    it.bind(WidgetName::KillWord, alt_char('d'));
    it.bind(WidgetName::KillWord, KEY_CTRL_DELETE);
    it.bind(WidgetName::ForwardWord, alt_char('f'));
    it.bind(WidgetName::DownCaseWord, alt_char('l'));
    it.bind(WidgetName::HistorySearchForward, alt_char('n'));
    it.bind(WidgetName::HistorySearchBackward, alt_char('p'));
    it.bind(WidgetName::TransposeWords, alt_char('t'));
    it.bind(WidgetName::UpCaseWord, alt_char('u'));
    it.bind(WidgetName::YankPop, alt_char('y'));
    it.bind(WidgetName::BackwardKillWord, alt_char(DEL));
}

fn bind_word_arrows(it: &mut KeyMap) {
    it.bind(WidgetName::ForwardWord, KEY_CTRL_RIGHT);
    it.bind(WidgetName::BackwardWord, KEY_CTRL_LEFT);
    it.bind(WidgetName::ForwardWord, KEY_ALT_RIGHT);
    it.bind(WidgetName::BackwardWord, KEY_ALT_LEFT);
    it.bind(WidgetName::ForwardWord, alt(KEY_RIGHT));
    it.bind(WidgetName::BackwardWord, alt(KEY_LEFT));
}

#[must_use]
pub fn emacs_key_map() -> KeyMap {
    let mut it = KeyMap::new();
    it.bind_all(WidgetName::Beep, KEY_FUNCTIONS);
    it.bind_all(WidgetName::Beep, [KEY_PAGE_UP, KEY_PAGE_DOWN]);
    it.bind(WidgetName::SetMarkCommand, ctrl('@'));
    it.bind(WidgetName::BeginningOfLine, ctrl('A'));
    it.bind(WidgetName::BackwardChar, ctrl('B'));
    it.bind(WidgetName::DeleteCharOrList, ctrl('D'));
    it.bind(WidgetName::EndOfLine, ctrl('E'));
    it.bind(WidgetName::ForwardChar, ctrl('F'));
    it.bind(WidgetName::SendBreak, ctrl('G'));
    it.bind(WidgetName::BackwardDeleteChar, ctrl('H'));
    it.bind(WidgetName::ExpandOrComplete, ctrl('I'));
    it.bind(WidgetName::AcceptLine, ctrl('J'));
    it.bind(WidgetName::KillLine, ctrl('K'));
    it.bind(WidgetName::ClearScreen, ctrl('L'));
    it.bind(WidgetName::AcceptLine, ctrl('M'));
    it.bind(WidgetName::DownLineOrHistory, ctrl('N'));
    it.bind(WidgetName::AcceptLineAndDownHistory, ctrl('O'));
    it.bind(WidgetName::UpLineOrHistory, ctrl('P'));
    it.bind(WidgetName::HistoryIncrementalSearchBackward, ctrl('R'));
    it.bind(WidgetName::HistoryIncrementalSearchForward, ctrl('S'));
    it.bind(WidgetName::TransposeChars, ctrl('T'));
    it.bind(WidgetName::KillWholeLine, ctrl('U'));
    it.bind(WidgetName::QuotedInsert, ctrl('V'));
    it.bind(WidgetName::BackwardKillWord, ctrl('W'));
    it.bind(WidgetName::Yank, ctrl('Y'));
    it.bind(WidgetName::CharacterSearch, ctrl(']'));
    it.bind(WidgetName::Undo, ctrl('_'));
    it.bind_all(WidgetName::SelfInsert, range(' ', '~'));
    it.bind(WidgetName::InsertCloseParen, ")");
    it.bind(WidgetName::InsertCloseSquare, "]");
    it.bind(WidgetName::InsertCloseCurly, "}");
    it.bind(WidgetName::BackwardDeleteChar, DEL.to_string());

    let ctrl_x = ctrl('X');
    let chord = |keys: &str| format!("{ctrl_x}{keys}");
    it.bind(WidgetName::ViMatchBracket, chord(&ctrl('B')));
    it.bind(WidgetName::SendBreak, chord(&ctrl('G')));
    it.bind(WidgetName::EditAndExecuteCommand, chord(&ctrl('E')));
    it.bind(WidgetName::ViFindNextChar, chord(&ctrl('F')));
    it.bind(WidgetName::ViJoin, chord(&ctrl('J')));
    it.bind(WidgetName::KillBuffer, chord(&ctrl('K')));
    it.bind(WidgetName::InferNextHistory, chord(&ctrl('N')));
    it.bind(WidgetName::OverwriteMode, chord(&ctrl('O')));
    it.bind(WidgetName::Redo, chord(&ctrl('R')));
    it.bind(WidgetName::Undo, chord(&ctrl('U')));
    it.bind(WidgetName::ViCmdMode, chord(&ctrl('V')));
    it.bind(WidgetName::ExchangePointAndMark, chord(&ctrl('X')));
    it.bind_all(
        WidgetName::DoLowercaseVersion,
        range('A', 'Z').iter().map(|it| chord(it)),
    );
    it.bind(WidgetName::WhatCursorPosition, chord("="));
    it.bind(WidgetName::KillLine, chord(&DEL.to_string()));

    bind_meta_keys(&mut it);
    it.bind(WidgetName::NegArgument, alt_char('-'));
    it.bind_all(
        WidgetName::DigitArgument,
        range('0', '9').iter().map(|it| alt(it)),
    );
    bind_arrow_keys(&mut it);
    bind_word_arrows(&mut it);
    it
}

#[must_use]
pub fn vi_insert_key_map() -> KeyMap {
    let mut it = KeyMap::new();
    it.bind_all(WidgetName::SelfInsert, range('\x00', '\x1f'));
    it.bind(WidgetName::ListChoices, ctrl('D'));
    it.bind(WidgetName::SendBreak, ctrl('G'));
    it.bind(WidgetName::BackwardDeleteChar, ctrl('H'));
    it.bind(WidgetName::ExpandOrComplete, ctrl('I'));
    it.bind(WidgetName::AcceptLine, ctrl('J'));
    it.bind(WidgetName::ClearScreen, ctrl('L'));
    it.bind(WidgetName::AcceptLine, ctrl('M'));
    it.bind(WidgetName::MenuComplete, ctrl('N'));
    it.bind(WidgetName::ReverseMenuComplete, ctrl('P'));
    it.bind(WidgetName::HistoryIncrementalSearchBackward, ctrl('R'));
    it.bind(WidgetName::HistoryIncrementalSearchForward, ctrl('S'));
    it.bind(WidgetName::TransposeChars, ctrl('T'));
    it.bind(WidgetName::KillWholeLine, ctrl('U'));
    it.bind(WidgetName::QuotedInsert, ctrl('V'));
    it.bind(WidgetName::BackwardKillWord, ctrl('W'));
    it.bind(WidgetName::Yank, ctrl('Y'));
    it.bind(WidgetName::ViCmdMode, ctrl('['));
    it.bind(WidgetName::Undo, ctrl('_'));
    it.bind(WidgetName::HistoryIncrementalSearchBackward, format!("{}r", ctrl('X')));
    it.bind(WidgetName::HistoryIncrementalSearchForward, format!("{}s", ctrl('X')));
    it.bind_all(WidgetName::SelfInsert, range(' ', '~'));
    it.bind(WidgetName::InsertCloseParen, ")");
    it.bind(WidgetName::InsertCloseSquare, "]");
    it.bind(WidgetName::InsertCloseCurly, "}");
    it.bind(WidgetName::BackwardDeleteChar, DEL.to_string());
    bind_arrow_keys(&mut it);
    it
}

#[must_use]
pub fn vi_command_key_map() -> KeyMap {
    let mut it = KeyMap::new();
    it.bind(WidgetName::ListChoices, ctrl('D'));
    it.bind(WidgetName::EmacsEditingMode, ctrl('E'));
    it.bind(WidgetName::SendBreak, ctrl('G'));
    it.bind(WidgetName::ViBackwardChar, ctrl('H'));
    it.bind(WidgetName::AcceptLine, ctrl('J'));
    it.bind(WidgetName::KillLine, ctrl('K'));
    it.bind(WidgetName::ClearScreen, ctrl('L'));
    it.bind(WidgetName::AcceptLine, ctrl('M'));
    it.bind(WidgetName::ViDownLineOrHistory, ctrl('N'));
    it.bind(WidgetName::ViUpLineOrHistory, ctrl('P'));
    it.bind(WidgetName::QuotedInsert, ctrl('Q'));
    it.bind(WidgetName::HistoryIncrementalSearchBackward, ctrl('R'));
    it.bind(WidgetName::HistoryIncrementalSearchForward, ctrl('S'));
    it.bind(WidgetName::TransposeChars, ctrl('T'));
    it.bind(WidgetName::KillWholeLine, ctrl('U'));
    it.bind(WidgetName::QuotedInsert, ctrl('V'));
    it.bind(WidgetName::BackwardKillWord, ctrl('W'));
    it.bind(WidgetName::Yank, ctrl('Y'));
    it.bind(WidgetName::HistoryIncrementalSearchBackward, format!("{}r", ctrl('X')));
    it.bind(WidgetName::HistoryIncrementalSearchForward, format!("{}s", ctrl('X')));

    bind_meta_keys(&mut it);
    it.bind_all(
        WidgetName::DigitArgument,
        range('0', '9').iter().map(|it| alt(it)),
    );
    it.bind(WidgetName::DigitArgument, alt_char('-'));

    it.bind(WidgetName::ForwardChar, " ");
    it.bind(WidgetName::ViInsertComment, "#");
    it.bind(WidgetName::EndOfLine, "$");
    it.bind(WidgetName::ViMatchBracket, "%");
    it.bind(WidgetName::ViDownLineOrHistory, "+");
    it.bind(WidgetName::ViRevRepeatFind, ",");
    it.bind(WidgetName::ViUpLineOrHistory, "-");
    it.bind(WidgetName::ViHistorySearchBackward, "/");
    it.bind(WidgetName::ViDigitOrBeginningOfLine, "0");
    it.bind_all(WidgetName::DigitArgument, range('1', '9'));
    it.bind(WidgetName::ViRepeatFind, ";");
    it.bind(WidgetName::ListChoices, "=");
    it.bind(WidgetName::ViHistorySearchForward, "?");
    it.bind(WidgetName::ViAddEol, "A");
    it.bind(WidgetName::ViBackwardBlankWord, "B");
    it.bind(WidgetName::ViChangeEol, "C");
    it.bind(WidgetName::ViKillEol, "D");
    it.bind(WidgetName::ViForwardBlankWordEnd, "E");
    it.bind(WidgetName::ViFindPrevChar, "F");
    it.bind(WidgetName::ViFetchHistory, "G");
    it.bind(WidgetName::ViInsertBol, "I");
    it.bind(WidgetName::ViJoin, "J");
    it.bind(WidgetName::ViRevRepeatSearch, "N");
    it.bind(WidgetName::ViOpenLineAbove, "O");
    it.bind(WidgetName::ViPutBefore, "P");
    it.bind(WidgetName::ViReplace, "R");
    it.bind(WidgetName::ViKillLine, "S");
    it.bind(WidgetName::ViFindPrevCharSkip, "T");
    it.bind(WidgetName::Redo, "U");
    it.bind(WidgetName::VisualLineMode, "V");
    it.bind(WidgetName::ViForwardBlankWord, "W");
    it.bind(WidgetName::ViBackwardDeleteChar, "X");
    it.bind(WidgetName::ViYankWholeLine, "Y");
    it.bind(WidgetName::ViFirstNonBlank, "^");
    it.bind(WidgetName::ViAddNext, "a");
    it.bind(WidgetName::ViBackwardWord, "b");
    it.bind(WidgetName::ViChangeTo, "c");
    it.bind(WidgetName::ViDelete, "d");
    it.bind(WidgetName::ViForwardWordEnd, "e");
    it.bind(WidgetName::ViFindNextChar, "f");
    it.bind(WidgetName::WhatCursorPosition, "ga");
    it.bind(WidgetName::ViBackwardBlankWordEnd, "gE");
    it.bind(WidgetName::ViBackwardWordEnd, "ge");
    it.bind(WidgetName::ViDownCase, "gu");
    it.bind(WidgetName::ViUpCase, "gU");
    it.bind(WidgetName::ViOperSwapCase, "g~");
    it.bind(WidgetName::ViBackwardChar, "h");
    it.bind(WidgetName::ViInsert, "i");
    it.bind(WidgetName::DownLineOrHistory, "j");
    it.bind(WidgetName::UpLineOrHistory, "k");
    it.bind(WidgetName::ViForwardChar, "l");
    it.bind(WidgetName::ViRepeatSearch, "n");
    it.bind(WidgetName::ViOpenLineBelow, "o");
    it.bind(WidgetName::ViPutAfter, "p");
    it.bind(WidgetName::ViReplaceChars, "r");
    it.bind(WidgetName::ViSubstitute, "s");
    it.bind(WidgetName::ViFindNextCharSkip, "t");
    it.bind(WidgetName::Undo, "u");
    it.bind(WidgetName::VisualMode, "v");
    it.bind(WidgetName::ViForwardWord, "w");
    it.bind(WidgetName::ViDeleteChar, "x");
    it.bind(WidgetName::ViYank, "y");
    it.bind(WidgetName::ViGotoColumn, "|");
    it.bind(WidgetName::ViSwapCase, "~");
    it.bind(WidgetName::ViBackwardChar, DEL.to_string());
    bind_arrow_keys(&mut it);
    it
}

#[must_use]
pub fn menu_select_key_map() -> KeyMap {
    let mut it = KeyMap::new();
    it.bind(WidgetName::MenuComplete, "\t");
    it.bind(WidgetName::ReverseMenuComplete, KEY_BACK_TAB);
    it.bind(WidgetName::AcceptLine, "\r");
    it.bind(WidgetName::AcceptLine, "\n");
    bind_arrow_keys(&mut it);
    it
}

#[must_use]
pub fn safe_key_map() -> KeyMap {
    let mut it = KeyMap::new();
    it.bind_all(WidgetName::SelfInsert, range('\x00', DEL));
    it.bind(WidgetName::AcceptLine, "\r");
    it.bind(WidgetName::AcceptLine, "\n");
    it.bind(WidgetName::SendBreak, ctrl('G'));
    it
}

#[must_use]
pub fn visual_key_map() -> KeyMap {
    let mut it = KeyMap::new();
    it.bind(WidgetName::UpLine, KEY_UP);
    it.bind(WidgetName::UpLine, "k");
    it.bind(WidgetName::DownLine, KEY_DOWN);
    it.bind(WidgetName::DownLine, "j");
    it.bind(WidgetName::DeactivateRegion, ESC.to_string());
    it.bind(WidgetName::ExchangePointAndMark, "o");
    it.bind(WidgetName::PutReplaceSelection, "p");
    it.bind(WidgetName::ViDelete, "x");
    it.bind(WidgetName::ViOperSwapCase, "~");
    it
}

#[must_use]
pub fn vi_opp_key_map() -> KeyMap {
    let mut it = KeyMap::new();
    it.bind(WidgetName::UpLine, KEY_UP);
    it.bind(WidgetName::UpLine, "k");
    it.bind(WidgetName::DownLine, KEY_DOWN);
    it.bind(WidgetName::DownLine, "j");
    it.bind(WidgetName::ViCmdMode, ESC.to_string());
    it
}

/// Each of `terminators` ends an incremental search and is consumed.
#[must_use]
pub fn search_terminators_key_map(terminators: &str) -> KeyMap {
    let mut it = KeyMap::new();
    for ch in terminators.chars() {
        it.bind(Binding::widget(WidgetName::AcceptLine), ch.to_string());
    }
    it
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KeyLookup;
    use pretty_assertions::assert_eq;

    fn bound(key_map: &KeyMap, keys: &str) -> Option<WidgetName> {
        key_map.get(keys).and_then(Binding::builtin)
    }

    #[test]
    fn test_main_alias() {
        let maps = default_key_maps(true);
        assert_eq!(maps.get(MAIN), maps.get(EMACS));
        let maps = default_key_maps(false);
        assert_eq!(maps.get(MAIN), maps.get(VI_INSERT));
    }

    #[test]
    fn test_emacs_bindings() {
        let it = emacs_key_map();
        assert_eq!(bound(&it, "\x01"), Some(WidgetName::BeginningOfLine));
        assert_eq!(bound(&it, "a"), Some(WidgetName::SelfInsert));
        assert_eq!(bound(&it, ")"), Some(WidgetName::InsertCloseParen));
        assert_eq!(bound(&it, "\x1bf"), Some(WidgetName::ForwardWord));
        assert_eq!(bound(&it, "\x18\x18"), Some(WidgetName::ExchangePointAndMark));
        assert_eq!(bound(&it, "\x1bF"), Some(WidgetName::DoLowercaseVersion));
        assert_eq!(bound(&it, KEY_UP), Some(WidgetName::UpLineOrSearch));
        assert_eq!(bound(&it, "\x1b-"), Some(WidgetName::NegArgument));
    }

    #[test]
    fn test_vi_bindings() {
        let insert = vi_insert_key_map();
        assert_eq!(bound(&insert, "\x1b"), Some(WidgetName::ViCmdMode));
        // ESC is also the start of the arrow keys.
        assert_eq!(
            insert.lookup("\x1b"),
            KeyLookup::Ambiguous(WidgetName::ViCmdMode.into())
        );
        let cmd = vi_command_key_map();
        assert_eq!(bound(&cmd, "d"), Some(WidgetName::ViDelete));
        assert_eq!(bound(&cmd, "w"), Some(WidgetName::ViForwardWord));
        assert_eq!(bound(&cmd, "ge"), Some(WidgetName::ViBackwardWordEnd));
        assert_eq!(cmd.lookup("g"), KeyLookup::Prefix);
        assert_eq!(bound(&cmd, "\x1b-"), Some(WidgetName::DigitArgument));
    }

    #[test]
    fn test_every_map_falls_back_to_self_insert() {
        for (name, it) in default_key_maps(true) {
            assert_eq!(
                it.unicode.as_ref().and_then(Binding::builtin),
                Some(WidgetName::SelfInsert),
                "{name}"
            );
        }
    }
}

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Every built in editing operation, by the stable kebab-case name that key maps use
/// to refer to it. `WidgetName::ViForwardWord.to_string()` is `"vi-forward-word"`, and
/// parsing goes the other way.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum WidgetName {
    // Motion.
    ForwardChar,
    BackwardChar,
    ForwardWord,
    BackwardWord,
    EmacsForwardWord,
    EmacsBackwardWord,
    BeginningOfLine,
    EndOfLine,
    BeginningOfLineHist,
    EndOfLineHist,
    BeginningOfBufferOrHistory,
    EndOfBufferOrHistory,
    UpLine,
    DownLine,
    UpLineOrHistory,
    DownLineOrHistory,
    UpLineOrSearch,
    DownLineOrSearch,
    ViUpLineOrHistory,
    ViDownLineOrHistory,
    ViForwardChar,
    ViBackwardChar,
    ViForwardWord,
    ViForwardBlankWord,
    ViForwardWordEnd,
    ViForwardBlankWordEnd,
    ViBackwardWord,
    ViBackwardBlankWord,
    ViBackwardWordEnd,
    ViBackwardBlankWordEnd,
    ViBeginningOfLine,
    ViEndOfLine,
    ViFirstNonBlank,
    ViGotoColumn,
    ViFindNextChar,
    ViFindPrevChar,
    ViFindNextCharSkip,
    ViFindPrevCharSkip,
    ViRepeatFind,
    ViRevRepeatFind,
    ViMatchBracket,
    CharacterSearch,
    CharacterSearchBackward,

    // Editing.
    SelfInsert,
    SelfInsertUnmeta,
    QuotedInsert,
    OverwriteMode,
    DeleteChar,
    BackwardDeleteChar,
    DeleteCharOrList,
    TransposeChars,
    TransposeWords,
    CapitalizeWord,
    UpCaseWord,
    DownCaseWord,
    ClearBuffer,
    InsertComment,
    ViInsertComment,
    ViDeleteChar,
    ViBackwardDeleteChar,
    ViSwapCase,
    ViOperSwapCase,
    ViReplaceChars,
    ViReplace,
    ViChangeEol,
    ViChangeWholeLine,
    ViKillEol,
    ViSubstitute,
    ViOpenLineAbove,
    ViOpenLineBelow,
    ViJoin,
    ViUpCase,
    ViDownCase,
    MagicSpace,
    ExpandHistory,
    InsertCloseParen,
    InsertCloseSquare,
    InsertCloseCurly,
    PutReplaceSelection,

    // Kill and yank.
    KillLine,
    BackwardKillLine,
    KillWholeLine,
    KillWord,
    BackwardKillWord,
    KillBuffer,
    KillRegion,
    CopyRegionAsKill,
    CopyPrevWord,
    Yank,
    YankPop,
    ViPutAfter,
    ViPutBefore,
    ViYank,
    ViYankWholeLine,
    ViYankEol,
    ViDelete,
    ViChangeTo,
    ViKillLine,
    ViBackwardKillWord,

    // Numeric arguments.
    DigitArgument,
    NegArgument,
    UniversalArgument,
    ViDigitOrBeginningOfLine,
    ViArgDigit,

    // Region.
    SetMarkCommand,
    ExchangePointAndMark,
    VisualMode,
    VisualLineMode,
    DeactivateRegion,

    // Undo.
    Undo,
    Redo,
    ViUndoChange,

    // History.
    AcceptLine,
    AcceptAndHold,
    AcceptAndInferNextHistory,
    AcceptLineAndDownHistory,
    UpHistory,
    DownHistory,
    BeginningOfHistory,
    EndOfHistory,
    HistorySearchBackward,
    HistorySearchForward,
    HistoryIncrementalSearchBackward,
    HistoryIncrementalSearchForward,
    ViHistorySearchBackward,
    ViHistorySearchForward,
    ViRepeatSearch,
    ViRevRepeatSearch,
    ViFetchHistory,
    InferNextHistory,
    InsertLastWord,

    // Completion.
    CompleteWord,
    ExpandOrComplete,
    ExpandOrCompletePrefix,
    CompletePrefix,
    MenuComplete,
    ReverseMenuComplete,
    ListChoices,
    MenuExpandOrComplete,
    ExpandWord,
    AcceptAndMenuComplete,

    // Modes.
    EmacsEditingMode,
    ViEditingMode,
    ViCmdMode,
    ViInsert,
    ViAddNext,
    ViAddEol,
    ViInsertBol,

    // Misc.
    Beep,
    ClearScreen,
    Redisplay,
    SendBreak,
    EndOfFile,
    DeleteCharOrEof,
    EditAndExecuteCommand,
    UndefinedKey,
    WhatCursorPosition,
    DoLowercaseVersion,
}

impl WidgetName {
    /// Numeric argument widgets keep the repeat count alive for the next widget.
    #[must_use]
    pub fn is_argument(self) -> bool {
        matches!(
            self,
            WidgetName::DigitArgument
                | WidgetName::NegArgument
                | WidgetName::UniversalArgument
                | WidgetName::ViArgDigit
        )
    }

    /// Kills that coalesce with the kill before them.
    #[must_use]
    pub fn keeps_last_kill(self) -> bool {
        matches!(
            self,
            WidgetName::KillLine
                | WidgetName::KillWholeLine
                | WidgetName::BackwardKillWord
                | WidgetName::KillWord
        )
    }

    #[must_use]
    pub fn keeps_last_yank(self) -> bool {
        matches!(self, WidgetName::Yank | WidgetName::YankPop)
    }

    /// Motions allowed after a vi operator (`d`, `c`, `y`) while it waits for its
    /// target.
    #[must_use]
    pub fn is_vi_motion(self) -> bool {
        matches!(
            self,
            WidgetName::ForwardChar
                | WidgetName::BackwardChar
                | WidgetName::BeginningOfLine
                | WidgetName::EndOfLine
                | WidgetName::ViForwardChar
                | WidgetName::ViBackwardChar
                | WidgetName::ViForwardWord
                | WidgetName::ViForwardBlankWord
                | WidgetName::ViForwardWordEnd
                | WidgetName::ViForwardBlankWordEnd
                | WidgetName::ViBackwardWord
                | WidgetName::ViBackwardBlankWord
                | WidgetName::ViBackwardWordEnd
                | WidgetName::ViBackwardBlankWordEnd
                | WidgetName::ViBeginningOfLine
                | WidgetName::ViEndOfLine
                | WidgetName::ViFirstNonBlank
                | WidgetName::ViGotoColumn
                | WidgetName::ViDigitOrBeginningOfLine
                | WidgetName::ViFindNextChar
                | WidgetName::ViFindPrevChar
                | WidgetName::ViFindNextCharSkip
                | WidgetName::ViFindPrevCharSkip
                | WidgetName::ViRepeatFind
                | WidgetName::ViRevRepeatFind
                | WidgetName::ViMatchBracket
                | WidgetName::UpLine
                | WidgetName::DownLine
                | WidgetName::DigitArgument
                | WidgetName::ViArgDigit
        )
    }
}

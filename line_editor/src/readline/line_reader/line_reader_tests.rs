// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Whole reads driven by scripted keys, checked through the returned line, history and
//! what the renderer was asked to paint.

use pretty_assertions::assert_eq;
use serial_test::serial;

use crate::{Binding, History, KeyInput, LineReader, MAIN, MemoryHistory, ReadlineError,
            RecordingRenderer, ScriptedKeySource, StringsCompleter, ctrl};

fn reader(source: ScriptedKeySource) -> (LineReader, RecordingRenderer) {
    let renderer = RecordingRenderer::new();
    let reader = LineReader::new(Box::new(source), Box::new(renderer.clone()));
    (reader, renderer)
}

fn reader_for(keys: &str) -> (LineReader, RecordingRenderer) {
    reader(ScriptedKeySource::from_keys(keys))
}

#[test]
fn test_typed_line_is_returned_and_recorded() -> Result<(), ReadlineError> {
    let (mut it, renderer) = reader_for("hello\r");
    assert_eq!(it.read_line("> ")?, "hello");
    assert_eq!(it.history().last(), Some("hello"));

    let record = renderer.record();
    assert_eq!(record.finished_lines, 1);
    let last = record.frames.last().map(|it| it.lines.clone());
    assert_eq!(last, Some(vec!["> hello".to_owned()]));
    Ok(())
}

#[test]
fn test_ctrl_d_on_empty_line_ends_input() {
    let (mut it, _renderer) = reader_for("\x04");
    let result = it.read_line("> ");
    assert!(matches!(
        result,
        Err(ReadlineError::EndOfFile { partial_line }) if partial_line.is_empty()
    ));
}

#[test]
fn test_ctrl_d_inside_line_deletes() -> Result<(), ReadlineError> {
    let (mut it, _renderer) = reader_for("abc\x01\x04\r");
    assert_eq!(it.read_line("> ")?, "bc");
    Ok(())
}

#[test]
fn test_end_of_keys_keeps_partial_line() {
    let (mut it, _renderer) = reader_for("abc");
    let result = it.read_line("> ");
    assert!(matches!(
        result,
        Err(ReadlineError::EndOfFile { partial_line }) if partial_line == "abc"
    ));
}

#[test]
fn test_interrupt_keeps_partial_line() {
    let mut source = ScriptedKeySource::new();
    source.push_keys("ab").push(KeyInput::Interrupt);
    let (mut it, _renderer) = reader(source);
    let result = it.read_line("> ");
    assert!(matches!(
        result,
        Err(ReadlineError::UserInterrupt { partial_line }) if partial_line == "ab"
    ));
    assert!(it.history().is_empty());
}

#[test]
fn test_vi_delete_word_from_line_start() -> Result<(), ReadlineError> {
    let mut source = ScriptedKeySource::new();
    source
        .push_keys("one two three\x1b")
        .push(KeyInput::Timeout)
        .push_keys("0dw\r");
    let (mut it, _renderer) = reader(source);
    assert!(it.call_widget("vi-editing-mode"));
    assert_eq!(it.read_line("> ")?, "two three");
    Ok(())
}

#[test]
fn test_vi_mode_survives_between_reads() -> Result<(), ReadlineError> {
    let mut source = ScriptedKeySource::new();
    source
        .push_keys("first\r")
        .push_keys("abc\x1b")
        .push(KeyInput::Timeout)
        .push_keys("x\r");
    let (mut it, _renderer) = reader(source);
    assert!(it.call_widget("vi-editing-mode"));
    assert_eq!(it.read_line("> ")?, "first");
    assert_eq!(it.read_line("> ")?, "ab");
    Ok(())
}

#[test]
fn test_bang_bang_repeats_last_line() -> Result<(), ReadlineError> {
    let (it, _renderer) = reader_for("!! -l\r");
    let mut it = it.with_history(MemoryHistory::new_with(&["ls"]));
    assert_eq!(it.read_line("> ")?, "ls -l");
    assert_eq!(it.history().last(), Some("ls -l"));
    Ok(())
}

#[test]
fn test_tab_completes_unique_match() -> Result<(), ReadlineError> {
    let (it, _renderer) = reader_for("git stat\t\r");
    let mut it = it.with_completer(StringsCompleter::new(["status", "stash", "show"]));
    assert_eq!(it.read_line("> ")?, "git status ");
    Ok(())
}

#[test]
fn test_undo_takes_back_last_change() -> Result<(), ReadlineError> {
    let (mut it, _renderer) = reader_for("abc\x1f\r");
    assert_eq!(it.read_line("> ")?, "ab");
    Ok(())
}

#[test]
fn test_kill_then_yank_moves_word() -> Result<(), ReadlineError> {
    let (mut it, _renderer) = reader_for("hello world\x17\x01\x19\r");
    assert_eq!(it.read_line("> ")?, "worldhello ");
    Ok(())
}

#[test]
fn test_digit_argument_repeats_insert() -> Result<(), ReadlineError> {
    let (mut it, _renderer) = reader_for("\x1b3x\r");
    assert_eq!(it.read_line("> ")?, "xxx");
    Ok(())
}

#[test]
fn test_unclosed_bracket_continues_on_next_line() -> Result<(), ReadlineError> {
    let (mut it, _renderer) = reader_for("echo (a\rb)\r");
    assert_eq!(it.read_line("> ")?, "echo (a\nb)");
    Ok(())
}

#[test]
fn test_each_bracket_kind_continues_until_closed() -> Result<(), ReadlineError> {
    let (mut it, _renderer) = reader_for("ls [a\r{b\rc}]\r");
    assert_eq!(it.read_line("> ")?, "ls [a\n{b\nc}]");
    Ok(())
}

#[test]
fn test_incremental_search_accepts_match() -> Result<(), ReadlineError> {
    let (it, _renderer) = reader_for("\x12car\x12\r");
    let mut it = it.with_history(MemoryHistory::new_with(&[
        "cargo build",
        "git status",
        "cargo test",
    ]));
    assert_eq!(it.read_line("> ")?, "cargo build");
    Ok(())
}

#[test]
fn test_masked_read_hides_text_and_history() -> Result<(), ReadlineError> {
    let (mut it, renderer) = reader_for("secret\r");
    assert_eq!(it.read_line_masked("password: ", '*')?, "secret");
    assert!(it.history().is_empty());
    let shown = renderer.last_frame().map(|it| it.buffer);
    assert_eq!(shown.as_deref(), Some("******"));
    Ok(())
}

#[test]
fn test_edit_and_execute_returns_empty_line() -> Result<(), ReadlineError> {
    let (mut it, _renderer) = reader_for("ls\x18\x05");
    assert_eq!(it.read_line("> ")?, "");
    assert!(it.history().is_empty());
    Ok(())
}

#[test]
fn test_failed_widget_rings_bell() -> Result<(), ReadlineError> {
    let (mut it, renderer) = reader_for("\x08\r");
    assert_eq!(it.read_line("> ")?, "");
    assert_eq!(renderer.record().beeps, 1);
    Ok(())
}

#[test]
fn test_inline_widget_prints_above_prompt() -> Result<(), ReadlineError> {
    let (mut it, renderer) = reader_for("ab\x14\r");
    it.register_widget("announce", |reader: &mut LineReader| {
        reader.handle().print_above("note").is_ok()
    });
    if let Some(main) = it.key_map_mut(MAIN) {
        main.bind(Binding::Widget("announce".into()), ctrl('T'));
    }
    assert_eq!(it.read_line("> ")?, "ab");
    assert_eq!(renderer.record().printed, vec!["note".to_owned()]);
    Ok(())
}

#[test]
#[serial]
fn test_print_above_from_other_thread() -> Result<(), ReadlineError> {
    let (mut it, renderer) = reader_for("x\r");
    let handle = it.handle();
    std::thread::spawn(move || handle.print_above("from a thread"))
        .join()
        .map_err(|_| ReadlineError::Poisoned)??;
    assert_eq!(it.read_line("> ")?, "x");
    assert_eq!(renderer.record().printed, vec!["from a thread".to_owned()]);
    Ok(())
}

#[test]
fn test_initial_text_is_editable() -> Result<(), ReadlineError> {
    let (mut it, _renderer) = reader_for("\x08!\r");
    assert_eq!(it.read_line_with("> ", None, Some("hello?"))?, "hello!");
    Ok(())
}

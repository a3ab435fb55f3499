// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! History expansion (event designators) applied to a line before it is accepted.
//!
//! | Designator      | Expands to                                                  |
//! |-----------------|-------------------------------------------------------------|
//! | `!!`            | the previous line                                           |
//! | `!n`            | line number `n` (1 based, absolute)                         |
//! | `!-n`           | the line `n` entries back                                   |
//! | `!#`            | the line typed so far                                       |
//! | `!?str?`        | the newest line containing `str` (closing `?` optional)     |
//! | `!str`          | the newest line starting with `str`                         |
//! | `!$`            | the last word of the previous line                          |
//! | `^old^new^`     | the previous line with `old` replaced by `new` (line start) |
//!
//! Nothing is expanded inside single quotes or right after a `\`. A `!` followed by
//! whitespace, `=`, `(` or the end of the line stays a literal `!`.

use super::History;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum ExpansionError {
    /// The designator does not match any history entry.
    #[error("{0}: event not found")]
    #[diagnostic(code(r3bl_line_editor::history::event_not_found))]
    EventNotFound(String),
}

/// Expand every event designator in `line`.
///
/// # Errors
///
/// Returns [`ExpansionError::EventNotFound`] for the first designator that does not
/// resolve, leaving it to the caller to abort or show the message.
pub fn expand_history(history: &dyn History, line: &str) -> Result<String, ExpansionError> {
    let chars: Vec<char> = line.chars().collect();
    let mut acc = String::with_capacity(line.len());
    let mut in_quote = false;
    let mut escaped = false;
    let mut index = 0;

    while index < chars.len() {
        let ch = chars[index];
        if escaped {
            escaped = false;
            acc.push(ch);
        } else if ch == '\'' {
            in_quote = !in_quote;
            acc.push(ch);
        } else if in_quote {
            acc.push(ch);
        } else if ch == '\\' {
            escaped = true;
            acc.push(ch);
        } else if ch == '!' && index + 1 < chars.len() {
            index = expand_bang(history, &chars, index + 1, &mut acc)?;
            continue;
        } else if ch == '^' && index == 0 {
            if let Some((replaced, next)) = quick_substitution(history, &chars)? {
                acc.push_str(&replaced);
                index = next;
                continue;
            }
            acc.push(ch);
        } else {
            acc.push(ch);
        }
        index += 1;
    }

    Ok(acc)
}

/// Expand the designator starting at `start` (right after the `!`). Returns the index
/// of the first char after the designator.
fn expand_bang(
    history: &dyn History,
    chars: &[char],
    start: usize,
    acc: &mut String,
) -> Result<usize, ExpansionError> {
    let previous = || {
        history
            .end_index()
            .checked_sub(1)
            .and_then(|it| history.get(it))
    };

    match chars[start] {
        '!' => {
            let line = previous().ok_or_else(|| not_found("!!"))?;
            acc.push_str(line);
            Ok(start + 1)
        }
        '#' => {
            let so_far = acc.clone();
            acc.push_str(&so_far);
            Ok(start + 1)
        }
        '$' => {
            let line = previous().ok_or_else(|| not_found("!$"))?;
            let line = line.trim();
            let last_word = line.rsplit(' ').next().unwrap_or(line);
            acc.push_str(last_word);
            Ok(start + 1)
        }
        '?' => {
            let end = chars[start + 1..]
                .iter()
                .position(|it| *it == '?')
                .map_or(chars.len(), |it| start + 1 + it);
            let needle: String = chars[start + 1..end].iter().collect();
            let found = history
                .search_backward(history.end_index(), &|it: &str| it.contains(needle.as_str()))
                .and_then(|it| history.get(it))
                .ok_or_else(|| not_found(&format!("!?{needle}")))?;
            acc.push_str(found);
            Ok((end + 1).min(chars.len()))
        }
        ch if ch.is_whitespace() || ch == '=' || ch == '(' => {
            acc.push('!');
            Ok(start)
        }
        ch if ch == '-' || ch.is_ascii_digit() => {
            let negative = ch == '-';
            let digits_start = if negative { start + 1 } else { start };
            let digits_end = chars[digits_start..]
                .iter()
                .position(|it| !it.is_ascii_digit())
                .map_or(chars.len(), |it| digits_start + it);
            let digits: String = chars[digits_start..digits_end].iter().collect();
            let designator = format!("!{}{digits}", if negative { "-" } else { "" });
            let number: usize = digits.parse().map_err(|_| not_found(&designator))?;

            let index = if negative {
                history.end_index().checked_sub(number).filter(|_| number > 0)
            } else {
                number.checked_sub(1)
            };
            let line = index
                .filter(|it| *it >= history.first_index())
                .and_then(|it| history.get(it))
                .ok_or_else(|| not_found(&designator))?;
            acc.push_str(line);
            Ok(digits_end)
        }
        _ => {
            let end = chars[start..]
                .iter()
                .position(|it| it.is_whitespace())
                .map_or(chars.len(), |it| start + it);
            let prefix: String = chars[start..end].iter().collect();
            let found = history
                .search_backward(history.end_index(), &|it: &str| {
                    it.starts_with(prefix.as_str())
                })
                .and_then(|it| history.get(it))
                .ok_or_else(|| not_found(&format!("!{prefix}")))?;
            acc.push_str(found);
            Ok(end)
        }
    }
}

/// `^old^new^` at the start of the line. Returns [`None`] if the line does not have the
/// second `^`, in which case the `^` is literal.
fn quick_substitution(
    history: &dyn History,
    chars: &[char],
) -> Result<Option<(String, usize)>, ExpansionError> {
    let Some(second) = chars[1..].iter().position(|it| *it == '^').map(|it| it + 1) else {
        return Ok(None);
    };
    let third = chars[second + 1..]
        .iter()
        .position(|it| *it == '^')
        .map_or(chars.len(), |it| second + 1 + it);

    let old: String = chars[1..second].iter().collect();
    let new: String = chars[second + 1..third].iter().collect();
    let previous = history
        .last()
        .ok_or_else(|| not_found(&format!("^{old}^{new}")))?;

    Ok(Some((previous.replace(&old, &new), (third + 1).min(chars.len()))))
}

fn not_found(designator: &str) -> ExpansionError {
    ExpansionError::EventNotFound(designator.to_string())
}

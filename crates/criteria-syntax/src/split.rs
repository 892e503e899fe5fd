//! Top-level splitting of criterion text.
//!
//! A separator only splits when it sits outside every parenthesis, so
//! `and(a:eq(1),b:eq(2)),c:eq(3)` yields two segments. A backslash escapes the
//! character after it: escaped separators never split and escaped parentheses never
//! change the depth. Segments are slices of the (trimmed) input and keep their escapes.

use crate::escape::{ESCAPE, trim_unescaped};

/// Splits `text` at every `separator` found at parenthesis depth zero.
///
/// Unbalanced input still terminates: the depth may go negative and the split is
/// best effort. Empty input yields no segments.
pub fn split(text: &str, separator: char) -> Vec<&str> {
    let text = trim_unescaped(text);
    if text.is_empty() {
        return Vec::new();
    }

    let mut segments = Vec::new();
    let mut depth: i32 = 0;
    let mut start = 0;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }

        match ch {
            ESCAPE => escaped = true,
            '(' => depth += 1,
            ')' => depth -= 1,
            c if c == separator && depth == 0 => {
                segments.push(&text[start..idx]);
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }

    segments.push(&text[start..]);
    segments
}

/// Splits `text` at the first unescaped `separator` at depth zero.
pub fn split_once_top_level(text: &str, separator: char) -> Option<(&str, &str)> {
    let mut depth: i32 = 0;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }

        match ch {
            ESCAPE => escaped = true,
            '(' => depth += 1,
            ')' => depth -= 1,
            c if c == separator && depth == 0 => {
                return Some((&text[..idx], &text[idx + c.len_utf8()..]));
            }
            _ => {}
        }
    }

    None
}

/// Splits `name(arguments)` into its name and the text between the outer parentheses.
///
/// Returns `None` unless the first unescaped `(` is closed by the final character and
/// the name is a non-empty identifier.
pub fn split_call(text: &str) -> Option<(&str, &str)> {
    if !text.ends_with(')') {
        return None;
    }

    let open = first_unescaped(text, '(')?;
    let name = &text[..open];
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }

    let close = matching_close(text, open)?;
    if close != text.len() - 1 {
        return None;
    }

    Some((name, &text[open + 1..close]))
}

/// The identifier in front of the first unescaped `(`, if the text opens a call.
///
/// Unlike [`split_call`] this does not require the call to be closed, so it tells a
/// broken call apart from a plain value.
pub fn call_name(text: &str) -> Option<&str> {
    let open = first_unescaped(text, '(')?;
    let name = &text[..open];
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    Some(name)
}

/// Byte index of the parenthesis that closes the one opened at `open`.
pub fn matching_close(text: &str, open: usize) -> Option<usize> {
    let mut depth: i32 = 0;
    let mut escaped = false;

    for (idx, ch) in text[open..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }

        match ch {
            ESCAPE => escaped = true,
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + idx);
                }
            }
            _ => {}
        }
    }

    None
}

fn first_unescaped(text: &str, needle: char) -> Option<usize> {
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if ch == ESCAPE {
            escaped = true;
        } else if ch == needle {
            return Some(idx);
        }
    }

    None
}

use std::borrow::Cow;

pub const ESCAPE: char = '\\';

const RESERVED: [char; 4] = [ESCAPE, ',', '(', ')'];

/// Escapes operand text so it survives a trip through the grammar.
///
/// Reserved characters and leading/trailing whitespace get a backslash prefix.
pub fn escape_operand(text: &str) -> Cow<'_, str> {
    let lead = text.len() - text.trim_start().len();
    let trail = text.trim_end().len();

    let needs_escape = lead > 0
        || trail < text.len()
        || text.chars().any(|c| RESERVED.contains(&c));
    if !needs_escape {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 4);
    for (idx, ch) in text.char_indices() {
        let edge_space = ch.is_whitespace() && (idx < lead || idx >= trail);
        if edge_space || RESERVED.contains(&ch) {
            out.push(ESCAPE);
        }
        out.push(ch);
    }
    Cow::Owned(out)
}

/// Removes one level of backslash escaping. A trailing lone backslash is kept.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(ch) = chars.next() {
        if ch == ESCAPE {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push(ESCAPE),
            }
        } else {
            out.push(ch);
        }
    }

    out
}

/// Trims whitespace that is not protected by an escape.
pub fn trim_unescaped(text: &str) -> &str {
    let text = text.trim_start();
    let mut end = text.len();

    while let Some(ch) = text[..end].chars().next_back() {
        if !ch.is_whitespace() {
            break;
        }
        let before = &text[..end - ch.len_utf8()];
        let slashes = before.chars().rev().take_while(|c| *c == ESCAPE).count();
        if slashes % 2 == 1 {
            break;
        }
        end -= ch.len_utf8();
    }

    &text[..end]
}

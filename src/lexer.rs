//! Quote-aware splitting primitives shared by every parsing step.
//!
//! tiny-lang has no token stream: lines are cut apart on separators (`:` for
//! labels, ` ` after the keyword, `=` in assignments, `goto` in conditionals,
//! `,` in print lists) while anything between a pair of quote characters is
//! left untouched.

/// The quote character of the language.
pub const QUOTE: char = '"';

/// Splits `text` around the first `separator` lying outside a quoted span.
///
/// Returns `(None, text)` when no such separator exists. A quote that is
/// opened and never closed hides every separator after it.
pub fn split_first<'a>(text: &'a str, separator: &str, quote: char) -> (Option<&'a str>, &'a str) {
    match find_unquoted(text, separator, quote) {
        Some(pos) => (Some(&text[..pos]), &text[pos + separator.len()..]),
        None => (None, text),
    }
}

fn find_unquoted(text: &str, separator: &str, quote: char) -> Option<usize> {
    let mut cursor = 0;
    loop {
        let sep_pos = cursor + text[cursor..].find(separator)?;
        let Some(open) = text[cursor..].find(quote).map(|pos| cursor + pos) else {
            return Some(sep_pos);
        };
        if sep_pos < open {
            return Some(sep_pos);
        }
        let after_open = open + quote.len_utf8();
        let close = after_open + text[after_open..].find(quote)?;
        cursor = close + quote.len_utf8();
    }
}

/// Splits `text` on every `separator` lying outside a quoted span.
///
/// Quoted spans stay attached, quotes included, to the segment being built.
/// The returned flag is `false` when the quote count is odd; the dangling
/// quoted region then runs, unsplit, to the end of the last segment.
pub fn split_all(text: &str, separator: char, quote: char) -> (Vec<String>, bool) {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for ch in text.chars() {
        if ch == quote {
            quoted = !quoted;
            current.push(ch);
        } else if ch == separator && !quoted {
            segments.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    segments.push(current);
    (segments, !quoted)
}

//! Best-effort repair of almost-JSON produced by a language model
//!
//! Two passes run over the span between the first `{` and the last `}`:
//! a quote-aware character pass, then four structural regex repairs in a
//! fixed order (trailing comma before `}`, trailing comma before `]`,
//! missing comma in `}{`, missing comma in `][`).

use regex::Regex;
use std::sync::LazyLock;

static TRAILING_COMMA_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*\}").expect("trailing comma (object) regex"));
static TRAILING_COMMA_ARRAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*\]").expect("trailing comma (array) regex"));
static MISSING_COMMA_OBJECTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\}\s*\{").expect("missing comma (objects) regex"));
static MISSING_COMMA_ARRAYS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\]\s*\[").expect("missing comma (arrays) regex"));

/// Span from the first `{` to the last `}`, both included
pub(crate) fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Repair the brace span of `text`; `None` when there is no span
pub(crate) fn sanitize(text: &str) -> Option<String> {
    brace_span(text).map(|span| repair_structure(&repair_characters(span)))
}

/// Quote-aware character pass.
///
/// Inside strings, runs of literal newline/CR/tab become one space and escape
/// sequences are copied as pairs, so `\"` and `\\` never toggle the string
/// state. Outside strings, whitespace runs become one space.
pub(crate) fn repair_characters(span: &str) -> String {
    let mut out = String::with_capacity(span.len());
    let mut in_string = false;
    let mut chars = span.chars().peekable();

    while let Some(c) = chars.next() {
        if in_string {
            match c {
                '\\' => match chars.next() {
                    // A backslash before a raw line break is not a valid escape
                    Some('\n' | '\r' | '\t') => {
                        skip_while(&mut chars, is_string_break);
                        out.push(' ');
                    }
                    Some(escaped) => {
                        out.push('\\');
                        out.push(escaped);
                    }
                    None => out.push('\\'),
                },
                '"' => {
                    in_string = false;
                    out.push(c);
                }
                c if is_string_break(c) => {
                    skip_while(&mut chars, is_string_break);
                    out.push(' ');
                }
                _ => out.push(c),
            }
        } else if c.is_whitespace() {
            skip_while(&mut chars, char::is_whitespace);
            out.push(' ');
        } else {
            if c == '"' {
                in_string = true;
            }
            out.push(c);
        }
    }

    out
}

fn is_string_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\t')
}

fn skip_while<I, F>(chars: &mut std::iter::Peekable<I>, pred: F)
where
    I: Iterator<Item = char>,
    F: Fn(char) -> bool,
{
    while chars.next_if(|&c| pred(c)).is_some() {}
}

/// The four structural repairs, in order
pub(crate) fn repair_structure(text: &str) -> String {
    let text = TRAILING_COMMA_OBJECT.replace_all(text, "}");
    let text = TRAILING_COMMA_ARRAY.replace_all(&text, "]");
    let text = MISSING_COMMA_OBJECTS.replace_all(&text, "},{");
    let text = MISSING_COMMA_ARRAYS.replace_all(&text, "],[");
    text.into_owned()
}

/// Array literal that is the value of the member `"key"` in `text`.
///
/// Brackets and braces are matched with nesting, ignoring anything inside
/// string literals. When the array never closes (a truncated response), the
/// prefix up to the last complete element is closed with `]` instead.
pub(crate) fn collection_array(text: &str, key: &str) -> Option<String> {
    let open = collection_array_start(text, key)?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut last_element_end = None;

    // Structural characters are ASCII, so byte positions are char boundaries
    for (offset, &b) in text.as_bytes()[open..].iter().enumerate() {
        let idx = open + offset;
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'[' | b'{' => depth += 1,
            b']' | b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(text[open..=idx].to_string());
                }
                if depth == 1 {
                    last_element_end = Some(idx + 1);
                }
            }
            _ => {}
        }
    }

    last_element_end.map(|end| format!("{}]", &text[open..end]))
}

/// Position of the `[` opening the array value of member `"key"`.
///
/// Only complete string literals count as candidate keys, and a candidate
/// must be followed by `:` and then `[`. A `"key"` used as a value, or as a
/// key holding something other than an array, is passed over.
fn collection_array_start(text: &str, key: &str) -> Option<usize> {
    let mut in_string = false;
    let mut escaped = false;
    let mut string_start = 0;

    for (idx, &b) in text.as_bytes().iter().enumerate() {
        if !in_string {
            if b == b'"' {
                in_string = true;
                string_start = idx;
            }
            continue;
        }

        if escaped {
            escaped = false;
        } else if b == b'\\' {
            escaped = true;
        } else if b == b'"' {
            in_string = false;
            if &text[string_start + 1..idx] == key {
                if let Some(open) = array_after_colon(text, idx + 1) {
                    return Some(open);
                }
            }
        }
    }

    None
}

fn array_after_colon(text: &str, from: usize) -> Option<usize> {
    let value = text[from..].trim_start().strip_prefix(':')?.trim_start();
    value.starts_with('[').then(|| text.len() - value.len())
}

//! Scalar literal formatting.

use std::borrow::Cow;
use std::fmt::Write;

/// Escape a string for use between double quotes.
///
/// Backslash, quote, backspace, form feed, newline, carriage return and tab
/// get their short escapes. Anything else outside printable ASCII is written
/// as `\uXXXX`, one escape per UTF-16 code unit.
pub fn escape_string(s: &str) -> Cow<'_, str> {
    if s.chars().all(|c| matches!(c, ' '..='~') && c != '"' && c != '\\') {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\u{8}' => result.push_str("\\b"),
            '\u{c}' => result.push_str("\\f"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            ' '..='~' => result.push(c),
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    let _ = write!(result, "\\u{unit:04X}");
                }
            }
        }
    }
    Cow::Owned(result)
}

/// Format a float so that it reads back as a float.
///
/// Finite values always contain a `.` or an exponent.
pub fn format_float(value: f32) -> String {
    format!("{value:?}")
}

//! Keeps raw player input on one log line.

use std::fmt::Write;

/// Longest input preview written to the log, in characters.
pub const MAX_INPUT_PREVIEW: usize = 120;

/// Escape backslashes and control characters (`\n`, `\r`, `\t`, others as
/// `\xNN`) and cut the result at [`MAX_INPUT_PREVIEW`] characters with `…`.
pub fn escape_log(input: &str) -> String {
    let mut out = String::with_capacity(input.len().min(MAX_INPUT_PREVIEW) + 4);
    let mut chars = input.chars();
    for ch in chars.by_ref().take(MAX_INPUT_PREVIEW) {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    if chars.next().is_some() {
        out.push('…');
    }
    out
}

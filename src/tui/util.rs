//! Formatting helpers shared by the display code.

use unicode_width::UnicodeWidthChar;

/// A line of `ch` spanning `width` columns.
pub fn separator(width: usize, ch: char) -> String {
    let ch_width = ch.width().unwrap_or(1).max(1);
    std::iter::repeat_n(ch, width / ch_width).collect()
}

/// Format seconds as `H:MM:SS`, or `M:SS` under an hour.
pub fn format_timestamp(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Remove CSI and two-byte escape sequences.
pub fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'[') {
            chars.next();
            // Parameters and intermediates, then one final byte in @..~
            for next in chars.by_ref() {
                if ('@'..='~').contains(&next) {
                    break;
                }
            }
        } else {
            chars.next();
        }
    }
    out
}

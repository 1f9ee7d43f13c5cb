//! The bordered input prompt.
//!
//! Layout while the user types:
//!
//! ```text
//! ──────────────   top border
//! > typed text     prompt line, cursor after the marker
//! ──────────────   bottom border
//! ```
//!
//! Frames are built into a byte buffer with `queue!` and written with a single
//! console call.

use super::console::Console;
use super::util::separator;
use crossterm::cursor::{MoveDown, MoveToColumn, MoveUp, RestorePosition, SavePosition};
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, Write};

pub const BORDER_CHAR: char = '─';
pub const PROMPT_MARKER: &str = "> ";
/// Column where typed input starts.
const INPUT_COLUMN: u16 = 2;

/// Draw top border, prompt marker and bottom border, leaving the cursor on the
/// prompt line.
pub fn draw_prompt(console: &Console) -> io::Result<()> {
    let border = separator(console.width(), BORDER_CHAR);
    let mut buf = Vec::new();
    write!(buf, "\n{border}\n{PROMPT_MARKER}")?;
    write!(buf, "\n{border}")?;
    queue!(buf, MoveUp(1), MoveToColumn(INPUT_COLUMN))?;
    console.write_out(&buf)
}

/// Rewrite the bottom border without moving the cursor or touching typed text.
pub fn redraw_bottom_border(console: &Console) -> io::Result<()> {
    let border = separator(console.width(), BORDER_CHAR);
    let mut buf = Vec::new();
    queue!(
        buf,
        SavePosition,
        MoveDown(1),
        MoveToColumn(0),
        Print(border),
        RestorePosition
    )?;
    console.write_out(&buf)
}

/// Remove both borders once a line was submitted.
///
/// After Enter the cursor sits at column 0 of the bottom border line.
pub fn erase_borders(console: &Console) -> io::Result<()> {
    let mut buf = Vec::new();
    queue!(
        buf,
        Clear(ClearType::CurrentLine),
        MoveUp(2),
        Clear(ClearType::CurrentLine),
        MoveDown(2),
        MoveToColumn(0)
    )?;
    buf.push(b'\n');
    console.write_out(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::util::strip_ansi;

    #[test]
    fn prompt_frame_has_two_borders_and_marker() {
        let (console, out, _) = Console::capture();
        let console = console.with_width(10);
        draw_prompt(&console).unwrap();

        let text = out.contents();
        assert_eq!(strip_ansi(&text), "\n──────────\n> \n──────────");
        // Ends by moving the cursor back onto the prompt line
        assert!(text.ends_with("\x1b[1A\x1b[3G"), "got {text:?}");
    }

    #[test]
    fn redraw_restores_cursor() {
        let (console, out, _) = Console::capture();
        redraw_bottom_border(&console.with_width(4)).unwrap();

        let text = out.contents();
        assert!(text.starts_with("\x1b7"));
        assert!(text.ends_with("\x1b8"));
        assert_eq!(strip_ansi(&text), "────");
    }

    #[test]
    fn erase_writes_no_text() {
        let (console, out, _) = Console::capture();
        erase_borders(&console).unwrap();
        assert_eq!(strip_ansi(&out.contents()), "\n");
    }
}

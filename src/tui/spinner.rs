//! Spinner shown while something is in flight.
//!
//! A spinner is started and must be stopped explicitly with [`Spinner::stop`]
//! or [`Spinner::succeed`], which clear the animation line. Dropping an
//! unstopped spinner only halts the animation task.

use super::console::Console;
use crossterm::cursor::{Hide, Show};
use crossterm::queue;
use crossterm::style::{Print, Stylize};
use crossterm::terminal::{Clear, ClearType};
use std::io;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const FRAME_INTERVAL: Duration = Duration::from_millis(80);

pub struct Spinner {
    console: Console,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
    hides_cursor: bool,
}

/// Spinner that hides the cursor while it runs.
pub fn start_spinner(console: &Console, text: impl Into<String>) -> Spinner {
    Spinner::start(console.clone(), text.into(), true)
}

/// Spinner for agent calls. Leaves the cursor alone so terminal input state is
/// untouched.
pub fn start_thinking_spinner(console: &Console, text: impl Into<String>) -> Spinner {
    Spinner::start(console.clone(), text.into(), false)
}

impl Spinner {
    fn start(console: Console, text: String, hides_cursor: bool) -> Self {
        if hides_cursor {
            let mut buf = Vec::new();
            if let Err(e) = queue!(buf, Hide).and_then(|()| console.write_out(&buf)) {
                tracing::debug!(error = %e, "Failed to hide cursor for spinner");
            }
        }

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let task_console = console.clone();

        let handle = tokio::spawn(async move {
            let mut tick = tokio::time::interval(FRAME_INTERVAL);
            tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut frame = 0usize;

            loop {
                tokio::select! {
                    biased;
                    () = token.cancelled() => break,
                    _ = tick.tick() => {
                        let glyph = FRAMES[frame % FRAMES.len()];
                        let mut buf = Vec::new();
                        let drawn = queue!(
                            buf,
                            Print('\r'),
                            Clear(ClearType::CurrentLine),
                            Print(glyph.cyan()),
                            Print(' '),
                            Print(&text)
                        )
                        .and_then(|()| task_console.write_out(&buf));
                        if drawn.is_err() {
                            break;
                        }
                        frame = frame.wrapping_add(1);
                    }
                }
            }
        });

        Self {
            console,
            cancel,
            handle: Some(handle),
            hides_cursor,
        }
    }

    async fn halt(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }

    /// Stop and clear the spinner line.
    pub async fn stop(mut self) -> io::Result<()> {
        self.halt().await;
        let mut buf = Vec::new();
        queue!(buf, Print('\r'), Clear(ClearType::CurrentLine))?;
        if self.hides_cursor {
            queue!(buf, Show)?;
        }
        self.console.write_out(&buf)
    }

    /// Stop and leave a check mark with `text` in place of the spinner.
    pub async fn succeed(mut self, text: &str) -> io::Result<()> {
        self.halt().await;
        let mut buf = Vec::new();
        queue!(
            buf,
            Print('\r'),
            Clear(ClearType::CurrentLine),
            Print("✔".green()),
            Print(' '),
            Print(text),
            Print('\n')
        )?;
        if self.hides_cursor {
            queue!(buf, Show)?;
        }
        self.console.write_out(&buf)
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::util::strip_ansi;

    #[tokio::test]
    async fn animates_then_stops_silently() {
        let (console, out, _) = Console::capture();
        let spinner = start_thinking_spinner(&console, "Thinking...");
        tokio::time::sleep(Duration::from_millis(200)).await;
        spinner.stop().await.unwrap();

        let text = out.contents();
        assert!(text.contains("Thinking..."));
        assert!(FRAMES.iter().any(|f| text.contains(f)));

        let len = out.len();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(out.len(), len);
    }

    #[tokio::test]
    async fn succeed_persists_message() {
        let (console, out, _) = Console::capture();
        let spinner = start_spinner(&console, "Working");
        spinner.succeed("Done").await.unwrap();

        let text = out.contents();
        assert!(text.starts_with("\x1b[?25l"), "cursor not hidden: {text:?}");
        assert!(text.ends_with("\x1b[?25h"), "cursor not shown: {text:?}");
        assert!(strip_ansi(&text).ends_with("✔ Done\n"));
    }

    struct BrokenPipe;

    impl std::io::Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn unwritable_terminal_surfaces_on_stop() {
        let console = Console::new(BrokenPipe, BrokenPipe);
        // Hiding the cursor fails quietly; the failure is reported once stopped
        let spinner = start_spinner(&console, "Working");
        let err = spinner.stop().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}

//! Injected output handles.
//!
//! Everything the chat writes goes through a [`Console`]: a cloneable pair of
//! shared writers (output and error) plus the terminal width. Writes take the
//! writer lock for the whole call, so a frame built in one buffer never
//! interleaves with a concurrent redraw.

use crossterm::terminal;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Fallback width when the terminal size is unknown.
const DEFAULT_WIDTH: u16 = 80;

#[derive(Clone)]
pub struct Console {
    out: SharedWriter,
    err: SharedWriter,
    width: Option<u16>,
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("width", &self.width)
            .finish_non_exhaustive()
    }
}

fn lock(writer: &SharedWriter) -> MutexGuard<'_, Box<dyn Write + Send>> {
    writer.lock().unwrap_or_else(|poisoned| {
        tracing::warn!("Console lock poisoned, recovering");
        PoisonError::into_inner(poisoned)
    })
}

impl Console {
    pub fn new(out: impl Write + Send + 'static, err: impl Write + Send + 'static) -> Self {
        Self {
            out: Arc::new(Mutex::new(Box::new(out))),
            err: Arc::new(Mutex::new(Box::new(err))),
            width: None,
        }
    }

    /// Console bound to the process stdout/stderr.
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }

    /// In-memory console for headless runs and tests.
    pub fn capture() -> (Self, Capture, Capture) {
        let out = Capture::default();
        let err = Capture::default();
        let console = Self::new(out.clone(), err.clone()).with_width(DEFAULT_WIDTH);
        (console, out, err)
    }

    /// Pin the width instead of querying the terminal.
    #[must_use]
    pub fn with_width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    /// Current width in columns.
    pub fn width(&self) -> usize {
        let width = self
            .width
            .or_else(|| terminal::size().ok().map(|(w, _)| w))
            .filter(|w| *w > 0)
            .unwrap_or(DEFAULT_WIDTH);
        usize::from(width)
    }

    pub fn write_out(&self, bytes: impl AsRef<[u8]>) -> io::Result<()> {
        let mut w = lock(&self.out);
        w.write_all(bytes.as_ref())?;
        w.flush()
    }

    pub fn write_err(&self, bytes: impl AsRef<[u8]>) -> io::Result<()> {
        let mut w = lock(&self.err);
        w.write_all(bytes.as_ref())?;
        w.flush()
    }

    pub fn println(&self, line: impl AsRef<str>) -> io::Result<()> {
        self.write_out(format!("{}\n", line.as_ref()))
    }

    pub fn eprintln(&self, line: impl AsRef<str>) -> io::Result<()> {
        self.write_err(format!("{}\n", line.as_ref()))
    }
}

/// Shared in-memory writer.
#[derive(Clone, Default)]
pub struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn buf(&self) -> MutexGuard<'_, Vec<u8>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf()).into_owned()
    }

    pub fn len(&self) -> usize {
        self.buf().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf().is_empty()
    }
}

impl Write for Capture {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

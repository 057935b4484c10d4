//! Line-oriented output shared by the primary flow and event handlers

use std::fmt::Display;
use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;

type Sink = Mutex<Box<dyn Write + Send>>;

/// Action output: stdout carries results, stderr carries progress messages
///
/// Each line is written whole under a lock, so lines printed from handlers
/// never interleave.
pub struct Console {
    out: Sink,
    err: Sink,
}

impl Console {
    /// Console bound to the process stdout and stderr
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }

    pub fn new(out: impl Write + Send + 'static, err: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
            err: Mutex::new(Box::new(err)),
        }
    }

    /// In-memory console and a handle to read what was written
    #[must_use]
    pub fn captured() -> (Self, ConsoleCapture) {
        let capture = ConsoleCapture::default();
        let console = Self::new(capture.out.clone(), capture.err.clone());
        (console, capture)
    }

    /// Write one line to stdout
    pub fn println(&self, line: impl Display) -> io::Result<()> {
        write_line(&self.out, line)
    }

    /// Write one line to stderr
    pub fn eprintln(&self, line: impl Display) -> io::Result<()> {
        write_line(&self.err, line)
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console").finish_non_exhaustive()
    }
}

fn write_line(sink: &Sink, line: impl Display) -> io::Result<()> {
    let mut sink = sink.lock();
    writeln!(sink, "{line}")?;
    sink.flush()
}

/// Shared byte buffer usable as a console sink
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    /// Contents as (lossy) UTF-8
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Read side of [`Console::captured`]
#[derive(Debug, Clone, Default)]
pub struct ConsoleCapture {
    out: SharedBuffer,
    err: SharedBuffer,
}

impl ConsoleCapture {
    #[must_use]
    pub fn stdout(&self) -> String {
        self.out.contents()
    }

    #[must_use]
    pub fn stderr(&self) -> String {
        self.err.contents()
    }
}

// SPDX-License-Identifier: MIT
//
// Terminal drivers: where input comes from and output goes to.
//
// The engine never touches stdin, stdout or termios itself. It talks to a
// `Driver`: something with a size, a way to block for the next chunk of
// input, and a byte sink. `TtyDriver` is the real thing, built on the RAII
// `Terminal` handle. `HeadlessDriver` replays scripted input and records
// output in memory, which is how the engine is tested and how it can be
// embedded somewhere without a tty.
//
// Reads are single-threaded and blocking: `poll(2)` on stdin, then one
// `read(2)` of at most 64 bytes. A mouse report is well under that, so a
// chunk normally holds exactly one report or keypress.

use std::collections::VecDeque;
use std::io::{self, Write};

use crate::error::Result;
use crate::terminal::Size;

// ─── Driver ─────────────────────────────────────────────────────────────────

/// The narrow interface between the engine and a terminal.
pub trait Driver {
    /// Current size in cells.
    fn size(&self) -> Size;

    /// Number of columns.
    fn columns(&self) -> i32 {
        i32::from(self.size().cols)
    }

    /// Number of rows.
    fn rows(&self) -> i32 {
        i32::from(self.size().rows)
    }

    /// Whether (`x`, `y`) is strictly inside the addressable area.
    ///
    /// Both bounds are exclusive, so column 0, row 0, the last column and
    /// the last row are never drawn to.
    fn contains(&self, x: i32, y: i32) -> bool {
        x > 0 && x < self.columns() && y > 0 && y < self.rows()
    }

    /// Block until the next chunk of raw input. `None` means end of input.
    ///
    /// # Errors
    ///
    /// I/O failures, and [`Error::UnrecognizedEvent`](crate::Error) when
    /// the input source reports something that is neither data nor EOF.
    fn read(&mut self) -> Result<Option<Vec<u8>>>;

    /// Where rendered frames are written.
    fn writer(&mut self) -> &mut dyn Write;
}

// ─── TtyDriver ──────────────────────────────────────────────────────────────

/// Size of one raw read from stdin.
#[cfg(unix)]
const READ_CHUNK: usize = 64;

/// Driver for the process's controlling terminal.
///
/// Construction puts the terminal into UI mode; dropping the driver (or
/// the engine that owns it) restores it.
#[cfg(unix)]
pub struct TtyDriver {
    terminal: crate::terminal::Terminal,
    stdout: io::Stdout,
    buf: [u8; READ_CHUNK],
}

#[cfg(unix)]
impl TtyDriver {
    /// Take over the terminal.
    ///
    /// # Errors
    ///
    /// [`Error::NotATerminal`](crate::Error::NotATerminal) when stdin is
    /// not a tty, or an I/O error from the termios change or setup output.
    pub fn new() -> Result<Self> {
        if !crate::terminal::is_tty() {
            return Err(crate::Error::NotATerminal);
        }

        let mut terminal = crate::terminal::Terminal::new();
        terminal.enter()?;

        Ok(Self {
            terminal,
            stdout: io::stdout(),
            buf: [0; READ_CHUNK],
        })
    }
}

#[cfg(unix)]
#[allow(unsafe_code)]
impl Driver for TtyDriver {
    fn size(&self) -> Size {
        self.terminal.size()
    }

    fn read(&mut self) -> Result<Option<Vec<u8>>> {
        loop {
            let mut pfd = libc::pollfd {
                fd: libc::STDIN_FILENO,
                events: libc::POLLIN,
                revents: 0,
            };
            let ready = unsafe { libc::poll(&raw mut pfd, 1, -1) };
            if ready < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(err.into());
            }

            if pfd.revents & libc::POLLIN != 0 {
                let n = unsafe {
                    libc::read(
                        libc::STDIN_FILENO,
                        self.buf.as_mut_ptr().cast(),
                        self.buf.len(),
                    )
                };
                if n < 0 {
                    let err = io::Error::last_os_error();
                    if err.kind() == io::ErrorKind::Interrupted {
                        continue;
                    }
                    return Err(err.into());
                }
                if n == 0 {
                    return Ok(None);
                }
                #[allow(clippy::cast_sign_loss)] // n > 0 checked above.
                let chunk = self.buf[..n as usize].to_vec();
                return Ok(Some(chunk));
            }

            if pfd.revents & libc::POLLHUP != 0 {
                return Ok(None);
            }

            return Err(crate::Error::UnrecognizedEvent {
                revents: pfd.revents,
            });
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        &mut self.stdout
    }
}

// ─── HeadlessDriver ─────────────────────────────────────────────────────────

/// In-memory driver: fixed size, scripted input, recorded output.
///
/// ```
/// use tb_term::driver::{Driver, HeadlessDriver};
///
/// let mut d = HeadlessDriver::new(80, 24).with_input([b"q".to_vec()]);
/// assert_eq!(d.read().unwrap(), Some(b"q".to_vec()));
/// assert_eq!(d.read().unwrap(), None);
/// ```
#[derive(Debug, Clone)]
pub struct HeadlessDriver {
    size: Size,
    input: VecDeque<Vec<u8>>,
    output: Vec<u8>,
}

impl HeadlessDriver {
    /// A driver of `cols` × `rows` with no pending input.
    #[must_use]
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self {
            size: Size { cols, rows },
            input: VecDeque::new(),
            output: Vec::new(),
        }
    }

    /// Builder: queue input chunks, delivered one per `read`.
    #[must_use]
    pub fn with_input<I, C>(mut self, chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Vec<u8>>,
    {
        self.input.extend(chunks.into_iter().map(Into::into));
        self
    }

    /// Queue one more input chunk.
    pub fn push_input(&mut self, chunk: impl Into<Vec<u8>>) {
        self.input.push_back(chunk.into());
    }

    /// Number of chunks not yet read.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.input.len()
    }

    /// Everything written so far.
    #[must_use]
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Take everything written so far, leaving the record empty.
    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }

    /// Change the reported size.
    pub const fn resize(&mut self, cols: u16, rows: u16) {
        self.size = Size { cols, rows };
    }
}

impl Default for HeadlessDriver {
    fn default() -> Self {
        Self::new(Size::FALLBACK.cols, Size::FALLBACK.rows)
    }
}

impl Driver for HeadlessDriver {
    fn size(&self) -> Size {
        self.size
    }

    fn read(&mut self) -> Result<Option<Vec<u8>>> {
        Ok(self.input.pop_front())
    }

    fn writer(&mut self) -> &mut dyn Write {
        &mut self.output
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

// SPDX-License-Identifier: MIT
//
// The tty handle: line discipline, UI mode, restore on drop and on panic.
//
// Safety: termios, the window-size ioctl, isatty and the raw fd write in
// the panic hook are plain libc calls. Every `unsafe` block wraps exactly
// one of them.
#![allow(unsafe_code)]
//
// This module owns the terminal's raw state. Raw mode here is the light
// kind: echo and canonical line editing are switched off, everything else
// (signals, output post-processing) stays as the user had it, so Ctrl-C
// still interrupts. On top of that the terminal is switched to the
// alternate screen with mouse reporting enabled and the cursor hidden.
// Cleanup is guaranteed on drop, and a panic hook restores the terminal
// before the panic message prints.
//
// The panic hook bypasses Rust's stdout lock entirely, writing a pre-built
// restore sequence directly to fd 1. A panic inside a callback that holds
// the lock mid-frame would otherwise deadlock the hook.

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use tracing::{debug, warn};

use crate::ansi;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal size in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    /// Assumed when the size cannot be queried.
    pub const FALLBACK: Self = Self { cols: 80, rows: 24 };
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Window size of stdout, from `ioctl(TIOCGWINSZ)`.
///
/// `None` when stdout is not a tty or reports a zero dimension.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    if unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) } != 0 {
        return None;
    }
    (ws.ws_col > 0 && ws.ws_row > 0).then_some(Size {
        cols: ws.ws_col,
        rows: ws.ws_row,
    })
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Whether stdin is a tty.
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

/// Whether `$TERM` names a terminal multiplexer (screen or tmux).
///
/// Full-frame redraws flicker noticeably through a multiplexer.
#[must_use]
pub fn is_multiplexer() -> bool {
    std::env::var("TERM").is_ok_and(|term| term_is_multiplexer(&term))
}

fn term_is_multiplexer(term: &str) -> bool {
    term.starts_with("screen") || term.starts_with("tmux")
}

// ─── Panic Restore ──────────────────────────────────────────────────────────

/// Line discipline saved by the active handle, readable from the panic hook.
#[cfg(unix)]
static SAVED_TERMIOS: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Put back the saved line discipline, if any. Errors are ignored.
#[cfg(unix)]
fn restore_saved_termios() {
    let Ok(saved) = SAVED_TERMIOS.lock() else {
        return;
    };
    if let Some(termios) = saved.as_ref() {
        unsafe {
            let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, termios);
        }
    }
}

/// [`ansi::teardown`] as a constant, written by the panic hook.
#[rustfmt::skip]
const EMERGENCY_RESTORE: &[u8] = b"\
    \x1b[0m\x1b[2J\
    \x1b[?1049l\
    \x1b[?1006l\x1b[?1015l\x1b[?1003l\x1b[?1002l\x1b[?1000l\
    \x1b[?25h";

static PANIC_HOOK: Once = Once::new();

/// Chain a hook that restores the terminal ahead of the previous hook, so
/// the panic message lands on the normal screen with echo back on.
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();
            #[cfg(unix)]
            restore_saved_termios();
            previous(info);
        }));
    });
}

/// Write [`EMERGENCY_RESTORE`] straight to fd 1.
fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Owner of the tty while the UI is up.
///
/// [`enter`](Self::enter) switches echo and line buffering off and sends
/// the setup sequence; [`leave`](Self::leave), drop, or a panic undo it.
///
/// ```no_run
/// use tb_term::terminal::Terminal;
///
/// let mut term = Terminal::new();
/// term.enter()?;
/// // boxes are drawn and input is read here
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    #[cfg(unix)]
    original_termios: Option<libc::termios>,
    size: Size,
    active: bool,
}

impl Terminal {
    /// An idle handle. The size is read now, or [`Size::FALLBACK`] when
    /// stdout is not a tty.
    #[must_use]
    pub fn new() -> Self {
        let size = get_size().unwrap_or(Size::FALLBACK);

        Self {
            #[cfg(unix)]
            original_termios: None,
            size,
            active: false,
        }
    }

    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Take over the terminal. Does nothing if already active.
    ///
    /// # Errors
    ///
    /// Reading or changing termios failed, or the setup sequence could not
    /// be written.
    pub fn enter(&mut self) -> io::Result<()> {
        self.enter_with(&mut io::stdout().lock())
    }

    /// [`enter`](Self::enter), sending the setup sequence to `out`. The line
    /// discipline is put back if the sequence cannot be written.
    fn enter_with(&mut self, out: &mut impl Write) -> io::Result<()> {
        if self.active {
            return Ok(());
        }

        install_panic_hook();
        self.save_and_quiet()?;

        if let Err(err) = ansi::setup(out).and_then(|()| out.flush()) {
            if let Err(restore_err) = self.restore() {
                warn!(%restore_err, "failed to restore termios after setup error");
            }
            return Err(err);
        }

        self.active = true;
        debug!(cols = self.size.cols, rows = self.size.rows, "terminal entered");
        Ok(())
    }

    /// Hand the terminal back. Does nothing if not active.
    ///
    /// # Errors
    ///
    /// The teardown sequence could not be written, or termios could not be
    /// restored.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }

        {
            let mut out = io::stdout().lock();
            ansi::teardown(&mut out)?;
            out.flush()?;
        }
        self.restore()?;

        self.active = false;
        debug!("terminal left");
        Ok(())
    }

    // ── Line Discipline ─────────────────────────────────────────────

    /// Save the current termios, then switch off echo and canonical mode.
    #[cfg(unix)]
    fn save_and_quiet(&mut self) -> io::Result<()> {
        if !is_tty() {
            return Ok(());
        }

        let mut termios: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &raw mut termios) } != 0 {
            return Err(io::Error::last_os_error());
        }
        self.original_termios = Some(termios);
        if let Ok(mut saved) = SAVED_TERMIOS.lock() {
            *saved = Some(termios);
        }

        termios.c_lflag &= !(libc::ECHO | libc::ICANON);
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const termios) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    #[cfg(unix)]
    fn restore(&mut self) -> io::Result<()> {
        let Some(termios) = self.original_termios.take() else {
            return Ok(());
        };
        if let Ok(mut saved) = SAVED_TERMIOS.lock() {
            *saved = None;
        }
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const termios) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn save_and_quiet(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[cfg(not(unix))]
    fn restore(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.active {
            if let Err(err) = self.leave() {
                warn!(%err, "failed to restore terminal");
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

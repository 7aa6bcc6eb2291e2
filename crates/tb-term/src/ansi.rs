// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Stateless writers for the terminal commands the box engine sends. Each one
// appends its escape bytes to an `impl Write`; deciding when to send them is
// up to the engine and the terminal handle.
//
// Cursor positions are passed through exactly as given. Box geometry is
// already expressed in the terminal's 1-based cell coordinates, so there is
// no conversion here.
//
// SGR styling itself lives in `tb_sgr`; boxes draw pre-styled bytes.
//
// Errors only come from the writer. Writes into `OutputBuffer` cannot fail.
use std::io::{self, Write};

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to column `col`, row `row` (CUP, 1-based).
#[inline]
pub fn cursor_to(w: &mut impl Write, col: i32, row: i32) -> io::Result<()> {
    write!(w, "\x1b[{row};{col}H")
}

/// `ESC [ ? 25 l`
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// `ESC [ ? 25 h`
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// SGR 0: drop every color and attribute.
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

/// Reset attributes, then wipe the screen. Every full frame starts with this.
#[inline]
pub fn reset_and_clear(w: &mut impl Write) -> io::Result<()> {
    reset(w)?;
    clear_screen(w)
}

// ─── Alternate Screen ───────────────────────────────────────────────────────

/// Switch to the alternate screen (mode 1049). The shell's screen is saved
/// and comes back on [`exit_alt_screen`].
#[inline]
pub fn enter_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049h")
}

/// Back to the main screen.
#[inline]
pub fn exit_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049l")
}

// ─── Mouse Protocol ─────────────────────────────────────────────────────────

/// DEC private modes switched on for mouse reporting, in the order sent.
///
/// 1000 clicks, 1002 drags, 1003 all motion, 1015 urxvt extended
/// coordinates, 1006 SGR report format. Terminals that know 1006 prefer it
/// over 1015, so reports arrive as `ESC [ < b ; x ; y M`.
pub const MOUSE_MODES: [u16; 5] = [1000, 1002, 1003, 1015, 1006];

/// Enable all-motion mouse reporting in SGR format.
pub fn enable_mouse(w: &mut impl Write) -> io::Result<()> {
    for mode in MOUSE_MODES {
        write!(w, "\x1b[?{mode}h")?;
    }
    Ok(())
}

/// Disable all mouse tracking, in reverse order.
pub fn disable_mouse(w: &mut impl Write) -> io::Result<()> {
    for mode in MOUSE_MODES.iter().rev() {
        write!(w, "\x1b[?{mode}l")?;
    }
    Ok(())
}

// ─── Setup / Teardown ───────────────────────────────────────────────────────

/// Everything sent when the engine takes over the terminal.
///
/// Alternate screen, SGR reset, clear, mouse reporting, hidden cursor.
pub fn setup(w: &mut impl Write) -> io::Result<()> {
    enter_alt_screen(w)?;
    reset_and_clear(w)?;
    enable_mouse(w)?;
    cursor_hide(w)
}

/// Everything sent when the engine hands the terminal back.
///
/// The alternate screen is left before mouse reporting is switched off, so
/// the restored shell content never sees a stray report.
pub fn teardown(w: &mut impl Write) -> io::Result<()> {
    reset_and_clear(w)?;
    exit_alt_screen(w)?;
    disable_mouse(w)?;
    cursor_show(w)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

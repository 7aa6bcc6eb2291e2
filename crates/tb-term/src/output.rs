// SPDX-License-Identifier: MIT
//
// Output buffering.
//
// OutputBuffer accumulates every byte of a frame in memory so the whole
// frame reaches the terminal in a single write. A full redraw of a screen
// full of boxes is one reset, one clear, and a cursor move per visible box
// line; sending those piecemeal makes the terminal paint half-finished
// frames.
//
// A single-box redraw uses the same buffer, flushed right away.

use std::io::{self, Write};

use crate::ansi;

// ─── OutputBuffer ────────────────────────────────────────────────────────────

/// Pending terminal bytes for one frame, sent with a single write.
pub struct OutputBuffer {
    buf: Vec<u8>,
}

const DEFAULT_CAPACITY: usize = 16_384;

impl OutputBuffer {
    /// An empty buffer, pre-sized for a typical frame.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Bytes queued so far.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Position the cursor at (`col`, `row`) and write `line` there.
    pub fn put_line(&mut self, col: i32, row: i32, line: &[u8]) {
        // Writing into a Vec cannot fail.
        let _ = ansi::cursor_to(&mut self.buf, col, row);
        self.buf.extend_from_slice(line);
    }

    /// Drop queued bytes. Capacity is kept.
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Write accumulated output to `w`, flush it, and clear the buffer.
    ///
    /// An empty buffer writes nothing and does not flush.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails. The buffer is kept so the
    /// caller may retry.
    pub fn flush_to(&mut self, w: &mut dyn Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // No-op. Real flushing goes through flush_to().
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

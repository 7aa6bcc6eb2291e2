// SPDX-License-Identifier: MIT
//
// Errors surfaced by the driver and the engine.
//
// Drawing problems are not errors: malformed escapes are absorbed by the
// decoder and lines outside the terminal are clipped. What remains is I/O
// failure and a driver that reports something the engine cannot act on.

/// Errors that can occur while driving the terminal.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// `poll(2)` woke up with an event that is neither readable data nor
    /// a hangup.
    #[error("unrecognized poll event on stdin (revents = {revents:#06x})")]
    UnrecognizedEvent { revents: i16 },

    #[error("stdin is not a terminal")]
    NotATerminal,
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

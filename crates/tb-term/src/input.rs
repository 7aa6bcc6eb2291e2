// SPDX-License-Identifier: MIT
//
// Terminal input decoding.
//
// The engine asks for all-motion SGR mouse reporting, so a mouse action
// arrives as `ESC [ < b ; x ; y M` (or `m` on release). Only three report
// families matter to boxes, told apart by the first digit of `b`:
//
//   0…   left button press/release  → click
//   3…   motion (32 = with left button held) → hover
//   6…   wheel (64 up, 65 down)      → scroll
//
// Everything else in a chunk, including other mouse buttons, is left for
// the key handlers, which match raw byte prefixes.
//
// Number parsing is done directly on `&[u8]` with saturating arithmetic,
// so a malformed report can produce odd coordinates but never a panic.

/// Introducer of an SGR mouse report.
pub const SGR_MOUSE_PREFIX: &[u8] = b"\x1b[<";

// ─── Report Types ───────────────────────────────────────────────────────────

/// Direction of a wheel notch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wheel {
    /// Code 64.
    Up,
    /// Code 65.
    Down,
}

/// A mouse report the engine acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseReport {
    /// Left button changed state. Release reports carry coordinates too, but
    /// only presses are delivered to boxes.
    Button { pressed: bool, x: i32, y: i32 },
    /// Pointer moved; `dragging` is set when the left button is held.
    Motion { dragging: bool, x: i32, y: i32 },
    /// Wheel notch.
    Wheel(Wheel),
}

// ─── Parsing ────────────────────────────────────────────────────────────────

/// Decode the SGR mouse report at the start of `raw`.
///
/// Returns `None` when `raw` is not a report of one of the three families,
/// including wheel reports with a code other than 64 or 65. Coordinates
/// that are missing read as 0.
///
/// ```
/// use tb_term::input::{parse_mouse, MouseReport};
///
/// assert_eq!(
///     parse_mouse(b"\x1b[<0;12;7M"),
///     Some(MouseReport::Button { pressed: true, x: 12, y: 7 }),
/// );
/// assert_eq!(parse_mouse(b"q"), None);
/// ```
#[must_use]
pub fn parse_mouse(raw: &[u8]) -> Option<MouseReport> {
    if raw.len() < 4 || !raw.starts_with(SGR_MOUSE_PREFIX) {
        return None;
    }

    let mut fields = raw[SGR_MOUSE_PREFIX.len()..].split(|b| *b == b';');
    let code = fields.next().unwrap_or_default();
    let (x, _) = parse_u16_from(fields.next().unwrap_or_default());
    let (y, _) = parse_u16_from(fields.next().unwrap_or_default());
    let (x, y) = (i32::from(x), i32::from(y));

    match *code.first()? {
        b'0' => Some(MouseReport::Button {
            pressed: terminator(raw) == Some(b'M'),
            x,
            y,
        }),
        b'3' => Some(MouseReport::Motion {
            dragging: code == b"32",
            x,
            y,
        }),
        b'6' => match code {
            b"64" => Some(MouseReport::Wheel(Wheel::Up)),
            b"65" => Some(MouseReport::Wheel(Wheel::Down)),
            _ => None,
        },
        _ => None,
    }
}

/// The first `M` or `m` after the introducer.
fn terminator(raw: &[u8]) -> Option<u8> {
    raw[SGR_MOUSE_PREFIX.len()..]
        .iter()
        .copied()
        .find(|b| *b == b'M' || *b == b'm')
}

/// Parse leading ASCII digits as a saturating `u16`.
///
/// Returns the value and the remaining bytes after the digits.
fn parse_u16_from(buf: &[u8]) -> (u16, &[u8]) {
    let mut val: u16 = 0;
    let mut pos = 0;
    while pos < buf.len() && buf[pos].is_ascii_digit() {
        val = val
            .saturating_mul(10)
            .saturating_add(u16::from(buf[pos] - b'0'));
        pos += 1;
    }
    (val, &buf[pos..])
}

// ─── Tests ───────────────────────────────────────────────────────────────────

// SPDX-License-Identifier: MIT
//
// SGR encoder: styled runs back into escape-laden bytes.
//
// Every node is compared with the node before it and only the parameters
// whose part of the style changed are written. The very first node has no
// predecessor, so the terminal's state is treated as unknown and the style
// is stated in full. A node whose style equals its predecessor's gets no
// escape at all; an empty `ESC[m` would reset the terminal instead of
// being a no-op.

use std::io::{self, Write};

use crate::style::Style;
use crate::text::StyledText;

/// The escape sequence moving the terminal from `prev` to `style`.
///
/// Empty when nothing differs.
///
/// ```
/// use tb_sgr::{sgr, Color, Style};
///
/// let prev = Style::default();
/// let next = prev.fg(Color::Palette(1));
/// assert_eq!(sgr(&next, Some(&prev)), b"\x1b[31m");
/// assert!(sgr(&prev, Some(&prev)).is_empty());
/// ```
#[must_use]
pub fn sgr(style: &Style, prev: Option<&Style>) -> Vec<u8> {
    let mut out = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_sgr(&mut out, style, prev);
    out
}

/// Write the escape sequence moving the terminal from `prev` to `style`.
pub fn write_sgr(w: &mut impl Write, style: &Style, prev: Option<&Style>) -> io::Result<()> {
    let params = style.diff_params(prev);
    if params.is_empty() {
        return Ok(());
    }

    w.write_all(b"\x1b[")?;
    for (i, p) in params.iter().enumerate() {
        if i > 0 {
            w.write_all(b";")?;
        }
        write!(w, "{p}")?;
    }
    w.write_all(b"m")
}

/// Encode a whole styled text with minimal escapes.
#[must_use]
pub fn encode(text: &StyledText) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.visible_len() + 8 * text.len());
    let _ = write_encoded(&mut out, text);
    out
}

/// Streaming form of [`encode`].
pub fn write_encoded(w: &mut impl Write, text: &StyledText) -> io::Result<()> {
    let mut prev: Option<&Style> = None;
    for node in text {
        write_sgr(w, &node.style, prev)?;
        w.write_all(&node.text)?;
        prev = Some(&node.style);
    }
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

// SPDX-License-Identifier: MIT
//
// Color: the four ways an SGR sequence can name a color.
//
// Terminals grew color support in layers: the original 8-color palette
// (30–37 / 40–47), the aixterm "bright" palette (90–97 / 100–107), the
// xterm 256-color cube (38;5;N) and finally 24-bit truecolor (38;2;R;G;B).
// We keep the layer a color came from instead of normalizing everything to
// RGB, so a decoded string re-encodes with the same codes it arrived with.
//
// Foreground and background share the representation; only the SGR base
// code differs, which is why the parameter writers take a `Layer`.

use std::fmt;

// ─── Color ───────────────────────────────────────────────────────────────────

/// A foreground or background color as named by an SGR sequence.
///
/// Two colors are equal iff both the variant and the value match:
/// `Palette(1)` (red) is not equal to `Ansi256(1)` even though most
/// terminals render them identically.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// Standard 8-color palette, index 0–7 (SGR 30–37 / 40–47).
    Palette(u8),
    /// Bright 8-color palette, index 0–7 (SGR 90–97 / 100–107).
    Bright(u8),
    /// xterm 256-color palette index (SGR 38;5;N / 48;5;N).
    Ansi256(u8),
    /// 24-bit truecolor (SGR 38;2;R;G;B / 48;2;R;G;B).
    Rgb(u8, u8, u8),
}

/// Foreground after an SGR 0 reset: palette white.
pub const DEFAULT_FG: Color = Color::Palette(7);

/// Background after an SGR 0 reset: palette black.
pub const DEFAULT_BG: Color = Color::Palette(0);

/// Which half of the cell a color applies to.
///
/// Selects the SGR base codes: 30/90/38 for the foreground,
/// 40/100/48 for the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Foreground,
    Background,
}

impl Layer {
    /// Base code of the standard palette (30 or 40).
    const fn palette_base(self) -> u16 {
        match self {
            Self::Foreground => 30,
            Self::Background => 40,
        }
    }

    /// Base code of the bright palette (90 or 100).
    const fn bright_base(self) -> u16 {
        match self {
            Self::Foreground => 90,
            Self::Background => 100,
        }
    }

    /// Extended-color introducer (38 or 48).
    pub(crate) const fn extended(self) -> u16 {
        match self {
            Self::Foreground => 38,
            Self::Background => 48,
        }
    }
}

impl Color {
    /// Append the SGR parameters selecting this color to `out`.
    ///
    /// Palette indices are taken modulo 8 so an out-of-range value can
    /// never spill into a neighbouring code range (37 + 1 is 38, the
    /// extended-color introducer).
    pub fn push_params(self, layer: Layer, out: &mut Vec<u16>) {
        match self {
            Self::Palette(i) => out.push(layer.palette_base() + u16::from(i & 7)),
            Self::Bright(i) => out.push(layer.bright_base() + u16::from(i & 7)),
            Self::Ansi256(n) => out.extend([layer.extended(), 5, u16::from(n)]),
            Self::Rgb(r, g, b) => out.extend([
                layer.extended(),
                2,
                u16::from(r),
                u16::from(g),
                u16::from(b),
            ]),
        }
    }

    /// The SGR parameters for this color as a standalone list.
    #[must_use]
    pub fn params(self, layer: Layer) -> Vec<u16> {
        let mut out = Vec::with_capacity(5);
        self.push_params(layer, &mut out);
        out
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Palette(i) => write!(f, "Palette({i})"),
            Self::Bright(i) => write!(f, "Bright({i})"),
            Self::Ansi256(n) => write!(f, "Ansi256({n})"),
            Self::Rgb(r, g, b) => write!(f, "Rgb(#{r:02x}{g:02x}{b:02x})"),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

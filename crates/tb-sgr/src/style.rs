// SPDX-License-Identifier: MIT
//
// Style: the resolved graphics state of a run of text.
//
// A `Style` is what a terminal would be "holding" after processing every
// SGR sequence up to some point: a foreground, a background, and eight
// attribute bits. It is a plain `Copy` value. The decoder produces one per
// node, the encoder compares neighbouring ones to decide which parameters
// it actually has to emit.

use crate::color::{Color, DEFAULT_BG, DEFAULT_FG, Layer};

// ─── Text Attributes ─────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Text attributes as an 8-bit mask.
    ///
    /// Bit `n` is switched on by SGR code `n + 1`, so the mask covers codes
    /// 1 through 8. Strikethrough (SGR 9) would need a ninth bit and is not
    /// representable.
    ///
    /// ```
    /// use tb_sgr::style::Attr;
    ///
    /// let a = Attr::BOLD | Attr::UNDERLINE;
    /// assert_eq!(a.bits(), 0b0000_1001);
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        /// SGR 1: increased intensity.
        const BOLD        = 1 << 0;
        /// SGR 2: decreased intensity (faint).
        const DIM         = 1 << 1;
        /// SGR 3: italic.
        const ITALIC      = 1 << 2;
        /// SGR 4: underline.
        const UNDERLINE   = 1 << 3;
        /// SGR 5: slow blink.
        const BLINK       = 1 << 4;
        /// SGR 6: rapid blink. Rarely supported.
        const RAPID_BLINK = 1 << 5;
        /// SGR 7: swap foreground and background.
        const REVERSE     = 1 << 6;
        /// SGR 8: concealed text.
        const CONCEAL     = 1 << 7;
    }
}

/// SGR code that switches attribute bit `bit` on.
#[inline]
#[must_use]
pub const fn enable_code(bit: u8) -> u16 {
    bit as u16 + 1
}

/// SGR code that switches attribute bit `bit` off.
///
/// The general rule is `bit + 21`, except for bold: 21 means "double
/// underline" on most terminals, so bold is switched off with 22 (normal
/// intensity), the same code that clears dim.
#[inline]
#[must_use]
pub const fn disable_code(bit: u8) -> u16 {
    if bit == 0 { 22 } else { bit as u16 + 21 }
}

impl Attr {
    /// Apply an on/off attribute code (1–8, 22–28) to this mask.
    ///
    /// Returns `false` when `code` is not an attribute code at all, so
    /// the caller can fall through to its other tables.
    pub fn apply_code(&mut self, code: u16) -> bool {
        match code {
            1..=8 => self.insert(Self::from_bits_retain(1 << (code - 1))),
            22 => self.remove(Self::BOLD | Self::DIM),
            23 => self.remove(Self::ITALIC),
            24 => self.remove(Self::UNDERLINE),
            25 => self.remove(Self::BLINK | Self::RAPID_BLINK),
            26 => self.remove(Self::RAPID_BLINK),
            27 => self.remove(Self::REVERSE),
            28 => self.remove(Self::CONCEAL),
            _ => return false,
        }
        true
    }

    /// SGR codes that move a terminal from `prev` to `self`.
    ///
    /// With no `prev` every bit is stated explicitly. Disable codes come
    /// first and duplicates are dropped (bits 0 and 1 share 22). Some
    /// disable codes clear more than one bit, so any bit they knock out
    /// that `self` still wants is switched back on afterwards.
    #[must_use]
    pub fn transition(self, prev: Option<Self>) -> Vec<u16> {
        let off_bits = prev.map_or(!self, |p| p - self);
        let mut state = prev.unwrap_or_else(Self::all);
        let mut codes = Vec::new();

        for bit in 0..8u8 {
            if !off_bits.contains(Self::from_bits_retain(1 << bit)) {
                continue;
            }
            let code = disable_code(bit);
            if !codes.contains(&code) {
                codes.push(code);
                state.apply_code(code);
            }
        }

        let on_bits = if prev.is_some() { self - state } else { self };
        for bit in 0..8u8 {
            if on_bits.contains(Self::from_bits_retain(1 << bit)) {
                codes.push(enable_code(bit));
            }
        }

        codes
    }
}

// ─── Style ───────────────────────────────────────────────────────────────────

/// Resolved foreground, background and attributes of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub attrs: Attr,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fg: DEFAULT_FG,
            bg: DEFAULT_BG,
            attrs: Attr::empty(),
        }
    }
}

impl Style {
    /// A style with the given colors and no attributes.
    #[must_use]
    pub const fn new(fg: Color, bg: Color) -> Self {
        Self {
            fg,
            bg,
            attrs: Attr::empty(),
        }
    }

    /// Builder: replace the foreground.
    #[must_use]
    pub const fn fg(mut self, fg: Color) -> Self {
        self.fg = fg;
        self
    }

    /// Builder: replace the background.
    #[must_use]
    pub const fn bg(mut self, bg: Color) -> Self {
        self.bg = bg;
        self
    }

    /// Builder: add attributes.
    #[must_use]
    pub fn with(mut self, attrs: Attr) -> Self {
        self.attrs |= attrs;
        self
    }

    /// The SGR parameters needed to go from `prev` to `self`.
    ///
    /// Foreground, background and attributes are compared independently;
    /// a part equal to the one in `prev` contributes nothing. `None`
    /// stands for an unknown terminal state, so everything is emitted.
    #[must_use]
    pub fn diff_params(&self, prev: Option<&Self>) -> Vec<u16> {
        let mut params = Vec::new();

        if prev.is_none_or(|p| p.fg != self.fg) {
            self.fg.push_params(Layer::Foreground, &mut params);
        }
        if prev.is_none_or(|p| p.bg != self.bg) {
            self.bg.push_params(Layer::Background, &mut params);
        }
        if prev.is_none_or(|p| p.attrs != self.attrs) {
            params.extend(self.attrs.transition(prev.map(|p| p.attrs)));
        }

        params
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

// SPDX-License-Identifier: MIT
//
// SGR decoder: escape-laden bytes in, styled runs out.
//
// The decoder walks the input once. Plain bytes accumulate into the current
// run; every ESC closes that run and opens a new node whose style is the
// context's style after trying to parse the escape. Parsing is strict and
// all-or-nothing: a sequence that is truncated, has a stray byte, or asks
// for an extended color without enough operands is discarded whole and the
// context keeps the style it had before.
//
// The context is an explicit value. `ParserContext::decode` continues from
// whatever style a previous call left behind, which is what a caller wants
// when feeding consecutive pieces of one stream. The free `decode` starts
// from a fresh default context, which is what everybody else wants.
//
// Parameter numbers are parsed straight off the byte slice with saturating
// arithmetic, so absurdly long digit runs cannot overflow.

use tracing::trace;

use crate::color::{Color, DEFAULT_BG, DEFAULT_FG};
use crate::style::Style;
use crate::text::{Node, StyledText};

const ESC: u8 = 0x1b;

// ─── ParserContext ───────────────────────────────────────────────────────────

/// The "current style" the decoder starts from and updates.
///
/// ```
/// use tb_sgr::{Color, ParserContext};
///
/// let mut ctx = ParserContext::new();
/// let _ = ctx.decode(b"\x1b[32mgreen");
/// // A later chunk of the same stream continues in green.
/// let more = ctx.decode(b" still green");
/// assert_eq!(more.nodes()[0].style.fg, Color::Palette(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParserContext {
    style: Style,
}

impl ParserContext {
    /// A context holding the default style.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A context starting from an arbitrary style.
    #[must_use]
    pub const fn with_style(style: Style) -> Self {
        Self { style }
    }

    /// The style the next decoded byte would get.
    #[inline]
    #[must_use]
    pub const fn style(&self) -> Style {
        self.style
    }

    /// Forget everything and go back to the default style.
    pub fn reset(&mut self) {
        self.style = Style::default();
    }

    /// Decode `input`, starting from and updating this context.
    #[must_use]
    pub fn decode(&mut self, input: &[u8]) -> StyledText {
        let mut out = StyledText::new();
        let mut current = Node::empty(self.style);
        let mut start = 0;
        let mut pos = 0;

        while pos < input.len() {
            if input[pos] != ESC {
                pos += 1;
                continue;
            }

            if pos > start {
                current.text.extend_from_slice(&input[start..pos]);
            }
            out.push(std::mem::replace(&mut current, Node::empty(self.style)));

            match parse_sgr(&input[pos..], self.style) {
                Ok((style, consumed)) => {
                    self.style = style;
                    current.style = style;
                    pos += consumed;
                }
                Err(skip) => {
                    trace!(
                        at = pos,
                        skipped = skip,
                        "discarding malformed escape sequence"
                    );
                    pos += skip;
                }
            }
            start = pos;
        }

        if pos > start {
            current.text.extend_from_slice(&input[start..pos]);
        }
        out.push(current);
        out
    }
}

/// Decode `input` with a fresh default context.
///
/// Nothing carries over between calls; use [`ParserContext::decode`] to
/// continue a stream.
#[must_use]
pub fn decode(input: &[u8]) -> StyledText {
    ParserContext::new().decode(input)
}

// ─── Escape Parsing ──────────────────────────────────────────────────────────

/// Parse one SGR sequence at the start of `buf` (which begins with ESC).
///
/// On success returns the new style and the number of bytes consumed.
/// On failure returns how many bytes to skip: always at least one, and
/// never more than the malformed sequence itself.
fn parse_sgr(buf: &[u8], base: Style) -> Result<(Style, usize), usize> {
    debug_assert_eq!(buf.first(), Some(&ESC));

    if buf.get(1) != Some(&b'[') {
        return Err(1);
    }

    let mut end = 2;
    loop {
        match buf.get(end) {
            Some(b'm') => break,
            Some(b) if b.is_ascii_digit() || *b == b';' || *b == b',' => end += 1,
            // Some other CSI final byte: a complete, non-SGR sequence.
            Some(0x40..=0x7e) => return Err(end + 1),
            // Anything else cannot belong to the sequence; leave it be.
            Some(_) => return Err(end),
            None => return Err(end),
        }
    }

    let params = split_params(&buf[2..end]);
    apply_params(&params, base).map_or(Err(end + 1), |style| Ok((style, end + 1)))
}

/// Split a raw parameter string on `;` and `,`. Empty fields read as 0.
fn split_params(raw: &[u8]) -> Vec<u16> {
    raw.split(|b| *b == b';' || *b == b',')
        .map(parse_u16)
        .collect()
}

/// Parse a run of ASCII digits, saturating at `u16::MAX`.
fn parse_u16(digits: &[u8]) -> u16 {
    digits.iter().fold(0u16, |acc, d| {
        acc.saturating_mul(10).saturating_add(u16::from(d - b'0'))
    })
}

/// Apply a parameter list to `base`. `None` means the list is malformed.
fn apply_params(params: &[u16], base: Style) -> Option<Style> {
    let mut style = base;
    let mut i = 0;

    while i < params.len() {
        let code = params[i];
        i += 1;

        match code {
            0 => style = Style::default(),
            30..=37 => style.fg = Color::Palette(low_byte(code - 30)),
            40..=47 => style.bg = Color::Palette(low_byte(code - 40)),
            90..=97 => style.fg = Color::Bright(low_byte(code - 90)),
            100..=107 => style.bg = Color::Bright(low_byte(code - 100)),
            39 => style.fg = DEFAULT_FG,
            49 => style.bg = DEFAULT_BG,
            38 | 48 => {
                let (color, used) = extended_color(&params[i..])?;
                i += used;
                if code == 38 {
                    style.fg = color;
                } else {
                    style.bg = color;
                }
            }
            _ => {
                if !style.attrs.apply_code(code) {
                    trace!(code, "ignoring unsupported SGR parameter");
                }
            }
        }
    }

    Some(style)
}

/// Decode the operands following 38/48: `5;N` or `2;R;G;B`.
///
/// Returns the color and how many parameters it used.
fn extended_color(rest: &[u16]) -> Option<(Color, usize)> {
    match rest {
        [5, n, ..] => Some((Color::Ansi256(checked_byte(*n)?), 2)),
        [2, r, g, b, ..] => Some((
            Color::Rgb(checked_byte(*r)?, checked_byte(*g)?, checked_byte(*b)?),
            4,
        )),
        _ => None,
    }
}

fn checked_byte(v: u16) -> Option<u8> {
    u8::try_from(v).ok()
}

/// Narrow a value already known to be in `0..8`.
#[allow(clippy::cast_possible_truncation)]
const fn low_byte(v: u16) -> u8 {
    v as u8
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Attr;
    use pretty_assertions::assert_eq;

    fn runs(t: &StyledText) -> Vec<(String, Style)> {
        t.iter()
            .map(|n| (n.text_lossy().into_owned(), n.style))
            .collect()
    }

    fn fg(c: Color) -> Style {
        Style::default().fg(c)
    }

    // ── Plain text ──────────────────────────────────────────────────────

    #[test]
    fn empty_input_is_one_empty_placeholder() {
        assert_eq!(runs(&decode(b"")), vec![(String::new(), Style::default())]);
    }

    #[test]
    fn plain_text_lands_in_placeholder() {
        assert_eq!(
            runs(&decode(b"hello")),
            vec![("hello".to_string(), Style::default())]
        );
    }

    // ── Basic sequences ─────────────────────────────────────────────────

    #[test]
    fn red_then_reset() {
        let t = decode(b"\x1b[31mHi\x1b[0m!");
        assert_eq!(
            runs(&t),
            vec![
                (String::new(), Style::default()),
                ("Hi".to_string(), fg(Color::Palette(1))),
                ("!".to_string(), Style::default()),
            ]
        );
    }

    #[test]
    fn text_before_first_escape_keeps_baseline() {
        let t = decode(b"a\x1b[1mb");
        assert_eq!(
            runs(&t),
            vec![
                ("a".to_string(), Style::default()),
                ("b".to_string(), Style::default().with(Attr::BOLD)),
            ]
        );
    }

    #[test]
    fn consecutive_escapes_leave_empty_carrier() {
        let t = decode(b"\x1b[31m\x1b[1mX");
        assert_eq!(
            runs(&t),
            vec![
                (String::new(), Style::default()),
                (String::new(), fg(Color::Palette(1))),
                ("X".to_string(), fg(Color::Palette(1)).with(Attr::BOLD)),
            ]
        );
    }

    #[test]
    fn multiple_params_in_one_sequence() {
        let t = decode(b"\x1b[1;4;33;44mx");
        let style = t.nodes()[1].style;
        assert_eq!(style.fg, Color::Palette(3));
        assert_eq!(style.bg, Color::Palette(4));
        assert_eq!(style.attrs, Attr::BOLD | Attr::UNDERLINE);
    }

    #[test]
    fn comma_separator_is_accepted() {
        let t = decode(b"\x1b[1,31mx");
        assert_eq!(t.nodes()[1].style, fg(Color::Palette(1)).with(Attr::BOLD));
    }

    #[test]
    fn empty_parameter_list_resets() {
        let mut ctx = ParserContext::with_style(fg(Color::Palette(2)));
        let t = ctx.decode(b"\x1b[mx");
        assert_eq!(t.nodes()[1].style, Style::default());
    }

    #[test]
    fn bright_palettes() {
        let t = decode(b"\x1b[91;102mx");
        assert_eq!(t.nodes()[1].style.fg, Color::Bright(1));
        assert_eq!(t.nodes()[1].style.bg, Color::Bright(2));
    }

    #[test]
    fn all_attribute_codes() {
        let t = decode(b"\x1b[1;2;3;4;5;6;7;8mx");
        assert_eq!(t.nodes()[1].style.attrs, Attr::all());
    }

    #[test]
    fn default_color_codes() {
        let mut ctx = ParserContext::with_style(Style::new(Color::Bright(3), Color::Bright(4)));
        let t = ctx.decode(b"\x1b[39;49mx");
        assert_eq!(t.nodes()[1].style, Style::default());
    }

    // ── Extended colors ─────────────────────────────────────────────────

    #[test]
    fn palette_256() {
        let t = decode(b"\x1b[38;5;125mx\x1b[48;5;0my");
        assert_eq!(t.nodes()[1].style.fg, Color::Ansi256(125));
        assert_eq!(t.nodes()[2].style.bg, Color::Ansi256(0));
    }

    #[test]
    fn truecolor() {
        let t = decode(b"\x1b[38;2;255;128;0;48;2;1;2;3mx");
        assert_eq!(t.nodes()[1].style.fg, Color::Rgb(255, 128, 0));
        assert_eq!(t.nodes()[1].style.bg, Color::Rgb(1, 2, 3));
    }

    #[test]
    fn extended_color_followed_by_more_params() {
        let t = decode(b"\x1b[38;5;10;1mx");
        assert_eq!(
            t.nodes()[1].style,
            fg(Color::Ansi256(10)).with(Attr::BOLD)
        );
    }

    // ── Ignored parameters ──────────────────────────────────────────────

    #[test]
    fn unknown_code_does_not_abort_sequence() {
        let t = decode(b"\x1b[53;31mx");
        assert_eq!(t.nodes()[1].style, fg(Color::Palette(1)));
    }

    #[test]
    fn strikethrough_is_ignored() {
        let t = decode(b"\x1b[9mx");
        assert_eq!(t.nodes()[1].style, Style::default());
    }

    // ── Malformed sequences ─────────────────────────────────────────────

    #[test]
    fn truncated_256_color_leaves_context_untouched() {
        let before = Style::default().bg(Color::Palette(5)).with(Attr::ITALIC);
        let mut ctx = ParserContext::with_style(before);
        let t = ctx.decode(b"\x1b[38;5mtext");
        assert_eq!(ctx.style(), before);
        assert_eq!(
            runs(&t),
            vec![(String::new(), before), ("text".to_string(), before)]
        );
    }

    #[test]
    fn truncated_truecolor_is_discarded() {
        let t = decode(b"\x1b[1;48;2;10;20mx");
        assert_eq!(t.nodes()[1].style, Style::default());
        assert_eq!(t.visible_text(), b"x");
    }

    #[test]
    fn out_of_range_256_index_is_discarded() {
        let t = decode(b"\x1b[38;5;256mx");
        assert_eq!(t.nodes()[1].style, Style::default());
    }

    #[test]
    fn out_of_range_truecolor_component_is_discarded() {
        let t = decode(b"\x1b[38;2;1;300;3mx");
        assert_eq!(t.nodes()[1].style, Style::default());
    }

    #[test]
    fn unknown_extended_mode_is_discarded() {
        let t = decode(b"\x1b[31;38;7;1mx");
        assert_eq!(t.nodes()[1].style, Style::default());
    }

    #[test]
    fn extended_introducer_at_end_is_discarded() {
        let t = decode(b"\x1b[1;38mx");
        assert_eq!(t.nodes()[1].style, Style::default());
    }

    #[test]
    fn lone_escape_is_dropped() {
        let t = decode(b"a\x1bb");
        assert_eq!(t.visible_text(), b"ab");
    }

    #[test]
    fn escape_at_end_of_input() {
        let t = decode(b"abc\x1b");
        assert_eq!(t.visible_text(), b"abc");
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn unterminated_sequence_is_consumed() {
        let t = decode(b"x\x1b[31;4");
        assert_eq!(t.visible_text(), b"x");
        assert!(t.iter().all(|n| n.style == Style::default()));
    }

    #[test]
    fn non_sgr_csi_disappears() {
        let t = decode(b"\x1b[2J\x1b[1;1Hhome");
        assert_eq!(t.visible_text(), b"home");
        assert!(t.iter().all(|n| n.style == Style::default()));
    }

    #[test]
    fn stray_byte_ends_sequence_and_stays_visible() {
        let t = decode(b"\x1b[31 red");
        assert_eq!(t.visible_text(), b" red");
        assert_eq!(t.nodes()[1].style, Style::default());
    }

    #[test]
    fn malformed_followed_by_valid() {
        let t = decode(b"\x1b[38;5m\x1b[32mok");
        assert_eq!(t.visible_text(), b"ok");
        assert_eq!(t.nodes().last().unwrap().style, fg(Color::Palette(2)));
    }

    #[test]
    fn huge_numbers_saturate() {
        let t = decode(b"\x1b[99999999999999999999mx");
        assert_eq!(t.nodes()[1].style, Style::default());
        assert_eq!(t.visible_text(), b"x");
    }

    // ── Context continuity ──────────────────────────────────────────────

    #[test]
    fn context_persists_across_calls() {
        let mut ctx = ParserContext::new();
        let _ = ctx.decode(b"\x1b[35;1mfirst");
        let t = ctx.decode(b"second");
        assert_eq!(
            t.nodes()[0].style,
            fg(Color::Palette(5)).with(Attr::BOLD)
        );
    }

    #[test]
    fn free_decode_is_isolated() {
        let _ = decode(b"\x1b[35mpurple");
        let t = decode(b"plain");
        assert_eq!(t.nodes()[0].style, Style::default());
    }

    #[test]
    fn reset_returns_to_default() {
        let mut ctx = ParserContext::new();
        let _ = ctx.decode(b"\x1b[7m");
        ctx.reset();
        assert_eq!(ctx.style(), Style::default());
    }

    // ── Helpers ─────────────────────────────────────────────────────────

    #[test]
    fn split_params_handles_empty_fields() {
        assert_eq!(split_params(b""), vec![0]);
        assert_eq!(split_params(b";1"), vec![0, 1]);
        assert_eq!(split_params(b"38;5;7"), vec![38, 5, 7]);
    }
}

//! Property-based tests for the SGR codec.
//!
//! Decoding is total, re-encoding is a fixed point after one round, and the
//! encoder only writes the parts of a style that actually changed.

use proptest::prelude::*;
use tb_sgr::{Attr, Color, Layer, Node, ParserContext, Style, StyledText, decode, encode, sgr};

// ============================================================================
// Strategies
// ============================================================================

fn color_strategy() -> impl Strategy<Value = Color> {
    prop_oneof![
        (0u8..8).prop_map(Color::Palette),
        (0u8..8).prop_map(Color::Bright),
        any::<u8>().prop_map(Color::Ansi256),
        any::<(u8, u8, u8)>().prop_map(|(r, g, b)| Color::Rgb(r, g, b)),
    ]
}

fn style_strategy() -> impl Strategy<Value = Style> {
    (color_strategy(), color_strategy(), any::<u8>()).prop_map(|(fg, bg, bits)| Style {
        fg,
        bg,
        attrs: Attr::from_bits_retain(bits),
    })
}

/// Printable text without escape introducers.
fn plain_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0x20u8..0x7f, 0..12)
}

/// A mix of valid SGR, plain text and garbage, the way real captured output
/// tends to look.
fn chunk_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        3 => plain_strategy(),
        3 => (style_strategy(), style_strategy()).prop_map(|(a, b)| sgr(&b, Some(&a))),
        1 => prop::collection::vec(
            prop::sample::select(vec![0x1bu8, b'[', b';', b',', b'm', b'5', b'2', b'3', b'8', b'H']),
            1..8,
        ),
        1 => prop::collection::vec(any::<u8>(), 0..8),
    ]
}

fn input_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(chunk_strategy(), 0..10).prop_map(|chunks| chunks.concat())
}

/// Every visible byte paired with the style it is shown in.
fn styled_bytes(text: &StyledText) -> Vec<(u8, Style)> {
    text.iter()
        .flat_map(|n| n.text.iter().map(move |b| (*b, n.style)))
        .collect()
}

// ============================================================================
// Decode
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Decoded text never contains an escape introducer.
    #[test]
    fn decoded_text_has_no_escapes(input in input_strategy()) {
        let text = decode(&input);
        prop_assert!(!text.is_empty());
        prop_assert!(text.iter().all(|n| !n.text.contains(&0x1b)));
    }

    /// Bytes that are not part of any escape survive untouched.
    #[test]
    fn plain_input_is_one_run(plain in plain_strategy()) {
        let text = decode(&plain);
        prop_assert_eq!(text.len(), 1);
        prop_assert_eq!(&text.nodes()[0].text, &plain);
        prop_assert_eq!(text.nodes()[0].style, Style::default());
    }

    /// An incomplete 256-color request changes nothing and eats no text.
    #[test]
    fn truncated_extended_color_is_inert(base in style_strategy(), plain in plain_strategy()) {
        let mut input = b"\x1b[38;5m".to_vec();
        input.extend_from_slice(&plain);

        let mut ctx = ParserContext::with_style(base);
        let text = ctx.decode(&input);

        prop_assert_eq!(ctx.style(), base);
        prop_assert_eq!(text.visible_text(), plain);
        prop_assert!(text.iter().all(|n| n.style == base));
    }

    /// Decoding in two pieces with one context matches decoding at once.
    #[test]
    fn context_carries_across_chunks(head in input_strategy(), tail in plain_strategy()) {
        // Close any escape left dangling at the end of `head`, so the split
        // never lands inside a sequence.
        let mut a = head;
        a.extend_from_slice(b"\x1b[1m");

        let mut joined = a.clone();
        joined.extend_from_slice(&tail);
        let whole = decode(&joined);

        let mut ctx = ParserContext::new();
        let mut split = styled_bytes(&ctx.decode(&a));
        split.extend(styled_bytes(&ctx.decode(&tail)));

        prop_assert_eq!(split, styled_bytes(&whole));
    }
}

// ============================================================================
// Encode
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Re-decoding the encoder's output shows every byte in the same style.
    #[test]
    fn decode_encode_decode_preserves_styles(input in input_strategy()) {
        let once = decode(&input);
        let twice = decode(&encode(&once));
        prop_assert_eq!(styled_bytes(&once), styled_bytes(&twice));
    }

    /// After one round the encoding is a fixed point.
    #[test]
    fn encoding_is_idempotent(input in input_strategy()) {
        let first = encode(&decode(&input));
        let second = encode(&decode(&first));
        prop_assert_eq!(first, second);
    }

    /// Applying the transition sequence to `from` lands exactly on `to`.
    #[test]
    fn transition_reaches_target(from in style_strategy(), to in style_strategy()) {
        let mut ctx = ParserContext::with_style(from);
        let _ = ctx.decode(&sgr(&to, Some(&from)));
        prop_assert_eq!(ctx.style(), to);
    }

    /// The full statement of a style reaches it from any state.
    #[test]
    fn full_statement_reaches_target(from in style_strategy(), to in style_strategy()) {
        let mut ctx = ParserContext::with_style(from);
        let _ = ctx.decode(&sgr(&to, None));
        prop_assert_eq!(ctx.style(), to);
    }

    /// Equal neighbours produce no escape; an attribute-only change
    /// produces attribute codes only.
    #[test]
    fn unchanged_parts_are_not_written(a in style_strategy(), b in style_strategy()) {
        prop_assert!(sgr(&a, Some(&a)).is_empty());

        let attrs_only = Style { fg: a.fg, bg: a.bg, attrs: b.attrs };
        let params = attrs_only.diff_params(Some(&a));
        prop_assert!(params.iter().all(|p| matches!(*p, 1..=8 | 22..=28)), "{:?}", params);
    }

    /// Same foreground and attributes on both sides: only the background
    /// is written, or nothing at all.
    #[test]
    fn shared_foreground_is_skipped(a in style_strategy(), bg in color_strategy()) {
        let b = a.bg(bg);
        let expected = if a.bg == bg { Vec::new() } else { bg.params(Layer::Background) };
        prop_assert_eq!(b.diff_params(Some(&a)), expected);

        let text = StyledText::from(vec![Node::new("x", a), Node::new("y", b)]);
        let again = decode(&encode(&text));
        prop_assert_eq!(styled_bytes(&again), vec![(b'x', a), (b'y', b)]);
    }
}

// ============================================================================
// Worked Example
// ============================================================================

#[test]
fn red_hi_then_reset() {
    let text = decode(b"\x1b[31mHi\x1b[0m!");
    let runs: Vec<_> = text
        .text_nodes()
        .map(|n| (n.text_lossy().into_owned(), n.style))
        .collect();
    assert_eq!(
        runs,
        vec![
            ("Hi".to_string(), Style::default().fg(Color::Palette(1))),
            ("!".to_string(), Style::default()),
        ]
    );

    let again = decode(&encode(&text));
    let rerun: Vec<_> = again
        .text_nodes()
        .map(|n| (n.text_lossy().into_owned(), n.style))
        .collect();
    assert_eq!(rerun, runs);

    let encoded = encode(&text);
    let hi = encoded.iter().position(|c| *c == b'H').unwrap();
    let bang = encoded.iter().position(|c| *c == b'!').unwrap();
    assert_eq!(&encoded[hi + 2..bang], b"\x1b[37m");
}

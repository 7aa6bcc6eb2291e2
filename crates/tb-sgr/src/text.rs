// SPDX-License-Identifier: MIT
//
// Styled text: an ordered run list produced by the decoder.
//
// A `StyledText` is a flat `Vec<Node>`. Each node owns its bytes and
// carries its fully resolved style, so nodes can be painted, recolored or
// re-encoded independently of their neighbours. The first node is always
// the placeholder for "text before the first escape"; it is empty when the
// input starts with an escape.
//
// Text is kept as raw bytes. The decoder never interprets it and the
// engine never measures it beyond byte counts (no width tables here).

use std::borrow::Cow;

use crate::encode;
use crate::style::Style;

// ─── Node ────────────────────────────────────────────────────────────────────

/// A contiguous run of bytes sharing one resolved style.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Node {
    /// Visible bytes. Never contains an escape introducer when produced
    /// by the decoder.
    pub text: Vec<u8>,
    /// Style in effect for the whole run.
    pub style: Style,
}

impl Node {
    /// Create a node from anything byte-like.
    pub fn new(text: impl Into<Vec<u8>>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// A zero-length node carrying `style`.
    #[must_use]
    pub const fn empty(style: Style) -> Self {
        Self {
            text: Vec::new(),
            style,
        }
    }

    /// Number of visible bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the node has no visible bytes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The text as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.text)
    }

    /// This node alone, as escape sequence + text.
    ///
    /// The style is stated in full because nothing is known about what the
    /// terminal holds at the point where the node is painted.
    #[must_use]
    pub fn to_ansi(&self) -> Vec<u8> {
        let mut out = encode::sgr(&self.style, None);
        out.extend_from_slice(&self.text);
        out
    }
}

// ─── StyledText ──────────────────────────────────────────────────────────────

/// An ordered sequence of styled runs.
///
/// ```
/// use tb_sgr::{decode, Color};
///
/// let text = decode(b"\x1b[31mHi\x1b[0m!");
/// let runs: Vec<_> = text.text_nodes().map(|n| n.text_lossy()).collect();
/// assert_eq!(runs, ["Hi", "!"]);
/// assert_eq!(text.text_nodes().next().unwrap().style.fg, Color::Palette(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyledText {
    nodes: Vec<Node>,
}

impl StyledText {
    /// An empty sequence (no placeholder node).
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Append a node.
    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// All nodes, placeholder and empty carriers included.
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Iterate over every node.
    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    /// Iterate over the nodes that actually carry text.
    pub fn text_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| !n.is_empty())
    }

    /// Number of nodes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether there are no nodes at all.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total visible bytes across all nodes.
    #[must_use]
    pub fn visible_len(&self) -> usize {
        self.nodes.iter().map(Node::len).sum()
    }

    /// All visible bytes concatenated, escapes stripped.
    #[must_use]
    pub fn visible_text(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.visible_len());
        for node in &self.nodes {
            out.extend_from_slice(&node.text);
        }
        out
    }

    /// Encode back into escape-laden bytes. See [`encode::encode`].
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        encode::encode(self)
    }

    /// Keep at most `max` visible bytes.
    ///
    /// Nodes past the cut are dropped, the node straddling it is shortened.
    /// Empty nodes before the cut survive so style boundaries stay intact.
    #[must_use]
    pub fn truncate(&self, max: usize) -> Self {
        let mut out = Self::new();
        let mut budget = max;

        for node in &self.nodes {
            if budget == 0 && !node.is_empty() {
                break;
            }
            let take = node.len().min(budget);
            out.push(Node::new(&node.text[..take], node.style));
            budget -= take;
        }

        out
    }

    /// Break into rows of at most `width` visible bytes.
    ///
    /// Runs are split wherever a row boundary falls inside them; every piece
    /// keeps its node's style. A zero width yields no rows.
    #[must_use]
    pub fn wrap(&self, width: usize) -> Vec<Self> {
        if width == 0 {
            return Vec::new();
        }

        let mut rows = Vec::new();
        let mut row = Self::new();
        let mut used = 0;

        for node in self.text_nodes() {
            let mut rest = node.text.as_slice();
            while !rest.is_empty() {
                if used == width {
                    rows.push(std::mem::take(&mut row));
                    used = 0;
                }
                let take = rest.len().min(width - used);
                row.push(Node::new(&rest[..take], node.style));
                used += take;
                rest = &rest[take..];
            }
        }

        if !row.is_empty() {
            rows.push(row);
        }
        rows
    }
}

impl From<Vec<Node>> for StyledText {
    fn from(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }
}

impl FromIterator<Node> for StyledText {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for StyledText {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a> IntoIterator for &'a StyledText {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use pretty_assertions::assert_eq;

    fn red() -> Style {
        Style::default().fg(Color::Palette(1))
    }

    fn blue() -> Style {
        Style::default().fg(Color::Palette(4))
    }

    fn sample() -> StyledText {
        StyledText::from(vec![
            Node::empty(Style::default()),
            Node::new("Hello", red()),
            Node::new(", world", blue()),
        ])
    }

    fn texts(t: &StyledText) -> Vec<String> {
        t.iter().map(|n| n.text_lossy().into_owned()).collect()
    }

    // ── Node ────────────────────────────────────────────────────────────

    #[test]
    fn node_len_and_empty() {
        assert_eq!(Node::new("abc", red()).len(), 3);
        assert!(Node::empty(red()).is_empty());
    }

    #[test]
    fn node_text_lossy_replaces_invalid_utf8() {
        let n = Node::new(vec![b'a', 0xff, b'b'], Style::default());
        assert_eq!(n.text_lossy(), "a\u{fffd}b");
    }

    #[test]
    fn node_to_ansi_states_full_style() {
        let n = Node::new("x", red());
        assert_eq!(
            String::from_utf8(n.to_ansi()).unwrap(),
            "\x1b[31;40;22;23;24;25;26;27;28mx"
        );
    }

    // ── Queries ─────────────────────────────────────────────────────────

    #[test]
    fn visible_text_concatenates() {
        assert_eq!(sample().visible_text(), b"Hello, world");
        assert_eq!(sample().visible_len(), 12);
    }

    #[test]
    fn text_nodes_skip_placeholder() {
        let t = sample();
        assert_eq!(t.len(), 3);
        assert_eq!(t.text_nodes().count(), 2);
    }

    #[test]
    fn collect_from_iterator() {
        let t: StyledText = vec![Node::new("a", red())].into_iter().collect();
        assert_eq!(t.len(), 1);
    }

    // ── truncate ────────────────────────────────────────────────────────

    #[test]
    fn truncate_inside_a_node() {
        let t = sample().truncate(7);
        assert_eq!(texts(&t), ["", "Hello", ", "]);
        assert_eq!(t.nodes()[2].style, blue());
    }

    #[test]
    fn truncate_at_node_boundary() {
        let t = sample().truncate(5);
        assert_eq!(texts(&t), ["", "Hello"]);
    }

    #[test]
    fn truncate_beyond_length_is_identity() {
        assert_eq!(sample().truncate(100), sample());
    }

    #[test]
    fn truncate_to_zero_keeps_only_leading_empties() {
        let t = sample().truncate(0);
        assert_eq!(texts(&t), [""]);
    }

    // ── wrap ────────────────────────────────────────────────────────────

    #[test]
    fn wrap_splits_runs_across_rows() {
        let rows = sample().wrap(4);
        let rendered: Vec<Vec<String>> = rows.iter().map(texts).collect();
        assert_eq!(
            rendered,
            vec![
                vec!["Hell".to_string()],
                vec!["o".to_string(), ", w".to_string()],
                vec!["orld".to_string()],
            ]
        );
        assert_eq!(rows[1].nodes()[0].style, red());
        assert_eq!(rows[1].nodes()[1].style, blue());
    }

    #[test]
    fn wrap_exact_fit_has_no_trailing_row() {
        let t = StyledText::from(vec![Node::new("abcd", red())]);
        assert_eq!(t.wrap(2).len(), 2);
    }

    #[test]
    fn wrap_zero_width_is_empty() {
        assert!(sample().wrap(0).is_empty());
    }

    #[test]
    fn wrap_empty_text_is_empty() {
        assert!(StyledText::new().wrap(10).is_empty());
    }
}

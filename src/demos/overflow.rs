// SPDX-License-Identifier: MIT
//
// Overflow demo: a framed paragraph that re-wraps.
//
// The paragraph is wrapped on its decoded runs, so a color change in the
// middle of a row stays exactly where it was. Left and right arrows change
// the column width; every change re-renders the frame.
//
//   (Press "q" to exit)
//   Column width: 50
//
//           ┌────────────────────┐
//           │ Lorem ipsum dolor  │
//           │ sit amet, consect  │
//           └────────────────────┘

use std::cell::Cell;
use std::rc::Rc;

use tb_sgr::{Color, Style, StyledText};
use tb_term::{BoxInfo, Driver, Engine, Placement, Widget};

/// Four colored sentences.
pub const TEXT: &[u8] = b"\x1b[31mLorem ipsum dolor sit amet, consectetur adipiscing elit, sed do \
    eiusmod tempor incididunt ut labore et dolore magna aliqua. \x1b[32mUt enim ad minim veniam, \
    quis nostrud exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat. \
    \x1b[33mDuis aute irure dolor in reprehenderit in voluptate velit esse cillum dolore eu \
    fugiat nulla pariatur. \x1b[34mExcepteur sint occaecat cupidatat non proident, sunt in \
    culpa qui officia deserunt mollit anim id est laborum.";

/// Narrowest column.
pub const MIN_WIDTH: usize = 4;

/// Column width at start, if the terminal allows it.
pub const INITIAL_WIDTH: usize = 50;

/// Left edge of the frame.
const FRAME_X: i32 = 9;

/// The frame starts below the two header lines and a blank line.
const FRAME_Y: i32 = 3;

/// Border and padding columns on both sides of the text.
const CHROME: i32 = 4;

pub const GROW_KEY: &str = "\x1b[C";
pub const SHRINK_KEY: &str = "\x1b[D";

/// Add the header and the frame, and bind the arrow keys.
pub fn build<D: Driver + 'static>(ui: &mut Engine<D>) {
    let text = tb_sgr::decode(TEXT);
    let width = Rc::new(Cell::new(INITIAL_WIDTH.min(max_width(ui.columns()))));
    let rows = i32::try_from(text.wrap(width.get()).len()).unwrap_or(i32::MAX);

    let shown = Rc::clone(&width);
    let title: Widget<D> = Widget::new(move |_: &BoxInfo| header(shown.get()));
    ui.add(Placement::new(1, 0, 0, 2), title);

    let shown = Rc::clone(&width);
    let body: Widget<D> = Widget::new(move |_: &BoxInfo| frame(&text, shown.get()));
    let w = i32::try_from(width.get()).unwrap_or(i32::MAX);
    ui.add(Placement::new(FRAME_X, FRAME_Y, w + CHROME, rows + 2), body);

    let grow = Rc::clone(&width);
    ui.on_key(GROW_KEY, move |ui| {
        if grow.get() < max_width(ui.columns()) {
            grow.set(grow.get() + 1);
        }
        ui.force_redraw()
    });

    let shrink = width;
    ui.on_key(SHRINK_KEY, move |ui| {
        if shrink.get() > MIN_WIDTH {
            shrink.set(shrink.get() - 1);
        }
        ui.force_redraw()
    });
}

/// Widest column whose frame still fits in `cols`.
fn max_width(cols: i32) -> usize {
    usize::try_from(cols - FRAME_X - CHROME)
        .unwrap_or(0)
        .max(MIN_WIDTH)
}

/// The two header lines.
pub fn header(width: usize) -> Vec<u8> {
    format!("\x1b[36m(Press \"q\" to exit)\n\x1b[32mColumn width: {width}\x1b[0m").into_bytes()
}

/// `text` wrapped to `width` inside a box-drawing frame.
pub fn frame(text: &StyledText, width: usize) -> Vec<u8> {
    let border = tb_sgr::sgr(&Style::default().fg(Color::Palette(5)), None);
    let rule = "─".repeat(width + 2);
    let mut out = Vec::new();

    out.extend_from_slice(&border);
    out.extend_from_slice(format!("┌{rule}┐").as_bytes());

    for row in text.wrap(width) {
        out.push(b'\n');
        out.extend_from_slice(&border);
        out.extend_from_slice("│".as_bytes());
        out.extend_from_slice(b"\x1b[0m ");
        out.extend_from_slice(&row.encode());
        out.resize(out.len() + width.saturating_sub(row.visible_len()) + 1, b' ');
        out.extend_from_slice(&border);
        out.extend_from_slice("│".as_bytes());
    }

    out.push(b'\n');
    out.extend_from_slice(&border);
    out.extend_from_slice(format!("└{rule}┘").as_bytes());
    out.extend_from_slice(b"\x1b[0m");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tb_term::HeadlessDriver;

    fn lines(bytes: &[u8]) -> Vec<String> {
        bytes
            .split(|b| *b == b'\n')
            .map(|line| String::from_utf8(tb_sgr::decode(line).visible_text()).unwrap())
            .collect()
    }

    fn header_of(ui: &Engine<HeadlessDriver>) -> String {
        lines(ui.boxes()[0].cache()).join("\n")
    }

    #[test]
    fn header_shows_width() {
        assert_eq!(
            lines(&header(17)),
            vec!["(Press \"q\" to exit)", "Column width: 17"]
        );
    }

    #[test]
    fn frame_rows_line_up() {
        let text = tb_sgr::decode(TEXT);
        let framed = lines(&frame(&text, 20));
        assert!(framed.len() > 3);
        for line in &framed {
            assert_eq!(line.chars().count(), 24, "{line:?}");
        }
        assert!(framed[0].starts_with('┌'));
        assert!(framed.last().unwrap().starts_with('└'));
        assert_eq!(framed[1], "│ Lorem ipsum dolor si │");
    }

    #[test]
    fn frame_holds_every_character() {
        let text = tb_sgr::decode(TEXT);
        let framed = lines(&frame(&text, 13));
        let inner: String = framed[1..framed.len() - 1]
            .iter()
            .map(|l| {
                let chars: Vec<char> = l.chars().collect();
                chars[2..chars.len() - 2].iter().collect::<String>()
            })
            .collect();
        let original = String::from_utf8(text.visible_text()).unwrap();
        assert_eq!(inner.trim_end(), original);
    }

    #[test]
    fn colors_survive_wrapping() {
        let text = tb_sgr::decode(TEXT);
        let framed = frame(&text, 30);
        let fgs: Vec<Color> = tb_sgr::decode(&framed)
            .text_nodes()
            .map(|n| n.style.fg)
            .filter(|c| *c != Color::Palette(5) && *c != Color::Palette(7))
            .collect();
        assert_eq!(fgs.first(), Some(&Color::Palette(1)));
        assert_eq!(fgs.last(), Some(&Color::Palette(4)));
        assert!(fgs.contains(&Color::Palette(2)));
        assert!(fgs.contains(&Color::Palette(3)));
    }

    #[test]
    fn arrows_change_width() {
        let mut ui = Engine::new(HeadlessDriver::new(80, 24));
        build(&mut ui);
        assert!(header_of(&ui).ends_with("Column width: 50"));

        ui.dispatch(SHRINK_KEY.as_bytes()).unwrap();
        ui.dispatch(SHRINK_KEY.as_bytes()).unwrap();
        assert!(header_of(&ui).ends_with("Column width: 48"));

        ui.dispatch(GROW_KEY.as_bytes()).unwrap();
        assert!(header_of(&ui).ends_with("Column width: 49"));
    }

    #[test]
    fn width_is_clamped() {
        let mut ui = Engine::new(HeadlessDriver::new(30, 24));
        build(&mut ui);
        assert!(header_of(&ui).ends_with("Column width: 17"));

        ui.dispatch(GROW_KEY.as_bytes()).unwrap();
        assert!(header_of(&ui).ends_with("Column width: 17"));

        for _ in 0..20 {
            ui.dispatch(SHRINK_KEY.as_bytes()).unwrap();
        }
        assert!(header_of(&ui).ends_with(&format!("Column width: {MIN_WIDTH}")));
    }
}

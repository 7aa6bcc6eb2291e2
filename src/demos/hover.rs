// SPDX-License-Identifier: MIT
//
// Hover demo: a styled line that unfolds.
//
// The line starts cut down to a few characters plus an ellipsis. Clicking
// (or dragging across it) widens the visible part in a short animation;
// moving the pointer over it without a button folds it back one column per
// frame. Truncation works on the decoded runs, so the colors and the
// underline survive any cut.

use std::cell::Cell;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use tb_sgr::StyledText;
use tb_term::{BoxId, BoxInfo, Driver, Engine, Placement, Widget};

/// The line being shown.
pub const TEXT: &[u8] = b"\x1b[36mClick to see \
    \x1b[4;38;5;125mt\x1b[38;5;127mh\x1b[38;5;130mi\x1b[38;5;135ms \
    \x1b[38;5;140mt\x1b[38;5;145me\x1b[38;5;150mx\x1b[38;5;155mt\x1b[0;36m \
    un-truncate!";

/// Visible width of [`TEXT`].
const FULL_WIDTH: i32 = 35;

/// Visible columns while folded.
pub const FOLDED: usize = 12;

/// Unfolding stops once the width reaches this.
pub const UNFOLDED: usize = 50;

/// Columns gained per unfolding frame.
const UNFOLD_STEP: usize = 10;

/// Below this width the line ends in an ellipsis.
const ELLIPSIS_BELOW: usize = 47;

/// Add the line, centered. Returns its box.
pub fn build<D: Driver + 'static>(ui: &mut Engine<D>, frame: Duration) -> BoxId {
    let text = tb_sgr::decode(TEXT);
    let width = Rc::new(Cell::new(FOLDED));

    let shown = Rc::clone(&width);
    let clicked = Rc::clone(&width);
    let hovered = width;

    let widget: Widget<D> = Widget::new(move |_: &BoxInfo| render(&text, shown.get()))
        .on_click(move |ui, _, _| unfold(ui, &clicked, frame))
        .on_hover(move |ui, _, pointer| {
            if pointer.down {
                unfold(ui, &hovered, frame)
            } else {
                fold(ui, &hovered, frame)
            }
        });

    ui.add(Placement::centered(FULL_WIDTH, 1), widget)
}

/// `text` cut to `width` visible bytes.
pub fn render(text: &StyledText, width: usize) -> Vec<u8> {
    let mut out = text.truncate(width).encode();
    if width < ELLIPSIS_BELOW {
        out.extend_from_slice(b"...");
    }
    out
}

fn unfold<D: Driver>(ui: &mut Engine<D>, width: &Cell<usize>, frame: Duration) -> tb_term::Result<()> {
    while width.get() < UNFOLDED {
        width.set(width.get() + UNFOLD_STEP);
        ui.force_redraw()?;
        thread::sleep(frame);
    }
    Ok(())
}

fn fold<D: Driver>(ui: &mut Engine<D>, width: &Cell<usize>, frame: Duration) -> tb_term::Result<()> {
    while width.get() > FOLDED {
        width.set(width.get() - 1);
        ui.force_redraw()?;
        thread::sleep(frame);
    }
    Ok(())
}

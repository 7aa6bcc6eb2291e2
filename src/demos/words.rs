// SPDX-License-Identifier: MIT
//
// Words demo: one box per word.
//
// The paragraph is decoded once; each styled run (one word each) becomes
// its own box, flowed into a 50-column block centered on the terminal.
// Clicking a word moves its 256-color foreground along the palette.

use std::cell::RefCell;
use std::rc::Rc;

use tb_sgr::Color;
use tb_term::{BoxId, BoxInfo, Driver, Engine, Placement, Widget};

/// One 256-color run per word.
pub const TEXT: &[u8] = b"\x1b[38;5;100mClick\x1b[38;5;101many\x1b[38;5;102mword\
    \x1b[38;5;103mto\x1b[38;5;104mchange\x1b[38;5;105mits\x1b[38;5;106mcolor!\
    \x1b[38;5;107mThis\x1b[38;5;108mis\x1b[38;5;109ma\x1b[38;5;110mlong\
    \x1b[38;5;111mparagraph\x1b[38;5;112mof\x1b[38;5;113mtext,\x1b[38;5;114mand\
    \x1b[38;5;115mevery\x1b[38;5;116mword\x1b[38;5;117mcan\x1b[38;5;118mbe\
    \x1b[38;5;119mclicked.\x1b[38;5;120mEach\x1b[38;5;121mword\x1b[38;5;122mis\
    \x1b[38;5;123mits\x1b[38;5;124mown\x1b[38;5;125mbox,\x1b[38;5;126mwith\
    \x1b[38;5;127mits\x1b[38;5;128mown\x1b[38;5;129mdraw\x1b[38;5;130mand\
    \x1b[38;5;131mclick\x1b[38;5;132mcallbacks,\x1b[38;5;133mand\x1b[38;5;134mits\
    \x1b[38;5;135mown\x1b[38;5;136mcached\x1b[38;5;137moutput.";

/// Width of the text block.
const BLOCK_W: i32 = 50;

/// Height the block is centered for.
const BLOCK_H: i32 = 10;

/// Palette steps per click.
const COLOR_STEP: u8 = 10;

/// Add one box per word. Returns the boxes in reading order.
pub fn build<D: Driver + 'static>(ui: &mut Engine<D>) -> Vec<BoxId> {
    let text = tb_sgr::decode(TEXT);
    let left = ui.center_x(BLOCK_W);
    let right = (ui.columns() + BLOCK_W) / 2;
    let (mut x, mut y) = (left, ui.center_y(BLOCK_H));

    let mut ids = Vec::new();
    for node in text.text_nodes() {
        let len = i32::try_from(node.len()).unwrap_or(i32::MAX);
        let word = Rc::new(RefCell::new(node.clone()));
        let shown = Rc::clone(&word);

        let widget: Widget<D> = Widget::new(move |_: &BoxInfo| shown.borrow().to_ansi()).on_click(
            move |ui, _, _| {
                cycle(&mut word.borrow_mut().style.fg);
                ui.force_redraw()
            },
        );
        ids.push(ui.add(Placement::new(x, y, len, 1), widget));

        x += len + 1;
        if x > right {
            x = left;
            y += 2;
        }
    }
    ids
}

/// Step a 256-color foreground, wrapping back to the start of the palette.
/// Other colors are left alone.
pub fn cycle(fg: &mut Color) {
    if let Color::Ansi256(n) = *fg {
        *fg = Color::Ansi256(n.checked_add(COLOR_STEP).unwrap_or(COLOR_STEP));
    }
}

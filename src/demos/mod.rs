// SPDX-License-Identifier: MIT
//
// Demo screens.
//
// Each demo populates an engine with boxes and key handlers and returns.
// They are generic over the driver so tests can run them headless. Every
// demo quits on `q`.

pub mod hover;
pub mod overflow;
pub mod words;

use std::time::Duration;

use tb_term::{Driver, Engine};

use crate::cli::Demo;

/// Populate `ui` with `demo`. `frame` is the pause between animation steps.
pub fn build<D: Driver + 'static>(ui: &mut Engine<D>, demo: Demo, frame: Duration) {
    match demo {
        Demo::Hover => {
            hover::build(ui, frame);
        }
        Demo::Words => {
            words::build(ui);
        }
        Demo::Overflow => overflow::build(ui),
    }

    ui.on_key("q", |ui| {
        ui.quit();
        Ok(())
    });
}

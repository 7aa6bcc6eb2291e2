// SPDX-License-Identifier: MIT
//
// tb-term: Terminal driver and box engine for tuibox.
//
// The terminal is treated as a canvas of positioned boxes. Each box owns a
// draw callback whose output (SGR-styled bytes, newlines allowed) is cached
// and painted line by line with absolute cursor moves. Mouse reports are
// decoded from xterm's SGR encoding and routed to the boxes under the
// pointer; everything else goes to key handlers matched by byte prefix.
//
// Layering:
//
//   ansi / output      escape helpers and a per-frame byte buffer
//   terminal           termios, size query, setup/teardown, panic restore
//   driver             Driver trait; TtyDriver (stdin/stdout), HeadlessDriver
//   input              SGR mouse report parsing
//   boxes              geometry, placement, widgets, boxes
//   engine             registry, renderer, dispatcher, run loop
//
// Frames are never diffed. A repaint clears the screen and writes every
// visible box again in one write.

pub mod ansi;
pub mod boxes;
pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod input;
pub mod output;
pub mod terminal;

pub use boxes::{BoxId, BoxInfo, DrawFn, Placement, Pointer, PointerFn, Pos, Rect, UiBox, Widget};
pub use config::EngineConfig;
#[cfg(unix)]
pub use driver::TtyDriver;
pub use driver::{Driver, HeadlessDriver};
pub use engine::{Engine, KeyFn};
pub use error::{Error, Result};
pub use terminal::Size;

// SPDX-License-Identifier: MIT
//
// tb-sgr: SGR escape sequence codec.
//
// Turns terminal-styled byte strings into a flat list of styled runs and
// back. The decoder is stateful through an explicit `ParserContext`; the
// encoder only ever writes what changed between neighbouring runs.

pub mod color;
pub mod decode;
pub mod encode;
pub mod style;
pub mod text;

pub use color::{Color, DEFAULT_BG, DEFAULT_FG, Layer};
pub use decode::{ParserContext, decode};
pub use encode::{encode, sgr, write_encoded, write_sgr};
pub use style::{Attr, Style};
pub use text::{Node, StyledText};

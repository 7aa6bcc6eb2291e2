// SPDX-License-Identifier: MIT
//
// Command-line interface for the demo launcher.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tb_term::EngineConfig;

#[derive(Debug, Parser)]
#[command(name = "tuibox")]
#[command(about = "Box-based terminal UI demos")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub demo: Demo,

    /// Ignore the mouse wheel
    #[arg(long, global = true)]
    pub no_scroll: bool,

    /// Rows moved per wheel notch
    #[arg(
        long,
        global = true,
        default_value_t = 2,
        value_name = "ROWS",
        value_parser = clap::value_parser!(i32).range(1..=1000)
    )]
    pub scroll_step: i32,

    /// Write a trace log to this file
    #[arg(long, global = true, value_name = "PATH")]
    pub log: Option<PathBuf>,

    /// Level for the trace log (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "debug", value_name = "LEVEL")]
    pub log_level: tracing::Level,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Demo {
    /// A truncated line that unfolds on hover and click
    Hover,
    /// A paragraph where every word is its own clickable box
    Words,
    /// A framed paragraph that re-wraps as the column width changes
    Overflow,
}

impl Cli {
    /// Engine settings derived from the flags.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            scroll_enabled: !self.no_scroll,
            scroll_step: self.scroll_step,
            ..EngineConfig::default()
        }
    }
}

// SPDX-License-Identifier: MIT
//
// tuibox: box-based terminal UI demos.
//
// Wires the two crates together:
//
//   tb-sgr  → decode styled strings, cut and wrap them, encode minimal SGR
//   tb-term → take over the tty, place boxes, route mouse and keys
//
// Each demo only registers boxes and key handlers; the engine's blocking
// read loop does the rest until `q` or end of input. The engine owns the
// tty driver, so the terminal is restored as soon as `run` returns, before
// anything else is printed.

mod cli;
mod demos;

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::cli::Cli;

/// Pause between animation frames.
const FRAME: Duration = Duration::from_millis(10);

const MULTIPLEXER_NOTE: &str = "Note: Terminal multiplexer detected.\n  \
    Full-frame redraws may flicker; a GPU-accelerated terminal such as\n  \
    alacritty or kitty gives the smoothest result.";

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log {
        init_logging(path, cli.log_level)?;
    }
    info!(demo = ?cli.demo, "starting");

    run(&cli)?;

    if tb_term::terminal::is_multiplexer() {
        println!("{MULTIPLEXER_NOTE}");
    }
    Ok(())
}

#[cfg(unix)]
fn run(cli: &Cli) -> Result<()> {
    let driver = tb_term::TtyDriver::new().context("failed to initialize terminal")?;
    let mut ui = tb_term::Engine::with_config(driver, cli.engine_config());

    demos::build(&mut ui, cli.demo, FRAME);
    ui.draw_all()?;
    ui.run()?;

    info!("exiting");
    Ok(())
}

#[cfg(not(unix))]
fn run(_cli: &Cli) -> Result<()> {
    anyhow::bail!("tuibox needs a unix terminal")
}

/// Send tracing output to `path`. The tty is the UI, so logs never go there.
fn init_logging(path: &Path, level: tracing::Level) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .init();
    Ok(())
}

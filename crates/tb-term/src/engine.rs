// SPDX-License-Identifier: MIT
//
// Engine: box registry, renderer and event router in one owner.
//
// # Rendering
//
// Every box keeps the bytes its draw callback produced last time. A normal
// repaint reuses those bytes; only a forced repaint (explicit, or after a
// screen switch) calls the draw callbacks again. Content is split on
// newlines and each line is placed with an absolute cursor move:
//
//   row = rect.y + line_index + 1 + scroll_offset
//
// Lines whose position falls outside the terminal are dropped, never
// wrapped. A full repaint resets attributes, clears the screen, paints
// every box on the active screen in insertion order, and reaches the
// driver as one write.
//
// # Routing
//
// Each input chunk is first checked for an SGR mouse report. Presses go to
// `on_click` of every box under the pointer, motion to `on_hover`, wheel
// notches move the scroll offset and repaint. Then every key handler whose
// byte prefix matches the chunk runs, in registration order.
//
// Callbacks get `&mut Engine`, so they can add boxes, switch screens,
// redraw, or clear everything. To make that possible a callback is moved
// out of its slot for the duration of the call and put back afterwards if
// its owner still exists. Targets are collected before any callback runs,
// so boxes added mid-dispatch do not receive the event that created them.

use tracing::{debug, trace};

use crate::ansi;
use crate::boxes::{BoxId, BoxInfo, Placement, Pointer, PointerFn, Pos, Rect, UiBox, Widget};
use crate::config::EngineConfig;
use crate::driver::Driver;
use crate::error::Result;
use crate::input::{self, MouseReport, Wheel};
use crate::output::OutputBuffer;

/// A key handler callback.
pub type KeyFn<D> = Box<dyn FnMut(&mut Engine<D>) -> Result<()>>;

struct KeyHandler<D: Driver> {
    id: u32,
    prefix: Vec<u8>,
    f: Option<KeyFn<D>>,
}

#[derive(Clone, Copy)]
enum PointerKind {
    Click,
    Hover,
}

// ─── Engine ─────────────────────────────────────────────────────────────────

/// Owns the driver, the boxes and the key handlers.
///
/// # Example
///
/// ```
/// use tb_term::{Engine, HeadlessDriver, Placement, Widget};
///
/// let driver = HeadlessDriver::new(40, 10).with_input(["q"]);
/// let mut ui = Engine::new(driver);
/// ui.add(Placement::new(3, 2, 5, 1), Widget::text("hello"));
/// ui.on_key("q", |ui| {
///     ui.quit();
///     Ok(())
/// });
/// ui.draw_all()?;
/// ui.run()?;
/// assert!(ui.driver().output().ends_with(b"\x1b[3;3Hhello"));
/// # Ok::<(), tb_term::Error>(())
/// ```
pub struct Engine<D: Driver> {
    driver: D,
    out: OutputBuffer,

    boxes: Vec<UiBox<D>>,
    handlers: Vec<KeyHandler<D>>,
    next_box: u32,
    next_handler: u32,

    screen: u32,
    scroll_offset: i32,
    scroll_enabled: bool,
    scroll_step: i32,
    force: bool,
    mouse_down: bool,
    quit: bool,
}

impl<D: Driver> Engine<D> {
    /// An engine with the default configuration.
    pub fn new(driver: D) -> Self {
        Self::with_config(driver, EngineConfig::default())
    }

    /// An engine with explicit configuration.
    pub fn with_config(driver: D, config: EngineConfig) -> Self {
        Self {
            driver,
            out: OutputBuffer::new(),
            boxes: Vec::new(),
            handlers: Vec::new(),
            next_box: 0,
            next_handler: 0,
            screen: config.initial_screen,
            scroll_offset: 0,
            scroll_enabled: config.scroll_enabled,
            scroll_step: config.scroll_step,
            force: false,
            mouse_down: false,
            quit: false,
        }
    }

    // ── Registration ────────────────────────────────────────────────

    /// Add a box on the active screen. Its content is drawn once, now.
    pub fn add(&mut self, placement: Placement, widget: Widget<D>) -> BoxId {
        let id = BoxId(self.next_box);
        self.next_box += 1;

        let rect = placement.resolve(self.columns(), self.rows());
        self.boxes.push(UiBox::new(id, rect, self.screen, widget));
        debug!(%id, x = rect.x, y = rect.y, w = rect.w, h = rect.h, screen = self.screen, "box added");
        id
    }

    /// Add a one-line box showing `text`, as wide as the text.
    pub fn add_text(
        &mut self,
        x: impl Into<Pos>,
        y: impl Into<Pos>,
        text: impl Into<Vec<u8>>,
        on_click: Option<PointerFn<D>>,
        on_hover: Option<PointerFn<D>>,
    ) -> BoxId {
        let text = text.into();
        let w = i32::try_from(text.len()).unwrap_or(i32::MAX);
        let mut widget = Widget::text(text);
        widget.on_click = on_click;
        widget.on_hover = on_hover;
        self.add(Placement::new(x, y, w, 1), widget)
    }

    /// Run `f` whenever an input chunk starts with `prefix`.
    pub fn on_key(
        &mut self,
        prefix: impl Into<Vec<u8>>,
        f: impl FnMut(&mut Self) -> Result<()> + 'static,
    ) {
        let id = self.next_handler;
        self.next_handler += 1;
        self.handlers.push(KeyHandler {
            id,
            prefix: prefix.into(),
            f: Some(Box::new(f)),
        });
    }

    /// Drop every box and key handler. Screen and scroll state are kept.
    pub fn clear(&mut self) {
        debug!(boxes = self.boxes.len(), handlers = self.handlers.len(), "clearing ui");
        self.boxes.clear();
        self.handlers.clear();
    }

    // ── Rendering ───────────────────────────────────────────────────

    /// Repaint every box on the active screen.
    ///
    /// # Errors
    ///
    /// Fails if the driver's writer fails.
    pub fn draw_all(&mut self) -> Result<()> {
        // Writing into a Vec cannot fail.
        let _ = ansi::reset_and_clear(&mut self.out);
        for i in 0..self.boxes.len() {
            self.paint(i);
        }
        self.flush()?;
        self.force = false;
        Ok(())
    }

    /// Repaint a single box, optionally flushing right away.
    ///
    /// Unknown ids and boxes on other screens are skipped.
    ///
    /// # Errors
    ///
    /// Fails if `flush` is set and the driver's writer fails.
    pub fn draw_one(&mut self, id: BoxId, flush: bool) -> Result<()> {
        if let Some(i) = self.index_of(id) {
            self.paint(i);
        }
        if flush {
            self.flush()?;
        }
        Ok(())
    }

    /// Re-run every draw callback and repaint.
    ///
    /// # Errors
    ///
    /// Fails if the driver's writer fails.
    pub fn force_redraw(&mut self) -> Result<()> {
        self.force = true;
        self.draw_all()
    }

    /// Write whatever is buffered to the driver.
    ///
    /// # Errors
    ///
    /// Fails if the driver's writer fails.
    pub fn flush(&mut self) -> Result<()> {
        self.out.flush_to(self.driver.writer())?;
        Ok(())
    }

    /// Append the lines of box `i` to the output buffer.
    fn paint(&mut self, i: usize) {
        let b = &mut self.boxes[i];
        if b.screen != self.screen {
            return;
        }
        if self.force {
            b.redraw();
        }

        let offset = if self.scroll_enabled { self.scroll_offset } else { 0 };
        let x = b.rect.x;
        for (n, line) in b.cache.split(|c| *c == b'\n').enumerate() {
            if line.is_empty() {
                continue;
            }
            let n = i32::try_from(n).unwrap_or(i32::MAX);
            let row = b.rect.y.saturating_add(n).saturating_add(1).saturating_add(offset);
            if self.driver.contains(x, row) {
                self.out.put_line(x, row, line);
            } else {
                trace!(id = %b.id, x, row, "line clipped");
            }
        }
    }

    // ── State ───────────────────────────────────────────────────────

    /// Switch the active screen. The next repaint re-runs draw callbacks.
    pub fn set_screen(&mut self, screen: u32) {
        debug!(from = self.screen, to = screen, "screen switch");
        self.screen = screen;
        self.force = true;
    }

    /// The active screen.
    #[must_use]
    pub const fn screen(&self) -> u32 {
        self.screen
    }

    /// Enable or disable wheel scrolling.
    ///
    /// While disabled, the offset is neither changed nor applied, but it
    /// is remembered.
    pub fn set_scroll_enabled(&mut self, enabled: bool) {
        self.scroll_enabled = enabled;
    }

    #[must_use]
    pub const fn scroll_enabled(&self) -> bool {
        self.scroll_enabled
    }

    /// Rows the content is currently shifted by.
    #[must_use]
    pub const fn scroll_offset(&self) -> i32 {
        self.scroll_offset
    }

    /// Whether the left button was held at the last click or motion report.
    #[must_use]
    pub const fn mouse_down(&self) -> bool {
        self.mouse_down
    }

    /// Whether the next repaint will re-run draw callbacks.
    #[must_use]
    pub const fn is_forced(&self) -> bool {
        self.force
    }

    #[must_use]
    pub fn columns(&self) -> i32 {
        self.driver.columns()
    }

    #[must_use]
    pub fn rows(&self) -> i32 {
        self.driver.rows()
    }

    /// Column that centers a box `w` wide.
    #[must_use]
    pub fn center_x(&self, w: i32) -> i32 {
        (self.columns() - w) / 2
    }

    /// Row that centers a box `h` tall.
    #[must_use]
    pub fn center_y(&self, h: i32) -> i32 {
        (self.rows() - h) / 2
    }

    /// Look up a box.
    #[must_use]
    pub fn get(&self, id: BoxId) -> Option<&UiBox<D>> {
        self.index_of(id).map(|i| &self.boxes[i])
    }

    /// The rectangle of a box, if it exists.
    #[must_use]
    pub fn rect_of(&self, id: BoxId) -> Option<Rect> {
        self.get(id).map(UiBox::rect)
    }

    /// Every box, in insertion order.
    #[must_use]
    pub fn boxes(&self) -> &[UiBox<D>] {
        &self.boxes
    }

    #[must_use]
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    pub const fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    fn index_of(&self, id: BoxId) -> Option<usize> {
        self.boxes.iter().position(|b| b.id == id)
    }

    // ── Event Loop ──────────────────────────────────────────────────

    /// Ask [`run`](Self::run) to return once the current chunk is handled.
    pub fn quit(&mut self) {
        self.quit = true;
    }

    /// Read and dispatch input until end of input or [`quit`](Self::quit).
    ///
    /// # Errors
    ///
    /// Driver failures and errors returned by callbacks end the loop.
    pub fn run(&mut self) -> Result<()> {
        self.quit = false;
        while let Some(chunk) = self.driver.read()? {
            self.dispatch(&chunk)?;
            if self.quit {
                debug!("quit requested");
                break;
            }
        }
        Ok(())
    }

    /// Route one raw input chunk.
    ///
    /// # Errors
    ///
    /// Errors returned by callbacks, and write failures from scroll
    /// repaints.
    pub fn dispatch(&mut self, raw: &[u8]) -> Result<()> {
        trace!(len = raw.len(), "dispatch");

        match input::parse_mouse(raw) {
            Some(MouseReport::Button { pressed, x, y }) => {
                self.mouse_down = pressed;
                if pressed {
                    self.deliver(PointerKind::Click, x, y)?;
                }
            }
            Some(MouseReport::Motion { dragging, x, y }) => {
                self.mouse_down = dragging;
                self.deliver(PointerKind::Hover, x, y)?;
            }
            Some(MouseReport::Wheel(dir)) => {
                if self.scroll_enabled {
                    self.scroll_offset = match dir {
                        Wheel::Up => self.scroll_offset.saturating_add(self.scroll_step),
                        Wheel::Down => self.scroll_offset.saturating_sub(self.scroll_step),
                    };
                    debug!(offset = self.scroll_offset, "scrolled");
                    self.draw_all()?;
                }
            }
            None => {}
        }

        self.run_key_handlers(raw)
    }

    /// Call the click or hover callback of every box under (`x`, `y`).
    fn deliver(&mut self, kind: PointerKind, x: i32, y: i32) -> Result<()> {
        let y = if self.scroll_enabled { y.saturating_sub(self.scroll_offset) } else { y };
        let pointer = Pointer {
            x,
            y,
            down: self.mouse_down,
        };

        let targets: Vec<BoxInfo> = self
            .boxes
            .iter()
            .filter(|b| b.screen == self.screen && b.hit_test(x, y))
            .map(UiBox::info)
            .collect();

        for info in targets {
            let Some(i) = self.index_of(info.id) else {
                continue;
            };
            let Some(mut f) = slot(&mut self.boxes[i].widget, kind).take() else {
                continue;
            };

            let result = f(self, &info, pointer);

            if let Some(i) = self.index_of(info.id) {
                let cb = slot(&mut self.boxes[i].widget, kind);
                if cb.is_none() {
                    *cb = Some(f);
                }
            }
            result?;
        }
        Ok(())
    }

    /// Run every key handler whose prefix matches `raw`.
    fn run_key_handlers(&mut self, raw: &[u8]) -> Result<()> {
        let matching: Vec<u32> = self
            .handlers
            .iter()
            .filter(|h| raw.starts_with(&h.prefix))
            .map(|h| h.id)
            .collect();

        for id in matching {
            let Some(i) = self.handlers.iter().position(|h| h.id == id) else {
                continue;
            };
            let Some(mut f) = self.handlers[i].f.take() else {
                continue;
            };
            debug!(prefix = ?String::from_utf8_lossy(&self.handlers[i].prefix), "key handler");

            let result = f(self);

            if let Some(h) = self.handlers.iter_mut().find(|h| h.id == id) {
                if h.f.is_none() {
                    h.f = Some(f);
                }
            }
            result?;
        }
        Ok(())
    }
}

/// The callback slot for `kind`.
fn slot<D: Driver>(widget: &mut Widget<D>, kind: PointerKind) -> &mut Option<PointerFn<D>> {
    match kind {
        PointerKind::Click => &mut widget.on_click,
        PointerKind::Hover => &mut widget.on_hover,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

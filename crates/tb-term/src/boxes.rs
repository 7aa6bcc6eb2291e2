// SPDX-License-Identifier: MIT
//
// Box model: positioned, cached text regions.
//
// A box is a rectangle on one screen plus a widget: a draw callback that
// renders the box's content as bytes (escapes and newlines allowed) and two
// optional pointer callbacks. The engine paints the cached draw output and
// routes clicks and hovers to every box whose rectangle holds the pointer.
//
// Callbacks are boxed closures. Whatever state a widget needs is captured
// by its closures; shared state between widgets goes through `Rc<Cell<_>>`
// or `Rc<RefCell<_>>` on the caller's side.

use std::fmt;

use crate::driver::Driver;
use crate::engine::Engine;
use crate::error::Result;

// ─── Geometry ───────────────────────────────────────────────────────────────

/// A rectangle in terminal cell coordinates.
///
/// Sizes are not validated; zero or negative extents simply describe very
/// small (or inverted) regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Whether (`x`, `y`) lies in the rectangle, far edges included.
    ///
    /// ```
    /// use tb_term::boxes::Rect;
    ///
    /// let r = Rect::new(5, 5, 3, 2);
    /// assert!(r.contains(8, 7));
    /// assert!(!r.contains(9, 5));
    /// ```
    #[must_use]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x
            && x <= self.x.saturating_add(self.w)
            && y >= self.y
            && y <= self.y.saturating_add(self.h)
    }
}

/// One coordinate of a placement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pos {
    /// An absolute cell coordinate.
    At(i32),
    /// Centered on the terminal, resolved once when the box is created.
    Center,
}

impl From<i32> for Pos {
    fn from(v: i32) -> Self {
        Self::At(v)
    }
}

/// Where a new box goes and how big it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: Pos,
    pub y: Pos,
    pub w: i32,
    pub h: i32,
}

impl Placement {
    #[must_use]
    pub fn new(x: impl Into<Pos>, y: impl Into<Pos>, w: i32, h: i32) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            w,
            h,
        }
    }

    /// A box of `w` × `h` centered on both axes.
    #[must_use]
    pub const fn centered(w: i32, h: i32) -> Self {
        Self {
            x: Pos::Center,
            y: Pos::Center,
            w,
            h,
        }
    }

    /// Resolve against a terminal of `cols` × `rows`.
    #[must_use]
    pub const fn resolve(&self, cols: i32, rows: i32) -> Rect {
        let x = match self.x {
            Pos::At(x) => x,
            Pos::Center => (cols - self.w) / 2,
        };
        let y = match self.y {
            Pos::At(y) => y,
            Pos::Center => (rows - self.h) / 2,
        };
        Rect::new(x, y, self.w, self.h)
    }
}

// ─── Identity ───────────────────────────────────────────────────────────────

/// Engine-assigned box identifier. Never reused within one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BoxId(pub(crate) u32);

impl BoxId {
    /// The raw counter value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Read-only view of a box, handed to callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxInfo {
    pub id: BoxId,
    pub rect: Rect,
    pub screen: u32,
}

/// Pointer state delivered with a click or hover.
///
/// Coordinates are in box space: the scroll offset has already been taken
/// out of `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pointer {
    pub x: i32,
    pub y: i32,
    /// Whether the left button is held.
    pub down: bool,
}

// ─── Widget ─────────────────────────────────────────────────────────────────

/// Renders a box's content.
pub type DrawFn = Box<dyn FnMut(&BoxInfo) -> Vec<u8>>;

/// Reacts to a pointer over a box.
pub type PointerFn<D> = Box<dyn FnMut(&mut Engine<D>, &BoxInfo, Pointer) -> Result<()>>;

/// A box's behavior: how it draws and how it reacts.
pub struct Widget<D: Driver> {
    pub(crate) draw: DrawFn,
    pub(crate) on_click: Option<PointerFn<D>>,
    pub(crate) on_hover: Option<PointerFn<D>>,
}

impl<D: Driver> Widget<D> {
    /// A widget drawn by `draw`, inert to the pointer.
    pub fn new(draw: impl FnMut(&BoxInfo) -> Vec<u8> + 'static) -> Self {
        Self {
            draw: Box::new(draw),
            on_click: None,
            on_hover: None,
        }
    }

    /// A widget that always draws the same bytes.
    pub fn text(content: impl Into<Vec<u8>>) -> Self {
        let content = content.into();
        Self::new(move |_| content.clone())
    }

    /// Builder: react to left-button presses.
    #[must_use]
    pub fn on_click(
        mut self,
        f: impl FnMut(&mut Engine<D>, &BoxInfo, Pointer) -> Result<()> + 'static,
    ) -> Self {
        self.on_click = Some(Box::new(f));
        self
    }

    /// Builder: react to pointer motion.
    #[must_use]
    pub fn on_hover(
        mut self,
        f: impl FnMut(&mut Engine<D>, &BoxInfo, Pointer) -> Result<()> + 'static,
    ) -> Self {
        self.on_hover = Some(Box::new(f));
        self
    }

    /// Whether a click callback is attached.
    #[must_use]
    pub const fn has_click(&self) -> bool {
        self.on_click.is_some()
    }

    /// Whether a hover callback is attached.
    #[must_use]
    pub const fn has_hover(&self) -> bool {
        self.on_hover.is_some()
    }
}

impl<D: Driver> fmt::Debug for Widget<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Widget")
            .field("on_click", &self.on_click.is_some())
            .field("on_hover", &self.on_hover.is_some())
            .finish_non_exhaustive()
    }
}

// ─── UiBox ──────────────────────────────────────────────────────────────────

/// A box owned by the engine.
#[derive(Debug)]
pub struct UiBox<D: Driver> {
    pub(crate) id: BoxId,
    pub(crate) rect: Rect,
    pub(crate) screen: u32,
    pub(crate) cache: Vec<u8>,
    pub(crate) widget: Widget<D>,
}

impl<D: Driver> UiBox<D> {
    /// Create a box and render its initial cache.
    pub(crate) fn new(id: BoxId, rect: Rect, screen: u32, mut widget: Widget<D>) -> Self {
        let info = BoxInfo { id, rect, screen };
        let cache = (widget.draw)(&info);
        Self {
            id,
            rect,
            screen,
            cache,
            widget,
        }
    }

    #[must_use]
    pub const fn id(&self) -> BoxId {
        self.id
    }

    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    #[must_use]
    pub const fn screen(&self) -> u32 {
        self.screen
    }

    /// The last rendered content.
    #[must_use]
    pub fn cache(&self) -> &[u8] {
        &self.cache
    }

    #[must_use]
    pub const fn widget(&self) -> &Widget<D> {
        &self.widget
    }

    /// The view handed to callbacks.
    #[must_use]
    pub const fn info(&self) -> BoxInfo {
        BoxInfo {
            id: self.id,
            rect: self.rect,
            screen: self.screen,
        }
    }

    /// Whether (`x`, `y`) falls on this box.
    #[must_use]
    pub const fn hit_test(&self, x: i32, y: i32) -> bool {
        self.rect.contains(x, y)
    }

    /// Re-run the draw callback into the cache.
    pub(crate) fn redraw(&mut self) {
        let info = self.info();
        self.cache = (self.widget.draw)(&info);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

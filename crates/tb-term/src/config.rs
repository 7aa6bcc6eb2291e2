// SPDX-License-Identifier: MIT
//
// Engine configuration.

/// Tunables for an [`Engine`](crate::engine::Engine).
///
/// The defaults match what the demos expect: wheel scrolling on, two rows
/// per notch, starting on screen 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Whether wheel reports move the scroll offset (and the offset is
    /// applied to drawing and hit-testing).
    pub scroll_enabled: bool,

    /// Rows added or removed per wheel notch.
    pub scroll_step: i32,

    /// Screen active when the engine starts.
    pub initial_screen: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scroll_enabled: true,
            scroll_step: 2,
            initial_screen: 0,
        }
    }
}

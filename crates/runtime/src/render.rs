//! Drawing seam between states and the presentation backend.
//!
//! States describe a frame through [`Surface`] calls; what a backend does
//! with them (blit sprites, print to a terminal, record for assertions) is
//! its own business. The engine ships two trivial implementations.

use jrpg_core::Rect;

/// One frame's drawing target.
pub trait Surface {
    /// Wipes the frame, naming the background resource to paint under it.
    fn clear(&mut self, background: &str);

    /// Draws a filled rectangle tagged with a style name ("collider",
    /// "avatar", "window", ...).
    fn fill_rect(&mut self, rect: Rect, style: &str);

    /// Draws a line of text at pixel coordinates.
    fn draw_text(&mut self, x: i32, y: i32, text: &str);
}

/// Discards every draw call. Used by headless runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn clear(&mut self, _background: &str) {}
    fn fill_rect(&mut self, _rect: Rect, _style: &str) {}
    fn draw_text(&mut self, _x: i32, _y: i32, _text: &str) {}
}

/// Records draw calls for assertions in tests.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    pub background: String,
    pub rects: Vec<(Rect, String)>,
    pub texts: Vec<String>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when some drawn text contains the needle.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts.iter().any(|t| t.contains(needle))
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, background: &str) {
        self.background = background.to_string();
        self.rects.clear();
        self.texts.clear();
    }

    fn fill_rect(&mut self, rect: Rect, style: &str) {
        self.rects.push((rect, style.to_string()));
    }

    fn draw_text(&mut self, _x: i32, _y: i32, text: &str) {
        self.texts.push(text.to_string());
    }
}

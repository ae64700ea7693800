//! Minimal widget kit: selection menus and windows.

use jrpg_core::Rect;

use crate::input::{Button, InputEvent};
use crate::render::Surface;

const LINE_HEIGHT: i32 = 20;
const PADDING: i32 = 8;

/// Vertical selection list over (id, label) entries.
///
/// The cursor wraps at both ends. Ids are stable handles for the caller;
/// labels are what gets drawn.
#[derive(Clone, Debug)]
pub struct Menu {
    entries: Vec<(String, String)>,
    cursor: usize,
}

impl Menu {
    pub fn new(entries: Vec<(String, String)>) -> Self {
        debug_assert!(!entries.is_empty(), "a menu needs at least one entry");
        Self { entries, cursor: 0 }
    }

    /// Builds a menu whose ids are the element indices.
    pub fn from_labels<S: std::fmt::Display>(labels: impl IntoIterator<Item = S>) -> Self {
        Self::new(
            labels
                .into_iter()
                .enumerate()
                .map(|(i, label)| (i.to_string(), label.to_string()))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected_id(&self) -> &str {
        &self.entries[self.cursor].0
    }

    /// Moves the cursor for a navigation press; other input is ignored.
    pub fn navigate(&mut self, input: &InputEvent) {
        match input {
            InputEvent::Press(Button::Up) => {
                self.cursor = self.cursor.checked_sub(1).unwrap_or(self.entries.len() - 1);
            }
            InputEvent::Press(Button::Down) => {
                self.cursor = (self.cursor + 1) % self.entries.len();
            }
            _ => {}
        }
    }
}

/// A framed box with a title, free lines, and optionally an embedded menu.
///
/// The window owns its menu; there is no widget inheritance, composition
/// decides what a window shows.
#[derive(Clone, Debug)]
pub struct Window {
    pub rect: Rect,
    pub title: String,
    pub lines: Vec<String>,
    pub menu: Option<Menu>,
}

impl Window {
    pub fn new(rect: Rect, title: impl Into<String>) -> Self {
        Self {
            rect,
            title: title.into(),
            lines: Vec::new(),
            menu: None,
        }
    }

    pub fn with_lines(mut self, lines: Vec<String>) -> Self {
        self.lines = lines;
        self
    }

    pub fn with_menu(mut self, menu: Menu) -> Self {
        self.menu = Some(menu);
        self
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.fill_rect(self.rect, "window");
        let mut y = self.rect.y + PADDING;
        if !self.title.is_empty() {
            surface.draw_text(self.rect.x + PADDING, y, &self.title);
            y += LINE_HEIGHT;
        }
        for line in &self.lines {
            surface.draw_text(self.rect.x + PADDING, y, line);
            y += LINE_HEIGHT;
        }
        if let Some(menu) = &self.menu {
            for (i, (_, label)) in menu.entries.iter().enumerate() {
                let marker = if i == menu.cursor { "> " } else { "  " };
                surface.draw_text(self.rect.x + PADDING, y, &format!("{marker}{label}"));
                y += LINE_HEIGHT;
            }
        }
    }
}

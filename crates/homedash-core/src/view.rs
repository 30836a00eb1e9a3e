//! Per-mount view state.
//!
//! Everything here lives only for the lifetime of the mounted widget and
//! is deliberately kept apart from the persisted [`WidgetConfig`]: the
//! search term, which categories are collapsed, and the tile cursor.
//!
//! [`WidgetConfig`]: crate::config::WidgetConfig

use std::collections::HashSet;

/// Mutable view state passed into the render function.
#[derive(Debug, Default, Clone)]
pub struct ViewState {
    /// Current free-text search term.
    pub search_term: String,
    /// Category names currently collapsed.
    collapsed: HashSet<String>,
    /// Cursor position within the flattened visible item list.
    pub cursor: usize,
}

impl ViewState {
    /// Creates an empty view state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the collapsed flag for a category.
    pub fn toggle_category(&mut self, category: &str) {
        if !self.collapsed.remove(category) {
            self.collapsed.insert(category.to_string());
        }
    }

    /// True when the category is collapsed.
    #[must_use]
    pub fn is_collapsed(&self, category: &str) -> bool {
        self.collapsed.contains(category)
    }

    /// Moves the cursor up, saturating at the first tile.
    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Moves the cursor down within `visible_len` tiles.
    pub fn cursor_down(&mut self, visible_len: usize) {
        if self.cursor + 1 < visible_len {
            self.cursor += 1;
        }
    }

    /// Clamps the cursor after the visible set shrank.
    pub fn clamp_cursor(&mut self, visible_len: usize) {
        if visible_len == 0 {
            self.cursor = 0;
        } else if self.cursor >= visible_len {
            self.cursor = visible_len - 1;
        }
    }
}

use crate::types::{Pt, Rect};

/// Vertical cursor over a page's content rect. The layout advances it one
/// line at a time and asks whether the next line still fits before drawing.
pub struct Frame {
    rect: Rect,
    cursor_y: Pt,
}

impl Frame {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            cursor_y: Pt::ZERO,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Absolute y of the cursor on the page (top-left origin).
    pub fn y(&self) -> Pt {
        self.rect.y + self.cursor_y
    }

    pub fn remaining_height(&self) -> Pt {
        (self.rect.height - self.cursor_y).max(Pt::ZERO)
    }

    pub fn fits(&self, height: Pt) -> bool {
        height <= self.remaining_height()
    }

    pub fn advance(&mut self, height: Pt) {
        self.cursor_y += height;
    }

    pub fn is_empty(&self) -> bool {
        self.cursor_y <= Pt::ZERO
    }

    pub fn reset(&mut self) {
        self.cursor_y = Pt::ZERO;
    }
}

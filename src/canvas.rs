use crate::types::{Color, Pt, Size};

/// Recorded drawing command. Coordinates are top-left origin in points; the
/// PDF writer flips them into PDF space.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetFillColor(Color),
    SetLineWidth(Pt),
    SetFontName(String),
    SetFontSize(Pt),
    /// Text run with `y` at the baseline.
    DrawString { x: Pt, y: Pt, text: String },
    MoveTo { x: Pt, y: Pt },
    LineTo { x: Pt, y: Pt },
    Stroke,
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone)]
pub struct Document {
    pub page_size: Size,
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone)]
struct GraphicsState {
    fill_color: Color,
    line_width: Pt,
    font_name: String,
    font_size: Pt,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            fill_color: Color::BLACK,
            line_width: Pt::from_f32(1.0),
            font_name: String::new(),
            font_size: Pt::from_f32(12.0),
        }
    }
}

/// Records commands into pages. State setters are deduplicated against the
/// current graphics state so repeated font/color selection stays cheap.
pub struct Canvas {
    page_size: Size,
    pages: Vec<Page>,
    current: Page,
    state: GraphicsState,
}

impl Canvas {
    pub fn new(page_size: Size) -> Self {
        Self {
            page_size,
            pages: Vec::new(),
            current: Page::default(),
            state: GraphicsState::default(),
        }
    }

    pub fn page_size(&self) -> Size {
        self.page_size
    }

    pub fn set_fill_color(&mut self, color: Color) {
        if self.state.fill_color == color {
            return;
        }
        self.state.fill_color = color;
        self.current.commands.push(Command::SetFillColor(color));
    }

    pub fn set_line_width(&mut self, width: Pt) {
        let width = width.max(Pt::ZERO);
        if self.state.line_width == width {
            return;
        }
        self.state.line_width = width;
        self.current.commands.push(Command::SetLineWidth(width));
    }

    pub fn set_font(&mut self, name: &str, size: Pt) {
        if self.state.font_name != name {
            self.state.font_name = name.to_string();
            self.current
                .commands
                .push(Command::SetFontName(name.to_string()));
        }
        if self.state.font_size != size {
            self.state.font_size = size;
            self.current.commands.push(Command::SetFontSize(size));
        }
    }

    pub fn draw_string(&mut self, x: Pt, y: Pt, text: impl Into<String>) {
        self.current.commands.push(Command::DrawString {
            x,
            y,
            text: text.into(),
        });
    }

    pub fn line(&mut self, x1: Pt, y1: Pt, x2: Pt, y2: Pt) {
        self.current.commands.push(Command::MoveTo { x: x1, y: y1 });
        self.current.commands.push(Command::LineTo { x: x2, y: y2 });
        self.current.commands.push(Command::Stroke);
    }

    /// Closes the current page and resets the graphics state, like the PDF
    /// page boundary does.
    pub fn show_page(&mut self) {
        let current = std::mem::take(&mut self.current);
        self.pages.push(current);
        self.state = GraphicsState::default();
    }

    pub fn finish(mut self) -> Document {
        if !self.current.commands.is_empty() || self.pages.is_empty() {
            self.show_page();
        }
        Document {
            page_size: self.page_size,
            pages: self.pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_flushes_the_open_page() {
        let mut canvas = Canvas::new(Size::a4());
        canvas.draw_string(Pt::from_f32(10.0), Pt::from_f32(20.0), "x");
        canvas.show_page();
        canvas.draw_string(Pt::from_f32(10.0), Pt::from_f32(20.0), "y");
        let doc = canvas.finish();
        assert_eq!(doc.pages.len(), 2);
    }

    #[test]
    fn empty_canvas_still_yields_one_page() {
        let doc = Canvas::new(Size::a4()).finish();
        assert_eq!(doc.pages.len(), 1);
        assert!(doc.pages[0].commands.is_empty());
    }

    #[test]
    fn state_setters_are_deduplicated() {
        let mut canvas = Canvas::new(Size::a4());
        canvas.set_font("PT Serif", Pt::from_f32(11.0));
        canvas.set_font("PT Serif", Pt::from_f32(11.0));
        canvas.set_fill_color(Color::BLACK);
        let doc = canvas.finish();
        let font_sets = doc.pages[0]
            .commands
            .iter()
            .filter(|c| matches!(c, Command::SetFontName(_)))
            .count();
        assert_eq!(font_sets, 1);
        // BLACK is the initial state, so no fill command is recorded.
        assert!(
            !doc.pages[0]
                .commands
                .iter()
                .any(|c| matches!(c, Command::SetFillColor(_)))
        );
    }

    #[test]
    fn show_page_resets_graphics_state() {
        let mut canvas = Canvas::new(Size::a4());
        canvas.set_font("PT Serif", Pt::from_f32(11.0));
        canvas.show_page();
        canvas.set_font("PT Serif", Pt::from_f32(11.0));
        let doc = canvas.finish();
        assert!(
            doc.pages[1]
                .commands
                .iter()
                .any(|c| matches!(c, Command::SetFontName(_)))
        );
    }
}

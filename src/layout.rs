use crate::canvas::{Canvas, Document};
use crate::contract::{Block, ContractDocument, SignatureBlock};
use crate::font::FontRegistry;
use crate::format::NBSP;
use crate::frame::Frame;
use crate::types::{Color, Margins, Pt, Rect, Size};

/// Logical faces the contract is set in. The names resolve against the font
/// registry; unregistered names fall back to base-14 metrics and fonts.
#[derive(Debug, Clone, PartialEq)]
pub struct FontFaces {
    pub regular: String,
    pub bold: String,
}

impl Default for FontFaces {
    fn default() -> Self {
        Self {
            regular: "Helvetica".to_string(),
            bold: "Helvetica-Bold".to_string(),
        }
    }
}

const TITLE_SIZE: f32 = 16.0;
const SUBTITLE_SIZE: f32 = 12.0;
const HEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 11.0;
const SIGNATURE_SIZE: f32 = 10.0;
const CAPTION_SIZE: f32 = 8.0;

// The template historically advanced 7 mm per body line and 10 mm ahead of a
// section heading.
fn body_line() -> Pt {
    Pt::from_mm(7.0)
}

fn heading_gap() -> Pt {
    Pt::from_mm(10.0)
}

fn field_indent() -> Pt {
    Pt::from_mm(5.0)
}

fn bullet_indent() -> Pt {
    Pt::from_mm(6.0)
}

// Baseline sits three quarters into the line slot.
fn baseline(frame: &Frame, line_height: Pt) -> Pt {
    frame.y() + line_height * 0.75
}

/// Lays the contract document out into canvas pages: paragraphs word-wrapped
/// to the printable width, one fixed line height per wrapped line, and a page
/// break whenever the next line would not fit above the bottom margin.
pub fn layout_contract(
    document: &ContractDocument,
    registry: &FontRegistry,
    page_size: Size,
    margins: Margins,
    faces: &FontFaces,
) -> Document {
    let content = Rect {
        x: margins.left,
        y: margins.top,
        width: (page_size.width - margins.left - margins.right).max(Pt::ZERO),
        height: (page_size.height - margins.top - margins.bottom).max(Pt::ZERO),
    };
    let mut canvas = Canvas::new(page_size);
    let mut frame = Frame::new(content);

    for block in &document.blocks {
        match block {
            Block::Title(text) => {
                draw_centered(&mut canvas, &mut frame, registry, &faces.bold, TITLE_SIZE, text);
            }
            Block::Subtitle(text) => {
                draw_centered(
                    &mut canvas,
                    &mut frame,
                    registry,
                    &faces.regular,
                    SUBTITLE_SIZE,
                    text,
                );
            }
            Block::Heading(text) => {
                if !frame.is_empty() {
                    frame.advance(heading_gap());
                }
                draw_wrapped(
                    &mut canvas,
                    &mut frame,
                    registry,
                    &faces.bold,
                    HEADING_SIZE,
                    text,
                    Pt::ZERO,
                );
            }
            Block::Paragraph(text) => {
                draw_wrapped(
                    &mut canvas,
                    &mut frame,
                    registry,
                    &faces.regular,
                    BODY_SIZE,
                    text,
                    Pt::ZERO,
                );
            }
            Block::Field { label, value } => {
                let line = format!("{}: {}", label, value);
                draw_wrapped(
                    &mut canvas,
                    &mut frame,
                    registry,
                    &faces.regular,
                    BODY_SIZE,
                    &line,
                    field_indent(),
                );
            }
            Block::Bullet(text) => {
                let line = format!("— {}", text);
                draw_wrapped(
                    &mut canvas,
                    &mut frame,
                    registry,
                    &faces.regular,
                    BODY_SIZE,
                    &line,
                    bullet_indent(),
                );
            }
            Block::Signatures(signatures) => {
                draw_signatures(&mut canvas, &mut frame, faces, signatures);
            }
        }
    }

    canvas.finish()
}

/// Greedy word wrap against measured widths. A single word wider than the
/// line is placed on its own line rather than dropped. NBSP does not break:
/// grouped amounts like `180\u{a0}000\u{a0}₽` travel as one word.
pub(crate) fn wrap_text(
    registry: &FontRegistry,
    face: &str,
    size: Pt,
    text: &str,
    width: Pt,
) -> Vec<String> {
    let mut lines = Vec::new();
    for source_line in text.split('\n') {
        let mut current = String::new();
        for word in source_line
            .split(|c: char| c.is_whitespace() && c != NBSP)
            .filter(|word| !word.is_empty())
        {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if registry.measure_text_width(face, size, &candidate) <= width || current.is_empty() {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                current = word.to_string();
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

fn line_height_for(registry: &FontRegistry, face: &str, size: Pt) -> Pt {
    registry.line_height(face, size, body_line())
}

fn break_page(canvas: &mut Canvas, frame: &mut Frame) {
    tracing::debug!(page_done = true, "starting a new contract page");
    canvas.show_page();
    frame.reset();
}

fn ensure_fits(canvas: &mut Canvas, frame: &mut Frame, height: Pt) {
    if !frame.fits(height) && !frame.is_empty() {
        break_page(canvas, frame);
    }
}

fn draw_centered(
    canvas: &mut Canvas,
    frame: &mut Frame,
    registry: &FontRegistry,
    face: &str,
    size: f32,
    text: &str,
) {
    let size = Pt::from_f32(size);
    let line_height = line_height_for(registry, face, size);
    ensure_fits(canvas, frame, line_height);
    let text_width = registry.measure_text_width(face, size, text);
    let x = frame.rect().x + ((frame.rect().width - text_width).max(Pt::ZERO)) / 2;
    canvas.set_font(face, size);
    canvas.draw_string(x, baseline(frame, line_height), text);
    frame.advance(line_height);
}

fn draw_wrapped(
    canvas: &mut Canvas,
    frame: &mut Frame,
    registry: &FontRegistry,
    face: &str,
    size: f32,
    text: &str,
    indent: Pt,
) {
    let size = Pt::from_f32(size);
    let line_height = line_height_for(registry, face, size);
    let width = (frame.rect().width - indent).max(Pt::ZERO);
    let x = frame.rect().x + indent;
    canvas.set_font(face, size);
    for line in wrap_text(registry, face, size, text, width) {
        ensure_fits(canvas, frame, line_height);
        // Font state resets at page boundaries.
        canvas.set_font(face, size);
        canvas.draw_string(x, baseline(frame, line_height), line);
        frame.advance(line_height);
    }
}

fn draw_signatures(
    canvas: &mut Canvas,
    frame: &mut Frame,
    faces: &FontFaces,
    signatures: &SignatureBlock,
) {
    let line_height = body_line();
    let detail_lines = signatures.left.lines.len().max(signatures.right.lines.len());
    // Role line, detail lines, a gap before the rule, the rule, the caption.
    let block_height = line_height * (detail_lines as i32 + 2) + Pt::from_mm(8.0) + line_height;
    if !frame.fits(block_height) && !frame.is_empty() {
        break_page(canvas, frame);
    }
    frame.advance(line_height);

    let column_gap = Pt::from_mm(10.0);
    let column_width = (frame.rect().width - column_gap) / 2;
    let left_x = frame.rect().x;
    let right_x = frame.rect().x + column_width + column_gap;
    let rule_width = column_width.min(Pt::from_mm(60.0));
    let top = frame.y();

    for (party, x) in [(&signatures.left, left_x), (&signatures.right, right_x)] {
        let mut y = top;
        canvas.set_font(&faces.bold, Pt::from_f32(BODY_SIZE));
        canvas.draw_string(x, y + line_height * 0.75, &party.role);
        y += line_height;
        canvas.set_font(&faces.regular, Pt::from_f32(SIGNATURE_SIZE));
        for line in &party.lines {
            canvas.draw_string(x, y + line_height * 0.75, line);
            y += line_height;
        }
        y = top + line_height * (detail_lines as i32 + 1) + Pt::from_mm(8.0);
        canvas.set_line_width(Pt::from_f32(0.5));
        canvas.line(x, y, x + rule_width, y);
        canvas.set_font(&faces.regular, Pt::from_f32(CAPTION_SIZE));
        canvas.set_fill_color(Color::gray(0.4));
        canvas.draw_string(x, y + Pt::from_mm(4.0), &party.caption);
        canvas.set_fill_color(Color::BLACK);
    }

    frame.advance(block_height);
}

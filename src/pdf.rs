//! Serializes a recorded [`canvas::Document`](crate::canvas::Document) into
//! PDF bytes with `lopdf`.
//!
//! Registered fonts are embedded as Type0/Identity-H composite fonts with the
//! full font program, a width array for the glyphs actually used, and a
//! ToUnicode CMap so text stays extractable. Font names with no registered
//! face fall back to the base-14 Helvetica family; text drawn with a fallback
//! face degrades non-ASCII characters to `?`.

use std::collections::BTreeMap;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document as PdfDocument, Object, ObjectId, Stream, StringFormat, dictionary};

use crate::canvas::{Command, Document, Page};
use crate::error::LeaseGenError;
use crate::font::FontRegistry;

enum FontKind {
    /// Registered face, embedded as Type0/Identity-H.
    Embedded,
    /// Base-14 simple font, named by its PDF BaseFont.
    Builtin(&'static str),
}

struct UsedFont {
    resource: Vec<u8>,
    kind: FontKind,
    /// Glyphs drawn with this font, gid to source character.
    glyphs: BTreeMap<u16, char>,
}

/// Writes the document to finished PDF bytes.
pub(crate) fn write_document(
    document: &Document,
    registry: &FontRegistry,
) -> Result<Vec<u8>, LeaseGenError> {
    let mut doc = PdfDocument::with_version("1.5");
    let fonts = collect_fonts(document, registry);

    let mut font_dict = Dictionary::new();
    for (name, used) in &fonts {
        let font_ref = match used.kind {
            FontKind::Builtin(base) => doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => base,
                "Encoding" => "WinAnsiEncoding",
            }),
            FontKind::Embedded => embed_font(&mut doc, registry, name, &used.glyphs)?,
        };
        font_dict.set(used.resource.clone(), Object::Reference(font_ref));
    }
    let resources_id = doc.add_object(dictionary! {
        "Font" => Object::Dictionary(font_dict),
    });

    let page_width = document.page_size.width.to_f32();
    let page_height = document.page_size.height.to_f32();

    let pages_id = doc.new_object_id();
    let mut kids = Vec::new();
    for page in &document.pages {
        let content = page_content(page, &fonts, registry, page_height);
        let encoded = content.encode()?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "Resources" => Object::Reference(resources_id),
            "Contents" => Object::Reference(content_id),
        });
        kids.push(Object::Reference(page_id));
    }
    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                Object::Real(page_width),
                Object::Real(page_height),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buf = Vec::new();
    doc.save_to(&mut buf)?;
    Ok(buf)
}

/// Walks every page and assigns a resource name to each distinct font,
/// recording which glyphs registered fonts actually draw.
fn collect_fonts(document: &Document, registry: &FontRegistry) -> BTreeMap<String, UsedFont> {
    let mut fonts: BTreeMap<String, UsedFont> = BTreeMap::new();
    let mut next = 1usize;
    let mut current = String::new();
    for page in &document.pages {
        for command in &page.commands {
            match command {
                Command::SetFontName(name) => current = name.clone(),
                Command::DrawString { text, .. } => {
                    let entry = fonts.entry(current.clone()).or_insert_with(|| {
                        let kind = if registry.is_registered(&current) {
                            FontKind::Embedded
                        } else {
                            FontKind::Builtin(builtin_base_font(&current))
                        };
                        let resource = format!("F{next}").into_bytes();
                        next += 1;
                        UsedFont {
                            resource,
                            kind,
                            glyphs: BTreeMap::new(),
                        }
                    });
                    if matches!(entry.kind, FontKind::Embedded) {
                        for ch in text.chars() {
                            let gid = registry.glyph_id_for_char(&current, ch);
                            entry.glyphs.insert(gid, ch);
                        }
                    }
                }
                _ => {}
            }
        }
    }
    fonts
}

fn builtin_base_font(name: &str) -> &'static str {
    if name.to_ascii_lowercase().contains("bold") {
        "Helvetica-Bold"
    } else {
        "Helvetica"
    }
}

fn embed_font(
    doc: &mut PdfDocument,
    registry: &FontRegistry,
    name: &str,
    glyphs: &BTreeMap<u16, char>,
) -> Result<ObjectId, LeaseGenError> {
    let font = registry.resolve(name).ok_or_else(|| {
        LeaseGenError::Font(format!("font {name:?} disappeared from the registry"))
    })?;
    let metrics = &font.metrics;
    let upem = i64::from(metrics.units_per_em.max(1));
    // FontDescriptor and W values live in 1000-per-em glyph space.
    let scale = |v: i64| v * 1000 / upem;

    let font_file_id = doc.add_object(Stream::new(
        dictionary! { "Length1" => font.data.len() as i64 },
        font.data.clone(),
    ));

    let base_name = sanitize_font_name(name);
    let descriptor_id = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => Object::Name(base_name.clone().into_bytes()),
        "Flags" => 32,
        "FontBBox" => vec![
            scale(i64::from(metrics.bbox.0)).into(),
            scale(i64::from(metrics.bbox.1)).into(),
            scale(i64::from(metrics.bbox.2)).into(),
            scale(i64::from(metrics.bbox.3)).into(),
        ],
        "ItalicAngle" => 0,
        "Ascent" => scale(i64::from(metrics.ascent)),
        "Descent" => scale(i64::from(metrics.descent)),
        "CapHeight" => scale(i64::from(metrics.cap_height)),
        "StemV" => 80,
        "MissingWidth" => scale(i64::from(metrics.missing_width)),
        "FontFile2" => Object::Reference(font_file_id),
    });

    let mut widths: Vec<Object> = Vec::with_capacity(glyphs.len() * 2);
    for &gid in glyphs.keys() {
        let advance = i64::from(registry.glyph_advance_units(name, gid));
        widths.push(Object::Integer(i64::from(gid)));
        widths.push(Object::Array(vec![Object::Integer(scale(advance))]));
    }

    let cid_font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => Object::Name(base_name.clone().into_bytes()),
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0,
        },
        "FontDescriptor" => Object::Reference(descriptor_id),
        "W" => Object::Array(widths),
        "DW" => scale(i64::from(metrics.missing_width)),
        "CIDToGIDMap" => "Identity",
    });

    let to_unicode_id = doc.add_object(Stream::new(
        dictionary! {},
        to_unicode_cmap(glyphs).into_bytes(),
    ));

    Ok(doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => Object::Name(base_name.into_bytes()),
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![Object::Reference(cid_font_id)],
        "ToUnicode" => Object::Reference(to_unicode_id),
    }))
}

fn sanitize_font_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '+')
        .collect();
    if cleaned.is_empty() {
        "Font".to_string()
    } else {
        cleaned
    }
}

fn to_unicode_cmap(glyphs: &BTreeMap<u16, char>) -> String {
    let mut out = String::new();
    out.push_str("/CIDInit /ProcSet findresource begin\n");
    out.push_str("12 dict begin\n");
    out.push_str("begincmap\n");
    out.push_str("/CIDSystemInfo << /Registry (Adobe) /Ordering (Identity) /Supplement 0 >> def\n");
    out.push_str("/CMapName /Adobe-Identity-UCS def\n");
    out.push_str("/CMapType 2 def\n");
    out.push_str("1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n");

    let entries: Vec<(u16, char)> = glyphs.iter().map(|(g, c)| (*g, *c)).collect();
    let mut idx = 0usize;
    while idx < entries.len() {
        let end = (idx + 100).min(entries.len());
        out.push_str(&format!("{} beginbfchar\n", end - idx));
        for (gid, ch) in &entries[idx..end] {
            let code = *ch as u32;
            let mut uni = String::new();
            if code <= 0xFFFF {
                uni.push_str(&format!("{code:04X}"));
            } else {
                let code = code - 0x1_0000;
                let high = 0xD800 | (code >> 10);
                let low = 0xDC00 | (code & 0x3FF);
                uni.push_str(&format!("{high:04X}{low:04X}"));
            }
            out.push_str(&format!("<{gid:04X}> <{uni}>\n"));
        }
        out.push_str("endbfchar\n");
        idx = end;
    }

    out.push_str("endcmap\n");
    out.push_str("CMapName currentdict /CMap defineresource pop\n");
    out.push_str("end\nend\n");
    out
}

fn page_content(
    page: &Page,
    fonts: &BTreeMap<String, UsedFont>,
    registry: &FontRegistry,
    page_height: f32,
) -> Content {
    let mut operations = Vec::new();
    let mut font_name = String::new();
    let mut font_size = 12.0f32;
    // Canvas records with a top-left origin; PDF text space grows upward.
    let flip = |y: crate::types::Pt| page_height - y.to_f32();

    for command in &page.commands {
        match command {
            Command::SetFillColor(color) => operations.push(Operation::new(
                "rg",
                vec![
                    Object::Real(color.r),
                    Object::Real(color.g),
                    Object::Real(color.b),
                ],
            )),
            Command::SetLineWidth(width) => {
                operations.push(Operation::new("w", vec![Object::Real(width.to_f32())]));
            }
            Command::SetFontName(name) => font_name = name.clone(),
            Command::SetFontSize(size) => font_size = size.to_f32(),
            Command::DrawString { x, y, text } => {
                let Some(used) = fonts.get(&font_name) else {
                    continue;
                };
                let run = encode_run(&used.kind, registry, &font_name, text);
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new(
                    "Tf",
                    vec![Object::Name(used.resource.clone()), Object::Real(font_size)],
                ));
                operations.push(Operation::new(
                    "Td",
                    vec![Object::Real(x.to_f32()), Object::Real(flip(*y))],
                ));
                operations.push(Operation::new("Tj", vec![run]));
                operations.push(Operation::new("ET", vec![]));
            }
            Command::MoveTo { x, y } => operations.push(Operation::new(
                "m",
                vec![Object::Real(x.to_f32()), Object::Real(flip(*y))],
            )),
            Command::LineTo { x, y } => operations.push(Operation::new(
                "l",
                vec![Object::Real(x.to_f32()), Object::Real(flip(*y))],
            )),
            Command::Stroke => operations.push(Operation::new("S", vec![])),
        }
    }
    Content { operations }
}

fn encode_run(kind: &FontKind, registry: &FontRegistry, font_name: &str, text: &str) -> Object {
    match kind {
        FontKind::Embedded => {
            let mut bytes = Vec::with_capacity(text.len() * 2);
            for ch in text.chars() {
                let gid = registry.glyph_id_for_char(font_name, ch);
                bytes.extend_from_slice(&gid.to_be_bytes());
            }
            Object::String(bytes, StringFormat::Hexadecimal)
        }
        FontKind::Builtin(_) => {
            let degraded: String = text
                .chars()
                .map(|ch| if ch.is_ascii() { ch } else { '?' })
                .collect();
            Object::string_literal(degraded)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::types::{Pt, Size};

    fn two_page_canvas() -> Document {
        let mut canvas = Canvas::new(Size::a4());
        canvas.set_font("Helvetica", Pt::from_f32(12.0));
        canvas.draw_string(Pt::from_f32(56.7), Pt::from_f32(80.0), "Page one");
        canvas.show_page();
        canvas.set_font("Helvetica", Pt::from_f32(12.0));
        canvas.draw_string(Pt::from_f32(56.7), Pt::from_f32(80.0), "Page two");
        canvas.finish()
    }

    #[test]
    fn one_pdf_page_per_canvas_page() {
        let registry = FontRegistry::new();
        let bytes = write_document(&two_page_canvas(), &registry).unwrap();
        let doc = PdfDocument::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn unregistered_font_falls_back_to_builtin_and_degrades_text() {
        let mut canvas = Canvas::new(Size::a4());
        canvas.set_font("PT Sans", Pt::from_f32(11.0));
        canvas.draw_string(Pt::from_f32(60.0), Pt::from_f32(100.0), "Договор N5");
        let registry = FontRegistry::new();
        let bytes = write_document(&canvas.finish(), &registry).unwrap();

        let doc = PdfDocument::load_mem(&bytes).unwrap();
        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
        let runs: Vec<String> = content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| match &op.operands[0] {
                Object::String(bytes, _) => Some(String::from_utf8_lossy(bytes).into_owned()),
                _ => None,
            })
            .collect();
        assert_eq!(runs, vec!["??????? N5".to_string()]);
    }

    #[test]
    fn lines_are_stroked_in_flipped_coordinates() {
        let mut canvas = Canvas::new(Size::a4());
        canvas.line(
            Pt::from_f32(50.0),
            Pt::from_f32(700.0),
            Pt::from_f32(150.0),
            Pt::from_f32(700.0),
        );
        let registry = FontRegistry::new();
        let bytes = write_document(&canvas.finish(), &registry).unwrap();

        let doc = PdfDocument::load_mem(&bytes).unwrap();
        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
        let move_to = content
            .operations
            .iter()
            .find(|op| op.operator == "m")
            .unwrap();
        let y = match move_to.operands[1] {
            Object::Real(y) => y,
            _ => panic!("expected a real operand"),
        };
        let expected = Size::a4().height.to_f32() - 700.0;
        assert!((y - expected).abs() < 0.01);
        assert!(content.operations.iter().any(|op| op.operator == "S"));
    }

    #[test]
    fn font_resources_are_shared_across_pages() {
        let registry = FontRegistry::new();
        let fonts = collect_fonts(&two_page_canvas(), &registry);
        assert_eq!(fonts.len(), 1);
        assert_eq!(fonts["Helvetica"].resource, b"F1".to_vec());
    }
}

use crate::error::LeaseGenError;
use crate::types::Pt;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TextWidthKey {
    font_index: usize,
    size_milli: i64,
    text: String,
}

#[derive(Debug)]
pub(crate) struct FontMetrics {
    pub(crate) units_per_em: u16,
    pub(crate) ascent: i16,
    pub(crate) descent: i16,
    pub(crate) line_gap: i16,
    pub(crate) cap_height: i16,
    pub(crate) bbox: (i16, i16, i16, i16),
    pub(crate) missing_width: u16,
}

#[derive(Debug)]
pub(crate) struct RegisteredFont {
    pub(crate) name: String,
    pub(crate) data: Vec<u8>,
    pub(crate) metrics: FontMetrics,
}

impl RegisteredFont {
    fn scale(&self, font_size: Pt) -> f32 {
        if self.metrics.units_per_em == 0 {
            0.0
        } else {
            font_size.to_f32() / self.metrics.units_per_em as f32
        }
    }

    fn line_height(&self, font_size: Pt) -> Pt {
        let units = self.metrics.ascent as i32 - self.metrics.descent as i32
            + self.metrics.line_gap as i32;
        Pt::from_f32(units as f32 * self.scale(font_size))
    }
}

/// Registered font faces resolved by normalized name. Names without a
/// registered face measure at a 0.6 em estimate, so layout stays usable in
/// environments without font assets (the PDF writer then falls back to a
/// base-14 font).
#[derive(Debug)]
pub struct FontRegistry {
    fonts: Vec<RegisteredFont>,
    lookup: HashMap<String, usize>,
    text_width_cache: Mutex<HashMap<TextWidthKey, Pt>>,
}

const TEXT_WIDTH_CACHE_MAX: usize = 20_000;

impl FontRegistry {
    pub fn new() -> Self {
        Self {
            fonts: Vec::new(),
            lookup: HashMap::new(),
            text_width_cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn register_dir(&mut self, path: impl AsRef<Path>) {
        let Ok(entries) = fs::read_dir(path.as_ref()) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() {
                self.register_file(path);
            }
        }
    }

    /// Registers a TTF/OTF file. Unreadable or unparseable files are skipped.
    pub fn register_file(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let Some(ext) = path.extension().and_then(|v| v.to_str()) else {
            return;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" {
            return;
        }
        let Ok(data) = fs::read(path) else {
            return;
        };
        let _ = self.register_bytes(data, path.file_stem().and_then(|v| v.to_str()));
    }

    /// Registers an in-memory font program and returns its primary name.
    pub fn register_bytes(
        &mut self,
        data: Vec<u8>,
        source_name: Option<&str>,
    ) -> Result<String, LeaseGenError> {
        let source = source_name.unwrap_or("EmbeddedFont");
        let Ok(face) = ttf_parser::Face::parse(&data, 0) else {
            return Err(LeaseGenError::Font(format!(
                "invalid font data for {source}"
            )));
        };

        let (name, aliases) = font_names(&face, source);
        let metrics = metrics_from_face(&face);
        let index = self.fonts.len();
        self.fonts.push(RegisteredFont {
            name: name.clone(),
            data,
            metrics,
        });

        for alias in std::iter::once(name.clone()).chain(aliases) {
            let key = normalize_name(&alias);
            if key.is_empty() || self.lookup.contains_key(&key) {
                continue;
            }
            self.lookup.insert(key, index);
        }

        Ok(name)
    }

    pub(crate) fn resolve(&self, name: &str) -> Option<&RegisteredFont> {
        self.lookup
            .get(&normalize_name(name))
            .and_then(|index| self.fonts.get(*index))
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    pub fn measure_text_width(&self, name: &str, font_size: Pt, text: &str) -> Pt {
        let Some(index) = self.lookup.get(&normalize_name(name)).copied() else {
            return estimate_width(font_size, text);
        };
        let cache_key = TextWidthKey {
            font_index: index,
            size_milli: font_size.to_milli_i64(),
            text: text.to_string(),
        };
        if let Ok(cache) = self.text_width_cache.lock() {
            if let Some(value) = cache.get(&cache_key) {
                return *value;
            }
        }
        let Some(font) = self.fonts.get(index) else {
            return estimate_width(font_size, text);
        };
        let value =
            measure_with_face(font, font_size, text).unwrap_or_else(|| estimate_width(font_size, text));
        if let Ok(mut cache) = self.text_width_cache.lock() {
            if cache.len() >= TEXT_WIDTH_CACHE_MAX {
                cache.clear();
            }
            cache.insert(cache_key, value);
        }
        value
    }

    pub fn line_height(&self, name: &str, font_size: Pt, fallback: Pt) -> Pt {
        let Some(font) = self.resolve(name) else {
            return fallback;
        };
        font.line_height(font_size).max(fallback)
    }

    pub(crate) fn glyph_id_for_char(&self, name: &str, ch: char) -> u16 {
        let Some(font) = self.resolve(name) else {
            return 0;
        };
        let Ok(face) = ttf_parser::Face::parse(&font.data, 0) else {
            return 0;
        };
        face.glyph_index(ch).map(|gid| gid.0).unwrap_or(0)
    }

    /// Advance of a glyph in font units, for CID width arrays.
    pub(crate) fn glyph_advance_units(&self, name: &str, gid: u16) -> u16 {
        let Some(font) = self.resolve(name) else {
            return 0;
        };
        let Ok(face) = ttf_parser::Face::parse(&font.data, 0) else {
            return 0;
        };
        face.glyph_hor_advance(ttf_parser::GlyphId(gid))
            .unwrap_or(font.metrics.missing_width)
    }
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn estimate_width(font_size: Pt, text: &str) -> Pt {
    let char_width = (font_size * 0.6).max(Pt::from_f32(1.0));
    char_width * (text.chars().count() as i32)
}

fn measure_with_face(font: &RegisteredFont, font_size: Pt, text: &str) -> Option<Pt> {
    let face = ttf_parser::Face::parse(&font.data, 0).ok()?;
    let scale = font.scale(font_size);
    let mut units: i64 = 0;
    for ch in text.chars() {
        let advance = match face.glyph_index(ch) {
            Some(gid) => face
                .glyph_hor_advance(gid)
                .unwrap_or(font.metrics.missing_width),
            None => font.metrics.missing_width,
        };
        units += advance as i64;
    }
    Some(Pt::from_f32(units as f32 * scale))
}

fn metrics_from_face(face: &ttf_parser::Face<'_>) -> FontMetrics {
    let bbox = face.global_bounding_box();
    let missing_width = face
        .glyph_hor_advance(ttf_parser::GlyphId(0))
        .unwrap_or(face.units_per_em() / 2);
    FontMetrics {
        units_per_em: face.units_per_em(),
        ascent: face.ascender(),
        descent: face.descender(),
        line_gap: face.line_gap(),
        cap_height: face.capital_height().unwrap_or(face.ascender()),
        bbox: (bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max),
        missing_width,
    }
}

fn font_names(face: &ttf_parser::Face<'_>, source: &str) -> (String, Vec<String>) {
    let mut family = None;
    let mut aliases = Vec::new();
    for name in face.names() {
        let Some(value) = name.to_string() else {
            continue;
        };
        match name.name_id {
            ttf_parser::name_id::FAMILY if family.is_none() => family = Some(value),
            ttf_parser::name_id::FULL_NAME | ttf_parser::name_id::POST_SCRIPT_NAME => {
                aliases.push(value)
            }
            _ => {}
        }
    }
    let primary = family.unwrap_or_else(|| source.to_string());
    (primary, aliases)
}

fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unregistered_font_measures_at_estimate() {
        let registry = FontRegistry::new();
        let width = registry.measure_text_width("PT Serif", Pt::from_f32(10.0), "абвгд");
        // 5 chars at 6pt estimate each.
        assert_eq!(width.to_milli_i64(), 30_000);
    }

    #[test]
    fn estimate_never_collapses_below_one_point_per_char() {
        let registry = FontRegistry::new();
        let width = registry.measure_text_width("x", Pt::from_f32(0.5), "ab");
        assert_eq!(width.to_milli_i64(), 2_000);
    }

    #[test]
    fn line_height_falls_back_without_a_face() {
        let registry = FontRegistry::new();
        let fallback = Pt::from_f32(19.84);
        assert_eq!(
            registry.line_height("PT Serif", Pt::from_f32(11.0), fallback),
            fallback
        );
    }

    #[test]
    fn register_bytes_rejects_garbage() {
        let mut registry = FontRegistry::new();
        let err = registry
            .register_bytes(vec![0u8; 16], Some("broken"))
            .expect_err("not a font");
        assert!(matches!(err, LeaseGenError::Font(_)));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn name_normalization_ignores_case_and_spaces() {
        assert_eq!(normalize_name("PT Serif"), normalize_name("ptserif"));
        assert_eq!(normalize_name("PT-Serif Bold"), "ptserifbold");
    }
}

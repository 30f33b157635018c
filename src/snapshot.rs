//! Rasterized contract export.
//!
//! Takes a captured image of the rendered preview, scales it to the full page
//! width and slices it across as many pages as the scaled height needs. The
//! image is embedded once as an XObject and drawn on every page at a
//! decreasing vertical offset, so each page shows the next slice.
//!
//! This path never goes through the canvas. It exists for pixel-faithful
//! output of whatever the preview looked like, typography included, at the
//! cost of selectable text.

use base64::Engine;
use lopdf::content::{Content, Operation};
use lopdf::{Document as PdfDocument, Object, Stream, dictionary};
use tracing::error;

use crate::error::LeaseGenError;
use crate::types::Size;

/// Captured preview region handed over by the caller.
#[derive(Debug, Clone)]
pub enum SnapshotRegion {
    /// Raw PNG or JPEG bytes.
    Bytes(Vec<u8>),
    /// A `data:image/...;base64,...` URI.
    DataUri(String),
}

impl SnapshotRegion {
    fn bytes(&self) -> Result<Vec<u8>, LeaseGenError> {
        match self {
            SnapshotRegion::Bytes(bytes) => Ok(bytes.clone()),
            SnapshotRegion::DataUri(uri) => decode_data_uri(uri),
        }
    }
}

fn decode_data_uri(uri: &str) -> Result<Vec<u8>, LeaseGenError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| LeaseGenError::Snapshot("region is not a data URI".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| LeaseGenError::Snapshot("data URI has no payload".to_string()))?;
    if !header.contains(";base64") {
        return Err(LeaseGenError::Snapshot(
            "data URI is not base64 encoded".to_string(),
        ));
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload.as_bytes())
        .map_err(|err| LeaseGenError::Snapshot(format!("invalid base64 payload: {err}")))
}

/// Writes the snapshot PDF. A missing region is an error, not an empty file;
/// the caller decides whether to retry the capture.
pub(crate) fn write_snapshot(
    region: Option<&SnapshotRegion>,
    page_size: Size,
) -> Result<Vec<u8>, LeaseGenError> {
    let Some(region) = region else {
        error!("snapshot export requested without a captured preview region");
        return Err(LeaseGenError::MissingSnapshotRegion);
    };
    let bytes = region.bytes()?;
    let decoded = image::load_from_memory(&bytes).map_err(|err| {
        error!(error = %err, "captured snapshot region failed to decode");
        LeaseGenError::Snapshot(format!("could not decode image: {err}"))
    })?;
    let rgb = decoded.to_rgb8();
    let (px_width, px_height) = rgb.dimensions();
    if px_width == 0 || px_height == 0 {
        return Err(LeaseGenError::Snapshot("image has zero extent".to_string()));
    }

    let page_width = page_size.width;
    let page_height = page_size.height;
    // Image fills the page width; height follows the pixel aspect ratio.
    let scaled_height = page_width.mul_ratio(i64::from(px_height), i64::from(px_width));
    let page_milli = page_height.to_milli_i64().max(1);
    let pages = ((scaled_height.to_milli_i64() + page_milli - 1) / page_milli).max(1);

    let mut doc = PdfDocument::with_version("1.5");
    // No Filter entry here; doc.compress() flate-encodes the raw pixels.
    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(px_width),
            "Height" => i64::from(px_height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        rgb.into_raw(),
    ));
    let resources_id = doc.add_object(dictionary! {
        "XObject" => dictionary! { "Im1" => Object::Reference(image_id) },
    });

    let pages_id = doc.new_object_id();
    let mut kids = Vec::new();
    for page_index in 0..pages {
        // Bottom edge of the image in page space. Page n lifts the image by n
        // page heights so the next slice lands in view.
        let offset = page_height - scaled_height + page_height * (page_index as i32);
        let operations = vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(page_width.to_f32()),
                    Object::Real(0.0),
                    Object::Real(0.0),
                    Object::Real(scaled_height.to_f32()),
                    Object::Real(0.0),
                    Object::Real(offset.to_f32()),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im1".to_vec())]),
            Operation::new("Q", vec![]),
        ];
        let encoded = Content { operations }.encode()?;
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
                Object::Real(page_width.to_f32()),
                Object::Real(page_height.to_f32()),
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

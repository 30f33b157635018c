//! Lease contract generation for a commercial property portfolio.
//!
//! The crate covers the pipeline from a filled-in contract form to a finished
//! PDF: draft validation and resolution against property/tenant reference
//! data ([`ContractDraft::submit`]), a plain-text preview
//! ([`render_preview`]), and two export strategies. The direct strategy lays
//! the contract out on a drawing canvas and serializes text operators; the
//! snapshot strategy embeds a captured raster of the preview and slices it
//! across pages.
//!
//! ```no_run
//! use leasegen::{LeaseGen, demo_reference_data, ContractDraft};
//!
//! # fn main() -> Result<(), leasegen::LeaseGenError> {
//! let reference = demo_reference_data();
//! let mut draft = ContractDraft::new();
//! draft.tenant_id = "1".to_string();
//! draft.property_id = "1".to_string();
//! draft.area = "450".to_string();
//! draft.monthly_rent = "180000".to_string();
//! draft.start_date = "2025-03-15".to_string();
//! draft.end_date = "2026-03-14".to_string();
//! let record = draft.submit(&reference.properties, &reference.tenants)?;
//!
//! let engine = LeaseGen::builder().build()?;
//! let path = engine.export_contract_to_file(&record, "out")?;
//! println!("wrote {}", path.display());
//! # Ok(())
//! # }
//! ```

mod canvas;
mod contract;
mod dashboard;
mod demo;
mod error;
mod export;
mod font;
mod format;
mod frame;
mod inspect;
mod layout;
mod model;
mod pdf;
mod preview;
mod snapshot;
mod types;

pub use canvas::{Canvas, Command, Document, Page};
pub use contract::{Block, ContractDocument, SignatureBlock, SignatureParty, contract_document};
pub use dashboard::{PortfolioSummary, documents_of_kind, revenue_totals, summarize};
pub use demo::{
    DocumentKind, DocumentStatus, MonthRevenue, PaymentStatus, Portfolio, PortfolioDocument,
    PortfolioProperty, PortfolioTenant, PropertyStatus, PropertyTypeShare, TenantStatus,
    demo_portfolio, demo_reference_data,
};
pub use error::LeaseGenError;
pub use export::{contract_file_name, snapshot_file_name};
pub use font::FontRegistry;
pub use format::{format_currency, format_date_long, format_date_short, format_number};
pub use frame::Frame;
pub use inspect::{PdfReport, inspect_bytes, inspect_path};
pub use layout::{FontFaces, layout_contract};
pub use model::{
    ContractDraft, ContractRecord, DEFAULT_LANDLORD_ADDRESS, DEFAULT_LANDLORD_INN,
    DEFAULT_LANDLORD_NAME, DEFAULT_PAYMENT_DAY, Property, ReferenceData, Tenant,
};
pub use preview::render_preview;
pub use snapshot::SnapshotRegion;
pub use types::{Color, Margins, Pt, Rect, Size};

use std::path::{Path, PathBuf};

use tracing::info;

/// Configured export engine. Built once, reused across contracts.
#[derive(Debug)]
pub struct LeaseGen {
    page_size: Size,
    margins: Margins,
    faces: FontFaces,
    font_registry: FontRegistry,
}

#[derive(Clone)]
pub struct LeaseGenBuilder {
    page_size: Size,
    margins: Margins,
    faces: FontFaces,
    font_dirs: Vec<PathBuf>,
    font_files: Vec<PathBuf>,
    font_bytes: Vec<(Vec<u8>, Option<String>)>,
}

impl LeaseGen {
    pub fn builder() -> LeaseGenBuilder {
        LeaseGenBuilder::new()
    }

    pub fn page_size(&self) -> Size {
        self.page_size
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    pub fn font_registry(&self) -> &FontRegistry {
        &self.font_registry
    }

    /// Lays the contract out into drawing commands without serializing.
    pub fn render_contract(&self, record: &ContractRecord) -> Document {
        let document = contract_document(record);
        layout_contract(
            &document,
            &self.font_registry,
            self.page_size,
            self.margins,
            &self.faces,
        )
    }

    /// Direct-draw export: layout plus PDF serialization.
    pub fn export_contract(&self, record: &ContractRecord) -> Result<Vec<u8>, LeaseGenError> {
        let laid_out = self.render_contract(record);
        let bytes = pdf::write_document(&laid_out, &self.font_registry)?;
        info!(
            contract = %record.contract_number,
            pages = laid_out.pages.len(),
            size = bytes.len(),
            "exported contract pdf"
        );
        Ok(bytes)
    }

    pub fn export_contract_to_file(
        &self,
        record: &ContractRecord,
        dir: impl AsRef<Path>,
    ) -> Result<PathBuf, LeaseGenError> {
        let bytes = self.export_contract(record)?;
        export::save_to_dir(dir.as_ref(), &contract_file_name(record), &bytes)
    }

    /// Snapshot export from a captured preview image. `None` means the
    /// capture never happened and is reported as an error.
    pub fn export_snapshot(
        &self,
        region: Option<&SnapshotRegion>,
    ) -> Result<Vec<u8>, LeaseGenError> {
        snapshot::write_snapshot(region, self.page_size)
    }

    pub fn export_snapshot_to_file(
        &self,
        record: &ContractRecord,
        region: Option<&SnapshotRegion>,
        dir: impl AsRef<Path>,
    ) -> Result<PathBuf, LeaseGenError> {
        let bytes = self.export_snapshot(region)?;
        export::save_to_dir(dir.as_ref(), &snapshot_file_name(record), &bytes)
    }
}

impl LeaseGenBuilder {
    pub fn new() -> Self {
        Self {
            page_size: Size::a4(),
            margins: Margins::all_mm(20.0),
            faces: FontFaces::default(),
            font_dirs: Vec::new(),
            font_files: Vec::new(),
            font_bytes: Vec::new(),
        }
    }

    pub fn page_size(mut self, size: Size) -> Self {
        self.page_size = size;
        self
    }

    pub fn margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    pub fn margin_all_mm(mut self, value_mm: f32) -> Self {
        self.margins = Margins::all_mm(value_mm);
        self
    }

    pub fn register_font_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_dirs.push(path.into());
        self
    }

    pub fn register_font_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_files.push(path.into());
        self
    }

    pub fn register_font_bytes(mut self, data: Vec<u8>, name: Option<String>) -> Self {
        self.font_bytes.push((data, name));
        self
    }

    /// Font face names for body and bold text. Names that resolve to a
    /// registered face are embedded; anything else falls back to Helvetica.
    pub fn text_faces(mut self, regular: impl Into<String>, bold: impl Into<String>) -> Self {
        self.faces = FontFaces {
            regular: regular.into(),
            bold: bold.into(),
        };
        self
    }

    pub fn build(self) -> Result<LeaseGen, LeaseGenError> {
        let content_width = self.page_size.width - self.margins.left - self.margins.right;
        let content_height = self.page_size.height - self.margins.top - self.margins.bottom;
        if content_width <= Pt::ZERO || content_height <= Pt::ZERO {
            return Err(LeaseGenError::InvalidConfiguration(
                "margins leave no room on the page".to_string(),
            ));
        }
        let mut registry = FontRegistry::new();
        for dir in &self.font_dirs {
            registry.register_dir(dir);
        }
        for file in &self.font_files {
            registry.register_file(file);
        }
        for (data, name) in self.font_bytes {
            registry.register_bytes(data, name.as_deref())?;
        }
        Ok(LeaseGen {
            page_size: self.page_size,
            margins: self.margins,
            faces: self.faces,
            font_registry: registry,
        })
    }
}

impl Default for LeaseGenBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{filled_draft, sample_properties, sample_tenants};
    use chrono::NaiveDate;
    use std::io::Cursor;

    fn record() -> ContractRecord {
        filled_draft()
            .submit_on(
                &sample_properties(),
                &sample_tenants(),
                NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            )
            .unwrap()
    }

    #[test]
    fn form_to_pdf_round_trip_produces_a_parseable_document() {
        let engine = LeaseGen::builder().build().unwrap();
        let bytes = engine.export_contract(&record()).unwrap();
        let report = inspect_bytes(&bytes).unwrap();
        assert!(report.page_count >= 2, "pages: {}", report.page_count);
        assert!(!report.encrypted);
    }

    #[test]
    fn preview_and_export_share_one_document_source() {
        let record = record();
        let preview = render_preview(&record);
        let document = contract_document(&record);
        for heading in document.headings() {
            assert!(preview.contains(heading), "missing {heading:?}");
        }
    }

    #[test]
    fn export_to_file_uses_the_contract_number() {
        let dir = std::env::temp_dir().join(format!("leasegen-lib-{}", std::process::id()));
        let engine = LeaseGen::builder().build().unwrap();
        let path = engine.export_contract_to_file(&record(), &dir).unwrap();
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("Договор_АР-2025-001.pdf")
        );
        let report = inspect_path(&path).unwrap();
        assert!(report.page_count >= 2);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn snapshot_export_names_the_file_with_the_dashed_date() {
        let img = image::RgbImage::from_pixel(200, 900, image::Rgb([255, 255, 255]));
        let mut png = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let dir = std::env::temp_dir().join(format!("leasegen-snap-{}", std::process::id()));
        let engine = LeaseGen::builder().build().unwrap();
        let region = SnapshotRegion::Bytes(png);
        let path = engine
            .export_snapshot_to_file(&record(), Some(&region), &dir)
            .unwrap();
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("Договор_АР-2025-001_01-03-2025.pdf")
        );
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_snapshot_region_writes_nothing() {
        let dir = std::env::temp_dir().join(format!("leasegen-missing-{}", std::process::id()));
        let engine = LeaseGen::builder().build().unwrap();
        let err = engine
            .export_snapshot_to_file(&record(), None, &dir)
            .unwrap_err();
        assert!(matches!(err, LeaseGenError::MissingSnapshotRegion));
        assert!(!dir.exists());
    }

    #[test]
    fn engine_and_registry_format_with_debug() {
        // unwrap_err on build() needs the Ok type to be Debug.
        let engine = LeaseGen::builder().build().unwrap();
        let rendered = format!("{engine:?}");
        assert!(rendered.contains("LeaseGen"));
        assert!(format!("{:?}", FontRegistry::new()).contains("FontRegistry"));
    }

    #[test]
    fn degenerate_margins_are_rejected_at_build_time() {
        let err = LeaseGen::builder()
            .margins(Margins::all_mm(200.0))
            .build()
            .unwrap_err();
        assert!(matches!(err, LeaseGenError::InvalidConfiguration(_)));
    }

    #[test]
    fn custom_page_size_flows_through_to_the_output() {
        let letter = Size::from_mm(215.9, 279.4);
        let engine = LeaseGen::builder().page_size(letter).build().unwrap();
        let laid_out = engine.render_contract(&record());
        assert_eq!(laid_out.page_size, letter);
    }
}

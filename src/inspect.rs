//! Lightweight inspection of finished PDF bytes.
//!
//! Exists so callers (and the crate's own tests) can sanity-check an export
//! without a PDF viewer: does it parse, how many pages, is it encrypted.

use std::path::Path;

use lopdf::Document as PdfDocument;

use crate::error::LeaseGenError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfReport {
    pub pdf_version: String,
    pub page_count: usize,
    pub encrypted: bool,
    pub file_size_bytes: usize,
}

pub fn inspect_bytes(bytes: &[u8]) -> Result<PdfReport, LeaseGenError> {
    let pdf = PdfDocument::load_mem(bytes)?;
    Ok(PdfReport {
        pdf_version: pdf.version.clone(),
        page_count: pdf.get_pages().len(),
        encrypted: pdf.is_encrypted(),
        file_size_bytes: bytes.len(),
    })
}

pub fn inspect_path(path: impl AsRef<Path>) -> Result<PdfReport, LeaseGenError> {
    let data = std::fs::read(path)?;
    inspect_bytes(&data)
}

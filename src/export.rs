//! Download naming and file output for finished PDFs.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::LeaseGenError;
use crate::model::ContractRecord;

/// Name for the direct-draw export: `Договор_<number>.pdf`.
pub fn contract_file_name(record: &ContractRecord) -> String {
    format!("Договор_{}.pdf", record.contract_number)
}

/// Name for the snapshot export: `Договор_<number>_<dd-mm-yyyy>.pdf`. The
/// generation date keeps its digit order but swaps dots for dashes so the
/// name has a single extension separator.
pub fn snapshot_file_name(record: &ContractRecord) -> String {
    format!(
        "Договор_{}_{}.pdf",
        record.contract_number,
        record.generated_date.replace('.', "-")
    )
}

pub(crate) fn save_to_dir(
    dir: &Path,
    file_name: &str,
    bytes: &[u8],
) -> Result<PathBuf, LeaseGenError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    fs::write(&path, bytes)?;
    info!(path = %path.display(), size = bytes.len(), "wrote contract pdf");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{filled_draft, sample_properties, sample_tenants};
    use chrono::NaiveDate;

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
    fn direct_export_name_carries_the_contract_number() {
        assert_eq!(contract_file_name(&record()), "Договор_АР-2025-001.pdf");
    }

    #[test]
    fn snapshot_name_appends_the_dashed_generation_date() {
        assert_eq!(
            snapshot_file_name(&record()),
            "Договор_АР-2025-001_01-03-2025.pdf"
        );
    }

    #[test]
    fn save_creates_the_directory_and_returns_the_path() {
        let dir = std::env::temp_dir().join(format!("leasegen-export-{}", std::process::id()));
        let path = save_to_dir(&dir, "Договор_АР-2025-001.pdf", b"%PDF-1.5").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"%PDF-1.5");
        fs::remove_dir_all(&dir).unwrap();
    }
}

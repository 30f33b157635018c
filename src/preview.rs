use crate::contract::{Block, contract_document};
use crate::model::ContractRecord;

/// Pure text rendering of the contract template, used as the display surface.
/// The structure comes from [`contract_document`]; this function only decides
/// line shapes, so the preview and the direct-draw export always agree on
/// which clauses exist.
pub fn render_preview(record: &ContractRecord) -> String {
    let document = contract_document(record);
    let mut out = String::new();
    for block in &document.blocks {
        match block {
            Block::Title(text) => {
                out.push_str(text);
                out.push('\n');
            }
            Block::Subtitle(text) => {
                out.push_str(text);
                out.push('\n');
            }
            Block::Heading(text) => {
                out.push('\n');
                out.push_str(text);
                out.push('\n');
            }
            Block::Paragraph(text) => {
                out.push_str(text);
                out.push('\n');
            }
            Block::Field { label, value } => {
                out.push_str(label);
                out.push_str(": ");
                out.push_str(value);
                out.push('\n');
            }
            Block::Bullet(text) => {
                out.push_str("— ");
                out.push_str(text);
                out.push('\n');
            }
            Block::Signatures(signatures) => {
                for party in [&signatures.left, &signatures.right] {
                    out.push('\n');
                    out.push_str(&party.role);
                    out.push('\n');
                    for line in &party.lines {
                        out.push_str(line);
                        out.push('\n');
                    }
                    out.push_str(&party.caption);
                    out.push('\n');
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{filled_draft, sample_properties, sample_tenants};
    use chrono::NaiveDate;

    fn submitted(deposit: &str, special: &str) -> ContractRecord {
        let mut draft = filled_draft();
        draft.deposit = deposit.to_string();
        draft.special_conditions = special.to_string();
        draft
            .submit_on(
                &sample_properties(),
                &sample_tenants(),
                NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            )
            .expect("fixture ids resolve")
    }

    #[test]
    fn preview_contains_header_and_resolved_parties() {
        let text = render_preview(&submitted("", ""));
        assert!(text.contains("ДОГОВОР АРЕНДЫ НЕЖИЛОГО ПОМЕЩЕНИЯ"));
        assert!(text.contains("№ АР-2025-001"));
        assert!(text.contains("г. Москва, 01.03.2025"));
        assert!(text.contains("ООО \"ТехноПром\""));
        assert!(text.contains("Объект: БЦ \"Северная Башня\""));
    }

    #[test]
    fn worked_example_omits_deposit_paragraph() {
        // tenantId=1, propertyId=1, area 450, rent 180000, empty deposit.
        let text = render_preview(&submitted("", ""));
        assert!(!text.contains("3.3."));
        assert!(text.contains("не позднее 5 числа"));
        assert!(text.contains("180\u{a0}000\u{a0}₽"));
        assert!(text.contains("с 15 марта 2025 г. и действует до 14 марта 2026 г."));
    }

    #[test]
    fn deposit_and_special_conditions_round_trip_into_preview() {
        let text = render_preview(&submitted("180000", "Парковка включена."));
        assert!(text.contains("3.3. Обеспечительный платёж"));
        assert!(text.contains("5. ОСОБЫЕ УСЛОВИЯ"));
        assert!(text.contains("Парковка включена."));
    }

    #[test]
    fn preview_does_not_mutate_the_record() {
        let record = submitted("180000", "");
        let before = record.clone();
        let _ = render_preview(&record);
        assert_eq!(record, before);
    }
}

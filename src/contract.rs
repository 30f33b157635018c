use crate::format::{format_currency, format_date_long};
use crate::model::ContractRecord;

/// One laid-out unit of the contract template. The layout engine and the text
/// preview both consume this vocabulary, so the two renderings cannot drift.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Centered document title.
    Title(String),
    /// Centered line under the title (number, venue/date).
    Subtitle(String),
    /// Numbered section heading.
    Heading(String),
    /// Justified body paragraph; wrapped to the printable width on export.
    Paragraph(String),
    /// `label: value` line inside the premises box.
    Field { label: String, value: String },
    Bullet(String),
    Signatures(SignatureBlock),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignatureParty {
    pub role: String,
    pub lines: Vec<String>,
    pub caption: String,
}

/// Two fixed-width signature columns with underline rules.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureBlock {
    pub left: SignatureParty,
    pub right: SignatureParty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContractDocument {
    pub blocks: Vec<Block>,
}

impl ContractDocument {
    pub fn paragraph_texts(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Paragraph(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn headings(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Heading(text) => Some(text.as_str()),
            _ => None,
        })
    }
}

const SIGNATURE_CAPTION: &str = "Подпись / М.П.";

/// Builds the fixed legal-document structure for a resolved record. Pure; the
/// record is not mutated. Clause 3.3 and section 5 are emitted only when the
/// deposit / special-conditions fields are non-empty, and the later section
/// numbers stay fixed either way.
pub fn contract_document(record: &ContractRecord) -> ContractDocument {
    let mut blocks = Vec::with_capacity(32);

    blocks.push(Block::Title(
        "ДОГОВОР АРЕНДЫ НЕЖИЛОГО ПОМЕЩЕНИЯ".to_string(),
    ));
    blocks.push(Block::Subtitle(format!("№ {}", record.contract_number)));
    blocks.push(Block::Subtitle(format!(
        "г. Москва, {}",
        record.generated_date
    )));

    blocks.push(Block::Paragraph(format!(
        "{}, ИНН {}, именуемое в дальнейшем \"Арендодатель\", в лице Генерального директора, \
         действующего на основании Устава, с одной стороны, и",
        record.landlord_name, record.landlord_inn
    )));
    blocks.push(Block::Paragraph(format!(
        "{}, именуемое в дальнейшем \"Арендатор\", с другой стороны, совместно именуемые \
         \"Стороны\", заключили настоящий Договор о нижеследующем:",
        record.tenant_name
    )));

    blocks.push(Block::Heading("1. ПРЕДМЕТ ДОГОВОРА".to_string()));
    blocks.push(Block::Paragraph(
        "1.1. Арендодатель обязуется предоставить Арендатору за плату во временное владение и \
         пользование нежилое помещение, именуемое в дальнейшем \"Помещение\":"
            .to_string(),
    ));
    blocks.push(Block::Field {
        label: "Объект".to_string(),
        value: record.property_name.clone(),
    });
    blocks.push(Block::Field {
        label: "Адрес".to_string(),
        value: record.property_address.clone(),
    });
    blocks.push(Block::Field {
        label: "Площадь".to_string(),
        value: format!("{} м²", record.area),
    });
    blocks.push(Block::Paragraph(
        "1.2. Помещение передается Арендатору для использования под офисные и коммерческие цели."
            .to_string(),
    ));

    blocks.push(Block::Heading("2. СРОК ДЕЙСТВИЯ ДОГОВОРА".to_string()));
    blocks.push(Block::Paragraph(format!(
        "2.1. Настоящий Договор вступает в силу с {} и действует до {}.",
        format_date_long(&record.start_date),
        format_date_long(&record.end_date)
    )));
    blocks.push(Block::Paragraph(
        "2.2. По истечении срока действия Договор может быть продлён по соглашению Сторон."
            .to_string(),
    ));

    blocks.push(Block::Heading("3. РАЗМЕР И ПОРЯДОК ОПЛАТЫ".to_string()));
    blocks.push(Block::Paragraph(format!(
        "3.1. Размер арендной платы за Помещение составляет {} в месяц, включая НДС.",
        format_currency(&record.monthly_rent)
    )));
    blocks.push(Block::Paragraph(format!(
        "3.2. Арендная плата вносится Арендатором ежемесячно не позднее {} числа текущего месяца \
         путём безналичного перечисления на расчётный счёт Арендодателя.",
        record.payment_day
    )));
    if !record.deposit.trim().is_empty() {
        blocks.push(Block::Paragraph(format!(
            "3.3. Обеспечительный платёж в размере {} вносится Арендатором в течение 5 (пяти) \
             рабочих дней с момента подписания настоящего Договора.",
            format_currency(&record.deposit)
        )));
    }

    blocks.push(Block::Heading("4. ПРАВА И ОБЯЗАННОСТИ СТОРОН".to_string()));
    blocks.push(Block::Paragraph("4.1. Арендодатель обязуется:".to_string()));
    blocks.push(Block::Bullet(
        "Передать Арендатору Помещение в состоянии, пригодном для использования".to_string(),
    ));
    blocks.push(Block::Bullet(
        "Обеспечивать надлежащее содержание общего имущества здания".to_string(),
    ));
    blocks.push(Block::Bullet(
        "Не препятствовать Арендатору в пользовании Помещением".to_string(),
    ));
    blocks.push(Block::Paragraph("4.2. Арендатор обязуется:".to_string()));
    blocks.push(Block::Bullet("Своевременно вносить арендную плату".to_string()));
    blocks.push(Block::Bullet(
        "Поддерживать Помещение в исправном состоянии".to_string(),
    ));
    blocks.push(Block::Bullet(
        "Не передавать права по Договору третьим лицам без согласия Арендодателя".to_string(),
    ));

    if !record.special_conditions.trim().is_empty() {
        blocks.push(Block::Heading("5. ОСОБЫЕ УСЛОВИЯ".to_string()));
        blocks.push(Block::Paragraph(record.special_conditions.clone()));
    }

    blocks.push(Block::Heading("6. ОТВЕТСТВЕННОСТЬ СТОРОН".to_string()));
    blocks.push(Block::Paragraph(
        "6.1. За нарушение сроков внесения арендной платы Арендатор уплачивает Арендодателю пени \
         в размере 0,1% от суммы просроченного платежа за каждый день просрочки."
            .to_string(),
    ));
    blocks.push(Block::Paragraph(
        "6.2. Стороны освобождаются от ответственности за неисполнение обязательств по настоящему \
         Договору, если оно явилось следствием обстоятельств непреодолимой силы."
            .to_string(),
    ));

    blocks.push(Block::Heading("7. ПРОЧИЕ УСЛОВИЯ".to_string()));
    blocks.push(Block::Paragraph(
        "7.1. Все изменения и дополнения к настоящему Договору действительны при условии, что они \
         совершены в письменной форме и подписаны обеими Сторонами."
            .to_string(),
    ));
    blocks.push(Block::Paragraph(
        "7.2. Договор составлен в двух экземплярах, имеющих одинаковую юридическую силу, по одному \
         для каждой из Сторон."
            .to_string(),
    ));

    blocks.push(Block::Signatures(SignatureBlock {
        left: SignatureParty {
            role: "АРЕНДОДАТЕЛЬ:".to_string(),
            lines: vec![
                record.landlord_name.clone(),
                format!("ИНН: {}", record.landlord_inn),
                record.landlord_address.clone(),
            ],
            caption: SIGNATURE_CAPTION.to_string(),
        },
        right: SignatureParty {
            role: "АРЕНДАТОР:".to_string(),
            lines: vec![
                record.tenant_name.clone(),
                "Реквизиты уточняются".to_string(),
            ],
            caption: SIGNATURE_CAPTION.to_string(),
        },
    }));

    ContractDocument { blocks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{filled_draft, sample_properties, sample_tenants};
    use chrono::NaiveDate;

    fn record(deposit: &str, special: &str) -> ContractRecord {
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
    fn deposit_clause_present_iff_deposit_set() {
        let with = contract_document(&record("180000", ""));
        assert!(with.paragraph_texts().any(|p| p.starts_with("3.3.")));

        let without = contract_document(&record("", ""));
        assert!(!without.paragraph_texts().any(|p| p.starts_with("3.3.")));
        // Whitespace-only counts as empty.
        let blank = contract_document(&record("   ", ""));
        assert!(!blank.paragraph_texts().any(|p| p.starts_with("3.3.")));
    }

    #[test]
    fn special_conditions_section_is_conditional_without_renumbering() {
        let with = contract_document(&record("", "Запрещено субарендовать."));
        assert!(with.headings().any(|h| h.starts_with("5.")));
        assert!(with.headings().any(|h| h.starts_with("6.")));

        let without = contract_document(&record("", ""));
        assert!(!without.headings().any(|h| h.starts_with("5.")));
        // Later sections keep their fixed numbers.
        assert!(without.headings().any(|h| h == "6. ОТВЕТСТВЕННОСТЬ СТОРОН"));
        assert!(without.headings().any(|h| h == "7. ПРОЧИЕ УСЛОВИЯ"));
    }

    #[test]
    fn clause_order_is_fixed() {
        let doc = contract_document(&record("180000", "Условие."));
        let headings: Vec<&str> = doc.headings().collect();
        assert_eq!(
            headings,
            vec![
                "1. ПРЕДМЕТ ДОГОВОРА",
                "2. СРОК ДЕЙСТВИЯ ДОГОВОРА",
                "3. РАЗМЕР И ПОРЯДОК ОПЛАТЫ",
                "4. ПРАВА И ОБЯЗАННОСТИ СТОРОН",
                "5. ОСОБЫЕ УСЛОВИЯ",
                "6. ОТВЕТСТВЕННОСТЬ СТОРОН",
                "7. ПРОЧИЕ УСЛОВИЯ",
            ]
        );
        assert!(matches!(doc.blocks.last(), Some(Block::Signatures(_))));
    }

    #[test]
    fn money_and_dates_render_through_shared_formatters() {
        let doc = contract_document(&record("95000", ""));
        assert!(
            doc.paragraph_texts()
                .any(|p| p.contains("180\u{a0}000\u{a0}₽"))
        );
        assert!(
            doc.paragraph_texts()
                .any(|p| p.contains("95\u{a0}000\u{a0}₽"))
        );
        assert!(
            doc.paragraph_texts()
                .any(|p| p.contains("с 15 марта 2025 г. и действует до 14 марта 2026 г."))
        );
    }

    #[test]
    fn premises_box_carries_resolved_property() {
        let doc = contract_document(&record("", ""));
        assert!(doc.blocks.iter().any(|b| matches!(
            b,
            Block::Field { label, value } if label == "Адрес" && value == "ул. Ленина, 45"
        )));
        assert!(doc.blocks.iter().any(|b| matches!(
            b,
            Block::Field { label, value } if label == "Площадь" && value == "450 м²"
        )));
    }
}

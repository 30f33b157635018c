use crate::error::LeaseGenError;
use crate::format::format_date_short;
use chrono::{Datelike, Local, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Immutable reference data supplied by an external source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: u32,
    pub name: String,
    pub address: String,
    pub area: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: u32,
    pub name: String,
}

/// The property and tenant lists together, as an external collaborator would
/// hand them over.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceData {
    pub properties: Vec<Property>,
    pub tenants: Vec<Tenant>,
}

impl ReferenceData {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_reader(reader: impl std::io::Read) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }
}

pub const DEFAULT_PAYMENT_DAY: &str = "5";
pub const DEFAULT_LANDLORD_NAME: &str = "ООО \"PropertyHub\"";
pub const DEFAULT_LANDLORD_INN: &str = "7707123456";
pub const DEFAULT_LANDLORD_ADDRESS: &str = "г. Москва, ул. Арбат, д. 1";

const CONTRACT_NUMBER_PREFIX: &str = "АР";

/// Mutable form state. All value fields are kept as the strings a form holds;
/// nothing is parsed until submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractDraft {
    pub contract_number: String,
    pub tenant_id: String,
    pub property_id: String,
    pub area: String,
    pub monthly_rent: String,
    pub deposit: String,
    pub start_date: String,
    pub end_date: String,
    pub payment_day: String,
    pub landlord_name: String,
    pub landlord_inn: String,
    pub landlord_address: String,
    pub special_conditions: String,
}

impl Default for ContractDraft {
    fn default() -> Self {
        Self {
            contract_number: String::new(),
            tenant_id: String::new(),
            property_id: String::new(),
            area: String::new(),
            monthly_rent: String::new(),
            deposit: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            payment_day: DEFAULT_PAYMENT_DAY.to_string(),
            landlord_name: DEFAULT_LANDLORD_NAME.to_string(),
            landlord_inn: DEFAULT_LANDLORD_INN.to_string(),
            landlord_address: DEFAULT_LANDLORD_ADDRESS.to_string(),
            special_conditions: String::new(),
        }
    }
}

impl ContractDraft {
    /// Fresh draft with a generated contract number and the landlord defaults
    /// filled in.
    pub fn new() -> Self {
        Self {
            contract_number: generate_contract_number(),
            ..Self::default()
        }
    }

    /// Names of required fields that are currently empty. Presence only; no
    /// cross-field rules (an end date before the start date is accepted).
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let required: [(&'static str, &str); 9] = [
            ("contract_number", &self.contract_number),
            ("tenant_id", &self.tenant_id),
            ("property_id", &self.property_id),
            ("area", &self.area),
            ("monthly_rent", &self.monthly_rent),
            ("start_date", &self.start_date),
            ("landlord_name", &self.landlord_name),
            ("landlord_inn", &self.landlord_inn),
            ("landlord_address", &self.landlord_address),
        ];
        let mut missing: Vec<&'static str> = required
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect();
        if self.end_date.trim().is_empty() {
            missing.push("end_date");
        }
        missing
    }

    /// The library analogue of a disabled submit button: errors with the
    /// list of empty required fields. `submit` itself does not call this;
    /// presence is a gate for the surface, not for resolution.
    pub fn ensure_complete(&self) -> Result<(), LeaseGenError> {
        let missing = self.missing_required_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(LeaseGenError::MissingRequiredFields(missing))
        }
    }

    /// Resolves the selected tenant/property against the supplied lists and
    /// produces the immutable record. A lookup miss on either side aborts the
    /// submission; nothing is produced and the draft is untouched.
    pub fn submit(
        &self,
        properties: &[Property],
        tenants: &[Tenant],
    ) -> Result<ContractRecord, LeaseGenError> {
        self.submit_on(properties, tenants, Local::now().date_naive())
    }

    /// `submit` with an explicit generation date.
    pub fn submit_on(
        &self,
        properties: &[Property],
        tenants: &[Tenant],
        generated: NaiveDate,
    ) -> Result<ContractRecord, LeaseGenError> {
        let tenant_id: u32 = self.tenant_id.trim().parse().unwrap_or(0);
        let property_id: u32 = self.property_id.trim().parse().unwrap_or(0);

        let tenant = tenants
            .iter()
            .find(|t| t.id == tenant_id)
            .ok_or(LeaseGenError::UnknownTenant(tenant_id))?;
        let property = properties
            .iter()
            .find(|p| p.id == property_id)
            .ok_or(LeaseGenError::UnknownProperty(property_id))?;

        Ok(ContractRecord {
            contract_number: self.contract_number.clone(),
            tenant_name: tenant.name.clone(),
            property_name: property.name.clone(),
            property_address: property.address.clone(),
            area: self.area.clone(),
            monthly_rent: self.monthly_rent.clone(),
            deposit: self.deposit.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            payment_day: self.payment_day.clone(),
            landlord_name: self.landlord_name.clone(),
            landlord_inn: self.landlord_inn.clone(),
            landlord_address: self.landlord_address.clone(),
            special_conditions: self.special_conditions.clone(),
            generated_date: format_date_short(generated),
        })
    }
}

/// Immutable snapshot produced at submission time; the sole artifact handed to
/// the preview and the exporters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRecord {
    pub contract_number: String,
    pub tenant_name: String,
    pub property_name: String,
    pub property_address: String,
    pub area: String,
    pub monthly_rent: String,
    pub deposit: String,
    pub start_date: String,
    pub end_date: String,
    pub payment_day: String,
    pub landlord_name: String,
    pub landlord_inn: String,
    pub landlord_address: String,
    pub special_conditions: String,
    pub generated_date: String,
}

/// `АР-<year>-<NNN>` with a zero-padded pseudo-random suffix.
pub fn generate_contract_number() -> String {
    let year = Local::now().year();
    let suffix: u32 = rand::rng().random_range(0..1000);
    format!("{}-{}-{:03}", CONTRACT_NUMBER_PREFIX, year, suffix)
}


#[cfg(test)]
mod tests {
    use super::fixtures::{filled_draft, sample_properties, sample_tenants};
    use super::*;

    #[test]
    fn submit_resolves_tenant_and_property_names() {
        let record = filled_draft()
            .submit_on(
                &sample_properties(),
                &sample_tenants(),
                NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            )
            .expect("valid ids must resolve");
        assert_eq!(record.tenant_name, "ООО \"ТехноПром\"");
        assert_eq!(record.property_name, "БЦ \"Северная Башня\"");
        assert_eq!(record.property_address, "ул. Ленина, 45");
        assert_eq!(record.generated_date, "01.03.2025");
        assert_eq!(record.payment_day, "5");
    }

    #[test]
    fn submit_rejects_unknown_tenant() {
        let mut draft = filled_draft();
        draft.tenant_id = "99".to_string();
        let err = draft
            .submit(&sample_properties(), &sample_tenants())
            .expect_err("unknown tenant must not produce a record");
        assert!(matches!(err, LeaseGenError::UnknownTenant(99)));
    }

    #[test]
    fn submit_rejects_unknown_property() {
        let mut draft = filled_draft();
        draft.property_id = "7".to_string();
        let err = draft
            .submit(&sample_properties(), &sample_tenants())
            .expect_err("unknown property must not produce a record");
        assert!(matches!(err, LeaseGenError::UnknownProperty(7)));
    }

    #[test]
    fn submit_rejects_empty_selection_as_miss() {
        let mut draft = filled_draft();
        draft.tenant_id = String::new();
        let err = draft
            .submit(&sample_properties(), &sample_tenants())
            .expect_err("no selection resolves to nothing");
        assert!(matches!(err, LeaseGenError::UnknownTenant(0)));
    }

    #[test]
    fn new_draft_has_defaults_and_generated_number() {
        let draft = ContractDraft::new();
        assert_eq!(draft.payment_day, "5");
        assert_eq!(draft.landlord_name, DEFAULT_LANDLORD_NAME);
        assert!(draft.contract_number.starts_with("АР-"));
        let suffix = draft.contract_number.rsplit('-').next().unwrap();
        assert_eq!(suffix.len(), 3);
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn missing_required_fields_reports_presence_only() {
        let mut draft = ContractDraft::new();
        let missing = draft.missing_required_fields();
        assert!(missing.contains(&"tenant_id"));
        assert!(missing.contains(&"monthly_rent"));
        assert!(!missing.contains(&"landlord_name"));

        draft = filled_draft();
        assert!(draft.missing_required_fields().is_empty());

        // Cross-field rules are deliberately absent: end before start passes.
        draft.start_date = "2026-01-01".to_string();
        draft.end_date = "2025-01-01".to_string();
        assert!(draft.missing_required_fields().is_empty());
    }

    #[test]
    fn ensure_complete_names_the_empty_fields() {
        let mut draft = filled_draft();
        draft.area = String::new();
        let err = draft.ensure_complete().unwrap_err();
        match err {
            LeaseGenError::MissingRequiredFields(fields) => assert_eq!(fields, vec!["area"]),
            other => panic!("unexpected error: {other}"),
        }
        assert!(filled_draft().ensure_complete().is_ok());
    }

    #[test]
    fn reference_data_parses_external_json() {
        let data = ReferenceData::from_json(
            r#"{
                "properties": [{"id": 1, "name": "БЦ", "address": "ул. Ленина, 45", "area": 2500}],
                "tenants": [{"id": 1, "name": "ООО \"ТехноПром\""}]
            }"#,
        )
        .expect("well-formed lists parse");
        assert_eq!(data.properties.len(), 1);
        assert_eq!(data.tenants[0].name, "ООО \"ТехноПром\"");
    }
}

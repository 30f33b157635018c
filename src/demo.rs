//! Built-in demo portfolio.
//!
//! A small, self-consistent dataset of properties, tenants, documents and
//! revenue history. Useful for exercising the dashboard figures and the
//! contract form without wiring up real data.

use crate::model::{Property, ReferenceData, Tenant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyStatus {
    Active,
    Maintenance,
}

#[derive(Debug, Clone)]
pub struct PortfolioProperty {
    pub id: u32,
    pub name: String,
    pub address: String,
    /// Total lettable area in square meters.
    pub area: u32,
    pub tenant_count: u32,
    pub occupancy_percent: u32,
    /// Rental income per month, in rubles.
    pub monthly_revenue: i64,
    pub status: PropertyStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantStatus {
    Active,
    Expiring,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Ok,
    Overdue,
}

#[derive(Debug, Clone)]
pub struct PortfolioTenant {
    pub id: u32,
    pub name: String,
    pub property: String,
    pub area: u32,
    pub rent: i64,
    /// Contract end date, dd.mm.yyyy.
    pub contract_until: String,
    pub status: TenantStatus,
    pub payment: PaymentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Contract,
    Invoice,
    Act,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStatus {
    Signed,
    Paid,
    Overdue,
}

#[derive(Debug, Clone)]
pub struct PortfolioDocument {
    pub id: u32,
    pub kind: DocumentKind,
    pub name: String,
    pub tenant: String,
    pub date: String,
    pub status: DocumentStatus,
}

#[derive(Debug, Clone)]
pub struct MonthRevenue {
    pub month: &'static str,
    /// Rent accrued for the month, in rubles.
    pub accrued: i64,
    /// Rent actually received.
    pub paid: i64,
}

#[derive(Debug, Clone)]
pub struct PropertyTypeShare {
    pub name: &'static str,
    pub percent: u32,
}

#[derive(Debug, Clone)]
pub struct Portfolio {
    pub properties: Vec<PortfolioProperty>,
    pub tenants: Vec<PortfolioTenant>,
    pub documents: Vec<PortfolioDocument>,
    pub revenue_by_month: Vec<MonthRevenue>,
    pub property_type_mix: Vec<PropertyTypeShare>,
}

pub fn demo_portfolio() -> Portfolio {
    Portfolio {
        properties: vec![
            PortfolioProperty {
                id: 1,
                name: "БЦ \"Северная Башня\"".to_string(),
                address: "ул. Ленина, 45".to_string(),
                area: 2500,
                tenant_count: 8,
                occupancy_percent: 95,
                monthly_revenue: 850_000,
                status: PropertyStatus::Active,
            },
            PortfolioProperty {
                id: 2,
                name: "Складской комплекс \"Логистик\"".to_string(),
                address: "Промзона 3, стр. 12".to_string(),
                area: 5000,
                tenant_count: 3,
                occupancy_percent: 100,
                monthly_revenue: 450_000,
                status: PropertyStatus::Active,
            },
            PortfolioProperty {
                id: 3,
                name: "ТЦ \"Центральный\"".to_string(),
                address: "пр. Мира, 78".to_string(),
                area: 3200,
                tenant_count: 12,
                occupancy_percent: 87,
                monthly_revenue: 960_000,
                status: PropertyStatus::Active,
            },
            PortfolioProperty {
                id: 4,
                name: "Офисный центр \"Парус\"".to_string(),
                address: "наб. Реки, 5".to_string(),
                area: 1800,
                tenant_count: 5,
                occupancy_percent: 72,
                monthly_revenue: 380_000,
                status: PropertyStatus::Maintenance,
            },
        ],
        tenants: vec![
            PortfolioTenant {
                id: 1,
                name: "ООО \"ТехноПром\"".to_string(),
                property: "БЦ \"Северная Башня\"".to_string(),
                area: 450,
                rent: 180_000,
                contract_until: "15.03.2025".to_string(),
                status: TenantStatus::Active,
                payment: PaymentStatus::Ok,
            },
            PortfolioTenant {
                id: 2,
                name: "ИП Смирнов А.В.".to_string(),
                property: "ТЦ \"Центральный\"".to_string(),
                area: 120,
                rent: 95_000,
                contract_until: "01.05.2025".to_string(),
                status: TenantStatus::Active,
                payment: PaymentStatus::Overdue,
            },
            PortfolioTenant {
                id: 3,
                name: "АО \"МегаЛогистика\"".to_string(),
                property: "Складской комплекс".to_string(),
                area: 5000,
                rent: 450_000,
                contract_until: "20.06.2026".to_string(),
                status: TenantStatus::Active,
                payment: PaymentStatus::Ok,
            },
            PortfolioTenant {
                id: 4,
                name: "ООО \"Рога и Копыта\"".to_string(),
                property: "БЦ \"Северная Башня\"".to_string(),
                area: 280,
                rent: 125_000,
                contract_until: "10.02.2024".to_string(),
                status: TenantStatus::Expiring,
                payment: PaymentStatus::Ok,
            },
        ],
        documents: vec![
            PortfolioDocument {
                id: 1,
                kind: DocumentKind::Contract,
                name: "Договор аренды №АР-2024-089".to_string(),
                tenant: "ООО \"ТехноПром\"".to_string(),
                date: "15.11.2024".to_string(),
                status: DocumentStatus::Signed,
            },
            PortfolioDocument {
                id: 2,
                kind: DocumentKind::Invoice,
                name: "Счет №127 от 01.11.2024".to_string(),
                tenant: "ИП Смирнов А.В.".to_string(),
                date: "01.11.2024".to_string(),
                status: DocumentStatus::Overdue,
            },
            PortfolioDocument {
                id: 3,
                kind: DocumentKind::Act,
                name: "Акт выполненных работ №45".to_string(),
                tenant: "АО \"МегаЛогистика\"".to_string(),
                date: "28.10.2024".to_string(),
                status: DocumentStatus::Signed,
            },
            PortfolioDocument {
                id: 4,
                kind: DocumentKind::Invoice,
                name: "Счет-фактура №203".to_string(),
                tenant: "ООО \"Рога и Копыта\"".to_string(),
                date: "05.11.2024".to_string(),
                status: DocumentStatus::Paid,
            },
        ],
        revenue_by_month: vec![
            MonthRevenue { month: "Янв", accrued: 580_000, paid: 550_000 },
            MonthRevenue { month: "Фев", accrued: 620_000, paid: 610_000 },
            MonthRevenue { month: "Мар", accrued: 590_000, paid: 580_000 },
            MonthRevenue { month: "Апр", accrued: 650_000, paid: 640_000 },
            MonthRevenue { month: "Май", accrued: 680_000, paid: 670_000 },
            MonthRevenue { month: "Июн", accrued: 720_000, paid: 680_000 },
        ],
        property_type_mix: vec![
            PropertyTypeShare { name: "Офисы", percent: 45 },
            PropertyTypeShare { name: "Склады", percent: 30 },
            PropertyTypeShare { name: "Торговые", percent: 25 },
        ],
    }
}

/// Lookup tables for the contract form, derived from the same portfolio.
pub fn demo_reference_data() -> ReferenceData {
    let portfolio = demo_portfolio();
    ReferenceData {
        properties: portfolio
            .properties
            .into_iter()
            .map(|p| Property {
                id: p.id,
                name: p.name,
                address: p.address,
                area: p.area,
            })
            .collect(),
        tenants: portfolio
            .tenants
            .into_iter()
            .map(|t| Tenant { id: t.id, name: t.name })
            .collect(),
    }
}

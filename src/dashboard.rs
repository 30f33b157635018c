//! Aggregate figures over a portfolio.

use crate::demo::{
    DocumentKind, Portfolio, PortfolioDocument, PropertyStatus, TenantStatus,
};

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSummary {
    /// Sum of property areas, square meters.
    pub total_area: u32,
    /// Sum of property monthly revenues, rubles.
    pub month_revenue: i64,
    pub active_tenants: usize,
    pub properties_in_service: usize,
    /// Mean occupancy across all properties, percent.
    pub mean_occupancy: f64,
}

pub fn summarize(portfolio: &Portfolio) -> PortfolioSummary {
    let total_area = portfolio.properties.iter().map(|p| p.area).sum();
    let month_revenue = portfolio.properties.iter().map(|p| p.monthly_revenue).sum();
    let active_tenants = portfolio
        .tenants
        .iter()
        .filter(|t| t.status == TenantStatus::Active)
        .count();
    let properties_in_service = portfolio
        .properties
        .iter()
        .filter(|p| p.status == PropertyStatus::Active)
        .count();
    let mean_occupancy = if portfolio.properties.is_empty() {
        0.0
    } else {
        let sum: u32 = portfolio.properties.iter().map(|p| p.occupancy_percent).sum();
        f64::from(sum) / portfolio.properties.len() as f64
    };
    PortfolioSummary {
        total_area,
        month_revenue,
        active_tenants,
        properties_in_service,
        mean_occupancy,
    }
}

/// Documents of one kind, in portfolio order. Mirrors the document tabs.
pub fn documents_of_kind(portfolio: &Portfolio, kind: DocumentKind) -> Vec<&PortfolioDocument> {
    portfolio
        .documents
        .iter()
        .filter(|d| d.kind == kind)
        .collect()
}

/// Totals over the revenue series: (accrued, paid).
pub fn revenue_totals(portfolio: &Portfolio) -> (i64, i64) {
    portfolio
        .revenue_by_month
        .iter()
        .fold((0, 0), |(accrued, paid), month| {
            (accrued + month.accrued, paid + month.paid)
        })
}

//! Fixed-threshold category risk

use super::types::{CategoryTotals, InsertionMap, RiskLevel};

/// Totals strictly above this are high risk
pub const HIGH_RISK_THRESHOLD: f64 = 20_000.0;
/// Totals strictly above this (and not high) are medium risk
pub const MEDIUM_RISK_THRESHOLD: f64 = 10_000.0;

pub fn classify(total: f64) -> RiskLevel {
    if total > HIGH_RISK_THRESHOLD {
        RiskLevel::High
    } else if total > MEDIUM_RISK_THRESHOLD {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

pub fn risk_index(categories: &CategoryTotals) -> InsertionMap<String, RiskLevel> {
    let mut index = InsertionMap::new();
    for (category, total) in categories.iter() {
        index.insert(category.clone(), classify(*total));
    }
    index
}

//! Analytics data types

use std::fmt;

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};

/// Message carried by the no-data sentinel
pub const NO_DATA_MESSAGE: &str = "No data";

/// Which transactions feed `categoryTotals`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryTotalsMode {
    /// Incomes and expenses summed together per category
    #[default]
    AllTransactions,
    /// Only expense transactions
    ExpensesOnly,
}

/// Tunables for the aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsConfig {
    /// Look-back window in calendar months
    pub window_months: u32,
    pub category_totals: CategoryTotalsMode,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            window_months: 6,
            category_totals: CategoryTotalsMode::default(),
        }
    }
}

/// Calendar month identifier; displays as `<year>-<month>` without padding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: chrono::NaiveDate) -> Self {
        use chrono::Datelike;
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.month)
    }
}

/// Income and expense accumulated for one month
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MonthlyBucket {
    pub income: f64,
    pub expense: f64,
}

/// A map that remembers the order keys were first inserted
///
/// Serializes as a JSON object with keys in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertionMap<K, V> {
    entries: Vec<(K, V)>,
}

impl<K, V> Default for InsertionMap<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq, V> InsertionMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutable access to the value for `key`, inserting `V::default()` at the end if absent
    pub fn entry_or_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let idx = match self.entries.iter().position(|(k, _)| *k == key) {
            Some(idx) => idx,
            None => {
                self.entries.push((key, V::default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    pub fn insert(&mut self, key: K, value: V) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl<K: fmt::Display, V: Serialize> Serialize for InsertionMap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(&k.to_string(), v)?;
        }
        map.end()
    }
}

/// Month buckets in first-seen order
pub type MonthlyTrend = InsertionMap<MonthKey, MonthlyBucket>;

impl MonthlyTrend {
    /// Copy of the buckets sorted by (year, month)
    pub fn chronological(&self) -> MonthlyTrend {
        let mut entries = self.entries.clone();
        entries.sort_by_key(|(k, _)| *k);
        InsertionMap { entries }
    }
}

/// Per-category totals in first-seen order
pub type CategoryTotals = InsertionMap<String, f64>;

/// Absolute risk bucket for a category total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Upward,
    Downward,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub income: f64,
    pub expense: f64,
    pub savings: f64,
    /// Whole-number percentage
    pub savings_rate: i64,
    pub expense_to_income_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    pub next_month: f64,
    #[serde(rename = "in3Months", skip_serializing_if = "Option::is_none")]
    pub in_3_months: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
}

/// Full aggregator output for one user
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResult {
    pub summary: Summary,
    pub forecast: Forecast,
    pub monthly_trend: MonthlyTrend,
    pub category_totals: CategoryTotals,
    pub risk_index: InsertionMap<String, RiskLevel>,
    pub recommendations: Vec<String>,
}

/// Aggregator outcome: either computed analytics or the no-data sentinel
#[derive(Debug, Clone, PartialEq)]
pub enum Analytics {
    NoData,
    Computed(Box<AnalyticsResult>),
}

impl Analytics {
    pub fn result(&self) -> Option<&AnalyticsResult> {
        match self {
            Self::NoData => None,
            Self::Computed(result) => Some(result),
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }
}

impl Serialize for Analytics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::NoData => {
                let mut s = serializer.serialize_struct("NoData", 1)?;
                s.serialize_field("message", NO_DATA_MESSAGE)?;
                s.end()
            }
            Self::Computed(result) => result.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_key_display_is_unpadded() {
        assert_eq!(MonthKey { year: 2026, month: 3 }.to_string(), "2026-3");
        assert_eq!(MonthKey { year: 2025, month: 12 }.to_string(), "2025-12");
    }

    #[test]
    fn test_insertion_map_keeps_first_seen_order() {
        let mut map: InsertionMap<String, f64> = InsertionMap::new();
        *map.entry_or_default("b".to_string()) += 1.0;
        *map.entry_or_default("a".to_string()) += 2.0;
        *map.entry_or_default("b".to_string()) += 3.0;

        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(map.get(&"b".to_string()), Some(&4.0));
        assert_eq!(
            serde_json::to_string(&map).unwrap(),
            r#"{"b":4.0,"a":2.0}"#
        );
    }

    #[test]
    fn test_chronological_sorts_across_years() {
        let mut trend = MonthlyTrend::new();
        trend.insert(MonthKey { year: 2026, month: 1 }, MonthlyBucket::default());
        trend.insert(MonthKey { year: 2025, month: 11 }, MonthlyBucket::default());
        trend.insert(MonthKey { year: 2025, month: 2 }, MonthlyBucket::default());

        let keys: Vec<String> = trend.chronological().keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["2025-2", "2025-11", "2026-1"]);

        // Original order untouched
        let original: Vec<String> = trend.keys().map(|k| k.to_string()).collect();
        assert_eq!(original, vec!["2026-1", "2025-11", "2025-2"]);
    }

    #[test]
    fn test_no_data_serializes_as_message() {
        let json = serde_json::to_value(Analytics::NoData).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "No data" }));
    }

    #[test]
    fn test_forecast_omits_missing_fields() {
        let single = Forecast {
            next_month: 40.0,
            in_3_months: None,
            trend: None,
        };
        assert_eq!(
            serde_json::to_value(single).unwrap(),
            serde_json::json!({ "nextMonth": 40.0 })
        );

        let full = Forecast {
            next_month: 2000.0,
            in_3_months: Some(3000.0),
            trend: Some(Trend::Upward),
        };
        assert_eq!(
            serde_json::to_value(full).unwrap(),
            serde_json::json!({ "nextMonth": 2000.0, "in3Months": 3000.0, "trend": "upward" })
        );
    }
}

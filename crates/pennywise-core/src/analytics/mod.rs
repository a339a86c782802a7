//! Analytics Aggregator
//!
//! Turns a user's recent transactions into a single report:
//!
//! - **Summary** - income, expense, savings, savings rate, expense ratio
//! - **Forecast** - linear projection from the last two months of expenses
//! - **Monthly trend** - per-month income/expense buckets (first-seen order)
//! - **Category totals** and a fixed-threshold **risk index**
//! - **Recommendations** from an ordered rule table
//!
//! Each call does one store read followed by pure computation; nothing is
//! cached between calls.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pennywise_core::analytics::{AnalyticsConfig, AnalyticsEngine};
//! use pennywise_core::clock::SystemClock;
//!
//! let engine = AnalyticsEngine::new(&db, &SystemClock, AnalyticsConfig::default());
//! let analytics = engine.generate(user_id)?;
//! ```

pub mod bucketing;
pub mod forecast;
pub mod recommendations;
pub mod risk;
pub mod types;

use chrono::{Months, NaiveDate};
use tracing::debug;

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::models::Transaction;
use crate::store::TransactionStore;

pub use bucketing::{aggregate, Aggregates, Totals};
pub use forecast::{forecast, monthly_average};
pub use recommendations::{recommend, Rule, Signals, RULES};
pub use risk::{classify, risk_index, HIGH_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD};
pub use types::{
    Analytics, AnalyticsConfig, AnalyticsResult, CategoryTotals, CategoryTotalsMode, Forecast,
    InsertionMap, MonthKey, MonthlyBucket, MonthlyTrend, RiskLevel, Summary, Trend,
    NO_DATA_MESSAGE,
};

/// Computes analytics for one user at a time against a store and clock
pub struct AnalyticsEngine<'a> {
    store: &'a dyn TransactionStore,
    clock: &'a dyn Clock,
    config: AnalyticsConfig,
}

impl<'a> AnalyticsEngine<'a> {
    pub fn new(
        store: &'a dyn TransactionStore,
        clock: &'a dyn Clock,
        config: AnalyticsConfig,
    ) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// First date included in the window ending today
    pub fn window_start(&self) -> NaiveDate {
        window_start(self.clock.today(), self.config.window_months)
    }

    /// Build analytics for `user_id`
    ///
    /// The window runs from [`Self::window_start`] through today; future-dated
    /// transactions are left out. Returns [`Analytics::NoData`] when the
    /// window is empty. Store errors are returned as-is.
    pub fn generate(&self, user_id: i64) -> Result<Analytics> {
        if user_id <= 0 {
            return Err(Error::InvalidData(format!("Invalid user id: {}", user_id)));
        }

        let today = self.clock.today();
        let since = window_start(today, self.config.window_months);
        let transactions = self.store.transactions_between(user_id, since, today)?;
        debug!(
            user_id,
            %since,
            %today,
            count = transactions.len(),
            "Computing analytics"
        );

        if transactions.is_empty() {
            return Ok(Analytics::NoData);
        }

        Ok(Analytics::Computed(Box::new(summarize(
            &transactions,
            &self.config,
        ))))
    }
}

/// `today` minus `months` calendar months (day clamped to month end)
pub fn window_start(today: NaiveDate, months: u32) -> NaiveDate {
    today
        .checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

/// Compute the full result from an already-fetched, non-empty window
pub fn summarize(transactions: &[Transaction], config: &AnalyticsConfig) -> AnalyticsResult {
    let Aggregates {
        totals,
        monthly,
        categories,
    } = aggregate(transactions, config.category_totals);

    let savings = totals.income - totals.expense;
    let (savings_rate, ratio) = if totals.income > 0.0 {
        (
            (savings / totals.income * 100.0).round() as i64,
            round_to_cents(totals.expense / totals.income),
        )
    } else {
        (0, 0.0)
    };

    let forecast = forecast(&monthly);
    let monthly_avg_expense = monthly_average(totals.expense, monthly.len());

    let top_category_share = if totals.expense > 0.0 {
        categories
            .values()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
            / totals.expense
    } else {
        0.0
    };

    let recommendations = recommend(&Signals {
        next_month_forecast: forecast.next_month,
        monthly_avg_expense,
        savings_rate,
        expense_to_income_ratio: ratio,
        top_category_share,
    });

    AnalyticsResult {
        summary: Summary {
            income: totals.income,
            expense: totals.expense,
            savings,
            savings_rate,
            expense_to_income_ratio: ratio,
        },
        forecast,
        risk_index: risk_index(&categories),
        monthly_trend: monthly,
        category_totals: categories,
        recommendations,
    }
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::TransactionType;

    struct VecStore(Vec<Transaction>);

    impl TransactionStore for VecStore {
        fn transactions_between(
            &self,
            user_id: i64,
            since: NaiveDate,
            until: NaiveDate,
        ) -> Result<Vec<Transaction>> {
            let mut txs: Vec<_> = self
                .0
                .iter()
                .filter(|t| t.user_id == user_id && t.date >= since && t.date <= until)
                .cloned()
                .collect();
            txs.sort_by_key(|t| t.date);
            Ok(txs)
        }
    }

    struct FailingStore;

    impl TransactionStore for FailingStore {
        fn transactions_between(
            &self,
            _: i64,
            _: NaiveDate,
            _: NaiveDate,
        ) -> Result<Vec<Transaction>> {
            Err(Error::Database(rusqlite::Error::InvalidQuery))
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(d: NaiveDate, amount: f64, category: &str) -> Transaction {
        Transaction {
            id: 0,
            user_id: 1,
            date: d,
            amount,
            transaction_type: TransactionType::Expense,
            category: category.to_string(),
            description: String::new(),
        }
    }

    fn income(d: NaiveDate, amount: f64, category: &str) -> Transaction {
        Transaction {
            transaction_type: TransactionType::Income,
            ..expense(d, amount, category)
        }
    }

    fn run(txs: Vec<Transaction>) -> Analytics {
        let store = VecStore(txs);
        let clock = FixedClock(date(2026, 6, 30));
        AnalyticsEngine::new(&store, &clock, AnalyticsConfig::default())
            .generate(1)
            .unwrap()
    }

    fn computed(txs: Vec<Transaction>) -> AnalyticsResult {
        match run(txs) {
            Analytics::Computed(result) => *result,
            Analytics::NoData => panic!("expected computed analytics"),
        }
    }

    #[test]
    fn test_empty_window_is_no_data() {
        assert_eq!(run(vec![]), Analytics::NoData);
    }

    #[test]
    fn test_transactions_outside_window_are_ignored() {
        // Window for 2026-06-30 starts 2025-12-30
        let result = run(vec![expense(date(2025, 12, 29), 10.0, "Food")]);
        assert!(result.is_no_data());

        let result = computed(vec![
            expense(date(2025, 12, 29), 10.0, "Food"),
            expense(date(2025, 12, 30), 20.0, "Food"),
        ]);
        assert_eq!(result.summary.expense, 20.0);
    }

    #[test]
    fn test_future_dated_transactions_are_ignored() {
        // Clock is 2026-06-30
        let result = run(vec![expense(date(2027, 1, 15), 500.0, "Food")]);
        assert!(result.is_no_data());

        let result = computed(vec![
            expense(date(2026, 6, 30), 40.0, "Food"),
            expense(date(2026, 7, 1), 500.0, "Food"),
        ]);
        assert_eq!(result.summary.expense, 40.0);
        assert_eq!(result.monthly_trend.len(), 1);
    }

    #[test]
    fn test_window_start_clamps_to_month_end() {
        assert_eq!(window_start(date(2026, 8, 31), 6), date(2026, 2, 28));
        assert_eq!(window_start(date(2026, 3, 15), 6), date(2025, 9, 15));
    }

    #[test]
    fn test_single_month_mixed_categories() {
        let d = date(2026, 6, 10);
        let result = computed(vec![
            expense(d, 100.0, "Food"),
            expense(d, 50.0, "Food"),
            income(d, 500.0, "Salary"),
        ]);

        assert_eq!(result.summary.income, 500.0);
        assert_eq!(result.summary.expense, 150.0);
        assert_eq!(result.summary.savings, 350.0);
        assert_eq!(result.summary.savings_rate, 70);
        assert_eq!(result.summary.expense_to_income_ratio, 0.3);

        assert_eq!(result.category_totals.get(&"Food".to_string()), Some(&150.0));
        assert_eq!(result.category_totals.get(&"Salary".to_string()), Some(&500.0));
        assert!(result.risk_index.values().all(|r| *r == RiskLevel::Low));

        // Single bucket
        assert_eq!(result.forecast.next_month, 150.0);
        assert_eq!(result.forecast.trend, None);
    }

    #[test]
    fn test_two_month_upward_forecast() {
        let result = computed(vec![
            expense(date(2026, 4, 3), 1000.0, "Rent"),
            expense(date(2026, 5, 3), 1500.0, "Rent"),
        ]);

        assert_eq!(result.forecast.next_month, 2000.0);
        assert_eq!(result.forecast.in_3_months, Some(3000.0));
        assert_eq!(result.forecast.trend, Some(Trend::Upward));
        // 2000 > avg 1250
        assert_eq!(
            result.recommendations.first().map(String::as_str),
            Some(RULES[0].message)
        );
    }

    #[test]
    fn test_dominant_category_is_high_risk() {
        let d = date(2026, 6, 1);
        let result = computed(vec![
            expense(d, 25_000.0, "Housing"),
            expense(d, 5_000.0, "Food"),
        ]);

        assert_eq!(
            result.risk_index.get(&"Housing".to_string()),
            Some(&RiskLevel::High)
        );
        assert_eq!(result.risk_index.get(&"Food".to_string()), Some(&RiskLevel::Low));
        assert!(result
            .recommendations
            .iter()
            .any(|r| r == RULES[3].message));
    }

    #[test]
    fn test_zero_income() {
        let result = computed(vec![expense(date(2026, 6, 1), 80.0, "Food")]);
        assert_eq!(result.summary.savings, -80.0);
        assert_eq!(result.summary.savings_rate, 0);
        assert_eq!(result.summary.expense_to_income_ratio, 0.0);
    }

    #[test]
    fn test_zero_expense_share_is_zero() {
        let result = computed(vec![income(date(2026, 6, 1), 1000.0, "Salary")]);
        assert_eq!(result.summary.savings_rate, 100);
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn test_savings_identity() {
        let result = computed(vec![
            income(date(2026, 2, 1), 1234.56, "Salary"),
            expense(date(2026, 3, 1), 789.01, "Food"),
            expense(date(2026, 4, 1), 12.34, "Transport"),
        ]);
        assert_eq!(
            result.summary.savings,
            result.summary.income - result.summary.expense
        );
    }

    #[test]
    fn test_expenses_only_category_mode() {
        let store = VecStore(vec![
            expense(date(2026, 6, 1), 100.0, "Food"),
            income(date(2026, 6, 1), 500.0, "Salary"),
        ]);
        let clock = FixedClock(date(2026, 6, 30));
        let config = AnalyticsConfig {
            category_totals: CategoryTotalsMode::ExpensesOnly,
            ..Default::default()
        };

        let analytics = AnalyticsEngine::new(&store, &clock, config)
            .generate(1)
            .unwrap();
        let result = analytics.result().unwrap();
        assert_eq!(result.category_totals.len(), 1);
        assert_eq!(result.category_totals.get(&"Food".to_string()), Some(&100.0));
    }

    #[test]
    fn test_generate_is_idempotent() {
        let store = VecStore(vec![
            income(date(2026, 3, 1), 3000.0, "Salary"),
            expense(date(2026, 3, 2), 900.0, "Rent"),
            expense(date(2026, 4, 2), 950.0, "Rent"),
        ]);
        let clock = FixedClock(date(2026, 6, 30));
        let engine = AnalyticsEngine::new(&store, &clock, AnalyticsConfig::default());

        assert_eq!(engine.generate(1).unwrap(), engine.generate(1).unwrap());
    }

    #[test]
    fn test_other_users_are_not_mixed_in() {
        let mut other = expense(date(2026, 6, 1), 999.0, "Food");
        other.user_id = 2;
        let result = computed(vec![other, expense(date(2026, 6, 1), 1.0, "Food")]);
        assert_eq!(result.summary.expense, 1.0);
    }

    #[test]
    fn test_invalid_user_id() {
        let store = VecStore(vec![]);
        let clock = FixedClock(date(2026, 6, 30));
        let engine = AnalyticsEngine::new(&store, &clock, AnalyticsConfig::default());
        assert!(matches!(engine.generate(0), Err(Error::InvalidData(_))));
        assert!(matches!(engine.generate(-5), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_store_errors_propagate() {
        let clock = FixedClock(date(2026, 6, 30));
        let engine = AnalyticsEngine::new(&FailingStore, &clock, AnalyticsConfig::default());
        assert!(matches!(engine.generate(1), Err(Error::Database(_))));
    }

    #[test]
    fn test_result_json_shape() {
        let d = date(2026, 3, 10);
        let result = computed(vec![expense(d, 100.0, "Food"), income(d, 500.0, "Salary")]);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["summary"]["savingsRate"], 80);
        assert_eq!(json["summary"]["expenseToIncomeRatio"], 0.2);
        assert_eq!(json["monthlyTrend"]["2026-3"]["expense"], 100.0);
        assert_eq!(json["riskIndex"]["Food"], "Low");
        assert!(json["forecast"].get("trend").is_none());
    }
}

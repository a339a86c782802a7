//! Single-pass aggregation of transactions into months, categories and totals

use crate::models::{Transaction, TransactionType};

use super::types::{CategoryTotals, CategoryTotalsMode, MonthKey, MonthlyTrend};

/// Income and expense sums across the window
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
}

/// Everything the aggregator derives directly from raw transactions
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Aggregates {
    pub totals: Totals,
    pub monthly: MonthlyTrend,
    pub categories: CategoryTotals,
}

/// Walk the transactions once, filling buckets in first-seen order
pub fn aggregate(transactions: &[Transaction], mode: CategoryTotalsMode) -> Aggregates {
    let mut agg = Aggregates::default();

    for tx in transactions {
        let bucket = agg.monthly.entry_or_default(MonthKey::of(tx.date));
        match tx.transaction_type {
            TransactionType::Income => {
                bucket.income += tx.amount;
                agg.totals.income += tx.amount;
            }
            TransactionType::Expense => {
                bucket.expense += tx.amount;
                agg.totals.expense += tx.amount;
            }
        }

        let counts = match mode {
            CategoryTotalsMode::AllTransactions => true,
            CategoryTotalsMode::ExpensesOnly => tx.transaction_type == TransactionType::Expense,
        };
        if counts {
            *agg.categories.entry_or_default(tx.category.clone()) += tx.amount;
        }
    }

    agg
}

//! Read access to a user's transactions

use chrono::NaiveDate;

use crate::error::Result;
use crate::models::Transaction;

/// Source of transactions for analytics
///
/// Implementations return every transaction belonging to `user_id` dated
/// between `since` and `until` (both inclusive), sorted by date ascending.
pub trait TransactionStore: Send + Sync {
    fn transactions_between(
        &self,
        user_id: i64,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<Transaction>>;
}

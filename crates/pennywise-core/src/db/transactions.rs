//! Unified transaction view over incomes and expenses
//!
//! Every income row is a transaction of type `income` (its source is the
//! description), every expense row a transaction of type `expense`.

use chrono::NaiveDate;
use rusqlite::params;

use super::{parse_date, Database};
use crate::error::Result;
use crate::models::{CategorySummaryRow, MonthlySummaryRow, Transaction, TransactionType};
use crate::store::TransactionStore;

const UNIFIED_VIEW: &str = r#"
    (
        SELECT id, user_id, date, amount, 'income' AS type, category, source AS description
        FROM incomes
        UNION ALL
        SELECT id, user_id, date, amount, 'expense' AS type, category, description
        FROM expenses
    )
"#;

/// Filters for listing transactions
///
/// The date range applies only when both ends are set.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub category: Option<String>,
    pub transaction_type: Option<TransactionType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl TransactionFilter {
    fn where_clause(&self, user_id: i64) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut clauses = vec!["user_id = ?".to_string()];
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id)];

        if let Some(category) = &self.category {
            clauses.push("category = ?".to_string());
            params.push(Box::new(category.clone()));
        }
        if let Some(kind) = self.transaction_type {
            clauses.push("type = ?".to_string());
            params.push(Box::new(kind.as_str()));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            clauses.push("date >= ? AND date <= ?".to_string());
            params.push(Box::new(start.to_string()));
            params.push(Box::new(end.to_string()));
        }

        (clauses.join(" AND "), params)
    }
}

fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
    let date_str: String = row.get(2)?;
    let type_str: String = row.get(4)?;
    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        date: parse_date(&date_str),
        amount: row.get(3)?,
        transaction_type: type_str.parse().unwrap_or(TransactionType::Expense),
        category: row.get(5)?,
        description: row.get(6)?,
    })
}

impl Database {
    /// List a user's transactions matching `filter`, newest first
    pub fn list_transactions(
        &self,
        user_id: i64,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let (where_sql, params) = filter.where_clause(user_id);
        let sql = format!(
            "SELECT id, user_id, date, amount, type, category, description FROM {} \
             WHERE {} ORDER BY date DESC, type, id DESC",
            UNIFIED_VIEW, where_sql
        );

        let refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let transactions = stmt
            .query_map(refs.as_slice(), row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Totals per (month, type) for one calendar year
    pub fn monthly_summary(&self, user_id: i64, year: i32) -> Result<Vec<MonthlySummaryRow>> {
        let conn = self.conn()?;
        let sql = format!(
            r#"
            SELECT CAST(strftime('%m', date) AS INTEGER) AS month, type, SUM(amount)
            FROM {}
            WHERE user_id = ? AND date >= ? AND date <= ?
            GROUP BY month, type
            ORDER BY month, type DESC
            "#,
            UNIFIED_VIEW
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(
                params![
                    user_id,
                    format!("{:04}-01-01", year),
                    format!("{:04}-12-31", year)
                ],
                |row| {
                    let type_str: String = row.get(1)?;
                    Ok(MonthlySummaryRow {
                        month: row.get(0)?,
                        transaction_type: type_str.parse().unwrap_or(TransactionType::Expense),
                        total: row.get(2)?,
                    })
                },
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Totals per category, largest first
    pub fn category_summary(
        &self,
        user_id: i64,
        transaction_type: Option<TransactionType>,
    ) -> Result<Vec<CategorySummaryRow>> {
        let conn = self.conn()?;
        let sql = format!(
            r#"
            SELECT category, SUM(amount) AS total
            FROM {}
            WHERE user_id = ?1 AND (?2 IS NULL OR type = ?2)
            GROUP BY category
            ORDER BY total DESC, category
            "#,
            UNIFIED_VIEW
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(
                params![user_id, transaction_type.map(|t| t.as_str())],
                |row| {
                    Ok(CategorySummaryRow {
                        category: row.get(0)?,
                        total: row.get(1)?,
                    })
                },
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}

impl TransactionStore for Database {
    fn transactions_between(
        &self,
        user_id: i64,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT id, user_id, date, amount, type, category, description FROM {} \
             WHERE user_id = ? AND date >= ? AND date <= ? \
             ORDER BY date ASC, type DESC, id ASC",
            UNIFIED_VIEW
        );

        let mut stmt = conn.prepare(&sql)?;
        let transactions = stmt
            .query_map(
                params![user_id, since.to_string(), until.to_string()],
                row_to_transaction,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }
}

//! CSV export of a user's transactions

use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::db::{Database, TransactionFilter};
use crate::error::{Error, Result};
use crate::models::Transaction;

/// Options for transaction export
#[derive(Debug, Clone, Default)]
pub struct TransactionExportOptions {
    /// Start date filter (inclusive); needs `to` as well
    pub from: Option<NaiveDate>,
    /// End date filter (inclusive); needs `from` as well
    pub to: Option<NaiveDate>,
}

/// A rendered export and the number of transactions in it
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub csv: String,
    /// Transactions written; quoted fields may span several lines
    pub rows: usize,
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    date: String,
    #[serde(rename = "type")]
    transaction_type: &'static str,
    category: &'a str,
    description: &'a str,
    amount: String,
}

impl<'a> From<&'a Transaction> for ExportRow<'a> {
    fn from(tx: &'a Transaction) -> Self {
        Self {
            date: tx.date.to_string(),
            transaction_type: tx.transaction_type.as_str(),
            category: &tx.category,
            description: &tx.description,
            amount: format!("{:.2}", tx.amount),
        }
    }
}

impl Database {
    /// Render a user's transactions as CSV, oldest first
    pub fn export_transactions_csv(
        &self,
        user_id: i64,
        opts: &TransactionExportOptions,
    ) -> Result<CsvExport> {
        let filter = TransactionFilter {
            start_date: opts.from,
            end_date: opts.to,
            ..Default::default()
        };
        let mut transactions = self.list_transactions(user_id, &filter)?;
        transactions.reverse();

        let mut writer = csv::Writer::from_writer(Vec::new());
        if transactions.is_empty() {
            writer.write_record(["date", "type", "category", "description", "amount"])?;
        }
        for tx in &transactions {
            writer.serialize(ExportRow::from(tx))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))?;
        let csv = String::from_utf8(bytes).map_err(|e| Error::InvalidData(e.to_string()))?;

        Ok(CsvExport {
            csv,
            rows: transactions.len(),
        })
    }

    /// Write the CSV export to `path`, returning the number of rows written
    pub fn export_transactions_to_file(
        &self,
        user_id: i64,
        opts: &TransactionExportOptions,
        path: &Path,
    ) -> Result<usize> {
        let export = self.export_transactions_csv(user_id, opts)?;
        std::fs::write(path, &export.csv)?;
        Ok(export.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IncomeCategory, NewExpense, NewIncome, NewUser, Recurrence};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seeded_db() -> (Database, i64) {
        let db = Database::in_memory().unwrap();
        let user = db
            .register_user(&NewUser {
                name: "Exporter".to_string(),
                email: "export@example.com".to_string(),
                password: "secret123".to_string(),
                role: None,
            })
            .unwrap();
        let today = date(2026, 4, 1);
        db.create_expense(
            user.id,
            &NewExpense {
                description: Some("Dinner, with friends".to_string()),
                amount: 42.0,
                category: "Food".to_string(),
                date: Some(date(2026, 3, 2)),
                ..Default::default()
            },
            today,
        )
        .unwrap();
        db.create_income(
            user.id,
            &NewIncome {
                source: "Acme".to_string(),
                amount: 1000.0,
                category: IncomeCategory::Salary,
                date: Some(date(2026, 3, 1)),
                notes: None,
                status: None,
                is_recurring: false,
                recurrence: Recurrence::None,
            },
            today,
        )
        .unwrap();
        (db, user.id)
    }

    #[test]
    fn test_export_csv_oldest_first_with_quoting() {
        let (db, user_id) = seeded_db();
        let export = db
            .export_transactions_csv(user_id, &TransactionExportOptions::default())
            .unwrap();
        assert_eq!(export.rows, 2);

        let lines: Vec<&str> = export.csv.lines().collect();
        assert_eq!(lines[0], "date,type,category,description,amount");
        assert_eq!(lines[1], "2026-03-01,income,Salary,Acme,1000.00");
        assert_eq!(lines[2], "2026-03-02,expense,Food,\"Dinner, with friends\",42.00");
    }

    #[test]
    fn test_export_empty_has_header() {
        let db = Database::in_memory().unwrap();
        let export = db
            .export_transactions_csv(1, &TransactionExportOptions::default())
            .unwrap();
        assert_eq!(export.rows, 0);
        assert_eq!(export.csv.trim_end(), "date,type,category,description,amount");
    }

    #[test]
    fn test_export_counts_multiline_description_once() {
        let (db, user_id) = seeded_db();
        db.create_expense(
            user_id,
            &NewExpense {
                description: Some("Hardware store\nscrews and glue".to_string()),
                amount: 12.5,
                category: "Home".to_string(),
                date: Some(date(2026, 3, 20)),
                ..Default::default()
            },
            date(2026, 4, 1),
        )
        .unwrap();

        let export = db
            .export_transactions_csv(user_id, &TransactionExportOptions::default())
            .unwrap();
        assert_eq!(export.rows, 3);
        assert!(export.csv.lines().count() > export.rows + 1);
        assert!(export.csv.contains("\"Hardware store\nscrews and glue\""));

        let dir = tempfile::tempdir().unwrap();
        let rows = db
            .export_transactions_to_file(
                user_id,
                &TransactionExportOptions::default(),
                &dir.path().join("multi.csv"),
            )
            .unwrap();
        assert_eq!(rows, 3);
    }

    #[test]
    fn test_export_to_file() {
        let (db, user_id) = seeded_db();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let rows = db
            .export_transactions_to_file(
                user_id,
                &TransactionExportOptions {
                    from: Some(date(2026, 3, 2)),
                    to: Some(date(2026, 3, 31)),
                },
                &path,
            )
            .unwrap();

        assert_eq!(rows, 1);
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Dinner"));
        assert!(!contents.contains("Acme"));
    }
}

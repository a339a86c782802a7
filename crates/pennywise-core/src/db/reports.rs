//! Generated reports
//!
//! A report snapshots global totals at generation time and stores a rendered
//! CSV document next to its SHA-256 checksum.

use rusqlite::{params, OptionalExtension};
use sha2::{Digest, Sha256};
use tracing::info;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{CategorySummaryRow, NewReport, Report, ReportSummary};

const REPORT_COLUMNS: &str = "id, title, report_type, created_by, total_expenses, total_income, \
                              total_budgets, checksum, generated_at";

/// Render the report document
///
/// Columns are `section,label,amount`: one `summary` row per total, then one
/// `category` row per expense category.
pub(crate) fn render_report_csv(
    summary: &ReportSummary,
    categories: &[CategorySummaryRow],
) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["section", "label", "amount"])?;
    for (label, amount) in [
        ("total_income", summary.total_income),
        ("total_expenses", summary.total_expenses),
        ("total_budgets", summary.total_budgets),
    ] {
        writer.write_record(["summary", label, format!("{:.2}", amount).as_str()])?;
    }
    for row in categories {
        writer.write_record([
            "category",
            row.category.as_str(),
            format!("{:.2}", row.total).as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| Error::InvalidData(e.to_string()))
}

pub(crate) fn checksum(document: &str) -> String {
    hex::encode(Sha256::digest(document.as_bytes()))
}

impl Database {
    fn row_to_report(row: &rusqlite::Row) -> rusqlite::Result<Report> {
        let type_str: String = row.get(2)?;
        let generated_at_str: String = row.get(8)?;
        Ok(Report {
            id: row.get(0)?,
            title: row.get(1)?,
            report_type: type_str.parse().unwrap_or_default(),
            created_by: row.get(3)?,
            summary: ReportSummary {
                total_expenses: row.get(4)?,
                total_income: row.get(5)?,
                total_budgets: row.get(6)?,
            },
            checksum: row.get(7)?,
            generated_at: parse_datetime(&generated_at_str),
        })
    }

    /// Totals across every user
    pub fn global_totals(&self) -> Result<ReportSummary> {
        let conn = self.conn()?;
        let summary = conn.query_row(
            r#"
            SELECT
                (SELECT COALESCE(SUM(amount), 0) FROM expenses),
                (SELECT COALESCE(SUM(amount), 0) FROM incomes),
                (SELECT COALESCE(SUM(budget), 0) FROM budgets)
            "#,
            [],
            |row| {
                Ok(ReportSummary {
                    total_expenses: row.get(0)?,
                    total_income: row.get(1)?,
                    total_budgets: row.get(2)?,
                })
            },
        )?;
        Ok(summary)
    }

    fn global_expense_categories(&self) -> Result<Vec<CategorySummaryRow>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT category, SUM(amount) AS total
            FROM expenses
            GROUP BY category
            ORDER BY total DESC, category
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(CategorySummaryRow {
                    category: row.get(0)?,
                    total: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Snapshot current totals into a new report
    pub fn generate_report(&self, created_by: Option<i64>, input: &NewReport) -> Result<Report> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(Error::InvalidData("Title is required".to_string()));
        }

        let summary = self.global_totals()?;
        let document = render_report_csv(&summary, &self.global_expense_categories()?)?;
        let checksum = checksum(&document);

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO reports (title, report_type, created_by, total_expenses, total_income,
                                 total_budgets, document, checksum)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                title,
                input.report_type.as_str(),
                created_by,
                summary.total_expenses,
                summary.total_income,
                summary.total_budgets,
                document,
                checksum,
            ],
        )?;

        let id = conn.last_insert_rowid();
        info!("Generated {} report {}", input.report_type.as_str(), id);

        self.get_report(id)?
            .ok_or_else(|| Error::NotFound(format!("Report {}", id)))
    }

    /// List reports, newest first
    pub fn list_reports(&self) -> Result<Vec<Report>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM reports ORDER BY generated_at DESC, id DESC",
            REPORT_COLUMNS
        ))?;

        let reports = stmt
            .query_map([], Self::row_to_report)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(reports)
    }

    pub fn get_report(&self, id: i64) -> Result<Option<Report>> {
        let conn = self.conn()?;
        let report = conn
            .query_row(
                &format!("SELECT {} FROM reports WHERE id = ?", REPORT_COLUMNS),
                params![id],
                Self::row_to_report,
            )
            .optional()?;
        Ok(report)
    }

    /// The stored CSV document for a report
    pub fn get_report_document(&self, id: i64) -> Result<Option<String>> {
        let conn = self.conn()?;
        let document = conn
            .query_row(
                "SELECT document FROM reports WHERE id = ?",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(document)
    }

    pub fn delete_report(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM reports WHERE id = ?", params![id])?;
        Ok(deleted > 0)
    }
}

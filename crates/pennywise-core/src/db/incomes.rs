//! Income operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

use super::{parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Income, IncomeCategory, IncomeStatus, NewIncome};

const INCOME_COLUMNS: &str = "id, user_id, source, amount, category, date, notes, status, \
                              is_recurring, recurrence, next_recurrence_date, created_at";

impl Database {
    fn row_to_income(row: &rusqlite::Row) -> rusqlite::Result<Income> {
        let category_str: String = row.get(4)?;
        let date_str: String = row.get(5)?;
        let status_str: String = row.get(7)?;
        let recurring_int: i64 = row.get(8)?;
        let recurrence_str: String = row.get(9)?;
        let next_str: Option<String> = row.get(10)?;
        let created_at_str: String = row.get(11)?;
        Ok(Income {
            id: row.get(0)?,
            user_id: row.get(1)?,
            source: row.get(2)?,
            amount: row.get(3)?,
            category: category_str.parse().unwrap_or(IncomeCategory::Other),
            date: parse_date(&date_str),
            notes: row.get(6)?,
            status: status_str.parse().unwrap_or_default(),
            is_recurring: recurring_int != 0,
            recurrence: recurrence_str.parse().unwrap_or_default(),
            next_recurrence_date: next_str.map(|s| parse_date(&s)),
            created_at: parse_datetime(&created_at_str),
        })
    }

    /// Create an income; `today` fills a missing date and anchors recurrence
    pub fn create_income(
        &self,
        user_id: i64,
        input: &NewIncome,
        today: NaiveDate,
    ) -> Result<Income> {
        input.validate()?;
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO incomes (user_id, source, amount, category, date, notes, status,
                                 is_recurring, recurrence, next_recurrence_date)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                input.source.trim(),
                input.amount,
                input.category.as_str(),
                input.date.unwrap_or(today).to_string(),
                input.notes,
                input.status.unwrap_or_default().as_str(),
                input.is_recurring,
                input.recurrence.as_str(),
                input.next_recurrence(today).map(|d| d.to_string()),
            ],
        )?;

        let id = conn.last_insert_rowid();
        self.get_income(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Income {}", id)))
    }

    /// List a user's incomes, newest date first
    pub fn list_incomes(&self, user_id: i64) -> Result<Vec<Income>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM incomes WHERE user_id = ? ORDER BY date DESC, id DESC",
            INCOME_COLUMNS
        ))?;

        let incomes = stmt
            .query_map(params![user_id], Self::row_to_income)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(incomes)
    }

    pub fn get_income(&self, user_id: i64, id: i64) -> Result<Option<Income>> {
        let conn = self.conn()?;
        let income = conn
            .query_row(
                &format!(
                    "SELECT {} FROM incomes WHERE id = ? AND user_id = ?",
                    INCOME_COLUMNS
                ),
                params![id, user_id],
                Self::row_to_income,
            )
            .optional()?;
        Ok(income)
    }

    /// Replace an income's fields; `None` if it does not belong to the user
    pub fn update_income(
        &self,
        user_id: i64,
        id: i64,
        input: &NewIncome,
        today: NaiveDate,
    ) -> Result<Option<Income>> {
        input.validate()?;
        let conn = self.conn()?;

        let updated = conn.execute(
            r#"
            UPDATE incomes SET
                source = ?, amount = ?, category = ?, date = COALESCE(?, date), notes = ?,
                status = COALESCE(?, status), is_recurring = ?, recurrence = ?,
                next_recurrence_date = ?
            WHERE id = ? AND user_id = ?
            "#,
            params![
                input.source.trim(),
                input.amount,
                input.category.as_str(),
                input.date.map(|d| d.to_string()),
                input.notes,
                input.status.map(|s| s.as_str()),
                input.is_recurring,
                input.recurrence.as_str(),
                input.next_recurrence(today).map(|d| d.to_string()),
                id,
                user_id,
            ],
        )?;

        if updated == 0 {
            return Ok(None);
        }
        self.get_income(user_id, id)
    }

    pub fn delete_income(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM incomes WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        Ok(deleted > 0)
    }

    pub fn mark_income_received(&self, user_id: i64, id: i64) -> Result<Option<Income>> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE incomes SET status = ? WHERE id = ? AND user_id = ?",
            params![IncomeStatus::Received.as_str(), id, user_id],
        )?;

        if updated == 0 {
            return Ok(None);
        }
        self.get_income(user_id, id)
    }
}

//! Expense operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

use super::{parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Expense, ExpenseUpdate, NewExpense};

const EXPENSE_COLUMNS: &str = "id, user_id, description, title, amount, category, \
                               payment_method, date, notes, is_recurring, created_at";

impl Database {
    fn row_to_expense(row: &rusqlite::Row) -> rusqlite::Result<Expense> {
        let date_str: String = row.get(7)?;
        let recurring_int: i64 = row.get(9)?;
        let created_at_str: String = row.get(10)?;
        Ok(Expense {
            id: row.get(0)?,
            user_id: row.get(1)?,
            description: row.get(2)?,
            title: row.get(3)?,
            amount: row.get(4)?,
            category: row.get(5)?,
            payment_method: row.get(6)?,
            date: parse_date(&date_str),
            notes: row.get(8)?,
            is_recurring: recurring_int != 0,
            created_at: parse_datetime(&created_at_str),
        })
    }

    pub fn create_expense(
        &self,
        user_id: i64,
        input: &NewExpense,
        today: NaiveDate,
    ) -> Result<Expense> {
        let expense = input.resolve(today)?;
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO expenses
                (user_id, description, title, amount, category, payment_method, date, notes)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                expense.description,
                expense.title,
                expense.amount,
                expense.category,
                expense.payment_method,
                expense.date.to_string(),
                expense.notes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        self.get_expense(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Expense {}", id)))
    }

    /// List a user's expenses, newest date first
    pub fn list_expenses(&self, user_id: i64) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM expenses WHERE user_id = ? ORDER BY date DESC, id DESC",
            EXPENSE_COLUMNS
        ))?;

        let expenses = stmt
            .query_map(params![user_id], Self::row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    pub fn get_expense(&self, user_id: i64, id: i64) -> Result<Option<Expense>> {
        let conn = self.conn()?;
        let expense = conn
            .query_row(
                &format!(
                    "SELECT {} FROM expenses WHERE id = ? AND user_id = ?",
                    EXPENSE_COLUMNS
                ),
                params![id, user_id],
                Self::row_to_expense,
            )
            .optional()?;
        Ok(expense)
    }

    /// Apply a partial update; `None` if the expense does not belong to the user
    pub fn update_expense(
        &self,
        user_id: i64,
        id: i64,
        update: &ExpenseUpdate,
    ) -> Result<Option<Expense>> {
        update.validate()?;
        let conn = self.conn()?;

        let updated = conn.execute(
            r#"
            UPDATE expenses SET
                description = COALESCE(?1, description),
                title = COALESCE(?2, title),
                amount = COALESCE(?3, amount),
                category = COALESCE(?4, category),
                payment_method = COALESCE(?5, payment_method),
                date = COALESCE(?6, date),
                notes = COALESCE(?7, notes),
                is_recurring = COALESCE(?8, is_recurring)
            WHERE id = ?9 AND user_id = ?10
            "#,
            params![
                update.description.as_deref().map(str::trim),
                update.title.as_deref().map(str::trim),
                update.amount,
                update.category.as_deref().map(str::trim),
                update.payment_method,
                update.date.map(|d| d.to_string()),
                update.notes,
                update.is_recurring,
                id,
                user_id,
            ],
        )?;

        if updated == 0 {
            return Ok(None);
        }
        self.get_expense(user_id, id)
    }

    pub fn delete_expense(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM expenses WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        Ok(deleted > 0)
    }

    pub fn mark_expense_recurring(&self, user_id: i64, id: i64) -> Result<Option<Expense>> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE expenses SET is_recurring = 1 WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;

        if updated == 0 {
            return Ok(None);
        }
        self.get_expense(user_id, id)
    }
}

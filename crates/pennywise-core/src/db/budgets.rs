//! Budget operations

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Budget, BudgetUpdate, NewBudget};

const BUDGET_COLUMNS: &str = "id, user_id, category, budget, spent, month, exceeded, created_at";

impl Database {
    pub(crate) fn row_to_budget(row: &rusqlite::Row) -> rusqlite::Result<Budget> {
        let exceeded_int: i64 = row.get(6)?;
        let created_at_str: String = row.get(7)?;
        Ok(Budget {
            id: row.get(0)?,
            user_id: row.get(1)?,
            category: row.get(2)?,
            budget: row.get(3)?,
            spent: row.get(4)?,
            month: row.get(5)?,
            exceeded: exceeded_int != 0,
            created_at: parse_datetime(&created_at_str),
        })
    }

    pub fn create_budget(&self, user_id: i64, input: &NewBudget) -> Result<Budget> {
        input.validate()?;
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO budgets (user_id, category, budget, spent, month, exceeded)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                input.category.trim(),
                input.budget,
                input.spent,
                input.month,
                input.spent > input.budget,
            ],
        )?;

        let id = conn.last_insert_rowid();
        self.get_budget(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Budget {}", id)))
    }

    pub fn list_budgets(&self, user_id: i64) -> Result<Vec<Budget>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM budgets WHERE user_id = ? ORDER BY created_at DESC, id DESC",
            BUDGET_COLUMNS
        ))?;

        let budgets = stmt
            .query_map(params![user_id], Self::row_to_budget)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(budgets)
    }

    pub fn get_budget(&self, user_id: i64, id: i64) -> Result<Option<Budget>> {
        let conn = self.conn()?;
        let budget = conn
            .query_row(
                &format!(
                    "SELECT {} FROM budgets WHERE id = ? AND user_id = ?",
                    BUDGET_COLUMNS
                ),
                params![id, user_id],
                Self::row_to_budget,
            )
            .optional()?;
        Ok(budget)
    }

    pub fn update_budget(
        &self,
        user_id: i64,
        id: i64,
        update: &BudgetUpdate,
    ) -> Result<Option<Budget>> {
        if matches!(update.budget, Some(b) if !b.is_finite() || b <= 0.0) {
            return Err(Error::InvalidData(
                "Budget amount must be greater than 0".to_string(),
            ));
        }
        if matches!(update.spent, Some(s) if !s.is_finite() || s < 0.0) {
            return Err(Error::InvalidData("Spent must not be negative".to_string()));
        }

        let conn = self.conn()?;
        let updated = conn.execute(
            r#"
            UPDATE budgets SET
                category = COALESCE(?1, category),
                budget = COALESCE(?2, budget),
                spent = COALESCE(?3, spent),
                month = COALESCE(?4, month),
                exceeded = COALESCE(?5, exceeded)
            WHERE id = ?6 AND user_id = ?7
            "#,
            params![
                update.category.as_deref().map(str::trim),
                update.budget,
                update.spent,
                update.month,
                update.exceeded,
                id,
                user_id,
            ],
        )?;

        if updated == 0 {
            return Ok(None);
        }
        self.get_budget(user_id, id)
    }

    pub fn delete_budget(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM budgets WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        Ok(deleted > 0)
    }

    pub fn mark_budget_exceeded(&self, user_id: i64, id: i64) -> Result<Option<Budget>> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE budgets SET exceeded = 1 WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;

        if updated == 0 {
            return Ok(None);
        }
        self.get_budget(user_id, id)
    }
}

//! Savings goal operations

use rusqlite::{params, OptionalExtension};

use super::{parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Goal, GoalUpdate, NewGoal};

const GOAL_COLUMNS: &str =
    "id, user_id, title, target_amount, saved_amount, deadline, completed, created_at";

impl Database {
    fn row_to_goal(row: &rusqlite::Row) -> rusqlite::Result<Goal> {
        let target: f64 = row.get(3)?;
        let saved: f64 = row.get(4)?;
        let deadline_str: String = row.get(5)?;
        let completed_int: i64 = row.get(6)?;
        let created_at_str: String = row.get(7)?;
        Ok(Goal {
            id: row.get(0)?,
            user_id: row.get(1)?,
            title: row.get(2)?,
            target_amount: target,
            saved_amount: saved,
            deadline: parse_date(&deadline_str),
            completed: completed_int != 0,
            progress: Goal::compute_progress(saved, target),
            created_at: parse_datetime(&created_at_str),
        })
    }

    pub fn create_goal(&self, user_id: i64, input: &NewGoal) -> Result<Goal> {
        input.validate()?;
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO goals (user_id, title, target_amount, saved_amount, deadline, completed)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                input.title.trim(),
                input.target_amount,
                input.saved_amount,
                input.deadline.to_string(),
                input.completed,
            ],
        )?;

        let id = conn.last_insert_rowid();
        self.get_goal(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Goal {}", id)))
    }

    /// List a user's goals, nearest deadline first
    pub fn list_goals(&self, user_id: i64) -> Result<Vec<Goal>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM goals WHERE user_id = ? ORDER BY deadline ASC, id ASC",
            GOAL_COLUMNS
        ))?;

        let goals = stmt
            .query_map(params![user_id], Self::row_to_goal)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(goals)
    }

    pub fn get_goal(&self, user_id: i64, id: i64) -> Result<Option<Goal>> {
        let conn = self.conn()?;
        let goal = conn
            .query_row(
                &format!(
                    "SELECT {} FROM goals WHERE id = ? AND user_id = ?",
                    GOAL_COLUMNS
                ),
                params![id, user_id],
                Self::row_to_goal,
            )
            .optional()?;
        Ok(goal)
    }

    pub fn update_goal(&self, user_id: i64, id: i64, update: &GoalUpdate) -> Result<Option<Goal>> {
        if matches!(update.target_amount, Some(t) if !t.is_finite() || t <= 0.0) {
            return Err(Error::InvalidData(
                "Target amount must be greater than 0".to_string(),
            ));
        }

        let conn = self.conn()?;
        let updated = conn.execute(
            r#"
            UPDATE goals SET
                title = COALESCE(?1, title),
                target_amount = COALESCE(?2, target_amount),
                saved_amount = COALESCE(?3, saved_amount),
                deadline = COALESCE(?4, deadline),
                completed = COALESCE(?5, completed)
            WHERE id = ?6 AND user_id = ?7
            "#,
            params![
                update.title.as_deref().map(str::trim),
                update.target_amount,
                update.saved_amount,
                update.deadline.map(|d| d.to_string()),
                update.completed,
                id,
                user_id,
            ],
        )?;

        if updated == 0 {
            return Ok(None);
        }
        self.get_goal(user_id, id)
    }

    pub fn delete_goal(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM goals WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        Ok(deleted > 0)
    }

    pub fn complete_goal(&self, user_id: i64, id: i64) -> Result<Option<Goal>> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE goals SET completed = 1 WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;

        if updated == 0 {
            return Ok(None);
        }
        self.get_goal(user_id, id)
    }
}

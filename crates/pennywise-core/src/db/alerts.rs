//! Alert operations

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Alert, NewAlert};

impl Database {
    fn row_to_alert(row: &rusqlite::Row) -> rusqlite::Result<Alert> {
        let level_str: String = row.get(3)?;
        let read_int: i64 = row.get(4)?;
        let created_at_str: String = row.get(5)?;
        Ok(Alert {
            id: row.get(0)?,
            user_id: row.get(1)?,
            message: row.get(2)?,
            level: level_str.parse().unwrap_or_default(),
            read: read_int != 0,
            created_at: parse_datetime(&created_at_str),
        })
    }

    pub fn create_alert(&self, user_id: i64, input: &NewAlert) -> Result<Alert> {
        let message = input.message.trim();
        if message.is_empty() {
            return Err(Error::InvalidData("Message is required".to_string()));
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO alerts (user_id, message, level) VALUES (?, ?, ?)",
            params![user_id, message, input.level.as_str()],
        )?;

        let id = conn.last_insert_rowid();
        self.get_alert(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Alert {}", id)))
    }

    /// List a user's alerts, newest first
    pub fn list_alerts(&self, user_id: i64) -> Result<Vec<Alert>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, message, level, read, created_at
            FROM alerts
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )?;

        let alerts = stmt
            .query_map(params![user_id], Self::row_to_alert)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(alerts)
    }

    pub fn get_alert(&self, user_id: i64, id: i64) -> Result<Option<Alert>> {
        let conn = self.conn()?;
        let alert = conn
            .query_row(
                "SELECT id, user_id, message, level, read, created_at FROM alerts \
                 WHERE id = ? AND user_id = ?",
                params![id, user_id],
                Self::row_to_alert,
            )
            .optional()?;
        Ok(alert)
    }

    pub fn mark_alert_read(&self, user_id: i64, id: i64) -> Result<Option<Alert>> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE alerts SET read = 1 WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;

        if updated == 0 {
            return Ok(None);
        }
        self.get_alert(user_id, id)
    }

    pub fn delete_alert(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM alerts WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        Ok(deleted > 0)
    }

    pub fn count_unread_alerts(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM alerts WHERE user_id = ? AND read = 0",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

//! Cross-user aggregates for the admin dashboard

use super::Database;
use crate::error::Result;
use crate::models::{UserExpenseTotal, UserSpendingReport};

/// Spent / budget as a percentage rounded to one decimal; 0 without a budget
pub fn utilization(spent: f64, budget: f64) -> f64 {
    if budget > 0.0 {
        (spent / budget * 1000.0).round() / 10.0
    } else {
        0.0
    }
}

impl Database {
    /// Per-user expense total, budget total, and utilization
    pub fn user_spending_reports(&self) -> Result<Vec<UserSpendingReport>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT u.id, u.name,
                   (SELECT COALESCE(SUM(e.amount), 0) FROM expenses e WHERE e.user_id = u.id),
                   (SELECT COALESCE(SUM(b.budget), 0) FROM budgets b WHERE b.user_id = u.id)
            FROM users u
            ORDER BY u.id
            "#,
        )?;

        let reports = stmt
            .query_map([], |row| {
                let total_spent: f64 = row.get(2)?;
                let total_budget: f64 = row.get(3)?;
                Ok(UserSpendingReport {
                    user_id: row.get(0)?,
                    name: row.get(1)?,
                    total_spent,
                    total_budget,
                    utilization: utilization(total_spent, total_budget),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(reports)
    }

    /// Total expenses per user that has any, largest first
    pub fn expenses_by_user(&self) -> Result<Vec<UserExpenseTotal>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT u.id, u.name, SUM(e.amount) AS total
            FROM expenses e
            JOIN users u ON u.id = e.user_id
            GROUP BY u.id, u.name
            ORDER BY total DESC, u.id
            "#,
        )?;

        let totals = stmt
            .query_map([], |row| {
                Ok(UserExpenseTotal {
                    user_id: row.get(0)?,
                    name: row.get(1)?,
                    total_spent: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utilization_one_decimal() {
        assert_eq!(utilization(50.0, 200.0), 25.0);
        assert_eq!(utilization(1.0, 3.0), 33.3);
        assert_eq!(utilization(2.0, 3.0), 66.7);
        assert_eq!(utilization(10.0, 0.0), 0.0);
    }
}

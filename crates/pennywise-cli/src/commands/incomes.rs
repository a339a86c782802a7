//! Income commands

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use pennywise_core::db::Database;
use pennywise_core::models::{Income, IncomeCategory, NewIncome, Recurrence};

use super::parse_date;

pub fn cmd_incomes_add(
    db: &Database,
    user_id: i64,
    source: &str,
    amount: f64,
    category: &str,
    date: Option<&str>,
    today: NaiveDate,
) -> Result<Income> {
    let category: IncomeCategory = category.parse().map_err(|e: String| anyhow!(e))?;
    let input = NewIncome {
        source: source.to_string(),
        amount,
        category,
        date: parse_date(date)?,
        notes: None,
        status: None,
        is_recurring: false,
        recurrence: Recurrence::None,
    };

    let income = db
        .create_income(user_id, &input, today)
        .context("Failed to record income")?;
    println!(
        "✅ Recorded income {}: {:.2} from {} on {}",
        income.id, income.amount, income.source, income.date
    );
    Ok(income)
}

pub fn cmd_incomes_list(db: &Database, user_id: i64) -> Result<()> {
    let incomes = db.list_incomes(user_id)?;

    if incomes.is_empty() {
        println!("No incomes recorded for user {}", user_id);
        return Ok(());
    }

    println!("💰 Incomes ({})", incomes.len());
    println!();
    for income in &incomes {
        println!(
            "  {}  {:>12.2}  {:<16}  {:<9}  {}",
            income.date,
            income.amount,
            income.category.as_str(),
            income.status.as_str(),
            income.source
        );
    }

    let total: f64 = incomes.iter().map(|i| i.amount).sum();
    println!();
    println!("  Total: {:.2}", total);
    Ok(())
}

//! Expense commands

use anyhow::{Context, Result};
use chrono::NaiveDate;
use pennywise_core::db::Database;
use pennywise_core::models::{Expense, NewExpense};

use super::parse_date;

#[allow(clippy::too_many_arguments)]
pub fn cmd_expenses_add(
    db: &Database,
    user_id: i64,
    description: &str,
    amount: f64,
    category: &str,
    date: Option<&str>,
    payment_method: Option<&str>,
    today: NaiveDate,
) -> Result<Expense> {
    let input = NewExpense {
        description: Some(description.to_string()),
        amount,
        category: category.to_string(),
        date: parse_date(date)?,
        payment_method: payment_method.map(str::to_string),
        ..Default::default()
    };

    let expense = db
        .create_expense(user_id, &input, today)
        .context("Failed to record expense")?;
    println!(
        "✅ Recorded expense {}: {:.2} for {} ({}) on {}",
        expense.id, expense.amount, expense.description, expense.category, expense.date
    );
    Ok(expense)
}

pub fn cmd_expenses_list(db: &Database, user_id: i64) -> Result<()> {
    let expenses = db.list_expenses(user_id)?;

    if expenses.is_empty() {
        println!("No expenses recorded for user {}", user_id);
        return Ok(());
    }

    println!("🧾 Expenses ({})", expenses.len());
    println!();
    for expense in &expenses {
        println!(
            "  {}  {:>12.2}  {:<16}  {:<10}  {}",
            expense.date,
            expense.amount,
            expense.category,
            expense.payment_method,
            expense.description
        );
    }

    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    println!();
    println!("  Total: {:.2}", total);
    Ok(())
}

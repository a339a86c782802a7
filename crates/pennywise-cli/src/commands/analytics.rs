//! Analytics command

use anyhow::Result;
use pennywise_core::analytics::Trend;
use pennywise_core::db::Database;
use pennywise_core::{Analytics, AnalyticsConfig, AnalyticsEngine, Clock};

pub fn cmd_analytics(
    db: &Database,
    clock: &dyn Clock,
    config: AnalyticsConfig,
    user_id: i64,
    json: bool,
) -> Result<()> {
    let engine = AnalyticsEngine::new(db, clock, config);
    let analytics = engine.generate(user_id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analytics)?);
        return Ok(());
    }

    let result = match &analytics {
        Analytics::NoData => {
            println!(
                "No transactions for user {} since {}",
                user_id,
                engine.window_start()
            );
            return Ok(());
        }
        Analytics::Computed(result) => result,
    };

    let summary = &result.summary;
    println!(
        "📊 Analytics for user {} (since {})",
        user_id,
        engine.window_start()
    );
    println!("   ─────────────────────────────");
    println!("   Income:        {:>12.2}", summary.income);
    println!("   Expenses:      {:>12.2}", summary.expense);
    println!("   Savings:       {:>12.2}", summary.savings);
    println!("   Savings rate:  {:>11}%", summary.savings_rate);
    println!("   Expense ratio: {:>12.2}", summary.expense_to_income_ratio);

    println!();
    println!("📅 Monthly trend");
    for (month, bucket) in result.monthly_trend.iter() {
        println!(
            "   {:<8}  income {:>10.2}  expense {:>10.2}",
            month.to_string(),
            bucket.income,
            bucket.expense
        );
    }

    println!();
    println!("🔮 Forecast");
    println!("   Next month:    {:>12.2}", result.forecast.next_month);
    if let Some(in_3_months) = result.forecast.in_3_months {
        println!("   In 3 months:   {:>12.2}", in_3_months);
    }
    if let Some(trend) = result.forecast.trend {
        let label = match trend {
            Trend::Upward => "upward",
            Trend::Downward => "downward",
        };
        println!("   Trend:         {:>12}", label);
    }

    println!();
    println!("🏷️  Categories");
    for (category, total) in result.category_totals.iter() {
        let risk = result
            .risk_index
            .get(category)
            .map(|r| r.as_str())
            .unwrap_or("-");
        println!("   {:<20} {:>12.2}  {}", category, total, risk);
    }

    if !result.recommendations.is_empty() {
        println!();
        println!("💡 Recommendations");
        for rec in &result.recommendations {
            println!("   • {}", rec);
        }
    }

    Ok(())
}

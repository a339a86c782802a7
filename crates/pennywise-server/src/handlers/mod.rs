//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod admin;
pub mod alerts;
pub mod analytics;
pub mod auth;
pub mod budgets;
pub mod expenses;
pub mod goals;
pub mod incomes;
pub mod profile;
pub mod reports;
pub mod transactions;

// Re-export all handlers for use in router
pub use admin::*;
pub use alerts::*;
pub use analytics::*;
pub use auth::*;
pub use budgets::*;
pub use expenses::*;
pub use goals::*;
pub use incomes::*;
pub use profile::*;
pub use reports::*;
pub use transactions::*;

use chrono::NaiveDate;

use crate::AppError;

/// Parse an optional `YYYY-MM-DD` query parameter
fn parse_date_param(value: Option<&str>, name: &str) -> Result<Option<NaiveDate>, AppError> {
    value
        .filter(|s| !s.is_empty())
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .map_err(|_| {
            AppError::bad_request(&format!(
                "Invalid '{}' date format (use YYYY-MM-DD)",
                name
            ))
        })
}

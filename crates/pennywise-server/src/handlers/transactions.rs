//! Unified transaction view, summaries, and CSV export

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, Response, StatusCode},
    Extension, Json,
};
use chrono::Datelike;
use serde::Deserialize;
use tracing::info;

use super::parse_date_param;
use crate::{AppError, AppState, CurrentUser};
use pennywise_core::models::{CategorySummaryRow, MonthlySummaryRow, Transaction, TransactionType};
use pennywise_core::{TransactionExportOptions, TransactionFilter};

/// Query parameters for listing transactions
#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    /// Applies only together with `end_date`
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Query parameters for the category summary
#[derive(Debug, Deserialize)]
pub struct CategorySummaryQuery {
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
}

/// Query parameters for transaction export
#[derive(Debug, Deserialize)]
pub struct TransactionExportQuery {
    /// Start date (YYYY-MM-DD)
    pub from: Option<String>,
    /// End date (YYYY-MM-DD)
    pub to: Option<String>,
}

fn parse_type(value: Option<&str>) -> Result<Option<TransactionType>, AppError> {
    value
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<TransactionType>()
                .map_err(|_| AppError::bad_request("Invalid type. Use 'income' or 'expense'"))
        })
        .transpose()
}

/// GET /api/transactions - Incomes and expenses together, newest first
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<TransactionQuery>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let filter = TransactionFilter {
        category: params.category.filter(|c| !c.is_empty()),
        transaction_type: parse_type(params.transaction_type.as_deref())?,
        start_date: parse_date_param(params.start_date.as_deref(), "start_date")?,
        end_date: parse_date_param(params.end_date.as_deref(), "end_date")?,
    };

    let transactions = state.db.list_transactions(user.id, &filter)?;
    Ok(Json(transactions))
}

/// GET /api/transactions/monthly-summary - Current year by month and type
pub async fn monthly_summary(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<MonthlySummaryRow>>, AppError> {
    let year = state.clock.today().year();
    Ok(Json(state.db.monthly_summary(user.id, year)?))
}

/// GET /api/transactions/category-summary - Totals per category, largest first
pub async fn category_summary(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<CategorySummaryQuery>,
) -> Result<Json<Vec<CategorySummaryRow>>, AppError> {
    let transaction_type = parse_type(params.transaction_type.as_deref())?;
    Ok(Json(state.db.category_summary(user.id, transaction_type)?))
}

/// GET /api/transactions/export - Download transactions as CSV
pub async fn export_transactions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<TransactionExportQuery>,
) -> Result<Response<Body>, AppError> {
    let opts = TransactionExportOptions {
        from: parse_date_param(params.from.as_deref(), "from")?,
        to: parse_date_param(params.to.as_deref(), "to")?,
    };

    let export = state.db.export_transactions_csv(user.id, &opts)?;
    info!(user_id = user.id, "Exported {} transactions to CSV", export.rows);

    state.db.log_audit(
        Some(user.id),
        "export",
        Some("transaction"),
        None,
        Some(&format!("from={:?}, to={:?}, rows={}", opts.from, opts.to, export.rows)),
    )?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"transactions.csv\"",
        )
        .body(Body::from(export.csv))
        .map_err(|e| AppError::internal(&e.to_string()))
}

//! Income handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::{AppError, AppState, CurrentUser, SuccessResponse};
use pennywise_core::models::{Income, NewIncome};

/// GET /api/incomes - List the user's incomes, newest first
pub async fn list_incomes(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<Income>>, AppError> {
    let incomes = state.db.list_incomes(user.id)?;
    Ok(Json(incomes))
}

/// POST /api/incomes - Record an income
pub async fn create_income(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<NewIncome>,
) -> Result<Json<Income>, AppError> {
    let today = state.clock.today();
    let income = state
        .db
        .create_income(user.id, &req, today)
        .map_err(AppError::from_core)?;

    state.db.log_audit(
        Some(user.id),
        "create",
        Some("income"),
        Some(income.id),
        Some(&format!("amount={:.2}, category={}", income.amount, income.category)),
    )?;

    Ok(Json(income))
}

/// GET /api/incomes/:id
pub async fn get_income(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<Income>, AppError> {
    let income = state
        .db
        .get_income(user.id, id)?
        .ok_or_else(|| AppError::not_found("Income not found"))?;
    Ok(Json(income))
}

/// PUT /api/incomes/:id - Replace an income's fields
pub async fn update_income(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(req): Json<NewIncome>,
) -> Result<Json<Income>, AppError> {
    let today = state.clock.today();
    let income = state
        .db
        .update_income(user.id, id, &req, today)
        .map_err(AppError::from_core)?
        .ok_or_else(|| AppError::not_found("Income not found"))?;

    state
        .db
        .log_audit(Some(user.id), "update", Some("income"), Some(id), None)?;

    Ok(Json(income))
}

/// DELETE /api/incomes/:id
pub async fn delete_income(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_income(user.id, id)? {
        return Err(AppError::not_found("Income not found"));
    }

    state
        .db
        .log_audit(Some(user.id), "delete", Some("income"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}

/// PUT /api/incomes/:id/received - Mark an income as received
pub async fn mark_income_received(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<Income>, AppError> {
    let income = state
        .db
        .mark_income_received(user.id, id)?
        .ok_or_else(|| AppError::not_found("Income not found"))?;

    state.db.log_audit(
        Some(user.id),
        "mark_received",
        Some("income"),
        Some(id),
        None,
    )?;

    Ok(Json(income))
}

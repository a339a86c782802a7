//! Budget handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::{AppError, AppState, CurrentUser, SuccessResponse};
use pennywise_core::models::{Budget, BudgetUpdate, NewBudget};

/// GET /api/budgets
pub async fn list_budgets(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<Budget>>, AppError> {
    Ok(Json(state.db.list_budgets(user.id)?))
}

/// POST /api/budgets - Create a category budget
pub async fn create_budget(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<NewBudget>,
) -> Result<Json<Budget>, AppError> {
    let budget = state
        .db
        .create_budget(user.id, &req)
        .map_err(AppError::from_core)?;

    state.db.log_audit(
        Some(user.id),
        "create",
        Some("budget"),
        Some(budget.id),
        Some(&format!("category={}, budget={:.2}", budget.category, budget.budget)),
    )?;

    Ok(Json(budget))
}

/// GET /api/budgets/:id
pub async fn get_budget(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<Budget>, AppError> {
    let budget = state
        .db
        .get_budget(user.id, id)?
        .ok_or_else(|| AppError::not_found("Budget not found"))?;
    Ok(Json(budget))
}

/// PUT /api/budgets/:id
pub async fn update_budget(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(update): Json<BudgetUpdate>,
) -> Result<Json<Budget>, AppError> {
    let budget = state
        .db
        .update_budget(user.id, id, &update)
        .map_err(AppError::from_core)?
        .ok_or_else(|| AppError::not_found("Budget not found"))?;

    state
        .db
        .log_audit(Some(user.id), "update", Some("budget"), Some(id), None)?;

    Ok(Json(budget))
}

/// DELETE /api/budgets/:id
pub async fn delete_budget(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_budget(user.id, id)? {
        return Err(AppError::not_found("Budget not found"));
    }

    state
        .db
        .log_audit(Some(user.id), "delete", Some("budget"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}

/// PUT /api/budgets/:id/exceeded
pub async fn mark_budget_exceeded(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<Budget>, AppError> {
    let budget = state
        .db
        .mark_budget_exceeded(user.id, id)?
        .ok_or_else(|| AppError::not_found("Budget not found"))?;

    state.db.log_audit(
        Some(user.id),
        "mark_exceeded",
        Some("budget"),
        Some(id),
        None,
    )?;

    Ok(Json(budget))
}

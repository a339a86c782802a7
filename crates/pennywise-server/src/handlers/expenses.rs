//! Expense handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::{AppError, AppState, CurrentUser, SuccessResponse};
use pennywise_core::models::{Expense, ExpenseUpdate, NewExpense};

/// GET /api/expenses - List the user's expenses, newest first
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<Expense>>, AppError> {
    let expenses = state.db.list_expenses(user.id)?;
    Ok(Json(expenses))
}

/// POST /api/expenses - Record an expense
///
/// `description` and `title` fall back to each other; the date defaults to
/// today and the payment method to "Cash".
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<NewExpense>,
) -> Result<Json<Expense>, AppError> {
    let expense = state
        .db
        .create_expense(user.id, &req, state.clock.today())
        .map_err(AppError::from_core)?;

    state.db.log_audit(
        Some(user.id),
        "create",
        Some("expense"),
        Some(expense.id),
        Some(&format!("amount={:.2}, category={}", expense.amount, expense.category)),
    )?;

    Ok(Json(expense))
}

/// GET /api/expenses/:id
pub async fn get_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<Expense>, AppError> {
    let expense = state
        .db
        .get_expense(user.id, id)?
        .ok_or_else(|| AppError::not_found("Expense not found"))?;
    Ok(Json(expense))
}

/// PUT /api/expenses/:id - Partial update
pub async fn update_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(update): Json<ExpenseUpdate>,
) -> Result<Json<Expense>, AppError> {
    let expense = state
        .db
        .update_expense(user.id, id, &update)
        .map_err(AppError::from_core)?
        .ok_or_else(|| AppError::not_found("Expense not found"))?;

    state
        .db
        .log_audit(Some(user.id), "update", Some("expense"), Some(id), None)?;

    Ok(Json(expense))
}

/// DELETE /api/expenses/:id
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_expense(user.id, id)? {
        return Err(AppError::not_found("Expense not found"));
    }

    state
        .db
        .log_audit(Some(user.id), "delete", Some("expense"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}

/// PUT /api/expenses/:id/recurring - Flag an expense as recurring
pub async fn mark_expense_recurring(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<Expense>, AppError> {
    let expense = state
        .db
        .mark_expense_recurring(user.id, id)?
        .ok_or_else(|| AppError::not_found("Expense not found"))?;

    state.db.log_audit(
        Some(user.id),
        "mark_recurring",
        Some("expense"),
        Some(id),
        None,
    )?;

    Ok(Json(expense))
}

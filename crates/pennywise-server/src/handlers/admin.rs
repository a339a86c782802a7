//! Admin handlers: user management, cross-user reporting, audit log

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use tracing::info;

use super::analytics::analytics_for;
use crate::{AppError, AppState, CurrentUser, SuccessResponse, MAX_AUDIT_LIMIT};
use pennywise_core::models::{
    AdminUserUpdate, Budget, Expense, User, UserExpenseTotal, UserSpendingReport,
};
use pennywise_core::{Analytics, AuditEntry};

/// Query parameters for the audit log
#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    #[serde(default = "default_audit_limit")]
    pub limit: i64,
}

fn default_audit_limit() -> i64 {
    100
}

fn require_user(state: &AppState, id: i64) -> Result<User, AppError> {
    state
        .db
        .get_user(id)?
        .ok_or_else(|| AppError::not_found("User not found"))
}

/// GET /api/admin/users
pub async fn admin_list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.db.list_users()?))
}

/// GET /api/admin/users/:id
pub async fn admin_get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<User>, AppError> {
    Ok(Json(require_user(&state, id)?))
}

/// PUT /api/admin/users/:id - Edit name, email, or role
pub async fn admin_update_user(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(update): Json<AdminUserUpdate>,
) -> Result<Json<User>, AppError> {
    let user = state
        .db
        .admin_update_user(id, &update)
        .map_err(AppError::from_core)?;

    state.db.log_audit(
        Some(admin.id),
        "admin_update",
        Some("user"),
        Some(id),
        update.role.map(|r| format!("role={}", r)).as_deref(),
    )?;

    Ok(Json(user))
}

/// DELETE /api/admin/users/:id - Remove a user and all their records
pub async fn admin_delete_user(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if id == admin.id {
        return Err(AppError::bad_request("Admins cannot delete their own account"));
    }
    if !state.db.delete_user(id)? {
        return Err(AppError::not_found("User not found"));
    }

    info!(admin_id = admin.id, user_id = id, "Deleted user");
    state
        .db
        .log_audit(Some(admin.id), "admin_delete", Some("user"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/admin/users/:id/expenses
pub async fn admin_user_expenses(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Expense>>, AppError> {
    require_user(&state, id)?;
    Ok(Json(state.db.list_expenses(id)?))
}

/// GET /api/admin/users/:id/budgets
pub async fn admin_user_budgets(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Budget>>, AppError> {
    require_user(&state, id)?;
    Ok(Json(state.db.list_budgets(id)?))
}

/// GET /api/admin/users/:id/analytics - The aggregator run for another user
pub async fn admin_user_analytics(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Analytics>, AppError> {
    require_user(&state, id)?;
    Ok(Json(analytics_for(&state, id)?))
}

/// GET /api/admin/reports - Per-user spending against budgets
pub async fn admin_spending_reports(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserSpendingReport>>, AppError> {
    Ok(Json(state.db.user_spending_reports()?))
}

/// GET /api/admin/analytics/expenses-by-user - Largest spenders first
pub async fn admin_expenses_by_user(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserExpenseTotal>>, AppError> {
    Ok(Json(state.db.expenses_by_user()?))
}

/// GET /api/admin/audit - Recent audit entries
pub async fn list_audit_log(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AuditQuery>,
) -> Result<Json<Vec<AuditEntry>>, AppError> {
    let limit = params.limit.clamp(1, MAX_AUDIT_LIMIT);
    Ok(Json(state.db.list_audit_log(limit)?))
}

//! Alert handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::{AppError, AppState, CurrentUser, SuccessResponse};
use pennywise_core::models::{Alert, NewAlert};

/// GET /api/alerts - Newest first
pub async fn list_alerts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<Alert>>, AppError> {
    Ok(Json(state.db.list_alerts(user.id)?))
}

/// POST /api/alerts
pub async fn create_alert(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<NewAlert>,
) -> Result<Json<Alert>, AppError> {
    let alert = state
        .db
        .create_alert(user.id, &req)
        .map_err(AppError::from_core)?;

    state.db.log_audit(
        Some(user.id),
        "create",
        Some("alert"),
        Some(alert.id),
        Some(&format!("level={}", alert.level.as_str())),
    )?;

    Ok(Json(alert))
}

/// GET /api/alerts/:id
pub async fn get_alert(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<Alert>, AppError> {
    let alert = state
        .db
        .get_alert(user.id, id)?
        .ok_or_else(|| AppError::not_found("Alert not found"))?;
    Ok(Json(alert))
}

/// DELETE /api/alerts/:id
pub async fn delete_alert(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_alert(user.id, id)? {
        return Err(AppError::not_found("Alert not found"));
    }

    state
        .db
        .log_audit(Some(user.id), "delete", Some("alert"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}

/// PUT /api/alerts/:id/read
pub async fn mark_alert_read(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<Alert>, AppError> {
    let alert = state
        .db
        .mark_alert_read(user.id, id)?
        .ok_or_else(|| AppError::not_found("Alert not found"))?;

    state
        .db
        .log_audit(Some(user.id), "mark_read", Some("alert"), Some(id), None)?;

    Ok(Json(alert))
}

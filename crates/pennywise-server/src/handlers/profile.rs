//! Profile handlers for the authenticated user

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use crate::{AppError, AppState, CurrentUser, SuccessResponse};
use pennywise_core::models::{ProfileUpdate, User};

/// Request body for a password change
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// GET /api/profile
pub async fn get_profile(Extension(user): Extension<CurrentUser>) -> Json<User> {
    Json(user.0)
}

/// PUT /api/profile - Update name, contact details, bio, or photo
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<User>, AppError> {
    let updated = state
        .db
        .update_profile(user.id, &update)
        .map_err(AppError::from_core)?;

    state.db.log_audit(
        Some(user.id),
        "update",
        Some("profile"),
        Some(user.id),
        None,
    )?;

    Ok(Json(updated))
}

/// PUT /api/profile/password
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    state
        .db
        .change_password(user.id, &req.old_password, &req.new_password)
        .map_err(AppError::from_core)?;

    state.db.log_audit(
        Some(user.id),
        "change_password",
        Some("user"),
        Some(user.id),
        None,
    )?;

    Ok(Json(SuccessResponse { success: true }))
}

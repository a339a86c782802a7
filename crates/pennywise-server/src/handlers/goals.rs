//! Savings goal handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::{AppError, AppState, CurrentUser, SuccessResponse};
use pennywise_core::models::{Goal, GoalUpdate, NewGoal};

/// GET /api/goals - List goals, nearest deadline first
pub async fn list_goals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<Goal>>, AppError> {
    Ok(Json(state.db.list_goals(user.id)?))
}

/// POST /api/goals
pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<NewGoal>,
) -> Result<Json<Goal>, AppError> {
    let goal = state
        .db
        .create_goal(user.id, &req)
        .map_err(AppError::from_core)?;

    state.db.log_audit(
        Some(user.id),
        "create",
        Some("goal"),
        Some(goal.id),
        Some(&format!("target={:.2}, deadline={}", goal.target_amount, goal.deadline)),
    )?;

    Ok(Json(goal))
}

/// GET /api/goals/:id
pub async fn get_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<Goal>, AppError> {
    let goal = state
        .db
        .get_goal(user.id, id)?
        .ok_or_else(|| AppError::not_found("Goal not found"))?;
    Ok(Json(goal))
}

/// PUT /api/goals/:id
pub async fn update_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(update): Json<GoalUpdate>,
) -> Result<Json<Goal>, AppError> {
    let goal = state
        .db
        .update_goal(user.id, id, &update)
        .map_err(AppError::from_core)?
        .ok_or_else(|| AppError::not_found("Goal not found"))?;

    state
        .db
        .log_audit(Some(user.id), "update", Some("goal"), Some(id), None)?;

    Ok(Json(goal))
}

/// DELETE /api/goals/:id
pub async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_goal(user.id, id)? {
        return Err(AppError::not_found("Goal not found"));
    }

    state
        .db
        .log_audit(Some(user.id), "delete", Some("goal"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}

/// PUT /api/goals/:id/complete
pub async fn complete_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<Goal>, AppError> {
    let goal = state
        .db
        .complete_goal(user.id, id)?
        .ok_or_else(|| AppError::not_found("Goal not found"))?;

    state
        .db
        .log_audit(Some(user.id), "complete", Some("goal"), Some(id), None)?;

    Ok(Json(goal))
}

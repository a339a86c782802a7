//! Registration, login, and current-user handlers

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{issue_token, AppError, AppState, CurrentUser};
use pennywise_core::models::{NewUser, User};

/// Request body for registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for register and login
#[derive(Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// POST /api/auth/register - Create an account and start a session
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    // Public registration never grants a role
    let input = NewUser {
        name: req.name,
        email: req.email,
        password: req.password,
        role: None,
    };

    let user = state
        .db
        .register_user(&input)
        .map_err(AppError::from_core)?;

    state
        .db
        .log_audit(Some(user.id), "register", Some("user"), Some(user.id), None)?;

    let token = issue_token(&state.config, &user)?;
    Ok(Json(AuthResponse { user, token }))
}

/// POST /api/auth/login - Exchange credentials for a session token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = match state.db.authenticate(&req.email, &req.password) {
        Ok(user) => user,
        Err(e) => {
            warn!("Failed login attempt");
            state.db.log_audit(None, "login_failed", Some("user"), None, None)?;
            return Err(AppError::from_core(e));
        }
    };

    info!(user_id = user.id, "User logged in");
    state
        .db
        .log_audit(Some(user.id), "login", Some("user"), Some(user.id), None)?;

    let token = issue_token(&state.config, &user)?;
    Ok(Json(AuthResponse { user, token }))
}

/// GET /api/auth/me - The authenticated user
pub async fn get_me(Extension(user): Extension<CurrentUser>) -> Json<User> {
    Json(user.0)
}

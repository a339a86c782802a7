//! Pennywise Web Server
//!
//! Axum-based REST API for the Pennywise personal finance tracker.
//!
//! Security features:
//! - Bearer token authentication (HS256 JWT) on every route except register and login
//! - Admin-only routes guarded by the user's stored role
//! - Restrictive CORS policy
//! - Audit logging for all mutating API calls
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, warn};

use pennywise_core::models::User;
use pennywise_core::{AnalyticsConfig, Clock, Database, SystemClock};

mod handlers;

/// Default session token lifetime
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 30;

/// Maximum number of audit entries returned in one request
pub const MAX_AUDIT_LIMIT: i64 = 1000;

const BEARER_PREFIX: &str = "Bearer ";

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// HS256 signing secret for session tokens
    pub jwt_secret: String,
    /// Token lifetime in days
    pub token_ttl_days: i64,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// Window and category mode for the analytics endpoints
    pub analytics: AnalyticsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_days: DEFAULT_TOKEN_TTL_DAYS,
            allowed_origins: vec![],
            analytics: AnalyticsConfig::default(),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
    /// Source of "today" for analytics windows and default dates
    pub clock: Arc<dyn Clock>,
}

// ============================================================================
// Session tokens
// ============================================================================

/// JWT claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i64,
    pub role: String,
    /// Expiry as a unix timestamp
    pub exp: i64,
}

/// Sign a session token for `user`
pub fn issue_token(config: &ServerConfig, user: &User) -> anyhow::Result<String> {
    let exp = Utc::now() + Duration::days(config.token_ttl_days);
    let claims = Claims {
        sub: user.id,
        role: user.role.as_str().to_string(),
        exp: exp.timestamp(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?;
    Ok(token)
}

/// Verify signature and expiry, returning the claims on success
pub fn verify_token(config: &ServerConfig, token: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .ok()
    .map(|data| data.claims)
}

/// The authenticated user, attached to the request by [`auth_middleware`]
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl std::ops::Deref for CurrentUser {
    type Target = User;

    fn deref(&self) -> &User {
        &self.0
    }
}

/// Authentication middleware
///
/// Requires `Authorization: Bearer <token>`. The user is reloaded from the
/// database so role changes and deletions take effect immediately.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX));

    let Some(token) = token else {
        return AppError::unauthorized("Authentication required").into_response();
    };

    let Some(claims) = verify_token(&state.config, token) else {
        warn!(path = %request.uri().path(), "Rejected invalid or expired token");
        return AppError::unauthorized("Invalid or expired token").into_response();
    };

    match state.db.get_user(claims.sub) {
        Ok(Some(user)) => {
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        }
        Ok(None) => {
            warn!(user_id = claims.sub, "Token for unknown user");
            AppError::unauthorized("Invalid or expired token").into_response()
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Admin guard, layered inside [`auth_middleware`]
pub async fn admin_middleware(request: Request, next: Next) -> Response {
    let is_admin = request
        .extensions()
        .get::<CurrentUser>()
        .map(|user| user.is_admin());

    match is_admin {
        Some(true) => next.run(request).await,
        Some(false) => AppError::forbidden("Admin access required").into_response(),
        None => AppError::unauthorized("Authentication required").into_response(),
    }
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    create_router_with_clock(db, static_dir, config, Arc::new(SystemClock))
}

/// Create the application router with an explicit clock (for testing)
pub fn create_router_with_clock(
    db: Database,
    static_dir: Option<&str>,
    config: ServerConfig,
    clock: Arc<dyn Clock>,
) -> Router {
    let state = Arc::new(AppState {
        db,
        config: config.clone(),
        clock,
    });

    let public_routes = Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login));

    let report_routes = Router::new()
        .route(
            "/reports",
            get(handlers::list_reports).post(handlers::generate_report),
        )
        .route(
            "/reports/:id",
            get(handlers::get_report).delete(handlers::delete_report),
        )
        .route("/reports/:id/download", get(handlers::download_report));

    let admin_routes = Router::new()
        .route("/admin/users", get(handlers::admin_list_users))
        .route(
            "/admin/users/:id",
            get(handlers::admin_get_user)
                .put(handlers::admin_update_user)
                .delete(handlers::admin_delete_user),
        )
        .route("/admin/users/:id/expenses", get(handlers::admin_user_expenses))
        .route("/admin/users/:id/budgets", get(handlers::admin_user_budgets))
        .route(
            "/admin/users/:id/analytics",
            get(handlers::admin_user_analytics),
        )
        .route("/admin/reports", get(handlers::admin_spending_reports))
        .route(
            "/admin/analytics/expenses-by-user",
            get(handlers::admin_expenses_by_user),
        )
        .route("/admin/audit", get(handlers::list_audit_log))
        .merge(report_routes)
        .route_layer(middleware::from_fn(admin_middleware));

    let protected_routes = Router::new()
        // Auth
        .route("/auth/me", get(handlers::get_me))
        // Profile
        .route(
            "/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route("/profile/password", put(handlers::change_password))
        // Incomes
        .route(
            "/incomes",
            get(handlers::list_incomes).post(handlers::create_income),
        )
        .route(
            "/incomes/:id",
            get(handlers::get_income)
                .put(handlers::update_income)
                .delete(handlers::delete_income),
        )
        .route("/incomes/:id/received", put(handlers::mark_income_received))
        // Expenses
        .route(
            "/expenses",
            get(handlers::list_expenses).post(handlers::create_expense),
        )
        .route(
            "/expenses/:id",
            get(handlers::get_expense)
                .put(handlers::update_expense)
                .delete(handlers::delete_expense),
        )
        .route(
            "/expenses/:id/recurring",
            put(handlers::mark_expense_recurring),
        )
        // Transactions
        .route("/transactions", get(handlers::list_transactions))
        .route(
            "/transactions/monthly-summary",
            get(handlers::monthly_summary),
        )
        .route(
            "/transactions/category-summary",
            get(handlers::category_summary),
        )
        .route("/transactions/export", get(handlers::export_transactions))
        // Budgets
        .route(
            "/budgets",
            get(handlers::list_budgets).post(handlers::create_budget),
        )
        .route(
            "/budgets/:id",
            get(handlers::get_budget)
                .put(handlers::update_budget)
                .delete(handlers::delete_budget),
        )
        .route("/budgets/:id/exceeded", put(handlers::mark_budget_exceeded))
        // Goals
        .route("/goals", get(handlers::list_goals).post(handlers::create_goal))
        .route(
            "/goals/:id",
            get(handlers::get_goal)
                .put(handlers::update_goal)
                .delete(handlers::delete_goal),
        )
        .route("/goals/:id/complete", put(handlers::complete_goal))
        // Alerts
        .route(
            "/alerts",
            get(handlers::list_alerts).post(handlers::create_alert),
        )
        .route(
            "/alerts/:id",
            get(handlers::get_alert).delete(handlers::delete_alert),
        )
        .route("/alerts/:id/read", put(handlers::mark_alert_read))
        // Analytics
        .route("/analytics", get(handlers::get_analytics))
        .merge(admin_routes)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = public_routes.merge(protected_routes);

    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' https: data:; connect-src 'self'; frame-ancestors 'none'",
    );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server
pub async fn serve(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    jwt_secret: String,
) -> anyhow::Result<()> {
    let config = ServerConfig {
        jwt_secret,
        ..Default::default()
    };
    serve_with_config(db, host, port, static_dir, config).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if config.jwt_secret.is_empty() {
        anyhow::bail!("A JWT secret is required to start the server");
    }
    if config.allowed_origins.is_empty() {
        info!("CORS: same-origin only");
    } else {
        info!(origins = ?config.allowed_origins, "CORS: allowing configured origins");
    }

    let users = db.count_users()?;
    if users == 0 {
        warn!("No users registered yet; the first account must be promoted with `pennywise users promote`");
    }

    let app = create_router(db, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    fn with_status(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn bad_request(msg: &str) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, msg)
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self::with_status(StatusCode::UNAUTHORIZED, msg)
    }

    pub fn forbidden(msg: &str) -> Self {
        Self::with_status(StatusCode::FORBIDDEN, msg)
    }

    pub fn not_found(msg: &str) -> Self {
        Self::with_status(StatusCode::NOT_FOUND, msg)
    }

    pub fn conflict(msg: &str) -> Self {
        Self::with_status(StatusCode::CONFLICT, msg)
    }

    pub fn internal(msg: &str) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    /// Map a core error to a client-facing status
    ///
    /// Validation, lookup, conflict and credential errors carry their message
    /// to the client. Everything else is a 500 with a generic message.
    pub fn from_core(err: pennywise_core::Error) -> Self {
        use pennywise_core::Error;

        match err {
            Error::NotFound(msg) => Self::not_found(&msg),
            Error::InvalidData(msg) => Self::bad_request(&msg),
            Error::Conflict(msg) => Self::conflict(&msg),
            Error::Auth(msg) => Self::unauthorized(&msg),
            other => Self::from(other),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

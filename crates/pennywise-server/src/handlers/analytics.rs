//! Analytics handler

use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use crate::{AppError, AppState, CurrentUser};
use pennywise_core::{Analytics, AnalyticsEngine};

/// Run the aggregator for `user_id` with the server's clock and settings
pub(crate) fn analytics_for(state: &AppState, user_id: i64) -> Result<Analytics, AppError> {
    let engine = AnalyticsEngine::new(
        &state.db,
        state.clock.as_ref(),
        state.config.analytics,
    );
    // Store failures stay generic 500s
    Ok(engine.generate(user_id)?)
}

/// GET /api/analytics - Summary, trend, forecast, risk, and advice
///
/// Returns `{"message": "No data"}` when the window holds no transactions.
pub async fn get_analytics(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Analytics>, AppError> {
    Ok(Json(analytics_for(&state, user.id)?))
}

//! Report handlers (admin only)

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, Response, StatusCode},
    Extension, Json,
};

use crate::{AppError, AppState, CurrentUser, SuccessResponse};
use pennywise_core::models::{NewReport, Report};

/// GET /api/reports - Newest first
pub async fn list_reports(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Report>>, AppError> {
    Ok(Json(state.db.list_reports()?))
}

/// POST /api/reports - Snapshot current totals into a report
pub async fn generate_report(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<NewReport>,
) -> Result<Json<Report>, AppError> {
    let report = state
        .db
        .generate_report(Some(user.id), &req)
        .map_err(AppError::from_core)?;

    state.db.log_audit(
        Some(user.id),
        "generate",
        Some("report"),
        Some(report.id),
        Some(&format!("type={}, checksum={}", report.report_type.as_str(), report.checksum)),
    )?;

    Ok(Json(report))
}

/// GET /api/reports/:id
pub async fn get_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Report>, AppError> {
    let report = state
        .db
        .get_report(id)?
        .ok_or_else(|| AppError::not_found("Report not found"))?;
    Ok(Json(report))
}

/// GET /api/reports/:id/download - The stored CSV document
pub async fn download_report(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Response<Body>, AppError> {
    let document = state
        .db
        .get_report_document(id)?
        .ok_or_else(|| AppError::not_found("Report not found"))?;

    state
        .db
        .log_audit(Some(user.id), "download", Some("report"), Some(id), None)?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"report-{}.csv\"", id),
        )
        .body(Body::from(document))
        .map_err(|e| AppError::internal(&e.to_string()))
}

/// DELETE /api/reports/:id
pub async fn delete_report(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_report(id)? {
        return Err(AppError::not_found("Report not found"));
    }

    state
        .db
        .log_audit(Some(user.id), "delete", Some("report"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}

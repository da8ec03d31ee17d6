use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::errors::AppError;
use crate::models::{IntelligenceReport, ReportStatus, SubmitReport};
use crate::state::AppState;
use crate::store::EventRepository;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reports))
        .route("/submit", post(submit_report))
}

/// POST /api/reports/submit
///
/// Record a geopolitical intelligence report with its staked amount. This is
/// a write endpoint: validation and store failures surface as `{error}`
/// responses instead of degrading.
async fn submit_report(
    State(state): State<AppState>,
    Json(payload): Json<SubmitReport>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    validate_submission(&payload)?;

    let now = Utc::now();
    let report = IntelligenceReport {
        id: format!("rpt-{}", now.timestamp_millis()),
        title: payload.title,
        description: payload.description,
        event_date: payload.event_date,
        countries: payload.countries,
        impact_type: payload.impact_type,
        stake_amount: payload.stake_amount,
        status: ReportStatus::Pending,
        created_at: now.to_rfc3339(),
    };

    // TODO: transfer the stake on-ledger via the token service client once it
    // is wired in; until then the stake is only recorded locally.
    state.repo.insert_report(&report).await?;

    info!(
        "POST /api/reports/submit - stored report {} ({} staked)",
        report.id, report.stake_amount
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "report_id": report.id,
            "message": "Report submitted successfully. Assessment in progress...",
        })),
    ))
}

fn validate_submission(payload: &SubmitReport) -> Result<(), AppError> {
    let title_len = payload.title.chars().count();
    if !(5..=200).contains(&title_len) {
        return Err(AppError::Validation(
            "title must be between 5 and 200 characters".to_string(),
        ));
    }
    let description_len = payload.description.chars().count();
    if !(20..=5000).contains(&description_len) {
        return Err(AppError::Validation(
            "description must be between 20 and 5000 characters".to_string(),
        ));
    }
    if DateTime::parse_from_rfc3339(&payload.event_date).is_err() {
        return Err(AppError::Validation(
            "event_date must be an RFC 3339 datetime".to_string(),
        ));
    }
    if payload.countries.is_empty() || payload.countries.len() > 10 {
        return Err(AppError::Validation(
            "countries must list between 1 and 10 entries".to_string(),
        ));
    }
    if payload.stake_amount < 1.0 {
        return Err(AppError::Validation(
            "stake_amount must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct ListParams {
    status: Option<String>,
    limit: Option<i64>,
}

/// GET /api/reports?status=&limit=
async fn list_reports(
    Query(params): Query<ListParams>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let limit = params.limit.unwrap_or(20).clamp(1, 100);
    info!(
        "GET /api/reports - status={:?}, limit={limit}",
        params.status
    );

    let reports = state
        .repo
        .reports(params.status.as_deref(), limit)
        .await?;

    Ok(Json(json!({
        "success": true,
        "count": reports.len(),
        "reports": reports,
    })))
}

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::NewsSummary;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_news_summary))
}

#[derive(Debug, Deserialize)]
struct SummaryParams {
    event_type: Option<String>,
}

/// GET /api/news-summary?event_type=
///
/// News context for a reconciliation task: wire search, article scrape,
/// AI-condensed bullets.
async fn get_news_summary(
    Query(params): Query<SummaryParams>,
    State(state): State<AppState>,
) -> Result<Json<NewsSummary>, AppError> {
    let event_type = params
        .event_type
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            AppError::Validation("event_type query parameter is required".to_string())
        })?;

    info!("GET /api/news-summary - event_type={event_type}");

    match state.news_summary.summary_for_event(event_type).await? {
        Some(summary) => Ok(Json(summary)),
        None => Err(AppError::NotFound(
            "No news summary found for this event".to_string(),
        )),
    }
}

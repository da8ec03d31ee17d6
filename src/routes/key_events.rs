use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::KeyEvent;
use crate::state::AppState;
use crate::store::EventRepository;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_key_events))
        .route("/:id", get(get_key_event))
}

#[derive(Debug, Deserialize)]
struct ListParams {
    limit: Option<i64>,
}

#[derive(Debug, Serialize)]
struct KeyEventList {
    events: Vec<KeyEvent>,
}

/// GET /api/key-events?limit=
///
/// Stored workflow snapshots, newest first. The store is authoritative;
/// the in-memory repository covers snapshots that never made it to disk.
async fn list_key_events(
    Query(params): Query<ListParams>,
    State(state): State<AppState>,
) -> Result<Json<KeyEventList>, AppError> {
    let limit = params.limit.unwrap_or(50).clamp(1, 100);
    info!("GET /api/key-events - limit={limit}");

    let events = match state.repo.key_events(limit).await {
        Ok(events) => events,
        Err(e) => {
            warn!("key event store unavailable, serving in-memory snapshots: {e}");
            state.memory.key_events(limit).await?
        }
    };

    Ok(Json(KeyEventList { events }))
}

/// GET /api/key-events/:id
async fn get_key_event(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<KeyEvent>, AppError> {
    info!("GET /api/key-events/{id}");

    match state.repo.key_event_by_id(&id).await {
        Ok(Some(event)) => return Ok(Json(event)),
        Ok(None) => {}
        Err(e) => warn!("key event store unavailable, checking memory: {e}"),
    }

    match state.memory.key_event_by_id(&id).await? {
        Some(event) => Ok(Json(event)),
        None => Err(AppError::NotFound("Event not found".to_string())),
    }
}

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{info, warn};

use crate::fallback;
use crate::models::ReconciliationTask;
use crate::state::AppState;
use crate::store::EventRepository;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_tasks))
}

/// GET /api/reconciliation-tasks
///
/// Stored tasks when any exist, otherwise the canned demo payload.
async fn list_tasks(State(state): State<AppState>) -> Json<Vec<ReconciliationTask>> {
    info!("GET /api/reconciliation-tasks");

    match state.repo.reconciliation_tasks().await {
        Ok(tasks) if !tasks.is_empty() => Json(tasks),
        Ok(_) => Json(fallback::reconciliation_tasks()),
        Err(e) => {
            warn!("task store unavailable, serving canned tasks: {e}");
            Json(fallback::reconciliation_tasks())
        }
    }
}

use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{
    events, health, key_events, news_summary, reconciliation_tasks, reports, workflow,
};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/api/health", health::router())
        .nest("/api/events", events::router())
        .nest("/api/workflow", workflow::router())
        .nest("/api/key-events", key_events::router())
        .nest("/api/reconciliation-tasks", reconciliation_tasks::router())
        .nest("/api/news-summary", news_summary::router())
        .nest("/api/reports", reports::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

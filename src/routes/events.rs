use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{info, warn};

use crate::fallback;
use crate::models::GeoEvent;
use crate::services::event_feed;
use crate::state::AppState;
use crate::store::EventRepository;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_events))
}

/// GET /api/events
///
/// Geopolitical event feed for the dashboard. Degrades in visible steps:
/// stored rows first, then a live backfill from the news API, then the
/// canned payload. Always answers 200.
async fn list_events(State(state): State<AppState>) -> Json<Vec<GeoEvent>> {
    info!("GET /api/events - Fetching geopolitical events");

    match state.repo.geo_events(50).await {
        Ok(events) if !events.is_empty() => return Json(events),
        Ok(_) => {}
        Err(e) => {
            warn!("geo event store unavailable, serving canned feed: {e}");
            return Json(fallback::geo_events());
        }
    }

    match event_feed::backfill_geo_events(state.news.as_ref(), state.repo.as_ref()).await {
        Ok(events) if !events.is_empty() => Json(events),
        Ok(_) => {
            info!("live backfill returned no articles, serving canned feed");
            Json(fallback::geo_events())
        }
        Err(e) => {
            warn!("live backfill failed, serving canned feed: {e}");
            Json(fallback::geo_events())
        }
    }
}

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::{HoldingSpec, PortfolioHolding, WorkflowResponse};
use crate::services::workflow::WorkflowRequest;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(run_workflow_get).post(run_workflow_post))
}

#[derive(Debug, Deserialize)]
struct WorkflowParams {
    q: Option<String>,
    source: Option<String>,
    from: Option<String>,
    to: Option<String>,
    timestamp: Option<String>,
    /// Comma-separated tickers, e.g. `?portfolio=NVDA,AMD,XLU`.
    portfolio: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WorkflowBody {
    #[serde(default)]
    portfolio: Vec<HoldingSpec>,
}

fn build_request(params: WorkflowParams, body_portfolio: Vec<HoldingSpec>) -> WorkflowRequest {
    let portfolio: Vec<PortfolioHolding> = if !body_portfolio.is_empty() {
        body_portfolio.into_iter().map(Into::into).collect()
    } else {
        params
            .portfolio
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|ticker| !ticker.is_empty())
                    .map(|ticker| PortfolioHolding {
                        ticker: ticker.to_string(),
                        weight: None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    };

    WorkflowRequest {
        query: params.q,
        use_top_news: params.source.as_deref() == Some("top"),
        from: params.from,
        to: params.to,
        timestamp: params.timestamp,
        portfolio,
    }
}

/// GET /api/workflow
///
/// Run the full pipeline: news ingestion, event extraction, multi-agent
/// reasoning, analyst estimates, deterministic rebalance, and a stored
/// key-event snapshot.
async fn run_workflow_get(
    Query(params): Query<WorkflowParams>,
    State(state): State<AppState>,
) -> Result<Json<WorkflowResponse>, AppError> {
    info!(
        "GET /api/workflow - q={:?}, source={:?}, timestamp={:?}",
        params.q, params.source, params.timestamp
    );
    let request = build_request(params, Vec::new());
    Ok(Json(state.workflow.run(request).await?))
}

/// POST /api/workflow
///
/// Same pipeline, with the caller's portfolio in the JSON body:
/// `{"portfolio": ["NVDA", {"ticker": "XLU", "weight": 0.1}]}`.
async fn run_workflow_post(
    Query(params): Query<WorkflowParams>,
    State(state): State<AppState>,
    body: Option<Json<WorkflowBody>>,
) -> Result<Json<WorkflowResponse>, AppError> {
    let body = body.map(|Json(body)| body).unwrap_or_default();
    info!(
        "POST /api/workflow - q={:?}, {} holdings",
        params.q,
        body.portfolio.len()
    );
    let request = build_request(params, body.portfolio);
    Ok(Json(state.workflow.run(request).await?))
}

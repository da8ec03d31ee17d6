mod app;
mod db;
mod errors;
mod external;
mod fallback;
mod models;
mod routes;
mod services;
mod state;
mod store;

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::external::{
    ChatCompletions, DedalusClient, DedalusConfig, EstimatesProvider, FinancialDatasetsProvider,
    NewsProvider, WorldNewsProvider,
};
use crate::services::extraction::ExtractionService;
use crate::services::news_summary::NewsSummaryService;
use crate::services::reasoning::ReasoningService;
use crate::services::workflow::WorkflowService;
use crate::state::AppState;
use crate::store::{EventRepository, MemoryRepository, SqliteRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://politifolio.db".to_string());
    let options = SqliteConnectOptions::from_str(&database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;
    db::schema::init_schema(&pool).await?;

    let news: Arc<dyn NewsProvider> = Arc::new(WorldNewsProvider::from_env());
    let chat: Arc<dyn ChatCompletions> = Arc::new(DedalusClient::new(DedalusConfig::from_env()));
    let estimates: Arc<dyn EstimatesProvider> = Arc::new(FinancialDatasetsProvider::from_env());

    let repo: Arc<dyn EventRepository> = Arc::new(SqliteRepository::new(pool));
    let memory = Arc::new(MemoryRepository::new());

    let workflow = Arc::new(WorkflowService::new(
        news.clone(),
        ExtractionService::new(chat.clone()),
        ReasoningService::new(chat.clone()),
        estimates,
        repo.clone(),
        memory.clone(),
    ));
    let news_summary = Arc::new(NewsSummaryService::new(news.clone(), chat));

    let state = AppState {
        repo,
        memory,
        news,
        workflow,
        news_summary,
    };
    let app = app::create_app(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(3001);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Politifolio backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

use std::sync::Arc;

use crate::external::NewsProvider;
use crate::services::news_summary::NewsSummaryService;
use crate::services::workflow::WorkflowService;
use crate::store::{EventRepository, MemoryRepository};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn EventRepository>,
    /// Fallback store for snapshots the primary repository rejected.
    pub memory: Arc<MemoryRepository>,
    pub news: Arc<dyn NewsProvider>,
    pub workflow: Arc<WorkflowService>,
    pub news_summary: Arc<NewsSummaryService>,
}

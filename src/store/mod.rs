//! Repository seam over the embedded store.
//!
//! Controllers and services hold an `Arc<dyn EventRepository>` instead of
//! reaching into a process-global list, so the backing store can be the
//! SQLite pool in production and the in-memory variant in tests or when the
//! pool is unavailable.

mod memory;
mod sqlite;

use async_trait::async_trait;

pub use memory::MemoryRepository;
pub use sqlite::SqliteRepository;

use crate::errors::AppError;
use crate::models::{
    GeoEvent, IntelligenceReport, KeyEvent, NewGeoEvent, ReconciliationTask,
};

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn geo_events(&self, limit: i64) -> Result<Vec<GeoEvent>, AppError>;
    async fn insert_geo_event(&self, event: &NewGeoEvent) -> Result<i64, AppError>;

    async fn reconciliation_tasks(&self) -> Result<Vec<ReconciliationTask>, AppError>;
    async fn insert_reconciliation_task(&self, task: &ReconciliationTask)
        -> Result<(), AppError>;

    async fn key_events(&self, limit: i64) -> Result<Vec<KeyEvent>, AppError>;
    async fn key_event_by_id(&self, id: &str) -> Result<Option<KeyEvent>, AppError>;
    async fn store_key_event(&self, event: &KeyEvent) -> Result<(), AppError>;

    async fn insert_report(&self, report: &IntelligenceReport) -> Result<(), AppError>;
    async fn reports(
        &self,
        status: Option<&str>,
        limit: i64,
    ) -> Result<Vec<IntelligenceReport>, AppError>;
}

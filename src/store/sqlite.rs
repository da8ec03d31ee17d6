use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::db;
use crate::errors::AppError;
use crate::models::{
    GeoEvent, IntelligenceReport, KeyEvent, NewGeoEvent, ReconciliationTask,
};
use crate::store::EventRepository;

/// Production repository backed by the embedded SQLite pool.
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for SqliteRepository {
    async fn geo_events(&self, limit: i64) -> Result<Vec<GeoEvent>, AppError> {
        Ok(db::geo_event_queries::list(&self.pool, limit).await?)
    }

    async fn insert_geo_event(&self, event: &NewGeoEvent) -> Result<i64, AppError> {
        Ok(db::geo_event_queries::insert(&self.pool, event).await?)
    }

    async fn reconciliation_tasks(&self) -> Result<Vec<ReconciliationTask>, AppError> {
        Ok(db::reconciliation_queries::list(&self.pool).await?)
    }

    async fn insert_reconciliation_task(
        &self,
        task: &ReconciliationTask,
    ) -> Result<(), AppError> {
        Ok(db::reconciliation_queries::upsert(&self.pool, task).await?)
    }

    async fn key_events(&self, limit: i64) -> Result<Vec<KeyEvent>, AppError> {
        db::key_event_queries::list(&self.pool, limit).await
    }

    async fn key_event_by_id(&self, id: &str) -> Result<Option<KeyEvent>, AppError> {
        db::key_event_queries::by_id(&self.pool, id).await
    }

    async fn store_key_event(&self, event: &KeyEvent) -> Result<(), AppError> {
        db::key_event_queries::insert(&self.pool, event).await
    }

    async fn insert_report(&self, report: &IntelligenceReport) -> Result<(), AppError> {
        Ok(db::report_queries::insert(&self.pool, report).await?)
    }

    async fn reports(
        &self,
        status: Option<&str>,
        limit: i64,
    ) -> Result<Vec<IntelligenceReport>, AppError> {
        Ok(db::report_queries::list(&self.pool, status, limit).await?)
    }
}

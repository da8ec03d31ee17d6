use async_trait::async_trait;
use parking_lot::RwLock;

use crate::errors::AppError;
use crate::models::{
    GeoEvent, IntelligenceReport, KeyEvent, NewGeoEvent, ReconciliationTask,
};
use crate::store::EventRepository;

#[derive(Default)]
struct MemoryState {
    geo_events: Vec<GeoEvent>,
    next_geo_id: i64,
    tasks: Vec<ReconciliationTask>,
    key_events: Vec<KeyEvent>,
    reports: Vec<IntelligenceReport>,
}

/// Append-only in-memory repository. Doubles as the runtime fallback when
/// the SQLite store rejects a write and as the test double for pipeline
/// tests. Rows live until the process exits.
#[derive(Default)]
pub struct MemoryRepository {
    state: RwLock<MemoryState>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for MemoryRepository {
    async fn geo_events(&self, limit: i64) -> Result<Vec<GeoEvent>, AppError> {
        let state = self.state.read();
        Ok(state
            .geo_events
            .iter()
            .rev()
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn insert_geo_event(&self, event: &NewGeoEvent) -> Result<i64, AppError> {
        let mut state = self.state.write();
        state.next_geo_id += 1;
        let id = state.next_geo_id;
        state.geo_events.push(event.clone().with_id(id));
        Ok(id)
    }

    async fn reconciliation_tasks(&self) -> Result<Vec<ReconciliationTask>, AppError> {
        let state = self.state.read();
        Ok(state.tasks.iter().rev().cloned().collect())
    }

    async fn insert_reconciliation_task(
        &self,
        task: &ReconciliationTask,
    ) -> Result<(), AppError> {
        let mut state = self.state.write();
        state.tasks.retain(|existing| existing.id != task.id);
        state.tasks.push(task.clone());
        Ok(())
    }

    async fn key_events(&self, limit: i64) -> Result<Vec<KeyEvent>, AppError> {
        let state = self.state.read();
        Ok(state
            .key_events
            .iter()
            .rev()
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn key_event_by_id(&self, id: &str) -> Result<Option<KeyEvent>, AppError> {
        let state = self.state.read();
        Ok(state.key_events.iter().find(|event| event.id == id).cloned())
    }

    async fn store_key_event(&self, event: &KeyEvent) -> Result<(), AppError> {
        self.state.write().key_events.push(event.clone());
        Ok(())
    }

    async fn insert_report(&self, report: &IntelligenceReport) -> Result<(), AppError> {
        self.state.write().reports.push(report.clone());
        Ok(())
    }

    async fn reports(
        &self,
        status: Option<&str>,
        limit: i64,
    ) -> Result<Vec<IntelligenceReport>, AppError> {
        let state = self.state.read();
        Ok(state
            .reports
            .iter()
            .rev()
            .filter(|report| status.is_none_or(|wanted| report.status.as_str() == wanted))
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeoEventType, RebalancePlan, Severity};
    use chrono::Utc;
    use std::collections::HashMap;

    fn geo(title: &str) -> NewGeoEvent {
        NewGeoEvent {
            timestamp: "2025-11-02 09:00:00".to_string(),
            kind: GeoEventType::Trade,
            severity: Severity::High,
            title: title.to_string(),
            description: String::new(),
            country: "Taiwan".to_string(),
            affected_transactions: 0,
            source: "World News API".to_string(),
        }
    }

    fn key_event(id: &str) -> KeyEvent {
        KeyEvent {
            id: id.to_string(),
            timestamp: Utc::now(),
            news: Vec::new(),
            extraction: None,
            reasoning: None,
            estimates: HashMap::new(),
            rebalance: RebalancePlan::default(),
        }
    }

    #[tokio::test]
    async fn geo_events_get_sequential_ids_and_list_newest_first() {
        let repo = MemoryRepository::new();
        assert_eq!(repo.insert_geo_event(&geo("first")).await.unwrap(), 1);
        assert_eq!(repo.insert_geo_event(&geo("second")).await.unwrap(), 2);

        let events = repo.geo_events(50).await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "second");
    }

    #[tokio::test]
    async fn key_event_lookup_and_cap() {
        let repo = MemoryRepository::new();
        for id in ["wf-1", "wf-2", "wf-3"] {
            repo.store_key_event(&key_event(id)).await.unwrap();
        }

        let found = repo.key_event_by_id("wf-2").await.unwrap();
        assert_eq!(found.unwrap().id, "wf-2");
        assert!(repo.key_event_by_id("wf-9").await.unwrap().is_none());

        let listed = repo.key_events(2).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, "wf-3");
    }

    #[tokio::test]
    async fn task_upsert_replaces_by_id() {
        let repo = MemoryRepository::new();
        let mut task = crate::models::ReconciliationTask {
            id: "rec-1".to_string(),
            event_type: "Sanctions".to_string(),
            triggered_by: "Geopolitical Workflow".to_string(),
            status: crate::models::TaskStatus::Processing,
            transactions_scanned: 0,
            transactions_flagged: 0,
            transactions_reconciled: 0,
            start_time: "2025-11-02 09:00:00".to_string(),
            completion_time: None,
            estimated_savings: 0.0,
            assigned_to: None,
            priority: crate::models::TaskPriority::High,
        };
        repo.insert_reconciliation_task(&task).await.unwrap();
        task.status = crate::models::TaskStatus::Completed;
        repo.insert_reconciliation_task(&task).await.unwrap();

        let tasks = repo.reconciliation_tasks().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].status, crate::models::TaskStatus::Completed);
    }
}

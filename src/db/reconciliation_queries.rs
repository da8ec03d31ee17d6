use sqlx::SqlitePool;

use crate::models::{ReconciliationTask, TaskPriority, TaskStatus};

#[derive(Debug, sqlx::FromRow)]
struct ReconciliationTaskRow {
    id: String,
    event_type: String,
    triggered_by: String,
    status: String,
    transactions_scanned: i64,
    transactions_flagged: i64,
    transactions_reconciled: i64,
    start_time: String,
    completion_time: Option<String>,
    estimated_savings: f64,
    assigned_to: Option<String>,
    priority: Option<String>,
}

impl ReconciliationTaskRow {
    fn into_task(self) -> ReconciliationTask {
        ReconciliationTask {
            id: self.id,
            event_type: self.event_type,
            triggered_by: self.triggered_by,
            status: TaskStatus::from_str_lossy(&self.status),
            transactions_scanned: self.transactions_scanned,
            transactions_flagged: self.transactions_flagged,
            transactions_reconciled: self.transactions_reconciled,
            start_time: self.start_time,
            completion_time: self.completion_time,
            estimated_savings: self.estimated_savings,
            assigned_to: self.assigned_to,
            priority: TaskPriority::from_str_lossy(self.priority.as_deref().unwrap_or_default()),
        }
    }
}

pub async fn upsert(pool: &SqlitePool, task: &ReconciliationTask) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT OR REPLACE INTO reconciliation_tasks
            (id, event_type, triggered_by, status, transactions_scanned,
             transactions_flagged, transactions_reconciled, start_time,
             completion_time, estimated_savings, assigned_to, priority)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&task.id)
    .bind(&task.event_type)
    .bind(&task.triggered_by)
    .bind(task.status.as_str())
    .bind(task.transactions_scanned)
    .bind(task.transactions_flagged)
    .bind(task.transactions_reconciled)
    .bind(&task.start_time)
    .bind(&task.completion_time)
    .bind(task.estimated_savings)
    .bind(&task.assigned_to)
    .bind(task.priority.as_str())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<ReconciliationTask>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ReconciliationTaskRow>(
        r#"
        SELECT id, event_type, triggered_by, status, transactions_scanned,
               transactions_flagged, transactions_reconciled, start_time,
               completion_time, estimated_savings, assigned_to, priority
        FROM reconciliation_tasks
        ORDER BY start_time DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(ReconciliationTaskRow::into_task)
        .collect())
}

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::models::KeyEvent;

#[derive(Debug, sqlx::FromRow)]
struct KeyEventRow {
    id: String,
    timestamp: String,
    news: Option<String>,
    extraction: Option<String>,
    reasoning: Option<String>,
    estimates: Option<String>,
    rebalance: Option<String>,
}

impl KeyEventRow {
    fn into_key_event(self) -> Result<KeyEvent, AppError> {
        let timestamp = DateTime::parse_from_rfc3339(&self.timestamp)
            .map_err(|e| AppError::External(format!("invalid stored timestamp: {e}")))?
            .with_timezone(&Utc);

        Ok(KeyEvent {
            id: self.id,
            timestamp,
            news: decode_column("news", self.news.as_deref())?.unwrap_or_default(),
            extraction: decode_column("extraction", self.extraction.as_deref())?,
            reasoning: decode_column("reasoning", self.reasoning.as_deref())?,
            estimates: decode_column("estimates", self.estimates.as_deref())?.unwrap_or_default(),
            rebalance: decode_column("rebalance", self.rebalance.as_deref())?.unwrap_or_default(),
        })
    }
}

fn decode_column<T: serde::de::DeserializeOwned>(
    column: &str,
    raw: Option<&str>,
) -> Result<Option<T>, AppError> {
    raw.map(serde_json::from_str)
        .transpose()
        .map_err(|e| AppError::External(format!("corrupt {column} blob in key_events: {e}")))
}

pub async fn insert(pool: &SqlitePool, event: &KeyEvent) -> Result<(), AppError> {
    let news = serde_json::to_string(&event.news)
        .map_err(|e| AppError::External(format!("failed to encode news: {e}")))?;
    let extraction = event
        .extraction
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| AppError::External(format!("failed to encode extraction: {e}")))?;
    let reasoning = event
        .reasoning
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| AppError::External(format!("failed to encode reasoning: {e}")))?;
    let estimates = serde_json::to_string(&event.estimates)
        .map_err(|e| AppError::External(format!("failed to encode estimates: {e}")))?;
    let rebalance = serde_json::to_string(&event.rebalance)
        .map_err(|e| AppError::External(format!("failed to encode rebalance: {e}")))?;

    sqlx::query(
        r#"
        INSERT INTO key_events (id, timestamp, news, extraction, reasoning, estimates, rebalance)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&event.id)
    .bind(event.timestamp.to_rfc3339())
    .bind(news)
    .bind(extraction)
    .bind(reasoning)
    .bind(estimates)
    .bind(rebalance)
    .execute(pool)
    .await
    .map_err(AppError::Db)?;

    Ok(())
}

pub async fn list(pool: &SqlitePool, limit: i64) -> Result<Vec<KeyEvent>, AppError> {
    let rows = sqlx::query_as::<_, KeyEventRow>(
        r#"
        SELECT id, timestamp, news, extraction, reasoning, estimates, rebalance
        FROM key_events
        ORDER BY timestamp DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
    .map_err(AppError::Db)?;

    rows.into_iter().map(KeyEventRow::into_key_event).collect()
}

pub async fn by_id(pool: &SqlitePool, id: &str) -> Result<Option<KeyEvent>, AppError> {
    let row = sqlx::query_as::<_, KeyEventRow>(
        r#"
        SELECT id, timestamp, news, extraction, reasoning, estimates, rebalance
        FROM key_events
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(AppError::Db)?;

    row.map(KeyEventRow::into_key_event).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::init_schema;
    use crate::models::{
        AnalystEstimate, ExtractedEvent, NewsArticle, RebalanceAdjustment, RebalancePlan, Severity,
    };
    use sqlx::sqlite::SqlitePoolOptions;
    use std::collections::HashMap;

    async fn test_pool() -> SqlitePool {
        // One connection only: every pooled connection would otherwise get
        // its own private in-memory database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        init_schema(&pool).await.expect("schema");
        pool
    }

    fn sample_key_event(id: &str) -> KeyEvent {
        let mut estimates = HashMap::new();
        estimates.insert(
            "NVDA".to_string(),
            vec![AnalystEstimate {
                fiscal_period: "FY2026".to_string(),
                period: "annual".to_string(),
                earnings_per_share: Some(4.21),
            }],
        );

        KeyEvent {
            id: id.to_string(),
            timestamp: Utc::now(),
            news: vec![NewsArticle {
                id: Some(17),
                title: "TSMC warns on chip tariffs".to_string(),
                text: None,
                summary: Some("New export controls expected.".to_string()),
                url: Some("https://example.com/tsmc".to_string()),
                publish_date: Some("2025-11-02 09:15:00".to_string()),
                authors: vec!["Wire Desk".to_string()],
            }],
            extraction: Some(ExtractedEvent {
                event_type: "Trade Restriction".to_string(),
                affected_countries: vec!["TW".to_string()],
                affected_industries: vec!["semiconductors".to_string()],
                severity: Severity::Critical,
                summary: None,
            }),
            reasoning: None,
            estimates,
            rebalance: RebalancePlan {
                adjustments: vec![RebalanceAdjustment {
                    ticker: "NVDA".to_string(),
                    delta_percent: -6.0,
                    reason: "High severity Trade Restriction".to_string(),
                }],
                hedge_with: Some("XLU".to_string()),
                freeze_exposure: Some(vec!["NVDA".to_string(), "AMD".to_string()]),
            },
        }
    }

    #[tokio::test]
    async fn stored_key_event_round_trips_field_for_field() {
        let pool = test_pool().await;
        let event = sample_key_event("wf-1730539200000");

        insert(&pool, &event).await.expect("insert");
        let loaded = by_id(&pool, &event.id)
            .await
            .expect("query")
            .expect("row present");

        assert_eq!(loaded, event);
    }

    #[tokio::test]
    async fn unknown_id_is_none() {
        let pool = test_pool().await;
        assert!(by_id(&pool, "wf-missing").await.expect("query").is_none());
    }

    #[tokio::test]
    async fn list_is_reverse_chronological_and_capped() {
        let pool = test_pool().await;
        for (offset, id) in ["wf-1", "wf-2", "wf-3"].iter().enumerate() {
            let mut event = sample_key_event(id);
            event.timestamp = Utc::now() + chrono::Duration::seconds(offset as i64);
            insert(&pool, &event).await.expect("insert");
        }

        let all = list(&pool, 50).await.expect("list");
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, "wf-3");
        assert_eq!(all[2].id, "wf-1");

        let capped = list(&pool, 2).await.expect("list");
        assert_eq!(capped.len(), 2);
        assert_eq!(capped[0].id, "wf-3");
    }
}

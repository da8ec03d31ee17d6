use sqlx::SqlitePool;

use crate::models::{GeoEvent, GeoEventType, NewGeoEvent, Severity};

#[derive(Debug, sqlx::FromRow)]
struct GeoEventRow {
    id: i64,
    timestamp: String,
    #[sqlx(rename = "type")]
    kind: String,
    severity: String,
    title: String,
    description: Option<String>,
    country: String,
    affected_transactions: i64,
    source: Option<String>,
}

impl GeoEventRow {
    fn into_event(self) -> GeoEvent {
        GeoEvent {
            id: self.id,
            timestamp: self.timestamp,
            kind: GeoEventType::from_str_lossy(&self.kind),
            severity: Severity::from_str_lossy(&self.severity),
            title: self.title,
            description: self.description.unwrap_or_default(),
            country: self.country,
            affected_transactions: self.affected_transactions,
            source: self.source.unwrap_or_default(),
        }
    }
}

pub async fn insert(pool: &SqlitePool, event: &NewGeoEvent) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO geo_events
            (timestamp, type, severity, title, description, country, affected_transactions, source)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&event.timestamp)
    .bind(event.kind.as_str())
    .bind(event.severity.as_str())
    .bind(&event.title)
    .bind(&event.description)
    .bind(&event.country)
    .bind(event.affected_transactions)
    .bind(&event.source)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn list(pool: &SqlitePool, limit: i64) -> Result<Vec<GeoEvent>, sqlx::Error> {
    let rows = sqlx::query_as::<_, GeoEventRow>(
        r#"
        SELECT id, timestamp, type, severity, title, description, country,
               affected_transactions, source
        FROM geo_events
        ORDER BY timestamp DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(GeoEventRow::into_event).collect())
}

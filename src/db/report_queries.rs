use sqlx::SqlitePool;

use crate::models::{ImpactType, IntelligenceReport, ReportStatus};

#[derive(Debug, sqlx::FromRow)]
struct ReportRow {
    id: String,
    title: String,
    description: String,
    event_date: String,
    countries: String,
    impact_type: String,
    stake_amount: f64,
    status: String,
    created_at: String,
}

impl ReportRow {
    fn into_report(self) -> IntelligenceReport {
        IntelligenceReport {
            id: self.id,
            title: self.title,
            description: self.description,
            event_date: self.event_date,
            countries: serde_json::from_str(&self.countries).unwrap_or_default(),
            impact_type: ImpactType::from_str_lossy(&self.impact_type),
            stake_amount: self.stake_amount,
            status: ReportStatus::from_str_lossy(&self.status),
            created_at: self.created_at,
        }
    }
}

pub async fn insert(pool: &SqlitePool, report: &IntelligenceReport) -> Result<(), sqlx::Error> {
    let countries = serde_json::to_string(&report.countries).unwrap_or_else(|_| "[]".to_string());

    sqlx::query(
        r#"
        INSERT INTO intelligence_reports
            (id, title, description, event_date, countries, impact_type,
             stake_amount, status, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&report.id)
    .bind(&report.title)
    .bind(&report.description)
    .bind(&report.event_date)
    .bind(countries)
    .bind(report.impact_type.as_str())
    .bind(report.stake_amount)
    .bind(report.status.as_str())
    .bind(&report.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn list(
    pool: &SqlitePool,
    status: Option<&str>,
    limit: i64,
) -> Result<Vec<IntelligenceReport>, sqlx::Error> {
    let rows = match status {
        Some(status) => {
            sqlx::query_as::<_, ReportRow>(
                r#"
                SELECT id, title, description, event_date, countries, impact_type,
                       stake_amount, status, created_at
                FROM intelligence_reports
                WHERE status = ?
                ORDER BY created_at DESC
                LIMIT ?
                "#,
            )
            .bind(status)
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, ReportRow>(
                r#"
                SELECT id, title, description, event_date, countries, impact_type,
                       stake_amount, status, created_at
                FROM intelligence_reports
                ORDER BY created_at DESC
                LIMIT ?
                "#,
            )
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows.into_iter().map(ReportRow::into_report).collect())
}

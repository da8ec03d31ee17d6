use sqlx::SqlitePool;

/// Idempotent schema creation; safe to call on every startup.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS geo_events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp TEXT NOT NULL,
            type TEXT NOT NULL,
            severity TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT,
            country TEXT NOT NULL,
            affected_transactions INTEGER DEFAULT 0,
            source TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reconciliation_tasks (
            id TEXT PRIMARY KEY,
            event_type TEXT NOT NULL,
            triggered_by TEXT NOT NULL,
            status TEXT NOT NULL,
            transactions_scanned INTEGER DEFAULT 0,
            transactions_flagged INTEGER DEFAULT 0,
            transactions_reconciled INTEGER DEFAULT 0,
            start_time TEXT NOT NULL,
            completion_time TEXT,
            estimated_savings REAL DEFAULT 0,
            assigned_to TEXT,
            priority TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS key_events (
            id TEXT PRIMARY KEY,
            timestamp TEXT NOT NULL,
            news TEXT,
            extraction TEXT,
            reasoning TEXT,
            estimates TEXT,
            rebalance TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS intelligence_reports (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            event_date TEXT NOT NULL,
            countries TEXT NOT NULL,
            impact_type TEXT NOT NULL,
            stake_amount REAL NOT NULL,
            status TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

use sqlx::SqlitePool;

pub async fn migrate(pool: &SqlitePool) -> anyhow::Result<()> {
    // Watermarks
    watermark::store::sqlite_store::migrate(pool).await?;

    // Alert history
    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS alert_history (
  seq INTEGER PRIMARY KEY AUTOINCREMENT,
  alert_id TEXT NOT NULL UNIQUE,
  symbol TEXT NOT NULL,
  detected_at_ms BIGINT NOT NULL,
  last_close REAL NOT NULL,
  event_json TEXT NOT NULL,
  read INTEGER NOT NULL DEFAULT 0
);
"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(r#"CREATE INDEX IF NOT EXISTS idx_alert_history_symbol ON alert_history(symbol);"#)
        .execute(pool)
        .await?;

    Ok(())
}

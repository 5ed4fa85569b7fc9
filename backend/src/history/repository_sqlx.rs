use anyhow::{Context, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::alert::Alert;
use crate::history::repository::HistoryRepository;

/// SQLite-backed alert history.
/// Responsible only for persistence, retention and row mapping.
pub struct SqlxHistoryRepository {
    pool: SqlitePool,
    retain: usize,
}

impl SqlxHistoryRepository {
    pub fn new(pool: SqlitePool, retain: usize) -> Self {
        Self { pool, retain }
    }
}

#[async_trait]
impl HistoryRepository for SqlxHistoryRepository {
    async fn append(&self, alert: &Alert) -> anyhow::Result<()> {
        let event_json = serde_json::to_string(&alert.event)?;
        let retain = usize_to_i64(self.retain)?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
INSERT INTO alert_history (alert_id, symbol, detected_at_ms, last_close, event_json, read)
VALUES (?, ?, ?, ?, ?, ?);
"#,
        )
        .bind(alert.id.to_string())
        .bind(&alert.symbol)
        .bind(alert.detected_at.timestamp_millis())
        .bind(alert.last_close)
        .bind(event_json)
        .bind(alert.read)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
DELETE FROM alert_history
WHERE seq NOT IN (SELECT seq FROM alert_history ORDER BY seq DESC LIMIT ?);
"#,
        )
        .bind(retain)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn recent(&self, limit: usize) -> anyhow::Result<Vec<Alert>> {
        let rows = sqlx::query(
            r#"
SELECT alert_id, symbol, detected_at_ms, last_close, event_json, read
FROM alert_history
ORDER BY seq DESC
LIMIT ?;
"#,
        )
        .bind(usize_to_i64(limit)?)
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for r in rows {
            match row_to_alert(&r) {
                Ok(a) => out.push(a),
                Err(e) => {
                    // poison-row resilience: skip but don't fail the listing
                    tracing::warn!(error = %e, "skipping malformed alert row");
                }
            }
        }

        Ok(out)
    }

    async fn mark_read(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("UPDATE alert_history SET read = 1 WHERE alert_id = ?;")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(res.rows_affected() > 0)
    }

    async fn clear(&self) -> anyhow::Result<u64> {
        let res = sqlx::query("DELETE FROM alert_history;")
            .execute(&self.pool)
            .await?;

        tracing::info!(removed = res.rows_affected(), "alert history cleared");
        Ok(res.rows_affected())
    }
}

/* =========================
Row mapping + conversions
========================= */

fn row_to_alert(r: &sqlx::sqlite::SqliteRow) -> anyhow::Result<Alert> {
    let id_str: String = r.get("alert_id");
    let id = Uuid::parse_str(&id_str).context("invalid alert_id")?;

    let ms: i64 = r.get("detected_at_ms");
    let detected_at: DateTime<Utc> =
        DateTime::from_timestamp_millis(ms).ok_or_else(|| anyhow!("bad detected_at_ms: {ms}"))?;

    let event_json: String = r.get("event_json");
    let event = serde_json::from_str(&event_json).context("invalid event_json")?;

    Ok(Alert {
        id,
        symbol: r.get("symbol"),
        detected_at,
        event,
        last_close: r.get("last_close"),
        read: r.get("read"),
    })
}

fn usize_to_i64(v: usize) -> anyhow::Result<i64> {
    i64::try_from(v).map_err(|_| anyhow!("usize too large for i64: {v}"))
}

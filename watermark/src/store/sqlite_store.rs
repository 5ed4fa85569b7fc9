//! SQLiteWatermarkStore
//! --------------------
//! Durable `symbol -> last seen candle timestamp` map so that a restarted
//! scanner does not re-report patterns from candles it already processed.
//!
//! Timestamps are stored as JSON text: integer and string timestamps both
//! round trip without a type column.
//!
//! `advance` takes the database write lock up front (`BEGIN IMMEDIATE`), so
//! scanners in separate processes sharing one database file cannot both
//! read the same old watermark.
use anyhow::Context;
use async_trait::async_trait;
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::{instrument, warn};

use corelib::Timestamp;

use super::{Advance, WatermarkStore};

pub struct SQLiteWatermarkStore {
    pool: SqlitePool,
}

impl SQLiteWatermarkStore {
    /// Wrap an existing pool. The `watermarks` table must already exist
    /// (see [`migrate`]).
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

pub async fn migrate(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS watermarks (
            symbol TEXT PRIMARY KEY,
            last_seen_json TEXT NOT NULL,
            updated_at_ms INTEGER NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[async_trait]
impl WatermarkStore for SQLiteWatermarkStore {
    #[instrument(skip(self), target = "watermark_store", level = "debug")]
    async fn get(&self, symbol: &str) -> anyhow::Result<Option<Timestamp>> {
        let mut conn = self.pool.acquire().await?;
        read(&mut conn, symbol).await
    }

    #[instrument(skip(self, last_seen), target = "watermark_store", level = "debug", fields(last_seen = %last_seen))]
    async fn set(&self, symbol: &str, last_seen: &Timestamp) -> anyhow::Result<()> {
        let mut conn = self.pool.acquire().await?;
        write(&mut conn, symbol, last_seen).await
    }

    #[instrument(skip(self, next), target = "watermark_store", level = "debug", fields(next = %next))]
    async fn advance(&self, symbol: &str, next: &Timestamp) -> anyhow::Result<Advance> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;

        let outcome = advance_locked(&mut conn, symbol, next).await;

        let end = match &outcome {
            Ok(Advance::Moved { .. }) => "COMMIT",
            _ => "ROLLBACK",
        };
        if let Err(e) = sqlx::query(end).execute(&mut *conn).await {
            if end == "COMMIT" {
                let _ = sqlx::query("ROLLBACK").execute(&mut *conn).await;
                return Err(e.into());
            }
            warn!(symbol, error = %e, "watermark rollback failed");
        }

        outcome
    }
}

/// Runs inside the caller's write transaction.
async fn advance_locked(
    conn: &mut SqliteConnection,
    symbol: &str,
    next: &Timestamp,
) -> anyhow::Result<Advance> {
    let previous = read(conn, symbol).await?;
    if let Some(stored) = previous.as_ref().filter(|p| !p.same_kind(next)) {
        return Ok(Advance::Rejected {
            stored: stored.clone(),
        });
    }

    write(conn, symbol, next).await?;
    Ok(Advance::Moved { previous })
}

async fn read(conn: &mut SqliteConnection, symbol: &str) -> anyhow::Result<Option<Timestamp>> {
    let row = sqlx::query("SELECT last_seen_json FROM watermarks WHERE symbol = ?")
        .bind(symbol)
        .fetch_optional(&mut *conn)
        .await?;

    match row {
        Some(r) => {
            let raw: String = r.get("last_seen_json");
            let ts = serde_json::from_str(&raw)
                .with_context(|| format!("invalid watermark for {symbol}: {raw}"))?;
            Ok(Some(ts))
        }
        None => Ok(None),
    }
}

async fn write(conn: &mut SqliteConnection, symbol: &str, last_seen: &Timestamp) -> anyhow::Result<()> {
    let raw = serde_json::to_string(last_seen)?;

    sqlx::query(
        r#"
        INSERT INTO watermarks (symbol, last_seen_json, updated_at_ms)
        VALUES (?, ?, ?)
        ON CONFLICT(symbol) DO UPDATE SET
            last_seen_json = excluded.last_seen_json,
            updated_at_ms = excluded.updated_at_ms;
        "#,
    )
    .bind(symbol)
    .bind(raw)
    .bind(chrono::Utc::now().timestamp_millis())
    .execute(&mut *conn)
    .await?;

    Ok(())
}

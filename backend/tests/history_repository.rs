use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tokio::task::JoinSet;

use backend::alert::Alert;
use backend::db::schema;
use backend::history::{HistoryRepository, SqlxHistoryRepository};
use corelib::{Direction, PatternEvent, Sequence};
use uuid::Uuid;

/// Single-connection in-memory database with the production schema.
async fn setup_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect sqlite memory db");

    schema::migrate(&pool).await.expect("migrate");
    pool
}

fn alert(symbol: &str, index: usize) -> Alert {
    Alert::new(
        symbol,
        PatternEvent::simultaneous(index, Direction::Bullish),
        100.0 + index as f64,
    )
}

#[tokio::test]
async fn append_then_recent_round_trip() {
    let repo = SqlxHistoryRepository::new(setup_db().await, 100);

    let a = Alert::new(
        "AAPL",
        PatternEvent::sequential(3, 6, Direction::Bearish, Sequence::EmaThenMacd),
        187.25,
    );
    repo.append(&a).await.unwrap();

    let recent = repo.recent(10).await.unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].id, a.id);
    assert_eq!(recent[0].event, a.event);
    assert_eq!(recent[0].last_close, 187.25);
    assert!(!recent[0].read);
    assert_eq!(
        recent[0].detected_at.timestamp_millis(),
        a.detected_at.timestamp_millis()
    );
}

#[tokio::test]
async fn recent_is_newest_first() {
    let repo = SqlxHistoryRepository::new(setup_db().await, 100);

    for i in 0..5 {
        repo.append(&alert("MSFT", i)).await.unwrap();
    }

    let recent = repo.recent(3).await.unwrap();
    let indices: Vec<_> = recent.iter().map(|a| a.event.anchor_index()).collect();
    assert_eq!(indices, vec![4, 3, 2]);
}

#[tokio::test]
async fn history_is_trimmed_to_retention_limit() {
    let pool = setup_db().await;
    let repo = SqlxHistoryRepository::new(pool.clone(), 4);

    for i in 0..10 {
        repo.append(&alert("TSLA", i)).await.unwrap();
    }

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM alert_history")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 4);

    let indices: Vec<_> = repo
        .recent(100)
        .await
        .unwrap()
        .iter()
        .map(|a| a.event.anchor_index())
        .collect();
    assert_eq!(indices, vec![9, 8, 7, 6]);
}

#[tokio::test]
async fn poison_rows_are_skipped() {
    let pool = setup_db().await;
    let repo = SqlxHistoryRepository::new(pool.clone(), 100);

    repo.append(&alert("AMZN", 1)).await.unwrap();
    sqlx::query(
        r#"INSERT INTO alert_history (alert_id, symbol, detected_at_ms, last_close, event_json)
           VALUES ('not-a-uuid', 'AMZN', 0, 1.0, '{}')"#,
    )
    .execute(&pool)
    .await
    .unwrap();

    let recent = repo.recent(10).await.unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].symbol, "AMZN");
}

#[tokio::test]
async fn concurrent_appends_all_land() {
    let repo = Arc::new(SqlxHistoryRepository::new(setup_db().await, 100));

    let mut set = JoinSet::new();
    for i in 0..20 {
        let r = Arc::clone(&repo);
        set.spawn(async move { r.append(&alert("GOOGL", i)).await });
    }

    while let Some(res) = set.join_next().await {
        res.expect("Task panicked").expect("append failed");
    }

    assert_eq!(repo.recent(100).await.unwrap().len(), 20);
}

#[tokio::test]
async fn mark_read_flags_only_that_alert() {
    let repo = SqlxHistoryRepository::new(setup_db().await, 100);
    let first = alert("AAPL", 1);
    let second = alert("AAPL", 2);
    repo.append(&first).await.unwrap();
    repo.append(&second).await.unwrap();

    assert!(repo.mark_read(first.id).await.unwrap());
    assert!(!repo.mark_read(Uuid::new_v4()).await.unwrap());

    let recent = repo.recent(10).await.unwrap();
    let read: Vec<_> = recent.iter().map(|a| (a.id, a.read)).collect();
    assert_eq!(read, vec![(second.id, false), (first.id, true)]);
}

#[tokio::test]
async fn clear_removes_everything() {
    let repo = SqlxHistoryRepository::new(setup_db().await, 100);
    for i in 0..3 {
        repo.append(&alert("MSFT", i)).await.unwrap();
    }

    assert_eq!(repo.clear().await.unwrap(), 3);
    assert!(repo.recent(10).await.unwrap().is_empty());
    assert_eq!(repo.clear().await.unwrap(), 0);

    // history keeps working after a clear
    repo.append(&alert("MSFT", 9)).await.unwrap();
    assert_eq!(repo.recent(10).await.unwrap().len(), 1);
}

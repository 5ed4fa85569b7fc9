pub mod cli;

use anyhow::Context;
use clap::Parser;
use std::path::Path;
use std::sync::Arc;

use backend::{
    alert::Alert,
    config::DEFAULT_HISTORY_LIMIT,
    db::Db,
    history::{HistoryRepository, SqlxHistoryRepository, record_alerts},
};
use cli::*;
use common::logger::init_logger;
use corelib::Candle;
use engine::PatternEngine;
use watermark::{WatermarkFilter, store::SQLiteWatermarkStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger("crossover-cli", cli.json_logs);

    match cli.command {
        Command::Detect { candles, patterns } => {
            let batch = load_candles(&candles).await?;
            let engine = PatternEngine::new(patterns.apply(Default::default()))?;

            let events = engine.detect(&batch)?;
            println!("{}", serde_json::to_string_pretty(&events)?);
        }

        Command::Scan {
            candles,
            symbol,
            db,
            patterns,
        } => {
            let batch = load_candles(&candles).await?;
            let engine = PatternEngine::new(patterns.apply(Default::default()))?;
            let events = engine.detect(&batch)?;

            let db = Db::connect(&db).await?;
            db.migrate().await?;
            let filter = WatermarkFilter::new(Arc::new(SQLiteWatermarkStore::from_pool(
                db.pool.clone(),
            )));
            let fresh = filter.filter_new(&symbol, events, &batch).await?;

            let last_close = batch.last().map(|c| c.close).unwrap_or_default();
            let alerts: Vec<Alert> = fresh
                .iter()
                .map(|event| Alert::new(&symbol, event.clone(), last_close))
                .collect();
            let history = SqlxHistoryRepository::new(db.pool.clone(), DEFAULT_HISTORY_LIMIT);
            record_alerts(&history, &alerts).await;

            println!("{}", serde_json::to_string_pretty(&fresh)?);
        }

        Command::History { limit, clear, db } => {
            let repo = open_history(&db).await?;
            if clear {
                let removed = repo.clear().await?;
                println!("removed {removed} alerts");
                return Ok(());
            }

            for alert in repo.recent(limit).await? {
                let marker = if alert.read { " " } else { "*" };
                println!(
                    "{marker} [{}] {} ({})",
                    alert.detected_at.to_rfc3339(),
                    alert.title(),
                    alert.id
                );
                println!("{}\n", alert.message());
            }
        }

        Command::MarkRead { id, db } => {
            let repo = open_history(&db).await?;
            if !repo.mark_read(id).await? {
                anyhow::bail!("no alert with id {id}");
            }
        }
    }

    Ok(())
}

async fn open_history(url: &str) -> anyhow::Result<SqlxHistoryRepository> {
    let db = Db::connect(url).await?;
    db.migrate().await?;
    Ok(SqlxHistoryRepository::new(db.pool, DEFAULT_HISTORY_LIMIT))
}

async fn load_candles(path: &Path) -> anyhow::Result<Vec<Candle>> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;

    serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}

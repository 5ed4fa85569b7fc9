use std::sync::Arc;

use backend::{
    config::AppConfig,
    db::Db,
    history::SqlxHistoryRepository,
    metrics::counters::ScanCounters,
    scanner::Scanner,
    source::JsonDirCandleSource,
};
use common::logger::init_logger;
use engine::PatternEngine;
use watermark::{WatermarkFilter, store::SQLiteWatermarkStore};

/// Opens the database, runs migrations and wires the scanner together.
async fn build_scanner(cfg: &AppConfig) -> anyhow::Result<Scanner> {
    let db = Db::connect(&cfg.database_url).await?;
    db.migrate().await?;

    let store = Arc::new(SQLiteWatermarkStore::from_pool(db.pool.clone()));
    let filter = Arc::new(WatermarkFilter::new(store));
    let history = Arc::new(SqlxHistoryRepository::new(
        db.pool.clone(),
        cfg.history_limit,
    ));
    let source = Arc::new(JsonDirCandleSource::new(cfg.candle_dir.clone()));
    let engine = PatternEngine::new(cfg.patterns.clone())?;

    Ok(Scanner::new(source, engine, filter, ScanCounters::default()).with_history(history))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let is_production = std::env::var("APP_ENV").unwrap_or_default() == "production";
    init_logger("crossover-backend", is_production);

    let cfg = AppConfig::from_env()?;
    tracing::info!(
        symbols = ?cfg.symbols,
        timeframe = ?cfg.timeframe,
        candle_dir = %cfg.candle_dir.display(),
        "starting crossover scanner"
    );

    let scanner = build_scanner(&cfg).await?;

    // First tick fires immediately, then once per candle period.
    let mut ticker = tokio::time::interval(cfg.timeframe.period());

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let report = scanner.run_cycle(&cfg.symbols).await;
                for alert in &report.alerts {
                    tracing::info!(
                        alert_id = %alert.id,
                        symbol = %alert.symbol,
                        title = %alert.title(),
                        description = alert.event.description(),
                        "alert"
                    );
                }
            }
            res = tokio::signal::ctrl_c() => {
                res?;
                tracing::info!("Shutdown signal received");
                break;
            }
        }
    }

    Ok(())
}

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Instrument, debug, error, info, warn};

use common::logger::{TraceId, cycle_span, symbol_span, warn_if_slow};
use engine::PatternEngine;
use watermark::WatermarkFilter;

use crate::alert::Alert;
use crate::error::AppError;
use crate::history::{HistoryRepository, record_alerts};
use crate::metrics::counters::ScanCounters;
use crate::source::CandleSource;

/// What one symbol contributed to a cycle.
#[derive(Debug)]
pub enum SymbolOutcome {
    /// The source returned no candles; nothing was computed or advanced.
    Skipped,
    Scanned(Vec<Alert>),
}

/// Result of one cycle across all symbols.
#[derive(Debug, Default)]
pub struct CycleReport {
    pub alerts: Vec<Alert>,
    pub skipped: Vec<String>,
    /// Symbols that failed, with the rendered error.
    pub failed: Vec<(String, String)>,
}

/// Runs fetch -> detect -> watermark filter -> alert for every symbol.
pub struct Scanner {
    source: Arc<dyn CandleSource>,
    engine: PatternEngine,
    filter: Arc<WatermarkFilter>,
    history: Option<Arc<dyn HistoryRepository>>,
    counters: ScanCounters,
}

impl Scanner {
    pub fn new(
        source: Arc<dyn CandleSource>,
        engine: PatternEngine,
        filter: Arc<WatermarkFilter>,
        counters: ScanCounters,
    ) -> Self {
        Self {
            source,
            engine,
            filter,
            history: None,
            counters,
        }
    }

    pub fn with_history(mut self, history: Arc<dyn HistoryRepository>) -> Self {
        self.history = Some(history);
        self
    }

    /// Scans all `symbols` concurrently. A failing symbol is recorded in the
    /// report and does not stop the others.
    pub async fn run_cycle(&self, symbols: &[String]) -> CycleReport {
        let trace_id = TraceId::new();
        let span = cycle_span(&trace_id, symbols.len());

        async {
            ScanCounters::incr(&self.counters.cycles, 1);

            let results = join_all(symbols.iter().map(|symbol| {
                self.scan_symbol(symbol)
                    .instrument(symbol_span(symbol))
            }))
            .await;

            let mut report = CycleReport::default();
            for (symbol, result) in symbols.iter().zip(results) {
                match result {
                    Ok(SymbolOutcome::Scanned(alerts)) => {
                        ScanCounters::incr(&self.counters.symbols_processed, 1);
                        report.alerts.extend(alerts);
                    }
                    Ok(SymbolOutcome::Skipped) => {
                        ScanCounters::incr(&self.counters.symbols_skipped, 1);
                        report.skipped.push(symbol.clone());
                    }
                    Err(e) => {
                        ScanCounters::incr(&self.counters.symbols_failed, 1);
                        error!(symbol = %symbol, error = %e, retryable = e.is_retryable(), "symbol scan failed");
                        report.failed.push((symbol.clone(), e.to_string()));
                    }
                }
            }

            info!(
                alerts = report.alerts.len(),
                skipped = report.skipped.len(),
                failed = report.failed.len(),
                "cycle complete"
            );
            report
        }
        .instrument(span)
        .await
    }

    pub async fn scan_symbol(&self, symbol: &str) -> Result<SymbolOutcome, AppError> {
        let candles = warn_if_slow(
            "candle_fetch",
            Duration::from_secs(2),
            self.source.fetch(symbol),
        )
        .await
        .map_err(|source| AppError::Source {
            symbol: symbol.to_string(),
            source,
        })?;

        let Some(last) = candles.last() else {
            warn!("no candle data received; skipping");
            return Ok(SymbolOutcome::Skipped);
        };
        let last_close = last.close;

        let events = self.engine.detect(&candles)?;
        ScanCounters::incr(&self.counters.events_detected, events.len() as u64);

        let fresh = warn_if_slow(
            "watermark_filter",
            Duration::from_millis(200),
            self.filter.filter_new(symbol, events, &candles),
        )
        .await?;

        let alerts: Vec<Alert> = fresh
            .into_iter()
            .map(|event| Alert::new(symbol, event, last_close))
            .collect();
        ScanCounters::incr(&self.counters.alerts_emitted, alerts.len() as u64);

        if let Some(history) = &self.history {
            record_alerts(history.as_ref(), &alerts).await;
        }

        debug!(alerts = alerts.len(), "symbol scanned");
        Ok(SymbolOutcome::Scanned(alerts))
    }
}

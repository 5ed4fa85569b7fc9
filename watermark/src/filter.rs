use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use corelib::{Candle, PatternEvent};

use crate::error::WatermarkError;
use crate::store::{Advance, WatermarkStore};

/// Suppresses pattern events already reported for a symbol.
///
/// Each call is one atomic [`WatermarkStore::advance`]. Calls for the same
/// symbol are also serialized inside this filter, which is all the memory and
/// file stores rely on; the SQLite store is additionally safe across
/// processes. Different symbols never wait on each other.
pub struct WatermarkFilter {
    store: Arc<dyn WatermarkStore>,
    /// One entry per symbol with a call in flight; released when the last
    /// caller for the symbol finishes.
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl WatermarkFilter {
    pub fn new(store: Arc<dyn WatermarkStore>) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn symbol_lock(&self, symbol: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock();
        locks.entry(symbol.to_string()).or_default().clone()
    }

    fn release_lock(&self, symbol: &str, lock: Arc<tokio::sync::Mutex<()>>) {
        let mut locks = self.locks.lock();
        // map + ours: nobody else is waiting
        if Arc::strong_count(&lock) == 2 {
            locks.remove(symbol);
        }
    }

    /// Keeps events whose anchor candle is newer than the stored watermark,
    /// then advances the watermark to the batch's last candle.
    ///
    /// The watermark moves even when nothing survives, so feeding the same
    /// batch twice returns an empty list the second time. If the store
    /// fails, nothing is committed, no events are returned and the call can
    /// be retried as a whole. An empty batch carries no timestamp to advance
    /// to and leaves the watermark untouched.
    #[instrument(
        skip(self, events, candles),
        target = "watermark",
        fields(symbol = %symbol, events = events.len(), candles = candles.len())
    )]
    pub async fn filter_new(
        &self,
        symbol: &str,
        events: Vec<PatternEvent>,
        candles: &[Candle],
    ) -> Result<Vec<PatternEvent>, WatermarkError> {
        for ev in &events {
            let index = ev.anchor_index();
            if index >= candles.len() {
                return Err(WatermarkError::AnchorOutOfRange {
                    index,
                    len: candles.len(),
                });
            }
        }

        let Some(last) = candles.last() else {
            debug!("empty batch; watermark unchanged");
            return Ok(Vec::new());
        };

        let lock = self.symbol_lock(symbol);
        let advanced = {
            let _guard = lock.lock().await;
            self.store.advance(symbol, &last.timestamp).await
        };
        self.release_lock(symbol, lock);

        let last_seen = match advanced {
            Ok(Advance::Moved { previous }) => previous,
            Ok(Advance::Rejected { stored }) => {
                return Err(WatermarkError::TimestampKindMismatch {
                    symbol: symbol.to_string(),
                    stored,
                    batch: last.timestamp.clone(),
                });
            }
            Err(source) => {
                return Err(WatermarkError::StoreUnavailable {
                    symbol: symbol.to_string(),
                    source,
                });
            }
        };

        let total = events.len();
        let fresh: Vec<PatternEvent> = match &last_seen {
            Some(seen) => events
                .into_iter()
                .filter(|ev| candles[ev.anchor_index()].timestamp > *seen)
                .collect(),
            None => events,
        };

        info!(
            total,
            fresh = fresh.len(),
            previous = ?last_seen,
            advanced_to = %last.timestamp,
            "watermark advanced"
        );

        Ok(fresh)
    }
}

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Minimal counters for operational visibility.
#[derive(Clone, Default)]
pub struct ScanCounters {
    pub cycles: Arc<AtomicU64>,

    pub symbols_processed: Arc<AtomicU64>,
    pub symbols_failed: Arc<AtomicU64>,
    pub symbols_skipped: Arc<AtomicU64>,

    pub events_detected: Arc<AtomicU64>,
    pub alerts_emitted: Arc<AtomicU64>,
}

impl ScanCounters {
    pub fn incr(counter: &AtomicU64, by: u64) {
        counter.fetch_add(by, Ordering::Relaxed);
    }

    pub fn get(counter: &AtomicU64) -> u64 {
        counter.load(Ordering::Relaxed)
    }
}

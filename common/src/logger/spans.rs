use std::future::Future;
use std::time::{Duration, Instant};
use tracing::Span;

use super::TraceId;

/// Root span for one scan cycle; symbol spans opened inside inherit it.
pub fn cycle_span(trace_id: &TraceId, symbols: usize) -> Span {
    tracing::info_span!("cycle", trace_id = %trace_id, symbols)
}

pub fn symbol_span(symbol: &str) -> Span {
    tracing::info_span!("symbol", symbol = %symbol)
}

/// Awaits `fut`, logging a `performance` warning if it took longer than `max`.
pub async fn warn_if_slow<F, T>(label: &'static str, max: Duration, fut: F) -> T
where
    F: Future<Output = T>,
{
    let start = Instant::now();
    let out = fut.await;
    let elapsed = start.elapsed();
    if elapsed > max {
        tracing::warn!(
            target: "performance",
            label = label,
            elapsed_ms = elapsed.as_millis() as u64,
            "slow operation detected"
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[tokio::test]
    #[traced_test]
    async fn slow_future_is_reported() {
        let v = warn_if_slow("sleepy", Duration::from_millis(1), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            7
        })
        .await;

        assert_eq!(v, 7);
        assert!(logs_contain("slow operation detected"));
        assert!(logs_contain("sleepy"));
    }

    #[tokio::test]
    #[traced_test]
    async fn fast_future_is_silent() {
        let v = warn_if_slow("quick", Duration::from_secs(5), async { 1 }).await;

        assert_eq!(v, 1);
        assert!(!logs_contain("slow operation detected"));
    }

    #[test]
    fn trace_ids_are_unique() {
        assert_ne!(TraceId::new(), TraceId::new());
        assert_eq!(TraceId::new().to_string().len(), 36);
    }
}

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::alert::Alert;

/// Bounded log of emitted alerts, newest first.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Stores `alert` and drops the oldest entries beyond the retention limit.
    async fn append(&self, alert: &Alert) -> Result<()>;

    async fn recent(&self, limit: usize) -> Result<Vec<Alert>>;

    /// Flags one alert as read. Returns false when no alert has that id.
    async fn mark_read(&self, id: Uuid) -> Result<bool>;

    /// Drops every stored alert and returns how many were removed.
    async fn clear(&self) -> Result<u64>;
}

pub mod file_store;
pub mod memory;
pub mod sqlite_store;

use corelib::Timestamp;

pub use file_store::JsonFileWatermarkStore;
pub use memory::InMemoryWatermarkStore;
pub use sqlite_store::SQLiteWatermarkStore;

/// Outcome of [`WatermarkStore::advance`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Advance {
    /// The watermark now holds the new value; `previous` is what it replaced.
    Moved { previous: Option<Timestamp> },
    /// The stored value uses a different timestamp representation and was
    /// left untouched.
    Rejected { stored: Timestamp },
}

/// Per-symbol "last processed candle" persistence.
#[async_trait::async_trait]
pub trait WatermarkStore: Send + Sync {
    async fn get(&self, symbol: &str) -> anyhow::Result<Option<Timestamp>>;
    async fn set(&self, symbol: &str, last_seen: &Timestamp) -> anyhow::Result<()>;

    /// Replaces the watermark with `next` and returns the value it replaced,
    /// as one read-then-write.
    ///
    /// The default runs `get` then `set` and is only atomic when the caller
    /// serializes calls for the symbol. Stores shared between processes
    /// override it.
    async fn advance(&self, symbol: &str, next: &Timestamp) -> anyhow::Result<Advance> {
        let previous = self.get(symbol).await?;
        if let Some(stored) = previous.as_ref().filter(|p| !p.same_kind(next)) {
            return Ok(Advance::Rejected {
                stored: stored.clone(),
            });
        }

        self.set(symbol, next).await?;
        Ok(Advance::Moved { previous })
    }
}

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use corelib::Timestamp;

use super::{Advance, WatermarkStore};

/// Process-local store for tests and dry runs.
#[derive(Clone, Default)]
pub struct InMemoryWatermarkStore {
    map: Arc<Mutex<HashMap<String, Timestamp>>>,
}

impl InMemoryWatermarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> HashMap<String, Timestamp> {
        self.map.lock().await.clone()
    }
}

#[async_trait]
impl WatermarkStore for InMemoryWatermarkStore {
    async fn get(&self, symbol: &str) -> anyhow::Result<Option<Timestamp>> {
        Ok(self.map.lock().await.get(symbol).cloned())
    }

    async fn set(&self, symbol: &str, last_seen: &Timestamp) -> anyhow::Result<()> {
        self.map
            .lock()
            .await
            .insert(symbol.to_string(), last_seen.clone());
        Ok(())
    }

    async fn advance(&self, symbol: &str, next: &Timestamp) -> anyhow::Result<Advance> {
        let mut map = self.map.lock().await;
        if let Some(stored) = map.get(symbol).filter(|s| !s.same_kind(next)) {
            return Ok(Advance::Rejected {
                stored: stored.clone(),
            });
        }

        let previous = map.insert(symbol.to_string(), next.clone());
        Ok(Advance::Moved { previous })
    }
}

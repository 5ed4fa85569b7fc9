use anyhow::Context;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::sync::Mutex;

use corelib::Timestamp;

use super::{Advance, WatermarkStore};

/// Watermarks kept in a single JSON object file: `{"AAPL": 1709280000, ...}`.
///
/// Writes go through a sibling temp file and a rename so a crash never
/// leaves a truncated file behind.
pub struct JsonFileWatermarkStore {
    path: PathBuf,
    io: Mutex<()>,
}

impl JsonFileWatermarkStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            io: Mutex::new(()),
        }
    }

    async fn load(&self) -> anyhow::Result<BTreeMap<String, Timestamp>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("corrupt watermark file {}", self.path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e).with_context(|| format!("reading {}", self.path.display())),
        }
    }

    /// Caller holds `io`.
    async fn save(&self, map: &BTreeMap<String, Timestamp>) -> anyhow::Result<()> {
        let tmp = self.path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(map)?;
        tokio::fs::write(&tmp, bytes)
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("replacing {}", self.path.display()))?;

        Ok(())
    }
}

#[async_trait]
impl WatermarkStore for JsonFileWatermarkStore {
    async fn get(&self, symbol: &str) -> anyhow::Result<Option<Timestamp>> {
        let _guard = self.io.lock().await;
        Ok(self.load().await?.remove(symbol))
    }

    async fn set(&self, symbol: &str, last_seen: &Timestamp) -> anyhow::Result<()> {
        let _guard = self.io.lock().await;

        let mut map = self.load().await?;
        map.insert(symbol.to_string(), last_seen.clone());
        self.save(&map).await
    }

    async fn advance(&self, symbol: &str, next: &Timestamp) -> anyhow::Result<Advance> {
        let _guard = self.io.lock().await;

        let mut map = self.load().await?;
        if let Some(stored) = map.get(symbol).filter(|s| !s.same_kind(next)) {
            return Ok(Advance::Rejected {
                stored: stored.clone(),
            });
        }

        let previous = map.insert(symbol.to_string(), next.clone());
        self.save(&map).await?;
        Ok(Advance::Moved { previous })
    }
}


use anyhow::Context;
use async_trait::async_trait;
use std::path::PathBuf;

use corelib::Candle;

/// Market-data collaborator: hands back an ascending, duplicate-free candle
/// batch for a symbol. Transport, timeouts and retries live behind it.
#[async_trait]
pub trait CandleSource: Send + Sync {
    async fn fetch(&self, symbol: &str) -> anyhow::Result<Vec<Candle>>;
}

/// Reads `<dir>/<SYMBOL>.json`, a JSON array of candle objects, as written
/// by an external downloader.
pub struct JsonDirCandleSource {
    dir: PathBuf,
}

impl JsonDirCandleSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.json"))
    }
}

#[async_trait]
impl CandleSource for JsonDirCandleSource {
    async fn fetch(&self, symbol: &str) -> anyhow::Result<Vec<Candle>> {
        let path = self.path_for(symbol);
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;

        serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
    }
}

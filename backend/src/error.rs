use thiserror::Error;

use engine::EngineError;
use watermark::WatermarkError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Watermark(#[from] WatermarkError),

    #[error("candle source failed for {symbol}: {source}")]
    Source {
        symbol: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("alert history: {0}")]
    History(#[source] anyhow::Error),

    #[error("configuration: {0}")]
    Config(String),
}

impl AppError {
    /// Store and source outages are worth retrying on the next cycle;
    /// bad input and configuration are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Watermark(e) => e.is_retryable(),
            AppError::Source { .. } | AppError::History(_) => true,
            AppError::Engine(_) | AppError::Config(_) => false,
        }
    }
}

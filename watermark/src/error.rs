use thiserror::Error;

use corelib::Timestamp;

#[derive(Error, Debug)]
pub enum WatermarkError {
    /// The store could not be read or written. Nothing was committed; the
    /// caller may retry the whole filter step.
    #[error("watermark store unavailable for {symbol}: {source}")]
    StoreUnavailable {
        symbol: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("event anchored at candle {index} but batch has {len} candles")]
    AnchorOutOfRange { index: usize, len: usize },

    /// The stored watermark and the batch use different timestamp
    /// representations and cannot be ordered against each other. The
    /// watermark was left untouched.
    #[error("watermark for {symbol} is {stored} but batch ends at {batch}: timestamp kinds differ")]
    TimestampKindMismatch {
        symbol: String,
        stored: Timestamp,
        batch: Timestamp,
    },
}

impl WatermarkError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, WatermarkError::StoreUnavailable { .. })
    }
}

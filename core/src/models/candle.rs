use serde::{Deserialize, Serialize};
use std::fmt;

/// Sortable candle timestamp.
///
/// Market-data providers hand out either epoch integers or ISO-like strings.
/// Values are only comparable within one representation; callers check
/// [`Timestamp::same_kind`] before relying on the derived ordering.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Epoch(i64),
    Text(String),
}

impl Timestamp {
    /// True when both values use the same representation.
    pub fn same_kind(&self, other: &Timestamp) -> bool {
        matches!(
            (self, other),
            (Timestamp::Epoch(_), Timestamp::Epoch(_)) | (Timestamp::Text(_), Timestamp::Text(_))
        )
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Epoch(v) => write!(f, "{v}"),
            Timestamp::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Timestamp {
    fn from(v: i64) -> Self {
        Timestamp::Epoch(v)
    }
}

impl From<&str> for Timestamp {
    fn from(v: &str) -> Self {
        Timestamp::Text(v.to_string())
    }
}

impl From<String> for Timestamp {
    fn from(v: String) -> Self {
        Timestamp::Text(v)
    }
}

/// One OHLCV bar as supplied by the market-data collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: Timestamp,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl Candle {
    /// Flat bar where every price equals `close`. Handy for fixtures.
    pub fn from_close(timestamp: impl Into<Timestamp>, close: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 0.0,
        }
    }
}

/// Close prices of a candle batch, index-aligned with the batch.
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

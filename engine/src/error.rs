use thiserror::Error;

/// Input the engine cannot compute over.
///
/// Insufficient warm-up history is never an error: it shows up as undefined
/// positions in the computed series.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid input: price series is empty")]
    EmptySeries,

    #[error("invalid input: period must be at least 1")]
    ZeroPeriod,

    #[error("invalid input: non-finite price {value} at index {index}")]
    NonFinitePrice { index: usize, value: f64 },

    #[error("invalid input: candle timestamps not strictly ascending at index {index}")]
    UnorderedCandles { index: usize },

    #[error("invalid input: candle timestamps mix integer and text values at index {index}")]
    MixedTimestamps { index: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

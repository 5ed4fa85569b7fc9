use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a crossover.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Bullish,
    Bearish,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Bullish => "bullish",
            Direction::Bearish => "bearish",
        }
    }

    /// "upward" / "downward", used in alert wording.
    pub fn movement(&self) -> &'static str {
        match self {
            Direction::Bullish => "upward",
            Direction::Bearish => "downward",
        }
    }

    /// "Bullish" / "Bearish".
    pub fn capitalized(&self) -> &'static str {
        match self {
            Direction::Bullish => "Bullish",
            Direction::Bearish => "Bearish",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which pair of signal lines produced a crossover.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrossoverKind {
    /// Fast EMA vs slow EMA.
    Ema,
    /// MACD line vs signal line.
    Macd,
}

impl CrossoverKind {
    pub fn label(&self) -> &'static str {
        match self {
            CrossoverKind::Ema => "EMA",
            CrossoverKind::Macd => "MACD",
        }
    }
}

/// A strict crossing of one series over another at `index`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossoverEvent {
    pub index: usize,
    pub direction: Direction,
    pub kind: CrossoverKind,
}

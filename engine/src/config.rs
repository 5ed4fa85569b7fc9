use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::series::MacdParams;

pub const DEFAULT_MAX_CANDLE_WINDOW: usize = 6;

/// Pattern detection settings for one processing cycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Report EMA and MACD crossovers landing on the same candle.
    pub simultaneous_crossovers: bool,

    /// Report one crossover followed by the other within `max_candle_window`.
    pub sequential_crossovers: bool,

    /// Largest candle distance between the two crossovers of a sequential pattern.
    pub max_candle_window: usize,

    pub ema_fast_period: usize,
    pub ema_slow_period: usize,

    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            simultaneous_crossovers: true,
            sequential_crossovers: true,
            max_candle_window: DEFAULT_MAX_CANDLE_WINDOW,
            ema_fast_period: 9,
            ema_slow_period: 21,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
        }
    }
}

impl PatternConfig {
    pub fn macd_params(&self) -> MacdParams {
        MacdParams {
            fast: self.macd_fast,
            slow: self.macd_slow,
            signal: self.macd_signal,
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let periods = [
            ("ema_fast_period", self.ema_fast_period),
            ("ema_slow_period", self.ema_slow_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
        ];

        for (name, value) in periods {
            if value == 0 {
                return Err(EngineError::InvalidConfig(format!(
                    "{name} must be at least 1"
                )));
            }
        }

        if self.max_candle_window < 1 {
            return Err(EngineError::InvalidConfig(
                "max_candle_window must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

use serde::Serialize;
use tracing::debug;

use corelib::models::candle::closes;
use corelib::{Candle, CrossoverEvent, CrossoverKind, PatternEvent};

use crate::config::PatternConfig;
use crate::crossover;
use crate::error::EngineError;
use crate::pattern;
use crate::series::{self, MacdSeries, ValueSeries};

/// Every derived series of one candle batch, aligned with the batch.
#[derive(Clone, Debug, Serialize)]
pub struct Indicators {
    pub ema_fast: ValueSeries,
    pub ema_slow: ValueSeries,
    pub macd: MacdSeries,
}

/// Crossovers found on both signal-line pairs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Crossovers {
    pub ema: Vec<CrossoverEvent>,
    pub macd: Vec<CrossoverEvent>,
}

/// Candles in, pattern events out.
///
/// Stateless apart from its configuration, so one engine can be shared
/// across threads and symbols.
#[derive(Clone, Debug)]
pub struct PatternEngine {
    config: PatternConfig,
}

impl PatternEngine {
    pub fn new(config: PatternConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PatternConfig {
        &self.config
    }

    /// Computes the EMA pair and MACD over the batch's close prices.
    pub fn indicators(&self, candles: &[Candle]) -> Result<Indicators, EngineError> {
        validate_candles(candles)?;
        let prices = closes(candles);

        Ok(Indicators {
            ema_fast: series::compute_ema(&prices, self.config.ema_fast_period)?,
            ema_slow: series::compute_ema(&prices, self.config.ema_slow_period)?,
            macd: series::compute_macd(&prices, self.config.macd_params())?,
        })
    }

    pub fn crossovers(&self, indicators: &Indicators) -> Crossovers {
        Crossovers {
            ema: crossover::detect(
                &indicators.ema_fast,
                &indicators.ema_slow,
                CrossoverKind::Ema,
            ),
            macd: crossover::detect(
                &indicators.macd.macd_line,
                &indicators.macd.signal_line,
                CrossoverKind::Macd,
            ),
        }
    }

    /// Runs the full computation for one batch.
    ///
    /// Simultaneous patterns (if enabled) precede sequential ones (if enabled).
    pub fn detect(&self, candles: &[Candle]) -> Result<Vec<PatternEvent>, EngineError> {
        let indicators = self.indicators(candles)?;
        let crossovers = self.crossovers(&indicators);

        debug!(
            candles = candles.len(),
            ema_crossovers = crossovers.ema.len(),
            macd_crossovers = crossovers.macd.len(),
            "crossovers detected"
        );

        let mut events = Vec::new();

        if self.config.simultaneous_crossovers {
            events.extend(pattern::simultaneous(&crossovers.ema, &crossovers.macd));
        }

        if self.config.sequential_crossovers {
            events.extend(pattern::sequential(
                &crossovers.ema,
                &crossovers.macd,
                self.config.max_candle_window,
            ));
        }

        Ok(events)
    }
}

/// Batch must be non-empty with strictly ascending timestamps of one
/// representation. Close prices are checked by the series math.
fn validate_candles(candles: &[Candle]) -> Result<(), EngineError> {
    if candles.is_empty() {
        return Err(EngineError::EmptySeries);
    }

    for (i, pair) in candles.windows(2).enumerate() {
        if !pair[0].timestamp.same_kind(&pair[1].timestamp) {
            return Err(EngineError::MixedTimestamps { index: i + 1 });
        }
        if pair[0].timestamp >= pair[1].timestamp {
            return Err(EngineError::UnorderedCandles { index: i + 1 });
        }
    }

    Ok(())
}

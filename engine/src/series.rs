//! Moving-average math over a raw price series.
//!
//! Every function here is pure: the same input always produces bit-identical
//! output. Warm-up positions are `None` rather than a sentinel value.

use serde::Serialize;

use crate::error::EngineError;

/// Index-aligned derived series; `None` while warm-up history is insufficient.
pub type ValueSeries = Vec<Option<f64>>;

/// MACD periods.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

/// MACD line, signal line and histogram, each aligned with the input prices.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MacdSeries {
    pub macd_line: ValueSeries,
    pub signal_line: ValueSeries,
    pub histogram: ValueSeries,
}

/// Exponential moving average of `prices`.
///
/// The value at `period - 1` is the simple average of the first `period`
/// prices; later values follow `ema[i] = price[i] * k + ema[i-1] * (1 - k)`
/// with `k = 2 / (period + 1)`. A series shorter than `period` comes back
/// entirely undefined.
pub fn compute_ema(prices: &[f64], period: usize) -> Result<ValueSeries, EngineError> {
    validate_prices(prices, period)?;
    Ok(ema_unchecked(prices, period))
}

/// MACD over `prices`.
///
/// The signal line is the EMA of the defined part of the MACD line, padded
/// back on the left to the input length.
pub fn compute_macd(prices: &[f64], params: MacdParams) -> Result<MacdSeries, EngineError> {
    validate_prices(prices, params.fast)?;
    if params.slow == 0 || params.signal == 0 {
        return Err(EngineError::ZeroPeriod);
    }

    let fast = ema_unchecked(prices, params.fast);
    let slow = ema_unchecked(prices, params.slow);

    let macd_line: ValueSeries = fast
        .iter()
        .zip(&slow)
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    let defined: Vec<f64> = macd_line.iter().flatten().copied().collect();
    let signal_tail = ema_unchecked(&defined, params.signal);

    let mut signal_line: ValueSeries = vec![None; prices.len() - signal_tail.len()];
    signal_line.extend(signal_tail);

    let histogram = combine(&macd_line, &signal_line, |m, s| m - s);

    Ok(MacdSeries {
        macd_line,
        signal_line,
        histogram,
    })
}

fn validate_prices(prices: &[f64], period: usize) -> Result<(), EngineError> {
    if period == 0 {
        return Err(EngineError::ZeroPeriod);
    }
    if prices.is_empty() {
        return Err(EngineError::EmptySeries);
    }
    if let Some((index, value)) = prices.iter().enumerate().find(|(_, p)| !p.is_finite()) {
        return Err(EngineError::NonFinitePrice {
            index,
            value: *value,
        });
    }
    Ok(())
}

/// EMA without input validation. `period` must be non-zero.
fn ema_unchecked(prices: &[f64], period: usize) -> ValueSeries {
    let mut out: ValueSeries = vec![None; prices.len()];
    if prices.len() < period {
        return out;
    }

    let k = 2.0 / (period as f64 + 1.0);

    let mut sum = 0.0;
    for p in &prices[..period] {
        sum += p;
    }
    let mut ema = sum / period as f64;
    out[period - 1] = Some(ema);

    for (i, price) in prices.iter().enumerate().skip(period) {
        ema = price * k + ema * (1.0 - k);
        out[i] = Some(ema);
    }

    out
}

fn combine(a: &[Option<f64>], b: &[Option<f64>], f: impl Fn(f64, f64) -> f64) -> ValueSeries {
    a.iter()
        .zip(b)
        .map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => Some(f(*x, *y)),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close_to(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn ema_seeds_with_simple_average() {
        let ema = compute_ema(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();

        assert_eq!(ema[0], None);
        assert_eq!(ema[1], None);
        assert_eq!(ema[2], Some(2.0));
        // k = 0.5: 4 * 0.5 + 2 * 0.5 = 3, then 5 * 0.5 + 3 * 0.5 = 4
        assert_eq!(ema[3], Some(3.0));
        assert_eq!(ema[4], Some(4.0));
    }

    #[test]
    fn ema_shorter_than_period_is_undefined() {
        let ema = compute_ema(&[1.0, 2.0], 3).unwrap();
        assert_eq!(ema, vec![None, None]);
    }

    #[test]
    fn ema_period_one_tracks_price() {
        let prices = [3.0, 7.5, -2.0];
        let ema = compute_ema(&prices, 1).unwrap();
        assert_eq!(ema, vec![Some(3.0), Some(7.5), Some(-2.0)]);
    }

    #[test]
    fn ema_rejects_empty_and_zero_period() {
        assert_eq!(compute_ema(&[], 3), Err(EngineError::EmptySeries));
        assert_eq!(compute_ema(&[1.0], 0), Err(EngineError::ZeroPeriod));
    }

    #[test]
    fn ema_rejects_non_finite() {
        let err = compute_ema(&[1.0, f64::NAN, 2.0], 2).unwrap_err();
        assert!(matches!(err, EngineError::NonFinitePrice { index: 1, .. }));
    }

    #[test]
    fn macd_warm_up_boundaries() {
        let prices: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.7).sin()).collect();
        let macd = compute_macd(&prices, MacdParams::default()).unwrap();

        assert_eq!(macd.macd_line.len(), 40);
        assert_eq!(macd.signal_line.len(), 40);
        assert_eq!(macd.histogram.len(), 40);

        // slow EMA defines at 25, signal needs 9 MACD values on top of that
        assert!(macd.macd_line[24].is_none());
        assert!(macd.macd_line[25].is_some());
        assert!(macd.signal_line[32].is_none());
        assert!(macd.signal_line[33].is_some());
        assert!(macd.histogram[32].is_none());
        assert!(macd.histogram[33].is_some());
    }

    #[test]
    fn macd_signal_undefined_without_enough_macd_values() {
        let prices: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let macd = compute_macd(&prices, MacdParams::default()).unwrap();

        assert_eq!(macd.macd_line.iter().flatten().count(), 5);
        assert!(macd.signal_line.iter().all(Option::is_none));
        assert!(macd.histogram.iter().all(Option::is_none));
    }

    #[test]
    fn macd_line_is_fast_minus_slow() {
        let prices: Vec<f64> = (0..20).map(|i| (i * i) as f64).collect();
        let params = MacdParams {
            fast: 3,
            slow: 5,
            signal: 2,
        };
        let macd = compute_macd(&prices, params).unwrap();
        let fast = compute_ema(&prices, 3).unwrap();
        let slow = compute_ema(&prices, 5).unwrap();

        for i in 0..prices.len() {
            match (fast[i], slow[i]) {
                (Some(f), Some(s)) => assert_eq!(macd.macd_line[i], Some(f - s)),
                _ => assert_eq!(macd.macd_line[i], None),
            }
        }
    }

    #[test]
    fn identical_input_gives_bit_identical_output() {
        let prices: Vec<f64> = (0..60).map(|i| 50.0 + (i as f64 * 1.3).cos() * 4.0).collect();
        let a = compute_macd(&prices, MacdParams::default()).unwrap();
        let b = compute_macd(&prices, MacdParams::default()).unwrap();

        let bits = |s: &ValueSeries| s.iter().map(|v| v.map(f64::to_bits)).collect::<Vec<_>>();
        assert_eq!(bits(&a.macd_line), bits(&b.macd_line));
        assert_eq!(bits(&a.signal_line), bits(&b.signal_line));
        assert_eq!(bits(&a.histogram), bits(&b.histogram));
    }

    proptest! {
        #[test]
        fn ema_shape_matches_warm_up(
            prices in prop::collection::vec(-1_000.0f64..1_000.0, 1..80),
            period in 1usize..30,
        ) {
            let ema = compute_ema(&prices, period).unwrap();
            prop_assert_eq!(ema.len(), prices.len());

            for (i, v) in ema.iter().enumerate() {
                if i + 1 < period {
                    prop_assert!(v.is_none());
                } else {
                    prop_assert!(v.is_some());
                }
            }
        }

        #[test]
        fn ema_of_constant_series_is_constant(
            value in -1_000_000.0f64..1_000_000.0,
            len in 1usize..80,
            period in 1usize..30,
        ) {
            let prices = vec![value; len];
            let ema = compute_ema(&prices, period).unwrap();

            for v in ema.iter().flatten() {
                prop_assert!(close_to(*v, value), "{} != {}", v, value);
            }
        }

        #[test]
        fn histogram_is_macd_minus_signal(
            prices in prop::collection::vec(1.0f64..500.0, 1..120),
        ) {
            let macd = compute_macd(&prices, MacdParams::default()).unwrap();

            for i in 0..prices.len() {
                if let (Some(m), Some(s)) = (macd.macd_line[i], macd.signal_line[i]) {
                    prop_assert_eq!(macd.histogram[i], Some(m - s));
                } else {
                    prop_assert_eq!(macd.histogram[i], None);
                }
            }
        }
    }
}

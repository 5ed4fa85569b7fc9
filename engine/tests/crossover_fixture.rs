//! Regression fixture: 30 closes engineered so EMA(9)/EMA(21) and a short
//! MACD(3, 6, 4) cross at known candles.

use corelib::{Candle, CrossoverEvent, CrossoverKind, Direction, PatternEvent, Sequence};
use engine::{PatternConfig, PatternEngine};

const CLOSES: [f64; 30] = [
    100.0, 101.0, 102.0, 101.0, 100.0, 99.0, 98.0, 97.0, 96.0, 95.0, //
    94.0, 93.0, 92.0, 91.0, 90.0, 89.0, 88.0, 87.0, 86.0, 85.0, //
    84.0, 85.0, 88.0, 92.0, 96.0, 99.0, 105.0, 94.0, 103.0, 88.0,
];

const START_TS: i64 = 1_709_280_000;
const STEP_SECS: i64 = 900;

fn fixture_candles() -> Vec<Candle> {
    CLOSES
        .iter()
        .enumerate()
        .map(|(i, close)| Candle {
            timestamp: (START_TS + i as i64 * STEP_SECS).into(),
            open: *close,
            high: close + 0.5,
            low: close - 0.5,
            close: *close,
            volume: 1_000.0,
        })
        .collect()
}

fn fixture_config() -> PatternConfig {
    PatternConfig {
        macd_fast: 3,
        macd_slow: 6,
        macd_signal: 4,
        ..Default::default()
    }
}

fn ev(index: usize, direction: Direction, kind: CrossoverKind) -> CrossoverEvent {
    CrossoverEvent {
        index,
        direction,
        kind,
    }
}

#[test]
fn fixture_crossovers_land_on_known_candles() {
    let engine = PatternEngine::new(fixture_config()).unwrap();
    let indicators = engine.indicators(&fixture_candles()).unwrap();
    let crossovers = engine.crossovers(&indicators);

    assert_eq!(
        crossovers.ema,
        vec![
            ev(28, Direction::Bullish, CrossoverKind::Ema),
            ev(29, Direction::Bearish, CrossoverKind::Ema),
        ]
    );

    assert_eq!(
        crossovers.macd,
        vec![
            ev(21, Direction::Bullish, CrossoverKind::Macd),
            ev(27, Direction::Bearish, CrossoverKind::Macd),
            ev(28, Direction::Bullish, CrossoverKind::Macd),
            ev(29, Direction::Bearish, CrossoverKind::Macd),
        ]
    );
}

#[test]
fn fixture_reproduces_expected_patterns() {
    let engine = PatternEngine::new(fixture_config()).unwrap();
    let events = engine.detect(&fixture_candles()).unwrap();

    assert_eq!(
        events,
        vec![
            PatternEvent::simultaneous(28, Direction::Bullish),
            PatternEvent::simultaneous(29, Direction::Bearish),
            PatternEvent::Sequential {
                first_index: 27,
                second_index: 29,
                direction: Direction::Bearish,
                sequence: Sequence::MacdThenEma,
                window: 2,
                description: "Bearish MACD crossover followed by EMA crossover within 2 candles"
                    .into(),
            },
        ]
    );
}

#[test]
fn wider_window_picks_up_earlier_macd_crossover() {
    let engine = PatternEngine::new(PatternConfig {
        max_candle_window: 7,
        simultaneous_crossovers: false,
        ..fixture_config()
    })
    .unwrap();

    let events = engine.detect(&fixture_candles()).unwrap();

    assert_eq!(
        events,
        vec![
            PatternEvent::sequential(21, 28, Direction::Bullish, Sequence::MacdThenEma),
            PatternEvent::sequential(27, 29, Direction::Bearish, Sequence::MacdThenEma),
        ]
    );
}

#[test]
fn default_macd_needs_more_history_than_fixture() {
    let engine = PatternEngine::new(PatternConfig::default()).unwrap();
    let indicators = engine.indicators(&fixture_candles()).unwrap();

    assert!(indicators.macd.signal_line.iter().all(Option::is_none));
    assert!(engine.detect(&fixture_candles()).unwrap().is_empty());
}

#[test]
fn trailing_crossover_pairs_with_every_leader_in_window() {
    let closes = [5.0, 5.0, 5.0, 5.0, 1.0, 9.0, 9.0, 9.0, 1.0, 1.0, 1.0, 9.0];
    let candles: Vec<Candle> = closes
        .iter()
        .enumerate()
        .map(|(i, c)| Candle::from_close(i as i64, *c))
        .collect();

    let engine = PatternEngine::new(PatternConfig {
        ema_fast_period: 2,
        ema_slow_period: 4,
        macd_fast: 2,
        macd_slow: 4,
        macd_signal: 2,
        ..Default::default()
    })
    .unwrap();

    let events = engine.detect(&candles).unwrap();

    assert_eq!(
        events,
        vec![
            PatternEvent::simultaneous(5, Direction::Bullish),
            PatternEvent::sequential(5, 11, Direction::Bullish, Sequence::MacdThenEma),
            PatternEvent::sequential(7, 8, Direction::Bearish, Sequence::MacdThenEma),
            PatternEvent::sequential(10, 11, Direction::Bullish, Sequence::MacdThenEma),
            PatternEvent::sequential(4, 7, Direction::Bearish, Sequence::EmaThenMacd),
            PatternEvent::sequential(5, 10, Direction::Bullish, Sequence::EmaThenMacd),
        ]
    );
}

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use engine::PatternConfig;

use crate::error::AppError;

pub const DEFAULT_SYMBOLS: [&str; 5] = ["AAPL", "MSFT", "GOOGL", "AMZN", "TSLA"];
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Candle interval the scanner runs at; one cycle per closed candle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Timeframe {
    M1,
    M5,
    #[default]
    M15,
    M30,
    H1,
    H4,
    D1,
}

impl Timeframe {
    pub fn period(&self) -> Duration {
        let minutes = match self {
            Timeframe::M1 => 1,
            Timeframe::M5 => 5,
            Timeframe::M15 => 15,
            Timeframe::M30 => 30,
            Timeframe::H1 => 60,
            Timeframe::H4 => 240,
            Timeframe::D1 => 1_440,
        };
        Duration::from_secs(minutes * 60)
    }
}

impl FromStr for Timeframe {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1m" => Ok(Timeframe::M1),
            "5m" => Ok(Timeframe::M5),
            "15m" => Ok(Timeframe::M15),
            "30m" => Ok(Timeframe::M30),
            "1h" => Ok(Timeframe::H1),
            "4h" => Ok(Timeframe::H4),
            "1d" => Ok(Timeframe::D1),
            other => Err(AppError::Config(format!("unknown timeframe '{other}'"))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// SQLite connection string for watermarks and alert history.
    pub database_url: String,

    /// Directory holding one `<SYMBOL>.json` candle file per symbol.
    pub candle_dir: PathBuf,

    /// Symbols scanned every cycle.
    pub symbols: Vec<String>,

    /// Scan cadence.
    pub timeframe: Timeframe,

    /// Pattern detection settings handed to the engine.
    pub patterns: PatternConfig,

    /// Number of alerts kept in history; older entries are trimmed.
    pub history_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://crossover_alerts.db".to_string(),
            candle_dir: PathBuf::from("./candles"),
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            timeframe: Timeframe::default(),
            patterns: PatternConfig::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl AppConfig {
    /// Reads the process environment. Unparseable values fall back to the
    /// default with a warning; the resulting pattern settings are validated.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();

        let symbols = get("SCAN_SYMBOLS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_uppercase())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|list| !list.is_empty())
            .unwrap_or(defaults.symbols);

        let patterns = PatternConfig {
            simultaneous_crossovers: parsed(
                &get,
                "SIMULTANEOUS_CROSSOVERS",
                defaults.patterns.simultaneous_crossovers,
            ),
            sequential_crossovers: parsed(
                &get,
                "SEQUENTIAL_CROSSOVERS",
                defaults.patterns.sequential_crossovers,
            ),
            max_candle_window: parsed(
                &get,
                "MAX_CANDLE_WINDOW",
                defaults.patterns.max_candle_window,
            ),
            ..defaults.patterns
        };
        patterns.validate()?;

        Ok(Self {
            database_url: get("DATABASE_URL").unwrap_or(defaults.database_url),
            candle_dir: get("CANDLE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.candle_dir),
            symbols,
            timeframe: parsed(&get, "SCAN_TIMEFRAME", defaults.timeframe),
            patterns,
            history_limit: parsed(&get, "ALERT_HISTORY_LIMIT", defaults.history_limit),
        })
    }
}

fn parsed<T: FromStr>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match get(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(key, value = %raw, "ignoring malformed setting; using default");
                default
            }
        },
        None => default,
    }
}

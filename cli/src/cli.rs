use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

use engine::PatternConfig;

#[derive(Debug, Parser)]
#[clap(name = "crossover", version)]
pub struct Cli {
    /// Emit logs as JSON lines
    #[clap(long, global = true)]
    pub json_logs: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run pattern detection over a candle file and print every event
    Detect {
        /// JSON array of candles, oldest first
        #[clap(long)]
        candles: PathBuf,

        #[clap(flatten)]
        patterns: PatternArgs,
    },

    /// Detect, then drop events already reported for the symbol and print the rest
    Scan {
        #[clap(long)]
        candles: PathBuf,

        #[clap(long)]
        symbol: String,

        /// SQLite database holding watermarks and alert history
        #[clap(long, env = "DATABASE_URL", default_value = DEFAULT_DB)]
        db: String,

        #[clap(flatten)]
        patterns: PatternArgs,
    },

    /// Print the most recent alerts, newest first; unread ones are starred
    History {
        #[clap(long, default_value = "20")]
        limit: usize,

        /// Delete every stored alert instead of listing
        #[clap(long)]
        clear: bool,

        #[clap(long, env = "DATABASE_URL", default_value = DEFAULT_DB)]
        db: String,
    },

    /// Flag one alert as read
    MarkRead {
        #[clap(long)]
        id: Uuid,

        #[clap(long, env = "DATABASE_URL", default_value = DEFAULT_DB)]
        db: String,
    },
}

pub const DEFAULT_DB: &str = "sqlite://crossover_alerts.db";

/// Overrides for the detection settings; unset flags keep the base value.
#[derive(Debug, Default, Args)]
pub struct PatternArgs {
    /// Disable same-candle EMA+MACD matching
    #[clap(long)]
    pub no_simultaneous: bool,

    /// Disable one-then-the-other matching
    #[clap(long)]
    pub no_sequential: bool,

    /// Largest candle gap for a sequential pair
    #[clap(long)]
    pub max_window: Option<usize>,

    #[clap(long)]
    pub ema_fast: Option<usize>,

    #[clap(long)]
    pub ema_slow: Option<usize>,

    #[clap(long)]
    pub macd_fast: Option<usize>,

    #[clap(long)]
    pub macd_slow: Option<usize>,

    #[clap(long)]
    pub macd_signal: Option<usize>,
}

impl PatternArgs {
    /// Applies the flags on top of `base`.
    pub fn apply(&self, base: PatternConfig) -> PatternConfig {
        PatternConfig {
            simultaneous_crossovers: base.simultaneous_crossovers && !self.no_simultaneous,
            sequential_crossovers: base.sequential_crossovers && !self.no_sequential,
            max_candle_window: self.max_window.unwrap_or(base.max_candle_window),
            ema_fast_period: self.ema_fast.unwrap_or(base.ema_fast_period),
            ema_slow_period: self.ema_slow.unwrap_or(base.ema_slow_period),
            macd_fast: self.macd_fast.unwrap_or(base.macd_fast),
            macd_slow: self.macd_slow.unwrap_or(base.macd_slow),
            macd_signal: self.macd_signal.unwrap_or(base.macd_signal),
        }
    }
}

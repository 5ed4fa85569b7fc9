pub mod config;
pub mod crossover;
pub mod error;
pub mod pattern;
pub mod pipeline;
pub mod series;

pub use config::PatternConfig;
pub use error::EngineError;
pub use pipeline::{Indicators, PatternEngine};

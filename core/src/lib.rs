pub mod models;

pub use models::candle::{Candle, Timestamp};
pub use models::pattern::{PatternEvent, Sequence};
pub use models::signal::{CrossoverEvent, CrossoverKind, Direction};

use serde::{Deserialize, Serialize};

use super::signal::{CrossoverKind, Direction};

/// Which crossover stream supplied the earlier event of a sequential pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sequence {
    EmaThenMacd,
    MacdThenEma,
}

impl Sequence {
    pub fn leading(&self) -> CrossoverKind {
        match self {
            Sequence::EmaThenMacd => CrossoverKind::Ema,
            Sequence::MacdThenEma => CrossoverKind::Macd,
        }
    }

    pub fn trailing(&self) -> CrossoverKind {
        match self {
            Sequence::EmaThenMacd => CrossoverKind::Macd,
            Sequence::MacdThenEma => CrossoverKind::Ema,
        }
    }
}

/// Composite crossover pattern, ready to be rendered or persisted as-is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PatternEvent {
    /// EMA and MACD crossed in the same direction on the same candle.
    Simultaneous {
        index: usize,
        direction: Direction,
        description: String,
    },

    /// One crossover followed by the other, same direction, within `window` candles.
    Sequential {
        first_index: usize,
        second_index: usize,
        direction: Direction,
        sequence: Sequence,
        window: usize,
        description: String,
    },
}

impl PatternEvent {
    pub fn simultaneous(index: usize, direction: Direction) -> Self {
        PatternEvent::Simultaneous {
            index,
            direction,
            description: format!("Simultaneous {direction} crossover of both MACD and EMA"),
        }
    }

    pub fn sequential(
        first_index: usize,
        second_index: usize,
        direction: Direction,
        sequence: Sequence,
    ) -> Self {
        let window = second_index - first_index;
        let description = format!(
            "{} {} crossover followed by {} crossover within {} candles",
            direction.capitalized(),
            sequence.leading().label(),
            sequence.trailing().label(),
            window
        );

        PatternEvent::Sequential {
            first_index,
            second_index,
            direction,
            sequence,
            window,
            description,
        }
    }

    /// Candle index the event is reported at: the crossing candle for
    /// simultaneous patterns, the later crossing for sequential ones.
    pub fn anchor_index(&self) -> usize {
        match self {
            PatternEvent::Simultaneous { index, .. } => *index,
            PatternEvent::Sequential { second_index, .. } => *second_index,
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            PatternEvent::Simultaneous { direction, .. }
            | PatternEvent::Sequential { direction, .. } => *direction,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            PatternEvent::Simultaneous { description, .. }
            | PatternEvent::Sequential { description, .. } => description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_description_names_both_indicators() {
        let ev = PatternEvent::sequential(5, 8, Direction::Bullish, Sequence::MacdThenEma);

        assert_eq!(
            ev.description(),
            "Bullish MACD crossover followed by EMA crossover within 3 candles"
        );
        assert_eq!(ev.anchor_index(), 8);
    }

    #[test]
    fn simultaneous_description() {
        let ev = PatternEvent::simultaneous(12, Direction::Bearish);

        assert_eq!(
            ev.description(),
            "Simultaneous bearish crossover of both MACD and EMA"
        );
        assert_eq!(ev.anchor_index(), 12);
    }

    #[test]
    fn serializes_with_type_tag() {
        let ev = PatternEvent::sequential(2, 4, Direction::Bearish, Sequence::EmaThenMacd);
        let json = serde_json::to_value(&ev).unwrap();

        assert_eq!(json["type"], "sequential");
        assert_eq!(json["sequence"], "ema-then-macd");
        assert_eq!(json["direction"], "bearish");
        assert_eq!(json["window"], 2);
    }
}

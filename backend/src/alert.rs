use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use corelib::PatternEvent;

/// A newly reported pattern for one symbol, as handed to the notification
/// and history collaborators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub symbol: String,
    pub detected_at: DateTime<Utc>,
    pub event: PatternEvent,
    /// Close of the batch's last candle when the alert was raised.
    pub last_close: f64,
    #[serde(default)]
    pub read: bool,
}

impl Alert {
    pub fn new(symbol: &str, event: PatternEvent, last_close: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol: symbol.to_string(),
            detected_at: Utc::now(),
            event,
            last_close,
            read: false,
        }
    }

    pub fn title(&self) -> String {
        let kind = match self.event {
            PatternEvent::Simultaneous { .. } => "Simultaneous",
            PatternEvent::Sequential { .. } => "Sequential",
        };
        format!(
            "{}: {} {} Crossover",
            self.symbol,
            kind,
            self.event.direction().as_str().to_uppercase()
        )
    }

    pub fn message(&self) -> String {
        let movement = self.event.direction().movement();
        let body = match &self.event {
            PatternEvent::Simultaneous { .. } => format!(
                "Both MACD and EMA indicators have crossed {movement} on the same candle."
            ),
            PatternEvent::Sequential {
                sequence, window, ..
            } => format!(
                "{} crossed {movement} followed by {} within {window} candles.",
                sequence.leading().label(),
                sequence.trailing().label()
            ),
        };
        format!("{body}\nCurrent price: ${:.2}", self.last_close)
    }
}

pub mod repository;
pub mod repository_sqlx;

pub use repository::HistoryRepository;
pub use repository_sqlx::SqlxHistoryRepository;

use tracing::error;

use crate::alert::Alert;
use crate::error::AppError;

/// Appends `alerts` in order and returns how many were stored. Failures are
/// logged and never stop delivery of the alerts themselves.
pub async fn record_alerts(history: &dyn HistoryRepository, alerts: &[Alert]) -> usize {
    let mut stored = 0;
    for alert in alerts {
        match history.append(alert).await {
            Ok(()) => stored += 1,
            Err(e) => {
                let err = AppError::History(e);
                error!(error = %err, alert_id = %alert.id, symbol = %alert.symbol, "failed to record alert");
            }
        }
    }
    stored
}

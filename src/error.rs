use thiserror::Error;

/// Failures raised by the dashboard handlers and the data source behind them.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("data source error: {0}")]
    DataSource(String),
    #[error("invalid id '{0}'")]
    InvalidId(String),
    #[error("record {record_id} has an unrepresentable timestamp ({millis} ms)")]
    InvalidTimestamp { record_id: String, millis: i64 },
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("calendar arithmetic out of range from {0}")]
    DateOutOfRange(String),
}

impl From<mongodb::error::Error> for DashboardError {
    fn from(e: mongodb::error::Error) -> Self {
        DashboardError::DataSource(e.to_string())
    }
}

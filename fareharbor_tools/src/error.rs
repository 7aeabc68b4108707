use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum FareharborError {
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("The webhook payload does not contain a booking object")]
    MissingBooking,
    #[error("Invalid currency amount: {0}")]
    InvalidCurrencyAmount(String),
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

impl From<serde_json::Error> for FareharborError {
    fn from(e: serde_json::Error) -> Self {
        Self::JsonError(e.to_string())
    }
}

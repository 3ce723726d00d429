use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpendSenseError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for SpendSenseError {
    fn from(e: serde_json::Error) -> Self {
        SpendSenseError::SerializationError(e.to_string())
    }
}

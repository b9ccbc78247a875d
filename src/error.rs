use thiserror::Error;

/// Validation failures. These indicate a programming or configuration error
/// upstream and are always returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckInError {
    #[error("unknown emotion: {0}")]
    UnknownEmotion(String),
    #[error("unknown archetype: {0}")]
    UnknownArchetype(String),
    #[error("token amount must be a positive integer, got {0}")]
    InvalidAmount(i64),
    #[error("intensity must be between 1 and 5, got {0}")]
    InvalidIntensity(u8),
}

/// Key-value store failures. Absorbed at the manager boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

pub type Result<T, E = CheckInError> = std::result::Result<T, E>;

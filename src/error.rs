use thiserror::Error;

/// Reasons an inbound frame did not produce its normal effect.
///
/// Only join failures are surfaced to the client; everything else is logged
/// and dropped at the handler boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RelayError {
    #[error("invalid payload: {0}")]
    Validation(String),

    #[error("rate limit exceeded for {0}")]
    RateLimited(&'static str),

    #[error("connection has not joined")]
    NotJoined,

    #[error("already joined")]
    AlreadyJoined,

    #[error("lobby is full")]
    LobbyFull,

    #[error("internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Whether the offending connection should be told about this failure.
    pub fn notifies_client(&self) -> bool {
        matches!(
            self,
            RelayError::Validation(_) | RelayError::AlreadyJoined | RelayError::LobbyFull
        )
    }
}

pub type RelayResult<T> = Result<T, RelayError>;

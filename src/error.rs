//! Error types shared by every front end.

use thiserror::Error;

/// A `/status` body that could not be turned into a [`crate::StatusSnapshot`].
#[derive(Debug, Error)]
pub enum StatusError {
    #[error("malformed status payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid status payload: {0}")]
    Invalid(String),
}

/// Why a single poll did not produce a new snapshot.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("backend answered HTTP {status}")]
    Http { status: u16 },

    #[error(transparent)]
    Status(#[from] StatusError),

    /// Teardown happened while the request was in flight.
    #[error("poll cancelled")]
    Cancelled,
}

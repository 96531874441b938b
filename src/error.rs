use thiserror::Error;

/// Errors raised by network construction, training, inference and persistence.
///
/// A missing snapshot is not an error: `Network::load_training` reports it
/// as `Ok(false)` and leaves the parameters untouched.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// A configuration field is missing or out of range.
    #[error("invalid configuration: `{field}` {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// A vector (or a persisted snapshot) does not fit the network topology.
    #[error("shape mismatch in {what}: expected {expected}, got {got}")]
    ShapeMismatch { what: String, expected: usize, got: usize },

    #[error("cannot train on an empty dataset")]
    EmptyDataset,

    /// Store keys become file names, so they must be plain names.
    #[error("invalid store key: {0:?}")]
    InvalidKey(String),

    /// Raised by callers that cannot proceed without a saved training.
    #[error("no saved training named {0:?}")]
    TrainingNotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl NetworkError {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        NetworkError::InvalidConfig { field, reason: reason.into() }
    }

    pub(crate) fn shape(what: impl Into<String>, expected: usize, got: usize) -> Self {
        NetworkError::ShapeMismatch { what: what.into(), expected, got }
    }
}

pub type Result<T> = std::result::Result<T, NetworkError>;

/// Returns a `ShapeMismatch` unless `got == expected`.
pub(crate) fn check_len(what: impl FnOnce() -> String, expected: usize, got: usize) -> Result<()> {
    if expected == got {
        Ok(())
    } else {
        Err(NetworkError::shape(what(), expected, got))
    }
}

//! Error handling for the Game Booster metrics core.

/// A specialized `Result` type for sampler and history operations.
pub type Result<T> = std::result::Result<T, MonitorError>;

/// The main error type for sampling sessions.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// I/O operation failed (e.g. the sampler thread could not be spawned)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Reading CPU or memory statistics failed for a single tick
    #[error("Transient sample error: {0}")]
    TransientSample(String),

    /// Operation is not valid in the current session state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MonitorError {
    /// Create a new transient sampling error
    pub fn sample_error(msg: impl Into<String>) -> Self {
        Self::TransientSample(msg.into())
    }

    /// Create a new invalid state error
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the error only affects a single tick.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientSample(_))
    }
}

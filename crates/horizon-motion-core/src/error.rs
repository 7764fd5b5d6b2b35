//! Error types for the host plumbing.

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by the host plumbing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    /// A frame clock was asked to move backwards in time.
    #[error("frame clock cannot move backwards from {current} ms to {requested} ms")]
    ClockWentBackwards { current: u64, requested: u64 },

    /// A setting value could not be parsed.
    #[error("invalid value '{value}' for setting '{name}'")]
    InvalidSetting { name: String, value: String },
}

impl CoreError {
    /// Create a setting error.
    pub fn invalid_setting(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidSetting {
            name: name.into(),
            value: value.into(),
        }
    }
}

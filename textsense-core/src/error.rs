//! Error types for the core layer

use thiserror::Error;

/// Errors raised by the telemetry and strategy-selection core
#[derive(Debug, Error)]
pub enum CoreError {
    /// The selection heuristic produced a strategy the catalog does not hold
    #[error("invalid strategy: '{name}' is not in the strategy catalog")]
    InvalidStrategy {
        /// Name of the strategy that could not be instantiated
        name: String,
    },

    /// Configuration failed validation
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Why the configuration was rejected
        reason: String,
    },

    /// TOML configuration could not be parsed
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be rendered as TOML
    #[error("failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Snapshot could not be rendered as JSON
    #[error("failed to serialize snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O failure while reading or writing configuration
    #[error("I/O operation failed")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_strategy_display() {
        let error = CoreError::InvalidStrategy {
            name: "turbo".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "invalid strategy: 'turbo' is not in the strategy catalog"
        );
    }

    #[test]
    fn test_invalid_config_display() {
        let error = CoreError::InvalidConfig {
            reason: "history_capacity must be greater than 0".to_string(),
        };
        assert!(error.to_string().contains("history_capacity"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: CoreError = io.into();
        assert!(matches!(error, CoreError::Io { .. }));
    }
}

//! Engine error types
//!
//! Only configuration and mounting can fail. Once a mission is running the
//! simulation itself has no fallible operations.

use std::fmt;

/// Errors surfaced while loading configuration or mounting a mission
#[derive(Debug)]
pub enum EngineError {
    /// No mission record was supplied
    MissingMission,
    /// No cosmetic style table was supplied
    MissingStyleSettings,
    /// No location visual table was supplied
    MissingVisualSettings,
    /// A mission record was supplied but cannot be played
    InvalidMission {
        /// Human-readable description of the problem
        reason: String,
    },
    /// JSON configuration failed to parse
    Config(serde_json::Error),
}

impl EngineError {
    /// True for the "not ready yet" failures the host should show a loading
    /// placeholder for, rather than an error message
    pub fn is_missing_config(&self) -> bool {
        matches!(
            self,
            EngineError::MissingMission
                | EngineError::MissingStyleSettings
                | EngineError::MissingVisualSettings
        )
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::MissingMission => write!(f, "no mission supplied"),
            EngineError::MissingStyleSettings => write!(f, "no style settings supplied"),
            EngineError::MissingVisualSettings => write!(f, "no visual settings supplied"),
            EngineError::InvalidMission { reason } => write!(f, "invalid mission: {}", reason),
            EngineError::Config(e) => write!(f, "configuration parse error: {}", e),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_classification() {
        assert!(EngineError::MissingMission.is_missing_config());
        assert!(EngineError::MissingVisualSettings.is_missing_config());
        assert!(
            !EngineError::InvalidMission {
                reason: "zero objectives".into()
            }
            .is_missing_config()
        );
    }

    #[test]
    fn test_config_error_wraps_serde() {
        let err: EngineError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, EngineError::Config(_)));
        assert!(err.to_string().starts_with("configuration parse error"));
    }
}

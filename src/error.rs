//! Error types for the fingerprint defense engine
//!
//! Collectors and the defense installer never surface platform failures as
//! errors; they degrade to sentinel values so one broken vector cannot abort
//! a collection pass. The variants here cover the structural failures that
//! do reach the caller: malformed persisted input, and entropy-source loss.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FingerprintError>;

/// Error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Environment errors (1xx)
    EnvironmentNotSupported = 100,

    // Collection/analysis errors (2xx)
    SignalCollectionFailed = 200,
    RiskEvaluationFailed = 201,

    // Mitigation errors (3xx)
    MitigationFailed = 300,

    // Persistence errors (4xx)
    SerializationFailed = 400,
    DeserializationFailed = 401,

    // Salt errors (5xx)
    SaltRotationFailed = 500,
}

/// Main error type for the fingerprint defense engine
#[derive(Error, Debug, Clone)]
pub enum FingerprintError {
    /// A required platform primitive is absent (e.g. no entropy source at all).
    #[error("Environment not supported: {0}")]
    EnvironmentNotSupported(String),

    #[error("Signal collection failed: {0}")]
    SignalCollection(String),

    #[error("Risk evaluation failed: {0}")]
    RiskEvaluation(String),

    #[error("Mitigation failed: {0}")]
    Mitigation(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Deserialization failed: {0}")]
    Deserialization(String),

    #[error("Salt rotation failed: {0}")]
    SaltRotation(String),
}

impl FingerprintError {
    /// Get the error code for programmatic handling
    pub fn code(&self) -> ErrorCode {
        match self {
            FingerprintError::EnvironmentNotSupported(_) => ErrorCode::EnvironmentNotSupported,
            FingerprintError::SignalCollection(_) => ErrorCode::SignalCollectionFailed,
            FingerprintError::RiskEvaluation(_) => ErrorCode::RiskEvaluationFailed,
            FingerprintError::Mitigation(_) => ErrorCode::MitigationFailed,
            FingerprintError::Serialization(_) => ErrorCode::SerializationFailed,
            FingerprintError::Deserialization(_) => ErrorCode::DeserializationFailed,
            FingerprintError::SaltRotation(_) => ErrorCode::SaltRotationFailed,
        }
    }

    /// Whether the caller can recover by discarding state and starting fresh.
    ///
    /// Persistence failures are recoverable: a corrupted stored snapshot means
    /// the UI flow should fall back to a fresh collection pass rather than
    /// crash. An absent entropy source is not recoverable within the session.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            FingerprintError::SignalCollection(_)
                | FingerprintError::Mitigation(_)
                | FingerprintError::Serialization(_)
                | FingerprintError::Deserialization(_)
        )
    }

    /// Get a user-friendly message for display
    pub fn user_message(&self) -> String {
        match self {
            FingerprintError::EnvironmentNotSupported(_) => {
                "This environment does not provide the primitives required for \
                 fingerprint defense."
                    .into()
            }
            FingerprintError::SignalCollection(_) => {
                "Could not measure your browser fingerprint. Please try again.".into()
            }
            FingerprintError::RiskEvaluation(_) => {
                "Could not evaluate your re-identification risk. Please try again.".into()
            }
            FingerprintError::Mitigation(_) => {
                "Some fingerprint countermeasures could not be applied.".into()
            }
            FingerprintError::Serialization(_) => {
                "Failed to save fingerprint data. Your settings are unaffected.".into()
            }
            FingerprintError::Deserialization(_) => {
                "Stored fingerprint data is corrupted. Starting fresh.".into()
            }
            FingerprintError::SaltRotation(_) => {
                "Failed to rotate the anonymization salt. Please try again.".into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            FingerprintError::EnvironmentNotSupported("test".into()).code(),
            ErrorCode::EnvironmentNotSupported
        );
        assert_eq!(
            FingerprintError::Deserialization("test".into()).code(),
            ErrorCode::DeserializationFailed
        );
        assert_eq!(
            FingerprintError::SaltRotation("test".into()).code(),
            ErrorCode::SaltRotationFailed
        );
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(FingerprintError::Deserialization("bad json".into()).is_recoverable());
        assert!(FingerprintError::Serialization("test".into()).is_recoverable());

        // Losing the entropy source is not recoverable in-session
        assert!(!FingerprintError::EnvironmentNotSupported("no entropy".into()).is_recoverable());
        assert!(!FingerprintError::SaltRotation("test".into()).is_recoverable());
    }

    #[test]
    fn test_display_includes_detail() {
        let err = FingerprintError::Deserialization("missing field `id`".into());
        assert!(err.to_string().contains("missing field `id`"));
    }
}

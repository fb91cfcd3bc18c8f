//! Unified error types for the console data layer.
//!
//! The crate-internal [`Error`] enum carries full diagnostic detail; the view
//! layer only ever sees a classified [`UiError`] produced at the view-model
//! boundary, which tags each failure with a coarse kind and a retryable flag.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of what failed
        message: String,
    },

    /// The backend answered with a non-2xx status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the backend
        status: u16,
        /// Server-provided error message (response body `detail`/`message`)
        message: String,
    },

    /// The request never produced a usable response (DNS, connect, timeout).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A field failed client-side validation before any request was sent.
    #[error("Validation error on {field}: {message}")]
    Validation {
        /// Name of the offending field
        field: String,
        /// User-facing validation message
        message: String,
    },

    /// A response body did not match the expected shape.
    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    /// I/O error (config file reads).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse error classes surfaced to the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorKind {
    /// Data could not be loaded (non-auth HTTP failure, bad payload)
    Load,
    /// Client-side validation rejected the input
    Validation,
    /// The backend refused the request (401/403)
    Permission,
    /// The request never reached the backend or timed out
    Network,
}

/// Error shape stored in view-model state for the view to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    /// Coarse class of the failure
    pub kind: UiErrorKind,
    /// Message suitable for an inline banner
    pub message: String,
    /// Whether retrying the same operation may succeed
    pub retryable: bool,
}

impl UiError {
    /// Classifies a crate error into the shape the view layer renders.
    ///
    /// 401/403 map to [`UiErrorKind::Permission`], transport failures to
    /// [`UiErrorKind::Network`] (retryable), validation stays
    /// [`UiErrorKind::Validation`] (never retryable), and everything else is a
    /// load failure, retryable only for server-side (5xx) statuses.
    #[must_use]
    pub fn classify(err: &Error) -> Self {
        match err {
            Error::Api {
                status: status @ (401 | 403),
                message,
            } => Self {
                kind: UiErrorKind::Permission,
                message: format!("Not authorized ({status}): {message}"),
                retryable: false,
            },
            Error::Api { status, message } => Self {
                kind: UiErrorKind::Load,
                message: message.clone(),
                retryable: *status >= 500,
            },
            Error::Network(source) => Self {
                kind: UiErrorKind::Network,
                message: if source.is_timeout() {
                    "Request timed out".to_string()
                } else {
                    "Network request failed".to_string()
                },
                retryable: true,
            },
            Error::Validation { message, .. } => Self {
                kind: UiErrorKind::Validation,
                message: message.clone(),
                retryable: false,
            },
            other => Self {
                kind: UiErrorKind::Load,
                message: other.to_string(),
                retryable: false,
            },
        }
    }
}

impl From<&Error> for UiError {
    fn from(err: &Error) -> Self {
        Self::classify(err)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_malformed_payloads_are_non_retryable_load_errors() {
        let source = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let ui = UiError::classify(&Error::Deserialize(source));
        assert_eq!(ui.kind, UiErrorKind::Load);
        assert!(!ui.retryable);
    }

    #[test]
    fn test_permission_errors_map_to_permission_kind() {
        for status in [401, 403] {
            let err = Error::Api {
                status,
                message: "forbidden".to_string(),
            };
            let ui = UiError::classify(&err);
            assert_eq!(ui.kind, UiErrorKind::Permission);
            assert!(!ui.retryable);
        }
    }

    #[test]
    fn test_server_errors_are_retryable_load_errors() {
        let err = Error::Api {
            status: 503,
            message: "temporarily unavailable".to_string(),
        };
        let ui = UiError::classify(&err);
        assert_eq!(ui.kind, UiErrorKind::Load);
        assert!(ui.retryable);
        assert_eq!(ui.message, "temporarily unavailable");
    }

    #[test]
    fn test_client_errors_are_not_retryable() {
        let err = Error::Api {
            status: 404,
            message: "container not found".to_string(),
        };
        let ui = UiError::classify(&err);
        assert_eq!(ui.kind, UiErrorKind::Load);
        assert!(!ui.retryable);
    }

    #[test]
    fn test_validation_errors_keep_their_message() {
        let err = Error::Validation {
            field: "tenant_id".to_string(),
            message: "Invalid tenant ID".to_string(),
        };
        let ui = UiError::classify(&err);
        assert_eq!(ui.kind, UiErrorKind::Validation);
        assert_eq!(ui.message, "Invalid tenant ID");
        assert!(!ui.retryable);
    }
}

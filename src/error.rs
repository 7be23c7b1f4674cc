//! Error types for loading and enriching the work-order catalog
//!
//! Errors are classified by recoverability:
//! - Retryable: network failures, timeouts, 5xx responses
//! - NonRetryable: malformed data, bad paths
//! - RequiresUserAction: broken config, unusable data source

use std::path::PathBuf;
use thiserror::Error;

/// Error types for catalog I/O
#[derive(Debug, Error)]
pub enum CatalogError {
    // Retryable errors
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Server returned HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    // Non-retryable errors
    #[error("Data file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse work orders: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(String),

    // Requires user action
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported data source: {0}")]
    InvalidSource(String),
}

impl CatalogError {
    /// Returns true if trying again later might succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            CatalogError::Network(_) | CatalogError::Timeout(_) => true,
            CatalogError::HttpStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns true if this error requires user action to resolve
    pub fn requires_user_action(&self) -> bool {
        matches!(
            self,
            CatalogError::Config(_) | CatalogError::InvalidSource(_)
        )
    }

    /// Get a user-friendly recovery suggestion
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CatalogError::Network(_) => "Check your internet connection and reload.",
            CatalogError::Timeout(_) => "The server took too long to respond. Reload the page.",
            CatalogError::HttpStatus { .. } => "The work log could not be loaded right now.",
            CatalogError::NotFound(_) => "Check that the work-order export exists at the configured path.",
            CatalogError::Parse(_) => "Check that the work-order export is a JSON array.",
            CatalogError::Io(_) => "Check file permissions and disk space.",
            CatalogError::Config(_) => "Check your configuration in ~/.aios/config.json",
            CatalogError::InvalidSource(_) => {
                "Set dataSource to a file path or an http(s) URL in ~/.aios/config.json"
            }
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Parse(err.to_string())
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return CatalogError::HttpStatus {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            };
        }
        if err.is_decode() {
            return CatalogError::Parse(err.to_string());
        }
        CatalogError::Network(err.to_string())
    }
}

/// Serializable error representation for JSON output
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub message: String,
    pub error_type: ErrorType,
    pub can_retry: bool,
    pub recovery_suggestion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorType {
    Retryable,
    NonRetryable,
    RequiresUserAction,
}

impl From<&CatalogError> for ErrorPayload {
    fn from(err: &CatalogError) -> Self {
        let error_type = if err.requires_user_action() {
            ErrorType::RequiresUserAction
        } else if err.is_retryable() {
            ErrorType::Retryable
        } else {
            ErrorType::NonRetryable
        };

        ErrorPayload {
            message: err.to_string(),
            error_type,
            can_retry: err.is_retryable(),
            recovery_suggestion: err.recovery_suggestion().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors_are_retryable_client_errors_are_not() {
        let server = CatalogError::HttpStatus {
            status: 503,
            url: "https://example.com/data.json".to_string(),
        };
        let missing = CatalogError::HttpStatus {
            status: 404,
            url: "https://example.com/data.json".to_string(),
        };
        assert!(server.is_retryable());
        assert!(!missing.is_retryable());
    }

    #[test]
    fn test_payload_classification() {
        let payload = ErrorPayload::from(&CatalogError::Config("bad json".into()));
        assert_eq!(payload.error_type, ErrorType::RequiresUserAction);
        assert!(!payload.can_retry);
        assert!(payload.message.contains("bad json"));

        let payload = ErrorPayload::from(&CatalogError::Timeout(10));
        assert_eq!(payload.error_type, ErrorType::Retryable);
        assert!(payload.can_retry);
    }

    #[test]
    fn test_io_error_converts() {
        let err: CatalogError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}

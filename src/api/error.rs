//! The single error kind surfaced by the API client.

use thiserror::Error;

pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error: Unable to reach the server. Please check your connection.";
pub const NETWORK_ERROR_STATUS_TEXT: &str = "Network Error";
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unexpected error occurred";
pub const UNKNOWN_ERROR_STATUS_TEXT: &str = "Unknown Error";

/// Failure at or below the transport boundary, or a response the client could not interpret.
///
/// `status` is `Some(0)` when the failure is not attributable to an HTTP response
/// (network or unknown errors) and `None` for client-side contract violations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub status: Option<u16>,
    pub status_text: Option<String>,
}

impl ApiError {
    /// Error carrying only a message (contract violations detected client-side).
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            status_text: None,
        }
    }

    /// Error tied to an HTTP response.
    pub fn with_status(message: impl Into<String>, status: u16, status_text: Option<String>) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
            status_text,
        }
    }

    /// The server could not be reached at all.
    pub fn network() -> Self {
        Self::with_status(
            NETWORK_ERROR_MESSAGE,
            0,
            Some(NETWORK_ERROR_STATUS_TEXT.to_string()),
        )
    }

    /// Any other failure during the request lifecycle.
    pub fn unknown(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            UNKNOWN_ERROR_MESSAGE.to_string()
        } else {
            message
        };
        Self::with_status(message, 0, Some(UNKNOWN_ERROR_STATUS_TEXT.to_string()))
    }

    pub fn is_network(&self) -> bool {
        self.status == Some(0) && self.status_text.as_deref() == Some(NETWORK_ERROR_STATUS_TEXT)
    }

    pub fn is_contract_violation(&self) -> bool {
        self.status.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_falls_back_to_generic_message() {
        let err = ApiError::unknown("  ");
        assert_eq!(err.message, UNKNOWN_ERROR_MESSAGE);
        assert_eq!(err.status, Some(0));
        assert_eq!(err.status_text.as_deref(), Some("Unknown Error"));
    }

    #[test]
    fn display_is_the_message() {
        let err = ApiError::with_status("Email already exists", 409, Some("Conflict".into()));
        assert_eq!(err.to_string(), "Email already exists");
        assert!(!err.is_network());
        assert!(!err.is_contract_violation());
        assert!(ApiError::network().is_network());
        assert!(ApiError::new("bad shape").is_contract_violation());
    }
}

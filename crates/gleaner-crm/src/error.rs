//! Error types for the CRM bridge.

use thiserror::Error;

/// CRM webhook errors
#[derive(Debug, Error)]
pub enum CrmError {
    /// Webhook could not be reached (network, DNS, refused)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Webhook answered with a non-2xx status
    #[error("Webhook returned HTTP {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// Webhook answered 2xx with a body of the wrong shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Any other request failure
    #[error("Request error: {0}")]
    Request(String),
}

impl From<reqwest::Error> for CrmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CrmError::Timeout
        } else if e.is_connect() {
            CrmError::Connection(e.to_string())
        } else if let Some(status) = e.status() {
            CrmError::Status {
                status: status.as_u16(),
            }
        } else if e.is_decode() {
            CrmError::InvalidResponse(e.to_string())
        } else {
            CrmError::Request(e.to_string())
        }
    }
}

impl From<serde_json::Error> for CrmError {
    fn from(e: serde_json::Error) -> Self {
        CrmError::InvalidResponse(format!("JSON parsing error: {}", e))
    }
}

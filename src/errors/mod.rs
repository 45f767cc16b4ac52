//! Error handling module for the mentor console.
//!
//! Provides the central error type shared by the backend client, the navigator and the HTTP
//! surface, with mapping to HTTP status codes and response envelopes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const SESSION_EXPIRED: &str = "SESSION_EXPIRED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const BACKEND_ERROR: &str = "BACKEND_ERROR";
    pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
    pub const DECODE_ERROR: &str = "DECODE_ERROR";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
}

/// Application error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    /// Console caller failed the PSK check
    Unauthorized(String),
    /// Platform backend rejected our credentials
    SessionExpired(String),
    /// Resource not found
    NotFound(String),
    /// Client-side validation failed, no request was sent
    Validation(String),
    /// Platform backend answered with a non-success status
    Backend { status: u16, message: String },
    /// Platform backend could not be reached
    Network(String),
    /// Platform backend payload did not match the expected shape
    Decode(String),
    /// Invalid configuration
    Config(String),
    /// Bad request
    BadRequest(String),
}

impl ConsoleError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ConsoleError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ConsoleError::SessionExpired(_) => StatusCode::UNAUTHORIZED,
            ConsoleError::NotFound(_) => StatusCode::NOT_FOUND,
            ConsoleError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ConsoleError::Backend { .. } => StatusCode::BAD_GATEWAY,
            ConsoleError::Network(_) => StatusCode::BAD_GATEWAY,
            ConsoleError::Decode(_) => StatusCode::BAD_GATEWAY,
            ConsoleError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ConsoleError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ConsoleError::Unauthorized(_) => codes::UNAUTHORIZED,
            ConsoleError::SessionExpired(_) => codes::SESSION_EXPIRED,
            ConsoleError::NotFound(_) => codes::NOT_FOUND,
            ConsoleError::Validation(_) => codes::VALIDATION_ERROR,
            ConsoleError::Backend { .. } => codes::BACKEND_ERROR,
            ConsoleError::Network(_) => codes::NETWORK_ERROR,
            ConsoleError::Decode(_) => codes::DECODE_ERROR,
            ConsoleError::Config(_) => codes::CONFIG_ERROR,
            ConsoleError::BadRequest(_) => codes::BAD_REQUEST,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            ConsoleError::Unauthorized(msg) => msg.clone(),
            ConsoleError::SessionExpired(msg) => msg.clone(),
            ConsoleError::NotFound(msg) => msg.clone(),
            ConsoleError::Validation(msg) => msg.clone(),
            ConsoleError::Backend { message, .. } => message.clone(),
            ConsoleError::Network(msg) => msg.clone(),
            ConsoleError::Decode(msg) => msg.clone(),
            ConsoleError::Config(msg) => msg.clone(),
            ConsoleError::BadRequest(msg) => msg.clone(),
        }
    }

    /// Authentication failures are handled by the token owner, not by the console.
    ///
    /// The backend does not use a dedicated code for these, so message content is checked too.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            ConsoleError::SessionExpired(_) => true,
            ConsoleError::Backend { status: 401, .. } => true,
            ConsoleError::Backend { message, .. } => {
                message.contains("expired") || message.contains("Unauthorized")
            }
            _ => false,
        }
    }
}

impl std::fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for ConsoleError {}

impl From<reqwest::Error> for ConsoleError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("Backend request error: {:?}", err);
        if err.is_decode() {
            ConsoleError::Decode(format!("Unexpected response from server: {}", err))
        } else {
            ConsoleError::Network(format!("Could not reach server: {}", err))
        }
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        ConsoleError::Decode(format!("JSON error: {}", err))
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
    pub generation: u64,
}

impl ErrorResponse {
    pub fn new(error: &ConsoleError, generation: u64) -> Self {
        let details = match error {
            ConsoleError::Backend { status, .. } => {
                Some(serde_json::json!({ "upstreamStatus": status }))
            }
            _ => None,
        };

        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.message(),
                details,
            },
            generation,
        }
    }
}

/// Wrapper type for errors that carry the session generation.
pub struct ConsoleErrorWithGeneration {
    pub error: ConsoleError,
    pub generation: u64,
}

impl From<ConsoleError> for ConsoleErrorWithGeneration {
    fn from(error: ConsoleError) -> Self {
        Self {
            error,
            generation: 0,
        }
    }
}

impl IntoResponse for ConsoleErrorWithGeneration {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        let body = ErrorResponse::new(&self.error, self.generation);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failure_by_message() {
        let expired = ConsoleError::Backend {
            status: 403,
            message: "Token expired".to_string(),
        };
        let unauthorized = ConsoleError::Backend {
            status: 500,
            message: "Unauthorized access".to_string(),
        };
        let other = ConsoleError::Backend {
            status: 500,
            message: "Database unavailable".to_string(),
        };

        assert!(expired.is_auth_failure());
        assert!(unauthorized.is_auth_failure());
        assert!(!other.is_auth_failure());
        assert!(!ConsoleError::Validation("expired".to_string()).is_auth_failure());
    }

    #[test]
    fn test_backend_error_envelope() {
        let err = ConsoleError::Backend {
            status: 404,
            message: "Student not found".to_string(),
        };
        let body = ErrorResponse::new(&err, 7);

        assert!(!body.success);
        assert_eq!(body.error.code, codes::BACKEND_ERROR);
        assert_eq!(body.generation, 7);
        assert_eq!(
            body.details_status(),
            Some(404),
            "upstream status should be carried in details"
        );
    }

    impl ErrorResponse {
        fn details_status(&self) -> Option<u64> {
            self.error
                .details
                .as_ref()
                .and_then(|d| d["upstreamStatus"].as_u64())
        }
    }
}

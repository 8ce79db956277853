/// Unified error types for the data space connector
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Main error type for the connector
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// Configuration errors (fatal at startup)
    #[error("Configuration error: {0}")]
    Config(String),

    /// DID document resolution errors
    #[error("DID resolution error: {0}")]
    DidResolution(String),

    /// Failures talking to a data space or hub info endpoint
    #[error("Info endpoint error: {0}")]
    InfoEndpoint(String),

    /// Bearer token could not be minted
    #[error("Token minting error: {0}")]
    TokenMinting(String),

    /// Uniform token verification failure; the specific cause is logged,
    /// never surfaced to callers
    #[error("Token could not be verified")]
    TokenVerification,

    /// Key pair generation, encoding or secret store errors
    #[error("Key store error: {0}")]
    KeyStore(String),

    /// Membership repository I/O errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Request validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convert ConnectorError to an HTTP response with a JSON `{"error": ..}` body
impl IntoResponse for ConnectorError {
    fn into_response(self) -> Response {
        let status = match self {
            ConnectorError::Validation(_) => StatusCode::BAD_REQUEST,
            ConnectorError::TokenVerification => StatusCode::UNAUTHORIZED,
            ConnectorError::NotFound(_) => StatusCode::NOT_FOUND,
            ConnectorError::DidResolution(_)
            | ConnectorError::InfoEndpoint(_)
            | ConnectorError::TokenMinting(_)
            | ConnectorError::Storage(_)
            | ConnectorError::Config(_)
            | ConnectorError::KeyStore(_)
            | ConnectorError::Io(_)
            | ConnectorError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));

        (status, body).into_response()
    }
}

/// Result type alias for connector operations
pub type ConnectorResult<T> = Result<T, ConnectorError>;

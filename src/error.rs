//! Error handling module for People Intake
//!
//! This module defines the error types used throughout the application,
//! providing a unified error handling strategy with proper error context
//! and HTTP response mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Result type alias for People Intake operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for People Intake
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A record or form field failed a format rule
    #[error("{0}")]
    Validation(String),

    /// The database could not be reached at startup
    #[error("Storage connection error: {0}")]
    StorageConnect(String),

    /// The database rejected a write
    #[error("Storage write error: {0}")]
    StorageWrite(String),

    /// A file input could not be opened or read
    #[error("Cannot open resource: {0}")]
    ResourceOpen(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Error::Validation(msg.into())
    }

    /// Create a storage connection error
    pub fn storage_connect<S: Into<String>>(msg: S) -> Self {
        Error::StorageConnect(msg.into())
    }

    /// Create a storage write error
    pub fn storage_write<S: Into<String>>(msg: S) -> Self {
        Error::StorageWrite(msg.into())
    }

    /// Create a resource open error
    pub fn resource_open<S: Into<String>>(msg: S) -> Self {
        Error::ResourceOpen(msg.into())
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Error::Internal(msg.into())
    }

    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Config(_)
            | Error::StorageConnect(_)
            | Error::StorageWrite(_)
            | Error::ResourceOpen(_)
            | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Errors that only the operator should see in full
    pub fn is_operator_only(&self) -> bool {
        !matches!(self, Error::Validation(_))
    }
}

/// Clients see the validation message or a generic failure, never storage
/// or file details.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.is_operator_only() {
            tracing::error!(error = ?self, error_type = error_type(&self), "Internal server error");
            return (status, "Something went wrong. Please try again later.").into_response();
        }

        tracing::warn!(error = %self, "Client error");
        (status, self.to_string()).into_response()
    }
}

/// Get a string representation of the error type
fn error_type(error: &Error) -> &'static str {
    match error {
        Error::Config(_) => "configuration_error",
        Error::Validation(_) => "validation_error",
        Error::StorageConnect(_) => "storage_connect_error",
        Error::StorageWrite(_) => "storage_write_error",
        Error::ResourceOpen(_) => "resource_open_error",
        Error::Internal(_) => "internal_error",
    }
}

/// Convert from envconfig::Error to our Error type
impl From<envconfig::Error> for Error {
    fn from(err: envconfig::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(Error::validation("test").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            Error::storage_write("test").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::resource_open("test").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_operator_only_errors() {
        assert!(!Error::validation("phone").is_operator_only());
        assert!(Error::storage_connect("refused").is_operator_only());
        assert!(Error::storage_write("duplicate").is_operator_only());
    }

    #[tokio::test]
    async fn test_storage_error_body_is_generic() {
        let response = Error::storage_write("relation \"people\" does not exist").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(!text.contains("people"));
    }

    #[tokio::test]
    async fn test_validation_error_body_names_field() {
        let response = Error::validation("Invalid phone").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Invalid phone");
    }
}

// src/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, warn};

/// Structured error body returned to clients.
///
/// `message` sits at the top level so the browser view can show it verbatim.
#[derive(Serialize, Debug)]
struct ErrorResponse {
    #[serde(rename = "type")]
    error_type: &'static str,
    message: String,
}

/// Which side of the repository contract failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOperation {
    Read,
    Write,
}

impl fmt::Display for StorageOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("read"),
            Self::Write => f.write_str("write"),
        }
    }
}

/// Errors that can occur anywhere in the admin panel.
///
/// Implements `IntoResponse`, so handlers and middleware can return it
/// directly. Storage and configuration failures are logged in full and
/// rendered to the client with a generic message only.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Settings could not be loaded: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Request body exceeds the size limit")]
    PayloadTooLarge,

    #[error("Failed to {operation} '{}': {source}", path.display())]
    Storage {
        operation: StorageOperation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed groups document '{}': {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Session store error: {0}")]
    Session(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Maps an extractor rejection: oversized bodies keep their 413, anything else is a 400.
    pub fn rejected(status: StatusCode, message: impl Into<String>) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge
        } else {
            Self::Validation(message.into())
        }
    }

    pub fn storage(operation: StorageOperation, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Storage {
            operation,
            path: path.into(),
            source,
        }
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Configuration(_)
            | Self::Settings(_)
            | Self::Storage { .. }
            | Self::Format { .. }
            | Self::Session(_)
            | Self::Io(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for the response body.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Configuration(_) | Self::Settings(_) => "CONFIGURATION_ERROR",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            Self::Storage { .. } | Self::Format { .. } => "STORAGE_ERROR",
            Self::Session(_) => "SESSION_ERROR",
            Self::Io(_) | Self::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// The message shown to the client. Never includes paths or source errors.
    pub fn client_message(&self) -> String {
        match self {
            Self::InvalidCredentials => "Invalid credentials".to_string(),
            Self::Unauthorized => "Unauthorized access".to_string(),
            Self::Validation(msg) => msg.clone(),
            Self::PayloadTooLarge => "Request body is too large.".to_string(),
            Self::Storage {
                operation: StorageOperation::Write,
                ..
            } => "Failed to save the configuration file.".to_string(),
            Self::Storage {
                operation: StorageOperation::Read,
                ..
            }
            | Self::Format { .. } => "Failed to read the configuration file.".to_string(),
            Self::Session(_) => "Could not log out.".to_string(),
            Self::Configuration(_) | Self::Settings(_) => {
                "Internal server configuration error".to_string()
            }
            Self::Io(_) | Self::Internal(_) => {
                "An unexpected internal server error occurred".to_string()
            }
        }
    }

    fn log(&self) {
        if self.status_code().is_server_error() {
            error!(error = %self, error_type = self.error_type(), "Request failed with server error");
        } else {
            warn!(error = %self, error_type = self.error_type(), "Request rejected");
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        let body = ErrorResponse {
            error_type: self.error_type(),
            message: self.client_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// Result type alias for the application.
pub type Result<T, E = AppError> = std::result::Result<T, E>;

// src/errors.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug, Clone)]
pub enum AppError {
    // --- Startup ---
    #[error("Configuration Error: {0}")]
    ConfigError(String),

    // --- Request/Input Errors ---
    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    // --- External Service Errors ---
    #[error("Text generation error: {0}")]
    TextGenerationError(String),

    #[error("Profile parse error: {0}")]
    ProfileParseError(String),

    #[error("Image generation error: {0}")]
    ImageGenerationError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Mint error: {0}")]
    MintError(String),

    #[error("HTTP Request Error: {0}")]
    HttpRequestError(String),

    // --- General/Internal Errors ---
    #[error("Template Error: {0}")]
    TemplateError(String),

    #[error("Serialization Error: {0}")]
    SerializationError(String),

    #[error("IO Error: {0}")]
    IoError(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

// Upstream failure detail goes to the operational log; the client only ever
// sees an opaque summary with the mapped status code. Error bodies are plain
// text.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            // 4xx Client Errors
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),

            // 5xx Server Errors
            AppError::ConfigError(msg) => {
                error!("Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server configuration error".to_string(),
                )
            }
            AppError::TextGenerationError(msg) => {
                error!("Text generation error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Profile generation failed".to_string(),
                )
            }
            AppError::ProfileParseError(msg) => {
                error!("Profile parse error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Profile generation failed".to_string(),
                )
            }
            AppError::ImageGenerationError(msg) => {
                // Recovered via the fallback asset inside the generation
                // flow; reaching here means a bug, treat as opaque 500.
                error!("Image generation error escaped recovery: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                )
            }
            AppError::StorageError(msg) => {
                error!("Storage error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Image upload failed".to_string(),
                )
            }
            AppError::MintError(msg) => {
                error!("Mint error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                )
            }
            AppError::HttpRequestError(msg) => {
                error!("HTTP request error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to communicate with external service".to_string(),
                )
            }
            AppError::TemplateError(msg) => {
                error!("Template error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to render page".to_string(),
                )
            }
            AppError::SerializationError(msg) => {
                error!("Serialization error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Data formatting error".to_string(),
                )
            }
            AppError::IoError(msg) => {
                error!("IO error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "File system or network error".to_string(),
                )
            }
            AppError::InternalServerError(msg) => {
                error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        (status, message).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::HttpRequestError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

impl From<tera::Error> for AppError {
    fn from(err: tera::Error) -> Self {
        AppError::TemplateError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

// --- Convenience Result Type ---
pub type Result<T, E = AppError> = std::result::Result<T, E>;

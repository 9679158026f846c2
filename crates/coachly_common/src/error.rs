// --- File: crates/coachly_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type for all Coachly errors.
///
/// This enum provides a common set of error variants that can be used across
/// all crates. Each crate can extend this by implementing
/// From<SpecificError> for CoachlyError.
#[derive(Error, Debug)]
pub enum CoachlyError {
    /// Error occurred during an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during validation of caller input
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during a database operation
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Error occurred during an external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to a conflict (e.g., a slot already booked)
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// Error occurred due to a timeout
    #[error("Timeout: {0}")]
    TimeoutError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
///
/// This trait can be implemented by error types to provide a consistent way
/// to convert errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for CoachlyError {
    fn status_code(&self) -> u16 {
        match self {
            CoachlyError::HttpError(_) => 500,
            CoachlyError::ParseError(_) => 400,
            CoachlyError::ConfigError(_) => 500,
            CoachlyError::ValidationError(_) => 400,
            CoachlyError::DatabaseError(_) => 500,
            CoachlyError::ExternalServiceError { .. } => 502,
            CoachlyError::ConflictError(_) => 409,
            CoachlyError::NotFoundError(_) => 404,
            CoachlyError::TimeoutError(_) => 504,
            CoachlyError::InternalError(_) => 500,
        }
    }
}

// Common error conversions
impl From<reqwest::Error> for CoachlyError {
    fn from(err: reqwest::Error) -> Self {
        CoachlyError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for CoachlyError {
    fn from(err: serde_json::Error) -> Self {
        CoachlyError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for CoachlyError {
    fn from(err: std::io::Error) -> Self {
        CoachlyError::InternalError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> CoachlyError {
    CoachlyError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> CoachlyError {
    CoachlyError::ValidationError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> CoachlyError {
    CoachlyError::NotFoundError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> CoachlyError {
    CoachlyError::ConflictError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> CoachlyError {
    CoachlyError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_maps_to_409() {
        assert_eq!(conflict("slot taken").status_code(), 409);
    }

    #[test]
    fn timeout_maps_to_504() {
        assert_eq!(CoachlyError::TimeoutError("zoom".into()).status_code(), 504);
    }

    #[test]
    fn validation_maps_to_400() {
        assert_eq!(validation_error("bad duration").status_code(), 400);
    }
}

// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Overlapping maintenance window (user-correctable)
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Fetch or send failure against an external collaborator
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl From<crate::port::NotifyError> for AppError {
    fn from(err: crate::port::NotifyError) -> Self {
        AppError::UpstreamUnavailable(err.to_string())
    }
}

impl From<crate::port::RenderError> for AppError {
    fn from(err: crate::port::RenderError) -> Self {
        AppError::UpstreamUnavailable(err.to_string())
    }
}

// Note: sqlx::Error conversion is handled in infra-sqlite crate
// by mapping to AppError::Database / AppError::Conflict

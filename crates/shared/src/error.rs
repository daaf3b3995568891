//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// No caller identity was supplied.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Caller is not allowed to act on this ledger.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Journal, ledger, or organization absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed input (bad year, short reason, missing field).
    #[error("Validation error: {0}")]
    Validation(String),

    /// State conflict (duplicate pending unlock request, status mismatch).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A Hub call failed.
    #[error("Hub error: {0}")]
    Upstream(String),

    /// A persistence call failed.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::Upstream(_) => 502,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the stable error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Upstream(_) => "UPSTREAM_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::Unauthorized(String::new()), 401)]
    #[case(AppError::Forbidden(String::new()), 403)]
    #[case(AppError::NotFound(String::new()), 404)]
    #[case(AppError::Validation(String::new()), 400)]
    #[case(AppError::Conflict(String::new()), 409)]
    #[case(AppError::Upstream(String::new()), 502)]
    #[case(AppError::Database(String::new()), 500)]
    #[case(AppError::Internal(String::new()), 500)]
    fn test_error_status_codes(#[case] error: AppError, #[case] status: u16) {
        assert_eq!(error.status_code(), status);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Unauthorized(String::new()).error_code(),
            "UNAUTHORIZED"
        );
        assert_eq!(AppError::NotFound(String::new()).error_code(), "NOT_FOUND");
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(AppError::Conflict(String::new()).error_code(), "CONFLICT");
        assert_eq!(
            AppError::Upstream(String::new()).error_code(),
            "UPSTREAM_ERROR"
        );
        assert_eq!(
            AppError::Database(String::new()).error_code(),
            "DATABASE_ERROR"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Conflict("already pending".into()).to_string(),
            "Conflict: already pending"
        );
        assert_eq!(
            AppError::Upstream("hub timeout".into()).to_string(),
            "Hub error: hub timeout"
        );
    }
}

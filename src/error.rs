use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::db::DatabaseError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(DatabaseError),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Not authorized: {0}")]
    Forbidden(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Time slot not available")]
    SlotUnavailable,

    #[error("Time slot already booked")]
    SlotAlreadyBooked,

    #[error("Availability already exists for this date")]
    DuplicateAvailability,

    #[error("Appointment is already cancelled")]
    AlreadyCancelled,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        match err {
            // Transient infra failures are retryable by the caller.
            DatabaseError::ConnectionError(msg) => AppError::StoreUnavailable(msg),
            other => AppError::Database(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(ref err) => match err {
                DatabaseError::NotFound => (StatusCode::NOT_FOUND, "Resource not found"),
                DatabaseError::Duplicate => (StatusCode::CONFLICT, "Resource already exists"),
                DatabaseError::ConnectionError(_) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "Store unavailable")
                }
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred",
                ),
            },
            AppError::Authentication(_) => (StatusCode::UNAUTHORIZED, "Authentication failed"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "Access denied"),
            AppError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "Invalid input data"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation error"),
            AppError::SlotUnavailable => (StatusCode::BAD_REQUEST, "Time slot not available"),
            AppError::SlotAlreadyBooked => (StatusCode::BAD_REQUEST, "Time slot already booked"),
            AppError::DuplicateAvailability => (
                StatusCode::CONFLICT,
                "Availability already exists for this date",
            ),
            AppError::AlreadyCancelled => {
                (StatusCode::BAD_REQUEST, "Appointment is already cancelled")
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "Resource not found"),
            AppError::StoreUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "Store unavailable")
            }
        };

        let body = Json(json!({
            "error": {
                "message": error_message,
                "details": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_conflicts_map_to_bad_request() {
        assert_eq!(
            AppError::SlotUnavailable.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::SlotAlreadyBooked.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::AlreadyCancelled.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidInput("bad date".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn access_errors_map_to_403_and_404() {
        assert_eq!(
            AppError::Forbidden("not yours".into()).into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::NotFound("appointment".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn infrastructure_errors_are_retryable_or_internal() {
        assert_eq!(
            AppError::StoreUnavailable("pool timed out".into())
                .into_response()
                .status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::Database(DatabaseError::ConnectionError("io".into()))
                .into_response()
                .status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::DuplicateAvailability.into_response().status(),
            StatusCode::CONFLICT
        );
    }
}

//! API error types with structured JSON responses.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::core_state::CoreError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Day full: {0}")]
    DayFull(String),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail),
            ApiError::DayFull(detail) => (StatusCode::CONFLICT, "DAY_FULL", detail),
            ApiError::InvalidTransition(detail) => {
                (StatusCode::CONFLICT, "INVALID_TRANSITION", detail)
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MissingField(_) | CoreError::InvalidField { .. } => {
                ApiError::BadRequest(err.to_string())
            }
            CoreError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            CoreError::DayFull { .. } => ApiError::DayFull(err.to_string()),
            CoreError::InvalidTransition { .. } => ApiError::InvalidTransition(err.to_string()),
            CoreError::Store(e) => ApiError::Internal(e.to_string()),
            CoreError::Mail(e) => ApiError::Internal(e.to_string()),
        }
    }
}

/// Malformed or non-JSON bodies.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use chrono::NaiveDate;

    use crate::db::StoreError;
    use crate::models::AppointmentStatus;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn missing_field_returns_400_naming_it() {
        let response = ApiError::from(CoreError::MissingField("repName")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert!(json["error"]["message"].as_str().unwrap().contains("repName"));
    }

    #[tokio::test]
    async fn not_found_returns_404() {
        let err = CoreError::NotFound {
            entity: "appointment",
            id: "abc".into(),
        };
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn day_full_returns_409() {
        let err = CoreError::DayFull {
            day: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            capacity: 20,
        };
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await["error"]["code"], "DAY_FULL");
    }

    #[tokio::test]
    async fn invalid_transition_returns_409() {
        let err = CoreError::InvalidTransition {
            from: AppointmentStatus::Completed,
            to: AppointmentStatus::Pending,
        };
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            body_json(response).await["error"]["code"],
            "INVALID_TRANSITION"
        );
    }

    #[tokio::test]
    async fn internal_returns_500() {
        let response = ApiError::from(CoreError::Store(StoreError::LockPoisoned)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        // Internal errors hide details from client
        assert_eq!(json["error"]["message"], "An internal error occurred");
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::db::StoreError;
use crate::services::lifecycle::{LifecycleError, REQUIRED_FIELDS};
use crate::services::session::AuthError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation {
        message: String,
        missing: Vec<&'static str>,
    },

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyInState(String),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            missing: vec![],
        }
    }
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::MissingFields { missing } => AppError::Validation {
                message: "Missing required fields".to_string(),
                missing,
            },
            LifecycleError::Invalid(message) => AppError::validation(message),
            LifecycleError::Date(rejection) => AppError::validation(rejection.to_string()),
            e @ LifecycleError::NotFound(id) => {
                tracing::info!(booking_id = id, "booking not found");
                AppError::NotFound(e.to_string())
            }
            e @ LifecycleError::AlreadyInState { id, status } => {
                tracing::info!(
                    booking_id = id,
                    status = status.as_str(),
                    "booking already reviewed"
                );
                AppError::AlreadyInState(e.to_string())
            }
            LifecycleError::Storage(e) => AppError::Storage(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Auth(AuthError::MissingPassword) => StatusCode::BAD_REQUEST,
            AppError::Auth(AuthError::RateLimited) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyInState(_) => StatusCode::BAD_REQUEST,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            AppError::Validation { message, missing } if !missing.is_empty() => serde_json::json!({
                "error": message,
                "required": REQUIRED_FIELDS,
                "missing": missing,
            }),
            AppError::Storage(e) => {
                tracing::error!(error = %e, "storage failure");
                serde_json::json!({ "error": "Internal server error" })
            }
            _ => serde_json::json!({ "error": self.to_string() }),
        };
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingStatus;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_missing_fields_list_required() {
        let err = AppError::from(LifecycleError::MissingFields {
            missing: vec!["phone"],
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Missing required fields");
        assert_eq!(json["required"].as_array().unwrap().len(), 5);
        assert_eq!(json["missing"], serde_json::json!(["phone"]));
    }

    #[tokio::test]
    async fn test_already_in_state_is_bad_request() {
        let err = AppError::from(LifecycleError::AlreadyInState {
            id: 1,
            status: BookingStatus::Confirmed,
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Booking already confirmed");
    }

    #[tokio::test]
    async fn test_unknown_booking_is_not_found() {
        let response = AppError::from(LifecycleError::NotFound(42)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Booking not found");
    }

    #[tokio::test]
    async fn test_storage_detail_is_not_leaked() {
        let err = AppError::from(StoreError::Corrupt {
            id: 7,
            reason: "bad visit_date".to_string(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Internal server error");
    }

    #[test]
    fn test_auth_status_codes() {
        let status = |e: AuthError| AppError::from(e).into_response().status();
        assert_eq!(status(AuthError::MissingPassword), StatusCode::BAD_REQUEST);
        assert_eq!(status(AuthError::RateLimited), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(status(AuthError::InvalidCredentials), StatusCode::UNAUTHORIZED);
        assert_eq!(status(AuthError::Expired), StatusCode::UNAUTHORIZED);
    }
}

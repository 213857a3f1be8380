use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use avia_auth::{AuthError, IdpError};
use avia_clients::ClientError;
use avia_order::OrderError;
use avia_shared::{ErrorDescription, ErrorResponse, ValidationErrorResponse};

#[derive(Debug)]
pub enum AppError {
    Unauthorized(String),
    Forbidden(String),
    Validation {
        message: String,
        errors: Vec<ErrorDescription>,
    },
    NotFound(String),
    Conflict(String),
    Upstream(String),
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation { message, errors } => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ValidationErrorResponse { message, errors }),
                )
                    .into_response();
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Upstream(msg) => {
                tracing::error!("Upstream service failure: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "A backing service is unavailable".to_string(),
                )
            }
            AppError::Internal(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::UnknownFlight(flight_number) => AppError::Validation {
                message: "Invalid purchase request".to_string(),
                errors: vec![ErrorDescription {
                    field: "flightNumber".to_string(),
                    error: format!("flight {} does not exist", flight_number),
                }],
            },
            OrderError::UnknownUser(username) => {
                AppError::NotFound(format!("user {} does not exist", username))
            }
            OrderError::TicketNotFound(uid) => {
                AppError::NotFound(format!("ticket {} not found", uid))
            }
            OrderError::NotOwner(uid) => {
                AppError::Forbidden(format!("ticket {} belongs to another user", uid))
            }
            OrderError::NotCancelable(uid) => {
                AppError::Conflict(format!("ticket {} has already been canceled", uid))
            }
            OrderError::InsufficientBalance => {
                AppError::Conflict("privilege balance is insufficient".to_string())
            }
            OrderError::Upstream(err) => err.into(),
        }
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Conflict(msg) => AppError::Conflict(msg),
            other => AppError::Upstream(other.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        tracing::warn!("bearer token rejected: {}", err);
        AppError::Unauthorized("invalid or expired token".to_string())
    }
}

impl From<IdpError> for AppError {
    fn from(err: IdpError) -> Self {
        match err {
            IdpError::Rejected => AppError::Unauthorized("invalid credentials".to_string()),
            IdpError::Transport(e) => AppError::Upstream(e.to_string()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

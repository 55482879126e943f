use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::MessageResponse;
use crate::services::PostError;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    /// Login failure. Never says whether the email or the password was wrong.
    InvalidCredentials,

    /// A mutation failed and was rolled back. `message` goes to the client,
    /// `cause` only to the log.
    OperationFailed { message: String, cause: String },

    ServiceUnavailable(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::InvalidCredentials => write!(f, "Incorrect credentials"),
            Self::OperationFailed { message, cause } => write!(f, "{message}: {cause}"),
            Self::ServiceUnavailable(msg) => write!(f, "Service unavailable: {msg}"),
            Self::InternalError(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::InvalidCredentials => {
                (StatusCode::BAD_REQUEST, "Incorrect credentials".to_string())
            }
            Self::OperationFailed { message, cause } => {
                tracing::warn!("{message}: {cause}");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            Self::ServiceUnavailable(msg) => {
                tracing::warn!("Service unavailable: {msg}");
                (StatusCode::SERVICE_UNAVAILABLE, msg)
            }
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, Json(MessageResponse { message })).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}

impl ApiError {
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        Self::NotFound(format!("{resource} {id} not found"))
    }

    pub fn failed(message: impl Into<String>, cause: impl fmt::Display) -> Self {
        Self::OperationFailed {
            message: message.into(),
            cause: cause.to_string(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }

    /// Maps a post-service error: a missing post is a 404, anything else is
    /// reported as `message` with a 500.
    pub fn from_post_error(err: PostError, message: &str) -> Self {
        match err {
            PostError::NotFound(id) => Self::not_found("Post", id),
            other => Self::failed(message, other),
        }
    }
}

//! Error types of the HTTP layer.
//!
//! # Invariants
//! - Error bodies are plain text; there are no structured error codes.
//! - Client mistakes map to `400`, everything else to `500`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{error, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use toodo_core::db::DbError;
use toodo_core::{RepoError, ToodoServiceError};

/// Request-level failure rendered as a plain-text response.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(message) | Self::Internal(message) => write!(f, "{message}"),
        }
    }
}

impl Error for ApiError {}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        Self::Internal(value.to_string())
    }
}

impl From<ToodoServiceError> for ApiError {
    fn from(value: ToodoServiceError) -> Self {
        match value {
            ToodoServiceError::InvalidItem { .. } => Self::BadRequest(value.to_string()),
            ToodoServiceError::Repo(err) => err.into(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        Self::BadRequest(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::BadRequest(message) => warn!(
                "event=http_error module=server status={} error={}",
                status.as_u16(),
                message
            ),
            Self::Internal(message) => error!(
                "event=http_error module=server status={} error={}",
                status.as_u16(),
                message
            ),
        }
        (status, self.to_string()).into_response()
    }
}

/// Process-level startup/serve failure.
#[derive(Debug)]
pub enum ServerError {
    Db(DbError),
    Bind(std::io::Error),
    Serve(std::io::Error),
}

impl Display for ServerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "failed to open database: {err}"),
            Self::Bind(err) => write!(f, "failed to bind listener: {err}"),
            Self::Serve(err) => write!(f, "server stopped with error: {err}"),
        }
    }
}

impl Error for ServerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Bind(err) | Self::Serve(err) => Some(err),
        }
    }
}

impl From<DbError> for ServerError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

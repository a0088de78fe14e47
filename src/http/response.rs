//! Request-time errors and their responses.
//!
//! # Responsibilities
//! - Name every way a request can fail after routing
//! - Map each failure to a status code and a short body
//!
//! # Design Decisions
//! - 401 and 400 bodies are fixed strings; they never say which field failed
//! - 404 is an HTML page naming the requested path

use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};

use crate::atom::CodecError;
use crate::blog::RepositoryError;
use crate::http::views;

pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Request-time failure.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("authentication failed")]
    AuthenticationFailed,
    #[error("malformed request body: {0}")]
    MalformedRequestBody(String),
    #[error("not found")]
    NotFound,
    #[error("repository rejected the entry: {0}")]
    RepositorySaveRejected(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<CodecError> for AppError {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::Write(msg) => AppError::Internal(msg),
            other => AppError::MalformedRequestBody(other.to_string()),
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Rejected(reason) => AppError::RepositorySaveRejected(reason),
            RepositoryError::NotFound => AppError::NotFound,
            RepositoryError::Storage(msg) => AppError::Internal(msg),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            AppError::MalformedRequestBody(_) | AppError::RepositorySaveRejected(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Render the error for a request to `request_path`.
    pub fn respond(self, request_path: &str, site_title: &str) -> Response {
        let status = self.status();
        match self {
            AppError::AuthenticationFailed => (status, "Authorization Required").into_response(),
            AppError::MalformedRequestBody(_) | AppError::RepositorySaveRejected(_) => {
                (status, "Bad Request").into_response()
            }
            AppError::NotFound => (
                status,
                [(header::CONTENT_TYPE, HTML_CONTENT_TYPE)],
                Html(views::not_found(site_title, request_path)),
            )
                .into_response(),
            AppError::Internal(_) => (status, "Internal Server Error").into_response(),
        }
    }
}

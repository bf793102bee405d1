/*
 * Responsibility
 * - ApiError for the whole app
 * - IntoResponse: HTTP status + JSON error body
 *   - auth failures: {"success": false, "error": 401, "message": {"code": ..., "description": ...}}
 *   - everything else: {"success": false, "error": 404, "message": "resource not found"}
 * - Convert repo / extractor / auth errors into one surface
 */
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::AuthError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: u16,
    pub message: ErrorMessage,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ErrorMessage {
    Text(&'static str),
    Auth {
        code: &'static str,
        description: String,
    },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("bad request")]
    BadRequest,
    #[error("resource not found")]
    NotFound,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("request timeout")]
    Timeout,
    #[error("payload too large")]
    PayloadTooLarge,
    #[error("unprocessable")]
    Unprocessable,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Auth(e) => e.status(),
            AppError::BadRequest => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            AppError::Auth(e) => ErrorMessage::Auth {
                code: e.code(),
                description: e.to_string(),
            },
            AppError::BadRequest => ErrorMessage::Text("bad request"),
            AppError::NotFound => ErrorMessage::Text("resource not found"),
            AppError::MethodNotAllowed => ErrorMessage::Text("method not allowed"),
            AppError::Timeout => ErrorMessage::Text("request timeout"),
            AppError::PayloadTooLarge => ErrorMessage::Text("payload too large"),
            AppError::Unprocessable => ErrorMessage::Text("unprocessable"),
            AppError::Internal => ErrorMessage::Text("internal server error"),
        };

        let body = ErrorResponse {
            success: false,
            error: status.as_u16(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            // unique title clash
            RepoError::Conflict => AppError::Unprocessable,
            RepoError::Db(_) | RepoError::CorruptRecipe(_) => {
                tracing::error!(error = ?e, "drink store failure");
                AppError::Internal
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        match e {
            // well-formed JSON, wrong shape
            JsonRejection::JsonDataError(_) => AppError::Unprocessable,
            // body over the router-wide limit
            JsonRejection::BytesRejection(ref r) if r.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                AppError::PayloadTooLarge
            }
            _ => AppError::BadRequest,
        }
    }
}

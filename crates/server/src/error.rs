//! HTTP error mapping
//!
//! Every failure on the request path becomes an [`ApiError`], rendered as
//! `{"error": "<message>"}` with a 400 or 500 status. Details stay in the
//! server log.

use crate::payload::PayloadError;
use crate::routes::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Client input error (400)
    BadRequest(String),
    /// Prediction failure (500)
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) | ApiError::Internal(msg) => msg,
        }
    }
}

impl From<PayloadError> for ApiError {
    fn from(err: PayloadError) -> Self {
        let message = match &err {
            PayloadError::InvalidJson(_) => "Invalid JSON body.".to_string(),
            PayloadError::Table(_) => "Could not parse payload into numeric DataFrame.".to_string(),
            PayloadError::NotAnObject
            | PayloadError::MissingKeys(_)
            | PayloadError::UnexpectedKeys(_) => err.to_string(),
        };
        ApiError::BadRequest(message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: match self {
                ApiError::BadRequest(msg) | ApiError::Internal(msg) => msg,
            },
        };
        (status, Json(body)).into_response()
    }
}

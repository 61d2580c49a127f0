//! HTTP-facing error type shared by all services.

use crate::pdf::PdfError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The request was well formed but the document could not be processed,
    /// e.g. a form that cannot be flattened.
    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse<'a> {
    error: &'a str,
    message: String,
}

impl From<PdfError> for AppError {
    fn from(e: PdfError) -> Self {
        match e {
            PdfError::Load(_) | PdfError::Source(_) => AppError::BadRequest(e.to_string()),
            PdfError::Flatten(_) | PdfError::Structure(_) => AppError::Unprocessable(e.to_string()),
            PdfError::Save(_) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<actix_web::error::BlockingError> for AppError {
    fn from(e: actix_web::error::BlockingError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl AppError {
    fn kind(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "bad_request",
            AppError::NotFound(_) => "not_found",
            AppError::Unprocessable(_) => "unprocessable",
            AppError::Database(_) => "database_error",
            AppError::Io(_) => "io_error",
            AppError::Internal(_) => "internal_error",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Database(_) | AppError::Io(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status.is_server_error() {
            error!("{}", self);
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(status).json(ErrorResponse {
            error: self.kind(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn pdf_errors_map_to_status() {
        let flatten: AppError = PdfError::Flatten("bare".into()).into();
        assert_eq!(flatten.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let save: AppError = PdfError::Save("disk full".into()).into();
        assert_eq!(save.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let missing = AppError::NotFound("template x".into());
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn body_is_json() {
        let response = AppError::BadRequest("no file".into()).error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "bad_request");
        assert_eq!(json["message"], "Bad request: no file");
    }

    #[actix_web::test]
    async fn internal_details_are_hidden() {
        let response = AppError::Internal("secret path".into()).error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "An internal error occurred");
    }
}

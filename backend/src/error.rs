//! HTTP-facing error type.
//!
//! Every handler failure is rendered as `{"error": .., "code": .., "details": [..]}`.
//! Infrastructure failures are logged with their cause and answered with a
//! generic message.

use crate::db::StoreError;
use crate::duplicates::DuplicateError;
use crate::export::ExportError;
use crate::import::sheet::SheetError;
use crate::import::ImportError;
use crate::validation::Validation;
use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use log::error;
use serde::Serialize;
use std::fmt::Display;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Validation failed")]
    Validation(Vec<String>),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Timeout(String),

    #[error("{message}")]
    Internal {
        message: &'static str,
        code: &'static str,
    },
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a [String]>,
}

impl ApiError {
    /// Logs `cause` and hides it behind `message`.
    pub fn internal(cause: impl Display, message: &'static str, code: &'static str) -> Self {
        error!("{message}: {cause}");
        ApiError::Internal { message, code }
    }

    pub fn code(&self) -> &str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Validation(_) => "VALIDATION_FAILED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Timeout(_) => "TIMEOUT",
            ApiError::Internal { code, .. } => *code,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let details = match self {
            ApiError::Validation(errors) => Some(errors.as_slice()),
            _ => None,
        };
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
            code: self.code(),
            details,
        })
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(message) => ApiError::NotFound(message),
            StoreError::Constraint(message) => ApiError::BadRequest(message),
            other => ApiError::internal(other, "Internal server error", "INTERNAL_ERROR"),
        }
    }
}

impl From<Validation> for ApiError {
    fn from(verdict: Validation) -> Self {
        ApiError::Validation(verdict.errors)
    }
}

impl From<SheetError> for ApiError {
    fn from(err: SheetError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Sheet(sheet) => sheet.into(),
            ImportError::DeadlineExceeded { .. } => ApiError::Timeout(err.to_string()),
            other => ApiError::internal(other, "Failed to import Excel file", "IMPORT_FAILED"),
        }
    }
}

impl From<DuplicateError> for ApiError {
    fn from(err: DuplicateError) -> Self {
        match err {
            DuplicateError::NoIds | DuplicateError::UnknownPolicy(_) => {
                ApiError::BadRequest(err.to_string())
            }
            DuplicateError::Store(store) => ApiError::internal(
                store,
                "Failed to process duplicates",
                "DUPLICATE_OPERATION_FAILED",
            ),
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::UnknownFormat(_) => ApiError::BadRequest(err.to_string()),
            other => ApiError::internal(other, "Failed to export places", "EXPORT_FAILED"),
        }
    }
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(format!("Invalid JSON body: {err}")).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(format!("Invalid query string: {err}")).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn validation_errors_carry_details() {
        let (status, json) = body(ApiError::Validation(vec!["title is required".into()])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "VALIDATION_FAILED");
        assert_eq!(json["details"][0], "title is required");
    }

    #[actix_web::test]
    async fn infrastructure_errors_are_generic() {
        let err: ApiError = StoreError::Task("worker panicked".into()).into();
        let (status, json) = body(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Internal server error");
        assert!(json.get("details").is_none());
    }

    #[test]
    fn store_errors_map_to_client_statuses() {
        let missing: ApiError = StoreError::NotFound("Place not found".into()).into();
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
        let taken: ApiError = StoreError::Constraint("UNIQUE constraint failed".into()).into();
        assert_eq!(taken.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn import_deadline_is_a_timeout() {
        let err: ApiError = ImportError::DeadlineExceeded {
            batch: 3,
            committed: Default::default(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert!(err.to_string().contains("0 rows were committed"));
    }
}

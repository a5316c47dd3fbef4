//! Error types for persona-svc
//!
//! Service-level taxonomy:
//! - validation: malformed or out-of-range input, checked before any builder runs
//! - not found: the requested identity is absent
//! - no fields to update: raised by the assignment builder
//! - classifier: an external classification lookup failed
//! - repository: opaque store failure

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::classifiers::ClassifierError;
use crate::query::NoFieldsToUpdate;

/// Input validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Body is not valid JSON for the expected request shape
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("invalid person id: {0}")]
    InvalidId(String),

    #[error("{field} cannot be negative (got {value})")]
    NegativeValue { field: &'static str, value: i64 },

    #[error("{field} is out of range (got {value})")]
    OutOfRange { field: &'static str, value: i64 },

    #[error("gender must be either 'male' or 'female' (got '{0}')")]
    InvalidGender(String),

    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}

/// Service error
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("person not found: {0}")]
    NotFound(Uuid),

    #[error(transparent)]
    NoFieldsToUpdate(#[from] NoFieldsToUpdate),

    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("Repository error: {0}")]
    Repository(#[from] persona_common::Error),
}

impl Error {
    /// True for errors caused by the caller's input
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::NotFound(_) | Error::NoFieldsToUpdate(_)
        )
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            Error::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Error::NoFieldsToUpdate(_) => (StatusCode::BAD_REQUEST, "NO_FIELDS_TO_UPDATE"),
            Error::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Error::Classifier(_) => (StatusCode::BAD_GATEWAY, "CLASSIFIER_ERROR"),
            Error::Repository(_) => (StatusCode::INTERNAL_SERVER_ERROR, "REPOSITORY_ERROR"),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for service operations and API handlers
pub type Result<T> = std::result::Result<T, Error>;

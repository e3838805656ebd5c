//! HTTP error mapping.
//!
//! Every failure of a request handler ends up as an [`ApiError`]:
//!
//! - validation failures become `422` with one entry per violated field
//! - unreadable bodies keep the status chosen by axum's JSON extractor
//! - storage failures become `500` carrying the error text

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{error, warn};

pub use pintar_core::{
    error::{StorageError, StorageResult},
    validate::{FieldViolation, ValidationError},
};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Body(#[from] JsonRejection),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Body(rejection) => rejection.status(),
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// One entry of a validation error response: where, what and which rule.
fn violation_detail(violation: &FieldViolation) -> Value {
    let mut loc = vec![json!("body")];
    if !violation.field.is_empty() {
        loc.push(json!(violation.field));
    }
    if let Some(index) = violation.index {
        loc.push(json!(index));
    }

    json!({
        "loc": loc,
        "msg": violation.constraint.to_string(),
        "type": violation.constraint.kind(),
    })
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let detail = match &self {
            ApiError::Validation(err) => {
                warn!(%err, "rejected request body");
                Value::Array(err.violations.iter().map(violation_detail).collect())
            }
            ApiError::Body(rejection) => {
                warn!(%rejection, "unreadable request body");
                Value::String(rejection.body_text())
            }
            ApiError::Storage(err) => {
                error!(%err, "storage operation failed");
                Value::String(err.to_string())
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

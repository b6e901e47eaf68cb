//! JSON extractors that run `validator` rules
//!
//! - `ValidatedJson<T>` rejects an invalid body with a 422 envelope whose
//!   `data` holds the field errors. Used by the auth endpoints.
//! - `CheckedJson<T>` never rejects on validation. It hands the value and
//!   its field errors to the handler, which decides when to re-render.
//!   Settings handlers use it so the access check still runs first.
//!
//! Malformed JSON is a 400 envelope for both.

use std::collections::BTreeMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::ApiResponse;

/// Field name → messages
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Flatten `validator` output into messages keyed by field. A rule without
/// a message reports its code.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

fn validate<T: Validate>(value: &T) -> FieldErrors {
    match value.validate() {
        Ok(()) => FieldErrors::new(),
        Err(errors) => field_errors(&errors),
    }
}

/// Deserialized and valid request body.
pub struct ValidatedJson<T>(pub T);

/// Deserialized request body plus whatever its rules reported.
/// An empty map means the body is valid.
pub struct CheckedJson<T>(pub T, pub FieldErrors);

pub enum JsonBodyRejection {
    Malformed(JsonRejection),
    Invalid(FieldErrors),
}

impl IntoResponse for JsonBodyRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Malformed(rejection) => {
                let body = ApiResponse::<()>::error(format!("Invalid JSON: {}", rejection));
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Self::Invalid(fields) => {
                let body = ApiResponse {
                    success: false,
                    data: Some(fields),
                    error: Some("Validation failed".to_string()),
                };
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
        }
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = JsonBodyRejection;

    async fn from_request(
        req: axum::extract::Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let CheckedJson(value, errors) = CheckedJson::<T>::from_request(req, state).await?;
        if errors.is_empty() {
            Ok(ValidatedJson(value))
        } else {
            Err(JsonBodyRejection::Invalid(errors))
        }
    }
}

impl<S, T> FromRequest<S> for CheckedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = JsonBodyRejection;

    async fn from_request(
        req: axum::extract::Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(JsonBodyRejection::Malformed)?;
        let errors = validate(&value);
        Ok(CheckedJson(value, errors))
    }
}

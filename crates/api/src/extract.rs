//! Body and query-string extractors.
//!
//! Both decode with [`serde_path_to_error`] so a type mismatch names the
//! field it happened in, and both reject with [`AppError::Malformed`], which
//! renders as the same 422 `validation_errors` envelope that `validator`
//! failures use.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// JSON request body, e.g. `JsonBody(input): JsonBody<UpdateThread>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<serde_json::Value>::from_request(req, state)
            .await
            .map_err(unreadable_body)?;

        serde_path_to_error::deserialize(value)
            .map(JsonBody)
            .map_err(|err| malformed(&err, err.inner(), "body"))
    }
}

/// Query-string parameters, e.g. `QueryParams(params): QueryParams<ListParams>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();
        let deserializer =
            serde_urlencoded::Deserializer::new(url::form_urlencoded::parse(query.as_bytes()));

        serde_path_to_error::deserialize(deserializer)
            .map(QueryParams)
            .map_err(|err| malformed(&err, err.inner(), "query"))
    }
}

/// The body was not JSON at all (wrong content type, syntax error, I/O).
fn unreadable_body(rejection: JsonRejection) -> AppError {
    AppError::Malformed {
        field: "body".to_string(),
        message: rejection.body_text(),
    }
}

/// Name the field a decoding error happened in, falling back to `whole`.
fn malformed<E>(
    err: &serde_path_to_error::Error<E>,
    inner: &impl std::fmt::Display,
    whole: &str,
) -> AppError {
    let message = inner.to_string();
    let path = err.path().to_string();
    let field = if path == "." {
        missing_field(&message).unwrap_or(whole).to_string()
    } else {
        path
    };
    AppError::Malformed { field, message }
}

/// `"missing field `title`"` names the field only in its message.
fn missing_field(message: &str) -> Option<&str> {
    message.strip_prefix("missing field `")?.split('`').next()
}

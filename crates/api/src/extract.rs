//! Request extractors whose rejections use the JSON error format.
//!
//! axum's own `Json`, `Path` and `Multipart` reject with plain-text bodies.
//! These wrappers route every rejection through [`AppError`], and turn JSON
//! type errors into per-field `VALIDATION_ERROR` responses.

use axum::extract::{FromRequest, FromRequestParts, Multipart, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use bookshelf_core::error::{CoreError, FieldErrors};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::AppError;

const REQUIRED: &str = "This field is required.";

/// JSON request body.
///
/// A body that is valid JSON but does not fit `T` is reported per field:
/// each top-level key whose value alone fails to deserialize gets the
/// deserializer's message, and a missing required field gets
/// "This field is required.".
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state).await?;

        match T::deserialize(&value) {
            Ok(payload) => Ok(ApiJson(payload)),
            Err(err) => Err(data_error::<T>(&value, err)),
        }
    }
}

/// Path parameters.
#[derive(Debug, Clone, Copy)]
pub struct ApiPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(ApiPath(value))
    }
}

/// `multipart/form-data` request body.
pub struct ApiMultipart(pub Multipart);

impl<S> FromRequest<S> for ApiMultipart
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Ok(ApiMultipart(Multipart::from_request(req, state).await?))
    }
}

fn data_error<T: DeserializeOwned>(value: &Value, err: serde_json::Error) -> AppError {
    let mut fields = FieldErrors::new();

    if let Some(field) = missing_field(&err) {
        fields.insert(field, vec![REQUIRED.to_string()]);
    }

    // Deserializing one key at a time pins a type error to its field.
    // Other required fields are missing then, which is not that key's fault.
    if let Value::Object(map) = value {
        for (key, item) in map {
            let single = Value::Object(Map::from_iter([(key.clone(), item.clone())]));
            if let Err(field_err) = T::deserialize(&single) {
                if missing_field(&field_err).is_none() {
                    fields.insert(key.clone(), vec![field_err.to_string()]);
                }
            }
        }
    }

    if fields.is_empty() {
        AppError::BadRequest(err.to_string())
    } else {
        AppError::Core(CoreError::InvalidFields(fields))
    }
}

/// Field name of a serde "missing field `name`" error.
fn missing_field(err: &serde_json::Error) -> Option<String> {
    let rest = err.to_string().strip_prefix("missing field `")?.to_string();
    rest.split('`').next().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Rename {
        name: String,
    }

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Partial {
        title: Option<String>,
        count: Option<u32>,
    }

    fn reject<T: DeserializeOwned + std::fmt::Debug>(value: Value) -> AppError {
        let err = T::deserialize(&value).unwrap_err();
        data_error::<T>(&value, err)
    }

    #[test]
    fn type_errors_are_reported_per_field() {
        let err = reject::<Partial>(json!({ "title": 5, "count": "many" }));
        assert_matches!(err, AppError::Core(CoreError::InvalidFields(ref fields)) if {
            fields.len() == 2
                && fields["title"][0].starts_with("invalid type")
                && fields["count"][0].starts_with("invalid type")
        });
    }

    #[test]
    fn missing_required_field_is_reported() {
        let err = reject::<Rename>(json!({ "other": 1 }));
        assert_matches!(err, AppError::Core(CoreError::InvalidFields(ref fields)) if {
            fields.len() == 1 && fields["name"] == vec![REQUIRED.to_string()]
        });
    }

    #[test]
    fn bad_value_next_to_missing_required_field() {
        let err = reject::<Rename>(json!({ "name": ["x"] }));
        assert_matches!(err, AppError::Core(CoreError::InvalidFields(ref fields)) if {
            fields["name"][0].starts_with("invalid type")
        });
    }

    #[test]
    fn non_object_body_is_a_bad_request() {
        let err = reject::<Partial>(json!([1, 2]));
        assert_matches!(err, AppError::BadRequest(_));
    }
}

//! # Request Extraction & Validation
//!
//! JSON request bodies pass through two gates: serde deserialization
//! (malformed body, 400) and domain validation via [`Validate`]
//! (well-formed but invalid, 422 with a
//! [`docack_core::ValidationError`]).

use axum::extract::rejection::JsonRejection;
use axum::Json;
use docack_core::ValidationError;

use crate::error::AppError;

/// Domain validation for request DTOs, beyond what serde checks.
pub trait Validate {
    /// Check the request against domain rules.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Extract a JSON body and validate it.
///
/// Deserialization failures map to [`AppError::BadRequest`], validation
/// failures to [`AppError::Validation`].
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let Json(value) = result.map_err(|err| AppError::BadRequest(err.body_text()))?;
    value.validate()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::Request;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct TitledUpload {
        title: String,
    }

    impl Validate for TitledUpload {
        fn validate(&self) -> Result<(), ValidationError> {
            if self.title.trim().is_empty() {
                return Err(ValidationError::MissingField("title"));
            }
            Ok(())
        }
    }

    async fn parse(body: &str) -> Result<Json<TitledUpload>, JsonRejection> {
        let request = Request::builder()
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        Json::from_request(request, &()).await
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let result = extract_validated_json(parse("{not json").await);
        assert!(
            matches!(result, Err(AppError::BadRequest(_))),
            "got: {result:?}"
        );
    }

    #[tokio::test]
    async fn well_formed_but_invalid_body_is_validation_error() {
        let result = extract_validated_json(parse(r#"{"title": "   "}"#).await);
        match result {
            Err(AppError::Validation(msg)) => assert!(msg.contains("title"), "got: {msg}"),
            other => panic!("expected Validation, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn valid_body_passes_through() {
        let upload = extract_validated_json(parse(r#"{"title": "Handbook"}"#).await).unwrap();
        assert_eq!(upload.title, "Handbook");
    }
}

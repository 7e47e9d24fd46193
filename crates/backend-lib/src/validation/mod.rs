// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Request decoding and required-field checks.
//!
//! Every handler decodes its body through [`Decoded`], which picks a form or
//! JSON decoder from the `Content-Type` header. Request forms then declare
//! their required fields through [`RequiredFields`].

use accountgate_common::{LoginForm, ResetPasswordForm};
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, HeaderMap},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

/// Content types decoded as URL-encoded forms
const FORM_CONTENT_TYPES: [&str; 2] = ["application/x-www-form-urlencoded", "application/form-data"];

/// Possible validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Undecodable request body: {0}")]
    Undecodable(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Whether the request declares a form body
pub fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::trim)
        .is_some_and(|mime| {
            FORM_CONTENT_TYPES
                .iter()
                .any(|form| mime.eq_ignore_ascii_case(form))
        })
}

/// Decode a body as a URL-encoded form or as JSON
pub fn decode_body<T: DeserializeOwned>(form: bool, body: &[u8]) -> ValidationResult<T> {
    if form {
        let fields: Map<String, Value> = url::form_urlencoded::parse(body)
            .map(|(key, value)| (key.into_owned(), Value::String(value.into_owned())))
            .collect();
        serde_json::from_value(Value::Object(fields))
            .map_err(|e| ValidationError::Undecodable(e.to_string()))
    } else {
        serde_json::from_slice(body).map_err(|e| ValidationError::Undecodable(e.to_string()))
    }
}

/// Extractor applying the shared decode contract
#[derive(Debug, Clone)]
pub struct Decoded<T>(pub T);

impl<S, T> FromRequest<S> for Decoded<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ValidationError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let form = is_form(req.headers());
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| ValidationError::Undecodable(e.body_text()))?;
        decode_body(form, &body).map(Decoded)
    }
}

/// A request shape with an explicit set of required fields
pub trait RequiredFields {
    /// The request with every required field present
    type Checked;

    fn require(self) -> ValidationResult<Self::Checked>;
}

fn present(value: Option<String>, field: &'static str) -> ValidationResult<String> {
    value.ok_or(ValidationError::MissingField(field))
}

/// Checked login request
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

impl RequiredFields for LoginForm {
    type Checked = LoginRequest;

    fn require(self) -> ValidationResult<LoginRequest> {
        Ok(LoginRequest {
            identifier: present(self.username, "username")?,
            password: present(self.password, "password")?,
        })
    }
}

/// Checked password reset request
#[derive(Debug, Clone)]
pub struct ResetPasswordRequest {
    pub password: String,
    pub token: String,
}

impl RequiredFields for ResetPasswordForm {
    type Checked = ResetPasswordRequest;

    fn require(self) -> ValidationResult<ResetPasswordRequest> {
        Ok(ResetPasswordRequest {
            password: present(self.password, "password")?,
            token: present(self.token, "token")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        headers
    }

    #[test]
    fn test_form_detection() {
        assert!(is_form(&headers("application/x-www-form-urlencoded")));
        assert!(is_form(&headers("Application/X-WWW-Form-Urlencoded; charset=utf-8")));
        assert!(is_form(&headers("application/form-data")));
        assert!(!is_form(&headers("application/json")));
        assert!(!is_form(&HeaderMap::new()));
    }

    #[test]
    fn test_decode_form() {
        let form: LoginForm =
            decode_body(true, b"username=alice&password=p%40ss+word&extra=1").unwrap();
        assert_eq!(form.username.as_deref(), Some("alice"));
        assert_eq!(form.password.as_deref(), Some("p@ss word"));
    }

    #[test]
    fn test_decode_json() {
        let form: ResetPasswordForm =
            decode_body(false, br#"{"password":"new","token":"t"}"#).unwrap();
        let checked = form.require().unwrap();
        assert_eq!(checked.password, "new");
        assert_eq!(checked.token, "t");
    }

    #[test]
    fn test_undecodable_body() {
        assert!(matches!(
            decode_body::<LoginForm>(false, b"username=alice"),
            Err(ValidationError::Undecodable(_))
        ));
        assert!(matches!(
            decode_body::<LoginForm>(false, br#"{"username": 42}"#),
            Err(ValidationError::Undecodable(_))
        ));
    }

    #[test]
    fn test_required_fields() {
        let missing_password = LoginForm {
            username: Some("alice".to_string()),
            password: None,
        };
        assert!(matches!(
            missing_password.require(),
            Err(ValidationError::MissingField("password"))
        ));

        let missing_token = ResetPasswordForm {
            password: Some("pw".to_string()),
            token: None,
        };
        assert!(matches!(
            missing_token.require(),
            Err(ValidationError::MissingField("token"))
        ));
    }
}

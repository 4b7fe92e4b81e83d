use std::fmt;

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use crate::domain::taxonomy::{ApiError, ApiErrorKind, ErrorTaxonomy};

#[derive(Clone, PartialEq, Eq, Hash)]
/// Bearer token issued by `auth/login` / `auth/refresh`.
///
/// The token is a JWT. The library never verifies its signature (TLS already
/// authenticates the upstream); it only reads the `exp` claim so callers can refresh
/// before the upstream starts rejecting requests.
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Whether the `exp` claim lies in the past.
    ///
    /// A token without `exp` never expires. A value that cannot be decoded as a JWT at
    /// all is reported as [`ApiErrorKind::BearerTokenInvalid`], not as expired.
    pub fn is_expired(&self) -> Result<bool, ApiError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_aud = false;
        validation.leeway = 0;
        let no_required_claims: &[&str] = &[];
        validation.set_required_spec_claims(no_required_claims);

        match decode::<serde_json::Value>(&self.0, &DecodingKey::from_secret(&[]), &validation) {
            Ok(_) => Ok(false),
            Err(err) if matches!(err.kind(), JwtErrorKind::ExpiredSignature) => Ok(true),
            Err(err) => Err(ErrorTaxonomy::builtin()
                .error(ApiErrorKind::BearerTokenInvalid, format!("cannot decode token: {err}"))),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visible: String = self.0.chars().take(8).collect();
        write!(f, "Token({visible}...)")
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

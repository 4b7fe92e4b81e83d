//! Typed error kinds reported by the Eskiz API and the rule table that maps raw
//! upstream error text onto them.
//!
//! Upstream failures carry a fixed uppercase code (for example `AUTH_CREDS_INVALID`)
//! surrounded by free-form context text, so detection is a case-insensitive substring
//! scan over an ordered rule list. The first matching rule wins; text that matches no
//! rule degrades to [`ApiErrorKind::Generic`] carrying the original description.

use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use crate::domain::validation::ValidationError;

static BUILTIN: LazyLock<ErrorTaxonomy> = LazyLock::new(|| {
    let mut taxonomy = ErrorTaxonomy::empty();
    for kind in [
        ApiErrorKind::AuthCredsInvalid,
        ApiErrorKind::BearerTokenInvalid,
        ApiErrorKind::FieldsFormatInvalid,
        ApiErrorKind::UnknownMethod,
    ] {
        taxonomy.rules.push(ErrorRule::for_builtin(kind));
    }
    taxonomy
});

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Error family reported by the upstream.
pub enum ApiErrorKind {
    /// Catch-all for failures no registered rule recognizes. Never matched against.
    Generic,
    /// Login e-mail/password pair rejected, or the request was not authenticated.
    AuthCredsInvalid,
    /// Bearer token is malformed, revoked or expired.
    BearerTokenInvalid,
    /// One of the submitted fields has the wrong format.
    FieldsFormatInvalid,
    /// The endpoint/method combination is unknown to the upstream.
    UnknownMethod,
    /// Kind registered by the integrator through [`ErrorTaxonomy::register`].
    Custom(Cow<'static, str>),
}

impl ApiErrorKind {
    /// Upstream code recognized for this kind by default.
    pub fn default_match(&self) -> Option<&str> {
        match self {
            Self::Generic => None,
            Self::AuthCredsInvalid => Some("AUTH_CREDS_INVALID"),
            Self::BearerTokenInvalid => Some("BEARER_TOKEN_INVALID"),
            Self::FieldsFormatInvalid => Some("FIELDS_FORMAT_INVALID"),
            Self::UnknownMethod => Some("UNKNOWN_METHOD"),
            Self::Custom(_) => None,
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generic => f.write_str("generic"),
            Self::Custom(name) => f.write_str(name),
            other => f.write_str(other.default_match().unwrap_or_default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One entry of the detection table: a kind, the uppercase code it matches, and the
/// human-readable message attached to errors of that kind.
pub struct ErrorRule {
    kind: ApiErrorKind,
    match_token: String,
    message: Option<String>,
}

impl ErrorRule {
    fn for_builtin(kind: ApiErrorKind) -> Self {
        let match_token = kind.default_match().unwrap_or_default().to_owned();
        Self {
            kind,
            match_token,
            message: None,
        }
    }

    pub fn kind(&self) -> &ApiErrorKind {
        &self.kind
    }

    /// Uppercase substring this rule looks for.
    pub fn match_token(&self) -> &str {
        &self.match_token
    }

    /// Message attached to errors of this kind.
    ///
    /// Unless set explicitly it is derived from the match token: underscores become
    /// spaces, the first letter is capitalized, the rest lowercased, and `!` appended
    /// (`AUTH_CREDS_INVALID` -> `Auth creds invalid!`).
    pub fn message(&self) -> Cow<'_, str> {
        match &self.message {
            Some(message) => Cow::Borrowed(message),
            None => Cow::Owned(message_from_token(&self.match_token)),
        }
    }
}

fn message_from_token(token: &str) -> String {
    let spaced = token.replace('_', " ").to_lowercase();
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => format!("{}{}!", first.to_uppercase(), chars.as_str()),
        None => "!".to_owned(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Ordered rule table used to turn upstream error text into an [`ApiError`].
///
/// Insertion order is match priority. [`ErrorTaxonomy::default`] yields the built-in
/// table (`AUTH_CREDS_INVALID`, `BEARER_TOKEN_INVALID`, `FIELDS_FORMAT_INVALID`,
/// `UNKNOWN_METHOD`); integrators may append their own codes.
pub struct ErrorTaxonomy {
    rules: Vec<ErrorRule>,
}

impl Default for ErrorTaxonomy {
    fn default() -> Self {
        BUILTIN.clone()
    }
}

impl ErrorTaxonomy {
    /// A table with no rules; every description resolves to [`ApiErrorKind::Generic`].
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// The shared built-in table.
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Append a rule matching `match_token` (case-insensitive) to `kind`.
    ///
    /// Each kind may be registered once, and [`ApiErrorKind::Generic`] never, since it
    /// is the fallback.
    pub fn register(
        &mut self,
        kind: ApiErrorKind,
        match_token: impl Into<String>,
    ) -> Result<&mut Self, ValidationError> {
        self.push_rule(kind, match_token.into(), None)
    }

    /// Same as [`ErrorTaxonomy::register`] with an explicit message instead of the
    /// derived one.
    pub fn register_with_message(
        &mut self,
        kind: ApiErrorKind,
        match_token: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<&mut Self, ValidationError> {
        self.push_rule(kind, match_token.into(), Some(message.into()))
    }

    fn push_rule(
        &mut self,
        kind: ApiErrorKind,
        match_token: String,
        message: Option<String>,
    ) -> Result<&mut Self, ValidationError> {
        let reject = |reason| ValidationError::InvalidErrorRule {
            kind: kind.to_string(),
            reason,
        };
        if kind == ApiErrorKind::Generic {
            return Err(reject("the generic kind is the fallback"));
        }
        let match_token = match_token.trim().to_uppercase();
        if match_token.is_empty() {
            return Err(reject("match token must not be empty"));
        }
        if self.rules.iter().any(|rule| rule.kind == kind) {
            return Err(reject("kind is already registered"));
        }

        self.rules.push(ErrorRule {
            kind,
            match_token,
            message,
        });
        Ok(self)
    }

    /// Registered rules in match-priority order.
    pub fn rules(&self) -> &[ErrorRule] {
        &self.rules
    }

    /// Rule registered for `kind`, if any.
    pub fn rule(&self, kind: &ApiErrorKind) -> Option<&ErrorRule> {
        self.rules.iter().find(|rule| &rule.kind == kind)
    }

    /// Resolve raw upstream text to a typed error, falling back to
    /// [`ApiErrorKind::Generic`].
    pub fn detect(&self, description: &str) -> ApiError {
        self.detect_from(&ApiErrorKind::Generic, description)
    }

    /// Resolve raw upstream text, skipping the rule of `origin` and falling back to it.
    ///
    /// Detection never fails: when nothing matches, the result is `origin` carrying the
    /// description verbatim.
    pub fn detect_from(&self, origin: &ApiErrorKind, description: &str) -> ApiError {
        let haystack = description.to_uppercase();
        self.rules
            .iter()
            .filter(|rule| &rule.kind != origin)
            .find(|rule| haystack.contains(&rule.match_token))
            .map(|rule| ApiError {
                kind: rule.kind.clone(),
                message: rule.message().into_owned(),
                description: description.to_owned(),
            })
            .unwrap_or_else(|| ApiError {
                kind: origin.clone(),
                message: description.to_owned(),
                description: description.to_owned(),
            })
    }

    /// Build an error of a known `kind` directly, using its registered message when
    /// there is one.
    pub fn error(&self, kind: ApiErrorKind, description: impl Into<String>) -> ApiError {
        let description = description.into();
        let message = match self.rule(&kind) {
            Some(rule) => rule.message().into_owned(),
            None => match kind.default_match() {
                Some(token) => message_from_token(token),
                None => description.clone(),
            },
        };
        ApiError {
            kind,
            message,
            description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
/// Failure reported by the Eskiz API, resolved to a typed kind.
pub struct ApiError {
    kind: ApiErrorKind,
    message: String,
    description: String,
}

impl ApiError {
    pub fn kind(&self) -> &ApiErrorKind {
        &self.kind
    }

    /// Human-readable message (the rule's message, or the raw text for the generic kind).
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Raw text as reported by the upstream.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether this error belongs to `kind`.
    pub fn is(&self, kind: &ApiErrorKind) -> bool {
        &self.kind == kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_codes_are_detected_inside_surrounding_text() {
        let taxonomy = ErrorTaxonomy::default();
        for rule in taxonomy.rules() {
            let description = format!("request failed: {} (see docs)", rule.match_token());
            let err = taxonomy.detect(&description);
            assert_eq!(err.kind(), rule.kind());
            assert_eq!(err.description(), description);

            let lowered = description.to_lowercase();
            assert_eq!(taxonomy.detect(&lowered).kind(), rule.kind());
        }
    }

    #[test]
    fn matched_kind_carries_derived_message() {
        let err = ErrorTaxonomy::default().detect("AUTH_CREDS_INVALID: bad login");
        assert_eq!(err.kind(), &ApiErrorKind::AuthCredsInvalid);
        assert_eq!(err.message(), "Auth creds invalid!");
        assert_eq!(err.to_string(), "Auth creds invalid!");
        assert_eq!(err.description(), "AUTH_CREDS_INVALID: bad login");
    }

    #[test]
    fn unrecognized_text_falls_back_to_generic_verbatim() {
        let err = ErrorTaxonomy::default().detect("totally unrecognized text");
        assert_eq!(err.kind(), &ApiErrorKind::Generic);
        assert_eq!(err.message(), "totally unrecognized text");
        assert_eq!(err.description(), "totally unrecognized text");
    }

    #[test]
    fn first_registered_rule_wins() {
        let taxonomy = ErrorTaxonomy::default();
        let err = taxonomy.detect("BEARER_TOKEN_INVALID and UNKNOWN_METHOD");
        assert_eq!(err.kind(), &ApiErrorKind::BearerTokenInvalid);

        let err = taxonomy.detect("UNKNOWN_METHOD then BEARER_TOKEN_INVALID");
        assert_eq!(err.kind(), &ApiErrorKind::BearerTokenInvalid);
    }

    #[test]
    fn detect_from_skips_origin_rule_and_falls_back_to_it() {
        let taxonomy = ErrorTaxonomy::default();
        let err = taxonomy.detect_from(&ApiErrorKind::UnknownMethod, "UNKNOWN_METHOD");
        assert_eq!(err.kind(), &ApiErrorKind::UnknownMethod);
        assert_eq!(err.message(), "UNKNOWN_METHOD");

        let err = taxonomy.detect_from(&ApiErrorKind::UnknownMethod, "FIELDS_FORMAT_INVALID");
        assert_eq!(err.kind(), &ApiErrorKind::FieldsFormatInvalid);
    }

    #[test]
    fn custom_rules_extend_the_table() {
        let mut taxonomy = ErrorTaxonomy::default();
        taxonomy
            .register(ApiErrorKind::Custom("limit".into()), "limit_exceeded")
            .unwrap()
            .register_with_message(
                ApiErrorKind::Custom("nick".into()),
                "NICK_NOT_ALLOWED",
                "Sender nick is not approved",
            )
            .unwrap();

        let err = taxonomy.detect("sms limit_exceeded for today");
        assert_eq!(err.kind(), &ApiErrorKind::Custom("limit".into()));
        assert_eq!(err.message(), "Limit exceeded!");

        let err = taxonomy.detect("NICK_NOT_ALLOWED");
        assert_eq!(err.message(), "Sender nick is not approved");
        assert_eq!(taxonomy.rules().len(), 6);
    }

    #[test]
    fn registration_rejects_generic_duplicates_and_blank_tokens() {
        let mut taxonomy = ErrorTaxonomy::default();
        assert!(taxonomy.register(ApiErrorKind::Generic, "ANY").is_err());
        assert!(
            taxonomy
                .register(ApiErrorKind::AuthCredsInvalid, "OTHER")
                .is_err()
        );
        assert!(
            taxonomy
                .register(ApiErrorKind::Custom("x".into()), "  ")
                .is_err()
        );
        assert_eq!(taxonomy.rules().len(), 4);
    }

    #[test]
    fn empty_table_resolves_everything_to_generic() {
        let err = ErrorTaxonomy::empty().detect("AUTH_CREDS_INVALID");
        assert_eq!(err.kind(), &ApiErrorKind::Generic);
    }

    #[test]
    fn direct_construction_uses_rule_message() {
        let taxonomy = ErrorTaxonomy::default();
        let err = taxonomy.error(ApiErrorKind::AuthCredsInvalid, "Unauthenticated.");
        assert_eq!(err.message(), "Auth creds invalid!");
        assert_eq!(err.description(), "Unauthenticated.");

        let err = ErrorTaxonomy::empty().error(ApiErrorKind::BearerTokenInvalid, "bad");
        assert_eq!(err.message(), "Bearer token invalid!");
    }
}

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidPhoneNumber { input: String },
    InvalidUrl { input: String },
    MonthOutOfRange { actual: u32 },
    InvalidServiceHost { input: String },
    UnresolvedPathParam { path: String, param: String },
    InvalidErrorRule { kind: String, reason: &'static str },
    PayloadNotObject,
    InvalidToken,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::InvalidUrl { input } => write!(f, "invalid URL: {input}"),
            Self::MonthOutOfRange { actual } => {
                write!(f, "month out of range: {actual} (expected 1..=12)")
            }
            Self::InvalidServiceHost { input } => write!(f, "invalid service host: {input}"),
            Self::UnresolvedPathParam { path, param } => {
                write!(f, "path {path} has unresolved placeholder {{{param}}}")
            }
            Self::InvalidErrorRule { kind, reason } => {
                write!(f, "cannot register error kind {kind}: {reason}")
            }
            Self::PayloadNotObject => write!(f, "request arguments must serialize to an object"),
            Self::InvalidToken => write!(f, "bearer token is not a valid header value"),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::ValidationError;

    #[test]
    fn display_messages_are_human_readable() {
        let err = ValidationError::Empty { field: "message" };
        assert_eq!(err.to_string(), "message must not be empty");

        let err = ValidationError::InvalidPhoneNumber {
            input: "bad".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid phone number: bad");

        let err = ValidationError::MonthOutOfRange { actual: 13 };
        assert_eq!(err.to_string(), "month out of range: 13 (expected 1..=12)");

        let err = ValidationError::UnresolvedPathParam {
            path: "template/{id}".to_owned(),
            param: "id".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "path template/{id} has unresolved placeholder {id}"
        );
    }
}

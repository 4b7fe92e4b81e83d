use std::collections::BTreeMap;

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::endpoint::RequestDescriptor;
use crate::domain::ValidationError;

/// Argument names that never become payload fields: bearer tokens travel only in the
/// `Authorization` header.
pub const HEADER_ONLY_FIELDS: &[&str] = &["token"];

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("cannot encode request body: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Empty,
    /// `application/x-www-form-urlencoded` pairs, sorted by key.
    Form(Vec<(String, String)>),
    /// Pre-encoded `application/json` document.
    Json(String),
}

/// Concrete request ready for dispatch: method, path relative to `/api/`, body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub method: Method,
    pub path: String,
    pub body: Body,
}

/// Turns an endpoint descriptor and an arguments object into a [`PreparedRequest`].
///
/// Fields named in [`HEADER_ONLY_FIELDS`] never reach the payload.
pub struct RequestBuilder<'a> {
    descriptor: &'a RequestDescriptor,
    path_params: Vec<(&'static str, String)>,
    exclude: Vec<&'a str>,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(descriptor: &'a RequestDescriptor) -> Self {
        Self {
            descriptor,
            path_params: Vec::new(),
            exclude: HEADER_ONLY_FIELDS.to_vec(),
        }
    }

    /// Keep `keys` out of the form or query payload as well.
    ///
    /// Adds to [`HEADER_ONLY_FIELDS`] rather than replacing it.
    pub fn exclude(mut self, keys: &[&'a str]) -> Self {
        self.exclude.extend_from_slice(keys);
        self
    }

    pub fn path_param(mut self, name: &'static str, value: impl ToString) -> Self {
        self.path_params.push((name, value.to_string()));
        self
    }

    pub fn empty(self) -> Result<PreparedRequest, BuildError> {
        self.finish(String::new(), Body::Empty)
    }

    /// Send `args` as a form body.
    pub fn form<T: Serialize>(self, args: &T) -> Result<PreparedRequest, BuildError> {
        let fields = payload(args, &self.exclude)?;
        let pairs = fields
            .into_iter()
            .map(|(key, value)| (key, form_value(value)))
            .collect();
        self.finish(String::new(), Body::Form(pairs))
    }

    /// Send `args` URL-encoded in the query string, with no body.
    pub fn query<T: Serialize>(self, args: &T) -> Result<PreparedRequest, BuildError> {
        let fields = payload(args, &self.exclude)?;
        self.finish(encode_query(fields), Body::Empty)
    }

    /// Send `body` serialized as one JSON document.
    pub fn json<T: Serialize>(self, body: &T) -> Result<PreparedRequest, BuildError> {
        let encoded = serde_json::to_string(body)?;
        self.finish(String::new(), Body::Json(encoded))
    }

    fn finish(self, query: String, body: Body) -> Result<PreparedRequest, BuildError> {
        let mut path = self.descriptor.resolve(&self.path_params)?;
        if !query.is_empty() {
            path.push('?');
            path.push_str(&query);
        }
        Ok(PreparedRequest {
            method: self.descriptor.method.clone(),
            path,
            body,
        })
    }
}

/// Clean field map for `args`.
///
/// Drops keys listed in `exclude`, keys starting with `_`, and null values; strips
/// trailing underscores from the remaining keys (`from_` is sent as `from`).
pub fn payload<T: Serialize>(
    args: &T,
    exclude: &[&str],
) -> Result<BTreeMap<String, Value>, BuildError> {
    let Value::Object(fields) = serde_json::to_value(args)? else {
        return Err(ValidationError::PayloadNotObject.into());
    };

    Ok(fields
        .into_iter()
        .filter(|(key, value)| {
            !exclude.contains(&key.as_str()) && !key.starts_with('_') && !value.is_null()
        })
        .map(|(key, value)| (key.trim_end_matches('_').to_owned(), value))
        .collect())
}

/// Form-encode a field map (`application/x-www-form-urlencoded`, space as `+`).
pub fn encode_query(fields: BTreeMap<String, Value>) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in fields {
        serializer.append_pair(&key, &form_value(value));
    }
    serializer.finish()
}

fn form_value(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

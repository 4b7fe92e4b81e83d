use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};

use crate::transport::Body;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Error reported by an [`HttpTransport`] implementation.
pub type TransportError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Body of an outgoing request.
pub enum RequestBody {
    Empty,
    /// Sent as `application/x-www-form-urlencoded`.
    Form(Vec<(String, String)>),
    /// Pre-encoded JSON document, sent as `application/json`.
    Json(String),
}

impl From<Body> for RequestBody {
    fn from(body: Body) -> Self {
        match body {
            Body::Empty => Self::Empty,
            Body::Form(pairs) => Self::Form(pairs),
            Body::Json(document) => Self::Json(document),
        }
    }
}

#[derive(Debug, Clone)]
/// Fully resolved request handed to an [`HttpTransport`].
///
/// The `Authorization` header, when present, is marked sensitive so it is not
/// printed by `Debug`.
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// HTTP collaborator used by [`EskizClient`](crate::client::EskizClient).
///
/// Implementations must be safe for concurrent use; the client shares one instance
/// between clones and in-flight calls.
pub trait HttpTransport: Send + Sync {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>>;
}

#[derive(Debug, Clone)]
pub(crate) struct ReqwestConfig {
    pub connections_limit: usize,
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

impl ReqwestConfig {
    pub fn open(&self) -> Result<ReqwestTransport, reqwest::Error> {
        let mut builder = reqwest::Client::builder().pool_max_idle_per_host(self.connections_limit);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }
        Ok(ReqwestTransport {
            client: builder.build()?,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>> {
        Box::pin(async move {
            let builder = self
                .client
                .request(request.method, request.url)
                .headers(request.headers);
            let builder = match request.body {
                RequestBody::Empty => builder,
                RequestBody::Form(pairs) => builder.form(&pairs),
                RequestBody::Json(document) => builder
                    .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                    .body(document),
            };

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

//! Client layer: orchestrates transport calls and maps transport ↔ domain.

mod credentials;
mod http;
mod session;

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::{
    ApiError, ApiErrorKind, BatchMessages, BroadcastStatus, Credentials, DispatchQuery,
    ErrorTaxonomy, InternationalMessageResponse, MessageDetails, MessageDetailsQuery,
    MessageResponse, SendInternationalSms, SendSms, Template, TemplateList, Token, TokenResponse,
    TotalMessages, TotalsQuery, User, UserLimit, ValidationError,
};
use crate::transport::{self, BuildError, Failure, PreparedRequest};

pub use credentials::{current_override, with_token, with_token_sync};
pub use http::{
    BoxFuture, HttpRequest, HttpResponse, HttpTransport, RequestBody, TransportError,
};

use credentials::CredentialStore;
use http::ReqwestConfig;
use session::{Opener, Session};

/// Upstream host used unless [`EskizClientBuilder::service`] overrides it.
pub const DEFAULT_SERVICE: &str = "notify.eskiz.uz";

/// Default upper bound on pooled connections per host.
pub const DEFAULT_CONNECTIONS_LIMIT: usize = 100;

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`EskizClient`].
///
/// Every failure the upstream reports through its envelope arrives as
/// [`EskizError::Api`]; match on [`ApiError::kind`] (or [`EskizError::api_kind`]) to
/// single out one code family.
pub enum EskizError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] TransportError),

    /// Non-successful HTTP status without a recognizable failure envelope.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// The upstream reported a failure (`status: fail` or a bare `message` object).
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Response body could not be parsed as the expected shape.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The transport session was closed, by [`EskizClient::close`] or after an
    /// upstream failure. Call [`EskizClient::reopen`] to continue.
    #[error("transport session is closed")]
    SessionClosed,
}

impl EskizError {
    /// Kind of the upstream failure, for [`EskizError::Api`] only.
    pub fn api_kind(&self) -> Option<&ApiErrorKind> {
        match self {
            Self::Api(err) => Some(err.kind()),
            _ => None,
        }
    }
}

impl From<BuildError> for EskizError {
    fn from(err: BuildError) -> Self {
        match err {
            BuildError::Validation(err) => Self::Validation(err),
            BuildError::Json(err) => Self::Parse(Box::new(err)),
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Selects what endpoint methods return: typed DTOs ([`Typed`]) or the decoded
/// envelope as-is ([`Raw`]).
pub trait ResponseMode: sealed::Sealed + Send + Sync + 'static {
    type Output<T>;

    #[doc(hidden)]
    fn convert<T: DeserializeOwned>(body: Value) -> Result<Self::Output<T>, serde_json::Error>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Endpoint methods return typed response objects.
pub struct Typed;

#[derive(Debug, Clone, Copy, Default)]
/// Endpoint methods return the decoded JSON envelope.
pub struct Raw;

impl sealed::Sealed for Typed {}
impl sealed::Sealed for Raw {}

impl ResponseMode for Typed {
    type Output<T> = T;

    fn convert<T: DeserializeOwned>(body: Value) -> Result<T, serde_json::Error> {
        serde_json::from_value(body)
    }
}

impl ResponseMode for Raw {
    type Output<T> = Value;

    fn convert<T: DeserializeOwned>(body: Value) -> Result<Value, serde_json::Error> {
        Ok(body)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Whether a token obtained from `auth/login` or `auth/refresh` replaces the stored one.
pub enum TokenStorage {
    #[default]
    Store,
    Discard,
}

#[derive(Clone)]
/// Builder for [`EskizClient`].
pub struct EskizClientBuilder {
    service: String,
    base_url: Option<String>,
    token: Option<String>,
    connections_limit: usize,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    log_responses: bool,
    taxonomy: ErrorTaxonomy,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl Default for EskizClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EskizClientBuilder {
    pub fn new() -> Self {
        Self {
            service: DEFAULT_SERVICE.to_owned(),
            base_url: None,
            token: None,
            connections_limit: DEFAULT_CONNECTIONS_LIMIT,
            timeout: None,
            user_agent: None,
            log_responses: false,
            taxonomy: ErrorTaxonomy::default(),
            transport: None,
        }
    }

    /// Upstream host, e.g. `notify.eskiz.uz`. Must contain a `.` and no scheme.
    pub fn service(mut self, host: impl Into<String>) -> Self {
        self.service = host.into();
        self
    }

    /// Replace the derived `https://<service>/api/` root entirely (proxies, test servers).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Initial stored bearer token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Maximum idle pooled connections per host.
    pub fn connections_limit(mut self, limit: usize) -> Self {
        self.connections_limit = limit;
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Emit every decoded response body as an `INFO` tracing event.
    pub fn log_responses(mut self, enabled: bool) -> Self {
        self.log_responses = enabled;
        self
    }

    /// Rule table used to classify upstream failures.
    pub fn error_taxonomy(mut self, taxonomy: ErrorTaxonomy) -> Self {
        self.taxonomy = taxonomy;
        self
    }

    /// Use a custom HTTP collaborator instead of the built-in reqwest one.
    ///
    /// `timeout`, `user_agent` and `connections_limit` only configure the built-in
    /// transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build a client returning typed responses.
    pub fn build(self) -> Result<EskizClient<Typed>, EskizError> {
        self.build_mode()
    }

    /// Build a client returning raw decoded envelopes.
    pub fn build_raw(self) -> Result<EskizClient<Raw>, EskizError> {
        self.build_mode()
    }

    fn build_mode<M: ResponseMode>(self) -> Result<EskizClient<M>, EskizError> {
        let service = normalize_service(&self.service)?;
        let service_url = format!("https://{service}");
        let api_url = match self.base_url {
            Some(base_url) => normalize_base_url(&base_url)?,
            None => format!("{service_url}/api/"),
        };

        let opener = match self.transport {
            Some(transport) => Opener::Fixed(transport),
            None => Opener::Reqwest(ReqwestConfig {
                connections_limit: self.connections_limit,
                timeout: self.timeout,
                user_agent: self.user_agent,
            }),
        };
        let session = Session::open(opener).map_err(|err| EskizError::Transport(Box::new(err)))?;

        Ok(EskizClient {
            inner: Arc::new(Inner {
                service,
                service_url,
                api_url,
                credentials: CredentialStore::new(self.token),
                session,
                taxonomy: self.taxonomy,
                log_responses: self.log_responses,
            }),
            explicit_token: None,
            mode: PhantomData,
        })
    }
}

impl fmt::Debug for EskizClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EskizClientBuilder")
            .field("service", &self.service)
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("connections_limit", &self.connections_limit)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("log_responses", &self.log_responses)
            .field("custom_transport", &self.transport.is_some())
            .finish()
    }
}

fn normalize_service(host: &str) -> Result<String, ValidationError> {
    if !host.contains('.') || host.contains("://") {
        return Err(ValidationError::InvalidServiceHost {
            input: host.to_owned(),
        });
    }
    Ok(host.trim_end_matches('/').to_owned())
}

fn normalize_base_url(base_url: &str) -> Result<String, ValidationError> {
    let mut parsed = url::Url::parse(base_url).map_err(|_| ValidationError::InvalidUrl {
        input: base_url.to_owned(),
    })?;
    if !parsed.path().ends_with('/') {
        let path = format!("{}/", parsed.path());
        parsed.set_path(&path);
    }
    Ok(parsed.into())
}

#[derive(Debug)]
struct Inner {
    service: String,
    service_url: String,
    api_url: String,
    credentials: CredentialStore,
    session: Session,
    taxonomy: ErrorTaxonomy,
    log_responses: bool,
}

/// Async client for the Eskiz.uz SMS gateway.
///
/// Clones are cheap and share the stored token and the transport session.
///
/// # Bearer token
///
/// Each request sends `Authorization: Bearer <token>` where the token is, in order of
/// precedence: the one given to [`EskizClient::using_token`], the task-local override
/// set by [`EskizClient::with_token`], or the stored default.
///
/// # Failures close the session
///
/// When a response carries an upstream failure marker, the transport session is
/// closed *before* the error is returned. Every later call on this client (and its
/// clones) fails fast with [`EskizError::SessionClosed`] until [`EskizClient::reopen`]
/// is called. Non-2xx responses without a failure marker and malformed bodies leave
/// the session open.
pub struct EskizClient<M: ResponseMode = Typed> {
    inner: Arc<Inner>,
    explicit_token: Option<Arc<str>>,
    mode: PhantomData<fn() -> M>,
}

impl<M: ResponseMode> Clone for EskizClient<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            explicit_token: self.explicit_token.clone(),
            mode: PhantomData,
        }
    }
}

impl<M: ResponseMode> fmt::Debug for EskizClient<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EskizClient")
            .field("api_url", &self.inner.api_url)
            .field("session", &self.inner.session)
            .field("explicit_token", &self.explicit_token.is_some())
            .finish_non_exhaustive()
    }
}

impl EskizClient<Typed> {
    /// Client for the default service with no stored token.
    pub fn new() -> Result<Self, EskizError> {
        EskizClientBuilder::new().build()
    }

    /// Start building a client with custom settings.
    pub fn builder() -> EskizClientBuilder {
        EskizClientBuilder::new()
    }

    /// Same client, returning raw envelopes.
    pub fn into_raw(self) -> EskizClient<Raw> {
        self.into_mode()
    }
}

impl EskizClient<Raw> {
    /// Same client, returning typed responses.
    pub fn into_typed(self) -> EskizClient<Typed> {
        self.into_mode()
    }
}

impl<M: ResponseMode> EskizClient<M> {
    fn into_mode<N: ResponseMode>(self) -> EskizClient<N> {
        EskizClient {
            inner: self.inner,
            explicit_token: self.explicit_token,
            mode: PhantomData,
        }
    }

    /// Upstream host, e.g. `notify.eskiz.uz`.
    pub fn service(&self) -> &str {
        &self.inner.service
    }

    /// `https://<service>`.
    pub fn service_url(&self) -> &str {
        &self.inner.service_url
    }

    /// Root every endpoint path is appended to.
    pub fn api_url(&self) -> &str {
        &self.inner.api_url
    }

    pub fn error_taxonomy(&self) -> &ErrorTaxonomy {
        &self.inner.taxonomy
    }

    /// Token the next request would send, if any.
    pub fn token(&self) -> Option<Token> {
        self.inner
            .credentials
            .resolve(self.explicit_token.as_deref())
            .map(Token::new)
    }

    /// Replace the stored default token. An active override still wins until it ends.
    pub fn set_token(&self, token: impl Into<String>) {
        self.inner.credentials.set(token.into());
    }

    pub fn clear_token(&self) {
        self.inner.credentials.clear();
    }

    /// Run `future` with `token` overriding the stored default for this task.
    ///
    /// The override is task-local: it is shared by every client, invisible to other
    /// tasks, and not inherited by tasks spawned inside `future`.
    pub async fn with_token<F: Future>(&self, token: impl Into<String>, future: F) -> F::Output {
        with_token(token, future).await
    }

    /// Clone of this client whose calls always send `token`.
    pub fn using_token(&self, token: impl Into<String>) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            explicit_token: Some(Arc::from(token.into())),
            mode: PhantomData,
        }
    }

    /// Close the transport session. Returns `false` if it was already closed.
    pub fn close(&self) -> bool {
        self.inner.session.close()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.session.is_closed()
    }

    /// Open a fresh transport session, replacing the current one.
    pub fn reopen(&self) -> Result<(), EskizError> {
        self.inner
            .session
            .reopen()
            .map_err(|err| EskizError::Transport(Box::new(err)))
    }

    /// Exchange credentials for a bearer token (`auth/login`) and store it.
    pub async fn get_token(&self, credentials: &Credentials) -> Result<Token, EskizError> {
        self.get_token_with(credentials, TokenStorage::Store).await
    }

    pub async fn get_token_with(
        &self,
        credentials: &Credentials,
        storage: TokenStorage,
    ) -> Result<Token, EskizError> {
        let request =
            transport::encode_get_token(credentials, storage == TokenStorage::Store)?;
        self.issue_token(request, storage).await
    }

    /// Renew the current token (`auth/refresh`) and store the new one.
    pub async fn refresh_token(&self) -> Result<Token, EskizError> {
        self.refresh_token_with(TokenStorage::Store).await
    }

    pub async fn refresh_token_with(&self, storage: TokenStorage) -> Result<Token, EskizError> {
        let request = transport::encode_refresh_token()?;
        self.issue_token(request, storage).await
    }

    pub async fn get_user(&self) -> Result<M::Output<User>, EskizError> {
        self.call(transport::encode_get_user()?).await
    }

    pub async fn get_template(&self, id: u64) -> Result<M::Output<Template>, EskizError> {
        self.call(transport::encode_get_template(id)?).await
    }

    pub async fn get_templates(&self) -> Result<M::Output<TemplateList>, EskizError> {
        self.call(transport::encode_get_templates()?).await
    }

    pub async fn send_sms(
        &self,
        request: &SendSms,
    ) -> Result<M::Output<MessageResponse>, EskizError> {
        self.call(transport::encode_send_sms(request)?).await
    }

    /// Send a whole dispatch built with [`MessageBuilder`](crate::domain::MessageBuilder)
    /// as one JSON request.
    pub async fn send_batch_sms(
        &self,
        batch: &BatchMessages,
    ) -> Result<M::Output<MessageResponse>, EskizError> {
        self.call(transport::encode_send_batch_sms(batch)?).await
    }

    pub async fn send_international_sms(
        &self,
        request: &SendInternationalSms,
    ) -> Result<M::Output<InternationalMessageResponse>, EskizError> {
        self.call(transport::encode_send_international_sms(request)?)
            .await
    }

    /// One page of sent messages between two dates.
    pub async fn get_message_details(
        &self,
        query: &MessageDetailsQuery,
    ) -> Result<M::Output<MessageDetails>, EskizError> {
        self.call(transport::encode_get_message_details(query)?)
            .await
    }

    pub async fn get_messages_by_dispatch(
        &self,
        query: &DispatchQuery,
    ) -> Result<M::Output<MessageDetails>, EskizError> {
        self.call(transport::encode_get_messages_by_dispatch(query)?)
            .await
    }

    pub async fn get_dispatch_status(
        &self,
        query: &DispatchQuery,
    ) -> Result<M::Output<BroadcastStatus>, EskizError> {
        self.call(transport::encode_get_dispatch_status(query)?)
            .await
    }

    /// Sender names available to the account.
    pub async fn get_nick_list(&self) -> Result<M::Output<Vec<String>>, EskizError> {
        self.call(transport::encode_get_nick_list()?).await
    }

    pub async fn get_sms_totals(
        &self,
        query: &TotalsQuery,
    ) -> Result<M::Output<TotalMessages>, EskizError> {
        self.call(transport::encode_get_sms_totals(query)?).await
    }

    /// Account balance.
    pub async fn get_limit(&self) -> Result<M::Output<UserLimit>, EskizError> {
        self.call(transport::encode_get_limit()?).await
    }

    async fn issue_token(
        &self,
        request: PreparedRequest,
        storage: TokenStorage,
    ) -> Result<Token, EskizError> {
        let body = self.dispatch(request).await?;
        let response: TokenResponse =
            serde_json::from_value(body).map_err(|err| EskizError::Parse(Box::new(err)))?;

        let token = response.data.token;
        if storage == TokenStorage::Store {
            self.inner.credentials.set(token.clone());
        }
        Ok(Token::new(token))
    }

    async fn call<T: DeserializeOwned>(
        &self,
        request: PreparedRequest,
    ) -> Result<M::Output<T>, EskizError> {
        let body = self.dispatch(request).await?;
        M::convert::<T>(body).map_err(|err| EskizError::Parse(Box::new(err)))
    }

    async fn dispatch(&self, request: PreparedRequest) -> Result<Value, EskizError> {
        let transport = self
            .inner
            .session
            .transport()
            .ok_or(EskizError::SessionClosed)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = self
            .inner
            .credentials
            .resolve(self.explicit_token.as_deref())
        {
            headers.insert(AUTHORIZATION, bearer(&token)?);
        }

        tracing::debug!(method = %request.method, path = %request.path, "sending Eskiz request");

        let response = transport
            .send(HttpRequest {
                method: request.method,
                url: format!("{}{}", self.inner.api_url, request.path),
                headers,
                body: request.body.into(),
            })
            .await
            .map_err(EskizError::Transport)?;

        self.decode(response)
    }

    fn decode(&self, response: HttpResponse) -> Result<Value, EskizError> {
        let success = (200..=299).contains(&response.status);
        let body: Value = match serde_json::from_str(&response.body) {
            Ok(body) => body,
            Err(err) if success => return Err(EskizError::Parse(Box::new(err))),
            Err(_) => return Err(http_status(response)),
        };

        if self.inner.log_responses {
            tracing::info!(status = response.status, body = %body, "Eskiz response");
        }

        if let Some(failure) = transport::inspect(&body) {
            let error = match failure {
                Failure::Alert(alert) => self.inner.taxonomy.detect(&alert),
                Failure::Unauthenticated(message) => self
                    .inner
                    .taxonomy
                    .error(ApiErrorKind::AuthCredsInvalid, message),
            };
            self.inner.session.close();
            tracing::warn!(
                kind = %error.kind(),
                status = response.status,
                "Eskiz reported a failure; transport session closed"
            );
            return Err(EskizError::Api(error));
        }

        if !success {
            return Err(http_status(response));
        }
        Ok(body)
    }
}

fn bearer(token: &str) -> Result<HeaderValue, ValidationError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| ValidationError::InvalidToken)?;
    value.set_sensitive(true);
    Ok(value)
}

fn http_status(response: HttpResponse) -> EskizError {
    let body = if response.body.trim().is_empty() {
        None
    } else {
        Some(response.body)
    };
    EskizError::HttpStatus {
        status: response.status,
        body,
    }
}

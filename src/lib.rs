//! Typed async Rust client for the Eskiz.uz SMS gateway API.
//!
//! The crate is split into a domain layer of strong types (requests, responses, the
//! error taxonomy), a private transport layer for wire-format details, and a client
//! layer orchestrating requests.
//!
//! ```rust,no_run
//! use eskiz::{Credentials, EskizClient, MessageText, RawPhoneNumber, SendSms};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), eskiz::EskizError> {
//!     let client = EskizClient::new()?;
//!     client
//!         .get_token(&Credentials::new("me@example.uz", "...")?)
//!         .await?;
//!
//!     let request = SendSms::new(
//!         RawPhoneNumber::new("+998991234567")?,
//!         MessageText::new("hello")?,
//!     );
//!     let response = client.send_sms(&request).await?;
//!     println!("queued as {}", response.id);
//!
//!     // Send one call tree with another account's token.
//!     client
//!         .with_token("other-token", async {
//!             client.get_limit().await
//!         })
//!         .await?;
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    EskizClient, EskizClientBuilder, EskizError, HttpTransport, Raw, ResponseMode, TokenStorage,
    Typed, with_token, with_token_sync,
};
pub use domain::{
    ApiError, ApiErrorKind, BatchMessages, CallbackUrl, CountryCode, Credentials, DateInput,
    DispatchId, DispatchQuery, ErrorTaxonomy, MessageBuilder, MessageDetailsQuery, MessageText,
    Month, PhoneNumber, RawPhoneNumber, SendInternationalSms, SendSms, SenderId, Token,
    TotalsQuery, ValidationError,
};

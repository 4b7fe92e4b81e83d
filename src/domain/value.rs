use std::fmt;

use chrono::{DateTime, NaiveDateTime, TimeZone};
use phonenumber::country;
use serde::{Deserialize, Serialize};

use crate::domain::validation::ValidationError;

/// Textual form the upstream expects for date filters.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Account e-mail used to obtain a bearer token.
///
/// Invariant: non-empty after trimming.
pub struct Email(String);

impl Email {
    /// Form field name used by Eskiz (`email`).
    pub const FIELD: &'static str = "email";

    /// Create a validated [`Email`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated e-mail.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// Account password (the secret code from the Eskiz cabinet).
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
pub struct Password(String);

impl Password {
    /// Form field name used by Eskiz (`password`).
    pub const FIELD: &'static str = "password";

    /// Create a validated [`Password`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the password as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Sender nickname (`from`).
///
/// Invariant: non-empty after trimming. The value must be enabled in your Eskiz account,
/// see [`crate::EskizClient::get_nick_list`].
pub struct SenderId(String);

impl SenderId {
    /// Form field name used by Eskiz (`from`).
    pub const FIELD: &'static str = "from";

    /// Short code every account may send from.
    pub const DEFAULT: &'static str = "4546";

    /// Create a validated [`SenderId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated sender id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SenderId {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS message text (`message`).
///
/// Invariant: non-empty after trimming. The original value (including whitespace) is preserved.
pub struct MessageText(String);

impl MessageText {
    /// Form field name used by Eskiz (`message`).
    pub const FIELD: &'static str = "message";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// URL that receives delivery reports (`callback_url`).
///
/// Eskiz posts a JSON object with `message_id`, `user_sms_id`, `status` and friends
/// to this address whenever the delivery status changes.
pub struct CallbackUrl(url::Url);

impl CallbackUrl {
    /// Form field name used by Eskiz (`callback_url`).
    pub const FIELD: &'static str = "callback_url";

    /// Parse and validate a callback URL.
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let value = value.as_ref().trim();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        url::Url::parse(value)
            .map(Self)
            .map_err(|_| ValidationError::InvalidUrl {
                input: value.to_owned(),
            })
    }

    /// Borrow the URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// ISO 3166-1 alpha-2 country code used by international sends (`country_code`).
///
/// Invariant: non-empty after trimming; stored upper-cased.
pub struct CountryCode(String);

impl CountryCode {
    /// Form field name used by Eskiz (`country_code`).
    pub const FIELD: &'static str = "country_code";

    /// Create a validated [`CountryCode`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Borrow the country code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Phone number as sent to Eskiz (`mobile_phone` / `to`).
///
/// Invariant: non-empty after trimming. This type does not normalize; if you want E.164
/// normalization, parse into [`PhoneNumber`] and convert it into [`RawPhoneNumber`].
pub struct RawPhoneNumber(String);

impl RawPhoneNumber {
    /// Form field name used by Eskiz single sends (`mobile_phone`).
    pub const FIELD: &'static str = "mobile_phone";

    /// Create a validated (non-empty) raw phone number.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Raw (trimmed) value as provided.
    pub fn raw(&self) -> &str {
        &self.0
    }

    /// Value as Eskiz expects it on the wire: international digits without a leading `+`.
    pub fn wire(&self) -> &str {
        self.0.strip_prefix('+').unwrap_or(&self.0)
    }
}

impl From<u64> for RawPhoneNumber {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<PhoneNumber> for RawPhoneNumber {
    /// Convert an already-parsed phone number to a normalized raw value (E.164).
    fn from(value: PhoneNumber) -> Self {
        Self(value.e164)
    }
}

#[derive(Debug, Clone)]
/// Parsed phone number with an E.164 representation.
///
/// Equality, ordering, and hashing are based on the E.164 form.
pub struct PhoneNumber {
    raw: String,
    e164: String,
    parsed: phonenumber::PhoneNumber,
}

impl PhoneNumber {
    /// Form field name used by Eskiz (`mobile_phone`).
    pub const FIELD: &'static str = "mobile_phone";

    /// Parse and normalize a phone number into E.164.
    ///
    /// `default_region` is used when the input does not contain an explicit country prefix;
    /// pass `Some(country::Id::UZ)` for local Uzbek numbers.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164, parsed })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation.
    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// The parsed phone number from the `phonenumber` crate.
    pub fn parsed(&self) -> &phonenumber::PhoneNumber {
        &self.parsed
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
/// Caller-chosen identifier grouping a batch of messages (`dispatch_id`).
///
/// The upstream accepts both numbers and strings and echoes back whichever it got.
pub enum DispatchId {
    Number(u64),
    Text(String),
}

impl DispatchId {
    /// Form field name used by Eskiz (`dispatch_id`).
    pub const FIELD: &'static str = "dispatch_id";
}

impl fmt::Display for DispatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<u64> for DispatchId {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for DispatchId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for DispatchId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Date filter accepted either as a structured date-time or as text already in the
/// upstream format (`YYYY-MM-DD HH:MM`).
pub enum DateInput {
    At(NaiveDateTime),
    Formatted(String),
}

impl DateInput {
    /// Render the value the way the upstream expects it.
    pub fn to_wire(&self) -> String {
        match self {
            Self::At(at) => at.format(DATE_FORMAT).to_string(),
            Self::Formatted(text) => text.clone(),
        }
    }
}

impl From<NaiveDateTime> for DateInput {
    fn from(value: NaiveDateTime) -> Self {
        Self::At(value)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateInput {
    fn from(value: DateTime<Tz>) -> Self {
        Self::At(value.naive_local())
    }
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        Self::Formatted(value.to_owned())
    }
}

impl From<String> for DateInput {
    fn from(value: String) -> Self {
        Self::Formatted(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Calendar month (`month`).
///
/// Invariant: `1..=12`.
pub struct Month(u32);

impl Month {
    /// Form field name used by Eskiz (`month`).
    pub const FIELD: &'static str = "month";

    /// Create a validated month.
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        if !(1..=12).contains(&value) {
            return Err(ValidationError::MonthOutOfRange { actual: value });
        }
        Ok(Self(value))
    }

    /// Get the month number.
    pub fn value(self) -> u32 {
        self.0
    }
}

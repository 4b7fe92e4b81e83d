//! Typed shapes of the Eskiz response envelopes.
//!
//! Every object keeps fields this crate does not model in `extra`, so a value parsed
//! from the wire re-serializes to an equivalent document.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::domain::value::DispatchId;

type Extra = Map<String, Value>;

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $wire:literal,)+ }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
            /// Value not known to this crate, preserved as received.
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Other(value) => value,
                }
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                match value {
                    $($wire => Self::$variant,)+
                    other => Self::Other(other.to_owned()),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = String::deserialize(deserializer)?;
                Ok(Self::from(value.as_str()))
            }
        }
    };
}

wire_enum! {
    /// Lifecycle state of a message or dispatch.
    pub enum MessageStatus {
        Waiting => "waiting",
        New => "NEW",
        Accepted => "ACCEPTED",
        PartDelivered => "PARTDELIVERED",
        Delivered => "DELIVERED",
        Rejected => "REJECTED",
    }
}

wire_enum! {
    /// Delivery state of a single SMS part as reported by the operator (SMPP codes).
    pub enum MessagePartStatus {
        Waiting => "waiting",
        New => "NEW",
        Accepted => "ACCEPTED",
        Delivered => "DELIVRD",
        Undelivered => "UNDELIV",
        Undeliverable => "UNDELIVERABLE",
        Expired => "EXPIRED",
        Rejected => "REJECTD",
        Deleted => "DELETED",
        Unknown => "UNKNOWN",
        EnRoute => "ENROUTE",
    }
}

/// Field the upstream may omit, send as `null`, or fill in.
///
/// Keeping the three cases apart lets a parsed document serialize back to the same
/// shape: omitted fields stay omitted and explicit `null`s stay `null`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Nullable<T> {
    Missing,
    Null,
    Present(T),
}

impl<T> Nullable<T> {
    pub fn get(&self) -> Option<&T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Missing | Self::Null => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Missing | Self::Null => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl<T> Default for Nullable<T> {
    fn default() -> Self {
        Self::Missing
    }
}

impl<T> From<Option<T>> for Nullable<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Self::Present)
    }
}

impl<T: Serialize> Serialize for Nullable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Present(value) => value.serialize(serializer),
            Self::Missing | Self::Null => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Nullable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::One(value) => std::slice::from_ref(value),
            Self::Many(values) => values,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub message: String,
    pub data: TokenData,
    pub token_type: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenData {
    pub token: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// `auth/user`.
pub struct User {
    pub status: String,
    pub data: UserData,
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub id: Nullable<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub created_at: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub updated_at: Nullable<String>,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub password: Nullable<String>,
    pub role: String,
    pub status: String,
    pub is_vip: bool,
    pub balance: i64,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// `user/get-limit`.
pub struct UserLimit {
    pub data: Balance,
    pub status: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub balance: i64,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// `template/{id}`.
pub struct Template {
    pub status: String,
    pub data: TemplateItem,
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub id: Nullable<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// `templates/`.
pub struct TemplateList {
    pub status: String,
    pub data: Page<TemplateItem>,
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub id: Nullable<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateItem {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub created_at: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub updated_at: Nullable<String>,
    pub user_id: u64,
    pub smsc_id: u64,
    pub template: String,
    #[serde(default)]
    pub smsc: Value,
    #[serde(default)]
    pub user: Value,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Paginator wrapper shared by the listing endpoints.
pub struct Page<T> {
    pub current_page: u64,
    pub path: String,
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub prev_page_url: Nullable<String>,
    pub first_page_url: String,
    pub last_page_url: String,
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub next_page_url: Nullable<String>,
    pub per_page: u64,
    pub last_page: u64,
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub from: Nullable<u64>,
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub to: Nullable<u64>,
    pub total: u64,
    pub result: Vec<T>,
    #[serde(default)]
    pub links: Vec<PageLink>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLink {
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub url: Nullable<String>,
    pub label: String,
    pub active: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// `message/sms/send` and `message/sms/send-batch`.
pub struct MessageResponse {
    pub id: String,
    pub message: String,
    pub status: OneOrMany<MessageStatus>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// `message/sms/send-global`. The upstream documents this shape loosely, so every
/// field is optional.
pub struct InternationalMessageResponse {
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub id: Nullable<Value>,
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub message: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub status: Nullable<OneOrMany<MessageStatus>>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// `message/sms/get-dispatch-status`.
pub struct BroadcastStatus {
    pub status: String,
    pub data: Vec<StatusTotal>,
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub id: Nullable<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusTotal {
    pub status: MessageStatus,
    pub total: u64,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// `user/totals`.
pub struct TotalMessages {
    pub status: String,
    pub data: Vec<MonthlyReport>,
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub id: Nullable<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub status: String,
    pub month: String,
    pub packets: u64,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// `message/sms/get-user-messages` and `message/sms/get-user-messages-by-dispatch`.
pub struct MessageDetails {
    pub data: Page<MessageRecord>,
    pub status: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: u64,
    pub user_id: u64,
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub country_id: Nullable<u64>,
    pub connection_id: u64,
    pub smsc_id: u64,
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub dispatch_id: Nullable<DispatchId>,
    pub user_sms_id: String,
    pub request_id: String,
    pub price: i64,
    pub is_ad: bool,
    pub nick: String,
    pub to: String,
    pub message: String,
    pub encoding: u32,
    pub parts_count: u32,
    pub parts: MessageParts,
    pub status: String,
    pub smsc_data: SmscData,
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub sent_at: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub submit_sm_resp_at: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub delivery_sm_at: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub created_at: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub updated_at: Nullable<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageParts {
    pub parts: BTreeMap<String, MessagePart>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagePart {
    pub accept: String,
    pub status: MessagePartStatus,
    pub submit: i64,
    pub delivery: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmscData {
    pub data: BTreeMap<String, Vec<String>>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn reparse<T>(fixture: Value) -> Value
    where
        T: Serialize + for<'de> Deserialize<'de>,
    {
        let typed: T = serde_json::from_value(fixture).unwrap();
        serde_json::to_value(&typed).unwrap()
    }

    #[test]
    fn message_response_keeps_unknown_fields() {
        let fixture = json!({
            "id": "4385062",
            "message": "Waiting for SMS provider",
            "status": "waiting",
            "request_id": "abc"
        });
        let typed: MessageResponse = serde_json::from_value(fixture.clone()).unwrap();
        assert_eq!(typed.status.as_slice(), &[MessageStatus::Waiting]);
        assert_eq!(typed.extra.get("request_id"), Some(&json!("abc")));
        assert_eq!(serde_json::to_value(&typed).unwrap(), fixture);
    }

    #[test]
    fn message_status_accepts_lists_and_unknown_values() {
        let typed: MessageResponse = serde_json::from_value(json!({
            "id": "1",
            "message": "ok",
            "status": ["NEW", "QUEUED"]
        }))
        .unwrap();
        assert_eq!(
            typed.status.as_slice(),
            &[MessageStatus::New, MessageStatus::Other("QUEUED".to_owned())]
        );
        assert_eq!(
            serde_json::to_value(&typed.status).unwrap(),
            json!(["NEW", "QUEUED"])
        );
    }

    #[test]
    fn user_round_trips() {
        let fixture = json!({
            "status": "success",
            "data": {
                "id": 7,
                "created_at": "2023-01-01T00:00:00.000000Z",
                "updated_at": "2023-01-02T00:00:00.000000Z",
                "name": "Test LLC",
                "email": "test@eskiz.uz",
                "password": "hash",
                "role": "user",
                "status": "active",
                "is_vip": false,
                "balance": 12000,
                "tariff": "basic"
            },
            "id": null
        });
        assert_eq!(reparse::<User>(fixture.clone()), fixture);
    }

    #[test]
    fn omitted_optional_fields_stay_omitted() {
        let fixture = json!({
            "status": "success",
            "data": {
                "id": 7,
                "name": "Test LLC",
                "email": "test@eskiz.uz",
                "role": "user",
                "status": "active",
                "is_vip": true,
                "balance": 0
            }
        });
        let typed: User = serde_json::from_value(fixture.clone()).unwrap();
        assert!(typed.id.is_missing());
        assert!(typed.data.created_at.is_missing());
        assert_eq!(typed.data.password.get(), None);
        assert_eq!(serde_json::to_value(&typed).unwrap(), fixture);
    }

    #[test]
    fn message_details_round_trip_with_pagination() {
        let fixture = json!({
            "status": "success",
            "data": {
                "current_page": 1,
                "path": "https://notify.eskiz.uz/api/message/sms/get-user-messages",
                "prev_page_url": null,
                "first_page_url": "https://notify.eskiz.uz/api/message/sms/get-user-messages?page=1",
                "last_page_url": "https://notify.eskiz.uz/api/message/sms/get-user-messages?page=1",
                "next_page_url": null,
                "per_page": 20,
                "last_page": 1,
                "from": 1,
                "to": 1,
                "total": 1,
                "result": [{
                    "id": 1,
                    "user_id": 7,
                    "country_id": null,
                    "connection_id": 2,
                    "smsc_id": 3,
                    "dispatch_id": 123,
                    "user_sms_id": "u-1",
                    "request_id": "r-1",
                    "price": 50,
                    "is_ad": false,
                    "nick": "4546",
                    "to": "998991234567",
                    "message": "hello",
                    "encoding": 0,
                    "parts_count": 1,
                    "parts": {
                        "parts": {
                            "0": {
                                "accept": "2024-01-01 10:00:00",
                                "status": "DELIVRD",
                                "submit": 1,
                                "delivery": "2024-01-01 10:00:05"
                            }
                        }
                    },
                    "status": "DELIVERED",
                    "smsc_data": { "data": { "0": ["ok"] } },
                    "sent_at": "2024-01-01 10:00:00",
                    "submit_sm_resp_at": "2024-01-01 10:00:01",
                    "delivery_sm_at": null,
                    "created_at": "2024-01-01 10:00:00",
                    "updated_at": "2024-01-01 10:00:05"
                }],
                "links": [{ "url": null, "label": "&laquo; Previous", "active": false }]
            }
        });

        let typed: MessageDetails = serde_json::from_value(fixture.clone()).unwrap();
        let record = &typed.data.result[0];
        assert_eq!(record.dispatch_id.get(), Some(&DispatchId::Number(123)));
        assert_eq!(record.country_id, Nullable::Null);
        assert_eq!(
            record.parts.parts["0"].status,
            MessagePartStatus::Delivered
        );
        assert_eq!(serde_json::to_value(&typed).unwrap(), fixture);
    }

    #[test]
    fn dispatch_status_and_totals_parse() {
        let status: BroadcastStatus = serde_json::from_value(json!({
            "status": "success",
            "data": [{ "status": "DELIVERED", "total": 3 }, { "status": "REJECTED", "total": 1 }],
            "id": 123
        }))
        .unwrap();
        assert_eq!(status.data[1].status, MessageStatus::Rejected);

        let totals: TotalMessages = serde_json::from_value(json!({
            "status": "success",
            "data": [{ "status": "DELIVERED", "month": "2024-03", "packets": 42 }],
            "id": null
        }))
        .unwrap();
        assert_eq!(totals.data[0].packets, 42);
    }
}

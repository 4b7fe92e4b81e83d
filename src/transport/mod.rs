//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod auth;
mod endpoint;
mod envelope;
mod reports;
mod request;
mod send_sms;

pub use auth::{encode_get_token, encode_get_user, encode_refresh_token};
pub use envelope::{Failure, inspect};
pub use reports::{
    encode_get_dispatch_status, encode_get_limit, encode_get_message_details,
    encode_get_messages_by_dispatch, encode_get_nick_list, encode_get_sms_totals,
    encode_get_template, encode_get_templates,
};
pub use request::{Body, BuildError, PreparedRequest};
pub use send_sms::{encode_send_batch_sms, encode_send_international_sms, encode_send_sms};

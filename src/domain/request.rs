use uuid::Uuid;

use crate::domain::validation::ValidationError;
use crate::domain::value::{
    CallbackUrl, CountryCode, DateInput, DispatchId, Email, MessageText, Month, Password,
    RawPhoneNumber, SenderId,
};

/// Default page size of `message/sms/get-user-messages`.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone)]
/// Login pair exchanged for a bearer token at `auth/login`.
pub struct Credentials {
    pub email: Email,
    pub password: Password,
}

impl Credentials {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            email: Email::new(email)?,
            password: Password::new(password)?,
        })
    }
}

#[derive(Debug, Clone)]
/// Single SMS to a local number (`message/sms/send`).
pub struct SendSms {
    pub mobile_phone: RawPhoneNumber,
    pub message: MessageText,
    pub from: SenderId,
    pub callback_url: Option<CallbackUrl>,
}

impl SendSms {
    /// Message from the default sender (`4546`) without a callback.
    pub fn new(mobile_phone: impl Into<RawPhoneNumber>, message: MessageText) -> Self {
        Self {
            mobile_phone: mobile_phone.into(),
            message,
            from: SenderId::default(),
            callback_url: None,
        }
    }

    pub fn sender(mut self, from: SenderId) -> Self {
        self.from = from;
        self
    }

    pub fn callback_url(mut self, callback_url: CallbackUrl) -> Self {
        self.callback_url = Some(callback_url);
        self
    }
}

#[derive(Debug, Clone)]
/// SMS to a foreign number (`message/sms/send-global`).
pub struct SendInternationalSms {
    pub mobile_phone: RawPhoneNumber,
    pub message: MessageText,
    pub country_code: CountryCode,
    pub callback_url: Option<CallbackUrl>,
    /// Send the text as UCS-2 (`unicode=1`).
    pub unicode: bool,
}

impl SendInternationalSms {
    pub fn new(
        mobile_phone: impl Into<RawPhoneNumber>,
        message: MessageText,
        country_code: CountryCode,
    ) -> Self {
        Self {
            mobile_phone: mobile_phone.into(),
            message,
            country_code,
            callback_url: None,
            unicode: false,
        }
    }

    pub fn callback_url(mut self, callback_url: CallbackUrl) -> Self {
        self.callback_url = Some(callback_url);
        self
    }

    pub fn unicode(mut self, unicode: bool) -> Self {
        self.unicode = unicode;
        self
    }
}

#[derive(Debug, Clone)]
/// Paged message history between two dates (`message/sms/get-user-messages`).
pub struct MessageDetailsQuery {
    pub start_date: DateInput,
    pub end_date: DateInput,
    pub page_size: u32,
    pub count: u32,
}

impl MessageDetailsQuery {
    pub fn new(start_date: impl Into<DateInput>, end_date: impl Into<DateInput>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
            page_size: DEFAULT_PAGE_SIZE,
            count: 0,
        }
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Lookup of a dispatch for a user; shared by the by-dispatch and dispatch-status calls.
pub struct DispatchQuery {
    pub user_id: u64,
    pub dispatch_id: DispatchId,
}

impl DispatchQuery {
    pub fn new(user_id: u64, dispatch_id: impl Into<DispatchId>) -> Self {
        Self {
            user_id,
            dispatch_id: dispatch_id.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Monthly totals filter (`user/totals`).
pub struct TotalsQuery {
    pub year: i32,
    pub month: Month,
    /// Report international traffic instead of local.
    pub is_global: bool,
}

impl TotalsQuery {
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        Ok(Self {
            year,
            month: Month::new(month)?,
            is_global: false,
        })
    }

    pub fn global(mut self, is_global: bool) -> Self {
        self.is_global = is_global;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One recipient of a batch send.
pub struct BatchMessage {
    pub to: RawPhoneNumber,
    pub text: MessageText,
    /// Client-side tracking id echoed back in delivery callbacks.
    pub user_sms_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Complete body of `message/sms/send-batch`.
pub struct BatchMessages {
    pub messages: Vec<BatchMessage>,
    pub from: SenderId,
    pub dispatch_id: DispatchId,
}

#[derive(Debug, Clone)]
/// Accumulates per-recipient messages for one dispatch.
///
/// ```rust
/// use eskiz::{MessageBuilder, MessageText};
///
/// let mut builder = MessageBuilder::new(123);
/// for phone in [998991234567_u64, 998991234568] {
///     builder.add(phone, MessageText::new("hi").unwrap(), None);
/// }
/// let batch = builder.build().unwrap();
/// assert_eq!(batch.messages.len(), 2);
/// ```
pub struct MessageBuilder {
    messages: Vec<BatchMessage>,
    from: SenderId,
    dispatch_id: DispatchId,
}

impl MessageBuilder {
    pub fn new(dispatch_id: impl Into<DispatchId>) -> Self {
        Self {
            messages: Vec::new(),
            from: SenderId::default(),
            dispatch_id: dispatch_id.into(),
        }
    }

    pub fn sender(mut self, from: SenderId) -> Self {
        self.from = from;
        self
    }

    /// Queue a message. Without `user_sms_id` a fresh random UUID is assigned.
    pub fn add(
        &mut self,
        to: impl Into<RawPhoneNumber>,
        text: MessageText,
        user_sms_id: Option<String>,
    ) -> &mut Self {
        let user_sms_id = user_sms_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        self.messages.push(BatchMessage {
            to: to.into(),
            text,
            user_sms_id,
        });
        self
    }

    pub fn messages(&self) -> &[BatchMessage] {
        &self.messages
    }

    /// Finish the batch. A batch needs at least one message.
    pub fn build(self) -> Result<BatchMessages, ValidationError> {
        if self.messages.is_empty() {
            return Err(ValidationError::Empty { field: "messages" });
        }
        Ok(BatchMessages {
            messages: self.messages,
            from: self.from,
            dispatch_id: self.dispatch_id,
        })
    }
}

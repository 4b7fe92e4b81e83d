//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod taxonomy;
mod token;
mod validation;
mod value;

pub use request::{
    BatchMessage, BatchMessages, Credentials, DEFAULT_PAGE_SIZE, DispatchQuery, MessageBuilder,
    MessageDetailsQuery, SendInternationalSms, SendSms, TotalsQuery,
};
pub use response::{
    Balance, BroadcastStatus, InternationalMessageResponse, MessageDetails, MessagePart,
    MessagePartStatus, MessageParts, MessageRecord, MessageResponse, MessageStatus,
    MonthlyReport, Nullable, OneOrMany, Page, PageLink, SmscData, StatusTotal, Template,
    TemplateItem, TemplateList, TokenData, TokenResponse, TotalMessages, User, UserData,
    UserLimit,
};
pub use taxonomy::{ApiError, ApiErrorKind, ErrorRule, ErrorTaxonomy};
pub use token::Token;
pub use validation::ValidationError;
pub use value::{
    CallbackUrl, CountryCode, DATE_FORMAT, DateInput, DispatchId, Email, MessageText, Month,
    Password, PhoneNumber, RawPhoneNumber, SenderId,
};

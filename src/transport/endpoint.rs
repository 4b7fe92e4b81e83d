use reqwest::Method;

use crate::domain::ValidationError;

/// HTTP method and path template of one upstream endpoint, relative to `/api/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub path: &'static str,
}

impl RequestDescriptor {
    const fn new(method: Method, path: &'static str) -> Self {
        Self { method, path }
    }

    /// Substitute `{name}` placeholders with same-named values.
    ///
    /// A placeholder without a value, or a `{` that is never closed, is a caller error.
    pub fn resolve(&self, params: &[(&str, String)]) -> Result<String, ValidationError> {
        let mut resolved = String::with_capacity(self.path.len());
        let mut rest = self.path;

        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}').map(|idx| open + idx) else {
                return Err(ValidationError::UnresolvedPathParam {
                    path: self.path.to_owned(),
                    param: rest[open + 1..].to_owned(),
                });
            };
            let name = &rest[open + 1..close];
            let value = params
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value)
                .ok_or_else(|| ValidationError::UnresolvedPathParam {
                    path: self.path.to_owned(),
                    param: name.to_owned(),
                })?;

            resolved.push_str(&rest[..open]);
            resolved.push_str(value);
            rest = &rest[close + 1..];
        }

        resolved.push_str(rest);
        Ok(resolved)
    }
}

pub static GET_TOKEN: RequestDescriptor = RequestDescriptor::new(Method::POST, "auth/login");
pub static REFRESH_TOKEN: RequestDescriptor = RequestDescriptor::new(Method::PATCH, "auth/refresh");
pub static GET_USER: RequestDescriptor = RequestDescriptor::new(Method::GET, "auth/user");

pub static GET_TEMPLATE: RequestDescriptor = RequestDescriptor::new(Method::GET, "template/{id}");
pub static GET_TEMPLATES: RequestDescriptor = RequestDescriptor::new(Method::GET, "templates/");

pub static SEND_SMS: RequestDescriptor = RequestDescriptor::new(Method::POST, "message/sms/send");
pub static SEND_BATCH_SMS: RequestDescriptor =
    RequestDescriptor::new(Method::POST, "message/sms/send-batch");
pub static SEND_INTERNATIONAL_SMS: RequestDescriptor =
    RequestDescriptor::new(Method::POST, "message/sms/send-global");
pub static GET_MESSAGE_DETAILS: RequestDescriptor =
    RequestDescriptor::new(Method::POST, "message/sms/get-user-messages");
pub static GET_MESSAGES_BY_DISPATCH: RequestDescriptor =
    RequestDescriptor::new(Method::POST, "message/sms/get-user-messages-by-dispatch");
pub static GET_DISPATCH_STATUS: RequestDescriptor =
    RequestDescriptor::new(Method::POST, "message/sms/get-dispatch-status");
pub static GET_NICK_LIST: RequestDescriptor = RequestDescriptor::new(Method::GET, "nick/me");

pub static GET_SMS_TOTALS: RequestDescriptor = RequestDescriptor::new(Method::POST, "user/totals");
pub static GET_LIMIT: RequestDescriptor = RequestDescriptor::new(Method::GET, "user/get-limit");

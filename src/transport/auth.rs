use serde::Serialize;

use super::endpoint::{GET_TOKEN, GET_USER, REFRESH_TOKEN};
use super::request::{BuildError, PreparedRequest, RequestBuilder};
use crate::domain::Credentials;

#[derive(Debug, Serialize)]
struct LoginArgs<'a> {
    email: &'a str,
    password: &'a str,
    /// Whether the client keeps the issued token; local only.
    store: bool,
}

pub fn encode_get_token(
    credentials: &Credentials,
    store: bool,
) -> Result<PreparedRequest, BuildError> {
    RequestBuilder::new(&GET_TOKEN)
        .exclude(&["store"])
        .form(&LoginArgs {
            email: credentials.email.as_str(),
            password: credentials.password.as_str(),
            store,
        })
}

pub fn encode_refresh_token() -> Result<PreparedRequest, BuildError> {
    RequestBuilder::new(&REFRESH_TOKEN).empty()
}

pub fn encode_get_user() -> Result<PreparedRequest, BuildError> {
    RequestBuilder::new(&GET_USER).empty()
}

#[cfg(test)]
mod tests {
    use reqwest::Method;

    use super::*;
    use crate::transport::request::Body;

    #[test]
    fn login_sends_email_and_password_form() {
        let credentials = Credentials::new("me@eskiz.uz", "secret").unwrap();
        for store in [true, false] {
            let request = encode_get_token(&credentials, store).unwrap();
            assert_eq!(request.method, Method::POST);
            assert_eq!(request.path, "auth/login");
            assert_eq!(
                request.body,
                Body::Form(vec![
                    ("email".to_owned(), "me@eskiz.uz".to_owned()),
                    ("password".to_owned(), "secret".to_owned()),
                ])
            );
        }
    }

    #[test]
    fn refresh_is_a_bodiless_patch() {
        let request = encode_refresh_token().unwrap();
        assert_eq!(request.method, Method::PATCH);
        assert_eq!(request.path, "auth/refresh");
        assert_eq!(request.body, Body::Empty);
    }
}

use serde::{Serialize, Serializer};

use super::endpoint::{SEND_BATCH_SMS, SEND_INTERNATIONAL_SMS, SEND_SMS};
use super::request::{BuildError, PreparedRequest, RequestBuilder};
use crate::domain::{BatchMessages, DispatchId, RawPhoneNumber, SendInternationalSms, SendSms};

#[derive(Debug, Serialize)]
struct SendSmsArgs<'a> {
    mobile_phone: &'a str,
    message: &'a str,
    from: &'a str,
    callback_url: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct SendInternationalSmsArgs<'a> {
    mobile_phone: &'a str,
    message: &'a str,
    country_code: &'a str,
    callback_url: Option<&'a str>,
    unicode: u8,
}

#[derive(Debug, Serialize)]
struct BatchBody<'a> {
    messages: Vec<BatchItem<'a>>,
    from: &'a str,
    dispatch_id: &'a DispatchId,
}

#[derive(Debug, Serialize)]
struct BatchItem<'a> {
    #[serde(serialize_with = "serialize_phone")]
    to: &'a RawPhoneNumber,
    text: &'a str,
    user_sms_id: &'a str,
}

/// Batch recipients go out as JSON numbers when they are plain digits.
fn serialize_phone<S: Serializer>(phone: &&RawPhoneNumber, serializer: S) -> Result<S::Ok, S::Error> {
    match phone.wire().parse::<u64>() {
        Ok(digits) => serializer.serialize_u64(digits),
        Err(_) => serializer.serialize_str(phone.wire()),
    }
}

pub fn encode_send_sms(request: &SendSms) -> Result<PreparedRequest, BuildError> {
    RequestBuilder::new(&SEND_SMS).form(&SendSmsArgs {
        mobile_phone: request.mobile_phone.wire(),
        message: request.message.as_str(),
        from: request.from.as_str(),
        callback_url: request.callback_url.as_ref().map(|url| url.as_str()),
    })
}

pub fn encode_send_international_sms(
    request: &SendInternationalSms,
) -> Result<PreparedRequest, BuildError> {
    RequestBuilder::new(&SEND_INTERNATIONAL_SMS).form(&SendInternationalSmsArgs {
        mobile_phone: request.mobile_phone.wire(),
        message: request.message.as_str(),
        country_code: request.country_code.as_str(),
        callback_url: request.callback_url.as_ref().map(|url| url.as_str()),
        unicode: u8::from(request.unicode),
    })
}

pub fn encode_send_batch_sms(batch: &BatchMessages) -> Result<PreparedRequest, BuildError> {
    let body = BatchBody {
        messages: batch
            .messages
            .iter()
            .map(|message| BatchItem {
                to: &message.to,
                text: message.text.as_str(),
                user_sms_id: &message.user_sms_id,
            })
            .collect(),
        from: batch.from.as_str(),
        dispatch_id: &batch.dispatch_id,
    };
    RequestBuilder::new(&SEND_BATCH_SMS).json(&body)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::{CallbackUrl, CountryCode, MessageBuilder, MessageText, SenderId};
    use crate::transport::request::Body;

    fn pairs(request: &PreparedRequest) -> Vec<(&str, &str)> {
        match &request.body {
            Body::Form(pairs) => pairs
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect(),
            other => panic!("expected form body, got {other:?}"),
        }
    }

    #[test]
    fn send_sms_omits_missing_callback() {
        let request = SendSms::new(
            RawPhoneNumber::new("+998991234567").unwrap(),
            MessageText::new("hello").unwrap(),
        );
        let prepared = encode_send_sms(&request).unwrap();
        assert_eq!(prepared.path, "message/sms/send");
        assert_eq!(
            pairs(&prepared),
            vec![
                ("from", "4546"),
                ("message", "hello"),
                ("mobile_phone", "998991234567"),
            ]
        );
    }

    #[test]
    fn send_sms_includes_sender_and_callback() {
        let request = SendSms::new(998991234567, MessageText::new("hello").unwrap())
            .sender(SenderId::new("Eskiz.uz").unwrap())
            .callback_url(CallbackUrl::new("https://example.uz/hook").unwrap());
        let prepared = encode_send_sms(&request).unwrap();
        assert_eq!(
            pairs(&prepared),
            vec![
                ("callback_url", "https://example.uz/hook"),
                ("from", "Eskiz.uz"),
                ("message", "hello"),
                ("mobile_phone", "998991234567"),
            ]
        );
    }

    #[test]
    fn international_sms_sends_unicode_flag_as_digit() {
        let request = SendInternationalSms::new(
            14155550100,
            MessageText::new("hi").unwrap(),
            CountryCode::new("us").unwrap(),
        )
        .unicode(true);
        let prepared = encode_send_international_sms(&request).unwrap();
        assert_eq!(prepared.path, "message/sms/send-global");
        assert_eq!(
            pairs(&prepared),
            vec![
                ("country_code", "US"),
                ("message", "hi"),
                ("mobile_phone", "14155550100"),
                ("unicode", "1"),
            ]
        );
    }

    #[test]
    fn batch_is_one_json_document() {
        let mut builder = MessageBuilder::new(7).sender(SenderId::new("Eskiz.uz").unwrap());
        builder
            .add(998991234567, MessageText::new("one").unwrap(), Some("a".to_owned()))
            .add(
                RawPhoneNumber::new("+998991234568").unwrap(),
                MessageText::new("two").unwrap(),
                Some("b".to_owned()),
            );
        let prepared = encode_send_batch_sms(&builder.build().unwrap()).unwrap();
        assert_eq!(prepared.path, "message/sms/send-batch");

        let Body::Json(raw) = &prepared.body else {
            panic!("expected JSON body");
        };
        let body: Value = serde_json::from_str(raw).unwrap();
        assert_eq!(
            body,
            json!({
                "messages": [
                    { "to": 998991234567_u64, "text": "one", "user_sms_id": "a" },
                    { "to": 998991234568_u64, "text": "two", "user_sms_id": "b" }
                ],
                "from": "Eskiz.uz",
                "dispatch_id": 7
            })
        );
    }
}

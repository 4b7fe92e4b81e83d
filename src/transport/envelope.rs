use serde_json::Value;

/// Failure marker found in a decoded response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// `{"status": "fail", "data": {"alert": <text>}}`.
    Alert(String),
    /// A bare `{"message": <text>}` object; the upstream answers unauthenticated
    /// requests this way.
    Unauthenticated(String),
}

/// Inspect `body` for either failure shape.
pub fn inspect(body: &Value) -> Option<Failure> {
    let object = body.as_object()?;

    if object.get("status").and_then(Value::as_str) == Some("fail") {
        let alert = match object.get("data") {
            Some(data) => match data.get("alert") {
                Some(alert) => text_of(alert),
                None => text_of(data),
            },
            None => "fail".to_owned(),
        };
        return Some(Failure::Alert(alert));
    }

    if object.len() == 1 {
        if let Some(message) = object.get("message") {
            return Some(Failure::Unauthenticated(text_of(message)));
        }
    }

    None
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn fail_status_yields_nested_alert() {
        let body = json!({ "status": "fail", "data": { "alert": "AUTH_CREDS_INVALID: bad login" } });
        assert_eq!(
            inspect(&body),
            Some(Failure::Alert("AUTH_CREDS_INVALID: bad login".to_owned()))
        );
    }

    #[test]
    fn fail_status_without_alert_uses_data() {
        let body = json!({ "status": "fail", "data": { "mobile_phone": ["required"] } });
        assert_eq!(
            inspect(&body),
            Some(Failure::Alert(r#"{"mobile_phone":["required"]}"#.to_owned()))
        );
        assert_eq!(
            inspect(&json!({ "status": "fail" })),
            Some(Failure::Alert("fail".to_owned()))
        );
    }

    #[test]
    fn lone_message_means_unauthenticated() {
        let body = json!({ "message": "Unauthenticated." });
        assert_eq!(
            inspect(&body),
            Some(Failure::Unauthenticated("Unauthenticated.".to_owned()))
        );
    }

    #[test]
    fn successful_envelopes_pass() {
        assert_eq!(
            inspect(&json!({ "id": "1", "message": "Waiting for SMS provider", "status": "waiting" })),
            None
        );
        assert_eq!(inspect(&json!({ "status": "success", "data": {} })), None);
        assert_eq!(inspect(&json!(["Eskiz.uz", "4546"])), None);
    }
}

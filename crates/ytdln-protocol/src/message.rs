use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ProtocolError, Result};

/// A download request sent by the parent application.
///
/// Only `url` and `use_aria2c` are recognized; any other fields are ignored.
/// A missing `url` is not rejected here, the supervisor reports it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Media URL handed verbatim to the download tool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Select the aria2c downloader backend. Absent or `null` means false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_aria2c: Option<bool>,
}

impl Request {
    /// Create a request for `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            use_aria2c: None,
        }
    }

    /// Set the aria2c flag.
    pub fn with_aria2c(mut self, use_aria2c: bool) -> Self {
        self.use_aria2c = Some(use_aria2c);
        self
    }

    /// Whether the aria2c backend was requested.
    pub fn uses_aria2c(&self) -> bool {
        self.use_aria2c.unwrap_or(false)
    }

    /// Decode a request from an inbound JSON value.
    ///
    /// The value must be a JSON object; fields with the wrong JSON type are
    /// rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(ProtocolError::InvalidRequest(format!(
                "expected a JSON object, got {}",
                json_kind(&value)
            )));
        }
        serde_json::from_value(value).map_err(|err| ProtocolError::InvalidRequest(err.to_string()))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Status reported to the parent application.
///
/// Every request produces zero or more `Progress` messages followed by exactly
/// one terminal `Success` or `Error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StatusMessage {
    /// Percentage complete, 0 to 100. Not guaranteed to be monotonic.
    Progress { progress: f64 },
    /// The download tool exited successfully.
    Success,
    /// The request failed.
    Error { message: String },
}

impl StatusMessage {
    pub fn progress(progress: f64) -> Self {
        Self::Progress { progress }
    }

    pub fn success() -> Self {
        Self::Success
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// True for `Success` and `Error`, the messages that end a request.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress { .. })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn request_with_all_fields() {
        let request =
            Request::from_value(json!({"url": "https://example.com/v", "use_aria2c": true}))
                .unwrap();
        assert_eq!(request.url.as_deref(), Some("https://example.com/v"));
        assert!(request.uses_aria2c());
    }

    #[test]
    fn aria2c_defaults_to_false_when_absent_or_null() {
        let absent = Request::from_value(json!({"url": "u"})).unwrap();
        let null = Request::from_value(json!({"url": "u", "use_aria2c": null})).unwrap();
        assert!(!absent.uses_aria2c());
        assert!(!null.uses_aria2c());
    }

    #[test]
    fn missing_url_is_passed_through() {
        let request = Request::from_value(json!({"use_aria2c": false})).unwrap();
        assert_eq!(request.url, None);
    }

    #[test]
    fn url_is_not_validated() {
        let request = Request::from_value(json!({"url": "not a url"})).unwrap();
        assert_eq!(request, Request::new("not a url"));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let request = Request::from_value(json!({"url": "u", "format": "best"})).unwrap();
        assert_eq!(request, Request::new("u"));
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let err = Request::from_value(json!(["u", true])).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidRequest(ref m) if m.contains("an array")));
    }

    #[test]
    fn wrong_field_type_is_rejected() {
        let err = Request::from_value(json!({"url": 42})).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidRequest(_)));
    }

    #[test]
    fn status_messages_serialize_to_wire_shapes() {
        assert_eq!(
            serde_json::to_value(StatusMessage::progress(42.5)).unwrap(),
            json!({"status": "progress", "progress": 42.5})
        );
        assert_eq!(
            serde_json::to_value(StatusMessage::success()).unwrap(),
            json!({"status": "success"})
        );
        assert_eq!(
            serde_json::to_value(StatusMessage::error("")).unwrap(),
            json!({"status": "error", "message": ""})
        );
    }

    #[test]
    fn status_message_parses_back() {
        let parsed: StatusMessage =
            serde_json::from_value(json!({"status": "error", "message": "boom"})).unwrap();
        assert_eq!(parsed, StatusMessage::error("boom"));
    }

    #[test]
    fn only_success_and_error_are_terminal() {
        assert!(!StatusMessage::progress(1.0).is_terminal());
        assert!(StatusMessage::success().is_terminal());
        assert!(StatusMessage::error("x").is_terminal());
    }
}

use std::time::Duration;

use log::{debug, warn};
use serde_json::{Value, json};

use crate::remote::{QuizService, RemoteError};
use crate::session::question::{AnswerRecord, Question};

pub const QUESTION_PATH: &str = "/aptitude-question";
pub const FEEDBACK_PATH: &str = "/aptitude-feedback";

/// JSON-over-HTTP client for the question/feedback backend.
pub struct HttpQuizService {
    base_url: String,
    #[cfg(feature = "network")]
    client: reqwest::blocking::Client,
}

impl HttpQuizService {
    #[cfg(feature = "network")]
    pub fn new(base_url: &str, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    #[cfg(not(feature = "network"))]
    pub fn new(base_url: &str, _timeout: Option<Duration>) -> anyhow::Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    #[cfg(feature = "network")]
    fn post(&self, path: &str, body: &Value) -> Result<(u16, String), RemoteError> {
        let url = self.endpoint(path);
        debug!("POST {url}");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .map_err(|e| RemoteError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .map_err(|e| RemoteError::Transport(e.to_string()))?;
        Ok((status, text))
    }

    #[cfg(not(feature = "network"))]
    fn post(&self, _path: &str, _body: &Value) -> Result<(u16, String), RemoteError> {
        Err(RemoteError::Disabled)
    }
}

impl QuizService for HttpQuizService {
    fn fetch_question(&self, topic: &str) -> Result<Question, RemoteError> {
        let (status, body) = self.post(QUESTION_PATH, &json!({ "topic": topic }))?;
        with_status(status, decode_question(&body)).inspect_err(|e| warn!("question fetch failed: {e}"))
    }

    fn fetch_feedback(&self, results: &[AnswerRecord]) -> Result<String, RemoteError> {
        let (status, body) = self.post(FEEDBACK_PATH, &json!({ "results": results }))?;
        with_status(status, decode_feedback(&body)).inspect_err(|e| warn!("feedback fetch failed: {e}"))
    }
}

/// The backend's payload decides success regardless of status code; the
/// status only explains a body that could not be read at all.
fn with_status<T>(status: u16, decoded: Result<T, RemoteError>) -> Result<T, RemoteError> {
    match decoded {
        Err(RemoteError::Decode(_)) if !(200..300).contains(&status) => {
            Err(RemoteError::Status(status))
        }
        other => other,
    }
}

/// A truthy `error` field marks a service-reported failure.
fn service_error(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

pub fn decode_question(body: &str) -> Result<Question, RemoteError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| RemoteError::Decode(e.to_string()))?;
    if let Some(err) = service_error(&value) {
        return Err(RemoteError::Service(err));
    }
    serde_json::from_value(value).map_err(|e| RemoteError::Decode(e.to_string()))
}

pub fn decode_feedback(body: &str) -> Result<String, RemoteError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| RemoteError::Decode(e.to_string()))?;
    if let Some(err) = service_error(&value) {
        return Err(RemoteError::Service(err));
    }
    match value.get("feedback") {
        Some(Value::String(text)) => Ok(text.clone()),
        _ => Err(RemoteError::Decode("missing feedback text".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_question_payload() {
        let body = r#"{
            "question": "A price rises from 80 to 100. Percentage increase?",
            "options": ["20%", "25%", "80%", "125%"],
            "correct_answer": "25%",
            "solution": "20/80 = 25%"
        }"#;
        let q = decode_question(body).unwrap();
        assert_eq!(q.options.len(), 4);
        assert_eq!(q.correct_answer, "25%");
    }

    #[test]
    fn error_field_wins_over_content() {
        let body = r#"{"error":"quota exceeded","question":"x","options":[],"correct_answer":"y"}"#;
        assert_eq!(
            decode_question(body),
            Err(RemoteError::Service("quota exceeded".into()))
        );
    }

    #[test]
    fn falsy_error_field_is_ignored() {
        let body = r#"{"error":"","question":"x","options":["y"],"correct_answer":"y"}"#;
        assert!(decode_question(body).is_ok());
        let body = "{\"error\":null,\"feedback\":\"### Overall Summary\"}";
        assert_eq!(decode_feedback(body).unwrap(), "### Overall Summary");
    }

    #[test]
    fn garbage_body_is_decode_error() {
        assert!(matches!(
            decode_question("<html>502</html>"),
            Err(RemoteError::Decode(_))
        ));
        assert!(matches!(
            decode_feedback(r#"{"nothing":1}"#),
            Err(RemoteError::Decode(_))
        ));
    }

    #[test]
    fn status_only_explains_unreadable_bodies() {
        let decoded = decode_question("<html>502</html>");
        assert_eq!(with_status(502, decoded), Err(RemoteError::Status(502)));

        let decoded = decode_question(r#"{"error":"model overloaded"}"#);
        assert_eq!(
            with_status(500, decoded),
            Err(RemoteError::Service("model overloaded".into()))
        );
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let service = HttpQuizService::new("http://localhost:5000/", None).unwrap();
        assert_eq!(
            service.endpoint(QUESTION_PATH),
            "http://localhost:5000/aptitude-question"
        );
    }

    #[test]
    fn connectivity_errors_are_surfaced() {
        assert!(RemoteError::Transport("timeout".into()).is_connectivity());
        assert!(RemoteError::Status(503).is_connectivity());
        assert!(!RemoteError::Service("bad topic".into()).is_connectivity());
        assert!(!RemoteError::Busy.is_connectivity());
    }
}

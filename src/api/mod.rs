//! Request and response payloads for the Gemini `generateContent` API.

use serde::{Deserialize, Serialize};

/// One piece of a turn. Text-only; the streaming endpoint may emit parts
/// without a `text` field, which deserialize to an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

/// One conversational turn, attributed to `"user"` or `"model"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn new(role: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            parts: vec![Part { text: text.into() }],
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new("user", text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new("model", text)
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

/// A streamed chunk. `candidates` is deliberately required: provider error
/// payloads (`{"error": ...}`) and blocked-prompt feedback carry no
/// candidates and must fail to decode so the transport routes them to the
/// error path instead of dropping them.
#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl GenerateContentResponse {
    /// Text delta carried by this streamed chunk, if any.
    pub fn text_delta(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        if content.parts.is_empty() {
            return None;
        }
        Some(content.parts.iter().map(|p| p.text.as_str()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_serializes_in_wire_shape() {
        let content = Content::user("Hi");
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"role": "user", "parts": [{"text": "Hi"}]})
        );
    }

    #[test]
    fn text_delta_concatenates_parts() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"Hel"},{"text":"lo"}],"role":"model"}}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.text_delta().as_deref(), Some("Hello"));
    }

    #[test]
    fn text_delta_absent_when_no_candidates() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(response.text_delta().is_none());
    }

    #[test]
    fn error_payloads_do_not_decode_as_responses() {
        let raw = r#"{"error":{"code":503,"message":"overloaded","status":"UNAVAILABLE"}}"#;
        assert!(serde_json::from_str::<GenerateContentResponse>(raw).is_err());
    }

    #[test]
    fn partless_text_field_defaults_empty() {
        let raw = r#"{"candidates":[{"content":{"parts":[{}]}}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.text_delta().as_deref(), Some(""));
    }
}

//! Gemini `generateContent` wire types and transport error taxonomy.

use serde::{Deserialize, Serialize};

use super::schema::ResponseSchema;

// ──────────────────────────────────────────────
// Request
// ──────────────────────────────────────────────

/// Request body for `POST /v1beta/models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Part {
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
}

/// Binary content carried inline, base64-encoded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: ResponseSchema,
}

impl GenerateContentRequest {
    /// Inline data parts, in order.
    pub fn inline_parts(&self) -> impl Iterator<Item = &InlineData> {
        self.contents
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| match p {
                Part::Inline { inline_data } => Some(inline_data),
                Part::Text { .. } => None,
            })
    }

    /// Text parts, in order.
    pub fn text_parts(&self) -> impl Iterator<Item = &str> {
        self.contents
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| match p {
                Part::Text { text } => Some(text.as_str()),
                Part::Inline { .. } => None,
            })
    }
}

// ──────────────────────────────────────────────
// Response
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub error: Option<ApiErrorBody>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub code: Option<u16>,
    pub message: String,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if it produced any.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

// ──────────────────────────────────────────────
// Error taxonomy
// ──────────────────────────────────────────────

/// Transport-level failures talking to the Gemini API.
///
/// These never reach the user directly; the analysis client folds them
/// into an `AnalysisFailure`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GeminiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Gemini returned an error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Gemini returned no content ({0})")]
    EmptyResponse(String),

    #[error("Unreadable Gemini response: {0}")]
    ResponseParsing(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Invalid model name: '{0}'")]
    InvalidModelName(String),
}

impl GeminiError {
    /// Whether a later identical request might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) => true,
            Self::ApiError { status, .. } => *status == 429 || *status >= 500,
            Self::EmptyResponse(_)
            | Self::ResponseParsing(_)
            | Self::HttpClient(_)
            | Self::InvalidModelName(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::schema::ResponseSchema;

    fn sample_request() -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".into()),
                parts: vec![
                    Part::Inline {
                        inline_data: InlineData {
                            mime_type: "image/png".into(),
                            data: "aGVsbG8=".into(),
                        },
                    },
                    Part::Text {
                        text: "describe".into(),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".into(),
                response_schema: ResponseSchema::object(vec![(
                    "summary",
                    ResponseSchema::string("s"),
                )]),
            },
        }
    }

    #[test]
    fn request_serializes_in_camel_case() {
        let json = serde_json::to_value(sample_request()).unwrap();
        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[0]["inlineData"]["data"], "aGVsbG8=");
        assert_eq!(parts[1]["text"], "describe");
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(json["generationConfig"]["responseSchema"]["type"], "OBJECT");
        let config_keys: Vec<_> = json["generationConfig"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(config_keys.len(), 2, "unexpected keys: {config_keys:?}");
    }

    #[test]
    fn part_accessors() {
        let request = sample_request();
        assert_eq!(request.inline_parts().count(), 1);
        assert_eq!(request.text_parts().collect::<Vec<_>>(), vec!["describe"]);
    }

    #[test]
    fn response_text_joins_parts() {
        let body = r#"{
            "candidates": [{
                "content": {"parts": [{"text": "{\"a\":"}, {"text": "1}"}], "role": "model"},
                "finishReason": "STOP"
            }]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.text().unwrap(), "{\"a\":1}");
        assert_eq!(parsed.candidates[0].finish_reason.as_deref(), Some("STOP"));
    }

    #[test]
    fn response_without_candidates_has_no_text() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.text().is_none());
        assert_eq!(
            parsed.prompt_feedback.unwrap().block_reason.as_deref(),
            Some("SAFETY")
        );
    }

    #[test]
    fn error_body_parses() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(body).unwrap();
        let error = parsed.error.unwrap();
        assert_eq!(error.code, Some(400));
        assert_eq!(error.message, "API key not valid");
    }

    #[test]
    fn transient_classification() {
        assert!(GeminiError::Network("reset".into()).is_transient());
        assert!(GeminiError::Timeout(120).is_transient());
        assert!(GeminiError::ApiError { status: 429, message: String::new() }.is_transient());
        assert!(GeminiError::ApiError { status: 503, message: String::new() }.is_transient());
        assert!(!GeminiError::ApiError { status: 403, message: String::new() }.is_transient());
        assert!(!GeminiError::EmptyResponse("SAFETY".into()).is_transient());
        assert!(!GeminiError::ResponseParsing("x".into()).is_transient());
    }

    #[test]
    fn empty_response_message_includes_reason() {
        assert_eq!(
            GeminiError::EmptyResponse("SAFETY".into()).to_string(),
            "Gemini returned no content (SAFETY)"
        );
    }
}

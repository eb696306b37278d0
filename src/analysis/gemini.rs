use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use super::gemini_types::{GeminiError, GenerateContentRequest, GenerateContentResponse};
use super::types::GenerativeBackend;
use crate::config::AppConfig;

/// Connect timeout, separate from the overall request timeout.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Blocking HTTP client for the Gemini `generateContent` endpoint.
///
/// Must be constructed outside an async context (it owns a blocking
/// reqwest client). Calls are made from `spawn_blocking`.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout_secs: u64,
    ) -> Result<Self, GeminiError> {
        validate_model_name(model)?;

        let client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| GeminiError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, GeminiError> {
        Self::new(
            &config.api_base,
            &config.api_key,
            &config.model,
            config.timeout_secs,
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

impl GenerativeBackend for GeminiClient {
    fn generate_content(&self, request: &GenerateContentRequest) -> Result<String, GeminiError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    GeminiError::Timeout(self.timeout_secs)
                } else {
                    GeminiError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response.text().map_err(|e| {
            if e.is_timeout() {
                GeminiError::Timeout(self.timeout_secs)
            } else {
                GeminiError::Network(e.to_string())
            }
        })?;

        parse_generate_response(status.as_u16(), &body)
    }
}

/// Interpret a raw `generateContent` HTTP response.
fn parse_generate_response(status: u16, body: &str) -> Result<String, GeminiError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<GenerateContentResponse>(body)
            .ok()
            .and_then(|r| r.error)
            .map(|e| e.message)
            .unwrap_or_else(|| body.trim().to_string());
        return Err(GeminiError::ApiError { status, message });
    }

    let parsed: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| GeminiError::ResponseParsing(e.to_string()))?;

    if let Some(error) = &parsed.error {
        return Err(GeminiError::ApiError {
            status: error.code.unwrap_or(status),
            message: error.message.clone(),
        });
    }

    parsed.text().ok_or_else(|| {
        let reason = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.clone())
            .or_else(|| {
                parsed
                    .candidates
                    .first()
                    .and_then(|c| c.finish_reason.clone())
            })
            .unwrap_or_else(|| "no candidates".to_string());
        GeminiError::EmptyResponse(reason)
    })
}

/// Reject model names that could alter the request path.
pub fn validate_model_name(name: &str) -> Result<(), GeminiError> {
    let valid = !name.is_empty()
        && name.len() <= 128
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_'));
    if valid {
        Ok(())
    } else {
        Err(GeminiError::InvalidModelName(name.to_string()))
    }
}

/// Mock backend for testing. Replays scripted responses and records
/// every request it receives.
pub struct MockBackend {
    script: Mutex<VecDeque<Result<String, GeminiError>>>,
    fallback: Result<String, GeminiError>,
    requests: Mutex<Vec<GenerateContentRequest>>,
}

impl MockBackend {
    /// Always answer with `response`.
    pub fn new(response: &str) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Ok(response.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always fail with `error`.
    pub fn failing(error: GeminiError) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer with `script` in order before falling back.
    pub fn with_script(self, script: Vec<Result<String, GeminiError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..self
        }
    }

    pub fn requests(&self) -> Vec<GenerateContentRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }
}

impl GenerativeBackend for MockBackend {
    fn generate_content(&self, request: &GenerateContentRequest) -> Result<String, GeminiError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        let scripted = self.script.lock().ok().and_then(|mut s| s.pop_front());
        scripted.unwrap_or_else(|| self.fallback.clone())
    }
}

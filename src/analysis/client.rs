//! Typed analysis client: one upload in, one structured assessment out.

use std::sync::Arc;
use std::time::Instant;

use base64::Engine as _;
use serde::de::DeserializeOwned;

use super::gemini_types::{Content, GenerateContentRequest, GenerationConfig, InlineData, Part};
use super::prompt::instruction_for;
use super::schema::schema_for;
use super::types::{AnalysisClient, AnalysisMode, EyeAnalysis, GenerativeBackend, ReportAnalysis};
use super::AnalysisFailure;

const JSON_MIME: &str = "application/json";

/// Production analysis client over any [`GenerativeBackend`].
///
/// Sends exactly one request per call. Field values are trusted as
/// returned; only the JSON shape is checked.
pub struct GeminiAnalysisClient {
    backend: Arc<dyn GenerativeBackend>,
}

impl GeminiAnalysisClient {
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self { backend }
    }

    fn run<T: DeserializeOwned>(
        &self,
        mode: AnalysisMode,
        payload: &[u8],
        media_type: &str,
    ) -> Result<T, AnalysisFailure> {
        let _span = tracing::info_span!(
            "analyze",
            mode = %mode,
            media_type,
            payload_size = payload.len(),
        )
        .entered();

        if payload.is_empty() || media_type.trim().is_empty() {
            tracing::error!("Analysis requested without payload or media type");
            return Err(AnalysisFailure::new(mode, "empty payload or media type"));
        }

        let start = Instant::now();
        let request = build_request(mode, payload, media_type);

        let text = self.backend.generate_content(&request).map_err(|e| {
            tracing::error!(error = %e, "Gemini request failed");
            AnalysisFailure::new(mode, e.to_string())
        })?;

        let parsed = decode_structured::<T>(&text).map_err(|e| {
            tracing::error!(error = %e, response_len = text.len(), "Undecodable analysis response");
            AnalysisFailure::new(mode, format!("decode error: {e}"))
        })?;

        tracing::info!(
            elapsed_ms = %start.elapsed().as_millis(),
            "Analysis complete"
        );
        Ok(parsed)
    }
}

impl AnalysisClient for GeminiAnalysisClient {
    fn analyze_image(
        &self,
        payload: &[u8],
        media_type: &str,
    ) -> Result<EyeAnalysis, AnalysisFailure> {
        self.run(AnalysisMode::Image, payload, media_type)
    }

    fn analyze_report(
        &self,
        payload: &[u8],
        media_type: &str,
    ) -> Result<ReportAnalysis, AnalysisFailure> {
        self.run(AnalysisMode::Report, payload, media_type)
    }
}

/// Build the single multimodal request for `mode`.
pub fn build_request(mode: AnalysisMode, payload: &[u8], media_type: &str) -> GenerateContentRequest {
    let data = base64::engine::general_purpose::STANDARD.encode(payload);

    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![
                Part::Inline {
                    inline_data: InlineData {
                        mime_type: media_type.trim().to_string(),
                        data,
                    },
                },
                Part::Text {
                    text: instruction_for(mode).to_string(),
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_mime_type: JSON_MIME.to_string(),
            response_schema: schema_for(mode),
        },
    }
}

/// Decode structured model output, tolerating a Markdown code fence.
pub fn decode_structured<T: DeserializeOwned>(text: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(strip_code_fence(text.trim()))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let body = match rest.split_once('\n') {
        // Drop the info string ("json") on the opening fence line.
        Some((_, body)) => body,
        // Single-line fence: the JSON follows the optional info string.
        None => rest.strip_prefix("json").unwrap_or(rest),
    };
    let body = body.trim();
    body.strip_suffix("```").unwrap_or(body).trim()
}

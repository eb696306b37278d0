//! Bounded retry with exponential backoff around a generative backend.
//!
//! Only transient transport failures (network, timeout, 429, 5xx) are
//! retried. With `max_retries == 0` the wrapper forwards exactly once.

use std::time::Duration;

use super::gemini_types::{GeminiError, GenerateContentRequest};
use super::types::GenerativeBackend;

/// Upper bound for a single backoff sleep.
const MAX_BACKOFF_MS: u64 = 60_000;

/// Exponential backoff delay for a given attempt (0-based), capped at 60s.
pub fn backoff_delay(attempt: u32, base_ms: u64) -> Duration {
    let factor = 2u64.checked_pow(attempt).unwrap_or(u64::MAX);
    Duration::from_millis(base_ms.saturating_mul(factor).min(MAX_BACKOFF_MS))
}

pub struct RetryingBackend<B> {
    inner: B,
    max_retries: u32,
    base_ms: u64,
}

impl<B: GenerativeBackend> RetryingBackend<B> {
    pub fn new(inner: B, max_retries: u32, base_ms: u64) -> Self {
        Self {
            inner,
            max_retries,
            base_ms,
        }
    }

    #[cfg(test)]
    pub fn inner(&self) -> &B {
        &self.inner
    }
}

impl<B: GenerativeBackend> GenerativeBackend for RetryingBackend<B> {
    fn generate_content(&self, request: &GenerateContentRequest) -> Result<String, GeminiError> {
        let mut attempt = 0;
        loop {
            match self.inner.generate_content(request) {
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    let wait = backoff_delay(attempt, self.base_ms);
                    tracing::warn!(
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        wait_ms = wait.as_millis() as u64,
                        error = %e,
                        "Transient Gemini failure, retrying"
                    );
                    std::thread::sleep(wait);
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::gemini::MockBackend;
    use crate::analysis::gemini_types::{Content, GenerationConfig, Part};
    use crate::analysis::schema::report_analysis_schema;

    fn request() -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: None,
                parts: vec![Part::Text { text: "x".into() }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".into(),
                response_schema: report_analysis_schema(),
            },
        }
    }

    #[test]
    fn backoff_doubles_and_caps() {
        assert_eq!(backoff_delay(0, 1000), Duration::from_millis(1000));
        assert_eq!(backoff_delay(1, 1000), Duration::from_millis(2000));
        assert_eq!(backoff_delay(3, 1000), Duration::from_millis(8000));
        assert_eq!(backoff_delay(10, 1000), Duration::from_millis(60_000));
        assert_eq!(backoff_delay(200, 1000), Duration::from_millis(60_000));
    }

    #[test]
    fn zero_retries_forwards_once() {
        let backend = RetryingBackend::new(
            MockBackend::failing(GeminiError::Network("down".into())),
            0,
            1,
        );
        assert!(backend.generate_content(&request()).is_err());
        assert_eq!(backend.inner().call_count(), 1);
    }

    #[test]
    fn transient_failure_retried_until_success() {
        let mock = MockBackend::new("ok").with_script(vec![
            Err(GeminiError::ApiError {
                status: 503,
                message: "overloaded".into(),
            }),
            Err(GeminiError::Timeout(1)),
        ]);
        let backend = RetryingBackend::new(mock, 3, 1);
        assert_eq!(backend.generate_content(&request()).unwrap(), "ok");
        assert_eq!(backend.inner().call_count(), 3);
    }

    #[test]
    fn retries_are_bounded() {
        let backend = RetryingBackend::new(
            MockBackend::failing(GeminiError::ApiError {
                status: 429,
                message: "quota".into(),
            }),
            2,
            1,
        );
        assert!(backend.generate_content(&request()).is_err());
        assert_eq!(backend.inner().call_count(), 3);
    }

    #[test]
    fn permanent_failure_not_retried() {
        let backend = RetryingBackend::new(
            MockBackend::failing(GeminiError::ApiError {
                status: 403,
                message: "API key not valid".into(),
            }),
            5,
            1,
        );
        assert!(backend.generate_content(&request()).is_err());
        assert_eq!(backend.inner().call_count(), 1);
    }
}

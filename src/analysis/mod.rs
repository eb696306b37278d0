//! Remote analysis: schema, instruction text, Gemini transport, and the
//! typed client that turns one upload into one structured assessment.

pub mod types;
pub mod schema;
pub mod prompt;
pub mod gemini_types;
pub mod gemini;
pub mod retry;
pub mod client;

pub use types::*;
pub use schema::*;
pub use prompt::*;
pub use gemini_types::*;
pub use gemini::*;
pub use retry::*;
pub use client::*;

use thiserror::Error;

/// The single failure kind surfaced to callers of an analysis operation.
///
/// The message names only the operation. Transport and decode failures are
/// indistinguishable through `Display`; the underlying cause is kept for
/// diagnostics via [`AnalysisFailure::cause`].
#[derive(Error, Debug, Clone)]
#[error("Failed to analyze {}. The Gemini API may be experiencing issues.", .mode.noun())]
pub struct AnalysisFailure {
    mode: AnalysisMode,
    cause: String,
}

impl AnalysisFailure {
    pub fn new(mode: AnalysisMode, cause: impl Into<String>) -> Self {
        Self {
            mode,
            cause: cause.into(),
        }
    }

    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    /// Original cause, for logs only. Never shown to the user.
    pub fn cause(&self) -> &str {
        &self.cause
    }
}

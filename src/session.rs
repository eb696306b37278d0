//! Session view-state: the selected upload, the analysis mode, and the
//! outcome of the last analysis.
//!
//! `SessionController` is the only writer of `SessionState`. Each dispatched
//! analysis is tagged with a generation number; selecting a file, switching
//! mode, or starting another analysis moves the generation forward, so a
//! response that arrives afterwards is discarded instead of overwriting the
//! newer state.

use std::fmt::Display;
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::analysis::{AnalysisClient, AnalysisMode, AnalysisResult};

/// Shown when analysis is requested before anything was uploaded.
pub const NO_FILE_MESSAGE: &str = "Please upload an image or report first.";

/// Shown when a failure carries no message of its own.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.";

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

// ──────────────────────────────────────────────
// Uploaded file
// ──────────────────────────────────────────────

/// A file selected by the user. Content is shared, never copied per request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    name: String,
    media_type: String,
    content: Arc<[u8]>,
}

impl UploadedFile {
    /// Build from an upload. The declared type is kept as given; only a
    /// missing or blank one is guessed from the file name.
    pub fn new(name: &str, declared_type: Option<&str>, content: Vec<u8>) -> Self {
        let declared = declared_type.map(str::trim).filter(|t| !t.is_empty());
        let media_type = match declared {
            Some(t) => t.to_ascii_lowercase(),
            None => mime_guess::from_path(name)
                .first()
                .map(|m| m.essence_str().to_string())
                .unwrap_or_else(|| FALLBACK_MEDIA_TYPE.to_string()),
        };

        Self {
            name: name.to_string(),
            media_type,
            content: content.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }

    /// Types the upload target advertises (`image/*`, PDF). Others are
    /// still forwarded.
    pub fn is_accepted_type(&self) -> bool {
        self.is_image() || self.media_type == "application/pdf"
    }
}

/// Handle to an image preview of the current upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewHandle {
    pub id: Uuid,
    pub media_type: String,
}

// ──────────────────────────────────────────────
// Session state
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    file: Option<UploadedFile>,
    preview: Option<PreviewHandle>,
    mode: AnalysisMode,
    result: Option<AnalysisResult>,
    error: Option<String>,
    busy: bool,
}

impl SessionState {
    pub fn file(&self) -> Option<&UploadedFile> {
        self.file.as_ref()
    }

    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.preview.as_ref()
    }

    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        self.file.is_some() && !self.busy
    }

    fn clear_outcome(&mut self) {
        self.result = None;
        self.error = None;
    }
}

/// Everything needed to run one analysis outside the session lock.
#[derive(Debug, Clone)]
pub struct AnalysisTicket {
    pub generation: u64,
    pub mode: AnalysisMode,
    pub payload: Arc<[u8]>,
    pub media_type: String,
}

// ──────────────────────────────────────────────
// Controller
// ──────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct SessionController {
    state: SessionState,
    generation: u64,
}

impl SessionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Replace the selected file. Previews are derived for images only.
    pub fn select_file(&mut self, file: UploadedFile) {
        self.invalidate_in_flight();
        self.state.preview = file.is_image().then(|| PreviewHandle {
            id: Uuid::new_v4(),
            media_type: file.media_type().to_string(),
        });
        tracing::debug!(
            name = file.name(),
            media_type = file.media_type(),
            size = file.size(),
            preview = self.state.preview.is_some(),
            "File selected"
        );
        self.state.file = Some(file);
        self.state.clear_outcome();
    }

    /// Switch mode. Drops the selection since instruction and schema differ.
    pub fn set_mode(&mut self, mode: AnalysisMode) {
        self.invalidate_in_flight();
        self.state.mode = mode;
        self.state.file = None;
        self.state.preview = None;
        self.state.clear_outcome();
        tracing::debug!(mode = %mode, "Analysis mode set");
    }

    /// Start an analysis of the current file.
    ///
    /// Returns `None` (and sets the session error) when nothing is
    /// selected; no request must be made in that case.
    pub fn begin_analysis(&mut self) -> Option<AnalysisTicket> {
        let Some(file) = self.state.file.as_ref() else {
            self.state.result = None;
            self.state.error = Some(NO_FILE_MESSAGE.to_string());
            return None;
        };

        self.generation += 1;
        let ticket = AnalysisTicket {
            generation: self.generation,
            mode: self.state.mode,
            payload: Arc::clone(&file.content),
            media_type: file.media_type.clone(),
        };

        self.state.busy = true;
        self.state.clear_outcome();
        tracing::info!(
            generation = ticket.generation,
            mode = %ticket.mode,
            media_type = %ticket.media_type,
            payload_size = ticket.payload.len(),
            "Analysis dispatched"
        );
        Some(ticket)
    }

    /// Apply the outcome of the analysis tagged `generation`.
    ///
    /// Returns `false` when the response is stale and was discarded.
    pub fn complete_analysis<E: Display>(
        &mut self,
        generation: u64,
        outcome: Result<AnalysisResult, E>,
    ) -> bool {
        if generation != self.generation {
            tracing::warn!(
                generation,
                current = self.generation,
                "Discarding stale analysis response"
            );
            return false;
        }

        self.state.busy = false;
        match outcome {
            Ok(result) => {
                self.state.error = None;
                self.state.result = Some(result);
            }
            Err(e) => {
                let message = e.to_string();
                self.state.result = None;
                self.state.error = Some(if message.trim().is_empty() {
                    UNKNOWN_ERROR_MESSAGE.to_string()
                } else {
                    message
                });
            }
        }
        true
    }

    /// Run a complete analysis synchronously against `client`.
    pub fn analyze(&mut self, client: &dyn AnalysisClient) {
        if let Some(ticket) = self.begin_analysis() {
            let outcome = client.analyze(ticket.mode, &ticket.payload, &ticket.media_type);
            self.complete_analysis(ticket.generation, outcome);
        }
    }

    /// The current upload, if `id` names its preview.
    pub fn preview_file(&self, id: &Uuid) -> Option<&UploadedFile> {
        match (&self.state.preview, &self.state.file) {
            (Some(preview), Some(file)) if preview.id == *id => Some(file),
            _ => None,
        }
    }

    /// A later response for any earlier generation must not apply.
    fn invalidate_in_flight(&mut self) {
        if self.state.busy {
            tracing::info!(
                generation = self.generation,
                "Selection changed while an analysis is in flight"
            );
        }
        self.generation += 1;
        self.state.busy = false;
    }
}

//! Process-wide state shared with the HTTP surface.
//!
//! `CoreState` owns the injected analysis client and the single
//! `SessionController`. The controller lock is never held across the
//! outbound call: an analysis is begun under the lock, run on a blocking
//! thread, then completed under the lock again.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::analysis::{AnalysisClient, AnalysisMode};
use crate::session::{SessionController, UploadedFile};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("An analysis is already in progress")]
    Busy,
}

/// What happened to an `analyze` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzeOutcome {
    /// Nothing was selected; the session error was set, no request made.
    NoFile,
    /// The response was applied to the session.
    Applied,
    /// The session moved on while the request was in flight.
    Discarded,
}

pub struct CoreState {
    session: Mutex<SessionController>,
    client: Arc<dyn AnalysisClient>,
    pub started_at: DateTime<Utc>,
}

impl CoreState {
    pub fn new(client: Arc<dyn AnalysisClient>) -> Self {
        Self {
            session: Mutex::new(SessionController::new()),
            client,
            started_at: Utc::now(),
        }
    }

    /// Lock the session controller.
    pub fn lock_session(&self) -> Result<MutexGuard<'_, SessionController>, CoreError> {
        self.session.lock().map_err(|_| CoreError::LockPoisoned)
    }

    pub fn select_file(&self, file: UploadedFile) -> Result<(), CoreError> {
        self.lock_session()?.select_file(file);
        Ok(())
    }

    pub fn set_mode(&self, mode: AnalysisMode) -> Result<(), CoreError> {
        self.lock_session()?.set_mode(mode);
        Ok(())
    }

    /// Analyze the current upload with the mode-matching operation.
    ///
    /// Refuses with `CoreError::Busy` while another analysis is pending,
    /// which is how the HTTP surface keeps the submit action disabled.
    pub async fn analyze(&self) -> Result<AnalyzeOutcome, CoreError> {
        let ticket = {
            let mut session = self.lock_session()?;
            if session.state().is_busy() {
                return Err(CoreError::Busy);
            }
            match session.begin_analysis() {
                Some(ticket) => ticket,
                None => return Ok(AnalyzeOutcome::NoFile),
            }
        };

        let client = Arc::clone(&self.client);
        let mode = ticket.mode;
        let payload = Arc::clone(&ticket.payload);
        let media_type = ticket.media_type.clone();

        let outcome = tokio::task::spawn_blocking(move || {
            client
                .analyze(mode, &payload, &media_type)
                .map_err(|e| e.to_string())
        })
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Analysis task failed");
            // Empty message: the controller substitutes its generic fallback.
            Err(String::new())
        });

        let applied = self
            .lock_session()?
            .complete_analysis(ticket.generation, outcome);

        Ok(if applied {
            AnalyzeOutcome::Applied
        } else {
            AnalyzeOutcome::Discarded
        })
    }
}

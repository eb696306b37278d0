//! `POST /api/analyze`: run the analysis for the current upload.
//!
//! Responds with the settled session view. Analysis failures and a missing
//! upload show up in the view's `error`, not as HTTP errors.

use axum::extract::State;
use axum::Json;

use crate::api::endpoints::session::current_view;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::api::view::SessionView;
use crate::core_state::AnalyzeOutcome;

pub async fn analyze(State(ctx): State<ApiContext>) -> Result<Json<SessionView>, ApiError> {
    let outcome = ctx.core.analyze().await?;
    if outcome == AnalyzeOutcome::Discarded {
        tracing::debug!("Analyze response superseded by a newer session change");
    }
    current_view(&ctx)
}

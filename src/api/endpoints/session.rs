//! Session view, mode switch, and image preview.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::analysis::AnalysisMode;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::api::view::SessionView;

#[derive(Deserialize)]
pub struct ModeRequest {
    pub mode: AnalysisMode,
}

/// Render the current session.
pub(crate) fn current_view(ctx: &ApiContext) -> Result<Json<SessionView>, ApiError> {
    let session = ctx.core.lock_session()?;
    Ok(Json(SessionView::from_state(session.state())))
}

/// `GET /api/session`
pub async fn current(State(ctx): State<ApiContext>) -> Result<Json<SessionView>, ApiError> {
    current_view(&ctx)
}

/// `POST /api/mode`: switching mode drops the current upload and outcome.
pub async fn set_mode(
    State(ctx): State<ApiContext>,
    Json(request): Json<ModeRequest>,
) -> Result<Json<SessionView>, ApiError> {
    ctx.core.set_mode(request.mode)?;
    current_view(&ctx)
}

/// `GET /api/preview/:id`: raw bytes of the current image upload.
pub async fn preview(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let session = ctx.core.lock_session()?;
    let file = session
        .preview_file(&id)
        .ok_or_else(|| ApiError::NotFound("No preview for this id".into()))?;

    Ok((
        [
            (header::CONTENT_TYPE, file.media_type().to_string()),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        file.content().to_vec(),
    )
        .into_response())
}

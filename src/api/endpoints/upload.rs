//! File upload endpoint.
//!
//! `POST /api/upload`: multipart form with a single `file` field. The file
//! replaces the current selection; nothing is written to disk.

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::endpoints::session::current_view;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::api::view::SessionView;
use crate::config::MAX_UPLOAD_BYTES;
use crate::session::UploadedFile;

const FILE_FIELD: &str = "file";

pub async fn upload(
    State(ctx): State<ApiContext>,
    mut multipart: Multipart,
) -> Result<Json<SessionView>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let name = field.file_name().unwrap_or("upload").to_string();
        let declared = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;

        if bytes.is_empty() {
            return Err(ApiError::BadRequest("Uploaded file is empty".into()));
        }
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(ApiError::PayloadTooLarge {
                limit: MAX_UPLOAD_BYTES,
            });
        }

        let file = UploadedFile::new(&name, declared.as_deref(), bytes.to_vec());
        tracing::info!(
            name = %file.name(),
            media_type = %file.media_type(),
            size = file.size(),
            "Upload received"
        );
        ctx.core.select_file(file)?;
        return current_view(&ctx);
    }

    Err(ApiError::BadRequest(format!(
        "Multipart form has no '{FILE_FIELD}' field"
    )))
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge {
            limit: MAX_UPLOAD_BYTES,
        }
    } else {
        ApiError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
    }
}

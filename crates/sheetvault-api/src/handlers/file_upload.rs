use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Json,
};
use futures::TryStreamExt;
use sheetvault_core::constants::{DEFAULT_CONTENT_TYPE, UPLOAD_FIELD_NAMES};
use sheetvault_core::models::UploadResponse;
use sheetvault_core::AppError;
use std::sync::Arc;
use tokio_util::io::StreamReader;

#[utoipa::path(
    post,
    path = "/upload",
    tag = "files",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Spreadsheet in the `excel` field (alias `file`)"),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "Missing file, invalid name or disallowed extension", body = ErrorResponse),
        (status = 409, description = "Chosen name was taken before the file was published", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
        (status = 507, description = "No free name left for this file", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_file"))]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let mut stored: Option<String> = None;

    if let Err(e) = receive_single_file(&state, &mut multipart, &mut stored).await {
        // A rejected request must not leave its first file behind.
        if let Some(name) = stored.take() {
            if let Err(delete_err) = state.files.delete(&name).await {
                tracing::warn!(error = %delete_err, name = %name, "Failed to remove upload from rejected request");
            }
        }
        return Err(e);
    }

    let name = stored.ok_or(AppError::NoFileProvided)?;
    Ok(Json(UploadResponse::stored(name)))
}

async fn receive_single_file(
    state: &AppState,
    multipart: &mut Multipart,
    stored: &mut Option<String>,
) -> Result<(), HttpAppError> {
    while let Some(field) = multipart.next_field().await? {
        let is_file_field = field
            .name()
            .is_some_and(|name| UPLOAD_FIELD_NAMES.contains(&name));
        if !is_file_field {
            continue;
        }

        if stored.is_some() {
            return Err(AppError::InvalidInput(
                "Multiple file fields are not allowed; send exactly one field named 'excel'"
                    .to_string(),
            )
            .into());
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        tracing::debug!(file_name = %file_name, content_type = %content_type, "Receiving upload");

        // Stream the field straight into storage without buffering it.
        let reader = StreamReader::new(field.map_err(std::io::Error::other));
        tokio::pin!(reader);

        let name = state
            .files
            .upload(&file_name, &content_type, &mut reader)
            .await?;
        *stored = Some(name);
    }

    Ok(())
}

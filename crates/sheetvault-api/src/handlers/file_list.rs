use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use sheetvault_core::models::{FileListResponse, FileResponse};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/files",
    tag = "files",
    responses(
        (status = 200, description = "Stored spreadsheets, newest first", body = FileListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_files"))]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let files = state.files.list().await?;

    tracing::debug!(count = files.len(), "Listed files");

    Ok(Json(FileListResponse {
        files: files.into_iter().map(FileResponse::from).collect(),
    }))
}

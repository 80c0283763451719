use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use sheetvault_core::models::OkResponse;
use std::sync::Arc;

#[utoipa::path(
    delete,
    path = "/files/{name}",
    tag = "files",
    params(
        ("name" = String, Path, description = "Percent-encoded file name")
    ),
    responses(
        (status = 200, description = "File deleted, or it did not exist", body = OkResponse),
        (status = 400, description = "Invalid name or disallowed extension", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "delete_file"))]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    state.files.delete(&name).await?;
    Ok(Json(OkResponse { ok: true }))
}

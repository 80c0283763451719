//! OpenAPI documentation, served at `/api/openapi.json` and rendered by RapiDoc at `/docs`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use sheetvault_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SheetVault API",
        version = "0.1.0",
        description = "Store, list, download and delete spreadsheet files (.xls, .xlsx, .xlsm, .xlsb) on a local directory or an S3-compatible bucket. Uploaded names never overwrite each other: a taken name gets a numbered suffix such as `report (1).xlsx`."
    ),
    paths(
        handlers::file_list::list_files,
        handlers::file_upload::upload_file,
        handlers::file_download::download_file,
        handlers::file_delete::delete_file,
    ),
    components(schemas(
        models::FileResponse,
        models::FileListResponse,
        models::UploadedFileRef,
        models::UploadResponse,
        models::OkResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "files", description = "Spreadsheet file operations")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_every_file_route() {
        let spec = get_openapi_spec();
        for path in ["/files", "/upload", "/files/{name}/download", "/files/{name}"] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}

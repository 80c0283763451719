//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p sheetvault-api --test files_test`.

use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use sheetvault_api::setup::routes;
use sheetvault_api::AppState;
use sheetvault_core::{AllowList, Config};
use sheetvault_services::{FileStore, LocalStorage, Storage};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Test application: server plus the temporary storage root it writes to.
pub struct TestApp {
    pub server: TestServer,
    pub temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Upload `data` as the `excel` field under `file_name`.
    pub async fn upload(&self, file_name: &str, data: &'static [u8]) -> TestResponse {
        self.upload_field("excel", file_name, data).await
    }

    pub async fn upload_field(
        &self,
        field: &str,
        file_name: &str,
        data: &'static [u8],
    ) -> TestResponse {
        let part = Part::bytes(bytes::Bytes::from_static(data))
            .file_name(file_name.to_string())
            .mime_type("application/vnd.ms-excel");
        let form = MultipartForm::new().add_part(field.to_string(), part);

        self.server.post("/upload").multipart(form).await
    }
}

/// Setup test app backed by local storage in a fresh temporary directory.
pub async fn setup_test_app() -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(temp_dir.path())
            .await
            .expect("Failed to create local storage"),
    );

    let config = Config {
        local_storage_path: temp_dir.path().display().to_string(),
        ..Config::default()
    };

    let files = FileStore::new(storage, AllowList::spreadsheets());
    let state = Arc::new(AppState::new(files));

    let app = routes::setup_routes(&config, state).expect("Failed to build router");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp { server, temp_dir }
}

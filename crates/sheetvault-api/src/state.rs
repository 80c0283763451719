//! Shared application state handed to every handler.

use sheetvault_services::FileStore;

pub struct AppState {
    pub files: FileStore,
}

impl AppState {
    pub fn new(files: FileStore) -> Self {
        Self { files }
    }
}

pub mod file_delete;
pub mod file_download;
pub mod file_list;
pub mod file_upload;

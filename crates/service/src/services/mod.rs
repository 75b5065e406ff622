pub mod file_service;
pub mod json_file_service;

pub use file_service::FileService;
pub use json_file_service::JsonFileService;

/// A request field counts as present only when it is non-empty.
pub(crate) fn present(field: Option<&str>) -> Option<&str> {
    field.filter(|v| !v.is_empty())
}

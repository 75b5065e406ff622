use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::{json, Value};
use service::errors::ServiceError;

use super::{AppState, FileInput};
use crate::errors::ApiResponse;

/// Names of every file in the storage root
pub async fn list_files(State(state): State<AppState>) -> ApiResponse {
    match state.files.list().await {
        Ok(names) => ApiResponse::ok("Listado de ficheros").with_content(json!(names)),
        Err(e) => ApiResponse::internal("Error al obtener los archivos", &e).with_content(json!([])),
    }
}

/// Create a file from `{"filename", "content"}`
pub async fn create_file(
    State(state): State<AppState>,
    payload: Result<Json<FileInput>, JsonRejection>,
) -> ApiResponse {
    // an unreadable body is treated as one with no fields
    let input = payload.map(|Json(p)| p).unwrap_or_default();
    match state.files.create(input.filename.as_deref(), input.content.as_deref()).await {
        Ok(()) => ApiResponse::ok("Guardado con éxito"),
        Err(ServiceError::Validation(_)) => ApiResponse::unprocessable(
            "Parámetros incorrectos. El nombre del archivo y contenido son obligatorios.",
        ),
        Err(ServiceError::InvalidName(_)) => ApiResponse::invalid_name(),
        Err(ServiceError::Conflict(_)) => ApiResponse::conflict("El archivo ya existe"),
        Err(e) => ApiResponse::internal("Error al guardar el archivo", &e),
    }
}

/// Raw content of a file, as text
pub async fn read_file(State(state): State<AppState>, Path(name): Path<String>) -> ApiResponse {
    match state.files.read(&name).await {
        Ok(bytes) => ApiResponse::ok("Archivo leído con éxito")
            .with_content(Value::String(String::from_utf8_lossy(&bytes).into_owned())),
        Err(ServiceError::NotFound(_)) => ApiResponse::not_found("Archivo no encontrado").with_content(Value::Null),
        Err(ServiceError::InvalidName(_)) => ApiResponse::invalid_name().with_content(Value::Null),
        Err(e) => ApiResponse::internal("Error al leer el archivo", &e).with_content(Value::Null),
    }
}

/// Overwrite an existing file with `{"content"}`
pub async fn update_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
    payload: Result<Json<FileInput>, JsonRejection>,
) -> ApiResponse {
    let input = payload.map(|Json(p)| p).unwrap_or_default();
    match state.files.update(&name, input.content.as_deref()).await {
        Ok(()) => ApiResponse::ok("Actualizado con éxito"),
        Err(ServiceError::Validation(_)) => ApiResponse::unprocessable("El contenido del archivo es obligatorio"),
        Err(ServiceError::InvalidName(_)) => ApiResponse::invalid_name(),
        Err(ServiceError::NotFound(_)) => ApiResponse::not_found("El archivo no existe"),
        Err(e) => ApiResponse::internal("Error al actualizar el archivo", &e),
    }
}

pub async fn delete_file(State(state): State<AppState>, Path(name): Path<String>) -> ApiResponse {
    match state.files.delete(&name).await {
        Ok(()) => ApiResponse::ok("Eliminado con éxito"),
        Err(ServiceError::InvalidName(_)) => ApiResponse::invalid_name(),
        Err(ServiceError::NotFound(_)) => ApiResponse::not_found("El archivo no existe"),
        Err(e) => ApiResponse::internal("Error al eliminar el archivo", &e),
    }
}

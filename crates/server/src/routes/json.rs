use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::json;
use service::errors::ServiceError;

use super::{AppState, FileInput};
use crate::errors::ApiResponse;

const NOT_FOUND: &str = "El fichero no existe";
const NOT_JSON: &str = "Contenido no es un JSON válido";

/// Names of the stored documents whose content is valid JSON
pub async fn list_json(State(state): State<AppState>) -> ApiResponse {
    match state.json.list().await {
        Ok(names) => ApiResponse::ok("Operación exitosa").with_content(json!(names)),
        Err(e) => ApiResponse::internal("Error al obtener los ficheros", &e).with_content(json!([])),
    }
}

pub async fn create_json(
    State(state): State<AppState>,
    payload: Result<Json<FileInput>, JsonRejection>,
) -> ApiResponse {
    let input = payload.map(|Json(p)| p).unwrap_or_default();
    match state.json.create(input.filename.as_deref(), input.content.as_deref()).await {
        Ok(()) => ApiResponse::ok("Fichero guardado exitosamente"),
        Err(ServiceError::Validation(_)) => ApiResponse::unprocessable("Parámetros inválidos"),
        Err(ServiceError::InvalidName(_)) => ApiResponse::invalid_name(),
        Err(ServiceError::Conflict(_)) => ApiResponse::conflict("El fichero ya existe"),
        Err(ServiceError::UnsupportedContent(_)) => ApiResponse::unsupported(NOT_JSON),
        Err(e) => ApiResponse::internal("Error al guardar el fichero", &e),
    }
}

/// Stored document, decoded
pub async fn read_json(State(state): State<AppState>, Path(name): Path<String>) -> ApiResponse {
    match state.json.read(&name).await {
        Ok(value) => ApiResponse::ok("Operación exitosa").with_content(value),
        Err(ServiceError::NotFound(_)) => ApiResponse::not_found(NOT_FOUND),
        Err(ServiceError::InvalidName(_)) => ApiResponse::invalid_name(),
        Err(e) => ApiResponse::internal("Error al leer el fichero", &e),
    }
}

pub async fn update_json(
    State(state): State<AppState>,
    Path(name): Path<String>,
    payload: Result<Json<FileInput>, JsonRejection>,
) -> ApiResponse {
    let input = payload.map(|Json(p)| p).unwrap_or_default();
    match state.json.update(&name, input.content.as_deref()).await {
        Ok(()) => ApiResponse::ok("Fichero actualizado exitosamente"),
        Err(ServiceError::Validation(_)) => ApiResponse::unprocessable("Parámetro contenido es requerido"),
        Err(ServiceError::InvalidName(_)) => ApiResponse::invalid_name(),
        Err(ServiceError::NotFound(_)) => ApiResponse::not_found(NOT_FOUND),
        Err(ServiceError::UnsupportedContent(_)) => ApiResponse::unsupported(NOT_JSON),
        Err(e) => ApiResponse::internal("Error al actualizar el fichero", &e),
    }
}

pub async fn delete_json(State(state): State<AppState>, Path(name): Path<String>) -> ApiResponse {
    remove(&state, &name).await
}

/// `DELETE /json` with no identifier at all
pub async fn delete_json_without_name(State(state): State<AppState>) -> ApiResponse {
    remove(&state, "").await
}

async fn remove(state: &AppState, name: &str) -> ApiResponse {
    match state.json.delete(name).await {
        Ok(()) => ApiResponse::ok("Fichero eliminado exitosamente"),
        Err(ServiceError::Validation(_)) => ApiResponse::unprocessable("Parámetro filename es requerido"),
        Err(ServiceError::InvalidName(_)) => ApiResponse::invalid_name(),
        Err(ServiceError::NotFound(_)) => ApiResponse::not_found(NOT_FOUND),
        Err(e) => ApiResponse::internal("Error al eliminar el fichero", &e),
    }
}

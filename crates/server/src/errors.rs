use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use service::errors::ServiceError;
use tracing::error;

/// Body shared by every file endpoint. Field names are part of the public contract.
#[derive(Debug, Serialize)]
pub struct Envelope {
    #[serde(rename = "mensaje")]
    pub message: String,
    #[serde(rename = "contenido", skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

/// Status code plus envelope; what every handler returns.
#[derive(Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Envelope,
}

impl ApiResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, body: Envelope { message: message.into(), content: None } }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, message)
    }

    /// Attach `contenido`; `Value::Null` is serialized as an explicit `null`.
    pub fn with_content(mut self, content: Value) -> Self {
        self.body.content = Some(content);
        self
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNSUPPORTED_MEDIA_TYPE, message)
    }

    /// 500 whose message is `context` followed by the underlying error text.
    pub fn internal(context: &str, err: &ServiceError) -> Self {
        let cause = match err {
            ServiceError::Store(e) => e.source.to_string(),
            other => other.to_string(),
        };
        error!(error = %err, %context, "file operation failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, format!("{context}: {cause}"))
    }

    pub fn invalid_name() -> Self {
        Self::unprocessable("Nombre de fichero no válido")
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

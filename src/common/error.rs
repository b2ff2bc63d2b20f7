use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nuestro tipo de error, con `thiserror` para mejor ergonomía.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de validación")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Credencial ausente, inválida o expirada")]
    Unauthenticated,

    #[error("Falta el permiso '{0}'")]
    Forbidden(&'static str),

    #[error("{0} no encontrado")]
    NotFound(&'static str),

    #[error("Entrada inválida: {0}")]
    InvalidInput(String),

    #[error("Movimiento de Kanban ilegal: de '{de}' a '{a}'")]
    InvalidTransition { de: String, a: String },

    #[error("Stock insuficiente: se pidieron {solicitadas} piezas y hay {disponibles}")]
    InsufficientStock { solicitadas: i64, disponibles: i64 },

    #[error("Conflicto: {0}")]
    Conflict(String),

    // Variante para errores de base de datos (sqlx)
    #[error("Error de base de datos")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para cualquier otro error inesperado.
    #[error("Error interno del servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Error de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Devuelve todos los detalles de la validación, campo por campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Uno o más campos son inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "Credencial de autenticación inválida o ausente.".to_string(),
            ),
            AppError::Forbidden(permiso) => (
                StatusCode::FORBIDDEN,
                format!("Necesitas el permiso '{}' para realizar esta acción.", permiso),
            ),
            AppError::NotFound(entidad) => {
                (StatusCode::NOT_FOUND, format!("{} no encontrado.", entidad))
            }
            AppError::InvalidInput(ref detalle) => (StatusCode::BAD_REQUEST, detalle.clone()),
            AppError::InvalidTransition { ref de, ref a } => (
                StatusCode::CONFLICT,
                format!("No se puede mover el lote de '{}' a '{}'.", de, a),
            ),
            AppError::InsufficientStock { solicitadas, disponibles } => (
                StatusCode::CONFLICT,
                format!(
                    "Stock insuficiente: se pidieron {} piezas y solo hay {}.",
                    solicitadas, disponibles
                ),
            ),
            AppError::Conflict(ref detalle) => (StatusCode::CONFLICT, detalle.clone()),

            // Todo lo demás (DatabaseError, InternalServerError, Bcrypt) es un 500.
            // El detalle queda en el log del servidor, nunca en la respuesta.
            ref e => {
                tracing::error!("Error interno del servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocurrió un error inesperado.".to_string(),
                )
            }
        };

        // Respuesta estándar para errores simples que solo llevan un mensaje.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

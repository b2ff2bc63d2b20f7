// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{common::error::AppError, config::AppState, models::auth::Claims};

/// El contexto resuelto de la credencial: quién, de qué aserradero y con
/// qué roles. Es la ÚNICA fuente de tenant para las operaciones; un
/// aserraderoId en el cuerpo de la petición jamás lo sustituye.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextoAuth {
    pub usuario_id: Uuid,
    pub aserradero_id: Uuid,
    pub roles: Vec<String>,
}

impl From<Claims> for ContextoAuth {
    fn from(claims: Claims) -> Self {
        Self {
            usuario_id: claims.sub,
            aserradero_id: claims.aserradero_id,
            roles: claims.roles,
        }
    }
}

// El middleware en sí: extrae el Bearer, lo resuelve y deja el contexto en
// las "extensions" de la petición. Sin credencial no hay distinción de
// causa: todo es Unauthenticated.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let headers = request.headers();
    let auth_header = headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok());

    if let Some(auth_header) = auth_header {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            let claims = app_state.auth_service.validar_token(token)?;
            request
                .extensions_mut()
                .insert(ContextoAuth::from(claims));
            return Ok(next.run(request).await);
        }
    }

    Err(AppError::Unauthenticated)
}

// Extractor para obtener el contexto autenticado directamente en los handlers
impl<S> FromRequestParts<S> for ContextoAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ContextoAuth>()
            .cloned()
            .ok_or(AppError::Unauthenticated)
    }
}

// src/handlers/cron.rs

use axum::{extract::State, http::HeaderMap, http::StatusCode, response::IntoResponse, Json};
use chrono::{Months, Utc};
use serde_json::json;

use crate::{common::error::AppError, config::AppState};

const CRON_SECRET_HEADER: &str = "x-cron-secret";

// Disparador externo (cadencia mensual) de la depuración de la bitácora.
// No pasa por el middleware de JWT: se protege con un secreto compartido
// en el header. Si no coincide, Unauthenticated sin más detalle.
pub async fn depurar_ajustes(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let Some(secreto_configurado) = &app_state.cron_secret else {
        tracing::error!("CRON_SECRET no está configurado; se rechaza el disparador.");
        return Err(AppError::Unauthenticated);
    };

    let secreto_recibido = headers
        .get(CRON_SECRET_HEADER)
        .and_then(|v| v.to_str().ok());

    if secreto_recibido != Some(secreto_configurado.as_str()) {
        return Err(AppError::Unauthenticated);
    }

    // La regla de retención: todo lo anterior a 3 meses es elegible.
    let corte = Utc::now() - Months::new(3);
    let eliminadas = app_state.ajustes_service.depurar_bitacora(corte).await?;

    Ok((StatusCode::OK, Json(json!({ "eliminadas": eliminadas }))))
}

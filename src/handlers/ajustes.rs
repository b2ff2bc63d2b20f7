// src/handlers/ajustes.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::ContextoAuth,
        rbac::{CanManageAll, RequierePermiso},
    },
};

// ---
// Payload: ajuste manual de patio
// ---
// tipoSaldo viaja como texto libre y el servicio lo valida contra el
// conjunto cerrado, para que un valor desconocido sea entrada inválida y
// no un JSON rechazado a secas.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CrearAjustePayload {
    pub tipo_saldo: String,

    #[validate(length(min = 1, message = "El tipo de ajuste es obligatorio."))]
    pub tipo_ajuste: String,

    pub volumen_m3: Option<Decimal>,

    pub notas: Option<String>,
}

pub async fn crear_ajuste(
    State(app_state): State<AppState>,
    contexto: ContextoAuth,
    _guard: RequierePermiso<CanManageAll>,
    Json(payload): Json<CrearAjustePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let ajuste = app_state
        .ajustes_service
        .registrar_ajuste_patio(
            contexto.aserradero_id,
            contexto.usuario_id,
            &payload.tipo_saldo,
            &payload.tipo_ajuste,
            payload.volumen_m3,
            payload.notas.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ajuste)))
}

pub async fn listar_ajustes(
    State(app_state): State<AppState>,
    contexto: ContextoAuth,
    _guard: RequierePermiso<CanManageAll>,
) -> Result<impl IntoResponse, AppError> {
    let ajustes = app_state
        .ajustes_service
        .listar_ajustes_patio(contexto.aserradero_id)
        .await?;

    Ok((StatusCode::OK, Json(ajustes)))
}

// src/handlers/precios.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::{
    common::{error::AppError, validacion::validar_no_negativo},
    config::AppState,
    middleware::{
        auth::ContextoAuth,
        rbac::{CanManageAll, RequierePermiso},
    },
};

// ---
// Payload: alta de precio base
// ---
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CrearPrecioBasePayload {
    #[validate(length(min = 1, message = "La especie es obligatoria."))]
    pub especie: String,

    #[validate(length(min = 1, message = "La calidad es obligatoria."))]
    pub calidad: String,

    #[validate(custom(function = "validar_no_negativo"))]
    pub precio_pie_tablar: Decimal,

    #[validate(custom(function = "validar_no_negativo"))]
    pub precio_pie_tablar_mayoreo: Option<Decimal>,
}

pub async fn crear_precio_base(
    State(app_state): State<AppState>,
    contexto: ContextoAuth,
    _guard: RequierePermiso<CanManageAll>,
    Json(payload): Json<CrearPrecioBasePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let precio = app_state
        .precios_service
        .crear_precio_base(
            contexto.aserradero_id,
            &payload.especie,
            &payload.calidad,
            payload.precio_pie_tablar,
            payload.precio_pie_tablar_mayoreo,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(precio)))
}

// ---
// Payload: actualizar tarifas de un precio base existente
// ---
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarPrecioBasePayload {
    #[validate(custom(function = "validar_no_negativo"))]
    pub precio_pie_tablar: Decimal,

    #[validate(custom(function = "validar_no_negativo"))]
    pub precio_pie_tablar_mayoreo: Option<Decimal>,
}

pub async fn actualizar_precio_base(
    State(app_state): State<AppState>,
    contexto: ContextoAuth,
    _guard: RequierePermiso<CanManageAll>,
    Path(precio_id): Path<i64>,
    Json(payload): Json<ActualizarPrecioBasePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let precio = app_state
        .precios_service
        .actualizar_precio_base(
            contexto.aserradero_id,
            precio_id,
            payload.precio_pie_tablar,
            payload.precio_pie_tablar_mayoreo,
        )
        .await?;

    Ok((StatusCode::OK, Json(precio)))
}

pub async fn listar_precios_base(
    State(app_state): State<AppState>,
    contexto: ContextoAuth,
) -> Result<impl IntoResponse, AppError> {
    let precios = app_state
        .precios_service
        .listar_precios_base(contexto.aserradero_id)
        .await?;

    Ok((StatusCode::OK, Json(precios)))
}

// ---
// Cotización: dimensiones + especie/calidad por query string
// ---
// Dimensiones ausentes cuentan como cero: el motor devuelve todo en cero
// en lugar de fallar.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CotizarParams {
    pub especie: String,
    pub calidad: String,
    pub grosor_pulgadas: Option<Decimal>,
    pub ancho_pulgadas: Option<Decimal>,
    pub largo_pies: Option<Decimal>,
}

pub async fn cotizar(
    State(app_state): State<AppState>,
    contexto: ContextoAuth,
    Query(params): Query<CotizarParams>,
) -> Result<impl IntoResponse, AppError> {
    let cotizacion = app_state
        .precios_service
        .cotizar(
            contexto.aserradero_id,
            &params.especie,
            &params.calidad,
            params.grosor_pulgadas.unwrap_or(Decimal::ZERO),
            params.ancho_pulgadas.unwrap_or(Decimal::ZERO),
            params.largo_pies.unwrap_or(Decimal::ZERO),
        )
        .await?;

    Ok((StatusCode::OK, Json(cotizacion)))
}

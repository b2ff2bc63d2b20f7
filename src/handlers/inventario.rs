// src/handlers/inventario.rs

use axum::{
    extract::{Path, State},
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
        rbac::{CanManageAll, CanManageProduction, CanManageSales, RequierePermiso},
    },
    services::inventario_service::LoteNuevo,
};

// ---
// Payload: registrar remisión
// ---
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CrearRemisionPayload {
    #[validate(length(min = 1, message = "El folio es obligatorio."))]
    pub folio: String,

    pub proveedor: Option<String>,

    #[validate(length(min = 1, message = "La especie es obligatoria."))]
    pub especie: String,

    #[validate(custom(function = "validar_no_negativo"))]
    pub m3_declarados: Decimal,

    pub notas: Option<String>,
}

pub async fn crear_remision(
    State(app_state): State<AppState>,
    contexto: ContextoAuth,
    _guard: RequierePermiso<CanManageProduction>,
    Json(payload): Json<CrearRemisionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let remision = app_state
        .inventario_service
        .registrar_remision(
            contexto.aserradero_id,
            &payload.folio,
            payload.proveedor.as_deref(),
            &payload.especie,
            payload.m3_declarados,
            payload.notas.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(remision)))
}

// ---
// Payload: corregir medición (cubicación del patio)
// ---
// El campo es Option a propósito: su ausencia debe reportarse como entrada
// inválida del dominio, no como JSON malformado.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorregirMedicionPayload {
    pub m3_recibidos: Option<Decimal>,
}

pub async fn corregir_medicion(
    State(app_state): State<AppState>,
    contexto: ContextoAuth,
    _guard: RequierePermiso<CanManageProduction>,
    Path(remision_id): Path<i64>,
    Json(payload): Json<CorregirMedicionPayload>,
) -> Result<impl IntoResponse, AppError> {
    let remision = app_state
        .inventario_service
        .corregir_medicion(contexto.aserradero_id, remision_id, payload.m3_recibidos)
        .await?;

    Ok((StatusCode::OK, Json(remision)))
}

// ---
// Payload: registrar consumo
// ---
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegistrarConsumoPayload {
    pub remision_id: i64,

    #[validate(custom(function = "validar_no_negativo"))]
    pub m3_consumidos: Decimal,

    pub notas: Option<String>,
}

pub async fn registrar_consumo(
    State(app_state): State<AppState>,
    contexto: ContextoAuth,
    _guard: RequierePermiso<CanManageProduction>,
    Json(payload): Json<RegistrarConsumoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let orden = app_state
        .inventario_service
        .registrar_consumo(
            contexto.aserradero_id,
            payload.remision_id,
            payload.m3_consumidos,
            payload.notas.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(orden)))
}

// ---
// Payload: registrar producción (lote(s) nuevos al Kanban)
// ---
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotePayload {
    pub producto_id: i64,
    pub piezas: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrarProduccionPayload {
    pub orden_consumo_id: i64,
    pub lotes: Vec<LotePayload>,
}

pub async fn registrar_produccion(
    State(app_state): State<AppState>,
    contexto: ContextoAuth,
    _guard: RequierePermiso<CanManageProduction>,
    Json(payload): Json<RegistrarProduccionPayload>,
) -> Result<impl IntoResponse, AppError> {
    let lotes = payload
        .lotes
        .into_iter()
        .map(|l| LoteNuevo {
            producto_id: l.producto_id,
            piezas: l.piezas,
        })
        .collect();

    let creados = app_state
        .inventario_service
        .registrar_produccion(contexto.aserradero_id, payload.orden_consumo_id, lotes)
        .await?;

    Ok((StatusCode::CREATED, Json(creados)))
}

// ---
// Payload: reubicar lote en el Kanban
// ---
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReubicarLotePayload {
    pub ubicacion: String,
}

pub async fn reubicar_lote(
    State(app_state): State<AppState>,
    contexto: ContextoAuth,
    _guard: RequierePermiso<CanManageSales>,
    Path(lote_id): Path<i64>,
    Json(payload): Json<ReubicarLotePayload>,
) -> Result<impl IntoResponse, AppError> {
    let lote = app_state
        .inventario_service
        .reubicar_lote(contexto.aserradero_id, lote_id, &payload.ubicacion)
        .await?;

    Ok((StatusCode::OK, Json(lote)))
}

// ---
// Payload: descontar piezas (venta o consumo interno)
// ---
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescontarPiezasPayload {
    pub piezas: i64,
}

pub async fn descontar_piezas(
    State(app_state): State<AppState>,
    contexto: ContextoAuth,
    _guard: RequierePermiso<CanManageSales>,
    Path(lote_id): Path<i64>,
    Json(payload): Json<DescontarPiezasPayload>,
) -> Result<impl IntoResponse, AppError> {
    let lote = app_state
        .inventario_service
        .descontar_piezas(contexto.aserradero_id, lote_id, payload.piezas)
        .await?;

    Ok((StatusCode::OK, Json(lote)))
}

// ---
// Handler: tablero Kanban activo
// ---
pub async fn listar_kanban(
    State(app_state): State<AppState>,
    contexto: ContextoAuth,
) -> Result<impl IntoResponse, AppError> {
    let lotes = app_state
        .inventario_service
        .listar_kanban(contexto.aserradero_id)
        .await?;

    Ok((StatusCode::OK, Json(lotes)))
}

// ---
// Payload: alta de producto de catálogo
// ---
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CrearProductoPayload {
    #[validate(length(min = 1, message = "La descripción es obligatoria."))]
    pub descripcion: String,

    #[validate(length(min = 1, message = "La especie es obligatoria."))]
    pub especie: String,

    #[validate(length(min = 1, message = "La calidad es obligatoria."))]
    pub calidad: String,

    // Variante A: madera aserrada
    #[validate(custom(function = "validar_no_negativo"))]
    pub grosor_pulgadas: Option<Decimal>,
    #[validate(custom(function = "validar_no_negativo"))]
    pub ancho_pulgadas: Option<Decimal>,
    #[validate(custom(function = "validar_no_negativo"))]
    pub largo_pies: Option<Decimal>,

    // Variante B: triplay
    #[validate(custom(function = "validar_no_negativo"))]
    pub espesor_mm: Option<Decimal>,
    #[validate(custom(function = "validar_no_negativo"))]
    pub ancho_ft: Option<Decimal>,
    #[validate(custom(function = "validar_no_negativo"))]
    pub largo_ft: Option<Decimal>,
}

pub async fn crear_producto(
    State(app_state): State<AppState>,
    contexto: ContextoAuth,
    _guard: RequierePermiso<CanManageAll>,
    Json(payload): Json<CrearProductoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let producto = app_state
        .inventario_service
        .crear_producto(
            contexto.aserradero_id,
            &payload.descripcion,
            &payload.especie,
            &payload.calidad,
            payload.grosor_pulgadas,
            payload.ancho_pulgadas,
            payload.largo_pies,
            payload.espesor_mm,
            payload.ancho_ft,
            payload.largo_ft,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(producto)))
}

pub async fn listar_productos(
    State(app_state): State<AppState>,
    contexto: ContextoAuth,
) -> Result<impl IntoResponse, AppError> {
    let productos = app_state
        .inventario_service
        .listar_productos(contexto.aserradero_id)
        .await?;

    Ok((StatusCode::OK, Json(productos)))
}

// src/models/precios.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// --- Precio base por especie/calidad ---
// Tarifa en moneda por pie tablar. El mayoreo es opcional; si falta o es
// cero, la cotización de mayoreo sale en cero.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PrecioBaseMadera {
    pub id: i64,
    pub aserradero_id: Uuid,
    pub especie: String,
    pub calidad: String,
    pub precio_pie_tablar: Decimal,
    pub precio_pie_tablar_mayoreo: Option<Decimal>,
    pub fecha_actualizacion: DateTime<Utc>,
}

// --- Resultado del cálculo puro (sin búsqueda de tarifa) ---
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculoPrecio {
    pub pies_tablares: Decimal,
    pub precio_menudeo: Decimal,
    pub precio_mayoreo: Decimal,
}

impl CalculoPrecio {
    pub fn cero() -> Self {
        Self {
            pies_tablares: Decimal::ZERO,
            precio_menudeo: Decimal::ZERO,
            precio_mayoreo: Decimal::ZERO,
        }
    }
}

// --- Cotización completa: cálculo + si hubo tarifa base ---
// `encontrado = false` significa "sin cotización disponible", no un error.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cotizacion {
    pub encontrado: bool,
    #[serde(flatten)]
    pub calculo: CalculoPrecio,
}

impl Cotizacion {
    pub fn sin_tarifa() -> Self {
        Self {
            encontrado: false,
            calculo: CalculoPrecio::cero(),
        }
    }
}

// src/models/inventario.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// --- 1. Remisión (entrada de madera en rollo) ---
// `m3_recibidos` queda en NULL hasta que el patio cubica físicamente la carga.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Remision {
    pub id: i64,
    pub aserradero_id: Uuid,
    pub folio: String,
    pub proveedor: Option<String>,
    pub especie: String,
    pub m3_declarados: Decimal,
    pub m3_recibidos: Option<Decimal>,
    pub notas: Option<String>,
    pub fecha_recepcion: DateTime<Utc>,
}

// --- 2. Orden de consumo ---
// Se crea una sola vez cuando la madera entra al aserrío; después es inmutable.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrdenConsumo {
    pub id: i64,
    pub aserradero_id: Uuid,
    pub remision_id: i64,
    pub m3_consumidos: Decimal,
    pub notas: Option<String>,
    pub fecha_consumo: DateTime<Utc>,
}

// --- 3. Catálogo de producto terminado ---
// Exactamente una variante de atributos por fila:
//   A) madera aserrada: grosor_pulgadas / ancho_pulgadas / largo_pies
//   B) triplay:         espesor_mm / ancho_ft / largo_ft
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductoCatalogo {
    pub id: i64,
    pub aserradero_id: Uuid,
    pub descripcion: String,
    pub especie: String,
    pub calidad: String,
    pub grosor_pulgadas: Option<Decimal>,
    pub ancho_pulgadas: Option<Decimal>,
    pub largo_pies: Option<Decimal>,
    pub espesor_mm: Option<Decimal>,
    pub ancho_ft: Option<Decimal>,
    pub largo_ft: Option<Decimal>,
    pub creado_en: DateTime<Utc>,
}

// --- 4. Lote de producto terminado (tarjeta del Kanban) ---
// `piezas_actuales` solo baja (venta/consumo); un lote en cero sale de la
// vista activa pero nunca se borra, para conservar el rastro.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StockProductoTerminado {
    pub id: i64,
    pub aserradero_id: Uuid,
    pub producto_id: i64,
    pub orden_consumo_id: Option<i64>,
    pub piezas_actuales: i64,
    pub ubicacion: String,
    pub fecha_ingreso: DateTime<Utc>,
}

// --- 5. Columnas del Kanban ---
// Conjunto cerrado y ordenado. Un lote solo avanza a la columna
// inmediatamente siguiente; nunca salta ni retrocede.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UbicacionKanban {
    Ingreso,
    Empacado,
    EnTransito,
    Vendido,
}

impl UbicacionKanban {
    pub const COLUMNAS: [UbicacionKanban; 4] = [
        UbicacionKanban::Ingreso,
        UbicacionKanban::Empacado,
        UbicacionKanban::EnTransito,
        UbicacionKanban::Vendido,
    ];

    /// Etiqueta tal como se persiste y como la ve el aserradero.
    pub fn as_str(&self) -> &'static str {
        match self {
            UbicacionKanban::Ingreso => "ingreso",
            UbicacionKanban::Empacado => "empacado",
            UbicacionKanban::EnTransito => "en_transito",
            UbicacionKanban::Vendido => "vendido",
        }
    }

    pub fn parse(etiqueta: &str) -> Option<Self> {
        Self::COLUMNAS.iter().copied().find(|c| c.as_str() == etiqueta)
    }

    /// La única transición legal. `None` en la columna terminal.
    pub fn siguiente(&self) -> Option<Self> {
        let pos = Self::COLUMNAS.iter().position(|c| c == self)?;
        Self::COLUMNAS.get(pos + 1).copied()
    }
}

impl std::fmt::Display for UbicacionKanban {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn el_kanban_avanza_en_orden_fijo() {
        assert_eq!(
            UbicacionKanban::Ingreso.siguiente(),
            Some(UbicacionKanban::Empacado)
        );
        assert_eq!(
            UbicacionKanban::Empacado.siguiente(),
            Some(UbicacionKanban::EnTransito)
        );
        assert_eq!(
            UbicacionKanban::EnTransito.siguiente(),
            Some(UbicacionKanban::Vendido)
        );
    }

    #[test]
    fn la_columna_terminal_no_tiene_siguiente() {
        assert_eq!(UbicacionKanban::Vendido.siguiente(), None);
    }

    #[test]
    fn parse_solo_acepta_el_conjunto_cerrado() {
        assert_eq!(
            UbicacionKanban::parse("en_transito"),
            Some(UbicacionKanban::EnTransito)
        );
        assert_eq!(UbicacionKanban::parse("bodega"), None);
        assert_eq!(UbicacionKanban::parse("INGRESO"), None);
    }

    #[test]
    fn cada_columna_se_recupera_desde_su_etiqueta() {
        for columna in UbicacionKanban::COLUMNAS {
            assert_eq!(UbicacionKanban::parse(columna.as_str()), Some(columna));
        }
    }
}

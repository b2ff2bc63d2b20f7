// src/models/ajustes.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// --- Tipo de saldo sobre el que se ajusta el patio ---
// Conjunto cerrado: el saldo físico (lo cubicado en el patio) o el
// documentado (lo que dicen las remisiones).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoSaldo {
    Fisico,
    Documentado,
}

impl TipoSaldo {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipoSaldo::Fisico => "FISICO",
            TipoSaldo::Documentado => "DOCUMENTADO",
        }
    }

    pub fn parse(etiqueta: &str) -> Option<Self> {
        match etiqueta {
            "FISICO" => Some(TipoSaldo::Fisico),
            "DOCUMENTADO" => Some(TipoSaldo::Documentado),
            _ => None,
        }
    }
}

// --- Ajuste manual de patio ---
// Libro de solo-inserción: no existe actualización ni borrado para esta
// entidad. Queda firmado por el usuario que lo capturó.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AjustePatio {
    pub id: i64,
    pub aserradero_id: Uuid,
    pub usuario_id: Uuid,
    pub tipo_saldo: String,
    pub tipo_ajuste: String,
    pub volumen_m3: Decimal,
    pub notas: Option<String>,
    pub creado_en: DateTime<Utc>,
}

// --- Bitácora de ajustes de inventario ---
// Auditoría de vida más larga; la depuración mensual elimina las filas con
// más de 3 meses de antigüedad.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AjusteInventario {
    pub id: i64,
    pub aserradero_id: Uuid,
    pub usuario_id: Uuid,
    pub detalle: String,
    pub creado_en: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tipo_saldo_es_un_conjunto_cerrado() {
        assert_eq!(TipoSaldo::parse("FISICO"), Some(TipoSaldo::Fisico));
        assert_eq!(TipoSaldo::parse("DOCUMENTADO"), Some(TipoSaldo::Documentado));
        assert_eq!(TipoSaldo::parse("fisico"), None);
        assert_eq!(TipoSaldo::parse("CONTABLE"), None);
    }
}

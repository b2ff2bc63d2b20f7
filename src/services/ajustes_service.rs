// src/services/ajustes_service.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::AjustesRepository,
    models::ajustes::{AjustePatio, TipoSaldo},
};

#[derive(Clone)]
pub struct AjustesService {
    ajustes_repo: AjustesRepository,
}

impl AjustesService {
    pub fn new(ajustes_repo: AjustesRepository) -> Self {
        Self { ajustes_repo }
    }

    /// Registra un ajuste manual de patio y su rastro en la bitácora de
    /// inventario, en una sola transacción. El libro de ajustes es de
    /// solo-inserción: aquí no existe actualizar ni borrar.
    pub async fn registrar_ajuste_patio(
        &self,
        aserradero_id: Uuid,
        usuario_id: Uuid,
        tipo_saldo: &str,
        tipo_ajuste: &str,
        volumen_m3: Option<Decimal>,
        notas: Option<&str>,
    ) -> Result<AjustePatio, AppError> {
        let tipo = TipoSaldo::parse(tipo_saldo).ok_or_else(|| {
            AppError::InvalidInput(
                "El campo 'tipoSaldo' debe ser FISICO o DOCUMENTADO.".to_string(),
            )
        })?;
        let volumen = volumen_m3.ok_or_else(|| {
            AppError::InvalidInput("El campo 'volumenM3' es obligatorio y numérico.".to_string())
        })?;

        let mut tx = self.ajustes_repo.pool().begin().await?;

        let ajuste = self
            .ajustes_repo
            .crear_ajuste_patio(
                &mut *tx,
                aserradero_id,
                usuario_id,
                tipo.as_str(),
                tipo_ajuste,
                volumen,
                notas,
            )
            .await?;

        let detalle = format!(
            "Ajuste de patio ({}) tipo '{}': {} m3",
            tipo.as_str(),
            tipo_ajuste,
            volumen
        );
        self.ajustes_repo
            .crear_ajuste_inventario(&mut *tx, aserradero_id, usuario_id, &detalle)
            .await?;

        tx.commit().await?;
        Ok(ajuste)
    }

    pub async fn listar_ajustes_patio(
        &self,
        aserradero_id: Uuid,
    ) -> Result<Vec<AjustePatio>, AppError> {
        self.ajustes_repo
            .listar_ajustes_patio(self.ajustes_repo.pool(), aserradero_id)
            .await
    }

    /// Barrido de retención sobre la bitácora. Idempotente: volver a correr
    /// con el mismo corte reporta cero eliminaciones.
    pub async fn depurar_bitacora(&self, corte: DateTime<Utc>) -> Result<u64, AppError> {
        let eliminadas = self
            .ajustes_repo
            .depurar_anteriores_a(self.ajustes_repo.pool(), corte)
            .await?;
        tracing::info!(
            "Depuración de bitácora: {} filas anteriores a {} eliminadas.",
            eliminadas,
            corte
        );
        Ok(eliminadas)
    }
}

// src/services/inventario_service.rs

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::InventarioRepository,
    models::inventario::{
        OrdenConsumo, ProductoCatalogo, Remision, StockProductoTerminado, UbicacionKanban,
    },
};

/// Un lote a crear durante el registro de producción.
#[derive(Debug, Clone)]
pub struct LoteNuevo {
    pub producto_id: i64,
    pub piezas: i64,
}

#[derive(Clone)]
pub struct InventarioService {
    inventario_repo: InventarioRepository,
}

impl InventarioService {
    pub fn new(inventario_repo: InventarioRepository) -> Self {
        Self { inventario_repo }
    }

    // --- REMISIONES (entrada de madera en rollo) ---

    pub async fn registrar_remision(
        &self,
        aserradero_id: Uuid,
        folio: &str,
        proveedor: Option<&str>,
        especie: &str,
        m3_declarados: Decimal,
        notas: Option<&str>,
    ) -> Result<Remision, AppError> {
        self.inventario_repo
            .crear_remision(
                self.inventario_repo.pool(),
                aserradero_id,
                folio,
                proveedor,
                especie,
                m3_declarados,
                notas,
            )
            .await
    }

    /// Corrige los m3 recibidos una vez cubicada la carga en el patio.
    /// No toca las órdenes de consumo ya registradas aguas abajo.
    pub async fn corregir_medicion(
        &self,
        aserradero_id: Uuid,
        remision_id: i64,
        m3_recibidos: Option<Decimal>,
    ) -> Result<Remision, AppError> {
        let m3 = m3_recibidos.ok_or_else(|| {
            AppError::InvalidInput("El campo 'm3Recibidos' es obligatorio.".to_string())
        })?;
        if m3 < Decimal::ZERO {
            return Err(AppError::InvalidInput(
                "El campo 'm3Recibidos' no puede ser negativo.".to_string(),
            ));
        }

        self.inventario_repo
            .actualizar_m3_recibidos(self.inventario_repo.pool(), aserradero_id, remision_id, m3)
            .await?
            .ok_or(AppError::NotFound("Remisión"))
    }

    // --- CONSUMO (madera en rollo hacia el aserrío) ---

    // Nota: no se valida que el consumo acumulado no rebase los m3 de la
    // remisión. El patio opera con holgura y el producto no ha confirmado
    // esa regla de conservación.
    pub async fn registrar_consumo(
        &self,
        aserradero_id: Uuid,
        remision_id: i64,
        m3_consumidos: Decimal,
        notas: Option<&str>,
    ) -> Result<OrdenConsumo, AppError> {
        self.inventario_repo
            .buscar_remision(self.inventario_repo.pool(), aserradero_id, remision_id)
            .await?
            .ok_or(AppError::NotFound("Remisión"))?;

        self.inventario_repo
            .crear_orden_consumo(
                self.inventario_repo.pool(),
                aserradero_id,
                remision_id,
                m3_consumidos,
                notas,
            )
            .await
    }

    // --- PRODUCCIÓN (lotes nuevos al Kanban) ---

    /// Crea todos los lotes de una corrida de producción en una sola
    /// transacción: o entran todos al Kanban o no entra ninguno. Cada lote
    /// nace en la columna de ingreso.
    pub async fn registrar_produccion(
        &self,
        aserradero_id: Uuid,
        orden_consumo_id: i64,
        lotes: Vec<LoteNuevo>,
    ) -> Result<Vec<StockProductoTerminado>, AppError> {
        if lotes.is_empty() {
            return Err(AppError::InvalidInput(
                "Una producción debe traer al menos un lote.".to_string(),
            ));
        }
        for lote in &lotes {
            if lote.piezas <= 0 {
                return Err(AppError::InvalidInput(
                    "Cada lote debe traer un número de piezas mayor que cero.".to_string(),
                ));
            }
        }

        let mut tx = self.inventario_repo.pool().begin().await?;

        self.inventario_repo
            .buscar_orden_consumo(&mut *tx, aserradero_id, orden_consumo_id)
            .await?
            .ok_or(AppError::NotFound("Orden de consumo"))?;

        let mut creados = Vec::with_capacity(lotes.len());
        for lote in &lotes {
            self.inventario_repo
                .buscar_producto(&mut *tx, aserradero_id, lote.producto_id)
                .await?
                .ok_or(AppError::NotFound("Producto de catálogo"))?;

            let creado = self
                .inventario_repo
                .crear_lote(
                    &mut *tx,
                    aserradero_id,
                    lote.producto_id,
                    Some(orden_consumo_id),
                    lote.piezas,
                    UbicacionKanban::Ingreso.as_str(),
                )
                .await?;
            creados.push(creado);
        }

        // Si algo falló arriba, el rollback es automático al soltar `tx`.
        tx.commit().await?;
        Ok(creados)
    }

    // --- KANBAN ---

    /// Mueve un lote a la columna inmediatamente siguiente. Saltarse una
    /// columna o retroceder es una transición ilegal.
    pub async fn reubicar_lote(
        &self,
        aserradero_id: Uuid,
        lote_id: i64,
        nueva_ubicacion: &str,
    ) -> Result<StockProductoTerminado, AppError> {
        let mut tx = self.inventario_repo.pool().begin().await?;

        let lote = self
            .inventario_repo
            .buscar_lote_para_actualizar(&mut *tx, aserradero_id, lote_id)
            .await?
            .ok_or(AppError::NotFound("Lote"))?;

        let destino = UbicacionKanban::parse(nueva_ubicacion).ok_or_else(|| {
            AppError::InvalidTransition {
                de: lote.ubicacion.clone(),
                a: nueva_ubicacion.to_string(),
            }
        })?;

        let actual = UbicacionKanban::parse(&lote.ubicacion).ok_or_else(|| {
            anyhow::anyhow!("Ubicación persistida fuera del conjunto: {}", lote.ubicacion)
        })?;

        if actual.siguiente() != Some(destino) {
            return Err(AppError::InvalidTransition {
                de: lote.ubicacion.clone(),
                a: nueva_ubicacion.to_string(),
            });
        }

        let actualizado = self
            .inventario_repo
            .actualizar_ubicacion(&mut *tx, aserradero_id, lote_id, destino.as_str())
            .await?;

        tx.commit().await?;
        Ok(actualizado)
    }

    /// Descuenta piezas de un lote (venta o consumo interno). El descuento
    /// es condicional en el almacenamiento: dos descuentos concurrentes se
    /// serializan ahí y `piezas_actuales` nunca queda negativo.
    pub async fn descontar_piezas(
        &self,
        aserradero_id: Uuid,
        lote_id: i64,
        piezas: i64,
    ) -> Result<StockProductoTerminado, AppError> {
        if piezas <= 0 {
            return Err(AppError::InvalidInput(
                "El número de piezas a descontar debe ser mayor que cero.".to_string(),
            ));
        }

        let descontado = self
            .inventario_repo
            .descontar_piezas(self.inventario_repo.pool(), aserradero_id, lote_id, piezas)
            .await?;

        match descontado {
            Some(lote) => Ok(lote),
            // La condición no aplicó: o el lote no existe bajo este tenant,
            // o no alcanzan las piezas. Distinguimos con una relectura.
            None => {
                let lote = self
                    .inventario_repo
                    .buscar_lote(self.inventario_repo.pool(), aserradero_id, lote_id)
                    .await?
                    .ok_or(AppError::NotFound("Lote"))?;
                Err(AppError::InsufficientStock {
                    solicitadas: piezas,
                    disponibles: lote.piezas_actuales,
                })
            }
        }
    }

    /// Tablero activo del tenant: lotes con piezas, FIFO por fecha de
    /// ingreso. La vista es quien agrupa por columna.
    pub async fn listar_kanban(
        &self,
        aserradero_id: Uuid,
    ) -> Result<Vec<StockProductoTerminado>, AppError> {
        self.inventario_repo
            .listar_kanban(self.inventario_repo.pool(), aserradero_id)
            .await
    }

    // --- CATÁLOGO ---

    /// Alta de una entrada de catálogo. Exactamente una variante de
    /// atributos debe venir completa: madera aserrada o triplay.
    #[allow(clippy::too_many_arguments)]
    pub async fn crear_producto(
        &self,
        aserradero_id: Uuid,
        descripcion: &str,
        especie: &str,
        calidad: &str,
        grosor_pulgadas: Option<Decimal>,
        ancho_pulgadas: Option<Decimal>,
        largo_pies: Option<Decimal>,
        espesor_mm: Option<Decimal>,
        ancho_ft: Option<Decimal>,
        largo_ft: Option<Decimal>,
    ) -> Result<ProductoCatalogo, AppError> {
        let madera = [&grosor_pulgadas, &ancho_pulgadas, &largo_pies];
        let triplay = [&espesor_mm, &ancho_ft, &largo_ft];

        let madera_completa = madera.iter().all(|v| v.is_some());
        let madera_presente = madera.iter().any(|v| v.is_some());
        let triplay_completo = triplay.iter().all(|v| v.is_some());
        let triplay_presente = triplay.iter().any(|v| v.is_some());

        let variante_valida = (madera_completa && !triplay_presente)
            || (triplay_completo && !madera_presente);
        if !variante_valida {
            return Err(AppError::InvalidInput(
                "El producto debe traer completa una sola variante de atributos: \
                 madera aserrada (grosorPulgadas, anchoPulgadas, largoPies) o \
                 triplay (espesorMm, anchoFt, largoFt)."
                    .to_string(),
            ));
        }

        self.inventario_repo
            .crear_producto(
                self.inventario_repo.pool(),
                aserradero_id,
                descripcion,
                especie,
                calidad,
                grosor_pulgadas,
                ancho_pulgadas,
                largo_pies,
                espesor_mm,
                ancho_ft,
                largo_ft,
            )
            .await
    }

    pub async fn listar_productos(
        &self,
        aserradero_id: Uuid,
    ) -> Result<Vec<ProductoCatalogo>, AppError> {
        self.inventario_repo
            .listar_productos(self.inventario_repo.pool(), aserradero_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn servicio() -> InventarioService {
        // Estas validaciones fallan antes de tocar la base; la pool es
        // perezosa y nunca se conecta.
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/no_usado")
            .unwrap();
        InventarioService::new(InventarioRepository::new(pool))
    }

    fn tenant() -> Uuid {
        Uuid::new_v4()
    }

    fn d(s: &str) -> Decimal {
        Decimal::from_str_exact(s).unwrap()
    }

    #[tokio::test]
    async fn corregir_medicion_sin_volumen_es_entrada_invalida() {
        let resultado = servicio().corregir_medicion(tenant(), 1, None).await;
        assert!(matches!(resultado, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn corregir_medicion_con_volumen_negativo_es_entrada_invalida() {
        let resultado = servicio()
            .corregir_medicion(tenant(), 1, Some(d("-3.25")))
            .await;
        assert!(matches!(resultado, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn una_produccion_sin_lotes_es_entrada_invalida() {
        let resultado = servicio()
            .registrar_produccion(tenant(), 1, Vec::new())
            .await;
        assert!(matches!(resultado, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn un_lote_sin_piezas_es_entrada_invalida() {
        let lotes = vec![
            LoteNuevo { producto_id: 1, piezas: 10 },
            LoteNuevo { producto_id: 2, piezas: 0 },
        ];
        let resultado = servicio().registrar_produccion(tenant(), 1, lotes).await;
        assert!(matches!(resultado, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn descontar_cero_piezas_es_entrada_invalida() {
        let resultado = servicio().descontar_piezas(tenant(), 1, 0).await;
        assert!(matches!(resultado, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn un_producto_con_variantes_mezcladas_es_entrada_invalida() {
        // Madera aserrada completa, pero con un atributo de triplay colado.
        let resultado = servicio()
            .crear_producto(
                tenant(),
                "Tabla de pino",
                "pino",
                "primera",
                Some(d("2")),
                Some(d("6")),
                Some(d("8")),
                Some(d("15")),
                None,
                None,
            )
            .await;
        assert!(matches!(resultado, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn un_producto_con_variante_incompleta_es_entrada_invalida() {
        // Solo el grosor, sin ancho ni largo.
        let resultado = servicio()
            .crear_producto(
                tenant(),
                "Tabla de pino",
                "pino",
                "primera",
                Some(d("2")),
                None,
                None,
                None,
                None,
                None,
            )
            .await;
        assert!(matches!(resultado, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn un_producto_sin_atributos_es_entrada_invalida() {
        let resultado = servicio()
            .crear_producto(
                tenant(),
                "Tabla de pino",
                "pino",
                "primera",
                None,
                None,
                None,
                None,
                None,
                None,
            )
            .await;
        assert!(matches!(resultado, Err(AppError::InvalidInput(_))));
    }
}

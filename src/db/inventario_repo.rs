// src/db/inventario_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::inventario::{OrdenConsumo, ProductoCatalogo, Remision, StockProductoTerminado},
};

// Repositorio del libro de inventario: remisiones, órdenes de consumo,
// catálogo y lotes de producto terminado. TODA consulta va filtrada por
// aserradero_id; una fila de otro tenant simplemente no existe para el
// que llama.
#[derive(Clone)]
pub struct InventarioRepository {
    pool: PgPool,
}

impl InventarioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // ---
    // Remisiones
    // ---

    pub async fn crear_remision<'e, E>(
        &self,
        executor: E,
        aserradero_id: Uuid,
        folio: &str,
        proveedor: Option<&str>,
        especie: &str,
        m3_declarados: Decimal,
        notas: Option<&str>,
    ) -> Result<Remision, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let remision = sqlx::query_as::<_, Remision>(
            r#"
            INSERT INTO remisiones (aserradero_id, folio, proveedor, especie, m3_declarados, notas)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(aserradero_id)
        .bind(folio)
        .bind(proveedor)
        .bind(especie)
        .bind(m3_declarados)
        .bind(notas)
        .fetch_one(executor)
        .await?;
        Ok(remision)
    }

    pub async fn buscar_remision<'e, E>(
        &self,
        executor: E,
        aserradero_id: Uuid,
        remision_id: i64,
    ) -> Result<Option<Remision>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let remision = sqlx::query_as::<_, Remision>(
            "SELECT * FROM remisiones WHERE id = $1 AND aserradero_id = $2",
        )
        .bind(remision_id)
        .bind(aserradero_id)
        .fetch_optional(executor)
        .await?;
        Ok(remision)
    }

    /// Sobrescribe los m3 cubicados en el patio. Idempotente: repetir la
    /// misma llamada converge al mismo valor almacenado.
    pub async fn actualizar_m3_recibidos<'e, E>(
        &self,
        executor: E,
        aserradero_id: Uuid,
        remision_id: i64,
        m3_recibidos: Decimal,
    ) -> Result<Option<Remision>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let remision = sqlx::query_as::<_, Remision>(
            r#"
            UPDATE remisiones
            SET m3_recibidos = $3
            WHERE id = $1 AND aserradero_id = $2
            RETURNING *
            "#,
        )
        .bind(remision_id)
        .bind(aserradero_id)
        .bind(m3_recibidos)
        .fetch_optional(executor)
        .await?;
        Ok(remision)
    }

    // ---
    // Órdenes de consumo
    // ---

    pub async fn crear_orden_consumo<'e, E>(
        &self,
        executor: E,
        aserradero_id: Uuid,
        remision_id: i64,
        m3_consumidos: Decimal,
        notas: Option<&str>,
    ) -> Result<OrdenConsumo, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let orden = sqlx::query_as::<_, OrdenConsumo>(
            r#"
            INSERT INTO ordenes_consumo (aserradero_id, remision_id, m3_consumidos, notas)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(aserradero_id)
        .bind(remision_id)
        .bind(m3_consumidos)
        .bind(notas)
        .fetch_one(executor)
        .await?;
        Ok(orden)
    }

    pub async fn buscar_orden_consumo<'e, E>(
        &self,
        executor: E,
        aserradero_id: Uuid,
        orden_id: i64,
    ) -> Result<Option<OrdenConsumo>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let orden = sqlx::query_as::<_, OrdenConsumo>(
            "SELECT * FROM ordenes_consumo WHERE id = $1 AND aserradero_id = $2",
        )
        .bind(orden_id)
        .bind(aserradero_id)
        .fetch_optional(executor)
        .await?;
        Ok(orden)
    }

    // ---
    // Catálogo de producto
    // ---

    #[allow(clippy::too_many_arguments)]
    pub async fn crear_producto<'e, E>(
        &self,
        executor: E,
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
    ) -> Result<ProductoCatalogo, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let producto = sqlx::query_as::<_, ProductoCatalogo>(
            r#"
            INSERT INTO productos_catalogo
                (aserradero_id, descripcion, especie, calidad,
                 grosor_pulgadas, ancho_pulgadas, largo_pies,
                 espesor_mm, ancho_ft, largo_ft)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(aserradero_id)
        .bind(descripcion)
        .bind(especie)
        .bind(calidad)
        .bind(grosor_pulgadas)
        .bind(ancho_pulgadas)
        .bind(largo_pies)
        .bind(espesor_mm)
        .bind(ancho_ft)
        .bind(largo_ft)
        .fetch_one(executor)
        .await?;
        Ok(producto)
    }

    pub async fn listar_productos<'e, E>(
        &self,
        executor: E,
        aserradero_id: Uuid,
    ) -> Result<Vec<ProductoCatalogo>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let productos = sqlx::query_as::<_, ProductoCatalogo>(
            "SELECT * FROM productos_catalogo WHERE aserradero_id = $1 ORDER BY descripcion ASC",
        )
        .bind(aserradero_id)
        .fetch_all(executor)
        .await?;
        Ok(productos)
    }

    pub async fn buscar_producto<'e, E>(
        &self,
        executor: E,
        aserradero_id: Uuid,
        producto_id: i64,
    ) -> Result<Option<ProductoCatalogo>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let producto = sqlx::query_as::<_, ProductoCatalogo>(
            "SELECT * FROM productos_catalogo WHERE id = $1 AND aserradero_id = $2",
        )
        .bind(producto_id)
        .bind(aserradero_id)
        .fetch_optional(executor)
        .await?;
        Ok(producto)
    }

    // ---
    // Lotes de producto terminado
    // ---

    pub async fn crear_lote<'e, E>(
        &self,
        executor: E,
        aserradero_id: Uuid,
        producto_id: i64,
        orden_consumo_id: Option<i64>,
        piezas: i64,
        ubicacion: &str,
    ) -> Result<StockProductoTerminado, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lote = sqlx::query_as::<_, StockProductoTerminado>(
            r#"
            INSERT INTO stock_producto_terminado
                (aserradero_id, producto_id, orden_consumo_id, piezas_actuales, ubicacion)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(aserradero_id)
        .bind(producto_id)
        .bind(orden_consumo_id)
        .bind(piezas)
        .bind(ubicacion)
        .fetch_one(executor)
        .await?;
        Ok(lote)
    }

    pub async fn buscar_lote<'e, E>(
        &self,
        executor: E,
        aserradero_id: Uuid,
        lote_id: i64,
    ) -> Result<Option<StockProductoTerminado>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lote = sqlx::query_as::<_, StockProductoTerminado>(
            "SELECT * FROM stock_producto_terminado WHERE id = $1 AND aserradero_id = $2",
        )
        .bind(lote_id)
        .bind(aserradero_id)
        .fetch_optional(executor)
        .await?;
        Ok(lote)
    }

    /// Lee el lote con bloqueo de fila. Relocalizaciones concurrentes sobre
    /// el mismo lote se serializan en el almacenamiento, no en el proceso.
    pub async fn buscar_lote_para_actualizar<'e, E>(
        &self,
        executor: E,
        aserradero_id: Uuid,
        lote_id: i64,
    ) -> Result<Option<StockProductoTerminado>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lote = sqlx::query_as::<_, StockProductoTerminado>(
            "SELECT * FROM stock_producto_terminado WHERE id = $1 AND aserradero_id = $2 FOR UPDATE",
        )
        .bind(lote_id)
        .bind(aserradero_id)
        .fetch_optional(executor)
        .await?;
        Ok(lote)
    }

    pub async fn actualizar_ubicacion<'e, E>(
        &self,
        executor: E,
        aserradero_id: Uuid,
        lote_id: i64,
        ubicacion: &str,
    ) -> Result<StockProductoTerminado, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lote = sqlx::query_as::<_, StockProductoTerminado>(
            r#"
            UPDATE stock_producto_terminado
            SET ubicacion = $3
            WHERE id = $1 AND aserradero_id = $2
            RETURNING *
            "#,
        )
        .bind(lote_id)
        .bind(aserradero_id)
        .bind(ubicacion)
        .fetch_one(executor)
        .await?;
        Ok(lote)
    }

    /// Descuento condicional y atómico: solo aplica si hay piezas
    /// suficientes, así `piezas_actuales` nunca baja de cero ni bajo
    /// carrera. Devuelve `None` si la condición no se cumplió.
    pub async fn descontar_piezas<'e, E>(
        &self,
        executor: E,
        aserradero_id: Uuid,
        lote_id: i64,
        piezas: i64,
    ) -> Result<Option<StockProductoTerminado>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lote = sqlx::query_as::<_, StockProductoTerminado>(
            r#"
            UPDATE stock_producto_terminado
            SET piezas_actuales = piezas_actuales - $3
            WHERE id = $1 AND aserradero_id = $2 AND piezas_actuales >= $3
            RETURNING *
            "#,
        )
        .bind(lote_id)
        .bind(aserradero_id)
        .bind(piezas)
        .fetch_optional(executor)
        .await?;
        Ok(lote)
    }

    /// Vista activa del Kanban: lotes con piezas, del más viejo al más
    /// nuevo (FIFO). Agrupar por columna es trabajo de la capa de vista.
    pub async fn listar_kanban<'e, E>(
        &self,
        executor: E,
        aserradero_id: Uuid,
    ) -> Result<Vec<StockProductoTerminado>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lotes = sqlx::query_as::<_, StockProductoTerminado>(
            r#"
            SELECT * FROM stock_producto_terminado
            WHERE aserradero_id = $1 AND piezas_actuales > 0
            ORDER BY fecha_ingreso ASC
            "#,
        )
        .bind(aserradero_id)
        .fetch_all(executor)
        .await?;
        Ok(lotes)
    }
}

// src/db/precios_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::precios::PrecioBaseMadera};

#[derive(Clone)]
pub struct PreciosRepository {
    pool: PgPool,
}

impl PreciosRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Alta de una tarifa base. El par especie/calidad es único por
    /// aserradero; un duplicado es un Conflict, no un error interno.
    pub async fn crear_precio_base<'e, E>(
        &self,
        executor: E,
        aserradero_id: Uuid,
        especie: &str,
        calidad: &str,
        precio_pie_tablar: Decimal,
        precio_pie_tablar_mayoreo: Option<Decimal>,
    ) -> Result<PrecioBaseMadera, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, PrecioBaseMadera>(
            r#"
            INSERT INTO precios_base_madera
                (aserradero_id, especie, calidad, precio_pie_tablar, precio_pie_tablar_mayoreo)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(aserradero_id)
        .bind(especie)
        .bind(calidad)
        .bind(precio_pie_tablar)
        .bind(precio_pie_tablar_mayoreo)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::Conflict(format!(
                        "Ya existe un precio base para {} / {}.",
                        especie, calidad
                    ));
                }
            }
            e.into()
        })
    }

    /// Actualiza las tarifas y sella `fecha_actualizacion`.
    pub async fn actualizar_precio_base<'e, E>(
        &self,
        executor: E,
        aserradero_id: Uuid,
        precio_id: i64,
        precio_pie_tablar: Decimal,
        precio_pie_tablar_mayoreo: Option<Decimal>,
    ) -> Result<Option<PrecioBaseMadera>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let precio = sqlx::query_as::<_, PrecioBaseMadera>(
            r#"
            UPDATE precios_base_madera
            SET precio_pie_tablar = $3,
                precio_pie_tablar_mayoreo = $4,
                fecha_actualizacion = now()
            WHERE id = $1 AND aserradero_id = $2
            RETURNING *
            "#,
        )
        .bind(precio_id)
        .bind(aserradero_id)
        .bind(precio_pie_tablar)
        .bind(precio_pie_tablar_mayoreo)
        .fetch_optional(executor)
        .await?;
        Ok(precio)
    }

    pub async fn listar_precios_base<'e, E>(
        &self,
        executor: E,
        aserradero_id: Uuid,
    ) -> Result<Vec<PrecioBaseMadera>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let precios = sqlx::query_as::<_, PrecioBaseMadera>(
            "SELECT * FROM precios_base_madera WHERE aserradero_id = $1 ORDER BY especie, calidad",
        )
        .bind(aserradero_id)
        .fetch_all(executor)
        .await?;
        Ok(precios)
    }

    /// Candidatas para una cotización: especie igual (sin distinguir
    /// mayúsculas). El filtrado por calidad (subcadena) lo hace el servicio.
    pub async fn buscar_por_especie<'e, E>(
        &self,
        executor: E,
        aserradero_id: Uuid,
        especie: &str,
    ) -> Result<Vec<PrecioBaseMadera>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let precios = sqlx::query_as::<_, PrecioBaseMadera>(
            r#"
            SELECT * FROM precios_base_madera
            WHERE aserradero_id = $1 AND LOWER(especie) = LOWER($2)
            ORDER BY fecha_actualizacion DESC
            "#,
        )
        .bind(aserradero_id)
        .bind(especie)
        .fetch_all(executor)
        .await?;
        Ok(precios)
    }
}

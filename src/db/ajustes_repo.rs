// src/db/ajustes_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::ajustes::{AjusteInventario, AjustePatio},
};

// Repositorio de los libros de ajuste. Ambas tablas son de solo-inserción;
// la única eliminación que existe es la depuración por antigüedad de
// 'ajustes_inventario'.
#[derive(Clone)]
pub struct AjustesRepository {
    pool: PgPool,
}

impl AjustesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn crear_ajuste_patio<'e, E>(
        &self,
        executor: E,
        aserradero_id: Uuid,
        usuario_id: Uuid,
        tipo_saldo: &str,
        tipo_ajuste: &str,
        volumen_m3: Decimal,
        notas: Option<&str>,
    ) -> Result<AjustePatio, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ajuste = sqlx::query_as::<_, AjustePatio>(
            r#"
            INSERT INTO ajustes_patio
                (aserradero_id, usuario_id, tipo_saldo, tipo_ajuste, volumen_m3, notas)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(aserradero_id)
        .bind(usuario_id)
        .bind(tipo_saldo)
        .bind(tipo_ajuste)
        .bind(volumen_m3)
        .bind(notas)
        .fetch_one(executor)
        .await?;
        Ok(ajuste)
    }

    pub async fn listar_ajustes_patio<'e, E>(
        &self,
        executor: E,
        aserradero_id: Uuid,
    ) -> Result<Vec<AjustePatio>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ajustes = sqlx::query_as::<_, AjustePatio>(
            "SELECT * FROM ajustes_patio WHERE aserradero_id = $1 ORDER BY creado_en DESC",
        )
        .bind(aserradero_id)
        .fetch_all(executor)
        .await?;
        Ok(ajustes)
    }

    pub async fn crear_ajuste_inventario<'e, E>(
        &self,
        executor: E,
        aserradero_id: Uuid,
        usuario_id: Uuid,
        detalle: &str,
    ) -> Result<AjusteInventario, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ajuste = sqlx::query_as::<_, AjusteInventario>(
            r#"
            INSERT INTO ajustes_inventario (aserradero_id, usuario_id, detalle)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(aserradero_id)
        .bind(usuario_id)
        .bind(detalle)
        .fetch_one(executor)
        .await?;
        Ok(ajuste)
    }

    /// Borra las filas de la bitácora estrictamente anteriores al corte y
    /// reporta cuántas se fueron. Correrlo dos veces con el mismo corte
    /// borra cero la segunda vez.
    pub async fn depurar_anteriores_a<'e, E>(
        &self,
        executor: E,
        corte: DateTime<Utc>,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let resultado = sqlx::query("DELETE FROM ajustes_inventario WHERE creado_en < $1")
            .bind(corte)
            .execute(executor)
            .await?;
        Ok(resultado.rows_affected())
    }
}

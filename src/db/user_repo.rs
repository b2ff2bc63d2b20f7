// src/db/user_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::auth::Usuario};

// El repositorio de usuarios, responsable de la tabla 'usuarios' y de la
// relación muchos-a-muchos con 'roles'.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca un usuario por su correo
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Usuario>, AppError> {
        let maybe_user = sqlx::query_as::<_, Usuario>(
            r#"
            SELECT id, aserradero_id, email, password_hash, creado_en, actualizado_en
            FROM usuarios
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    // Roles planos del usuario (admin, vendedor, trabajador)
    pub async fn roles_de_usuario(&self, usuario_id: Uuid) -> Result<Vec<String>, AppError> {
        let roles = sqlx::query_scalar::<_, String>(
            r#"
            SELECT r.nombre
            FROM roles r
            JOIN usuario_roles ur ON ur.rol_id = r.id
            WHERE ur.usuario_id = $1
            ORDER BY r.nombre ASC
            "#,
        )
        .bind(usuario_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(roles)
    }
}

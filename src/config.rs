// src/config.rs

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{AjustesRepository, InventarioRepository, PreciosRepository, UserRepository},
    services::{
        ajustes_service::AjustesService, auth::AuthService,
        inventario_service::InventarioService, precios_service::PreciosService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    // Secreto compartido del disparador de cron. Puede faltar: en ese caso
    // el disparador rechaza todo.
    pub cron_secret: Option<String>,
    pub auth_service: AuthService,
    pub inventario_service: InventarioService,
    pub precios_service: PreciosService,
    pub ajustes_service: AjustesService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL debe estar definida")?;

        // El secreto JWT NO tumba el arranque si falta: es una falla de
        // configuración que se registra, y toda credencial se rechaza.
        let jwt_secret = env::var("JWT_SECRET").ok();
        if jwt_secret.is_none() {
            tracing::error!("JWT_SECRET no está definido: toda credencial será rechazada.");
        }

        let cron_secret = env::var("CRON_SECRET").ok();

        // Conecta a la base de datos, usando '?' para propagar errores
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexión con la base de datos establecida con éxito!");

        // --- Arma el grafo de dependencias ---
        // Nada de estado global: los repositorios se construyen una vez y
        // se inyectan en los servicios.
        let user_repo = UserRepository::new(db_pool.clone());
        let inventario_repo = InventarioRepository::new(db_pool.clone());
        let precios_repo = PreciosRepository::new(db_pool.clone());
        let ajustes_repo = AjustesRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, jwt_secret);
        let inventario_service = InventarioService::new(inventario_repo);
        let precios_service = PreciosService::new(precios_repo);
        let ajustes_service = AjustesService::new(ajustes_repo);

        Ok(Self {
            db_pool,
            cron_secret,
            auth_service,
            inventario_service,
            precios_service,
            ajustes_service,
        })
    }
}

// src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;

// Declaración de nuestros módulos
mod common;
mod config;
mod db;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_middleware;

#[tokio::main]
async fn main() {
    // Inicializa el logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() está bien aquí: si la configuración falla, la aplicación
    // no debe arrancar.
    let app_state = AppState::new()
        .await
        .expect("Falló la inicialización del estado de la aplicación.");

    // Corre las migraciones de SQLx al arrancar
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Fallaron las migraciones de la base de datos.");

    tracing::info!("✅ Migraciones de base de datos ejecutadas con éxito!");

    // Rutas públicas de autenticación
    let rutas_auth = Router::new().route("/login", post(handlers::auth::login));

    // Rutas de usuario (protegidas por el middleware)
    let rutas_usuario = Router::new()
        .route("/me", get(handlers::auth::me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    // El libro de inventario: remisiones -> consumo -> producción -> Kanban
    let rutas_inventario = Router::new()
        .route("/remisiones", post(handlers::inventario::crear_remision))
        .route(
            "/remisiones/{id}/medicion",
            put(handlers::inventario::corregir_medicion),
        )
        .route("/consumos", post(handlers::inventario::registrar_consumo))
        .route(
            "/producciones",
            post(handlers::inventario::registrar_produccion),
        )
        .route(
            "/stock/{id}/ubicacion",
            put(handlers::inventario::reubicar_lote),
        )
        .route(
            "/stock/{id}/venta",
            post(handlers::inventario::descontar_piezas),
        )
        .route("/kanban", get(handlers::inventario::listar_kanban))
        .route(
            "/productos",
            post(handlers::inventario::crear_producto)
                .get(handlers::inventario::listar_productos),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    let rutas_precios = Router::new()
        .route(
            "/base",
            post(handlers::precios::crear_precio_base)
                .get(handlers::precios::listar_precios_base),
        )
        .route("/base/{id}", put(handlers::precios::actualizar_precio_base))
        .route("/cotizar", get(handlers::precios::cotizar))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    let rutas_patio = Router::new()
        .route(
            "/ajustes",
            post(handlers::ajustes::crear_ajuste).get(handlers::ajustes::listar_ajustes),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    // El disparador de cron se protege con secreto compartido, no con JWT
    let rutas_cron =
        Router::new().route("/depurar-ajustes", post(handlers::cron::depurar_ajustes));

    // Combina todo en el router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", rutas_auth)
        .nest("/api/usuarios", rutas_usuario)
        .nest("/api/inventario", rutas_inventario)
        .nest("/api/precios", rutas_precios)
        .nest("/api/patio", rutas_patio)
        .nest("/api/cron", rutas_cron)
        .with_state(app_state);

    // Arranca el servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falló el arranque del listener TCP");
    tracing::info!("🚀 Servidor escuchando en {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Error en el servidor Axum");
}

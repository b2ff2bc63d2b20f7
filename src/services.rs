pub mod auth;
pub mod inventario_service;
pub mod precios_service;
pub mod ajustes_service;

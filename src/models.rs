pub mod auth;
pub mod inventario;
pub mod precios;
pub mod ajustes;

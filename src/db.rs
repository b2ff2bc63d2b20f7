pub mod user_repo;
pub use user_repo::UserRepository;
pub mod inventario_repo;
pub use inventario_repo::InventarioRepository;
pub mod precios_repo;
pub use precios_repo::PreciosRepository;
pub mod ajustes_repo;
pub use ajustes_repo::AjustesRepository;

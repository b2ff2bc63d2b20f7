pub mod error;
pub mod validacion;

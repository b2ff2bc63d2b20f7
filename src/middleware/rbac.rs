// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{common::error::AppError, middleware::auth::ContextoAuth};

// ---
// TABLA ESTÁTICA DE CAPACIDADES
// ---
// Configuración fija del proceso: capacidad -> roles permitidos. Nunca
// muta en tiempo de ejecución ni se deriva por petición.

pub const CAN_MANAGE_ALL: &[&str] = &["admin"];
pub const CAN_MANAGE_SALES: &[&str] = &["admin", "vendedor"];
pub const CAN_MANAGE_PRODUCTION: &[&str] = &["admin", "trabajador"];
pub const CAN_DELETE_SALES: &[&str] = &["admin"];

/// Semántica "al-menos-uno": basta con que la intersección entre los roles
/// del usuario y los requeridos no sea vacía.
pub fn autorizar(roles_usuario: &[String], roles_requeridos: &[&str]) -> bool {
    roles_usuario
        .iter()
        .any(|rol| roles_requeridos.contains(&rol.as_str()))
}

/// 1. El trait que define qué es una capacidad
pub trait CapacidadDef: Send + Sync + 'static {
    fn nombre() -> &'static str;
    fn roles() -> &'static [&'static str];
}

/// 2. El extractor (guardián)
pub struct RequierePermiso<T>(pub PhantomData<T>);

// 3. Implementación de FromRequestParts: lee el contexto ya resuelto por el
// middleware de auth y lo cruza contra la tabla estática. Sin viaje a la
// base de datos.
impl<T, S> FromRequestParts<S> for RequierePermiso<T>
where
    T: CapacidadDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let contexto = parts
            .extensions
            .get::<ContextoAuth>()
            .ok_or(AppError::Unauthenticated)?;

        if !autorizar(&contexto.roles, T::roles()) {
            return Err(AppError::Forbidden(T::nombre()));
        }

        Ok(RequierePermiso(PhantomData))
    }
}

// ---
// DEFINICIÓN DE LAS CAPACIDADES (TIPOS)
// ---

pub struct CanManageAll;
impl CapacidadDef for CanManageAll {
    fn nombre() -> &'static str {
        "CAN_MANAGE_ALL"
    }
    fn roles() -> &'static [&'static str] {
        CAN_MANAGE_ALL
    }
}

pub struct CanManageSales;
impl CapacidadDef for CanManageSales {
    fn nombre() -> &'static str {
        "CAN_MANAGE_SALES"
    }
    fn roles() -> &'static [&'static str] {
        CAN_MANAGE_SALES
    }
}

pub struct CanManageProduction;
impl CapacidadDef for CanManageProduction {
    fn nombre() -> &'static str {
        "CAN_MANAGE_PRODUCTION"
    }
    fn roles() -> &'static [&'static str] {
        CAN_MANAGE_PRODUCTION
    }
}

pub struct CanDeleteSales;
impl CapacidadDef for CanDeleteSales {
    fn nombre() -> &'static str {
        "CAN_DELETE_SALES"
    }
    fn roles() -> &'static [&'static str] {
        CAN_DELETE_SALES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(etiquetas: &[&str]) -> Vec<String> {
        etiquetas.iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn vendedor_no_puede_borrar_ventas() {
        assert!(!autorizar(&roles(&["vendedor"]), CAN_DELETE_SALES));
    }

    #[test]
    fn admin_o_trabajador_pueden_gestionar_produccion() {
        assert!(autorizar(&roles(&["admin", "trabajador"]), CAN_MANAGE_PRODUCTION));
        assert!(autorizar(&roles(&["trabajador"]), CAN_MANAGE_PRODUCTION));
        assert!(!autorizar(&roles(&["vendedor"]), CAN_MANAGE_PRODUCTION));
    }

    #[test]
    fn basta_un_rol_de_la_interseccion() {
        // Semántica al-menos-uno, no todos-los-roles.
        assert!(autorizar(&roles(&["vendedor", "trabajador"]), CAN_MANAGE_SALES));
    }

    #[test]
    fn sin_roles_no_hay_capacidad() {
        assert!(!autorizar(&roles(&[]), CAN_MANAGE_ALL));
        assert!(!autorizar(&roles(&[]), CAN_MANAGE_SALES));
    }
}

// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// Representa un usuario tal como viene de la base de datos
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    pub id: Uuid,
    pub aserradero_id: Uuid,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE por seguridad
    pub password_hash: String,

    pub creado_en: DateTime<Utc>,
    pub actualizado_en: DateTime<Utc>,
}

// Datos para login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginPayload {
    #[validate(email(message = "El correo proporcionado es inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres."))]
    pub password: String,
}

// Respuesta de autenticación con el token
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
}

// Estructura de datos ("claims") dentro del JWT.
// El tenant y los roles viajan en el token: NUNCA se re-derivan del cuerpo
// de la petición.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,             // ID del usuario
    pub aserradero_id: Uuid,   // Tenant resuelto
    pub roles: Vec<String>,    // Etiquetas planas: admin, vendedor, trabajador
    pub exp: usize,            // Expiración
    pub iat: usize,            // Emisión
}

// src/services/auth.rs

use bcrypt::verify;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, Usuario},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    // El secreto puede faltar en el entorno. En ese caso toda verificación
    // falla como Unauthenticated y la falta se registra como falla de
    // configuración, no como error del cliente.
    jwt_secret: Option<String>,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: Option<String>) -> Self {
        Self { user_repo, jwt_secret }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let usuario = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::Unauthenticated)?;

        let password_clone = password.to_owned();
        let password_hash_clone = usuario.password_hash.clone();

        // Ejecuta la verificación de bcrypt en un hilo aparte
        let password_valido = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falló la tarea de verificación de contraseña: {}", e))??;

        if !password_valido {
            return Err(AppError::Unauthenticated);
        }

        let roles = self.user_repo.roles_de_usuario(usuario.id).await?;
        self.crear_token(&usuario, roles)
    }

    /// Resuelve la credencial opaca en sus claims. Firma incorrecta, token
    /// expirado y token malformado colapsan todos en el mismo
    /// `Unauthenticated`: no se filtra al cliente cuál fue la causa.
    pub fn validar_token(&self, token: &str) -> Result<Claims, AppError> {
        let Some(secret) = &self.jwt_secret else {
            tracing::error!("JWT_SECRET no está configurado; se rechaza toda credencial.");
            return Err(AppError::Unauthenticated);
        };

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::Unauthenticated)?;

        Ok(token_data.claims)
    }

    fn crear_token(&self, usuario: &Usuario, roles: Vec<String>) -> Result<String, AppError> {
        let Some(secret) = &self.jwt_secret else {
            tracing::error!("JWT_SECRET no está configurado; no se pueden emitir tokens.");
            return Err(AppError::Unauthenticated);
        };

        let now = Utc::now();
        let expires_at = now + chrono::Duration::hours(12);

        let claims = Claims {
            sub: usuario.id,
            aserradero_id: usuario.aserradero_id,
            roles,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
        .map_err(|_| AppError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn claims_con_exp(delta_segundos: i64) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: Uuid::new_v4(),
            aserradero_id: Uuid::new_v4(),
            roles: vec!["vendedor".to_string()],
            exp: (now + delta_segundos) as usize,
            iat: now as usize,
        }
    }

    fn emitir(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
        .unwrap()
    }

    fn servicio(secret: Option<&str>) -> AuthService {
        // El repositorio no se toca en validar_token; la pool es perezosa.
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/no_usado")
            .unwrap();
        AuthService::new(UserRepository::new(pool), secret.map(str::to_owned))
    }

    #[tokio::test]
    async fn un_token_valido_resuelve_sus_claims() {
        let claims = claims_con_exp(3600);
        let token = emitir(&claims, "secreto-de-prueba");

        let resuelto = servicio(Some("secreto-de-prueba"))
            .validar_token(&token)
            .unwrap();
        assert_eq!(resuelto.sub, claims.sub);
        assert_eq!(resuelto.aserradero_id, claims.aserradero_id);
        assert_eq!(resuelto.roles, vec!["vendedor".to_string()]);
    }

    #[tokio::test]
    async fn un_token_expirado_es_unauthenticated() {
        let token = emitir(&claims_con_exp(-7200), "secreto-de-prueba");
        let resultado = servicio(Some("secreto-de-prueba")).validar_token(&token);
        assert!(matches!(resultado, Err(AppError::Unauthenticated)));
    }

    #[tokio::test]
    async fn una_firma_incorrecta_es_unauthenticated() {
        let token = emitir(&claims_con_exp(3600), "otro-secreto");
        let resultado = servicio(Some("secreto-de-prueba")).validar_token(&token);
        assert!(matches!(resultado, Err(AppError::Unauthenticated)));
    }

    #[tokio::test]
    async fn sin_secreto_configurado_es_unauthenticated() {
        let token = emitir(&claims_con_exp(3600), "secreto-de-prueba");
        let resultado = servicio(None).validar_token(&token);
        assert!(matches!(resultado, Err(AppError::Unauthenticated)));
    }
}

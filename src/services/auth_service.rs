use crate::api::error::AppError;
use crate::config::AuthConfig;
use crate::entities::{admin_tokens, prelude::*};
use crate::utils::auth::{create_jwt, validate_jwt};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

/// The admin identity attached to a request once its bearer token has
/// been verified.
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    pub username: String,
}

pub struct IssuedToken {
    pub access_token: String,
    pub expires_at: chrono::DateTime<Utc>,
}

/// Issues and validates admin bearer tokens against the single
/// configured admin identity. The credential and signing secret arrive
/// through [`AuthConfig`] at construction; nothing here reads process
/// state.
pub struct AuthService {
    db: DatabaseConnection,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(db: DatabaseConnection, config: AuthConfig) -> Self {
        Self { db, config }
    }

    /// Hashes a password with a fresh salt, producing the PHC string
    /// expected in ADMIN_PASSWORD_HASH.
    pub fn hash_password(password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify_password(&self, password: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.config.admin_password_hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// Verifies the admin credential and issues a time-limited bearer
    /// token, persisting it for later revocation checks.
    pub async fn login(&self, username: &str, password: &str) -> Result<IssuedToken, AppError> {
        if username != self.config.admin_username || !self.verify_password(password) {
            return Err(AppError::Unauthorized(
                "Incorrect username or password".to_string(),
            ));
        }

        let token = create_jwt(
            &self.config.admin_username,
            &self.config.jwt_secret,
            self.config.token_expiry_minutes,
        )
        .map_err(|e| AppError::Internal(e.to_string()))?;

        let now = Utc::now();
        let expires_at = now + Duration::minutes(self.config.token_expiry_minutes);

        let record = admin_tokens::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            token: Set(token.clone()),
            username: Set(self.config.admin_username.clone()),
            expires_at: Set(expires_at),
            created_at: Set(now),
        };
        record.insert(&self.db).await?;

        tracing::info!("Issued admin token expiring at {}", expires_at);

        Ok(IssuedToken {
            access_token: token,
            expires_at,
        })
    }

    /// Validates a presented bearer token: it must still be persisted
    /// (not revoked), carry a valid signature and unexpired claim, and
    /// name the configured admin as subject. Expiry is enforced solely
    /// by claim verification; stale rows are never purged.
    pub async fn verify(&self, token: &str) -> Result<AdminIdentity, AppError> {
        let unauthorized = || AppError::Unauthorized("Could not validate credentials".to_string());

        let record = AdminTokens::find()
            .filter(admin_tokens::Column::Token.eq(token))
            .one(&self.db)
            .await?;
        if record.is_none() {
            return Err(unauthorized());
        }

        let claims = validate_jwt(token, &self.config.jwt_secret).map_err(|_| unauthorized())?;

        if claims.sub != self.config.admin_username {
            return Err(unauthorized());
        }

        Ok(AdminIdentity {
            username: self.config.admin_username.clone(),
        })
    }

    /// Deletes the persisted token record, ending the session.
    pub async fn revoke(&self, token: &str) -> Result<(), AppError> {
        let result = AdminTokens::delete_many()
            .filter(admin_tokens::Column::Token.eq(token))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Token not found".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = AuthService::hash_password("hunter2").unwrap();
        assert!(hash.starts_with("$argon2"));

        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(
            Argon2::default()
                .verify_password(b"hunter2", &parsed)
                .is_ok()
        );
        assert!(
            Argon2::default()
                .verify_password(b"wrong", &parsed)
                .is_err()
        );
    }
}

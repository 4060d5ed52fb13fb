use std::env;

/// Admin credential and token settings, constructed once at startup and
/// handed to the auth service. Nothing below this layer reads the
/// environment directly.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// The single admin identity allowed to mutate artworks
    pub admin_username: String,

    /// Argon2 PHC hash of the admin password. Empty means login is
    /// impossible until ADMIN_PASSWORD_HASH is configured.
    pub admin_password_hash: String,

    /// HS256 signing secret for bearer tokens
    pub jwt_secret: String,

    /// Token lifetime in minutes (default: 60)
    pub token_expiry_minutes: i64,
}

/// Application configuration for the portfolio backend
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory uploaded media is written to (default: "uploads")
    pub upload_dir: String,

    /// Maximum accepted upload size in bytes (default: 64 MB)
    pub max_upload_size: usize,

    pub auth: AuthConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_username: "admin".to_string(),
            admin_password_hash: String::new(),
            jwt_secret: "secret".to_string(),
            token_expiry_minutes: 60,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            upload_dir: "uploads".to_string(),
            max_upload_size: 64 * 1024 * 1024, // 64 MB
            auth: AuthConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            upload_dir: env::var("UPLOAD_DIR").unwrap_or(default.upload_dir),

            max_upload_size: env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_upload_size),

            auth: AuthConfig {
                admin_username: env::var("ADMIN_USERNAME")
                    .unwrap_or(default.auth.admin_username),

                admin_password_hash: env::var("ADMIN_PASSWORD_HASH")
                    .unwrap_or(default.auth.admin_password_hash),

                jwt_secret: env::var("JWT_SECRET").unwrap_or(default.auth.jwt_secret), // Fallback for dev convenience

                token_expiry_minutes: env::var("TOKEN_EXPIRY_MINUTES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(default.auth.token_expiry_minutes),
            },
        }
    }

    /// Create config for development (relaxed limits, throwaway secret)
    pub fn development() -> Self {
        Self {
            upload_dir: "uploads".to_string(),
            max_upload_size: 64 * 1024 * 1024,
            auth: AuthConfig {
                admin_username: "admin".to_string(),
                admin_password_hash: String::new(),
                jwt_secret: "secret".to_string(),
                token_expiry_minutes: 60,
            },
        }
    }
}

use std::path::PathBuf;

use crate::auth::jwt::JwtConfig;

/// Default request body limit: large enough for a 2 MB image plus the rest
/// of a multipart form, so oversize images reach image validation.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 8 * 1024 * 1024;

const DEFAULT_TOKEN_EXPIRY_MINS: i64 = 60;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Request body limit in bytes (default: 8 MiB).
    pub max_upload_bytes: usize,
    /// Directory uploaded images are written under (default: `media`).
    pub media_root: PathBuf,
    /// PostgreSQL URL. When unset the in-memory store is used.
    pub database_url: Option<String>,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Staff account ensured at startup, if configured.
    pub staff_bootstrap: Option<StaffBootstrap>,
}

/// Credentials for the staff account created (or promoted) at startup.
#[derive(Debug, Clone)]
pub struct StaffBootstrap {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `MAX_UPLOAD_BYTES`     | `8388608`                  |
    /// | `MEDIA_ROOT`           | `media`                    |
    /// | `DATABASE_URL`         | unset (in-memory store)    |
    /// | `STAFF_USERNAME`       | unset (no bootstrap)       |
    /// | `STAFF_EMAIL`          | `<username>@localhost`     |
    /// | `STAFF_PASSWORD`       | required with username     |
    /// | `JWT_SECRET`           | required, non-empty        |
    /// | `JWT_ACCESS_EXPIRY_MINS` | `60`                     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let media_root =
            PathBuf::from(std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".into()));

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let staff_bootstrap = std::env::var("STAFF_USERNAME")
            .ok()
            .filter(|name| !name.trim().is_empty())
            .map(|username| {
                let password = std::env::var("STAFF_PASSWORD")
                    .expect("STAFF_PASSWORD must be set when STAFF_USERNAME is");
                let email = std::env::var("STAFF_EMAIL")
                    .unwrap_or_else(|_| format!("{username}@localhost"));
                StaffBootstrap {
                    username,
                    email,
                    password,
                }
            });

        let secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .expect("JWT_SECRET must be set to a non-empty value");
        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_TOKEN_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");
        let jwt = JwtConfig {
            secret,
            access_token_expiry_mins,
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            media_root,
            database_url,
            jwt,
            staff_bootstrap,
        }
    }
}

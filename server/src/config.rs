use std::str::FromStr;

use jsonwebtoken::Algorithm;

/// Signing secret, algorithm and token lifetimes for the token service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_days: i64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Build the config from the environment. `DATABASE_URL` and `JWT_SECRET`
    /// have no defaults; startup fails without them.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let secret = std::env::var("JWT_SECRET")?;
        let algorithm = match std::env::var("JWT_ALGORITHM") {
            Ok(v) => Algorithm::from_str(&v)
                .map_err(|_| anyhow::anyhow!("unsupported JWT_ALGORITHM: {v}"))?,
            Err(_) => Algorithm::HS256,
        };
        let auth = AuthConfig {
            secret,
            algorithm,
            access_ttl_minutes: std::env::var("ACCESS_TOKEN_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(15),
            refresh_ttl_days: std::env::var("REFRESH_TOKEN_DAYS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(7),
        };
        Ok(Self { database_url, auth })
    }
}

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_hours: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is required")?;
        let jwt = JwtConfig {
            // No usable signing secret is a fatal configuration error.
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is required")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "coursetrack".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "coursetrack-users".into()),
            ttl_hours: positive_ttl_hours(std::env::var("JWT_TTL_HOURS").ok()),
        };
        let storage = StorageConfig {
            endpoint: std::env::var("S3_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:9000".into()),
            bucket: std::env::var("S3_BUCKET").unwrap_or_else(|_| "coursetrack-files".into()),
            access_key: std::env::var("S3_ACCESS_KEY").unwrap_or_else(|_| "minioadmin".into()),
            secret_key: std::env::var("S3_SECRET_KEY").unwrap_or_else(|_| "minioadmin".into()),
            region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".into()),
        };
        Ok(Self {
            database_url,
            jwt,
            storage,
        })
    }
}

/// Token TTL must stay strictly positive; zero, negative or unparsable
/// values fall back to the 24-hour default.
fn positive_ttl_hours(raw: Option<String>) -> i64 {
    raw.and_then(|v| v.parse::<i64>().ok())
        .filter(|h| *h > 0)
        .unwrap_or(24)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_defaults_to_24_hours() {
        assert_eq!(positive_ttl_hours(None), 24);
    }

    #[test]
    fn ttl_accepts_positive_values() {
        assert_eq!(positive_ttl_hours(Some("6".into())), 6);
    }

    #[test]
    fn ttl_rejects_zero_negative_and_garbage() {
        assert_eq!(positive_ttl_hours(Some("0".into())), 24);
        assert_eq!(positive_ttl_hours(Some("-24".into())), 24);
        assert_eq!(positive_ttl_hours(Some("yesterday".into())), 24);
    }
}

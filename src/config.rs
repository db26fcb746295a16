use anyhow::Context;
use serde::Deserialize;

const DEFAULT_MAX_PHOTO_BYTES: usize = 20 * 1024 * 1024; // 20MB
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct S3Config {
    pub bucket: String,
    pub endpoint: Option<String>,
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub max_photo_bytes: usize,
    pub s3: S3Config,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            get(key).with_context(|| format!("{} environment variable is not set", key))
        };

        let database_url = required("DB_CONNECTION_STRING")?;
        let s3 = S3Config {
            bucket: required("S3_BUCKET")?,
            endpoint: get("S3_ENDPOINT"),
            region: get("S3_REGION"),
            access_key: get("S3_ACCESS_KEY"),
            secret_key: get("S3_SECRET_KEY"),
        };

        let max_photo_bytes = match get("MAX_PHOTO_BYTES") {
            Some(v) => v
                .parse::<usize>()
                .with_context(|| format!("MAX_PHOTO_BYTES is not a number: {}", v))?,
            None => DEFAULT_MAX_PHOTO_BYTES,
        };
        let db_max_connections = get("DB_MAX_CONNECTIONS")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS);

        Ok(Self {
            database_url,
            db_max_connections,
            max_photo_bytes,
            s3,
        })
    }
}

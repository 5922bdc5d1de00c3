use config::{Config, ConfigError, Environment};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use sqlx::postgres::PgPoolOptions;

use crate::config::constants::DEFAULT_REDIS_HOST_NAME;

/// Runtime settings, sourced from the environment (a `.env` file is
/// honored when present).
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: Secret<String>,
    #[serde(default = "default_redis_host_name")]
    pub redis_host_name: String,
}

fn default_redis_host_name() -> String {
    DEFAULT_REDIS_HOST_NAME.to_string()
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Config::builder()
            .add_source(Environment::default())
            .build()?
            .try_deserialize()
    }

    pub async fn pg_pool(&self) -> Result<sqlx::PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(5)
            .connect(self.database_url.expose_secret())
            .await
    }

    pub fn redis_client(&self) -> redis::RedisResult<redis::Client> {
        redis::Client::open(format!("redis://{}/", self.redis_host_name))
    }
}

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use crate::config::DatabaseConfig;
use crate::error::{Error, Result};

fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions> {
    if let Some(url) = &config.url {
        return PgConnectOptions::from_str(url)
            .map_err(|e| Error::Config(format!("Invalid value for DATABASE_URL: {}", e)));
    }

    let mut options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .database(&config.name);
    if let Some(password) = &config.password {
        options = options.password(password);
    }
    Ok(options)
}

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .idle_timeout(config.idle_timeout)
        .acquire_timeout(config.connect_timeout)
        .connect_with(connect_options(config)?)
        .await?;
    tracing::info!(
        max_connections = config.max_connections,
        "Connected to PostgreSQL database"
    );
    Ok(pool)
}

pub async fn test_connection(pool: &PgPool) -> Result<DateTime<Utc>> {
    let now = sqlx::query_scalar::<_, DateTime<Utc>>("SELECT NOW()")
        .fetch_one(pool)
        .await
        .map_err(|e| {
            tracing::error!("Database connection test failed: {}", e);
            Error::from(e)
        })?;
    tracing::info!(%now, "Database connection test successful");
    Ok(now)
}

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

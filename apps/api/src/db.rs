use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Connection, Executor, PgConnection, PgPool};
use tracing::info;

use crate::config::{DbConfig, IsolationLevel};
use crate::schema::ensure_schema;

const MAINTENANCE_DB: &str = "postgres";

fn connect_options(cfg: &DbConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&cfg.host)
        .port(cfg.port)
        .username(&cfg.user)
        .password(&cfg.password)
        .database(&cfg.name)
}

/// Creates the configured database when it does not exist yet.
async fn ensure_database(cfg: &DbConfig) -> Result<()> {
    let mut conn = PgConnection::connect_with(&connect_options(cfg).database(MAINTENANCE_DB))
        .await
        .context("Failed to reach PostgreSQL maintenance database")?;

    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&cfg.name)
            .fetch_one(&mut conn)
            .await?;

    if exists {
        info!("DB - database '{}' verified", cfg.name);
    } else {
        // CREATE DATABASE takes no bind parameters.
        let ddl = format!("CREATE DATABASE \"{}\"", cfg.name.replace('"', "\"\""));
        conn.execute(ddl.as_str())
            .await
            .with_context(|| format!("Failed to create database '{}'", cfg.name))?;
        info!("DB - database '{}' created", cfg.name);
    }

    conn.close().await?;
    Ok(())
}

fn set_isolation_sql(level: IsolationLevel) -> String {
    format!(
        "SET SESSION CHARACTERISTICS AS TRANSACTION ISOLATION LEVEL {}",
        level.as_sql()
    )
}

/// Builds a pool whose connections open every transaction at `level`.
pub fn pool_options(max_connections: u32, level: IsolationLevel) -> PgPoolOptions {
    let isolation = set_isolation_sql(level);
    PgPoolOptions::new()
        .max_connections(max_connections)
        .after_connect(move |conn, _meta| {
            let isolation = isolation.clone();
            Box::pin(async move {
                conn.execute(isolation.as_str()).await?;
                Ok(())
            })
        })
}

/// Verifies (or creates) the database, opens the pool and ensures the schema.
pub async fn create_pool(cfg: &DbConfig) -> Result<PgPool> {
    info!("DB - verifying ...");
    ensure_database(cfg).await?;

    let pool = pool_options(cfg.pool_size, cfg.isolation_level)
        .max_lifetime(cfg.pool_recycle)
        .connect_with(connect_options(cfg))
        .await
        .context("Failed to open PostgreSQL connection pool")?;

    ensure_schema(&pool).await?;

    info!(
        "PostgreSQL connection pool established (size {}, recycle {:?}, isolation {})",
        cfg.pool_size,
        cfg.pool_recycle,
        cfg.isolation_level.as_sql()
    );
    Ok(pool)
}

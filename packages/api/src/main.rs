use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use api::config::Settings;
use api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let settings = Settings::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(settings.db_max_connections)
        .acquire_timeout(settings.db_query_timeout)
        .connect(&settings.database_url)
        .await
        .context("Failed to create Postgres pool")?;

    sqlx::migrate!("../shared/migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let app = api::app(AppState::postgres(pool, &settings));

    let listener = TcpListener::bind(settings.server_addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.server_addr))?;
    info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

use anyhow::Context;
use tokio::net::TcpListener;

mod config;
mod data;
mod features;
mod handlers;
mod schema;
mod utils;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Database configuration
    let config = Config::from_env()?;
    let pool = data::build_pool(&config.database_url, config.pool_size, config.busy_timeout)
        .with_context(|| format!("Failed to create DB pool for {}", config.database_url))?;

    {
        let mut conn = pool.get().context("Failed to get a DB connection")?;
        data::run_migrations(&mut conn).context("Failed to apply database schema")?;
    }
    log::info!("Database ready at {}", config.database_url);

    let static_dir = config.static_dir.is_dir().then_some(config.static_dir.as_path());
    match static_dir {
        Some(dir) => log::info!("Serving frontend from {}", dir.display()),
        None => log::info!("No frontend build at {}, running API only", config.static_dir.display()),
    }
    let app = handlers::app(pool, static_dir);

    // Start server
    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to address {}", config.bind_addr))?;

    log::info!("Server running on http://{}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

use std::error::Error;
use std::process;
use std::sync::Arc;

use axum::Router;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use wellness_admin::config::Config;
use wellness_admin::db::Database;
use wellness_admin::routes::create_routes;
use wellness_admin::state::AppState;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Server failed");
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env()?;

    let db = Arc::new(Database::postgres(
        config.database_url.clone(),
        config.max_connections,
    ));
    let pool = db.pool().await?;
    tracing::info!("Successfully connected to database");

    sqlx::migrate!().run(pool).await?;
    tracing::info!("Migrations run successfully");

    let app: Router = create_routes(AppState::from_config(&config, db.clone()), &config.http);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server running at http://{}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

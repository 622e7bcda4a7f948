//! Creates the first admin account.
//!
//! ```text
//! ADMIN_EMAIL=admin@example.com ADMIN_PASSWORD=... cargo run --bin seed-admin
//! ```

use std::env;
use std::error::Error;
use std::process;
use std::sync::Arc;

use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

use wellness_admin::auth::create_admin;
use wellness_admin::db::Database;
use wellness_admin::store::PgStore;

const DEFAULT_ADMIN_NAME: &str = "Admin";

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Failed to seed admin");
        process::exit(1);
    }
}

fn required(name: &str) -> Result<String, String> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| format!("{name} must be set"))
}

async fn run() -> Result<(), Box<dyn Error>> {
    let database_url = required("DATABASE_URL")?;
    let email = required("ADMIN_EMAIL")?;
    let password = required("ADMIN_PASSWORD")?;
    let name = env::var("ADMIN_NAME").unwrap_or_else(|_| DEFAULT_ADMIN_NAME.to_string());

    let db = Arc::new(Database::postgres(database_url, 1));
    sqlx::migrate!().run(db.pool().await?).await?;

    let store = PgStore::new(db);
    let admin = create_admin(&store, &name, &email, &password).await?;
    tracing::info!(admin_id = %admin.id, email = %admin.email, "Admin created");
    Ok(())
}

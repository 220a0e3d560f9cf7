use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use auth::jwt::{JwtConfig, JwtService};
use common::{
    PgUserStore,
    database::{self, DatabaseConfig},
};

mod extract;
mod models;
mod repositories;
mod routes;
mod state;

use repositories::PgContentStore;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting API service");

    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    database::migrate(&pool).await?;

    // Tokens are verified with the same secrets the auth service signs with
    let jwt_service = JwtService::new(JwtConfig::from_env()?);

    let app_state = AppState::new(
        Arc::new(PgUserStore::new(pool.clone())),
        Arc::new(PgContentStore::new(pool)),
        jwt_service,
    );

    let app = routes::create_router(app_state);

    let bind_addr = std::env::var("API_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("API service listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

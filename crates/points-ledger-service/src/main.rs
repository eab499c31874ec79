//! 积分账本服务入口

use axum::{Router, middleware, routing::get};
use points_ledger::{MIGRATOR, auth::JwtConfig, routes, state::AppState};
use rewards_shared::{config::AppConfig, database::Database, observability, server};
use tokio::net::TcpListener;
use tracing::{info, warn};

const SERVICE_NAME: &str = "points-ledger-service";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load(SERVICE_NAME)?;

    let obs_config = config
        .observability
        .clone()
        .with_service_name(&config.service_name);
    let _guard = observability::init(&obs_config).await?;

    info!("Starting {} on {}", SERVICE_NAME, config.server_addr());

    if config.auth.jwt_secret == rewards_shared::config::AuthConfig::default().jwt_secret {
        if config.is_production() {
            anyhow::bail!("REWARDS_AUTH__JWT_SECRET must be set in production environment");
        }
        warn!("Using default JWT secret - set REWARDS_AUTH__JWT_SECRET for production");
    }

    let db = Database::connect(&config.database).await?;
    db.run_migrations(&MIGRATOR).await?;

    let state = AppState::new(
        db.pool().clone(),
        JwtConfig::from(config.auth.clone()),
        config.ledger.clone(),
    );

    let app = Router::new()
        .route(
            "/ready",
            get({
                let db = db.clone();
                move || {
                    let db = db.clone();
                    async move { server::readiness_body(SERVICE_NAME, &db).await }
                }
            }),
        )
        .merge(routes::build_router(state))
        .layer(middleware::from_fn(server::security_headers))
        .layer(server::cors_layer(&config.cors, config.is_production()));

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", config.server_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");

    Ok(())
}

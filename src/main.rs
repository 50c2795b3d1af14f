//! Entry point: load config, wire dependencies, and run the server.

use std::sync::Arc;

use chatgate::auth::{JwtSecret, TokenVerifier};
use chatgate::config::Config;
use chatgate::db::{self, PgIdentityStore, PgRestrictionStore};
use chatgate::services::RestrictionEvaluator;
use chatgate::{create_app, AdmissionPipeline, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("config: {}", e))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db_pool = db::create_pool(&config).await?;
    let identities = Arc::new(PgIdentityStore::new(db_pool.clone()));
    let restrictions = Arc::new(PgRestrictionStore::new(db_pool));

    let verifier = TokenVerifier::new(
        JwtSecret::new(config.jwt_secret.clone()),
        identities,
        config.lookup_timeout,
    );
    let evaluator = RestrictionEvaluator::new(restrictions, config.lookup_timeout);
    let pipeline = AdmissionPipeline::new(verifier, evaluator);

    let app = create_app(AppState { pipeline });

    tracing::info!(addr = %config.server_addr, "listening");
    let listener = tokio::net::TcpListener::bind(config.server_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

use anyhow::Context;

use househunter_api::{
    app::{AppServices, build_app},
    config::{AppConfig, StoreBackend},
};
use househunter_auth::TokenService;

#[tokio::main]
async fn main() {
    househunter_observability::init();

    if let Err(e) = run().await {
        tracing::error!(error = ?e, "startup failed");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;

    let services = match &config.store {
        StoreBackend::Postgres { database_url } => AppServices::postgres(database_url)
            .await
            .context("failed to initialize the document store")?,
        StoreBackend::Memory => {
            tracing::warn!("HOUSEHUNTER_STORE=memory; data will not survive a restart");
            AppServices::in_memory()
        }
    };

    let app = build_app(TokenService::new(&config.token_secret), services);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("House Hunter is running on port {}", listener.local_addr()?.port());

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

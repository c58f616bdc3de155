use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use maintenance_intake_api::{app, config, middleware, services::EmailService};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::load()?;

    // Initialize logging
    middleware::logging::init_logging(&config.logging)?;

    info!(
        "Starting Maintenance Intake v{}",
        env!("CARGO_PKG_VERSION")
    );

    if let Err(err) = middleware::init_metrics() {
        warn!(error = %err, "Prometheus recorder not installed, /metrics disabled");
    }

    info!(
        store = %config.store.path,
        email_enabled = config.email.enabled,
        email_provider = %config.email.provider,
        "Ledger and notifier configured"
    );
    let notifier = Arc::new(EmailService::new(config.email.clone()));

    // Build application
    let app = app::create_app(config.clone(), notifier);

    // Start server
    let addr = config.socket_addr()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

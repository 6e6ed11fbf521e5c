use std::sync::Arc;

use contact_relay::config::RelayConfig;
use contact_relay::relay::MessageRelay;
use contact_relay::routes::relay_routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = RelayConfig::from_env()?;

    eprintln!("📮 Contact Relay v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.llm.model);
    eprintln!("   Site: {} ({})", config.site.name, config.site.origin);
    eprintln!("   Notify: {}", config.notify.to);
    eprintln!("   Listening: http://0.0.0.0:{}\n", config.port);

    let relay = Arc::new(MessageRelay::from_config(&config)?);
    let app = relay_routes(relay);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, "Contact relay started");
    axum::serve(listener, app).await?;

    Ok(())
}

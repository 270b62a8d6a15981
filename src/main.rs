use anyhow::Context;

use relief_ledger::config::ServiceConfig;
use relief_ledger::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ServiceConfig::from_env().context("Invalid configuration")?;

    eprintln!("📦 Relief Ledger v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: http://{}/api/packages", config.bind_addr());
    eprintln!("   Database: {}", config.db_path.display());
    eprintln!("   Seed endpoints: {}", if config.seed_enabled { "on" } else { "off" });

    server::serve(config).await.context("Relief Ledger stopped")
}

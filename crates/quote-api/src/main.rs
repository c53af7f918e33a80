//! # door-quote
//!
//! Door configurator quoting service.
//!
//! ## Usage
//!
//! ```bash
//! # Optional overrides
//! export CATALOG_PATH=config/catalog.toml
//! export VAT_BPS=2000
//!
//! # Run the server
//! door-quote
//! ```

use quote_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    {
        let catalog = state.catalog.read().await;
        info!("Environment: {}", state.config.environment);
        info!(
            "Catalog items: {} (version {}, currency {})",
            catalog.len(),
            catalog.version,
            catalog.currency
        );
    }
    info!("VAT rate: {}%", state.config.vat.percentage());
    info!("Archive backend: {}", state.store.backend_name());

    let app = routes::create_router(state);

    info!("🚪 door-quote starting on http://{}", addr);

    if !is_prod {
        info!("📝 Health: http://{}/health", addr);
        info!("🧮 Quote: POST http://{}/api/v1/quote/item", addr);
        info!("📄 Proposal: POST http://{}/api/v1/proposal", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  🚪 door-quote 🚪
  ━━━━━━━━━━━━━━━━━━━━━━━
  Door configurator pricing
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}

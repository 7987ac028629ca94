//! `review-enc-svc` — service binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the telemetry pipeline (tracing, optional OTLP).
//! 3. Decode the key/IV and build the [`FieldCipher`].
//! 4. Build the standard [`SensitiveFieldRegistry`].
//! 5. Build the Axum router and start the HTTP server.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use vault::config::Config;
use vault::crypto::FieldCipher;
use vault::registry::SensitiveFieldRegistry;
use vault::server::{router, state::AppState};
use vault::telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otel_exporter_otlp_endpoint.as_deref(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        http_port = cfg.http_port,
        "review-enc-svc starting"
    );

    // -----------------------------------------------------------------------
    // 3. Cipher
    // -----------------------------------------------------------------------
    let cipher = Arc::new(FieldCipher::new(cfg.cipher_keys()?));

    // -----------------------------------------------------------------------
    // 4. Sensitive-field registry
    // -----------------------------------------------------------------------
    let registry = Arc::new(SensitiveFieldRegistry::standard());
    info!(kinds = registry.len(), "sensitive-field registry loaded");

    // -----------------------------------------------------------------------
    // 5. HTTP server
    // -----------------------------------------------------------------------
    let state = AppState::new(cipher, registry);
    let app = router::build(state);

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.http_port).into();
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

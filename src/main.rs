// src/main.rs
//! stowcraft-service: demo HTTP service around the `stowcraft` engine.
//!
//! Wraps the container loading engine in a small Axum API. The engine
//! itself is pure; this binary is the only place that touches the
//! environment or the network.

mod api;
mod config;

use config::AppConfig;

#[tokio::main]
async fn main() {
    if let Err(err) = dotenvy::dotenv() {
        if !matches!(err, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("⚠️ Could not load .env: {}", err);
        }
    }

    let app_config = AppConfig::from_env();

    println!("🚀 Packing Service starting...");
    api::start_api_server(app_config.api).await;
}

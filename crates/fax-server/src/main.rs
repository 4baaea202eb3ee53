//! Fax relay server executable

use anyhow::Context;
use clap::{Arg, Command};
use fax_core::FaxConfig;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real deployments inject the environment
    dotenvy::dotenv().ok();

    // Initialize logging with INFO as default if RUST_LOG not set
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let matches = Command::new("fax-server")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Relays web form fax requests to Fax.Plus")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Configuration file path (json, toml or yaml)")
        )
        .arg(
            Arg::new("bind")
                .long("bind")
                .value_name("ADDR")
                .help("Listen address, overrides server.bind_addr")
        )
        .get_matches();

    let config_path = matches.get_one::<PathBuf>("config");
    let mut config = FaxConfig::load(config_path.map(PathBuf::as_path))
        .context("Failed to load configuration")?;

    if let Some(bind) = matches.get_one::<String>("bind") {
        config.server.bind_addr = bind.clone();
    }
    let addr = config.server.socket_addr()?;

    match config_path {
        Some(path) => log::info!("Loaded configuration from {}", path.display()),
        None => log::info!("No configuration file given, using defaults and environment"),
    }

    let state = fax_server::build_state(&config)?;
    let app = fax_server::app(state, &config.server)?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    log::info!(
        "Listening on {} (allowed origin {})",
        addr,
        config.server.allowed_origin
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}

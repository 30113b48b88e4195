mod cli;
mod error;
mod page;
mod server;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use cart_api::{ApiClient, ApiConfig};
use cart_backend::{default_seed, Seed, Store};
use cart_core::{Controller, ControllerOptions};
use clap::Parser;
use log::info;

use crate::cli::{BackendArgs, Cli, Command, ServeArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Serve(args) => serve(args).await,
        Command::Backend(args) => backend(args).await,
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = ApiConfig::new(args.api_url, Duration::from_secs(args.timeout_secs));
    let client = ApiClient::new(&config).context("failed to build HTTP client")?;
    let options = ControllerOptions {
        reset_pending_after_add: args.reset_pending,
    };
    let state = Arc::new(server::AppState::new(Controller::new(client, options)));

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("[serve] http://localhost:{}", args.port);
    info!("[serve] backend: {}", config.base_url);
    if args.reset_pending {
        info!("[serve] pending amounts reset after add to cart");
    }

    axum::serve(listener, server::router(state))
        .await
        .context("server error")
}

async fn backend(args: BackendArgs) -> anyhow::Result<()> {
    let seed: Seed = match &args.seed {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read seed {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("invalid seed {}", path.display()))?
        }
        None => default_seed(),
    };
    info!(
        "[backend] {} inventory item(s), {} cart item(s)",
        seed.inventory.len(),
        seed.cart.len()
    );

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("[backend] http://localhost:{}", args.port);

    axum::serve(listener, cart_backend::router(Store::shared(seed)))
        .await
        .context("backend error")
}

extern crate alloc;

use alloc::sync::Arc;
use core::net::SocketAddr;

use anyhow::Context;
use bjtable::Table;
use bjtable::server::{Gateway, ServerConfig, ws};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env();
    let seed = config.seed.unwrap_or_else(rand::random);

    info!(
        variant = ?config.table.variant,
        seats = config.table.max_seats,
        seed,
        "starting table"
    );

    let gateway = Arc::new(Gateway::new(Table::new(config.table.clone(), seed)));
    let app = ws::router(gateway);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("invalid listen addr")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "blackjack table listening");

    axum::serve(listener, app).await?;
    Ok(())
}

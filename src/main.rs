use anyhow::Result;
use clap::Parser;
use masqdns::error::Error::DNSError;
use masqdns::{Config, DomainRegistry, Shared};
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config: Shared = Arc::new(Config::parse());
    tracing_init(config.debug);

    let registry = Arc::new(DomainRegistry::new());
    masqdns::bootstrap::self_register(&config, &registry).await?;

    tracing::info!("DNS listening on UDP {}", config.dns_bind_addr());
    let dns_server = masqdns::dns::new(config.clone(), registry.clone()).await?;
    let dns_handle = tokio::spawn(dns_server.block_until_done());

    tracing::info!("API listening on {}", config.api_bind_addr());
    let api_server = masqdns::api::new(config.clone(), registry.clone());
    let api_handle = tokio::spawn(api_server);

    // TODO(XXX): proper graceful shutdown.
    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("quitting from signal");
        },
        Ok(dns_res) = dns_handle => {
            if let Err(err) = dns_res {
                return Err(DNSError(err).into())
            }
        }
        Ok(api_res) = api_handle => {
            if let Err(err) = api_res {
                return Err(err.into())
            }
        }
    }
    tracing::info!("goodbye");
    Ok(())
}

fn tracing_init(debug: bool) {
    let default_filter = if debug { "masqdns=debug" } else { "masqdns=info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

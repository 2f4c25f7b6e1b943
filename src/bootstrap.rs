//! Startup self-registration.
//!
//! Before the DNS listener starts, the service determines the machine's own
//! non-loopback IPv4 address and binds the configured hostname to it in the
//! domain table, so the host resolves its own name authoritatively.

use crate::config::Config;
use crate::error::Error;
use crate::registry::{canonical_name, SharedRegistry};
use std::net::{IpAddr, Ipv4Addr};
use tokio::net::UdpSocket;

/// Discover the machine's non-loopback IPv4 address, register the configured
/// hostname against it, and log the resulting table.
///
/// # Errors
///
/// Returns [`Error::NoLocalAddress`] if no usable address can be determined.
/// This is fatal: callers must not start the listener without a registered
/// self entry.
pub async fn self_register(config: &Config, registry: &SharedRegistry) -> Result<(), Error> {
    let address = discover_local_ipv4().await?;
    register_entry(&config.hostname, address, registry).await;

    for (domain, address) in registry.snapshot().await {
        tracing::info!("domain: {domain}, address: {address}");
    }
    Ok(())
}

async fn register_entry(hostname: &str, address: Ipv4Addr, registry: &SharedRegistry) {
    registry
        .upsert(canonical_name(hostname), address.to_string())
        .await;
}

/// Find a non-loopback IPv4 address for this machine.
///
/// Connects a UDP socket to a well-known public address and reads back the
/// source address the kernel selected for that route. No packet is sent.
async fn discover_local_ipv4() -> Result<Ipv4Addr, Error> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await?;
    socket
        .connect(("8.8.8.8", 53))
        .await
        .map_err(|_| Error::NoLocalAddress)?;
    match socket.local_addr()?.ip() {
        IpAddr::V4(ip) if !ip.is_loopback() && !ip.is_unspecified() => Ok(ip),
        _ => Err(Error::NoLocalAddress),
    }
}

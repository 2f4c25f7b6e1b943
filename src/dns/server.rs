use crate::config::Shared;
use crate::dns::handlers::Handler;
use crate::registry::SharedRegistry;
use tokio::net::UdpSocket;
use trust_dns_server::ServerFuture;

/// Bind the UDP listener and wrap it in a [`ServerFuture`] driving the
/// [`Handler`]. Each inbound datagram is dispatched as its own task, so a
/// blocked fallback exchange never delays other queries. A failed bind is
/// returned to the caller and is fatal to the process.
pub async fn new(config: Shared, registry: SharedRegistry) -> anyhow::Result<ServerFuture<Handler>> {
    let udp_addr = config.dns_bind_addr();
    let dns_handler = Handler::new(&config, registry);
    let mut dns_server = ServerFuture::new(dns_handler);
    dns_server.register_socket(UdpSocket::bind(udp_addr).await?);
    Ok(dns_server)
}

use crate::api::routes;
use crate::config::Shared;
use crate::registry::SharedRegistry;
use std::future::Future;
use std::net::SocketAddr;

#[derive(Clone)]
pub(super) struct AppState {
    pub registry: SharedRegistry,
}

pub fn new(config: Shared, registry: SharedRegistry) -> impl Future<Output = hyper::Result<()>> {
    serve(config.api_bind_addr(), registry).1
}

/// Bind the admin API and return the bound address alongside the server
/// future. Binding an ephemeral port and reading back the address is what
/// the integration tests rely on.
pub fn serve(
    addr: SocketAddr,
    registry: SharedRegistry,
) -> (SocketAddr, impl Future<Output = hyper::Result<()>>) {
    let server =
        axum::Server::bind(&addr).serve(routes::new(AppState { registry }).into_make_service());
    (server.local_addr(), server)
}

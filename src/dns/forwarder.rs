//! Upstream fallback forwarding.
//!
//! One upstream round trip per inbound query: a fresh client connection,
//! a single exchange bounded by an explicit timeout, no retry, no caching.
//! A semaphore caps how many exchanges may be in flight at once so a slow
//! upstream cannot exhaust the process under concurrent load.

use crate::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::Semaphore;
use trust_dns_client::client::{AsyncClient, ClientHandle};
use trust_dns_client::rr::{DNSClass, Name, RecordType};
use trust_dns_client::udp::UdpClientStream;
use trust_dns_proto::op::ResponseCode;
use trust_dns_proto::xfer::DnsResponse;

#[derive(Clone)]
pub struct Forwarder {
    upstream: SocketAddr,
    timeout: Duration,
    permits: Arc<Semaphore>,
}

impl Forwarder {
    pub fn new(upstream: SocketAddr, timeout: Duration, max_in_flight: usize) -> Self {
        Forwarder {
            upstream,
            timeout,
            permits: Arc::new(Semaphore::new(max_in_flight)),
        }
    }

    /// Issue one query for the exact name and type to the configured upstream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClientError`] when no response is received (timeout,
    /// unreachable upstream, connection error) and [`Error::UpstreamStatus`]
    /// when the upstream answers with a non-success response code. Both are
    /// logged here with the upstream address.
    pub async fn forward(&self, name: Name, qtype: RecordType) -> Result<DnsResponse, Error> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| Error::ForwarderUnavailable)?;

        let response = match self.exchange(name, qtype).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!("failed to forward request to {}: {err:?}", self.upstream);
                return Err(err);
            }
        };

        let code = response.response_code();
        if code != ResponseCode::NoError {
            tracing::warn!("upstream {} answered with {code}", self.upstream);
            return Err(Error::UpstreamStatus(code));
        }
        Ok(response)
    }

    async fn exchange(&self, name: Name, qtype: RecordType) -> Result<DnsResponse, Error> {
        let stream = UdpClientStream::<UdpSocket>::with_timeout(self.upstream, self.timeout);
        let (mut client, background) = AsyncClient::connect(stream).await?;
        // The background task drives the exchange and exits once the client
        // handle is dropped at the end of this call.
        tokio::spawn(background);
        Ok(client.query(name, DNSClass::IN, qtype).await?)
    }
}

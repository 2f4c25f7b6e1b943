use crate::config::Shared;
use crate::dns::forwarder::Forwarder;
use crate::error::Error;
use crate::registry::{canonical_name, SharedRegistry};
use std::net::Ipv4Addr;
use tracing::error;
use trust_dns_server::authority::MessageResponseBuilder;
use trust_dns_server::client::op::{Header, MessageType, OpCode, ResponseCode};
use trust_dns_server::client::rr::{RData, Record, RecordType};
use trust_dns_proto::xfer::DnsResponse;
use trust_dns_server::server::{Request, RequestHandler, ResponseHandler, ResponseInfo};

/// Lifetime of locally-resolved address records, in seconds.
const LOCAL_TTL: u32 = 60;

/// The per-query resolution engine.
///
/// Each query produces exactly one of three outcomes: an authoritative answer
/// from the domain table, an answer relayed from the upstream resolver, or a
/// SERVFAIL. Every branch sends exactly one response.
#[derive(Clone)]
pub struct Handler {
    registry: SharedRegistry,
    forwarder: Option<Forwarder>,
}

impl Handler {
    pub fn new(config: &Shared, registry: SharedRegistry) -> Self {
        let forwarder = config.fallback_addr().map(|upstream| {
            Forwarder::new(upstream, config.fallback_timeout(), config.max_in_flight)
        });
        Handler {
            registry,
            forwarder,
        }
    }

    async fn dispatch_request<R: ResponseHandler>(
        &self,
        request: &Request,
        response: R,
    ) -> Result<ResponseInfo, Error> {
        // If it isn't a query, return NOTIMP.
        if request.op_code() != OpCode::Query || request.message_type() != MessageType::Query {
            return self.handle_notimpl(request, response).await;
        }

        // Only A queries are locally resolvable. The lookup uses the name as
        // the client sent it (case preserved) with the trailing dot stripped;
        // the table performs no case folding.
        let query = request.query().original();
        if query.query_type() == RecordType::A {
            let requested = query.name().to_utf8();
            if let Some(address) = self.registry.lookup(canonical_name(&requested)).await {
                return match address.parse::<Ipv4Addr>() {
                    Ok(ip) => self.send_authoritative(request, response, ip).await,
                    Err(_) => {
                        tracing::warn!(
                            "table value \"{address}\" for \"{requested}\" is not an IPv4 address"
                        );
                        self.send_failure(request, response).await
                    }
                };
            }
        }

        // Local miss, or a query type we never answer ourselves.
        match &self.forwarder {
            None => self.send_failure(request, response).await,
            Some(forwarder) => {
                tracing::debug!("domain not found locally: {}", query.name());
                match forwarder.forward(query.name().clone(), query.query_type()).await {
                    Ok(upstream) => self.send_relayed(request, response, &upstream).await,
                    Err(_) => self.send_failure(request, response).await,
                }
            }
        }
    }

    async fn handle_notimpl<R: ResponseHandler>(
        &self,
        request: &Request,
        mut response_handle: R,
    ) -> Result<ResponseInfo, Error> {
        let response = MessageResponseBuilder::from_message_request(request);
        Ok(response_handle
            .send_response(response.error_msg(request.header(), ResponseCode::NotImp))
            .await?)
    }

    /// Answer a local table hit: one A record for the requested name.
    async fn send_authoritative<R: ResponseHandler>(
        &self,
        request: &Request,
        mut response_handle: R,
        ip: Ipv4Addr,
    ) -> Result<ResponseInfo, Error> {
        let name = request.query().original().name().clone();
        let records = vec![Record::from_rdata(name, LOCAL_TTL, RData::A(ip))];
        let mut header = Header::response_from_request(request.header());
        header.set_authoritative(true);
        let builder = MessageResponseBuilder::from_message_request(request);
        let response = builder.build(header, records.iter(), &[], &[], &[]);
        Ok(response_handle.send_response(response).await?)
    }

    /// Relay the upstream's answer section verbatim, correlated to the
    /// original request's transaction id (never the upstream's).
    async fn send_relayed<R: ResponseHandler>(
        &self,
        request: &Request,
        mut response_handle: R,
        upstream: &DnsResponse,
    ) -> Result<ResponseInfo, Error> {
        let mut header = Header::response_from_request(request.header());
        header.set_recursion_available(true);
        let builder = MessageResponseBuilder::from_message_request(request);
        let response = builder.build(header, upstream.answers().iter(), &[], &[], &[]);
        Ok(response_handle.send_response(response).await?)
    }

    /// The generic "resolution failed" reply: SERVFAIL, no answer records.
    async fn send_failure<R: ResponseHandler>(
        &self,
        request: &Request,
        mut response_handle: R,
    ) -> Result<ResponseInfo, Error> {
        let builder = MessageResponseBuilder::from_message_request(request);
        Ok(response_handle
            .send_response(builder.error_msg(request.header(), ResponseCode::ServFail))
            .await?)
    }
}

#[async_trait::async_trait]
impl RequestHandler for Handler {
    async fn handle_request<R: ResponseHandler>(
        &self,
        request: &Request,
        response_handle: R,
    ) -> ResponseInfo {
        match self.dispatch_request(request, response_handle).await {
            Ok(info) => info,
            Err(error) => {
                error!("error in RequestHandler: {:?}", error);
                let mut header = Header::new();
                header.set_response_code(ResponseCode::ServFail);
                header.into()
            }
        }
    }
}

//! Error types.

use axum::extract::rejection::JsonRejection;
use trust_dns_client::error::ClientError;
use trust_dns_proto::error::ProtoError;
use trust_dns_proto::op::ResponseCode;

/// Error enumerates the possible masqdns error states.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Returned by [`DomainRegistry::update_existing`][crate::registry::DomainRegistry::update_existing]
    /// when a batch names a domain that has no entry in the table. Mutations applied
    /// earlier in the same batch stay applied.
    #[error("domain not found: \"{0}\"")]
    UnknownDomain(String),

    /// Returned when an administrative payload binds a domain to something other
    /// than a JSON string.
    #[error("invalid address value for \"{0}\": expected a string")]
    InvalidEntry(String),

    /// Returned when clients `POST`/`PATCH` invalid JSON to the [admin API][crate::api].
    #[error(transparent)]
    JsonExtractorRejection(#[from] JsonRejection),

    /// Returned when the upstream resolver answers with a non-success response code.
    #[error("upstream returned {0:?}")]
    UpstreamStatus(ResponseCode),

    /// Returned when the forwarder's in-flight permit pool has been closed.
    /// Not expected during normal operation.
    #[error("fallback forwarder is unavailable")]
    ForwarderUnavailable,

    /// Returned at startup when no non-loopback IPv4 address can be determined
    /// for the local machine. Fatal: the service cannot self-register without one.
    #[error("no non-loopback IPv4 address found")]
    NoLocalAddress,

    /// Returned when a generic IO error occurs.
    #[error("an IO error occurred")]
    IO(#[from] std::io::Error),

    /// Returned when the upstream exchange fails at the transport level,
    /// including a timed-out or unreachable upstream.
    #[error("upstream exchange failed")]
    ClientError(#[from] ClientError),

    /// Returned when a generic DNS protocol error occurs.
    #[error("DNS error")]
    DNSError(#[from] ProtoError),
}
